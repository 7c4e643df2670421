use chrono::{Local, NaiveDate};
use std::path::Path;

use crate::board::{Board, BoardGenerator, FREE_INDEX, TOTAL_CELLS};
use crate::celebration::{Celebration, ConfettiBurst, celebrate};
use crate::error::BingoError;
use crate::photos::{PhotoRef, PhotoStore};
use crate::win::{WinState, detect_win};

/// Per-cell checked flags and photo handles.
///
/// The free space is always checked and never holds a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellState {
    checked: [bool; TOTAL_CELLS],
    photos: [Option<PhotoRef>; TOTAL_CELLS],
}

impl CellState {
    pub fn fresh() -> Self {
        let mut checked = [false; TOTAL_CELLS];
        checked[FREE_INDEX] = true;
        Self {
            checked,
            photos: std::array::from_fn(|_| None),
        }
    }

    pub fn checked(&self) -> &[bool; TOTAL_CELLS] {
        &self.checked
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn photo(&self, index: usize) -> Option<&PhotoRef> {
        self.photos.get(index).and_then(Option::as_ref)
    }

    /// Checks `index` and stores `photo`, handing back the handle it replaced.
    /// The free space is left untouched and `photo` is returned unused.
    pub fn mark(&mut self, index: usize, photo: PhotoRef) -> Option<PhotoRef> {
        if index == FREE_INDEX {
            return Some(photo);
        }
        self.checked[index] = true;
        self.photos[index].replace(photo)
    }

    fn take_photos(&mut self) -> impl Iterator<Item = PhotoRef> + '_ {
        self.photos.iter_mut().filter_map(Option::take)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::fresh()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was selected.
    Ignored,
    /// The free space takes no photo.
    FreeSpace,
    /// The cell is checked. `bingo_started` is true when this upload completed
    /// the first winning line since the last reset.
    Marked { bingo_started: bool },
}

/// State container for one board: the board itself, the cell state, the
/// derived win state and the photo handles the cells own.
pub struct BingoSession<C: Celebration> {
    generator: BoardGenerator,
    board: Board,
    cells: CellState,
    win: WinState,
    photos: PhotoStore,
    celebration: C,
    burst: ConfettiBurst,
}

impl<C: Celebration> BingoSession<C> {
    pub fn new(generator: BoardGenerator, celebration: C) -> Self {
        Self::starting_on(generator, celebration, Local::now().date_naive())
    }

    pub fn starting_on(generator: BoardGenerator, celebration: C, today: NaiveDate) -> Self {
        let board = generator.board_for(today);
        Self {
            generator,
            board,
            cells: CellState::fresh(),
            win: WinState::default(),
            photos: PhotoStore::new(),
            celebration,
            burst: ConfettiBurst::default(),
        }
    }

    pub fn with_burst(mut self, burst: ConfettiBurst) -> Self {
        self.burst = burst;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cells(&self) -> &CellState {
        &self.cells
    }

    pub fn win(&self) -> &WinState {
        &self.win
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub fn celebration(&self) -> &C {
        &self.celebration
    }

    pub fn generator(&self) -> &BoardGenerator {
        &self.generator
    }

    /// Attaches the selected photo to `index` and checks the cell.
    pub fn upload(&mut self, index: usize, selection: Option<&Path>) -> Result<UploadOutcome, BingoError> {
        if index >= TOTAL_CELLS {
            return Err(BingoError::CellOutOfRange(index));
        }
        let Some(path) = selection.filter(|p| !p.as_os_str().is_empty()) else {
            tracing::debug!(index, "empty selection ignored");
            return Ok(UploadOutcome::Ignored);
        };
        if index == FREE_INDEX {
            return Ok(UploadOutcome::FreeSpace);
        }

        let photo = self.photos.create(path);
        tracing::debug!(index, %photo, path = %path.display(), "marked cell");
        if let Some(old) = self.cells.mark(index, photo) {
            self.photos.revoke(&old);
        }
        let bingo_started = self.refresh_win();
        Ok(UploadOutcome::Marked { bingo_started })
    }

    /// Draws a new board and clears every cell, photo handle and win.
    pub fn reset(&mut self) -> &Board {
        self.reset_on(Local::now().date_naive())
    }

    pub fn reset_on(&mut self, today: NaiveDate) -> &Board {
        for photo in self.cells.take_photos() {
            self.photos.revoke(&photo);
        }
        let leftover = self.photos.revoke_all();
        if leftover > 0 {
            tracing::warn!(leftover, "released photo handles no cell owned");
        }
        self.board = self.generator.board_for(today);
        self.cells = CellState::fresh();
        self.refresh_win();
        tracing::debug!("board reset");
        &self.board
    }

    /// Recomputes the win state and celebrates a no-win to win transition.
    fn refresh_win(&mut self) -> bool {
        let next = detect_win(self.cells.checked());
        let started = !self.win.has_bingo() && next.has_bingo();
        self.win = next;
        if let (true, Some(line)) = (started, next.line) {
            tracing::info!(%line, "bingo");
            celebrate(&mut self.celebration, &self.burst);
        }
        started
    }
}
