use serde::Serialize;
use std::fmt;

use crate::board::{BOARD_SIZE, TOTAL_CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "n", rename_all = "snake_case")]
pub enum LineKind {
    Row(usize),
    Column(usize),
    Diagonal,
    AntiDiagonal,
}

/// Five cell indices that win the game when all are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Line {
    pub kind: LineKind,
    pub cells: [usize; BOARD_SIZE],
}

impl Line {
    const fn row(r: usize) -> Self {
        let mut cells = [0; BOARD_SIZE];
        let mut c = 0;
        while c < BOARD_SIZE {
            cells[c] = r * BOARD_SIZE + c;
            c += 1;
        }
        Line { kind: LineKind::Row(r), cells }
    }

    const fn column(c: usize) -> Self {
        let mut cells = [0; BOARD_SIZE];
        let mut r = 0;
        while r < BOARD_SIZE {
            cells[r] = r * BOARD_SIZE + c;
            r += 1;
        }
        Line { kind: LineKind::Column(c), cells }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }

    pub fn is_complete(&self, checked: &[bool; TOTAL_CELLS]) -> bool {
        self.cells.iter().all(|&i| checked[i])
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LineKind::Row(r) => write!(f, "row {}", r + 1),
            LineKind::Column(c) => write!(f, "column {}", c + 1),
            LineKind::Diagonal => f.write_str("diagonal"),
            LineKind::AntiDiagonal => f.write_str("anti-diagonal"),
        }
    }
}

/// The 12 winning lines in detection order: row 0, column 0, row 1,
/// column 1, ... row 4, column 4, then both diagonals.
pub const LINES: [Line; 12] = [
    Line::row(0),
    Line::column(0),
    Line::row(1),
    Line::column(1),
    Line::row(2),
    Line::column(2),
    Line::row(3),
    Line::column(3),
    Line::row(4),
    Line::column(4),
    Line { kind: LineKind::Diagonal, cells: [0, 6, 12, 18, 24] },
    Line { kind: LineKind::AntiDiagonal, cells: [4, 8, 12, 16, 20] },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinState {
    pub line: Option<Line>,
}

impl WinState {
    pub fn has_bingo(&self) -> bool {
        self.line.is_some()
    }

    /// Whether `index` belongs to the winning line.
    pub fn contains(&self, index: usize) -> bool {
        self.line.is_some_and(|l| l.contains(index))
    }
}

/// Reports the first line in [`LINES`] order whose cells are all checked.
pub fn detect_win(checked: &[bool; TOTAL_CELLS]) -> WinState {
    WinState {
        line: LINES.iter().find(|line| line.is_complete(checked)).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::FREE_INDEX;

    fn with(indices: &[usize]) -> [bool; TOTAL_CELLS] {
        let mut checked = [false; TOTAL_CELLS];
        checked[FREE_INDEX] = true;
        for &i in indices {
            checked[i] = true;
        }
        checked
    }

    #[test]
    fn lines_are_canonical() {
        assert_eq!(LINES[0].cells, [0, 1, 2, 3, 4]);
        assert_eq!(LINES[1].cells, [0, 5, 10, 15, 20]);
        assert_eq!(LINES[8].cells, [20, 21, 22, 23, 24]);
        assert_eq!(LINES[9].cells, [4, 9, 14, 19, 24]);
        for line in LINES {
            assert_eq!(line.cells.len(), 5);
            assert!(line.cells.iter().all(|&i| i < TOTAL_CELLS));
        }
    }

    #[test]
    fn fresh_board_has_no_bingo() {
        assert!(!detect_win(&with(&[])).has_bingo());
        assert!(!detect_win(&[false; TOTAL_CELLS]).has_bingo());
    }

    #[test]
    fn first_row_wins() {
        let win = detect_win(&with(&[0, 1, 2, 3, 4]));
        assert!(win.has_bingo());
        assert_eq!(win.line.map(|l| l.cells), Some([0, 1, 2, 3, 4]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Row(0)));
    }

    #[test]
    fn diagonal_needs_the_other_four() {
        assert!(!detect_win(&with(&[0, 6, 18])).has_bingo());
        let win = detect_win(&with(&[0, 6, 18, 24]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Diagonal));
    }

    #[test]
    fn anti_diagonal_wins() {
        let win = detect_win(&with(&[4, 8, 16, 20]));
        assert_eq!(win.line.map(|l| l.cells), Some([4, 8, 12, 16, 20]));
    }

    #[test]
    fn middle_column_uses_free_space() {
        let win = detect_win(&with(&[2, 7, 17, 22]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Column(2)));
    }

    #[test]
    fn earliest_line_wins_ties() {
        // row 0 and column 0 share cell 0.
        let win = detect_win(&with(&[0, 1, 2, 3, 4, 5, 10, 15, 20]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Row(0)));

        // column 0 comes before row 1.
        let win = detect_win(&with(&[5, 6, 7, 8, 9, 0, 10, 15, 20]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Column(0)));

        // any row beats a diagonal.
        let win = detect_win(&with(&[0, 6, 18, 24, 20, 21, 22, 23]));
        assert_eq!(win.line.map(|l| l.kind), Some(LineKind::Row(4)));
    }

    #[test]
    fn every_line_one_short_is_not_a_win() {
        // One open cell per row and column, also covering both diagonals.
        let open = [0, 8, 11, 19, 22];
        let marked: Vec<usize> = (0..TOTAL_CELLS).filter(|i| !open.contains(i)).collect();
        let checked = with(&marked);
        assert!(!detect_win(&checked).has_bingo());
        for line in LINES {
            let filled = line.cells.iter().filter(|&&i| checked[i]).count();
            assert_eq!(filled, 4, "{line}");
        }
    }

    #[test]
    fn detection_is_pure() {
        let checked = with(&[3, 8, 13, 18, 23]);
        assert_eq!(detect_win(&checked), detect_win(&checked));
    }

    #[test]
    fn win_state_contains() {
        let win = detect_win(&with(&[10, 11, 13, 14]));
        assert!(win.contains(12));
        assert!(!win.contains(0));
        assert!(!WinState::default().contains(12));
    }
}
