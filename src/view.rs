//! Presentation-neutral snapshot of a session, rebuilt after every mutation.

use serde::Serialize;

use crate::board::{BOARD_SIZE, FREE_INDEX};
use crate::celebration::Celebration;
use crate::photos::PhotoRef;
use crate::session::BingoSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", content = "photo", rename_all = "snake_case")]
pub enum CellControl {
    FreeSpace,
    /// Unchecked cell offering a photo picker.
    Upload,
    /// Checked cell showing its photo.
    Preview(PhotoRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub index: usize,
    pub label: String,
    pub control: CellControl,
    pub checked: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub cells: Vec<CellView>,
    pub banner: bool,
}

pub fn render<C: Celebration>(session: &BingoSession<C>) -> BoardView {
    let cells = session
        .board()
        .iter()
        .map(|(index, label)| {
            let control = if index == FREE_INDEX {
                CellControl::FreeSpace
            } else {
                match session.cells().photo(index) {
                    Some(photo) if session.cells().is_checked(index) => CellControl::Preview(photo.clone()),
                    _ => CellControl::Upload,
                }
            };
            CellView {
                index,
                label: label.to_string(),
                control,
                checked: session.cells().is_checked(index),
                highlighted: session.win().contains(index),
            }
        })
        .collect();
    BoardView {
        cells,
        banner: session.win().has_bingo(),
    }
}

const CELL_WIDTH: usize = 18;

fn fit(label: &str, width: usize) -> String {
    let count = label.chars().count();
    if count <= width {
        format!("{label:<width$}")
    } else {
        let cut: String = label.chars().take(width - 1).collect();
        format!("{cut}~")
    }
}

/// Fixed-width terminal grid. Checked cells carry `[x]`, open cells their
/// index, and winning cells are wrapped in `*`.
pub fn render_text(view: &BoardView) -> String {
    let rule = format!("+{}\n", format!("{}+", "-".repeat(CELL_WIDTH + 2)).repeat(BOARD_SIZE));
    let mut out = String::new();
    if view.banner {
        out.push_str("*** BINGO! ***\n");
    }
    out.push_str(&rule);
    for row in view.cells.chunks(BOARD_SIZE) {
        let mut labels = String::from("|");
        let mut marks = String::from("|");
        for cell in row {
            let edge = if cell.highlighted { '*' } else { ' ' };
            labels.push_str(&format!("{edge}{}{edge}|", fit(&cell.label, CELL_WIDTH)));
            let mark = match &cell.control {
                CellControl::FreeSpace => "(free)".to_string(),
                CellControl::Upload => format!("{:>2} [ ]", cell.index),
                CellControl::Preview(photo) => format!("[x] {photo}"),
            };
            marks.push_str(&format!("{edge}{}{edge}|", fit(&mark, CELL_WIDTH)));
        }
        out.push_str(&labels);
        out.push('\n');
        out.push_str(&marks);
        out.push('\n');
        out.push_str(&rule);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardGenerator, SeedMode};
    use crate::catalog::Catalog;
    use crate::celebration::Silent;
    use std::path::Path;

    fn session() -> BingoSession<Silent> {
        let generator = BoardGenerator::new(Catalog::madison_county(), SeedMode::Fixed { seed: 1 });
        BingoSession::new(generator, Silent)
    }

    #[test]
    fn fresh_view() {
        let s = session();
        let view = render(&s);
        assert_eq!(view.cells.len(), 25);
        assert!(!view.banner);
        assert_eq!(view.cells[FREE_INDEX].control, CellControl::FreeSpace);
        assert!(view.cells[FREE_INDEX].checked);
        assert!(view.cells.iter().filter(|c| c.index != FREE_INDEX).all(|c| c.control == CellControl::Upload));
        assert!(view.cells.iter().all(|c| !c.highlighted));
    }

    #[test]
    fn preview_and_highlight_follow_state() {
        let mut s = session();
        for i in [4, 8, 16, 20] {
            s.upload(i, Some(Path::new("p.jpg"))).unwrap();
        }
        let view = render(&s);
        assert!(view.banner);
        assert!(matches!(view.cells[4].control, CellControl::Preview(_)));
        let lit: Vec<usize> = view.cells.iter().filter(|c| c.highlighted).map(|c| c.index).collect();
        assert_eq!(lit, vec![4, 8, 12, 16, 20]);

        // rendering does not touch the session.
        assert_eq!(render(&s), view);
    }

    #[test]
    fn text_grid_shape() {
        let mut s = session();
        s.upload(0, Some(Path::new("p.jpg"))).unwrap();
        let text = render_text(&render(&s));
        assert_eq!(text.lines().count(), 16);
        assert!(text.contains("(free)"));
        assert!(text.contains("[x] blob:1"));
        assert!(text.contains(" 1 [ ]"));
        assert!(!text.contains("BINGO"));
        let width = text.lines().next().unwrap().len();
        assert!(text.lines().all(|l| l.chars().count() == width));
    }

    #[test]
    fn long_labels_are_cut() {
        assert_eq!(fit("Explore the Shelton Laurel Backcountry", 10), "Explore t~");
        assert_eq!(fit("Go", 4), "Go  ");
    }
}
