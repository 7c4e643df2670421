//! Weekly Madison County bingo: a 5x5 board of local activities where each
//! square is checked by attaching a photo, and a completed row, column or
//! diagonal wins.

pub mod board;
pub mod board_renderer;
pub mod catalog;
pub mod celebration;
pub mod config;
pub mod error;
pub mod photos;
pub mod repl;
pub mod session;
pub mod view;
pub mod win;

pub use board::{Board, BoardGenerator, FREE_INDEX, FREE_SPACE, SeedMode, TOTAL_CELLS, generate};
pub use catalog::{Activity, Catalog, read_catalog_from_json};
pub use celebration::{Celebration, CelebrationError, ConfettiBurst};
pub use config::BingoConfig;
pub use error::BingoError;
pub use session::{BingoSession, CellState, UploadOutcome};
pub use win::{LINES, Line, WinState, detect_win};
