use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum BingoError {
    #[error("catalog has {found} activities, a board needs at least {required}")]
    CatalogTooSmall { found: usize, required: usize },
    #[error("duplicate activity in catalog: {0}")]
    DuplicateActivity(String),
    #[error("catalog contains an empty activity label at position {0}")]
    EmptyActivity(usize),
    #[error("\"{0}\" is reserved for the center square")]
    ReservedActivity(String),
    #[error("cell {0} is outside the 5x5 board")]
    CellOutOfRange(usize),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("render.{field} is {value}, expected {min}..={max}")]
    RenderSetting {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("failed to render board: {0}")]
    Render(String),
}

impl From<image::ImageError> for BingoError {
    fn from(err: image::ImageError) -> Self {
        BingoError::Render(err.to_string())
    }
}
