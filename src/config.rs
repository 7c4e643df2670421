use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::board::SeedMode;
use crate::catalog::{Catalog, read_catalog_from_json};
use crate::celebration::ConfettiBurst;
use crate::error::BingoError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BingoConfig {
    /// Catalog file; the built-in Madison County catalog when unset.
    pub catalog: Option<PathBuf>,
    pub seed: SeedMode,
    pub celebration: CelebrationConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CelebrationConfig {
    pub sound: bool,
    pub confetti: ConfettiBurst,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self { sound: true, confetti: ConfettiBurst::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub cell_px: u32,
    pub padding: u32,
    pub font_size: f32,
    /// Font file to use before searching the system font directories.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { cell_px: 128, padding: 20, font_size: 18.0, font_path: None }
    }
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), BingoError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value >= min && value <= max {
        return Ok(());
    }
    Err(BingoError::RenderSetting {
        field,
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    })
}

impl RenderConfig {
    pub const CELL_PX: (u32, u32) = (32, 1024);
    pub const PADDING: (u32, u32) = (0, 512);
    pub const FONT_SIZE: (f32, f32) = (4.0, 256.0);

    /// Rejects sizes that would overflow the image dimensions or ask for an
    /// unreasonably large canvas.
    pub fn validate(&self) -> Result<(), BingoError> {
        check_range("cell_px", self.cell_px, Self::CELL_PX.0, Self::CELL_PX.1)?;
        check_range("padding", self.padding, Self::PADDING.0, Self::PADDING.1)?;
        // NaN fails both comparisons and lands here too.
        check_range("font_size", self.font_size, Self::FONT_SIZE.0, Self::FONT_SIZE.1)
    }
}

impl BingoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BingoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BingoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BingoConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| BingoError::Json { path: path.to_path_buf(), source })?;
        config.render.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn load_catalog(&self) -> Result<Catalog, BingoError> {
        match &self.catalog {
            Some(path) => read_catalog_from_json(path),
            None => Ok(Catalog::madison_county()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_all_defaults() {
        let config: BingoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BingoConfig::default());
        assert_eq!(config.seed, SeedMode::Unseeded);
        assert!(config.celebration.sound);
        assert_eq!(config.celebration.confetti.particle_count, 200);
        assert_eq!(config.render.cell_px, 128);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"seed": {{"mode": "weekly"}}, "celebration": {{"sound": false}}, "render": {{"font_size": 12.0}}}}"#
        )
        .unwrap();
        let config = BingoConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, SeedMode::Weekly);
        assert!(!config.celebration.sound);
        assert_eq!(config.celebration.confetti.spread, 90);
        assert_eq!(config.render.font_size, 12.0);
        assert_eq!(config.render.padding, 20);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<BingoConfig>(r#"{"sead": 1}"#).is_err());
    }

    #[test]
    fn oversized_cells_are_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"render": {{"cell_px": 1000000000}}}}"#).unwrap();
        match BingoConfig::load(file.path()) {
            Err(BingoError::RenderSetting { field, value, .. }) => {
                assert_eq!(field, "cell_px");
                assert_eq!(value, "1000000000");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn render_bounds() {
        assert!(RenderConfig::default().validate().is_ok());
        let at_limits = RenderConfig { cell_px: 1024, padding: 512, font_size: 4.0, font_path: None };
        assert!(at_limits.validate().is_ok());

        let cases = [
            (RenderConfig { cell_px: 31, ..RenderConfig::default() }, "cell_px"),
            (RenderConfig { cell_px: 1025, ..RenderConfig::default() }, "cell_px"),
            (RenderConfig { padding: u32::MAX, ..RenderConfig::default() }, "padding"),
            (RenderConfig { font_size: f32::NAN, ..RenderConfig::default() }, "font_size"),
            (RenderConfig { font_size: 1.0e9, ..RenderConfig::default() }, "font_size"),
        ];
        for (config, expected) in cases {
            assert!(
                matches!(config.validate(), Err(BingoError::RenderSetting { field, .. }) if field == expected),
                "{config:?}"
            );
        }
    }

    #[test]
    fn default_catalog_is_built_in() {
        let catalog = BingoConfig::default().load_catalog().unwrap();
        assert_eq!(catalog, Catalog::madison_county());
    }

    #[test]
    fn catalog_path_is_followed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let labels: Vec<String> = (0..30).map(|i| format!("Stop {i}")).collect();
        write!(file, "{}", serde_json::json!({ "activities": labels })).unwrap();
        let config = BingoConfig { catalog: Some(file.path().to_path_buf()), ..BingoConfig::default() };
        assert_eq!(config.load_catalog().unwrap().len(), 30);
    }
}
