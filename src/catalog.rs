use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use crate::board::{FREE_SPACE, TOTAL_CELLS};
use crate::error::BingoError;

/// Number of activities a single board draws from the catalog.
pub const ACTIVITIES_PER_BOARD: usize = TOTAL_CELLS - 1;

const MADISON_COUNTY_JSON: &str = include_str!("../activities.json");

static MADISON_COUNTY: LazyLock<Catalog> = LazyLock::new(|| {
    let parsed: CatalogFile =
        serde_json::from_str(MADISON_COUNTY_JSON).expect("activities.json is valid JSON");
    Catalog::new(parsed.activities).expect("activities.json is a valid catalog")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Activity(String);

impl Activity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed list of activities boards are drawn from.
///
/// A catalog is validated once when it is built: it holds at least
/// [`ACTIVITIES_PER_BOARD`] distinct, non-blank labels and never the
/// center-square label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    activities: Vec<Activity>,
}

impl Catalog {
    pub fn new<I, S>(labels: I) -> Result<Self, BingoError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut activities = Vec::new();
        for (pos, label) in labels.into_iter().enumerate() {
            let label: String = label.into();
            let label = label.trim().to_string();
            if label.is_empty() {
                return Err(BingoError::EmptyActivity(pos));
            }
            if label.eq_ignore_ascii_case(FREE_SPACE) {
                return Err(BingoError::ReservedActivity(label));
            }
            if !seen.insert(label.clone()) {
                return Err(BingoError::DuplicateActivity(label));
            }
            activities.push(Activity(label));
        }
        if activities.len() < ACTIVITIES_PER_BOARD {
            return Err(BingoError::CatalogTooSmall {
                found: activities.len(),
                required: ACTIVITIES_PER_BOARD,
            });
        }
        Ok(Self { activities })
    }

    /// Built-in catalog of Madison County, NC activities, embedded from
    /// `activities.json`.
    pub fn madison_county() -> Self {
        MADISON_COUNTY.clone()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.activities.iter().any(|a| a.as_str() == label)
    }
}

// The JSON file has the following structure:
// {
//    "activities": [ "Hike Max Patch", "Find a waterfall", ... ]
// }
#[derive(Debug, Deserialize)]
struct CatalogFile {
    activities: Vec<String>,
}

pub fn read_catalog_from_json(path: impl AsRef<Path>) -> Result<Catalog, BingoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BingoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let parsed: CatalogFile =
        serde_json::from_reader(reader).map_err(|source| BingoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog = Catalog::new(parsed.activities)?;
    tracing::debug!(path = %path.display(), activities = catalog.len(), "loaded catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_has_forty_distinct_entries() {
        let catalog = Catalog::madison_county();
        assert_eq!(catalog.len(), 40);
        let labels: Vec<String> = catalog.activities().iter().map(|a| a.to_string()).collect();
        assert!(Catalog::new(labels).is_ok());
    }

    #[test]
    fn test_read_catalog_from_json() {
        let catalog = read_catalog_from_json("activities.json").expect("should read file");
        assert_eq!(catalog, Catalog::madison_county());
    }

    #[test]
    fn rejects_small_catalog() {
        let labels: Vec<String> = (0..23).map(|i| format!("Activity {i}")).collect();
        match Catalog::new(labels) {
            Err(BingoError::CatalogTooSmall { found, required }) => {
                assert_eq!(found, 23);
                assert_eq!(required, 24);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicates_blanks_and_free_space() {
        let mut labels: Vec<String> = (0..24).map(|i| format!("Activity {i}")).collect();
        labels.push("Activity 3".into());
        assert!(matches!(
            Catalog::new(labels.clone()),
            Err(BingoError::DuplicateActivity(l)) if l == "Activity 3"
        ));

        labels.pop();
        labels.push("   ".into());
        assert!(matches!(Catalog::new(labels.clone()), Err(BingoError::EmptyActivity(24))));

        labels.pop();
        labels.push("free space".into());
        assert!(matches!(Catalog::new(labels), Err(BingoError::ReservedActivity(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_catalog_from_json("does-not-exist.json").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }
}
