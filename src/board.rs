use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{ACTIVITIES_PER_BOARD, Activity, Catalog};

pub const BOARD_SIZE: usize = 5;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE;
pub const FREE_INDEX: usize = TOTAL_CELLS / 2;
pub const FREE_SPACE: &str = "Free Space";

/// 25 cell labels in row-major order with [`FREE_SPACE`] at the center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    labels: Vec<String>,
}

impl Board {
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }
}

/// How the generator picks its random source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SeedMode {
    /// Fresh board on every generation.
    #[default]
    Unseeded,
    /// Same board for every generation within one Sunday-start week.
    Weekly,
    /// Same board every time.
    Fixed { seed: u64 },
}

/// Most recent Sunday on or before `date`.
pub fn week_key(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Week key rendered as a calendar-day string, e.g. `Sun Oct 18 2026`.
pub fn week_label(date: NaiveDate) -> String {
    week_key(date).format("%a %b %d %Y").to_string()
}

/// In-place Fisher-Yates: for i from the last index down to 1, swap i with a
/// uniform j in `[0, i]`.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffles `activities`, keeps the first 24 and inserts the free space at the
/// center.
///
/// # Panics
///
/// Panics if fewer than 24 activities are supplied. [`Catalog`] rules that out,
/// so hitting this is a caller bug.
pub fn generate_with_rng<R: Rng>(activities: &[Activity], rng: &mut R) -> Board {
    assert!(
        activities.len() >= ACTIVITIES_PER_BOARD,
        "board generation needs at least {ACTIVITIES_PER_BOARD} activities, got {}",
        activities.len()
    );
    let mut pool: Vec<&Activity> = activities.iter().collect();
    shuffle(&mut pool, rng);

    let mut labels: Vec<String> = pool
        .into_iter()
        .take(ACTIVITIES_PER_BOARD)
        .map(|a| a.as_str().to_string())
        .collect();
    labels.insert(FREE_INDEX, FREE_SPACE.to_string());
    debug_assert_eq!(labels.len(), TOTAL_CELLS);
    Board { labels }
}

pub fn generate(catalog: &Catalog) -> Board {
    generate_with_rng(catalog.activities(), &mut rand::rng())
}

/// Pairs a catalog with a [`SeedMode`] and produces boards on demand.
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    catalog: Catalog,
    seed_mode: SeedMode,
}

impl BoardGenerator {
    pub fn new(catalog: Catalog, seed_mode: SeedMode) -> Self {
        Self { catalog, seed_mode }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn seed_mode(&self) -> SeedMode {
        self.seed_mode
    }

    pub fn board_for(&self, today: NaiveDate) -> Board {
        let board = match self.seed_mode {
            SeedMode::Unseeded => generate(&self.catalog),
            SeedMode::Weekly => {
                let seed = week_key(today).num_days_from_ce() as u64;
                generate_with_rng(self.catalog.activities(), &mut StdRng::seed_from_u64(seed))
            }
            SeedMode::Fixed { seed } => {
                generate_with_rng(self.catalog.activities(), &mut StdRng::seed_from_u64(seed))
            }
        };
        tracing::debug!(seed_mode = ?self.seed_mode, week = %week_label(today), "generated board");
        board
    }
}
