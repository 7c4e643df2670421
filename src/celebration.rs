use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(thiserror::Error, Debug)]
pub enum CelebrationError {
    #[error("sound playback failed: {0}")]
    Sound(String),
    #[error("confetti failed: {0}")]
    Confetti(String),
}

/// Parameters of the confetti burst fired on a win.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread angle in degrees.
    pub spread: u32,
    /// Vertical launch point, 0.0 is the top of the surface and 1.0 the bottom.
    pub origin_y: f32,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self { particle_count: 200, spread: 90, origin_y: 0.6 }
    }
}

/// One-shot effects played when the board first reaches a bingo.
pub trait Celebration {
    fn play_sound(&mut self) -> Result<(), CelebrationError>;
    fn launch_confetti(&mut self, burst: &ConfettiBurst) -> Result<(), CelebrationError>;
}

/// Fires both effects. Failures are logged and swallowed so they never reach
/// board state.
pub fn celebrate<C: Celebration + ?Sized>(celebration: &mut C, burst: &ConfettiBurst) {
    if let Err(e) = celebration.play_sound() {
        tracing::warn!(error = %e, "celebration sound failed");
    }
    if let Err(e) = celebration.launch_confetti(burst) {
        tracing::warn!(error = %e, "confetti failed");
    }
}

/// No-op celebration.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Celebration for Silent {
    fn play_sound(&mut self) -> Result<(), CelebrationError> {
        Ok(())
    }

    fn launch_confetti(&mut self, _burst: &ConfettiBurst) -> Result<(), CelebrationError> {
        Ok(())
    }
}

const CONFETTI_GLYPHS: &[char] = &['*', '+', 'o', '.', '~', '^'];

/// Terminal bell plus an ASCII confetti strip written to `out`.
pub struct TerminalCelebration<W: Write> {
    out: W,
    sound: bool,
}

impl<W: Write> TerminalCelebration<W> {
    pub fn new(out: W, sound: bool) -> Self {
        Self { out, sound }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Celebration for TerminalCelebration<W> {
    fn play_sound(&mut self) -> Result<(), CelebrationError> {
        if !self.sound {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| CelebrationError::Sound(e.to_string()))
    }

    fn launch_confetti(&mut self, burst: &ConfettiBurst) -> Result<(), CelebrationError> {
        let strip = confetti_strip(burst, &mut rand::rng());
        self.out
            .write_all(strip.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| CelebrationError::Confetti(e.to_string()))
    }
}

/// Scatters `particle_count` glyphs over rows `spread` columns wide.
/// Rows above the launch point are sparser than the rows below it.
fn confetti_strip<R: Rng>(burst: &ConfettiBurst, rng: &mut R) -> String {
    let width = burst.spread.max(1) as usize;
    let rows = (burst.particle_count as usize).div_ceil(width).max(1);
    let mut grid = vec![vec![' '; width]; rows];
    let origin_row = ((rows as f32) * burst.origin_y.clamp(0.0, 1.0)) as usize;
    for _ in 0..burst.particle_count {
        let mut row = rng.random_range(0..rows);
        if row < origin_row && rng.random_bool(0.5) {
            row = origin_row.min(rows - 1);
        }
        let col = rng.random_range(0..width);
        grid[row][col] = CONFETTI_GLYPHS[rng.random_range(0..CONFETTI_GLYPHS.len())];
    }
    let mut out = String::new();
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}
