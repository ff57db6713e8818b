use std::fs;
use std::path::Path;
use std::time::Duration;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns a square `size`×`size` grid.
    #[must_use]
    pub fn square(size: u16) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Default board dimension (cells per side).
pub const DEFAULT_BOARD_SIZE: u16 = 20;
/// Smallest board a run can start on.
pub const MIN_BOARD_SIZE: u16 = 3;
/// Largest board side accepted by validation.
pub const MAX_BOARD_SIZE: u16 = 255;

/// Tick interval at score zero, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 140;

/// Fastest allowed tick interval, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Interval reduction applied per speed step, in milliseconds.
pub const SPEED_STEP_MS: u64 = 3;

/// Score needed per speed step.
pub const POINTS_PER_SPEED_STEP: u32 = 30;

/// Candies kept on the board at steady state.
pub const DEFAULT_CANDY_COUNT: usize = 5;

/// Random samples tried before an overlapping placement is accepted.
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 400;

/// Leaderboard capacity.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Lifetime of a consumption burst.
pub const BURST_DURATION_MS: u64 = 600;

/// Lifetime of a score popup message.
pub const MESSAGE_DURATION_MS: u64 = 800;

/// Minimum swipe displacement before a drag counts as a direction.
pub const SWIPE_THRESHOLD_PX: f32 = 20.0;

/// Approximate pixel footprint of one terminal cell, used to scale mouse drags.
pub const TERMINAL_CELL_PX: (f32, f32) = (8.0, 16.0);

/// Every tunable of one game session.
///
/// Missing keys in a config file fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: u16,
    pub initial_interval_ms: u64,
    pub min_interval_ms: u64,
    pub speed_step_ms: u64,
    pub points_per_speed_step: u32,
    pub candy_count: usize,
    pub placement_attempts: u32,
    pub leaderboard_size: usize,
    pub burst_duration_ms: u64,
    pub message_duration_ms: u64,
    pub swipe_threshold_px: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            initial_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_interval_ms: MIN_TICK_INTERVAL_MS,
            speed_step_ms: SPEED_STEP_MS,
            points_per_speed_step: POINTS_PER_SPEED_STEP,
            candy_count: DEFAULT_CANDY_COUNT,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            burst_duration_ms: BURST_DURATION_MS,
            message_duration_ms: MESSAGE_DURATION_MS,
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str::<Self>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects combinations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Invalid(format!(
                "board_size must be in {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        if self.candy_count == 0 {
            return Err(ConfigError::Invalid("candy_count must be positive".to_owned()));
        }
        if self.candy_count >= self.grid().total_cells() {
            return Err(ConfigError::Invalid(format!(
                "candy_count {} does not fit on a {}x{} board",
                self.candy_count, self.board_size, self.board_size
            )));
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::Invalid(
                "placement_attempts must be positive".to_owned(),
            ));
        }
        if self.points_per_speed_step == 0 {
            return Err(ConfigError::Invalid(
                "points_per_speed_step must be positive".to_owned(),
            ));
        }
        if self.min_interval_ms == 0 || self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "min_interval_ms must be in 1..={}, got {}",
                self.initial_interval_ms, self.min_interval_ms
            )));
        }
        if self.leaderboard_size == 0 {
            return Err(ConfigError::Invalid(
                "leaderboard_size must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Board dimensions.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::square(self.board_size)
    }

    /// Tick interval for `score`: `initial - step * (score / threshold)`,
    /// floored at the minimum interval.
    #[must_use]
    pub fn tick_interval(&self, score: u32) -> Duration {
        let steps = u64::from(score / self.points_per_speed_step.max(1));
        let ms = self
            .initial_interval_ms
            .saturating_sub(steps.saturating_mul(self.speed_step_ms))
            .max(self.min_interval_ms);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn burst_duration(&self) -> Duration {
        Duration::from_millis(self.burst_duration_ms)
    }

    #[must_use]
    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }
}

/// Colors used by the terminal front end.
#[derive(Debug)]
pub struct Palette {
    pub snake_head: Color,
    /// Body gradient from neck to tail.
    pub snake_body: [Color; 8],
    pub board_light: Color,
    pub board_dark: Color,
    pub border: Color,
    pub title: Color,
    pub score: Color,
    pub high_score: Color,
    pub sparkle: Color,
    pub message: Color,
    pub muted: Color,
}

pub const CANDY_PALETTE: Palette = Palette {
    snake_head: Color::Rgb(255, 107, 157),
    snake_body: [
        Color::Rgb(255, 107, 157),
        Color::Rgb(255, 133, 171),
        Color::Rgb(255, 159, 186),
        Color::Rgb(255, 184, 201),
        Color::Rgb(255, 209, 216),
        Color::Rgb(255, 224, 230),
        Color::Rgb(255, 236, 240),
        Color::Rgb(255, 245, 247),
    ],
    board_light: Color::Rgb(58, 40, 54),
    board_dark: Color::Rgb(48, 36, 58),
    border: Color::Rgb(255, 209, 220),
    title: Color::Rgb(196, 77, 255),
    score: Color::Rgb(255, 107, 157),
    high_score: Color::Rgb(155, 89, 182),
    sparkle: Color::Rgb(255, 215, 0),
    message: Color::Rgb(255, 107, 157),
    muted: Color::Rgb(184, 160, 212),
};
