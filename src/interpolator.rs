//! Frame clock that drives the simulation from display refreshes.
//!
//! Each refresh calls [`Interpolator::advance`]. When a full tick interval
//! has elapsed the simulation steps once and the clock moves forward by
//! exactly one interval; after a stall the clock is snapped to the present
//! instead of replaying missed ticks. Between ticks the clock reports how
//! far the snake is toward its next cell so it can be drawn smoothly.

use std::time::{Duration, Instant};

use crate::game::{GameState, TickOutcome};
use crate::snake::{Position, Snake};

/// Continuous draw coordinates of one snake segment, in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPoint {
    pub x: f32,
    pub y: f32,
}

impl DrawPoint {
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self {
            x: position.x as f32,
            y: position.y as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Interpolator {
    last_tick: Option<Instant>,
    previous: Vec<Position>,
    fraction: f32,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator {
    /// A stopped clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: None,
            previous: Vec::new(),
            fraction: 1.0,
        }
    }

    /// Starts scheduling ticks from `now`, with `snake` as the resting pose.
    pub fn start(&mut self, now: Instant, snake: &Snake) {
        self.last_tick = Some(now);
        self.previous = snake.segments().copied().collect();
        self.fraction = 0.0;
    }

    /// Restarts the tick schedule from `now` without touching the pose.
    pub fn resume(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Stops scheduling. Later `advance` calls never tick.
    pub fn stop(&mut self) {
        self.last_tick = None;
        self.fraction = 1.0;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Interpolation fraction computed by the last `advance`, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Called once per display refresh. Ticks `state` at most once.
    pub fn advance(&mut self, state: &mut GameState, now: Instant) -> TickOutcome {
        let Some(last_tick) = self.last_tick else {
            return TickOutcome::Skipped;
        };

        let interval = state.tick_interval();
        let mut outcome = TickOutcome::Skipped;
        let mut tick_at = last_tick;

        if now.saturating_duration_since(last_tick) >= interval {
            tick_at = last_tick + interval;
            if now.saturating_duration_since(tick_at) > interval * 2 {
                log::debug!(
                    "frame clock stalled {:?}; resynchronizing",
                    now.saturating_duration_since(last_tick)
                );
                tick_at = now;
            }

            self.previous = state.snake.segments().copied().collect();
            outcome = state.tick();
        }

        self.last_tick = Some(tick_at);
        self.fraction = interpolation_fraction(now, tick_at, state.tick_interval());
        outcome
    }

    /// Draw coordinates for every segment of `snake` at the current fraction.
    #[must_use]
    pub fn draw_positions(&self, snake: &Snake) -> Vec<DrawPoint> {
        blend_segments(&self.previous, snake, self.fraction)
    }
}

/// `(now - last_tick) / interval`, clamped to `[0, 1]`.
#[must_use]
pub fn interpolation_fraction(now: Instant, last_tick: Instant, interval: Duration) -> f32 {
    if interval.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(last_tick);
    (elapsed.as_secs_f32() / interval.as_secs_f32()).clamp(0.0, 1.0)
}

/// Blends each segment from its previous cell toward its current one.
///
/// Segments without a previous cell, or that jumped more than one cell
/// (a wrap across the board edge), are drawn at their current cell.
#[must_use]
pub fn blend_segments(previous: &[Position], snake: &Snake, fraction: f32) -> Vec<DrawPoint> {
    snake
        .segments()
        .enumerate()
        .map(|(index, current)| match previous.get(index) {
            Some(prev) if (current.x - prev.x).abs() <= 1 && (current.y - prev.y).abs() <= 1 => {
                DrawPoint {
                    x: lerp(prev.x as f32, current.x as f32, fraction),
                    y: lerp(prev.y as f32, current.y as f32, fraction),
                }
            }
            _ => DrawPoint::at(*current),
        })
        .collect()
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
