use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::candy::{Candy, CandyKind, spawn_position};
use crate::config::{GameConfig, GridSize};
use crate::initials::InitialsEntry;
use crate::input::{Direction, GameInput};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, PlayerName};
use crate::snake::{Position, Snake};

/// Heading of a freshly started snake.
pub const START_DIRECTION: Direction = Direction::Right;

/// Current high-level lifecycle phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GamePhase {
    /// Waiting for the first start.
    Idle,
    Playing,
    Paused,
    /// Run ended; ready to restart.
    Over,
    /// Run ended with a qualifying score; initials are being entered.
    EnteringInitials,
}

/// Side effects of the simulation for the presentation layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    CandyEaten {
        candy_id: u64,
        position: Position,
        kind: CandyKind,
        points: u32,
    },
    RunEnded {
        score: u32,
        qualified: bool,
    },
}

/// What one call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Skipped,
    Moved,
    Ate { position: Position, points: u32 },
    /// The head would have hit the body; the run is over.
    Collided,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub candies: Vec<Candy>,
    pub score: u32,
    pub high_score: u32,
    pub phase: GamePhase,
    config: GameConfig,
    leaderboard: Leaderboard,
    initials: Option<InitialsEntry>,
    events: Vec<GameEvent>,
    next_candy_id: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates an idle state seeded from system entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let origin = start_position(config.grid());
        let leaderboard = Leaderboard::new(config.leaderboard_size);

        Self {
            snake: Snake::new(origin, START_DIRECTION),
            candies: Vec::new(),
            score: 0,
            high_score: 0,
            phase: GamePhase::Idle,
            config,
            leaderboard,
            initials: None,
            events: Vec::new(),
            next_candy_id: 0,
            rng,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.config.grid()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only leaderboard snapshot.
    #[must_use]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Replaces the leaderboard snapshot and raises the high score to its top.
    pub fn set_leaderboard(&mut self, leaderboard: Leaderboard) {
        if let Some(top) = leaderboard.top_score() {
            self.high_score = self.high_score.max(top);
        }
        self.leaderboard = leaderboard;
    }

    #[must_use]
    pub fn initials(&self) -> Option<&InitialsEntry> {
        self.initials.as_ref()
    }

    /// Resets everything owned by a run and enters `Playing`.
    pub fn start(&mut self) {
        self.snake = Snake::new(start_position(self.bounds()), START_DIRECTION);
        self.candies.clear();
        self.score = 0;
        self.initials = None;
        self.events.clear();
        for _ in 0..self.config.candy_count {
            self.spawn_candy();
        }
        self.phase = GamePhase::Playing;
        log::info!("run started with {} candies", self.candies.len());
    }

    /// Buffers a turn for the next tick. Only accepted while playing.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.snake.queue_direction(direction)
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Playing {
            return TickOutcome::Skipped;
        }

        self.snake.resolve_direction();
        let head = self.snake.next_head(self.bounds());

        if self.snake.occupies(head) {
            self.end_run();
            return TickOutcome::Collided;
        }

        let Some(index) = self.candies.iter().position(|candy| candy.position == head) else {
            self.snake.advance(head, false);
            return TickOutcome::Moved;
        };

        let candy = self.candies.remove(index);
        let points = candy.points();
        self.snake.advance(head, true);
        self.score = self.score.saturating_add(points);
        self.spawn_candy();
        self.events.push(GameEvent::CandyEaten {
            candy_id: candy.id,
            position: head,
            kind: candy.kind,
            points,
        });

        TickOutcome::Ate {
            position: head,
            points,
        }
    }

    /// Applies one external input event. Initials submission is handled by
    /// [`GameState::finish_initials`] because it needs the store.
    pub fn apply_input(&mut self, input: GameInput) {
        match (self.phase, input) {
            (GamePhase::Playing, GameInput::Direction(direction)) => {
                let _ = self.queue_direction(direction);
            }
            (GamePhase::EnteringInitials, GameInput::Direction(direction)) => {
                if let Some(initials) = self.initials.as_mut() {
                    match direction {
                        Direction::Up => initials.step_up(),
                        Direction::Down => initials.step_down(),
                        Direction::Left => initials.move_left(),
                        Direction::Right => initials.move_right(),
                    }
                }
            }
            (GamePhase::EnteringInitials, GameInput::Letter(letter)) => {
                if let Some(initials) = self.initials.as_mut() {
                    initials.type_letter(letter);
                }
            }
            (GamePhase::EnteringInitials, GameInput::Cancel) => {
                self.initials = None;
                self.phase = GamePhase::Over;
            }
            (GamePhase::Idle | GamePhase::Over, GameInput::Confirm | GameInput::Restart) => {
                self.start();
            }
            (GamePhase::Playing | GamePhase::Paused, GameInput::Confirm | GameInput::Pause) => {
                self.toggle_pause();
            }
            _ => {}
        }
    }

    /// Switches between `Playing` and `Paused`; other phases are untouched.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Leaves initials entry and returns the entry to record.
    ///
    /// Returns `None` outside the initials sub-phase.
    pub fn finish_initials(&mut self, timestamp: u64) -> Option<LeaderboardEntry> {
        if self.phase != GamePhase::EnteringInitials {
            return None;
        }
        let initials = self.initials.take()?;
        self.phase = GamePhase::Idle;

        let name = PlayerName::parse(&initials.name()).ok()?;
        self.high_score = self.high_score.max(self.score);
        Some(LeaderboardEntry {
            name,
            score: self.score,
            timestamp,
        })
    }

    /// Takes the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tick interval at the current score.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval(self.score)
    }

    /// Speed level shown to the player, starting at 1.
    #[must_use]
    pub fn speed_level(&self) -> u32 {
        1 + self.score / self.config.points_per_speed_step.max(1)
    }

    fn end_run(&mut self) {
        self.high_score = self.high_score.max(self.score);
        let qualified = self.leaderboard.qualifies(self.score);
        if qualified {
            self.initials = Some(InitialsEntry::new());
            self.phase = GamePhase::EnteringInitials;
        } else {
            self.phase = GamePhase::Over;
        }
        self.events.push(GameEvent::RunEnded {
            score: self.score,
            qualified,
        });
        log::info!(
            "run over: score {} length {} qualified {qualified}",
            self.score,
            self.snake.len()
        );
    }

    fn spawn_candy(&mut self) {
        let position = spawn_position(
            &mut self.rng,
            self.config.grid(),
            &self.snake,
            &self.candies,
            self.config.placement_attempts,
        );
        let kind = CandyKind::random(&mut self.rng);
        self.candies.push(Candy::new(self.next_candy_id, position, kind));
        self.next_candy_id += 1;
    }
}

fn start_position(bounds: GridSize) -> Position {
    Position {
        x: i32::from(bounds.width / 2),
        y: i32::from(bounds.height / 2),
    }
}
