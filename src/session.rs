use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::candy::Candy;
use crate::config::{GameConfig, GridSize};
use crate::effects::{CHEERS, EffectFeed};
use crate::game::{GameEvent, GamePhase, GameState, TickOutcome};
use crate::initials::InitialsEntry;
use crate::input::{Direction, GameInput, InputMode};
use crate::interpolator::{DrawPoint, Interpolator};
use crate::leaderboard::{KeyValueStore, Leaderboard, now_timestamp_ms, submit_entry};

/// Read-only snapshot of everything the front end draws in one frame.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub now: Instant,
    pub phase: GamePhase,
    pub bounds: GridSize,
    /// Interpolated segment positions, head first.
    pub segments: Vec<DrawPoint>,
    pub direction: Direction,
    pub candies: &'a [Candy],
    pub score: u32,
    pub high_score: u32,
    pub speed_level: u32,
    pub snake_len: usize,
    pub leaderboard: &'a Leaderboard,
    pub initials: Option<&'a InitialsEntry>,
    pub effects: &'a EffectFeed,
}

/// One player's game: the simulation, its frame clock, transient effects,
/// and the store the leaderboard lives in.
pub struct Session {
    state: GameState,
    clock: Interpolator,
    effects: EffectFeed,
    store: Box<dyn KeyValueStore>,
    rng: StdRng,
}

impl Session {
    /// Builds an idle session and loads the leaderboard from `store`.
    #[must_use]
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>, seed: Option<u64>) -> Self {
        let (state, rng) = match seed {
            Some(seed) => (
                GameState::new_with_seed(config, seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (GameState::new(config), StdRng::from_entropy()),
        };
        Self::from_state(state, store, rng)
    }

    fn from_state(mut state: GameState, store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        let leaderboard = Leaderboard::load_from(&*store, state.config().leaderboard_size);
        state.set_leaderboard(leaderboard);

        Self {
            state,
            clock: Interpolator::new(),
            effects: EffectFeed::new(),
            store,
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for scripted scenarios and tests.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn clock(&self) -> &Interpolator {
        &self.clock
    }

    #[must_use]
    pub fn effects(&self) -> &EffectFeed {
        &self.effects
    }

    /// How raw keys should be mapped in the current phase.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        if self.state.phase == GamePhase::EnteringInitials {
            InputMode::TextEntry
        } else {
            InputMode::Steering
        }
    }

    /// Routes one input to the simulation. Inputs are buffered by the core and
    /// only take effect on the next tick.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        let before = self.state.phase;

        match (before, input) {
            (_, GameInput::Quit) => return,
            (GamePhase::EnteringInitials, GameInput::Confirm) => self.submit_initials(),
            _ => self.state.apply_input(input),
        }

        self.sync_clock(before, now);
    }

    /// Per-frame update: ticks when due, turns events into effects, and
    /// drops expired effects.
    pub fn update(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.clock.advance(&mut self.state, now);
        if outcome == TickOutcome::Collided {
            self.clock.stop();
        }

        for event in self.state.drain_events() {
            self.apply_event(event, now);
        }
        self.effects.prune(now);

        outcome
    }

    /// Current draw state. Pure read: call [`Session::update`] first.
    #[must_use]
    pub fn frame(&self, now: Instant) -> FrameView<'_> {
        FrameView {
            now,
            phase: self.state.phase,
            bounds: self.state.bounds(),
            segments: self.clock.draw_positions(&self.state.snake),
            direction: self.state.snake.direction(),
            candies: &self.state.candies,
            score: self.state.score,
            high_score: self.state.high_score,
            speed_level: self.state.speed_level(),
            snake_len: self.state.snake.len(),
            leaderboard: self.state.leaderboard(),
            initials: self.state.initials(),
            effects: &self.effects,
        }
    }

    /// Stops the frame clock and drops pending effects.
    pub fn shutdown(&mut self) {
        self.clock.stop();
        self.effects.clear();
    }

    fn submit_initials(&mut self) {
        let Some(entry) = self.state.finish_initials(now_timestamp_ms()) else {
            return;
        };
        log::info!("recording {} with {} points", entry.name, entry.score);
        let board = submit_entry(&mut *self.store, self.state.leaderboard(), entry);
        self.state.set_leaderboard(board);
    }

    fn sync_clock(&mut self, before: GamePhase, now: Instant) {
        let after = self.state.phase;
        match (before, after) {
            (GamePhase::Paused, GamePhase::Playing) => self.clock.resume(now),
            (previous, GamePhase::Playing) if previous != GamePhase::Playing => {
                self.effects.clear();
                self.clock.start(now, &self.state.snake);
            }
            (GamePhase::Playing, current) if current != GamePhase::Playing => self.clock.stop(),
            _ => {}
        }
    }

    fn apply_event(&mut self, event: GameEvent, now: Instant) {
        match event {
            GameEvent::CandyEaten {
                position, points, ..
            } => {
                let config = self.state.config();
                let (burst_ttl, message_ttl) = (config.burst_duration(), config.message_duration());
                let cheer = CHEERS[self.rng.gen_range(0..CHEERS.len())];
                self.effects.push_burst(position, now, burst_ttl);
                self.effects
                    .push_message(format!("+{points} {cheer}"), now, message_ttl);
            }
            GameEvent::RunEnded { score, qualified } => {
                log::debug!("run ended event: score {score}, qualified {qualified}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::candy::{Candy, CandyKind};
    use crate::config::GameConfig;
    use crate::effects::EffectKind;
    use crate::game::{GamePhase, TickOutcome};
    use crate::input::{Direction, GameInput, InputMode};
    use crate::leaderboard::{KeyValueStore, LEADERBOARD_KEY, MemoryStore};
    use crate::snake::{Position, Snake};

    use super::Session;

    fn session_with(store: MemoryStore) -> Session {
        Session::new(GameConfig::default(), Box::new(store), Some(99))
    }

    #[test]
    fn loads_high_score_from_store() {
        let mut store = MemoryStore::new();
        store
            .set(
                LEADERBOARD_KEY,
                r#"[{"name":"ACE","score":320,"timestamp":1}]"#,
            )
            .expect("memory store never fails");

        let session = session_with(store);

        assert_eq!(session.state().high_score, 320);
        assert_eq!(session.state().leaderboard().len(), 1);
        assert_eq!(session.state().phase, GamePhase::Idle);
    }

    #[test]
    fn confirm_starts_the_clock_and_pause_stops_it() {
        let mut session = session_with(MemoryStore::new());
        let start = Instant::now();

        session.handle_input(GameInput::Confirm, start);
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert!(session.clock().is_running());

        session.handle_input(GameInput::Confirm, start + Duration::from_millis(10));
        assert_eq!(session.state().phase, GamePhase::Paused);
        assert!(!session.clock().is_running());
        assert_eq!(
            session.update(start + Duration::from_secs(2)),
            TickOutcome::Skipped
        );

        session.handle_input(GameInput::Pause, start + Duration::from_secs(3));
        assert!(session.clock().is_running());
    }

    #[test]
    fn eating_produces_burst_and_message_that_expire() {
        let mut session = session_with(MemoryStore::new());
        let start = Instant::now();
        session.handle_input(GameInput::Confirm, start);
        session.state_mut().candies =
            vec![Candy::new(500, Position::new(11, 10), CandyKind::Cake)];

        let tick_time = start + Duration::from_millis(140);
        let outcome = session.update(tick_time);

        assert_eq!(
            outcome,
            TickOutcome::Ate {
                position: Position::new(11, 10),
                points: 30
            }
        );
        assert_eq!(session.effects().len(), 2);
        let message = session.effects().message().map(|effect| &effect.kind);
        assert!(matches!(
            message,
            Some(EffectKind::Message { text }) if text.starts_with("+30 ")
        ));

        // Pausing stops ticks but effects keep expiring.
        session.handle_input(GameInput::Pause, tick_time);
        session.update(tick_time + Duration::from_millis(650));
        assert_eq!(session.effects().len(), 1);
        session.update(tick_time + Duration::from_millis(850));
        assert!(session.effects().is_empty());
    }

    #[test]
    fn qualifying_run_is_submitted_and_persisted() {
        let mut session = session_with(MemoryStore::new());
        let start = Instant::now();
        session.handle_input(GameInput::Confirm, start);
        {
            let state = session.state_mut();
            state.candies.clear();
            state.score = 75;
            state.snake = Snake::from_segments(
                vec![
                    Position::new(5, 5),
                    Position::new(5, 6),
                    Position::new(6, 6),
                    Position::new(6, 5),
                    Position::new(6, 4),
                ],
                Direction::Up,
            );
        }
        session.handle_input(GameInput::Direction(Direction::Right), start);

        assert_eq!(
            session.update(start + Duration::from_millis(140)),
            TickOutcome::Collided
        );
        assert_eq!(session.state().phase, GamePhase::EnteringInitials);
        assert_eq!(session.input_mode(), InputMode::TextEntry);
        assert!(!session.clock().is_running());

        for letter in ['j', 'e', 'n'] {
            session.handle_input(GameInput::Letter(letter), start);
        }
        session.handle_input(GameInput::Confirm, start);

        assert_eq!(session.state().phase, GamePhase::Idle);
        let board = session.state().leaderboard();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries()[0].name.as_str(), "JEN");
        assert_eq!(board.entries()[0].score, 75);
        assert_eq!(session.state().high_score, 75);
    }

    #[test]
    fn frame_reports_interpolated_head() {
        let mut session = session_with(MemoryStore::new());
        let start = Instant::now();
        session.handle_input(GameInput::Confirm, start);
        session.state_mut().candies.clear();

        session.update(start + Duration::from_millis(140));
        let now = start + Duration::from_millis(210);
        session.update(now);
        let frame = session.frame(now);

        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.snake_len, 1);
        assert!((frame.segments[0].x - 10.5).abs() < 1e-3);
        assert!((frame.segments[0].y - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shutdown_clears_clock_and_effects() {
        let mut session = session_with(MemoryStore::new());
        let start = Instant::now();
        session.handle_input(GameInput::Confirm, start);
        session.state_mut().candies =
            vec![Candy::new(7, Position::new(11, 10), CandyKind::Candy)];
        session.update(start + Duration::from_millis(140));
        assert!(!session.effects().is_empty());

        session.shutdown();

        assert!(session.effects().is_empty());
        assert!(!session.clock().is_running());
    }
}
