use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use crate::snake::Position;

/// Sparkles emitted per consumption burst.
pub const SPARKLES_PER_BURST: usize = 6;

const SPARKLE_GLYPHS: [&str; SPARKLES_PER_BURST] = ["✨", "⭐", "💖", "🌟", "💫", "🎀"];

/// Cheers appended to the points in a consumption message.
pub const CHEERS: [&str; 6] = [
    "Yummy!",
    "Sweet!",
    "Tasty!",
    "Nom nom!",
    "Delish!",
    "Sugar rush!",
];

/// Identifies one transient effect.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EffectId(u64);

/// One particle of a burst, flying out from the burst origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    /// Radians, evenly spaced around the origin.
    pub angle: f32,
    pub glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    Burst {
        origin: Position,
        sparkles: [Sparkle; SPARKLES_PER_BURST],
    },
    Message {
        text: String,
    },
}

/// A transient effect with its own expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Effect {
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.ttl
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }

    /// Fraction of the lifetime elapsed at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.ttl.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.created_at);
        (elapsed.as_secs_f32() / self.ttl.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Live transient effects, pruned against the clock each frame.
#[derive(Debug, Clone, Default)]
pub struct EffectFeed {
    next_id: u64,
    effects: Vec<Effect>,
}

impl EffectFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds a ring of sparkles at `origin`.
    pub fn push_burst(&mut self, origin: Position, now: Instant, ttl: Duration) -> EffectId {
        let sparkles = std::array::from_fn(|i| Sparkle {
            angle: TAU * i as f32 / SPARKLES_PER_BURST as f32,
            glyph: SPARKLE_GLYPHS[i],
        });
        let id = self.allocate_id();
        self.effects.push(Effect {
            id,
            kind: EffectKind::Burst { origin, sparkles },
            created_at: now,
            ttl,
        });
        id
    }

    /// Shows `text`, replacing any message still on screen.
    pub fn push_message(&mut self, text: String, now: Instant, ttl: Duration) -> EffectId {
        self.effects
            .retain(|effect| !matches!(effect.kind, EffectKind::Message { .. }));
        let id = self.allocate_id();
        self.effects.push(Effect {
            id,
            kind: EffectKind::Message { text },
            created_at: now,
            ttl,
        });
        id
    }

    /// Drops every effect whose expiry is at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.effects.retain(|effect| !effect.is_expired(now));
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// The message currently on screen, if any.
    #[must_use]
    pub fn message(&self) -> Option<&Effect> {
        self.effects
            .iter()
            .find(|effect| matches!(effect.kind, EffectKind::Message { .. }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{EffectFeed, EffectKind, SPARKLES_PER_BURST};
    use crate::snake::Position;

    const BURST: Duration = Duration::from_millis(600);
    const MESSAGE: Duration = Duration::from_millis(800);

    #[test]
    fn overlapping_bursts_expire_independently() {
        let start = Instant::now();
        let mut feed = EffectFeed::new();

        let first = feed.push_burst(Position::new(1, 1), start, BURST);
        let second = feed.push_burst(Position::new(1, 1), start + Duration::from_millis(300), BURST);
        assert_ne!(first, second);

        feed.prune(start + Duration::from_millis(600));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.iter().next().map(|effect| effect.id), Some(second));

        feed.prune(start + Duration::from_millis(900));
        assert!(feed.is_empty());
    }

    #[test]
    fn burst_has_evenly_spaced_sparkles() {
        let mut feed = EffectFeed::new();
        feed.push_burst(Position::new(3, 4), Instant::now(), BURST);

        let Some(EffectKind::Burst { origin, sparkles }) = feed.iter().next().map(|e| &e.kind)
        else {
            panic!("expected a burst");
        };

        assert_eq!(*origin, Position::new(3, 4));
        assert_eq!(sparkles.len(), SPARKLES_PER_BURST);
        assert!(sparkles[0].angle.abs() < f32::EPSILON);
        assert!((sparkles[3].angle - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn new_message_replaces_the_old_one() {
        let now = Instant::now();
        let mut feed = EffectFeed::new();

        feed.push_message("+10 Yummy!".to_owned(), now, MESSAGE);
        feed.push_burst(Position::new(0, 0), now, BURST);
        feed.push_message("+30 Sweet!".to_owned(), now, MESSAGE);

        assert_eq!(feed.len(), 2);
        let text = feed.message().and_then(|effect| match &effect.kind {
            EffectKind::Message { text } => Some(text.as_str()),
            EffectKind::Burst { .. } => None,
        });
        assert_eq!(text, Some("+30 Sweet!"));
    }

    #[test]
    fn ids_are_never_reused() {
        let now = Instant::now();
        let mut feed = EffectFeed::new();
        let first = feed.push_burst(Position::new(0, 0), now, BURST);
        feed.clear();
        let second = feed.push_burst(Position::new(0, 0), now, BURST);

        assert_ne!(first, second);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn progress_runs_from_zero_to_one() {
        let now = Instant::now();
        let mut feed = EffectFeed::new();
        feed.push_burst(Position::new(0, 0), now, BURST);
        let effect = feed.iter().next().expect("burst was pushed");

        assert!(effect.progress(now) < f32::EPSILON);
        assert!((effect.progress(now + Duration::from_millis(300)) - 0.5).abs() < 1e-3);
        assert!((effect.progress(now + Duration::from_secs(5)) - 1.0).abs() < f32::EPSILON);
    }
}
