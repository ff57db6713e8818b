use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Candy category. Each carries a fixed point value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CandyKind {
    Candy,
    Lollipop,
    Cookie,
    Donut,
    Chocolate,
    Dango,
    Cupcake,
    Shortcake,
    Custard,
    Cake,
}

impl CandyKind {
    pub const ALL: [Self; 10] = [
        Self::Candy,
        Self::Lollipop,
        Self::Donut,
        Self::Cupcake,
        Self::Cookie,
        Self::Chocolate,
        Self::Shortcake,
        Self::Cake,
        Self::Custard,
        Self::Dango,
    ];

    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Candy | Self::Lollipop | Self::Cookie => 10,
            Self::Donut | Self::Chocolate | Self::Dango => 15,
            Self::Cupcake | Self::Shortcake => 20,
            Self::Custard => 25,
            Self::Cake => 30,
        }
    }

    /// Value tier from 1 (10 points) to 5 (30 points).
    #[must_use]
    pub fn tier(self) -> u8 {
        match self.points() {
            10 => 1,
            15 => 2,
            20 => 3,
            25 => 4,
            _ => 5,
        }
    }

    /// Two-column glyph drawn on the board.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Candy => "🍬",
            Self::Lollipop => "🍭",
            Self::Cookie => "🍪",
            Self::Donut => "🍩",
            Self::Chocolate => "🍫",
            Self::Dango => "🍡",
            Self::Cupcake => "🧁",
            Self::Shortcake => "🍰",
            Self::Custard => "🍮",
            Self::Cake => "🎂",
        }
    }

    /// Picks a category uniformly at random.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Candy entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Candy {
    /// Unique for the lifetime of a session.
    pub id: u64,
    pub position: Position,
    pub kind: CandyKind,
}

impl Candy {
    #[must_use]
    pub fn new(id: u64, position: Position, kind: CandyKind) -> Self {
        Self { id, position, kind }
    }

    #[must_use]
    pub fn points(self) -> u32 {
        self.kind.points()
    }
}

/// Returns true if the snake or any candy occupies `position`.
#[must_use]
pub fn is_occupied(position: Position, snake: &Snake, candies: &[Candy]) -> bool {
    snake.occupies(position) || candies.iter().any(|candy| candy.position == position)
}

/// Samples random cells until one is free of the snake and `candies`.
///
/// After `attempts` samples the last one is accepted even if occupied, so a
/// nearly full board degrades to an overlap instead of looping forever.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    candies: &[Candy],
    attempts: u32,
) -> Position {
    let mut candidate = random_cell(rng, bounds);
    for _ in 1..attempts {
        if !is_occupied(candidate, snake, candies) {
            return candidate;
        }
        candidate = random_cell(rng, bounds);
    }

    if is_occupied(candidate, snake, candies) {
        log::debug!(
            "no free cell after {attempts} attempts; accepting overlap at ({}, {})",
            candidate.x,
            candidate.y
        );
    }
    candidate
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Position {
    Position {
        x: rng.gen_range(0..i32::from(bounds.width)),
        y: rng.gen_range(0..i32::from(bounds.height)),
    }
}
