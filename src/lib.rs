//! Candy Snake: a toroidal Snake whose discrete simulation is drawn smoothly
//! between ticks.
//!
//! [`game::GameState`] is the simulation core, [`interpolator::Interpolator`]
//! schedules its ticks from display refreshes, and [`session::Session`] ties
//! both to transient effects and the persisted leaderboard.

pub mod candy;
pub mod config;
pub mod effects;
pub mod error;
pub mod game;
pub mod initials;
pub mod input;
pub mod interpolator;
pub mod leaderboard;
pub mod renderer;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
