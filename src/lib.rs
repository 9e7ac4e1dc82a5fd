//! Yahtzee Engine - rules engine for the five-dice scoring game
//!
//! The rules core (dice, scoring, scorecard, turn state machine, keep advice)
//! lives in `core` and `game`. Controllers, the multi-seat game loop and the
//! logger sit on top of it and never mutate a scorecard except through a
//! turn engine.

pub mod core;
pub mod error;
pub mod game;
pub mod simulation;

pub use error::{Result, YahtzeeError};
