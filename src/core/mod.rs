//! Core game value types: dice rolls and scoring categories

pub mod category;
pub mod dice;

pub use category::{Category, Section, CATEGORY_COUNT};
pub use dice::{Positions, Roll, RollAnalysis, DICE_COUNT, FACES};
