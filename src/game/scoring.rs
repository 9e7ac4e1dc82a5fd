//! Per-category scoring rules
//!
//! Pure functions of (category, roll). Bonuses (upper section, Yahtzee bonus)
//! are not part of a single category score; the scorecard applies them.

use crate::core::{Category, Roll};
use std::collections::BTreeMap;

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YAHTZEE_SCORE: u32 = 50;

/// Score `roll` would earn in `category`
pub fn score(category: Category, roll: &Roll) -> u32 {
    if let Some(face) = category.face() {
        return roll.sum_of_face(face);
    }

    match category {
        Category::ThreeOfAKind if roll.has_at_least_n_of_a_kind(3) => roll.sum(),
        Category::FourOfAKind if roll.has_at_least_n_of_a_kind(4) => roll.sum(),
        Category::FullHouse if roll.is_full_house() => FULL_HOUSE_SCORE,
        Category::SmallStraight if roll.is_small_straight() => SMALL_STRAIGHT_SCORE,
        Category::LargeStraight if roll.is_large_straight() => LARGE_STRAIGHT_SCORE,
        Category::Yahtzee if roll.is_yahtzee() => YAHTZEE_SCORE,
        Category::Chance => roll.sum(),
        _ => 0,
    }
}

/// Score of `roll` in every category, in scorecard order
pub fn all_scores(roll: &Roll) -> BTreeMap<Category, u32> {
    Category::ALL.iter().map(|&c| (c, score(c, roll))).collect()
}
