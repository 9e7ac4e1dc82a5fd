//! Scoring categories and their canonical rule table
//!
//! Every per-category constant (face value, maximum attainable score, section,
//! display names) lives in `CATEGORY_TABLE`. Scoring, keep advice and
//! expected-value analysis all read from here instead of carrying their own
//! copies.

use crate::{Result, YahtzeeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of scoring categories on a scorecard
pub const CATEGORY_COUNT: usize = 13;

/// Scorecard section a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Face-value categories (Ones through Sixes)
    Upper,
    /// Combination categories (Three of a Kind through Chance)
    Lower,
}

/// One of the thirteen scoring slots, in scorecard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

struct CategoryInfo {
    name: &'static str,
    label: &'static str,
    face: Option<u8>,
    max_score: u32,
}

const CATEGORY_TABLE: [CategoryInfo; CATEGORY_COUNT] = [
    CategoryInfo { name: "ones", label: "Ones", face: Some(1), max_score: 5 },
    CategoryInfo { name: "twos", label: "Twos", face: Some(2), max_score: 10 },
    CategoryInfo { name: "threes", label: "Threes", face: Some(3), max_score: 15 },
    CategoryInfo { name: "fours", label: "Fours", face: Some(4), max_score: 20 },
    CategoryInfo { name: "fives", label: "Fives", face: Some(5), max_score: 25 },
    CategoryInfo { name: "sixes", label: "Sixes", face: Some(6), max_score: 30 },
    CategoryInfo { name: "three_of_a_kind", label: "Three of a Kind", face: None, max_score: 30 },
    CategoryInfo { name: "four_of_a_kind", label: "Four of a Kind", face: None, max_score: 30 },
    CategoryInfo { name: "full_house", label: "Full House", face: None, max_score: 25 },
    CategoryInfo { name: "small_straight", label: "Small Straight", face: None, max_score: 30 },
    CategoryInfo { name: "large_straight", label: "Large Straight", face: None, max_score: 40 },
    CategoryInfo { name: "yahtzee", label: "Yahtzee", face: None, max_score: 50 },
    CategoryInfo { name: "chance", label: "Chance", face: None, max_score: 30 },
];

impl Category {
    /// All categories in scorecard order
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Upper section categories (Ones..Sixes)
    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    /// Lower section categories
    pub const LOWER: [Category; 7] = [
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Position of this category in `Category::ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Category> {
        Category::ALL.get(index).copied()
    }

    fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self.index()]
    }

    /// Face value an upper category counts (None for lower categories)
    pub fn face(self) -> Option<u8> {
        self.info().face
    }

    /// Maximum attainable score for a single roll in this category
    ///
    /// Upper categories max out at five of their face. Lower categories use
    /// fixed reference values (30 for the sum-based ones).
    pub fn max_score(self) -> u32 {
        self.info().max_score
    }

    pub fn section(self) -> Section {
        if self.face().is_some() {
            Section::Upper
        } else {
            Section::Lower
        }
    }

    pub fn is_upper(self) -> bool {
        self.section() == Section::Upper
    }

    /// Machine name (snake_case), as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        self.info().label
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = YahtzeeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| YahtzeeError::UnknownCategory(s.to_string()))
    }
}
