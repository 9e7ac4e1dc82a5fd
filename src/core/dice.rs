//! Five-die roll value object and its classification queries

use crate::{Result, YahtzeeError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Number of dice in a roll
pub const DICE_COUNT: usize = 5;

/// Number of faces on each die
pub const FACES: u8 = 6;

/// Die positions (0-based indices into a roll)
pub type Positions = SmallVec<[usize; DICE_COUNT]>;

const SMALL_STRAIGHTS: [[u8; 4]; 3] = [[1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]];
const LARGE_STRAIGHTS: [[u8; 5]; 2] = [[1, 2, 3, 4, 5], [2, 3, 4, 5, 6]];

/// An immutable roll of exactly five dice, each showing 1..=6
///
/// Order is preserved: positions matter for re-rolls. A new `Roll` is built
/// after every re-roll; nothing here mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Roll {
    dice: [u8; DICE_COUNT],
}

impl Roll {
    /// Build a roll, rejecting anything that is not five values in 1..=6
    pub fn new(values: &[u8]) -> Result<Self> {
        if values.len() != DICE_COUNT {
            return Err(YahtzeeError::InvalidRoll(format!(
                "expected {DICE_COUNT} dice, got {}",
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !(1..=FACES).contains(*v)) {
            return Err(YahtzeeError::InvalidRoll(format!(
                "die value {bad} outside 1..={FACES}"
            )));
        }
        let mut dice = [0u8; DICE_COUNT];
        dice.copy_from_slice(values);
        Ok(Roll { dice })
    }

    /// Die values in position order
    pub fn values(&self) -> &[u8; DICE_COUNT] {
        &self.dice
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.dice.get(position).copied()
    }

    /// Occurrences per face, indexed by face value (index 0 unused)
    fn face_counts(&self) -> [u8; FACES as usize + 1] {
        let mut counts = [0u8; FACES as usize + 1];
        for &d in &self.dice {
            counts[d as usize] += 1;
        }
        counts
    }

    /// Face value -> occurrence count, only for faces present
    pub fn counts(&self) -> BTreeMap<u8, u8> {
        self.face_counts()
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(face, &n)| (face as u8, n))
            .collect()
    }

    /// Distinct face values in the roll
    pub fn unique_values(&self) -> BTreeSet<u8> {
        self.dice.iter().copied().collect()
    }

    pub fn count_of(&self, face: u8) -> u8 {
        self.dice.iter().filter(|&&d| d == face).count() as u8
    }

    pub fn highest_count(&self) -> u8 {
        self.face_counts().iter().copied().max().unwrap_or(0)
    }

    pub fn has_at_least_n_of_a_kind(&self, n: u8) -> bool {
        self.highest_count() >= n
    }

    /// Exactly two distinct values in a 3/2 split. Four or five of a kind is not
    /// a full house.
    pub fn is_full_house(&self) -> bool {
        let mut counts: SmallVec<[u8; DICE_COUNT]> =
            self.face_counts().iter().copied().filter(|&n| n > 0).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        counts.as_slice() == [3, 2]
    }

    pub fn is_small_straight(&self) -> bool {
        let unique = self.unique_values();
        SMALL_STRAIGHTS
            .iter()
            .any(|run| run.iter().all(|v| unique.contains(v)))
    }

    pub fn is_large_straight(&self) -> bool {
        let unique = self.unique_values();
        LARGE_STRAIGHTS
            .iter()
            .any(|run| unique.len() == run.len() && run.iter().all(|v| unique.contains(v)))
    }

    pub fn is_yahtzee(&self) -> bool {
        self.face_counts().contains(&5)
    }

    pub fn sum(&self) -> u32 {
        self.dice.iter().map(|&d| u32::from(d)).sum()
    }

    /// Sum of the dice showing `face`
    pub fn sum_of_face(&self, face: u8) -> u32 {
        u32::from(face) * u32::from(self.count_of(face))
    }

    /// Positions of every die showing `face`, ascending
    pub fn positions_of(&self, face: u8) -> Positions {
        self.dice
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == face)
            .map(|(i, _)| i)
            .collect()
    }

    /// Resolve a multiset of face values to distinct die positions
    ///
    /// Requests are processed in order; each claims the leftmost occurrence of
    /// its value not already claimed by an earlier request. The result is sorted
    /// ascending. Fails with `ValueNotPresent` when a request has no unclaimed
    /// occurrence left.
    pub fn resolve_keep_values(&self, values: &[u8]) -> Result<Positions> {
        let mut claimed = [false; DICE_COUNT];
        let mut positions = Positions::new();
        for &value in values {
            let pos = self
                .dice
                .iter()
                .enumerate()
                .position(|(i, &d)| d == value && !claimed[i])
                .ok_or(YahtzeeError::ValueNotPresent(value))?;
            claimed[pos] = true;
            positions.push(pos);
        }
        positions.sort_unstable();
        Ok(positions)
    }

    /// Snapshot of every classification query at once
    pub fn analyze(&self) -> RollAnalysis {
        RollAnalysis {
            values: self.dice,
            counts: self.counts(),
            unique_count: self.unique_values().len(),
            highest_count: self.highest_count(),
            has_pair: self.has_at_least_n_of_a_kind(2),
            has_three_kind: self.has_at_least_n_of_a_kind(3),
            has_four_kind: self.has_at_least_n_of_a_kind(4),
            has_yahtzee: self.is_yahtzee(),
            has_full_house: self.is_full_house(),
            has_small_straight: self.is_small_straight(),
            has_large_straight: self.is_large_straight(),
            sum: self.sum(),
        }
    }
}

impl TryFrom<Vec<u8>> for Roll {
    type Error = YahtzeeError;

    fn try_from(values: Vec<u8>) -> Result<Self> {
        Roll::new(&values)
    }
}

impl TryFrom<[u8; DICE_COUNT]> for Roll {
    type Error = YahtzeeError;

    fn try_from(values: [u8; DICE_COUNT]) -> Result<Self> {
        Roll::new(&values)
    }
}

impl From<Roll> for Vec<u8> {
    fn from(roll: Roll) -> Self {
        roll.dice.to_vec()
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]", faces.join(" "))
    }
}

/// Every classification of a roll, for display and export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollAnalysis {
    pub values: [u8; DICE_COUNT],
    pub counts: BTreeMap<u8, u8>,
    pub unique_count: usize,
    pub highest_count: u8,
    pub has_pair: bool,
    pub has_three_kind: bool,
    pub has_four_kind: bool,
    pub has_yahtzee: bool,
    pub has_full_house: bool,
    pub has_small_straight: bool,
    pub has_large_straight: bool,
    pub sum: u32,
}
