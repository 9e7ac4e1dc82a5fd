//! Per-player scorecard ledger
//!
//! Holds one slot per category (unset until scored), the append-only log of
//! scoring events, and the Yahtzee bonus counter. Section totals and the grand
//! total are derived on demand from those; nothing is cached except the
//! latched "upper bonus earned" flag.

use crate::core::{Category, Roll, CATEGORY_COUNT};
use crate::game::scoring;
use crate::{Result, YahtzeeError};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;

/// Upper section subtotal needed for the upper bonus
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// Flat upper section bonus
pub const UPPER_BONUS: u32 = 35;

/// Award for each additional Yahtzee after the Yahtzee slot is filled
pub const YAHTZEE_BONUS: u32 = 100;

/// Maximum a single unfilled upper slot is assumed to contribute when judging
/// whether the upper bonus is still reachable
const UPPER_REACH_PER_SLOT: u32 = 5;

/// One scoring event in the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub category: Category,
    pub score: u32,
    /// The roll the score was taken from
    pub dice: Roll,
    /// True only for a Yahtzee bonus award
    pub is_bonus: bool,
}

/// Potential of the current roll in one open category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    pub score: u32,
    pub max_possible: u32,
    /// score / max_possible * 100, rounded to one decimal
    pub efficiency_percent: f64,
    pub is_optimal: bool,
}

/// Progress toward the upper section bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpperSectionProgress {
    pub current_total: u32,
    pub needed_for_bonus: u32,
    pub bonus_achievable: bool,
    pub available_categories: Vec<Category>,
    pub progress_percent: f64,
}

/// The four components of the grand total, plus the total itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub upper_section: u32,
    pub upper_bonus: u32,
    pub lower_section: u32,
    pub yahtzee_bonuses: u32,
    pub grand_total: u32,
}

/// Read-only export of a scorecard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardSummary {
    pub scores: BTreeMap<Category, Option<u32>>,
    pub yahtzee_bonuses: u32,
    pub upper_section_bonus_earned: bool,
    pub breakdown: ScoreBreakdown,
    pub is_complete: bool,
    pub entries: Vec<ScoreEntry>,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A single player's scorecard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    scores: [Option<u32>; CATEGORY_COUNT],
    entries: Vec<ScoreEntry>,
    yahtzee_bonuses: u32,
    /// Latched by `upper_section_bonus` once the threshold is reached
    upper_bonus_earned: Cell<bool>,
}

impl Scorecard {
    pub fn new() -> Self {
        Scorecard {
            scores: [None; CATEGORY_COUNT],
            entries: Vec::new(),
            yahtzee_bonuses: 0,
            upper_bonus_earned: Cell::new(false),
        }
    }

    pub fn is_available(&self, category: Category) -> bool {
        self.scores[category.index()].is_none()
    }

    /// Unfilled categories in scorecard order
    pub fn available_categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|&c| self.is_available(c))
            .collect()
    }

    pub fn category_score(&self, category: Category) -> Option<u32> {
        self.scores[category.index()]
    }

    /// Record `roll` in `category` and return the points awarded
    ///
    /// Scoring Yahtzee again with a genuine five of a kind after its slot is
    /// filled awards a 100-point bonus instead, leaving the slot untouched. The
    /// original fill does not have to have been a 50: a scratched (zero) Yahtzee
    /// slot still qualifies. Any other attempt on a filled slot fails with
    /// `CategoryAlreadyScored` before anything changes.
    pub fn score_category(&mut self, category: Category, roll: &Roll) -> Result<u32> {
        if !self.is_available(category) {
            if category == Category::Yahtzee && roll.is_yahtzee() {
                self.yahtzee_bonuses += 1;
                self.entries.push(ScoreEntry {
                    category,
                    score: YAHTZEE_BONUS,
                    dice: *roll,
                    is_bonus: true,
                });
                return Ok(YAHTZEE_BONUS);
            }
            return Err(YahtzeeError::CategoryAlreadyScored(category));
        }

        let points = scoring::score(category, roll);
        self.scores[category.index()] = Some(points);
        self.entries.push(ScoreEntry {
            category,
            score: points,
            dice: *roll,
            is_bonus: false,
        });
        Ok(points)
    }

    fn section_total(&self, categories: &[Category]) -> u32 {
        categories
            .iter()
            .map(|&c| self.category_score(c).unwrap_or(0))
            .sum()
    }

    pub fn upper_section_total(&self) -> u32 {
        self.section_total(&Category::UPPER)
    }

    /// 35 once the upper subtotal reaches 63, else 0
    ///
    /// Evaluating this latches `upper_bonus_earned`; the flag never clears.
    pub fn upper_section_bonus(&self) -> u32 {
        if self.upper_section_total() >= UPPER_BONUS_THRESHOLD {
            self.upper_bonus_earned.set(true);
            UPPER_BONUS
        } else {
            0
        }
    }

    pub fn upper_bonus_earned(&self) -> bool {
        self.upper_bonus_earned.get()
    }

    pub fn lower_section_total(&self) -> u32 {
        self.section_total(&Category::LOWER)
    }

    pub fn yahtzee_bonus_count(&self) -> u32 {
        self.yahtzee_bonuses
    }

    pub fn yahtzee_bonus_total(&self) -> u32 {
        self.yahtzee_bonuses * YAHTZEE_BONUS
    }

    pub fn grand_total(&self) -> u32 {
        self.upper_section_total()
            + self.upper_section_bonus()
            + self.lower_section_total()
            + self.yahtzee_bonus_total()
    }

    pub fn is_complete(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }

    /// Scoring events in the order they happened
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn score_breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            upper_section: self.upper_section_total(),
            upper_bonus: self.upper_section_bonus(),
            lower_section: self.lower_section_total(),
            yahtzee_bonuses: self.yahtzee_bonus_total(),
            grand_total: self.grand_total(),
        }
    }

    /// How well `roll` would do in each open category relative to its maximum
    pub fn expected_value_analysis(&self, roll: &Roll) -> BTreeMap<Category, CategoryAnalysis> {
        self.available_categories()
            .into_iter()
            .map(|category| {
                let score = scoring::score(category, roll);
                let max_possible = category.max_score();
                let efficiency = f64::from(score) / f64::from(max_possible) * 100.0;
                let analysis = CategoryAnalysis {
                    score,
                    max_possible,
                    efficiency_percent: round_one_decimal(efficiency),
                    is_optimal: score == max_possible,
                };
                (category, analysis)
            })
            .collect()
    }

    /// Where the upper section stands relative to the 63-point bonus line
    ///
    /// Reachability is judged as `needed <= open_upper_slots * 5`.
    pub fn upper_section_progress(&self) -> UpperSectionProgress {
        let current_total = self.upper_section_total();
        let needed_for_bonus = UPPER_BONUS_THRESHOLD.saturating_sub(current_total);
        let available_categories: Vec<Category> = Category::UPPER
            .iter()
            .copied()
            .filter(|&c| self.is_available(c))
            .collect();
        let reach = available_categories.len() as u32 * UPPER_REACH_PER_SLOT;
        let progress = f64::from(current_total) / f64::from(UPPER_BONUS_THRESHOLD) * 100.0;

        UpperSectionProgress {
            current_total,
            needed_for_bonus,
            bonus_achievable: needed_for_bonus <= reach,
            available_categories,
            progress_percent: round_one_decimal(progress),
        }
    }

    pub fn summary(&self) -> ScorecardSummary {
        ScorecardSummary {
            scores: Category::ALL
                .iter()
                .map(|&c| (c, self.category_score(c)))
                .collect(),
            yahtzee_bonuses: self.yahtzee_bonuses,
            breakdown: self.score_breakdown(),
            upper_section_bonus_earned: self.upper_bonus_earned(),
            is_complete: self.is_complete(),
            entries: self.entries.clone(),
        }
    }
}

impl Default for Scorecard {
    fn default() -> Self {
        Self::new()
    }
}
