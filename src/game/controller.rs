//! Player controller interface
//!
//! A controller makes the two decisions a turn needs: which dice to hold
//! before each re-roll, and which category to score. It sees the turn through
//! a read-only `TurnView` and never touches the engine or the dice RNG.

use crate::core::{Category, Positions, Roll};
use crate::game::keep_advisor::recommend_keep;
use crate::game::scorecard::{CategoryAnalysis, Scorecard};
use crate::game::{GameLogger, KeepRequest, TurnEngine, TurnPhase};
use std::collections::BTreeMap;

/// Read-only view of one player's turn
pub struct TurnView<'a> {
    engine: &'a TurnEngine,
    player_name: &'a str,
    logger: &'a GameLogger,
}

impl<'a> TurnView<'a> {
    pub fn new(engine: &'a TurnEngine, player_name: &'a str, logger: &'a GameLogger) -> Self {
        TurnView {
            engine,
            player_name,
            logger,
        }
    }

    pub fn player_name(&self) -> &str {
        self.player_name
    }

    pub fn logger(&self) -> &GameLogger {
        self.logger
    }

    pub fn phase(&self) -> TurnPhase {
        self.engine.phase()
    }

    pub fn current_roll(&self) -> Option<&Roll> {
        self.engine.current_roll()
    }

    pub fn roll_count(&self) -> u8 {
        self.engine.roll_count()
    }

    pub fn can_roll(&self) -> bool {
        self.engine.can_roll()
    }

    pub fn scorecard(&self) -> &Scorecard {
        self.engine.scorecard()
    }

    pub fn available_categories(&self) -> Vec<Category> {
        self.engine.scorecard().available_categories()
    }

    /// Scores the current roll would earn in each open category
    pub fn possible_scores(&self) -> BTreeMap<Category, u32> {
        self.engine.possible_scores()
    }

    /// True if scoring Yahtzee now would award the Yahtzee bonus
    pub fn yahtzee_bonus_available(&self) -> bool {
        !self.engine.scorecard().is_available(Category::Yahtzee)
            && self.current_roll().is_some_and(|r| r.is_yahtzee())
    }

    /// Efficiency of the current roll in each open category (empty before the
    /// first roll)
    pub fn expected_value_analysis(&self) -> BTreeMap<Category, CategoryAnalysis> {
        match self.current_roll() {
            Some(roll) => self.engine.scorecard().expected_value_analysis(roll),
            None => BTreeMap::new(),
        }
    }

    /// Keep advice for `target` on the current roll (empty before the first
    /// roll)
    pub fn recommend_keep(&self, target: Category) -> Positions {
        self.current_roll()
            .map(|roll| recommend_keep(roll, target))
            .unwrap_or_default()
    }
}

/// Decision-maker for one seat
///
/// Implementations must always return a decision. `choose_keep` returning
/// `None` ends the rolling phase; `choose_category` is called once per turn
/// after the rolling phase.
pub trait PlayerController {
    /// Short tag used in controller log lines (e.g. "RANDOM")
    fn name(&self) -> &str;

    /// Dice to hold for the next re-roll, or `None` to stop rolling
    ///
    /// Only called while the engine can still roll.
    fn choose_keep(&mut self, view: &TurnView) -> Option<KeepRequest>;

    /// Category to score the current roll in
    ///
    /// The returned category should be open, or Yahtzee when a bonus is
    /// available; anything else makes the engine reject the turn.
    fn choose_category(&mut self, view: &TurnView) -> Category;

    /// Called once with the final scorecard when the game ends
    fn on_game_end(&mut self, _scorecard: &Scorecard, _won: bool) {}
}

/// First open category, or Yahtzee when every slot is filled
pub(crate) fn first_open_category(view: &TurnView) -> Category {
    view.available_categories()
        .first()
        .copied()
        .unwrap_or(Category::Yahtzee)
}
