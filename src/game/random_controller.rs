//! Random controller for testing and baseline play
//!
//! Holds a random subset of dice on each re-roll and scores a random open
//! category. A five of a kind that would earn the Yahtzee bonus is always
//! taken. Seeded, so two runs with the same seed make the same choices.

use crate::core::{Category, DICE_COUNT};
use crate::game::controller::{PlayerController, TurnView};
use crate::game::KeepRequest;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Chance of ending the rolling phase early, out of 4
const STOP_ODDS: u32 = 1;

pub struct RandomController {
    rng: ChaCha12Rng,
}

impl RandomController {
    /// Seeded random controller (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        RandomController {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn name(&self) -> &str {
        "RANDOM"
    }

    fn choose_keep(&mut self, view: &TurnView) -> Option<KeepRequest> {
        if view.yahtzee_bonus_available() {
            view.logger()
                .controller_choice(self.name(), "stops rolling on a bonus Yahtzee");
            return None;
        }
        if self.rng.gen_ratio(STOP_ODDS, 4) {
            view.logger().controller_choice(self.name(), "stops rolling");
            return None;
        }

        let keep = KeepRequest::positions((0..DICE_COUNT).filter(|_| self.rng.gen_bool(0.5)));
        view.logger()
            .controller_choice(self.name(), &format!("keeps {:?}", keep));
        Some(keep)
    }

    fn choose_category(&mut self, view: &TurnView) -> Category {
        let category = if view.yahtzee_bonus_available() {
            Category::Yahtzee
        } else {
            view.available_categories()
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Category::Yahtzee)
        };
        view.logger()
            .controller_choice(self.name(), &format!("scores {}", category));
        category
    }
}
