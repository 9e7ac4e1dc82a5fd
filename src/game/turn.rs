//! Turn state machine: roll, up to two re-rolls, then score
//!
//! States are `Idle` (no roll yet) -> `Rolled(n)` with n in 1..=3 ->
//! `Complete`. Every rejected call leaves the engine exactly as it was.
//!
//! Dice are drawn from a caller-supplied RNG so games can be replayed from a
//! seed. The engine owns its player's `Scorecard` and only hands out shared
//! references to it; scoring goes through `score_turn`.

use crate::core::{Category, Positions, Roll, DICE_COUNT, FACES};
use crate::game::scorecard::Scorecard;
use crate::game::scoring;
use crate::{Result, YahtzeeError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Rolls allowed per turn (the first roll plus two re-rolls)
pub const MAX_ROLLS: u8 = 3;

/// Where a turn currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Turn started, nothing rolled yet
    Idle,
    /// Dice rolled this many times (1..=3)
    Rolled(u8),
    /// A category has been scored for this turn
    Complete,
}

/// Which dice to hold on a re-roll
///
/// Positions are 0-based indices into the current roll. Values are matched to
/// positions with `Roll::resolve_keep_values` (leftmost unclaimed occurrence
/// per requested value, in request order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepRequest {
    Positions(Positions),
    Values(SmallVec<[u8; DICE_COUNT]>),
}

impl KeepRequest {
    /// Keep nothing: re-roll all five dice
    pub fn none() -> Self {
        KeepRequest::Positions(Positions::new())
    }

    pub fn positions(positions: impl IntoIterator<Item = usize>) -> Self {
        KeepRequest::Positions(positions.into_iter().collect())
    }

    pub fn values(values: impl IntoIterator<Item = u8>) -> Self {
        KeepRequest::Values(values.into_iter().collect())
    }

    /// Resolve to a sorted, de-duplicated set of positions within `roll`
    pub fn resolve(&self, roll: &Roll) -> Result<Positions> {
        match self {
            KeepRequest::Positions(positions) => {
                if positions.len() > DICE_COUNT {
                    return Err(YahtzeeError::InvalidKeepSet(format!(
                        "{} positions requested, at most {DICE_COUNT} allowed",
                        positions.len()
                    )));
                }
                if let Some(bad) = positions.iter().find(|&&p| p >= DICE_COUNT) {
                    return Err(YahtzeeError::InvalidKeepSet(format!(
                        "position {bad} outside 0..={}",
                        DICE_COUNT - 1
                    )));
                }
                let mut resolved = positions.clone();
                resolved.sort_unstable();
                resolved.dedup();
                Ok(resolved)
            }
            KeepRequest::Values(values) => {
                if values.len() > DICE_COUNT {
                    return Err(YahtzeeError::InvalidKeepSet(format!(
                        "{} values requested, at most {DICE_COUNT} allowed",
                        values.len()
                    )));
                }
                if let Some(bad) = values.iter().find(|v| !(1..=FACES).contains(*v)) {
                    return Err(YahtzeeError::InvalidKeepSet(format!(
                        "die value {bad} outside 1..={FACES}"
                    )));
                }
                roll.resolve_keep_values(values)
            }
        }
    }
}

impl Default for KeepRequest {
    fn default() -> Self {
        KeepRequest::none()
    }
}

/// Result of a successful `roll_dice`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub roll: Roll,
    pub roll_number: u8,
    pub can_reroll: bool,
}

/// Result of a successful `score_turn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub category: Category,
    pub points: u32,
    /// The points were a Yahtzee bonus rather than a slot fill
    pub bonus: bool,
    /// This score completed the scorecard
    pub game_complete: bool,
}

fn roll_fresh<R: Rng + ?Sized>(rng: &mut R) -> Result<Roll> {
    let mut dice = [0u8; DICE_COUNT];
    for die in dice.iter_mut() {
        *die = rng.gen_range(1..=FACES);
    }
    Roll::new(&dice)
}

/// One player's turn sequencing, bound to that player's scorecard
///
/// Deserialization goes through `TurnSnapshot` and rejects snapshots whose
/// roll, roll count and completion flag disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TurnSnapshot")]
pub struct TurnEngine {
    scorecard: Scorecard,
    current_roll: Option<Roll>,
    roll_count: u8,
    turn_complete: bool,
}

/// Unchecked serialized form of a `TurnEngine`
#[derive(Deserialize)]
struct TurnSnapshot {
    scorecard: Scorecard,
    current_roll: Option<Roll>,
    roll_count: u8,
    turn_complete: bool,
}

impl TryFrom<TurnSnapshot> for TurnEngine {
    type Error = YahtzeeError;

    fn try_from(snapshot: TurnSnapshot) -> Result<Self> {
        if snapshot.roll_count > MAX_ROLLS {
            return Err(YahtzeeError::InvalidTurnState(format!(
                "roll count {} exceeds {MAX_ROLLS}",
                snapshot.roll_count
            )));
        }
        if snapshot.current_roll.is_some() != (snapshot.roll_count > 0) {
            return Err(YahtzeeError::InvalidTurnState(format!(
                "roll count {} does not match {} current roll",
                snapshot.roll_count,
                if snapshot.current_roll.is_some() { "a" } else { "no" }
            )));
        }
        if snapshot.turn_complete && snapshot.current_roll.is_none() {
            return Err(YahtzeeError::InvalidTurnState(
                "turn complete without a roll".to_string(),
            ));
        }
        Ok(TurnEngine {
            scorecard: snapshot.scorecard,
            current_roll: snapshot.current_roll,
            roll_count: snapshot.roll_count,
            turn_complete: snapshot.turn_complete,
        })
    }
}

impl TurnEngine {
    /// New engine over an empty scorecard, ready for its first roll
    pub fn new() -> Self {
        Self::with_scorecard(Scorecard::new())
    }

    /// New engine resuming an existing scorecard
    pub fn with_scorecard(scorecard: Scorecard) -> Self {
        TurnEngine {
            scorecard,
            current_roll: None,
            roll_count: 0,
            turn_complete: false,
        }
    }

    /// Reset to `Idle`, discarding any roll in progress
    pub fn start_turn(&mut self) {
        self.current_roll = None;
        self.roll_count = 0;
        self.turn_complete = false;
    }

    /// Roll (from `Idle`) or re-roll every die not held by `keep`
    ///
    /// The keep request is ignored on the first roll of a turn. Checks run in
    /// order: turn complete, roll limit, keep set validity.
    pub fn roll_dice<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        keep: &KeepRequest,
    ) -> Result<RollOutcome> {
        if self.turn_complete {
            return Err(YahtzeeError::TurnAlreadyComplete);
        }
        if self.roll_count >= MAX_ROLLS {
            return Err(YahtzeeError::MaxRollsExceeded(MAX_ROLLS));
        }

        let roll = match self.current_roll {
            None => roll_fresh(rng)?,
            Some(previous) => {
                let kept = keep.resolve(&previous)?;
                let mut dice = *previous.values();
                for (position, die) in dice.iter_mut().enumerate() {
                    if !kept.contains(&position) {
                        *die = rng.gen_range(1..=FACES);
                    }
                }
                Roll::new(&dice)?
            }
        };

        self.current_roll = Some(roll);
        self.roll_count += 1;

        Ok(RollOutcome {
            roll,
            roll_number: self.roll_count,
            can_reroll: self.can_roll(),
        })
    }

    /// Commit the current roll to `category` on the scorecard
    pub fn score_turn(&mut self, category: Category) -> Result<ScoreOutcome> {
        if self.turn_complete {
            return Err(YahtzeeError::TurnAlreadyComplete);
        }
        let roll = self.current_roll.ok_or(YahtzeeError::NoRollYet)?;

        let points = self.scorecard.score_category(category, &roll)?;
        let bonus = self
            .scorecard
            .entries()
            .last()
            .is_some_and(|entry| entry.is_bonus);
        self.turn_complete = true;

        Ok(ScoreOutcome {
            category,
            points,
            bonus,
            game_complete: self.scorecard.is_complete(),
        })
    }

    pub fn phase(&self) -> TurnPhase {
        if self.turn_complete {
            TurnPhase::Complete
        } else if self.roll_count == 0 {
            TurnPhase::Idle
        } else {
            TurnPhase::Rolled(self.roll_count)
        }
    }

    pub fn can_roll(&self) -> bool {
        !self.turn_complete && self.roll_count < MAX_ROLLS
    }

    pub fn current_roll(&self) -> Option<&Roll> {
        self.current_roll.as_ref()
    }

    pub fn roll_count(&self) -> u8 {
        self.roll_count
    }

    pub fn is_turn_complete(&self) -> bool {
        self.turn_complete
    }

    pub fn is_game_complete(&self) -> bool {
        self.scorecard.is_complete()
    }

    /// Preview of the current roll in every still-open category
    ///
    /// Empty before the first roll of a turn.
    pub fn possible_scores(&self) -> BTreeMap<Category, u32> {
        let Some(roll) = self.current_roll else {
            return BTreeMap::new();
        };
        scoring::all_scores(&roll)
            .into_iter()
            .filter(|(category, _)| self.scorecard.is_available(*category))
            .collect()
    }

    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    pub fn into_scorecard(self) -> Scorecard {
        self.scorecard
    }

    #[cfg(test)]
    pub(crate) fn force_roll(&mut self, roll: Roll, roll_count: u8) {
        self.current_roll = Some(roll);
        self.roll_count = roll_count;
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn roll(values: [u8; 5]) -> Roll {
        Roll::new(&values).unwrap()
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = TurnEngine::new();
        assert_eq!(engine.phase(), TurnPhase::Idle);
        assert!(engine.can_roll());
        assert!(engine.current_roll().is_none());
        assert!(engine.possible_scores().is_empty());
    }

    #[test]
    fn test_roll_sequence_and_limit() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut engine = TurnEngine::new();

        let first = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
        assert_eq!(first.roll_number, 1);
        assert!(first.can_reroll);
        assert_eq!(engine.phase(), TurnPhase::Rolled(1));

        engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
        let third = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
        assert_eq!(third.roll_number, 3);
        assert!(!third.can_reroll);
        assert!(!engine.can_roll());

        let before = *engine.current_roll().unwrap();
        let err = engine.roll_dice(&mut rng, &KeepRequest::none());
        assert!(matches!(err, Err(YahtzeeError::MaxRollsExceeded(3))));
        assert_eq!(engine.phase(), TurnPhase::Rolled(3));
        assert_eq!(*engine.current_roll().unwrap(), before);
    }

    #[test]
    fn test_reroll_draws_only_unkept_positions() {
        let mut rng = ChaCha12Rng::seed_from_u64(99);
        let mut mirror = ChaCha12Rng::seed_from_u64(99);
        let mut engine = TurnEngine::new();

        let first = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap().roll;
        let expected_first: Vec<u8> = (0..5).map(|_| mirror.gen_range(1..=6u8)).collect();
        assert_eq!(first.values().to_vec(), expected_first);

        let second = engine
            .roll_dice(&mut rng, &KeepRequest::positions([0, 1]))
            .unwrap()
            .roll;
        assert_eq!(second.get(0), first.get(0));
        assert_eq!(second.get(1), first.get(1));
        for position in 2..5 {
            assert_eq!(second.get(position), Some(mirror.gen_range(1..=6u8)));
        }
    }

    #[test]
    fn test_first_roll_ignores_keep_request() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let mut engine = TurnEngine::new();
        let outcome = engine.roll_dice(&mut rng, &KeepRequest::positions([9, 10]));
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_invalid_keep_sets() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([2, 2, 3, 4, 5]), 1);

        let err = engine.roll_dice(&mut rng, &KeepRequest::positions([0, 5]));
        assert!(matches!(err, Err(YahtzeeError::InvalidKeepSet(_))));

        let err = engine.roll_dice(&mut rng, &KeepRequest::positions([0, 1, 2, 3, 4, 0]));
        assert!(matches!(err, Err(YahtzeeError::InvalidKeepSet(_))));

        let err = engine.roll_dice(&mut rng, &KeepRequest::values([7]));
        assert!(matches!(err, Err(YahtzeeError::InvalidKeepSet(_))));

        let err = engine.roll_dice(&mut rng, &KeepRequest::values([2, 2, 2]));
        assert!(matches!(err, Err(YahtzeeError::ValueNotPresent(2))));

        // Nothing was applied
        assert_eq!(engine.roll_count(), 1);
        assert_eq!(*engine.current_roll().unwrap(), roll([2, 2, 3, 4, 5]));
    }

    #[test]
    fn test_keep_by_value() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([4, 1, 4, 6, 4]), 1);

        let next = engine
            .roll_dice(&mut rng, &KeepRequest::values([4, 4, 4]))
            .unwrap()
            .roll;
        assert_eq!(next.get(0), Some(4));
        assert_eq!(next.get(2), Some(4));
        assert_eq!(next.get(4), Some(4));
    }

    #[test]
    fn test_keep_all_positions_preserves_roll() {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([6, 5, 4, 3, 2]), 1);
        let next = engine
            .roll_dice(&mut rng, &KeepRequest::positions(0..5))
            .unwrap();
        assert_eq!(next.roll, roll([6, 5, 4, 3, 2]));
        assert_eq!(next.roll_number, 2);
    }

    #[test]
    fn test_score_requires_roll() {
        let mut engine = TurnEngine::new();
        assert!(matches!(
            engine.score_turn(Category::Chance),
            Err(YahtzeeError::NoRollYet)
        ));
        assert_eq!(engine.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_score_completes_turn() {
        let mut rng = ChaCha12Rng::seed_from_u64(8);
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([3, 3, 3, 2, 2]), 2);

        let outcome = engine.score_turn(Category::FullHouse).unwrap();
        assert_eq!(outcome.points, 25);
        assert!(!outcome.bonus);
        assert!(!outcome.game_complete);
        assert_eq!(engine.phase(), TurnPhase::Complete);
        assert!(!engine.can_roll());

        assert!(matches!(
            engine.score_turn(Category::Chance),
            Err(YahtzeeError::TurnAlreadyComplete)
        ));
        assert!(matches!(
            engine.roll_dice(&mut rng, &KeepRequest::none()),
            Err(YahtzeeError::TurnAlreadyComplete)
        ));

        engine.start_turn();
        assert_eq!(engine.phase(), TurnPhase::Idle);
        assert_eq!(engine.scorecard().category_score(Category::FullHouse), Some(25));
    }

    #[test]
    fn test_score_filled_category_keeps_turn_open() {
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([1, 2, 3, 4, 5]), 1);
        engine.score_turn(Category::Chance).unwrap();

        engine.start_turn();
        engine.force_roll(roll([1, 1, 1, 4, 5]), 1);
        assert!(matches!(
            engine.score_turn(Category::Chance),
            Err(YahtzeeError::CategoryAlreadyScored(Category::Chance))
        ));
        assert_eq!(engine.phase(), TurnPhase::Rolled(1));
        assert!(engine.score_turn(Category::Ones).is_ok());
    }

    #[test]
    fn test_yahtzee_bonus_through_engine() {
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([5, 5, 5, 5, 5]), 1);
        assert_eq!(engine.score_turn(Category::Yahtzee).unwrap().points, 50);

        engine.start_turn();
        engine.force_roll(roll([2, 2, 2, 2, 2]), 3);
        let outcome = engine.score_turn(Category::Yahtzee).unwrap();
        assert_eq!(outcome.points, 100);
        assert!(outcome.bonus);
        assert_eq!(engine.scorecard().category_score(Category::Yahtzee), Some(50));
        assert_eq!(engine.scorecard().yahtzee_bonus_count(), 1);
    }

    #[test]
    fn test_possible_scores_only_open_categories() {
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([2, 3, 4, 5, 6]), 1);
        engine.score_turn(Category::LargeStraight).unwrap();

        engine.start_turn();
        assert!(engine.possible_scores().is_empty());
        engine.force_roll(roll([2, 3, 4, 5, 6]), 1);

        let scores = engine.possible_scores();
        assert_eq!(scores.len(), 12);
        assert!(!scores.contains_key(&Category::LargeStraight));
        assert_eq!(scores[&Category::SmallStraight], 30);
        assert_eq!(scores, engine.possible_scores());
    }

    #[test]
    fn test_game_complete_reported_on_last_fill() {
        let mut engine = TurnEngine::new();
        let mut last = None;
        for category in Category::ALL {
            engine.start_turn();
            engine.force_roll(roll([1, 2, 3, 4, 6]), 1);
            last = Some(engine.score_turn(category).unwrap());
            if category != Category::Chance {
                assert!(!last.unwrap().game_complete);
            }
        }
        assert!(last.unwrap().game_complete);
        assert!(engine.is_game_complete());
    }

    #[test]
    fn test_inconsistent_snapshots_rejected() {
        let mut engine = TurnEngine::new();
        engine.force_roll(roll([3, 3, 3, 2, 2]), 2);
        let valid = serde_json::to_value(&engine).unwrap();
        let restored: TurnEngine = serde_json::from_value(valid.clone()).unwrap();
        assert_eq!(restored.phase(), TurnPhase::Rolled(2));

        let mut rolled_but_idle = valid.clone();
        rolled_but_idle["roll_count"] = serde_json::json!(0);
        assert!(serde_json::from_value::<TurnEngine>(rolled_but_idle).is_err());

        let mut count_without_roll = valid.clone();
        count_without_roll["current_roll"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<TurnEngine>(count_without_roll).is_err());

        let mut too_many_rolls = valid.clone();
        too_many_rolls["roll_count"] = serde_json::json!(4);
        assert!(serde_json::from_value::<TurnEngine>(too_many_rolls).is_err());

        let mut complete_without_roll = valid;
        complete_without_roll["current_roll"] = serde_json::Value::Null;
        complete_without_roll["roll_count"] = serde_json::json!(0);
        complete_without_roll["turn_complete"] = serde_json::json!(true);
        assert!(serde_json::from_value::<TurnEngine>(complete_without_roll).is_err());
    }
}
