//! End-to-end turn engine tests
//!
//! Drive whole turns through the public API with seeded dice: roll, re-roll
//! with position and value keeps, score, and the error paths that must leave
//! the engine untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use similar_asserts::assert_eq;
use yahtzee_engine::core::{Category, Roll};
use yahtzee_engine::game::{
    KeepRequest, Scorecard, TurnEngine, TurnPhase, MAX_ROLLS, YAHTZEE_BONUS,
};
use yahtzee_engine::YahtzeeError;

fn rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Keep the dice showing the most common face (higher face on ties)
fn keep_most_common(roll: &Roll) -> KeepRequest {
    let face = (1..=6u8)
        .max_by_key(|&f| (roll.count_of(f), f))
        .unwrap_or(6);
    KeepRequest::positions(roll.positions_of(face))
}

/// Play turns on `engine` until one ends on five of a kind, leaving that turn
/// open for scoring
fn roll_until_yahtzee(engine: &mut TurnEngine, rng: &mut ChaCha12Rng) -> Roll {
    for _ in 0..10_000 {
        engine.start_turn();
        let mut roll = engine.roll_dice(rng, &KeepRequest::none()).unwrap().roll;
        while !roll.is_yahtzee() && engine.can_roll() {
            roll = engine.roll_dice(rng, &keep_most_common(&roll)).unwrap().roll;
        }
        if roll.is_yahtzee() {
            return roll;
        }
    }
    panic!("no Yahtzee in 10000 seeded turns");
}

#[test]
fn test_full_turn_lifecycle() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(42);
    assert_eq!(engine.phase(), TurnPhase::Idle);

    let first = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
    assert_eq!(first.roll_number, 1);
    assert!(first.can_reroll);

    let keep = KeepRequest::positions([0, 1]);
    let second = engine.roll_dice(&mut rng, &keep).unwrap();
    assert_eq!(&second.roll.values()[..2], &first.roll.values()[..2]);
    assert_eq!(engine.phase(), TurnPhase::Rolled(2));

    let third = engine.roll_dice(&mut rng, &KeepRequest::positions(0..5)).unwrap();
    assert_eq!(third.roll, second.roll);
    assert!(!third.can_reroll);
    assert_eq!(engine.roll_count(), MAX_ROLLS);

    assert!(matches!(
        engine.roll_dice(&mut rng, &KeepRequest::none()),
        Err(YahtzeeError::MaxRollsExceeded(3))
    ));

    let outcome = engine.score_turn(Category::Chance).unwrap();
    assert_eq!(outcome.points, third.roll.sum());
    assert!(!outcome.bonus);
    assert!(!outcome.game_complete);
    assert_eq!(engine.phase(), TurnPhase::Complete);

    assert!(matches!(
        engine.roll_dice(&mut rng, &KeepRequest::none()),
        Err(YahtzeeError::TurnAlreadyComplete)
    ));
    assert!(matches!(
        engine.score_turn(Category::Ones),
        Err(YahtzeeError::TurnAlreadyComplete)
    ));
}

#[test]
fn test_keep_by_value_holds_matching_dice() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(7);
    let first = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap().roll;

    let face = first.values()[3];
    let second = engine
        .roll_dice(&mut rng, &KeepRequest::values([face]))
        .unwrap()
        .roll;
    // The leftmost die showing `face` is held in place
    let held = first.positions_of(face)[0];
    assert_eq!(second.values()[held], face);
}

#[test]
fn test_rejected_calls_leave_state_unchanged() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(99);

    assert!(matches!(
        engine.score_turn(Category::Chance),
        Err(YahtzeeError::NoRollYet)
    ));

    let roll = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap().roll;
    let before = serde_json::to_string(&engine).unwrap();

    let missing = (1..=6u8).find(|&f| roll.count_of(f) == 0);
    if let Some(face) = missing {
        assert!(matches!(
            engine.roll_dice(&mut rng, &KeepRequest::values([face])),
            Err(YahtzeeError::ValueNotPresent(v)) if v == face
        ));
    }
    assert!(matches!(
        engine.roll_dice(&mut rng, &KeepRequest::positions([5])),
        Err(YahtzeeError::InvalidKeepSet(_))
    ));
    assert!(matches!(
        engine.roll_dice(&mut rng, &KeepRequest::values([0])),
        Err(YahtzeeError::InvalidKeepSet(_))
    ));

    assert_eq!(serde_json::to_string(&engine).unwrap(), before);
    assert_eq!(engine.roll_count(), 1);
}

#[test]
fn test_filled_category_rejected_and_turn_stays_open() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(5);
    engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
    engine.score_turn(Category::Fours).unwrap();

    engine.start_turn();
    let roll = engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap().roll;
    assert!(matches!(
        engine.score_turn(Category::Fours),
        Err(YahtzeeError::CategoryAlreadyScored(Category::Fours))
    ));
    assert!(!engine.is_turn_complete());
    assert!(!engine.possible_scores().contains_key(&Category::Fours));

    let outcome = engine.score_turn(Category::Chance).unwrap();
    assert_eq!(outcome.points, roll.sum());
}

#[test]
fn test_yahtzee_bonus_through_engine() {
    let mut rng = rng(2024);
    let mut card = Scorecard::new();
    card.score_category(Category::Yahtzee, &Roll::new(&[4, 4, 4, 4, 4]).unwrap())
        .unwrap();
    let mut engine = TurnEngine::with_scorecard(card);

    let roll = roll_until_yahtzee(&mut engine, &mut rng);
    let total_before = engine.scorecard().grand_total();

    // A filled Yahtzee slot is not previewed even when a bonus is on offer
    assert!(!engine.possible_scores().contains_key(&Category::Yahtzee));
    let outcome = engine.score_turn(Category::Yahtzee).unwrap();
    assert!(outcome.bonus);
    assert_eq!(outcome.points, YAHTZEE_BONUS);

    let card = engine.into_scorecard();
    assert_eq!(card.yahtzee_bonus_count(), 1);
    assert_eq!(card.category_score(Category::Yahtzee), Some(50));
    assert_eq!(card.grand_total(), total_before + YAHTZEE_BONUS);
    assert_eq!(card.available_categories().len(), 12);
    let last = card.entries().last().unwrap();
    assert!(last.is_bonus);
    assert_eq!(last.dice, roll);
}

#[test]
fn test_thirteen_turns_complete_the_card() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(13);
    let mut last = None;
    for category in Category::ALL {
        engine.start_turn();
        engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();
        last = Some(engine.score_turn(category).unwrap());
    }
    assert!(last.unwrap().game_complete);
    assert!(engine.is_game_complete());
    assert!(engine.scorecard().available_categories().is_empty());
}

#[test]
fn test_mid_turn_snapshot_resumes_identically() {
    let mut engine = TurnEngine::new();
    let mut rng = rng(31337);
    engine.roll_dice(&mut rng, &KeepRequest::none()).unwrap();

    let engine_json = serde_json::to_string(&engine).unwrap();
    let rng_json = serde_json::to_string(&rng).unwrap();
    let mut resumed: TurnEngine = serde_json::from_str(&engine_json).unwrap();
    let mut resumed_rng: ChaCha12Rng = serde_json::from_str(&rng_json).unwrap();

    let keep = KeepRequest::positions([2]);
    let a = engine.roll_dice(&mut rng, &keep).unwrap();
    let b = resumed.roll_dice(&mut resumed_rng, &keep).unwrap();
    assert_eq!(a, b);
}
