//! Batch simulation of seeded solo games
//!
//! Games run in parallel with rayon. Each game's seeds derive from the batch
//! seed and the game index alone, so the statistics do not depend on thread
//! scheduling.

use crate::game::{GameLoop, GameResult, PlayerController, RandomController, VerbosityLevel};
use crate::{Result, YahtzeeError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over a batch of solo games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub games: usize,
    pub seed: u64,
    pub mean_score: f64,
    pub min_score: u32,
    pub max_score: u32,
    /// Fraction of games that earned the upper-section bonus
    pub upper_bonus_rate: f64,
    /// Fraction of games with at least one Yahtzee bonus
    pub yahtzee_bonus_rate: f64,
    pub total_yahtzee_bonuses: u32,
}

/// Dice and controller seeds for game `index` of a batch
fn game_seeds(seed: u64, index: usize) -> (u64, u64) {
    let base = seed.wrapping_add((index as u64).wrapping_mul(2));
    (base, base.wrapping_add(1))
}

/// Play one silent solo game with a seeded random controller
pub fn play_solo_game(dice_seed: u64, controller_seed: u64) -> Result<GameResult> {
    let mut game = GameLoop::new(vec!["Solo".to_string()], dice_seed).with_verbosity(VerbosityLevel::Silent);
    let mut controllers: Vec<Box<dyn PlayerController>> =
        vec![Box::new(RandomController::with_seed(controller_seed))];
    game.run_game(&mut controllers)
}

/// Run `games` solo games in parallel and summarize them
pub fn run_simulation(games: usize, seed: u64) -> Result<SimulationStats> {
    if games == 0 {
        return Err(YahtzeeError::InvalidConfig(
            "simulation needs at least one game".to_string(),
        ));
    }

    let results = (0..games)
        .into_par_iter()
        .map(|index| {
            let (dice_seed, controller_seed) = game_seeds(seed, index);
            play_solo_game(dice_seed, controller_seed)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(summarize(&results, seed))
}

fn summarize(results: &[GameResult], seed: u64) -> SimulationStats {
    let mut total: u64 = 0;
    let mut min_score = u32::MAX;
    let mut max_score = 0;
    let mut upper_bonus_games = 0usize;
    let mut yahtzee_bonus_games = 0usize;
    let mut total_yahtzee_bonuses = 0;

    for standing in results.iter().flat_map(|r| r.standings.first()) {
        let score = standing.breakdown.grand_total;
        total += u64::from(score);
        min_score = min_score.min(score);
        max_score = max_score.max(score);
        if standing.upper_bonus_earned {
            upper_bonus_games += 1;
        }
        if standing.yahtzee_bonus_count > 0 {
            yahtzee_bonus_games += 1;
        }
        total_yahtzee_bonuses += standing.yahtzee_bonus_count;
    }

    let games = results.len();
    let n = games.max(1) as f64;
    SimulationStats {
        games,
        seed,
        mean_score: total as f64 / n,
        min_score: if games == 0 { 0 } else { min_score },
        max_score,
        upper_bonus_rate: upper_bonus_games as f64 / n,
        yahtzee_bonus_rate: yahtzee_bonus_games as f64 / n,
        total_yahtzee_bonuses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_seeds_are_distinct() {
        let (a, b) = game_seeds(10, 0);
        let (c, d) = game_seeds(10, 1);
        assert_eq!((a, b, c, d), (10, 11, 12, 13));
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let first = run_simulation(16, 2024).unwrap();
        let second = run_simulation(16, 2024).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.games, 16);
        assert!(first.min_score <= first.max_score);
        assert!(first.mean_score >= f64::from(first.min_score));
        assert!(first.mean_score <= f64::from(first.max_score));
        assert!((0.0..=1.0).contains(&first.upper_bonus_rate));
    }

    #[test]
    fn test_yahtzee_bonuses_occur_in_random_play() {
        let stats = run_simulation(5_000, 7).unwrap();
        assert!(stats.total_yahtzee_bonuses > 0);
        assert!(stats.yahtzee_bonus_rate > 0.0);
        assert!(stats.yahtzee_bonus_rate <= 1.0);
    }

    #[test]
    fn test_zero_games_rejected() {
        assert!(matches!(
            run_simulation(0, 1),
            Err(YahtzeeError::InvalidConfig(_))
        ));
    }
}
