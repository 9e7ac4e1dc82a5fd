//! Game loop implementation
//!
//! Seats one or more players, each with their own TurnEngine and scorecard,
//! and plays turns in seat order until every scorecard is complete. A turn
//! that earns a Yahtzee bonus fills no slot, so that player simply takes an
//! extra turn before their card is full.

use crate::game::controller::{PlayerController, TurnView};
use crate::game::interactive_controller::InteractiveController;
use crate::game::random_controller::RandomController;
use crate::game::scorecard::{ScoreBreakdown, Scorecard};
use crate::game::scripted_controller::ScriptedController;
use crate::game::{GameLogger, KeepRequest, ScoreOutcome, TurnEngine, MAX_ROLLS};
use crate::{Result, YahtzeeError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Rounds allowed before a game is abandoned
///
/// Thirteen rounds fill a card; the slack covers Yahtzee-bonus turns.
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - rounds, rolls and scores (default)
    #[default]
    Normal = 2,
    /// Verbose - previews and controller decisions
    Verbose = 3,
}

/// Who makes the decisions for a seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    Random,
    /// Scripted play; holds the unparsed script
    Scripted(String),
    Interactive,
}

impl ControllerKind {
    /// Build the controller; `seed` seeds random controllers
    pub fn build(&self, seed: u64) -> Result<Box<dyn PlayerController>> {
        Ok(match self {
            ControllerKind::Random => Box::new(RandomController::with_seed(seed)),
            ControllerKind::Scripted(script) => Box::new(ScriptedController::parse(script)?),
            ControllerKind::Interactive => Box::new(InteractiveController::new()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub name: String,
    pub controller: ControllerKind,
}

/// Run-time configuration for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub seats: Vec<SeatConfig>,
    /// Seed for the dice; drawn from the OS when absent
    pub seed: Option<u64>,
    pub verbosity: VerbosityLevel,
    pub max_rounds: u32,
}

impl GameConfig {
    /// Solo game with a random controller
    pub fn solo(name: impl Into<String>, seed: u64) -> Self {
        GameConfig {
            seats: vec![SeatConfig {
                name: name.into(),
                controller: ControllerKind::Random,
            }],
            seed: Some(seed),
            verbosity: VerbosityLevel::Silent,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// The configured seed, or a fresh one from the OS
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// One controller per seat, in seat order
    ///
    /// Random controllers are seeded from `seed` plus their seat index so that
    /// the dice stream and the decision stream stay independent.
    pub fn build_controllers(&self, seed: u64) -> Result<Vec<Box<dyn PlayerController>>> {
        self.seats
            .iter()
            .enumerate()
            .map(|(idx, seat)| {
                seat.controller
                    .build(seed.wrapping_add(1).wrapping_add(idx as u64))
            })
            .collect()
    }
}

/// A player at the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSeat {
    pub name: String,
    pub engine: TurnEngine,
}

/// Final position of one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub seat: usize,
    pub name: String,
    pub breakdown: ScoreBreakdown,
    pub yahtzee_bonus_count: u32,
    pub upper_bonus_earned: bool,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Players ordered by grand total, highest first (seat order on ties)
    pub standings: Vec<Standing>,
    /// Winning seat (None if the top score is tied)
    pub winner: Option<usize>,
    pub turns_played: u32,
    pub rounds_played: u32,
    pub seed: u64,
}

pub struct GameLoop {
    seats: Vec<PlayerSeat>,
    rng: ChaCha12Rng,
    seed: u64,
    max_rounds: u32,
    rounds_played: u32,
    turns_played: u32,
    pub logger: GameLogger,
}

impl GameLoop {
    /// New game for the named players, dice seeded from `seed`
    pub fn new(player_names: Vec<String>, seed: u64) -> Self {
        GameLoop {
            seats: player_names
                .into_iter()
                .map(|name| PlayerSeat {
                    name,
                    engine: TurnEngine::new(),
                })
                .collect(),
            rng: ChaCha12Rng::seed_from_u64(seed),
            seed,
            max_rounds: DEFAULT_MAX_ROUNDS,
            rounds_played: 0,
            turns_played: 0,
            logger: GameLogger::new(),
        }
    }

    pub fn from_config(config: &GameConfig, seed: u64) -> Result<Self> {
        if config.seats.is_empty() {
            return Err(YahtzeeError::InvalidConfig(
                "at least one seat is required".to_string(),
            ));
        }
        let names = config.seats.iter().map(|s| s.name.clone()).collect();
        Ok(GameLoop::new(names, seed)
            .with_verbosity(config.verbosity)
            .with_max_rounds(config.max_rounds))
    }

    /// Set maximum rounds before the game is abandoned
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.logger.set_verbosity(verbosity);
        self
    }

    pub fn seats(&self) -> &[PlayerSeat] {
        &self.seats
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_finished(&self) -> bool {
        self.seats.iter().all(|s| s.engine.is_game_complete())
    }

    /// Play rounds until every scorecard is full
    ///
    /// `controllers` must hold one controller per seat, in seat order.
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        if controllers.len() != self.seats.len() {
            return Err(YahtzeeError::InvalidConfig(format!(
                "{} controllers for {} seats",
                controllers.len(),
                self.seats.len()
            )));
        }

        while !self.is_finished() {
            self.run_round(controllers)?;
        }

        let result = self.result();
        self.notify_game_end(controllers, result.winner);
        self.log_result(&result);
        Ok(result)
    }

    /// Play one round: a turn for every seat whose card is not yet full
    pub fn run_round(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<()> {
        if self.rounds_played >= self.max_rounds {
            return Err(YahtzeeError::RoundLimitExceeded(self.max_rounds));
        }
        self.rounds_played += 1;
        self.logger
            .normal(&format!("=== Round {} ===", self.rounds_played));

        for (idx, controller) in controllers.iter_mut().enumerate().take(self.seats.len()) {
            if self.seats[idx].engine.is_game_complete() {
                continue;
            }
            self.play_turn(idx, controller.as_mut())?;
        }
        Ok(())
    }

    /// Play one full turn for the player at `seat`
    pub fn play_turn(
        &mut self,
        seat: usize,
        controller: &mut dyn PlayerController,
    ) -> Result<ScoreOutcome> {
        let player = self.seats.get_mut(seat).ok_or_else(|| {
            YahtzeeError::InvalidConfig(format!("no seat {}", seat))
        })?;
        let logger = &self.logger;

        player.engine.start_turn();
        let outcome = player.engine.roll_dice(&mut self.rng, &KeepRequest::none())?;
        logger.normal(&format!("{} rolls {}", player.name, outcome.roll));

        while player.engine.can_roll() {
            let keep = {
                let view = TurnView::new(&player.engine, &player.name, logger);
                controller.choose_keep(&view)
            };
            let Some(keep) = keep else {
                break;
            };
            let outcome = player.engine.roll_dice(&mut self.rng, &keep)?;
            logger.normal(&format!(
                "{} re-rolls ({}/{}): {}",
                player.name,
                outcome.roll_number,
                MAX_ROLLS,
                outcome.roll
            ));
        }

        let category = {
            let view = TurnView::new(&player.engine, &player.name, logger);
            if logger.verbosity() >= VerbosityLevel::Verbose {
                for (c, points) in view.possible_scores() {
                    logger.verbose(&format!("  {:<16}{:>3}", c.label(), points));
                }
            }
            controller.choose_category(&view)
        };
        let scored = player.engine.score_turn(category)?;
        if scored.bonus {
            logger.normal(&format!(
                "{} scores a Yahtzee bonus: +{}",
                player.name, scored.points
            ));
        } else {
            logger.normal(&format!(
                "{} scores {} in {} (total {})",
                player.name,
                scored.points,
                scored.category,
                player.engine.scorecard().grand_total()
            ));
        }

        self.turns_played += 1;
        Ok(scored)
    }

    /// Standings as they stand now
    pub fn result(&self) -> GameResult {
        let mut standings: Vec<Standing> = self
            .seats
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                let card = player.engine.scorecard();
                Standing {
                    seat,
                    name: player.name.clone(),
                    breakdown: card.score_breakdown(),
                    yahtzee_bonus_count: card.yahtzee_bonus_count(),
                    upper_bonus_earned: card.upper_bonus_earned(),
                }
            })
            .collect();
        // Stable sort keeps seat order among equal totals
        standings.sort_by(|a, b| b.breakdown.grand_total.cmp(&a.breakdown.grand_total));

        let winner = match standings.as_slice() {
            [first, second, ..] if first.breakdown.grand_total == second.breakdown.grand_total => None,
            [first, ..] => Some(first.seat),
            [] => None,
        };

        GameResult {
            standings,
            winner,
            turns_played: self.turns_played,
            rounds_played: self.rounds_played,
            seed: self.seed,
        }
    }

    /// Hand each seat's scorecard over, consuming the loop
    pub fn into_scorecards(self) -> Vec<(String, Scorecard)> {
        self.seats
            .into_iter()
            .map(|seat| (seat.name, seat.engine.into_scorecard()))
            .collect()
    }

    fn notify_game_end(&self, controllers: &mut [Box<dyn PlayerController>], winner: Option<usize>) {
        for (idx, controller) in controllers.iter_mut().enumerate() {
            controller.on_game_end(self.seats[idx].engine.scorecard(), winner == Some(idx));
        }
    }

    fn log_result(&self, result: &GameResult) {
        self.logger.minimal("=== Game Over ===");
        for standing in &result.standings {
            self.logger.minimal(&format!(
                "{}: {} (upper {} + bonus {}, lower {}, Yahtzee bonus {})",
                standing.name,
                standing.breakdown.grand_total,
                standing.breakdown.upper_section,
                standing.breakdown.upper_bonus,
                standing.breakdown.lower_section,
                standing.breakdown.yahtzee_bonuses
            ));
        }
        match result.winner {
            Some(seat) => self
                .logger
                .minimal(&format!("Winner: {}", self.seats[seat].name)),
            None if self.seats.len() > 1 => self.logger.minimal("Tie"),
            None => {}
        }
    }
}
