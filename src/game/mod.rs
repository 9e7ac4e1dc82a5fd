//! Rules, turn structure and game orchestration

pub mod controller;
pub mod game_loop;
pub mod interactive_controller;
pub mod keep_advisor;
pub mod logger;
pub mod random_controller;
pub mod scorecard;
pub mod scoring;
pub mod scripted_controller;
pub mod turn;

pub use controller::{PlayerController, TurnView};
pub use game_loop::{
    ControllerKind, GameConfig, GameLoop, GameResult, PlayerSeat, SeatConfig, Standing, VerbosityLevel,
    DEFAULT_MAX_ROUNDS,
};
pub use interactive_controller::InteractiveController;
pub use keep_advisor::recommend_keep;
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use random_controller::RandomController;
pub use scorecard::{
    CategoryAnalysis, ScoreBreakdown, ScoreEntry, Scorecard, ScorecardSummary, UpperSectionProgress,
    UPPER_BONUS, UPPER_BONUS_THRESHOLD, YAHTZEE_BONUS,
};
pub use scoring::{all_scores, score};
pub use scripted_controller::{ScriptStep, ScriptedController};
pub use turn::{KeepRequest, RollOutcome, ScoreOutcome, TurnEngine, TurnPhase, MAX_ROLLS};
