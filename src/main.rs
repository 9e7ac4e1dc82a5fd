//! Yahtzee Engine - Main Binary
//!
//! Play a game, simulate batches of random games, or score a single roll.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Instant;
use yahtzee_engine::{
    core::{Category, Roll},
    game::{
        all_scores, recommend_keep, ControllerKind, GameConfig, GameLoop, SeatConfig, VerbosityLevel,
        DEFAULT_MAX_ROUNDS,
    },
    simulation::run_simulation,
};

/// Controller type for a seat
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Makes random choices
    Random,
    /// Text UI controller for human play via stdin
    Tui,
    /// Fixed script of steps (requires --pN-script)
    Script,
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "yahtzee")]
#[command(about = "Yahtzee Engine - dice rules engine and game runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game with one or two seats
    Play {
        /// Player 1 controller type
        #[arg(long, value_enum, default_value = "tui")]
        p1: ControllerType,

        /// Player 2 controller type (omit for a solo game)
        #[arg(long, value_enum)]
        p2: Option<ControllerType>,

        /// Player 1 name
        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        /// Player 2 name
        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// Script for player 1 (e.g. "keep:0,1 vals:6 stop sixes")
        #[arg(long, value_name = "SCRIPT")]
        p1_script: Option<String>,

        /// Script for player 2
        #[arg(long, value_name = "SCRIPT")]
        p2_script: Option<String>,

        /// Set random seed for deterministic replay
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Abandon the game after this many rounds
        #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
        max_rounds: u32,

        /// Print the final result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run many seeded random solo games in parallel and report statistics
    Simulate {
        /// Number of games to play
        #[arg(long, default_value_t = 1000)]
        games: usize,

        /// Batch seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a roll in every category
    Score {
        /// Five dice values, e.g. `3 3 3 5 5`
        #[arg(value_name = "DIE", num_args = 5, required = true)]
        dice: Vec<u8>,

        /// Also suggest which dice to keep when chasing this category
        #[arg(long, value_name = "CATEGORY")]
        target: Option<String>,

        /// Print scores as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            p1,
            p2,
            p1_name,
            p2_name,
            p1_script,
            p2_script,
            seed,
            verbosity,
            max_rounds,
            json,
        } => {
            let mut seats = vec![seat_config(p1_name, p1, p1_script, "--p1-script")?];
            if let Some(p2) = p2 {
                seats.push(seat_config(p2_name, p2, p2_script, "--p2-script")?);
            }
            let config = GameConfig {
                seats,
                seed,
                verbosity: verbosity.into(),
                max_rounds,
            };
            run_play(&config, json)?
        }
        Commands::Simulate { games, seed, json } => run_simulate(games, seed, json)?,
        Commands::Score { dice, target, json } => run_score(&dice, target.as_deref(), json)?,
    }

    Ok(())
}

fn seat_config(
    name: String,
    controller: ControllerType,
    script: Option<String>,
    flag: &str,
) -> anyhow::Result<SeatConfig> {
    let controller = match controller {
        ControllerType::Random => ControllerKind::Random,
        ControllerType::Tui => ControllerKind::Interactive,
        ControllerType::Script => match script {
            Some(script) => ControllerKind::Scripted(script),
            None => bail!("script controller requires {flag}"),
        },
    };
    Ok(SeatConfig { name, controller })
}

fn run_play(config: &GameConfig, json: bool) -> anyhow::Result<()> {
    let seed = config.resolve_seed();
    if config.verbosity >= VerbosityLevel::Minimal {
        println!("=== Yahtzee ===");
        println!("Seed: {seed} (pass --seed {seed} to replay)\n");
    }

    let mut controllers = config
        .build_controllers(seed)
        .context("building controllers")?;
    let mut game = GameLoop::from_config(config, seed)?;
    let result = game.run_game(&mut controllers)?;

    if json {
        let scorecards: Vec<_> = game
            .into_scorecards()
            .into_iter()
            .map(|(name, card)| (name, card.summary()))
            .collect();
        let export = serde_json::json!({ "result": result, "scorecards": scorecards });
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else if config.verbosity >= VerbosityLevel::Minimal {
        println!("Turns played: {}", result.turns_played);
    }
    Ok(())
}

fn run_simulate(games: usize, seed: Option<u64>, json: bool) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let start = Instant::now();
    let stats = run_simulation(games, seed)?;
    let elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("=== Yahtzee Simulation ===\n");
    println!("Games:           {}", stats.games);
    println!("Seed:            {}", stats.seed);
    println!("Mean score:      {:.1}", stats.mean_score);
    println!("Min / max:       {} / {}", stats.min_score, stats.max_score);
    println!("Upper bonus:     {:.1}%", stats.upper_bonus_rate * 100.0);
    println!("Yahtzee bonus:   {:.1}%", stats.yahtzee_bonus_rate * 100.0);
    println!(
        "Elapsed:         {:.2}s ({:.0} games/s)",
        elapsed.as_secs_f64(),
        stats.games as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn run_score(dice: &[u8], target: Option<&str>, json: bool) -> anyhow::Result<()> {
    let roll = Roll::new(dice)?;
    let scores = all_scores(&roll);
    let advice = match target {
        Some(name) => {
            let category: Category = name.parse()?;
            Some((category, recommend_keep(&roll, category)))
        }
        None => None,
    };

    if json {
        let export = serde_json::json!({
            "roll": roll,
            "scores": scores,
            "analysis": roll.analyze(),
            "advice": advice.as_ref().map(|(c, keep)| serde_json::json!({
                "category": c,
                "keep": keep.as_slice(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    println!("Roll: {roll}\n");
    for (category, points) in &scores {
        println!("  {:<16}{:>3}", category.label(), points);
    }
    if let Some((category, keep)) = advice {
        let kept: Vec<u8> = keep.iter().filter_map(|&p| roll.get(p)).collect();
        println!("\nChasing {category}: keep positions {:?} (values {:?})", keep.as_slice(), kept);
    }
    Ok(())
}
