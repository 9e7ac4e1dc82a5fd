//! Interactive controller for human players
//!
//! Prompts on a line-oriented reader/writer pair (stdin/stdout by default).

use crate::core::{Category, DICE_COUNT};
use crate::game::controller::{first_open_category, PlayerController, TurnView};
use crate::game::scorecard::Scorecard;
use crate::game::KeepRequest;
use std::io::{self, BufRead, BufReader, Write};

/// A controller that prompts a human player for decisions
pub struct InteractiveController {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

enum KeepCommand {
    Keep(KeepRequest),
    Stop,
    Reprompt,
}

impl InteractiveController {
    /// Interactive controller on stdin/stdout
    pub fn new() -> Self {
        Self::with_io(Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        InteractiveController { input, output }
    }

    /// Prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        // Output errors are ignored: a broken terminal still lets input drive the game
        let _ = write!(self.output, "{} ", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                None
            }
        }
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }

    fn display_help(&mut self) {
        self.say("Commands while rolling:");
        self.say("  k 0 2 4   keep dice at positions 0, 2 and 4, re-roll the rest");
        self.say("  v 6 6     keep two sixes, re-roll the rest");
        self.say("  r         re-roll all dice");
        self.say("  s         stop rolling and score");
        self.say("  a <cat>   show which dice to keep for a category");
        self.say("  c         show the scorecard");
        self.say("  ?         this help");
    }

    fn display_roll(&mut self, view: &TurnView) {
        if let Some(roll) = view.current_roll() {
            let positions: Vec<String> = (0..DICE_COUNT).map(|i| i.to_string()).collect();
            self.say(&format!(
                "{} - roll {}: {}",
                view.player_name(),
                view.roll_count(),
                roll
            ));
            self.say(&format!("  position: [{}]", positions.join(" ")));
        }
    }

    fn display_scorecard(&mut self, scorecard: &Scorecard) {
        for category in Category::ALL {
            let score = scorecard
                .category_score(category)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            self.say(&format!("  {:<16}{:>4}", category.label(), score));
        }
        let breakdown = scorecard.score_breakdown();
        self.say(&format!(
            "  Upper {} (+{} bonus)  Lower {}  Yahtzee bonus {}  Total {}",
            breakdown.upper_section,
            breakdown.upper_bonus,
            breakdown.lower_section,
            breakdown.yahtzee_bonuses,
            breakdown.grand_total
        ));
    }

    fn parse_keep_command(&mut self, view: &TurnView, input: &str) -> KeepCommand {
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match command {
            "s" | "stop" => KeepCommand::Stop,
            "r" | "roll" => KeepCommand::Keep(KeepRequest::none()),
            "k" | "keep" => match args.iter().map(|a| a.parse::<usize>()).collect() {
                Ok(positions) => KeepCommand::Keep(KeepRequest::Positions(positions)),
                Err(_) => {
                    self.say("Positions must be numbers 0-4");
                    KeepCommand::Reprompt
                }
            },
            "v" | "vals" => match args.iter().map(|a| a.parse::<u8>()).collect() {
                Ok(values) => KeepCommand::Keep(KeepRequest::Values(values)),
                Err(_) => {
                    self.say("Values must be numbers 1-6");
                    KeepCommand::Reprompt
                }
            },
            "a" | "advice" => {
                match args.join(" ").parse::<Category>() {
                    Ok(category) => {
                        let keep = view.recommend_keep(category);
                        self.say(&format!("  keep {:?} for {}", keep.as_slice(), category));
                    }
                    Err(e) => self.say(&e.to_string()),
                }
                KeepCommand::Reprompt
            }
            "c" => {
                self.display_scorecard(view.scorecard());
                KeepCommand::Reprompt
            }
            "?" | "h" | "help" => {
                self.display_help();
                KeepCommand::Reprompt
            }
            _ => {
                self.say("Unknown command (? for help)");
                KeepCommand::Reprompt
            }
        }
    }
}

impl Default for InteractiveController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for InteractiveController {
    fn name(&self) -> &str {
        "HUMAN"
    }

    fn choose_keep(&mut self, view: &TurnView) -> Option<KeepRequest> {
        self.display_roll(view);
        loop {
            let input = self.prompt("Keep which dice? (? for help)")?;
            let keep = match self.parse_keep_command(view, &input) {
                KeepCommand::Keep(keep) => keep,
                KeepCommand::Stop => return None,
                KeepCommand::Reprompt => continue,
            };
            // Validate here so a typo re-prompts instead of ending the game
            if let Some(roll) = view.current_roll() {
                if let Err(e) = keep.resolve(roll) {
                    self.say(&e.to_string());
                    continue;
                }
            }
            return Some(keep);
        }
    }

    fn choose_category(&mut self, view: &TurnView) -> Category {
        self.display_roll(view);
        let possible = view.possible_scores();
        let bonus = view.yahtzee_bonus_available();
        let options: Vec<(Category, u32)> = possible.into_iter().collect();

        for (idx, (category, points)) in options.iter().enumerate() {
            self.say(&format!("  [{:>2}] {:<16}{:>3}", idx, category.label(), points));
        }
        if bonus {
            self.say("  [ y] Yahtzee bonus    100");
        }

        loop {
            let Some(input) = self.prompt("Score which category?") else {
                return first_open_category(view);
            };
            if bonus && input == "y" {
                return Category::Yahtzee;
            }
            if let Ok(idx) = input.parse::<usize>() {
                if let Some(&(category, _)) = options.get(idx) {
                    return category;
                }
            }
            match input.parse::<Category>() {
                Ok(category) if options.iter().any(|&(c, _)| c == category) => return category,
                Ok(Category::Yahtzee) if bonus => return Category::Yahtzee,
                Ok(category) => self.say(&format!("{} is already scored", category)),
                Err(_) => self.say("Enter an option number or category name"),
            }
        }
    }

    fn on_game_end(&mut self, scorecard: &Scorecard, won: bool) {
        self.display_scorecard(scorecard);
        if won {
            self.say("You win!");
        }
    }
}
