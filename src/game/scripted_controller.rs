//! Scripted controller for deterministic testing
//!
//! Follows a predetermined sequence of steps. A script is whitespace-separated
//! tokens:
//!
//! - `keep:0,2,4` hold those positions and re-roll the rest (`keep:` re-rolls all)
//! - `vals:6,6` hold dice by face value
//! - `stop` end the rolling phase
//! - a category name (`sixes`, `full_house`, `large-straight`, ...) scores it
//!
//! A category token also ends the rolling phase, so `keep:0,1 chance` re-rolls
//! once and then scores Chance. Once the script is exhausted the controller
//! stops rolling and scores the first open category.

use crate::core::Category;
use crate::game::controller::{first_open_category, PlayerController, TurnView};
use crate::game::KeepRequest;
use crate::{Result, YahtzeeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptStep {
    Keep(KeepRequest),
    Stop,
    Score(Category),
}

impl ScriptStep {
    fn parse(token: &str) -> Result<Self> {
        if token.eq_ignore_ascii_case("stop") {
            return Ok(ScriptStep::Stop);
        }
        if let Some(list) = token.strip_prefix("keep:") {
            let positions = parse_list::<usize>(list, token)?;
            return Ok(ScriptStep::Keep(KeepRequest::positions(positions)));
        }
        if let Some(list) = token.strip_prefix("vals:") {
            let values = parse_list::<u8>(list, token)?;
            return Ok(ScriptStep::Keep(KeepRequest::values(values)));
        }
        token
            .parse::<Category>()
            .map(ScriptStep::Score)
            .map_err(|_| YahtzeeError::InvalidScript(format!("unrecognized token '{}'", token)))
    }
}

fn parse_list<T: std::str::FromStr>(list: &str, token: &str) -> Result<Vec<T>> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| YahtzeeError::InvalidScript(format!("bad number '{}' in '{}'", s, token)))
        })
        .collect()
}

/// A controller that plays a fixed script of steps
///
/// Serializable, including the current position, so a partially played
/// script can be saved and resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedController {
    script: Vec<ScriptStep>,
    /// Current position in the script
    pub current_index: usize,
}

impl ScriptedController {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        ScriptedController {
            script,
            current_index: 0,
        }
    }

    /// Parse a whitespace-separated script
    ///
    /// # Example
    /// ```
    /// use yahtzee_engine::game::ScriptedController;
    ///
    /// let controller = ScriptedController::parse("keep:0,1 vals:6 sixes chance").unwrap();
    /// assert_eq!(controller.remaining(), 4);
    /// ```
    pub fn parse(script: &str) -> Result<Self> {
        let steps = script
            .split_whitespace()
            .map(ScriptStep::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(steps))
    }

    /// Steps not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.current_index)
    }

    fn peek(&self) -> Option<&ScriptStep> {
        self.script.get(self.current_index)
    }
}

impl PlayerController for ScriptedController {
    fn name(&self) -> &str {
        "SCRIPT"
    }

    fn choose_keep(&mut self, view: &TurnView) -> Option<KeepRequest> {
        match self.peek().cloned() {
            Some(ScriptStep::Keep(keep)) => {
                self.current_index += 1;
                view.logger()
                    .controller_choice(self.name(), &format!("keeps {:?}", keep));
                Some(keep)
            }
            Some(ScriptStep::Stop) => {
                self.current_index += 1;
                view.logger().controller_choice(self.name(), "stops rolling");
                None
            }
            // Left in place for choose_category
            Some(ScriptStep::Score(_)) => None,
            None => None,
        }
    }

    fn choose_category(&mut self, view: &TurnView) -> Category {
        // Keep/stop steps that could not be used (rolls ran out) are skipped
        while let Some(step) = self.peek().cloned() {
            self.current_index += 1;
            if let ScriptStep::Score(category) = step {
                view.logger()
                    .controller_choice(self.name(), &format!("scores {}", category));
                return category;
            }
        }

        let category = first_open_category(view);
        view.logger().controller_choice(
            self.name(),
            &format!("script exhausted, scores {}", category),
        );
        category
    }
}
