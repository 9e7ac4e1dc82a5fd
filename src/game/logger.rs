//! Centralized game logger
//!
//! The rules core never logs. The game loop and controllers report through a
//! `GameLogger`, which filters by `VerbosityLevel` and can capture lines in
//! memory instead of (or as well as) printing them.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "controller_choice")
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

#[derive(Debug)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Logger at Normal verbosity writing to stdout
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Captured entries
    ///
    /// Capture ignores verbosity: Memory mode records every level except
    /// Silent, so tests can assert on lines a quieter run would not print.
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    #[inline]
    fn log_to_stdout(level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let should_capture = matches!(self.output_mode, OutputMode::Memory | OutputMode::Both);
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if should_output && level <= self.verbosity {
            Self::log_to_stdout(level, message);
        }
    }

    /// Game outcome lines
    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    /// Rounds, rolls and scores
    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    /// Previews, keep sets and other detail
    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, None);
    }

    /// Standardized "NAME: message" line for a controller decision
    #[inline]
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        if self.verbosity < VerbosityLevel::Verbose && self.output_mode == OutputMode::Stdout {
            return;
        }
        let line = format!("{}: {}", controller_name, message);
        self.log(VerbosityLevel::Verbose, &line, Some("controller_choice"));
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}
