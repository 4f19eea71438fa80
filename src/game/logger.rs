//! Match logger with in-memory capture
//!
//! Owned strings in `LogEntry`, a `RefCell` buffer for capture, and a
//! guard type for read-only iteration. Tests run with `OutputMode::Memory`
//! and assert against the captured entries.

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

/// A log entry with owned strings (no lifetime parameters)
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Verbosity level of this log entry
    pub level: VerbosityLevel,
    /// Log message (owned)
    pub message: String,
    /// Optional category (e.g., "event", "turn")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to log entries
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

/// Centralized logger for game-master narration
///
/// Interior mutability on the buffer lets resolver-adjacent code log
/// through a shared borrow of the game state.
#[derive(Debug, Clone)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        GameLogger {
            verbosity: VerbosityLevel::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Set output mode (Stdout, Memory, or Both)
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to the in-memory buffer only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Read-only access to captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Core logging path; filters by verbosity, then routes per mode
    pub fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        if level > self.verbosity {
            return;
        }
        match self.output_mode {
            OutputMode::Stdout => println!("{}", message),
            OutputMode::Memory => self.push_entry(level, message, category),
            OutputMode::Both => {
                println!("{}", message);
                self.push_entry(level, message, category);
            }
        }
    }

    /// Log at Minimal level (game start/end, victory)
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    /// Log at Normal level (announcements, speeches)
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, Some("event"));
    }

    /// Log at Verbose level (routing and delta detail)
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, Some("turn"));
    }

    fn push_entry(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        self.log_buffer.borrow_mut().push(LogEntry {
            level,
            message: message.to_string(),
            category: category.map(|s| s.to_string()),
        });
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}
