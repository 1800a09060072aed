use std::path::PathBuf;

use crate::error::{Result, SessionError};
use crate::scoring::WordOutcome;

/// Which limit ends a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Time { seconds: u64 },
    Words { count: usize },
}

impl TestMode {
    pub fn name(&self) -> &'static str {
        match self {
            TestMode::Time { .. } => "time",
            TestMode::Words { .. } => "words",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: TestMode,
    pub wordlist: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn new(mode: TestMode) -> Self {
        Self {
            mode,
            wordlist: None,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.mode {
            TestMode::Time { seconds: 0 } => Err(SessionError::InvalidConfiguration(
                "seconds must be greater than zero".into(),
            )),
            TestMode::Words { count: 0 } => Err(SessionError::InvalidConfiguration(
                "words must be greater than zero".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Completed,
    TimeUp,
    UserQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Running,
    Finished(FinishReason),
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Finished(_))
    }
}

/// Session totals. Only ever grow, and only when a word is submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStats {
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub words_completed: usize,
}

impl RunningStats {
    pub fn fold(&mut self, outcome: &WordOutcome) {
        self.correct_chars += outcome.correct;
        self.incorrect_chars += outcome.errors();
        self.words_completed += 1;
    }

    pub fn scored_chars(&self) -> usize {
        self.correct_chars + self.incorrect_chars
    }

    /// Percentage in [0, 100]; 100 before anything has been scored
    pub fn accuracy(&self) -> f64 {
        match self.scored_chars() {
            0 => 100.0,
            total => (self.correct_chars as f64 / total as f64 * 100.0).clamp(0.0, 100.0),
        }
    }
}
