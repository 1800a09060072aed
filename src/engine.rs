use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::{Remaining, SessionClock, SystemTimeSource, TimeSource};
use crate::error::Result;
use crate::language::Language;
use crate::scoring::{Mark, ScoringBuffer, WordOutcome};
use crate::session::{FinishReason, RunningStats, SessionConfig, SessionState, TestMode};
use crate::time_series::{TimeSeriesPoint, WpmSeries};
use crate::word_source::WordSource;

/// Words pulled ahead of the cursor so the display can show what comes next
pub const LOOKAHEAD: usize = 12;

/// Submitted words carried in a snapshot
const SNAPSHOT_HISTORY: usize = 64;

/// A key press, already decoded from whatever the terminal delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Space,
    Enter,
    Backspace,
    Restart,
    Quit,
}

/// Read-only view of an engine, taken once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: SessionState,
    pub mode: TestMode,
    pub wpm: f64,
    pub accuracy: f64,
    pub elapsed: Duration,
    pub remaining: Remaining,
    pub current_word: String,
    pub typed: String,
    pub marks: Vec<Mark>,
    pub upcoming: Vec<String>,
    pub history: Vec<WordOutcome>,
    pub stats: RunningStats,
    pub wpm_series: Vec<TimeSeriesPoint>,
    pub consistency: Option<f64>,
}

/// One typing test, from the first key to its results.
///
/// Created -> Running on the first key, Running -> Finished on
/// expiry or quit. Nothing leaves Finished except a restart, which
/// rebuilds the whole session from its configuration.
pub struct SessionEngine {
    config: SessionConfig,
    source: WordSource,
    upcoming: VecDeque<String>,
    buffer: ScoringBuffer,
    history: Vec<WordOutcome>,
    stats: RunningStats,
    clock: SessionClock,
    state: SessionState,
    series: WpmSeries,
    time: Arc<dyn TimeSource>,
}

impl SessionEngine {
    /// Build a session from configuration, loading the word list it names.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let language = Language::load(config.wordlist.as_deref())?;
        let limit = match config.mode {
            TestMode::Time { .. } => None,
            TestMode::Words { count } => Some(count),
        };
        let source = WordSource::sampled(language.words, limit, config.seed)?;
        Self::with_source(config, source, Arc::new(SystemTimeSource))
    }

    /// Build a session over an explicit word source and clock
    pub fn with_source(
        config: SessionConfig,
        source: WordSource,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "new {} session (seed: {:?}, wordlist: {:?})",
            config.mode.name(),
            config.seed,
            config.wordlist
        );
        Ok(Self::build(config, source, time))
    }

    fn build(config: SessionConfig, source: WordSource, time: Arc<dyn TimeSource>) -> Self {
        let mut engine = Self {
            clock: SessionClock::new(config.mode),
            config,
            source,
            upcoming: VecDeque::with_capacity(LOOKAHEAD),
            buffer: ScoringBuffer::empty(),
            history: Vec::new(),
            stats: RunningStats::default(),
            state: SessionState::Created,
            series: WpmSeries::default(),
            time,
        };
        engine.buffer = engine
            .next_word()
            .map_or_else(ScoringBuffer::empty, |w| ScoringBuffer::new(&w));
        engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> RunningStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn handle_key(&mut self, action: KeyAction) {
        let now = self.time.now();

        match action {
            KeyAction::Quit => self.finish(FinishReason::UserQuit, now),
            KeyAction::Restart => {
                self.restart();
                return;
            }
            _ if self.state.is_finished() => {}
            KeyAction::Char(c) => {
                self.check_time_up(now);
                if !self.state.is_finished() {
                    self.type_char(c, now);
                }
            }
            KeyAction::Space | KeyAction::Enter => {
                self.check_time_up(now);
                if !self.state.is_finished() {
                    self.start(now);
                    self.submit(now);
                }
            }
            KeyAction::Backspace => {
                self.buffer.backspace();
            }
        }

        self.after_event(now);
    }

    /// Called when no key arrived within a poll interval
    pub fn tick(&mut self) {
        let now = self.time.now();
        self.after_event(now);
    }

    /// Throw everything away and start over with the same settings
    pub fn restart(&mut self) {
        log::info!("restarting {} session", self.config.mode.name());
        let source = self.source.rewind();
        *self = Self::build(self.config.clone(), source, Arc::clone(&self.time));
    }

    pub fn wpm(&self) -> f64 {
        self.wpm_at(self.time.now())
    }

    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy()
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.time.now();

        let upcoming_cap = match self.config.mode {
            TestMode::Time { .. } => LOOKAHEAD,
            TestMode::Words { count } => count
                .saturating_sub(self.stats.words_completed)
                .saturating_sub(1),
        };

        Snapshot {
            state: self.state,
            mode: self.config.mode,
            wpm: self.wpm_at(now),
            accuracy: self.stats.accuracy(),
            elapsed: self.clock.elapsed(now),
            remaining: self.clock.remaining(now, self.stats.words_completed),
            current_word: self.buffer.target(),
            typed: self.buffer.typed(),
            marks: self.buffer.marks().to_vec(),
            upcoming: self.upcoming.iter().take(upcoming_cap).cloned().collect(),
            history: self
                .history
                .iter()
                .skip(self.history.len().saturating_sub(SNAPSHOT_HISTORY))
                .cloned()
                .collect(),
            stats: self.stats,
            wpm_series: self.series.points().to_vec(),
            consistency: self.series.consistency(),
        }
    }

    fn wpm_at(&self, now: Instant) -> f64 {
        let minutes = self.clock.elapsed(now).as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        (self.stats.correct_chars as f64 / 5.0) / minutes
    }

    fn start(&mut self, now: Instant) {
        if self.state == SessionState::Created && self.clock.on_first_keystroke(now) {
            log::debug!("first keystroke, clock started");
            self.state = SessionState::Running;
        }
    }

    fn type_char(&mut self, c: char, now: Instant) {
        self.start(now);
        self.buffer.feed(c);
    }

    fn submit(&mut self, now: Instant) {
        let next = self.next_word();
        let buffer = std::mem::replace(
            &mut self.buffer,
            next.map_or_else(ScoringBuffer::empty, |w| ScoringBuffer::new(&w)),
        );
        let outcome = buffer.submit();
        self.stats.fold(&outcome);
        self.history.push(outcome);
        if self.history.len() > SNAPSHOT_HISTORY {
            let excess = self.history.len() - SNAPSHOT_HISTORY;
            self.history.drain(..excess);
        }

        if let TestMode::Words { count } = self.config.mode {
            if self.stats.words_completed >= count {
                self.finish(FinishReason::Completed, now);
            }
        }
    }

    fn check_time_up(&mut self, now: Instant) {
        if matches!(self.config.mode, TestMode::Time { .. })
            && !self.state.is_finished()
            && self.clock.is_expired(now, self.stats.words_completed)
        {
            // the partly typed word is not scored
            self.buffer = ScoringBuffer::empty();
            self.finish(FinishReason::TimeUp, now);
        }
    }

    fn after_event(&mut self, now: Instant) {
        self.check_time_up(now);
        if self.state == SessionState::Running {
            let elapsed = self.clock.elapsed(now).as_secs_f64();
            let wpm = self.wpm_at(now);
            self.series.sample(elapsed, wpm);
        }
    }

    fn finish(&mut self, reason: FinishReason, now: Instant) {
        if self.state.is_finished() {
            return;
        }
        self.clock.stop(now);
        self.state = SessionState::Finished(reason);

        let elapsed = self.clock.elapsed(now).as_secs_f64();
        let wpm = self.wpm_at(now);
        self.series.finish(elapsed, wpm);

        log::info!(
            "session finished ({:?}): {:.1} wpm, {:.0}% acc, {} words in {:.1}s",
            reason,
            wpm,
            self.stats.accuracy(),
            self.stats.words_completed,
            elapsed
        );
    }

    fn next_word(&mut self) -> Option<String> {
        while self.upcoming.len() <= LOOKAHEAD {
            match self.source.next() {
                Some(word) => self.upcoming.push_back(word),
                None => break,
            }
        }
        self.upcoming.pop_front()
    }
}
