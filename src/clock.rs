use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::session::TestMode;

/// Where the engine reads "now" from
pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to, for driving sessions in tests
#[derive(Debug)]
pub struct ManualTimeSource {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualTimeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + offset
    }
}

/// What is left of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remaining {
    Time(Duration),
    Words(usize),
}

/// Tracks a session's elapsed time and its expiry condition.
///
/// Starts on the first accepted character and stops when the session
/// finishes; both happen at most once.
#[derive(Debug, Clone)]
pub struct SessionClock {
    mode: TestMode,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl SessionClock {
    pub fn new(mode: TestMode) -> Self {
        Self {
            mode,
            started_at: None,
            stopped_at: None,
        }
    }

    pub fn mode(&self) -> TestMode {
        self.mode
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Returns true only for the call that actually started the clock
    pub fn on_first_keystroke(&mut self, now: Instant) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Freeze elapsed time. A timed session never runs past its limit.
    pub fn stop(&mut self, now: Instant) {
        if self.stopped_at.is_some() {
            return;
        }
        let Some(start) = self.started_at else {
            return;
        };
        let end = match self.mode {
            TestMode::Time { seconds } => start
                .checked_add(Duration::from_secs(seconds))
                .map_or(now, |limit| now.min(limit)),
            TestMode::Words { .. } => now,
        };
        self.stopped_at = Some(end.max(start));
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn remaining(&self, now: Instant, words_completed: usize) -> Remaining {
        match self.mode {
            TestMode::Time { seconds } => {
                Remaining::Time(Duration::from_secs(seconds).saturating_sub(self.elapsed(now)))
            }
            TestMode::Words { count } => Remaining::Words(count.saturating_sub(words_completed)),
        }
    }

    pub fn is_expired(&self, now: Instant, words_completed: usize) -> bool {
        match self.mode {
            TestMode::Time { seconds } => {
                self.has_started() && self.elapsed(now) >= Duration::from_secs(seconds)
            }
            TestMode::Words { count } => words_completed >= count,
        }
    }
}
