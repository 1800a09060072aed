/// Most characters kept past the end of a target word. Further keystrokes on
/// that word are dropped.
pub const MAX_EXTRA_CHARS: usize = 20;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum KeystrokeResult {
    Correct,
    Incorrect,
    /// typed past the end of the target, always scored incorrect
    Extra,
    Deleted,
}

/// Classification of a single position inside the target word
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Incorrect,
}

/// Final tally for one submitted word
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordOutcome {
    pub target: String,
    pub typed: String,
    pub correct: usize,
    pub incorrect: usize,
    pub missed: usize,
    pub extra: usize,
}

impl WordOutcome {
    /// characters that count against accuracy
    pub fn errors(&self) -> usize {
        self.incorrect + self.missed + self.extra
    }

    pub fn is_perfect(&self) -> bool {
        self.errors() == 0
    }
}

/// The active word: its target text and what has been typed for it so far.
///
/// Nothing here is counted toward the session totals until [`ScoringBuffer::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringBuffer {
    target: Vec<char>,
    typed: Vec<char>,
    marks: Vec<Mark>,
}

impl ScoringBuffer {
    pub fn new(word: &str) -> Self {
        let target: Vec<char> = word.chars().collect();
        Self {
            marks: Vec::with_capacity(target.len()),
            typed: Vec::with_capacity(target.len()),
            target,
        }
    }

    /// Placeholder once a bounded session has run out of words
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn typed(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn typed_len(&self) -> usize {
        self.typed.len()
    }

    /// Current marks for the typed positions that fall inside the target
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Characters typed past the end of the target
    pub fn extra(&self) -> String {
        self.typed.iter().skip(self.target.len()).collect()
    }

    pub fn extra_count(&self) -> usize {
        self.typed.len().saturating_sub(self.target.len())
    }

    pub fn is_empty(&self) -> bool {
        self.typed.is_empty()
    }

    /// Append a keystroke. Returns `None` when the overflow is already full.
    pub fn feed(&mut self, c: char) -> Option<KeystrokeResult> {
        let idx = self.typed.len();
        if idx < self.target.len() {
            let mark = if self.target[idx] == c {
                Mark::Correct
            } else {
                Mark::Incorrect
            };
            self.typed.push(c);
            self.marks.push(mark);
            return Some(match mark {
                Mark::Correct => KeystrokeResult::Correct,
                Mark::Incorrect => KeystrokeResult::Incorrect,
            });
        }

        if self.extra_count() >= MAX_EXTRA_CHARS {
            return None;
        }
        self.typed.push(c);
        Some(KeystrokeResult::Extra)
    }

    /// Remove the last typed character; a no-op on an empty word.
    pub fn backspace(&mut self) -> Option<KeystrokeResult> {
        self.typed.pop()?;
        if self.marks.len() > self.typed.len() {
            self.marks.pop();
        }
        Some(KeystrokeResult::Deleted)
    }

    /// Score the word as it stands. Untyped target positions are misses.
    pub fn submit(self) -> WordOutcome {
        let correct = self.marks.iter().filter(|m| **m == Mark::Correct).count();
        let incorrect = self.marks.len() - correct;
        let missed = self.target.len() - self.marks.len();
        let extra = self.extra_count();

        WordOutcome {
            target: self.target.iter().collect(),
            typed: self.typed.iter().collect(),
            correct,
            incorrect,
            missed,
            extra,
        }
    }
}
