use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::error::{Result, SessionError};

/// How the next word is picked from the pool
#[derive(Debug, Clone)]
enum Order {
    /// Walk the pool front to back, wrapping around when unbounded
    Sequential { cursor: usize },
    /// Pick uniformly at random, never repeating the previous pick
    Sampled {
        rng: StdRng,
        seed: Option<u64>,
        last: Option<usize>,
    },
}

/// Supplies target words to a session.
///
/// A source is either bounded (yields exactly `limit` words, then `None`) or
/// unbounded. Restarting a session takes a fresh cursor via [`WordSource::rewind`].
#[derive(Debug, Clone)]
pub struct WordSource {
    pool: Arc<[String]>,
    order: Order,
    limit: Option<usize>,
    produced: usize,
}

impl WordSource {
    /// Yields `words` in order. With `limit` unset the list repeats forever.
    pub fn fixed(words: Vec<String>, limit: Option<usize>) -> Result<Self> {
        let pool = into_pool(words)?;
        Ok(Self {
            pool,
            order: Order::Sequential { cursor: 0 },
            limit,
            produced: 0,
        })
    }

    /// Random picks from `words`, reproducible when `seed` is given.
    pub fn sampled(words: Vec<String>, limit: Option<usize>, seed: Option<u64>) -> Result<Self> {
        let pool = into_pool(words)?;
        Ok(Self {
            pool,
            order: Order::Sampled {
                rng: make_rng(seed),
                seed,
                last: None,
            },
            limit,
            produced: 0,
        })
    }

    /// A fresh cursor over the same pool and settings. Seeded sources replay
    /// the same sequence, unseeded ones draw a new one.
    pub fn rewind(&self) -> Self {
        let order = match &self.order {
            Order::Sequential { .. } => Order::Sequential { cursor: 0 },
            Order::Sampled { seed, .. } => Order::Sampled {
                rng: make_rng(*seed),
                seed: *seed,
                last: None,
            },
        };
        Self {
            pool: Arc::clone(&self.pool),
            order,
            limit: self.limit,
            produced: 0,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.produced >= limit)
    }
}

impl Iterator for WordSource {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.is_exhausted() {
            return None;
        }

        let len = self.pool.len();
        let idx = match &mut self.order {
            Order::Sequential { cursor } => {
                let idx = *cursor % len;
                *cursor += 1;
                idx
            }
            Order::Sampled { rng, last, .. } => {
                let idx = match *last {
                    Some(prev) if len > 1 => {
                        // draw from the pool minus the previous pick
                        let pick = rng.gen_range(0..len - 1);
                        if pick >= prev {
                            pick + 1
                        } else {
                            pick
                        }
                    }
                    _ => rng.gen_range(0..len),
                };
                *last = Some(idx);
                idx
            }
        };

        self.produced += 1;
        Some(self.pool[idx].clone())
    }
}

fn into_pool(words: Vec<String>) -> Result<Arc<[String]>> {
    if words.is_empty() {
        return Err(SessionError::EmptyWordlist);
    }
    Ok(words.into())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
