//! Source of randomness for picking pages and step counts.

use rand::RngExt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rolls a number in `0..upper`. `upper` is always at least 1.
pub trait Dice: Send + Sync {
    fn below(&self, upper: usize) -> usize;
}

/// Thread-local RNG. Stateless, so it can be shared across tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn below(&self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

/// Pre-determined rolls for tests. Each value is reduced modulo `upper`;
/// once the script runs out every roll is 0.
pub struct ScriptedDice {
    rolls: Vec<usize>,
    index: AtomicUsize,
}

impl ScriptedDice {
    pub fn new(rolls: Vec<usize>) -> Self {
        Self {
            rolls,
            index: AtomicUsize::new(0),
        }
    }

    /// How many rolls have been made so far.
    pub fn rolled(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

impl Dice for ScriptedDice {
    fn below(&self, upper: usize) -> usize {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.rolls.get(i).copied().unwrap_or(0) % upper
    }
}
