//! Shuffled level queue for a match.

use rand::seq::SliceRandom;
use rand::Rng;

/// Levels to play, in order. Nothing is current until the first advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelQueue {
    levels: Vec<String>,
    index: Option<usize>,
}

impl LevelQueue {
    /// Fixed order, no shuffling.
    pub fn new(levels: Vec<String>) -> Self {
        Self {
            levels,
            index: None,
        }
    }

    /// `repeat_count` copies of `names`, each copy shuffled independently.
    pub fn shuffled<R: Rng + ?Sized>(names: &[&str], repeat_count: usize, rng: &mut R) -> Self {
        let mut levels = Vec::with_capacity(names.len() * repeat_count);
        for _ in 0..repeat_count {
            let mut round: Vec<String> = names.iter().map(|n| n.to_string()).collect();
            round.shuffle(rng);
            levels.extend(round);
        }
        Self::new(levels)
    }

    pub fn current(&self) -> Option<&str> {
        self.index.and_then(|i| self.levels.get(i)).map(String::as_str)
    }

    /// Level the next advance would load.
    pub fn peek_next(&self) -> Option<&str> {
        let next = self.index.map_or(0, |i| i + 1);
        self.levels.get(next).map(String::as_str)
    }

    /// True once the current entry is the last one (or the queue is empty).
    pub fn is_exhausted(&self) -> bool {
        match self.index {
            Some(i) => i + 1 >= self.levels.len(),
            None => self.levels.is_empty(),
        }
    }

    /// Move to the next entry. No-op when exhausted.
    pub fn advance(&mut self) -> Option<&str> {
        if self.is_exhausted() {
            return None;
        }
        let next = self.index.map_or(0, |i| i + 1);
        self.index = Some(next);
        self.levels.get(next).map(String::as_str)
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }
}
