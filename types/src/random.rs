//! Randomness as an injected capability.
//!
//! Every random decision in the game is a uniform draw in `[0, 1)`, so a
//! single-method trait is enough to make the outcome model deterministic in
//! tests.

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Thread-local generator from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty sequence always yields `0.0`.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    #[must_use]
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor = self.cursor.saturating_add(1);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}
