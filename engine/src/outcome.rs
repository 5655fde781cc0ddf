//! Randomized capture decisions.
//!
//! Capture success is a two-stage draw: the first draw picks this attempt's
//! chance in `[0.15, 0.40)`, the second tests against it. Both draws happen
//! on every attempt.

use pokecatch_types::RandomSource;

pub const CAPTURE_CHANCE_MIN: f64 = 0.15;
pub const CAPTURE_CHANCE_MAX: f64 = 0.40;

/// Which way a failed capture bounces. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionDirection {
    Left,
    Right,
}

/// This attempt's success probability.
pub fn capture_chance(rng: &mut dyn RandomSource) -> f64 {
    CAPTURE_CHANCE_MIN + rng.next_unit() * (CAPTURE_CHANCE_MAX - CAPTURE_CHANCE_MIN)
}

pub fn roll_capture_success(rng: &mut dyn RandomSource) -> bool {
    let chance = capture_chance(rng);
    rng.next_unit() < chance
}

pub fn roll_rejection_direction(rng: &mut dyn RandomSource) -> RejectionDirection {
    if rng.next_unit() < 0.5 {
        RejectionDirection::Left
    } else {
        RejectionDirection::Right
    }
}
