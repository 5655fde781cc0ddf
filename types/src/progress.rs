//! Counters and collection progress derived from the ledgers.

use serde::{Deserialize, Serialize};

/// Lifetime encounter and capture totals. Both only ever grow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Counters {
    pub total_encounters: u64,
    pub total_captures: u64,
}

impl Counters {
    /// Captures per encounter as a whole percentage; 0 before any encounter.
    #[must_use]
    pub fn capture_rate(&self) -> u32 {
        percent(self.total_captures, self.total_encounters)
    }
}

/// Caught and seen species against the size of the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexProgress {
    pub caught: usize,
    pub seen: usize,
    pub total: u16,
}

impl DexProgress {
    #[must_use]
    pub fn completion_percent(&self) -> u32 {
        percent(self.caught as u64, u64::from(self.total))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.caught >= usize::from(self.total)
    }
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}
