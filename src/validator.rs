//! Checksum comparison.

use crate::checksum::EXPECTED_CHECKSUM;

/// Outcome of comparing a cycle's sum with the reference checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub const fn is_match(self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Compares `sum` against [`EXPECTED_CHECKSUM`].
pub const fn validate(sum: u32) -> Verdict {
    if sum == EXPECTED_CHECKSUM {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}
