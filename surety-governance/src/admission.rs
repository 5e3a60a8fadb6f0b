//! Airline admission policy
//!
//! The first airlines (the founding cohort) are admitted directly by any
//! funded registrant. Past that size, a candidate needs votes from a
//! strict majority of the airlines registered at proposal time.
//!
//! # Example
//!
//! ```text
//! Registered: 4          Registered: 5
//! Majority:   > 2        Majority:   > 2 (5 / 2 = 2)
//! Required:   3 votes    Required:   3 votes
//! ```

/// Whether a candidate bypasses voting entirely
pub fn direct_admission(registered_count: usize, founding_cohort_size: usize) -> bool {
    registered_count < founding_cohort_size
}

/// Distinct votes required for admission by consensus
///
/// Strict majority of the currently registered airlines: the tally must
/// exceed `registered_count / 2` (integer division), so `votes >=
/// votes_required(..)` is the admission test.
pub fn votes_required(registered_count: usize) -> usize {
    registered_count / 2 + 1
}
