//! Format-preserving permutation over an integer range.
//!
//! Given a range `[0, n)`, a [`RangeShuffle`] is a deterministic,
//! seed-controlled bijection from the range onto itself: feed it an
//! incrementing counter and it visits every value exactly once, in an order
//! that looks random, without ever materializing a shuffled list. The
//! classic use is sweeping a large address or port space where every
//! element must eventually be probed exactly once but the visit order
//! should not be obvious from the counter.
//!
//! The construction is a generalized Feistel network over a grid covering
//! the range, in the style of Black and Rogaway's
//! [Ciphers with Arbitrary Finite Domains], with cycle walking to bring
//! grid outputs back inside the range. It is **not** cryptographically
//! strong; only the bijection property is guaranteed.
//!
//! [Ciphers with Arbitrary Finite Domains]: https://www.cs.ucdavis.edu/~rogaway/papers/subset.pdf
//!
//! # Usage
//!
//! ```rust
//! use rangeshuffle::RangeShuffle;
//!
//! # fn main() -> Result<(), rangeshuffle::ShuffleError> {
//! let engine = RangeShuffle::new(1000, 0x00c0_ffee, 4)?;
//!
//! // Positions map into the range, and back.
//! let first = engine.shuffle(0)?;
//! assert!(first < 1000);
//! assert_eq!(engine.unshuffle(first)?, 0);
//!
//! // Driving a counter through the engine enumerates the whole range.
//! let mut seen = vec![false; 1000];
//! for i in 0..1000 {
//!     let v = engine.shuffle(i)? as usize;
//!     assert!(!seen[v]);
//!     seen[v] = true;
//! }
//! # Ok(()) }
//! ```
//!
//! The engine holds no mutable state after construction, so a single
//! instance can be shared across any number of threads without
//! synchronization.

mod feistel;
mod mixer;
mod params;

use thiserror::Error;
use tracing::debug;

/// Errors reported by [`RangeShuffle`].
///
/// Every variant is a local precondition failure detected at the call
/// boundary; the operations are deterministic, so retrying the same call
/// yields the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShuffleError {
    /// The round count was zero at construction.
    #[error("round count must be at least 1")]
    InvalidRounds,
    /// The range size was zero at construction; an empty range has no
    /// valid inputs to permute.
    #[error("range size must be nonzero")]
    InvalidRange,
    /// The derived grid for this range size does not fit the 64-bit
    /// transform domain. Only range sizes within a few billion of
    /// `u64::MAX` can trigger this.
    #[error("range size {range_size} is too large for the transform domain")]
    RangeTooLarge { range_size: u64 },
    /// An index at or beyond the range size was passed to
    /// [`RangeShuffle::shuffle`] or [`RangeShuffle::unshuffle`].
    #[error("index {index} is outside the range 0..{range_size}")]
    OutOfRange { index: u64, range_size: u64 },
    /// The cycle walk failed to re-enter the range within its provable
    /// step bound. This cannot happen for correctly derived grid
    /// parameters; seeing it means parameter derivation is broken.
    #[error("cycle walk did not re-enter the range within {limit} steps")]
    InternalInvariantViolation { limit: u64 },
}

/// A seeded permutation engine over `[0, range_size)`.
///
/// Immutable after construction: [`shuffle`](RangeShuffle::shuffle) and
/// [`unshuffle`](RangeShuffle::unshuffle) are pure functions of the
/// engine's fields and the input index, so shared references can be used
/// freely from concurrent threads.
#[derive(Debug, Clone)]
pub struct RangeShuffle {
    range_size: u64,
    a: u64,
    b: u64,
    seed: u64,
    rounds: u32,
    /// Provable cycle-walk ceiling: a walk visits distinct out-of-range
    /// grid points, of which there are `a*b - range_size`.
    walk_limit: u64,
}

impl RangeShuffle {
    /// Build an engine permuting `[0, range_size)` under `seed`.
    ///
    /// `rounds` must be at least 1; small counts (4-8) are the practical
    /// choice since cryptographic strength is a non-goal. Identical
    /// `(range_size, seed, rounds)` triples always produce identical
    /// permutations.
    pub fn new(range_size: u64, seed: u64, rounds: u32) -> Result<Self, ShuffleError> {
        if rounds == 0 {
            return Err(ShuffleError::InvalidRounds);
        }
        if range_size == 0 {
            return Err(ShuffleError::InvalidRange);
        }

        let grid = params::derive(range_size);
        let domain = grid
            .a
            .checked_mul(grid.b)
            .ok_or(ShuffleError::RangeTooLarge { range_size })?;
        debug!(range_size, a = grid.a, b = grid.b, "derived grid parameters");

        Ok(RangeShuffle {
            range_size,
            a: grid.a,
            b: grid.b,
            seed,
            rounds,
            walk_limit: domain - range_size + 1,
        })
    }

    /// Map a counter position to its shuffled value in `[0, range_size)`.
    pub fn shuffle(&self, index: u64) -> Result<u64, ShuffleError> {
        self.walk(index, feistel::forward)
    }

    /// Map a shuffled value back to its counter position.
    pub fn unshuffle(&self, index: u64) -> Result<u64, ShuffleError> {
        self.walk(index, feistel::inverse)
    }

    /// Cycle-walk `transform` until its output lands inside the range.
    ///
    /// The grid domain `[0, a*b)` is a superset of the range and the
    /// transform is a bijection on it, so repeated application from an
    /// in-range start must re-enter the range; the first re-entry is the
    /// result. Walking with `inverse` reverses a walk made with `forward`
    /// because both traverse the same cycle, in opposite directions.
    fn walk(
        &self,
        index: u64,
        transform: fn(u32, u64, u64, u64, u64) -> u64,
    ) -> Result<u64, ShuffleError> {
        if index >= self.range_size {
            return Err(ShuffleError::OutOfRange {
                index,
                range_size: self.range_size,
            });
        }

        let mut c = transform(self.rounds, self.a, self.b, index, self.seed);
        let mut budget = self.walk_limit;
        while c >= self.range_size {
            if budget == 0 {
                return Err(ShuffleError::InternalInvariantViolation {
                    limit: self.walk_limit,
                });
            }
            budget -= 1;
            c = transform(self.rounds, self.a, self.b, c, self.seed);
        }
        Ok(c)
    }

    /// Exclusive upper bound of the permuted range.
    pub fn range_size(&self) -> u64 {
        self.range_size
    }

    /// Seed the permutation was keyed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of Feistel rounds applied per transform.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
