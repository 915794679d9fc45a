//! Base-M positional encoding of per-candidate votes.
//!
//! Candidate `i` is worth `M^i` with `M = max_voters + 1`, so a sum of weights is the vector
//! of counts written as the digits of a base-M number.

use crate::*;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;

/// `[M^0, M^1, ..., M^(num_candidates - 1)]` with `M = max_voters + 1`.
pub fn calc_weights(num_candidates: usize, max_voters: u64) -> Vec<BigUint> {
    let base = BigUint::from(max_voters) + BigUint::one();

    let mut weights = Vec::with_capacity(num_candidates);
    let mut weight = BigUint::one();
    for _ in 0..num_candidates {
        let next = &weight * &base;
        weights.push(weight);
        weight = next;
    }
    weights
}

/// Split `total` into `num_candidates` base-`base` digits, least significant first.
///
/// Only exact when every count is below `base`. Anything left above the last digit is
/// dropped; use [`VoteWeights::decode_counts`] to have it reported instead.
pub fn decode(total: &BigUint, num_candidates: usize, base: &BigUint) -> Vec<BigUint> {
    let mut remaining = total.clone();
    let mut counts = Vec::with_capacity(num_candidates);
    for _ in 0..num_candidates {
        let (quotient, count) = remaining.div_rem(base);
        counts.push(count);
        remaining = quotient;
    }
    counts
}

/// Vote weights for a single race
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteWeights {
    max_voters: u64,
    base: BigUint,
    weights: Vec<BigUint>,
}

impl VoteWeights {
    pub fn new(num_candidates: usize, max_voters: u64) -> Result<Self, Error> {
        if num_candidates == 0 {
            return Err(Error::NoCandidates);
        }
        Ok(VoteWeights {
            max_voters,
            base: BigUint::from(max_voters) + BigUint::one(),
            weights: calc_weights(num_candidates, max_voters),
        })
    }

    pub fn num_candidates(&self) -> usize {
        self.weights.len()
    }

    pub fn max_voters(&self) -> u64 {
        self.max_voters
    }

    /// The positional base `M = max_voters + 1`
    pub fn base(&self) -> &BigUint {
        &self.base
    }

    pub fn weights(&self) -> &[BigUint] {
        &self.weights
    }

    /// The weight `M^candidate` cast by a vote for `candidate`
    pub fn weight(&self, candidate: usize) -> Result<&BigUint, Error> {
        self.weights
            .get(candidate)
            .ok_or(Error::InvalidCandidate(candidate))
    }

    /// The candidate whose weight is exactly `weight`, if any.
    pub fn candidate_for(&self, weight: &BigUint) -> Option<usize> {
        self.weights.iter().position(|w| w == weight)
    }

    /// Decode a tallied total into one count per candidate.
    ///
    /// Fails with `TallyOverflow` if the total does not fit in `num_candidates` digits.
    pub fn decode_counts(&self, total: &BigUint) -> Result<Vec<u64>, Error> {
        let mut remaining = total.clone();
        let mut counts = Vec::with_capacity(self.weights.len());
        for _ in 0..self.weights.len() {
            let (quotient, count) = remaining.div_rem(&self.base);
            counts.push(count.to_u64().ok_or(Error::TallyOverflow)?);
            remaining = quotient;
        }

        if !remaining.is_zero() {
            return Err(Error::TallyOverflow);
        }
        Ok(counts)
    }

    /// Largest total a race with these weights can legitimately produce
    pub fn capacity(&self) -> BigUint {
        self.weights
            .iter()
            .fold(BigUint::zero(), |acc, w| acc + w * self.max_voters)
    }
}

/// The weights in decimal, as `[1, 11, 121]`
impl fmt::Display for VoteWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights: Vec<String> = self.weights.iter().map(|w| w.to_string()).collect();
        write!(f, "[{}]", weights.join(", "))
    }
}
