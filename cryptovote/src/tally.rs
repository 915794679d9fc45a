use crate::*;
use num_bigint::BigUint;

/// The homomorphic sum of every ballot's weight ciphertext
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EncryptedTally {
    pub num_ballots: usize,
    pub ciphertext: PaillierCiphertext,
}

impl EncryptedTally {
    /// Sum the ballots without decrypting any of them.
    ///
    /// More ballots than `max_voters` could push a count past the encoding base, so that is
    /// refused up front.
    pub fn tally(
        ballots: &[EncryptedBallot],
        public_key: &PaillierPublicKey,
        weights: &VoteWeights,
    ) -> Result<Self, Error> {
        if ballots.len() as u64 > weights.max_voters() {
            return Err(Error::TooManyBallots {
                ballots: ballots.len(),
                max_voters: weights.max_voters(),
            });
        }

        Ok(EncryptedTally {
            num_ballots: ballots.len(),
            ciphertext: public_key.sum(ballots.iter().map(|b| &b.weight)),
        })
    }

    /// Decrypt the sum and decode one count per candidate
    pub fn decrypt(
        &self,
        keypair: &PaillierKeyPair,
        weights: &VoteWeights,
    ) -> Result<TallyResult, Error> {
        let total = keypair.decrypt(&self.ciphertext)?;
        let counts = weights.decode_counts(&total)?;

        Ok(TallyResult {
            total,
            counts,
            num_ballots: self.num_ballots,
        })
    }
}

/// A decrypted and decoded tally
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TallyResult {
    /// The decrypted sum of weights
    #[serde(with = "biguint_hex")]
    pub total: BigUint,

    /// Votes per candidate, by candidate index
    pub counts: Vec<u64>,

    pub num_ballots: usize,
}

impl TallyResult {
    pub fn total_votes(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Indexes of the candidates with the most votes
    pub fn leaders(&self) -> Vec<usize> {
        let most = match self.counts.iter().max() {
            Some(&most) if most > 0 => most,
            _ => return vec![],
        };
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == most)
            .map(|(candidate, _)| candidate)
            .collect()
    }

    /// Compare the decoded counts against the counts actually cast.
    pub fn verify(&self, actual: &[u64]) -> Verification {
        let candidates: Vec<CandidateCheck> = self
            .counts
            .iter()
            .enumerate()
            .map(|(candidate, &decoded)| {
                let expected = actual.get(candidate).copied().unwrap_or(0);
                CandidateCheck {
                    candidate,
                    decoded,
                    expected,
                }
            })
            .collect();

        // Counts cast for candidates beyond the decoded range were lost
        let missing = actual.len() > self.counts.len()
            && actual[self.counts.len()..].iter().any(|&c| c != 0);

        let total_decoded = self.total_votes();
        let total_mismatch = self.num_ballots > 0 && total_decoded != self.num_ballots as u64;

        let passed = !missing && !total_mismatch && candidates.iter().all(|c| c.passed());

        Verification {
            candidates,
            total_decoded,
            num_ballots: self.num_ballots,
            total_mismatch,
            passed,
        }
    }
}

/// Decoded and expected count for one candidate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CandidateCheck {
    pub candidate: usize,
    pub decoded: u64,
    pub expected: u64,
}

impl CandidateCheck {
    pub fn passed(&self) -> bool {
        self.decoded == self.expected
    }
}

/// Outcome of checking a tally against the known votes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub candidates: Vec<CandidateCheck>,
    pub total_decoded: u64,
    pub num_ballots: usize,

    /// The decoded counts do not add up to the number of ballots tallied
    pub total_mismatch: bool,

    pub passed: bool,
}
