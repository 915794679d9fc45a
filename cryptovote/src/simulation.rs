//! A complete simulated election: key generation, casting, tallying and verification.

use crate::*;
use content_inspector::ContentType;
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Paillier modulus size used when none is configured
pub const DEFAULT_KEY_BITS: usize = 1024;

/// Parameters of a simulated election
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationParams {
    pub num_candidates: usize,

    /// The expected maximum number of voters `k`, giving the encoding base `M = k + 1`
    pub max_voters: u64,

    pub num_votes: usize,
    pub key_bits: usize,
}

impl SimulationParams {
    pub fn new(num_candidates: usize, max_voters: u64, num_votes: usize) -> Self {
        SimulationParams {
            num_candidates,
            max_voters,
            num_votes,
            key_bits: DEFAULT_KEY_BITS,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.num_candidates == 0 {
            return Err(Error::NoCandidates);
        }
        if self.num_votes as u64 > self.max_voters {
            return Err(Error::TooManyBallots {
                ballots: self.num_votes,
                max_voters: self.max_voters,
            });
        }
        if self.key_bits < MIN_KEY_BITS || self.key_bits % 2 != 0 {
            return Err(Error::InvalidKeySize(self.key_bits));
        }
        Ok(())
    }
}

/// Keys and weights for a simulated election, ready to cast ballots
pub struct Simulation {
    params: SimulationParams,
    cipher: PiiCipher,
    keypair: PaillierKeyPair,
    weights: VoteWeights,
}

impl Simulation {
    /// Validate the parameters and generate fresh symmetric and Paillier keys.
    pub fn setup<R: Rng + CryptoRng + ?Sized>(
        params: SimulationParams,
        kind: CipherKind,
        padding: Padding,
        rng: &mut R,
    ) -> Result<Self, Error> {
        params.validate()?;
        let keypair = PaillierKeyPair::generate(params.key_bits, rng)?;
        let cipher = PiiCipher::generate(kind, padding, rng);
        Self::with_keys(params, cipher, keypair)
    }

    /// Use existing keys. The Paillier modulus must be large enough to hold a full tally.
    pub fn with_keys(
        params: SimulationParams,
        cipher: PiiCipher,
        keypair: PaillierKeyPair,
    ) -> Result<Self, Error> {
        let weights = VoteWeights::new(params.num_candidates, params.max_voters)?;
        if weights.capacity() >= keypair.public.n {
            return Err(Error::PlaintextOutOfRange);
        }
        Ok(Simulation {
            params,
            cipher,
            keypair,
            weights,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn weights(&self) -> &VoteWeights {
        &self.weights
    }

    /// Cast `num_votes` ballots for uniformly drawn candidates, then tally them.
    pub fn run<R: Rng + CryptoRng + ?Sized>(self, rng: &mut R) -> Result<SimulationOutcome, Error> {
        let choices: Vec<usize> = (0..self.params.num_votes)
            .map(|_| rng.gen_range(0, self.params.num_candidates))
            .collect();
        self.run_with_choices(&choices, rng)
    }

    /// Cast one ballot per entry of `choices`, then tally them.
    pub fn run_with_choices<R: Rng + CryptoRng + ?Sized>(
        self,
        choices: &[usize],
        rng: &mut R,
    ) -> Result<SimulationOutcome, Error> {
        let mut actual_counts = vec![0u64; self.params.num_candidates];
        let mut ballots = Vec::with_capacity(choices.len());

        for (i, &choice) in choices.iter().enumerate() {
            let pii = format!("FName_{} LName_{}", i, i);
            let ballot = EncryptedBallot::cast(
                &pii,
                choice,
                &self.weights,
                &self.cipher,
                &self.keypair.public,
                rng,
            )?;
            actual_counts[choice] += 1;
            ballots.push(ballot);
        }

        let tally = EncryptedTally::tally(&ballots, &self.keypair.public, &self.weights)?;
        let result = tally.decrypt(&self.keypair, &self.weights)?;
        let verification = result.verify(&actual_counts);

        Ok(SimulationOutcome {
            params: self.params,
            cipher: self.cipher,
            keypair: self.keypair,
            weights: self.weights,
            ballots,
            actual_counts,
            tally,
            result,
            verification,
        })
    }
}

/// Everything a finished simulation produced, secrets included
pub struct SimulationOutcome {
    pub params: SimulationParams,
    pub cipher: PiiCipher,
    pub keypair: PaillierKeyPair,
    pub weights: VoteWeights,
    pub ballots: Vec<EncryptedBallot>,

    /// Votes actually cast per candidate, for verification
    pub actual_counts: Vec<u64>,

    pub tally: EncryptedTally,
    pub result: TallyResult,
    pub verification: Verification,
}

impl SimulationOutcome {
    pub fn decrypt_ballot(&self, index: usize) -> Result<DecryptedBallot, Error> {
        let ballot = self.ballots.get(index).ok_or(Error::BallotNotFound(index))?;
        ballot.decrypt(&self.cipher, &self.keypair, &self.weights)
    }

    /// The publishable part of the outcome
    pub fn record(&self) -> SimulationRecord {
        SimulationRecord {
            params: self.params,
            cipher: self.cipher.kind(),
            padding: self.cipher.padding(),
            public_key: self.keypair.public.clone(),
            ballots: self.ballots.clone(),
            tally: self.tally.clone(),
            result: self.result.clone(),
        }
    }

    /// The keys needed to open individual ballots
    pub fn secrets(&self) -> SimulationSecrets {
        SimulationSecrets {
            cipher: self.cipher.kind(),
            padding: self.cipher.padding(),
            symmetric_key: self.cipher.key_hex(),
            paillier: self.keypair.clone(),
        }
    }
}

/// On-disk encoding of simulation files
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Json,
    Cbor,
}

impl Default for Format {
    fn default() -> Self {
        Format::Json
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "cbor" => Ok(Format::Cbor),
            other => Err(format!("unknown format '{}' (expected json or cbor)", other)),
        }
    }
}

fn encode<T: Serialize>(value: &T, format: Format) -> Result<Vec<u8>, Error> {
    Ok(match format {
        Format::Json => serde_json::to_vec_pretty(value)?,
        Format::Cbor => serde_cbor::to_vec(value)?,
    })
}

// A CBOR map may hold no null bytes at all, so only a leading `{` marks JSON
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let starts_as_json = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map_or(false, |&b| b == b'{');

    match content_inspector::inspect(bytes) {
        ContentType::UTF_8 if starts_as_json => Ok(serde_json::from_slice(bytes)?),
        ContentType::UTF_8 | ContentType::BINARY => Ok(serde_cbor::from_slice(bytes)?),
        _ => Err(Error::DeserializationUnknownFormat),
    }
}

/// Public data of a simulated election: no private key material
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SimulationRecord {
    pub params: SimulationParams,
    pub cipher: CipherKind,
    pub padding: Padding,
    pub public_key: PaillierPublicKey,
    pub ballots: Vec<EncryptedBallot>,
    pub tally: EncryptedTally,
    pub result: TallyResult,
}

impl SimulationRecord {
    pub fn to_bytes(&self, format: Format) -> Result<Vec<u8>, Error> {
        encode(self, format)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        decode(bytes)
    }

    pub fn weights(&self) -> Result<VoteWeights, Error> {
        VoteWeights::new(self.params.num_candidates, self.params.max_voters)
    }

    /// Open ballot `index` with the election's secrets.
    pub fn decrypt_ballot(
        &self,
        index: usize,
        secrets: &SimulationSecrets,
    ) -> Result<DecryptedBallot, Error> {
        let ballot = self.ballots.get(index).ok_or(Error::BallotNotFound(index))?;
        ballot.decrypt(&secrets.cipher()?, &secrets.paillier, &self.weights()?)
    }
}

/// Private key material of a simulated election
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SimulationSecrets {
    pub cipher: CipherKind,
    pub padding: Padding,

    /// Hex encoded symmetric key
    pub symmetric_key: String,

    pub paillier: PaillierKeyPair,
}

impl SimulationSecrets {
    pub fn to_bytes(&self, format: Format) -> Result<Vec<u8>, Error> {
        encode(self, format)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        decode(bytes)
    }

    /// Rebuild the PII cipher from the stored key
    pub fn cipher(&self) -> Result<PiiCipher, Error> {
        PiiCipher::from_hex_key(self.cipher, self.padding, &self.symmetric_key)
    }

    /// Decrypt a tally with the stored Paillier key
    pub fn decrypt_total(&self, tally: &EncryptedTally) -> Result<BigUint, Error> {
        self.paillier.decrypt(&tally.ciphertext)
    }
}

impl fmt::Debug for SimulationSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationSecrets")
            .field("cipher", &self.cipher)
            .field("padding", &self.padding)
            .field("paillier", &self.paillier)
            .finish()
    }
}

impl Drop for SimulationSecrets {
    fn drop(&mut self) {
        self.symmetric_key.zeroize();
    }
}
