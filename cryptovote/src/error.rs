use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("cryptovote: L function modulus must be non-zero")]
    ZeroModulus,

    #[error("cryptovote: L function argument must be at least 1")]
    LFunctionDomain,

    #[error("cryptovote: random coprime modulus must be greater than 1")]
    ModulusTooSmall,

    #[error("cryptovote: invalid ciphertext length {len} for block size {block}")]
    InvalidCiphertextLength { len: usize, block: usize },

    #[error("cryptovote: invalid padding")]
    InvalidPadding,

    #[error("cryptovote: paillier plaintext must be less than n")]
    PlaintextOutOfRange,

    #[error("cryptovote: paillier ciphertext must be less than n^2")]
    CiphertextOutOfRange,

    #[error("cryptovote: paillier ciphertext must be coprime to n")]
    CiphertextNotUnit,

    #[error("cryptovote: invalid paillier key size {0} (must be even and at least 64 bits)")]
    InvalidKeySize(usize),

    #[error("cryptovote: modular inverse does not exist - check key generation")]
    NoModularInverse,

    #[error("cryptovote: invalid key - invalid hexidecimal")]
    KeyBadHex,

    #[error("cryptovote: invalid key - wrong length")]
    KeyBadLen,

    #[error("cryptovote: invalid hexidecimal integer")]
    IntegerBadHex,

    #[error("cryptovote: at least one candidate is required")]
    NoCandidates,

    #[error("cryptovote: candidate {0} does not exist")]
    InvalidCandidate(usize),

    #[error("cryptovote: ballot {0} does not exist")]
    BallotNotFound(usize),

    #[error("cryptovote: {ballots} ballots exceed the configured maximum of {max_voters} voters")]
    TooManyBallots { ballots: usize, max_voters: u64 },

    #[error("cryptovote: decoded tally exceeds the encoding capacity")]
    TallyOverflow,

    #[error("cryptovote: CBOR error: {0}")]
    CBOR(#[from] serde_cbor::Error),

    #[error("cryptovote: JSON error: {0}")]
    JSON(#[from] serde_json::Error),

    #[error("cryptovote: error deserializing: unknown format")]
    DeserializationUnknownFormat,
}

impl Error {
    /// True for errors caused by malformed caller input, as opposed to arithmetic
    /// impossibility or serialization failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::ZeroModulus
                | Error::LFunctionDomain
                | Error::ModulusTooSmall
                | Error::InvalidCiphertextLength { .. }
                | Error::InvalidPadding
                | Error::PlaintextOutOfRange
                | Error::CiphertextOutOfRange
                | Error::CiphertextNotUnit
                | Error::InvalidKeySize(_)
                | Error::KeyBadHex
                | Error::KeyBadLen
                | Error::IntegerBadHex
                | Error::NoCandidates
                | Error::InvalidCandidate(_)
                | Error::BallotNotFound(_)
                | Error::TooManyBallots { .. }
        )
    }
}
