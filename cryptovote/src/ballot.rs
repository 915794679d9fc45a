use crate::*;
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

/// A cast ballot: the voter's PII under the symmetric cipher, and their
/// candidate's weight under Paillier.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBallot {
    /// `IV || ciphertext` CBC message
    #[serde(with = "hex_serde")]
    pub pii: Vec<u8>,

    pub weight: PaillierCiphertext,
}

impl EncryptedBallot {
    /// Encrypt a vote for `candidate` on behalf of the voter identified by `pii`.
    pub fn cast<C, R>(
        pii: &str,
        candidate: usize,
        weights: &VoteWeights,
        cipher: &C,
        public_key: &PaillierPublicKey,
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        C: SymmetricCipher,
        R: Rng + CryptoRng + ?Sized,
    {
        let weight = weights.weight(candidate)?;
        Ok(EncryptedBallot {
            pii: cipher.encrypt(pii.as_bytes(), rng),
            weight: public_key.encrypt(weight, rng)?,
        })
    }

    /// Decrypt a single ballot. Requires both the symmetric key and the Paillier private key.
    pub fn decrypt<C: SymmetricCipher>(
        &self,
        cipher: &C,
        keypair: &PaillierKeyPair,
        weights: &VoteWeights,
    ) -> Result<DecryptedBallot, Error> {
        let pii = cipher.decrypt(&self.pii)?;
        let weight = keypair.decrypt(&self.weight)?;
        let candidate = weights.candidate_for(&weight);

        Ok(DecryptedBallot {
            pii: String::from_utf8_lossy(&pii).into_owned(),
            weight,
            candidate,
        })
    }
}

/// A ballot opened by the key holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedBallot {
    pub pii: String,

    /// The plaintext weight `M^i`
    pub weight: BigUint,

    /// The candidate `i` that `weight` encodes, or `None` for a malformed ballot
    pub candidate: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_cast_and_decrypt() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let keypair = PaillierKeyPair::from_primes(
            &BigUint::from(1_000_000_007u64),
            &BigUint::from(1_000_000_009u64),
        )
        .unwrap();
        let weights = VoteWeights::new(3, 10).unwrap();

        for kind in &[CipherKind::Aes, CipherKind::Des] {
            let cipher = PiiCipher::generate(*kind, Padding::Pkcs7, &mut rng);
            let ballot = EncryptedBallot::cast(
                "FName_3 LName_3",
                2,
                &weights,
                &cipher,
                &keypair.public,
                &mut rng,
            )
            .unwrap();

            let opened = ballot.decrypt(&cipher, &keypair, &weights).unwrap();
            assert_eq!(opened.pii, "FName_3 LName_3");
            assert_eq!(opened.weight, BigUint::from(121u32));
            assert_eq!(opened.candidate, Some(2));
        }
    }

    #[test]
    fn test_cast_invalid_candidate() {
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let keypair = PaillierKeyPair::from_primes(&BigUint::from(7u32), &BigUint::from(11u32))
            .unwrap();
        let weights = VoteWeights::new(2, 3).unwrap();
        let cipher = PiiCipher::generate(CipherKind::Aes, Padding::Pkcs7, &mut rng);

        let result =
            EncryptedBallot::cast("voter", 2, &weights, &cipher, &keypair.public, &mut rng);
        assert!(matches!(result, Err(Error::InvalidCandidate(2))));
    }

    #[test]
    fn test_ballot_serialization() {
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let keypair = PaillierKeyPair::from_primes(&BigUint::from(7u32), &BigUint::from(11u32))
            .unwrap();
        let weights = VoteWeights::new(2, 3).unwrap();
        let cipher = PiiCipher::generate(CipherKind::Des, Padding::Pkcs7, &mut rng);

        let ballot =
            EncryptedBallot::cast("voter", 1, &weights, &cipher, &keypair.public, &mut rng)
                .unwrap();

        let json = serde_json::to_value(&ballot).unwrap();
        assert_eq!(json["pii"], serde_json::json!(hex::encode(&ballot.pii)));
        assert_eq!(json["weight"], serde_json::json!(ballot.weight.to_string()));

        let restored: EncryptedBallot = serde_json::from_value(json).unwrap();
        assert_eq!(restored, ballot);
    }
}
