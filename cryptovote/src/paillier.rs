//! The Paillier additively homomorphic cryptosystem with `g = n + 1`.

use crate::*;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{Num, One};
use rand::{CryptoRng, Rng};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted modulus size, in bits.
pub const MIN_KEY_BITS: usize = 64;

/// A Paillier ciphertext: an integer in `[0, n²)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierCiphertext(BigUint);

impl PaillierCiphertext {
    pub fn new(value: BigUint) -> Self {
        PaillierCiphertext(value)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl fmt::Display for PaillierCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl FromStr for PaillierCiphertext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigUint::from_str_radix(s.trim(), 16).map_err(|_| Error::IntegerBadHex)?;
        Ok(PaillierCiphertext(value))
    }
}

impl Serialize for PaillierCiphertext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PaillierCiphertext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PaillierCiphertext::from_str(&s).map_err(de::Error::custom)
    }
}

/// The public parameters `(n, n², g)` handed to every encryptor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PaillierPublicKey {
    #[serde(with = "biguint_hex")]
    pub n: BigUint,

    #[serde(with = "biguint_hex")]
    pub n_squared: BigUint,

    #[serde(with = "biguint_hex")]
    pub g: BigUint,
}

impl PaillierPublicKey {
    /// Build the public key for modulus `n`, with generator `g = n + 1`
    pub fn new(n: BigUint) -> Self {
        let n_squared = &n * &n;
        let g = &n + BigUint::one();
        PaillierPublicKey { n, n_squared, g }
    }

    /// Size of the modulus in bits
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt `m` (which must be less than `n`) under a fresh blinding factor.
    pub fn encrypt<R: Rng + CryptoRng + ?Sized>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<PaillierCiphertext, Error> {
        if *m >= self.n {
            return Err(Error::PlaintextOutOfRange);
        }
        let r = random_coprime(&self.n, rng)?;

        let gm = self.g.modpow(m, &self.n_squared);
        let rn = r.modpow(&self.n, &self.n_squared);
        Ok(PaillierCiphertext((gm * rn) % &self.n_squared))
    }

    /// Homomorphic addition: the result decrypts to `(m1 + m2) mod n`.
    pub fn add(&self, a: &PaillierCiphertext, b: &PaillierCiphertext) -> PaillierCiphertext {
        PaillierCiphertext((&a.0 * &b.0) % &self.n_squared)
    }

    /// Homomorphically add every ciphertext. An empty sequence sums to `1`, which decrypts to 0.
    pub fn sum<'a, I>(&self, ciphertexts: I) -> PaillierCiphertext
    where
        I: IntoIterator<Item = &'a PaillierCiphertext>,
    {
        ciphertexts
            .into_iter()
            .fold(PaillierCiphertext(BigUint::one()), |acc, c| self.add(&acc, c))
    }
}

/// A full Paillier key: the public parameters plus the private `λ` and `μ`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PaillierKeyPair {
    pub public: PaillierPublicKey,

    #[serde(with = "biguint_hex")]
    lambda: BigUint,

    #[serde(with = "biguint_hex")]
    mu: BigUint,
}

// λ and μ stay out of debug output
impl fmt::Debug for PaillierKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaillierKeyPair")
            .field("public", &self.public)
            .finish()
    }
}

impl PaillierKeyPair {
    /// Generate a keypair with a `bits`-bit modulus from two distinct `bits/2`-bit primes.
    pub fn generate<R: Rng + CryptoRng + ?Sized>(bits: usize, rng: &mut R) -> Result<Self, Error> {
        if bits < MIN_KEY_BITS || bits % 2 != 0 {
            return Err(Error::InvalidKeySize(bits));
        }

        let p = generate_prime(bits / 2, rng);
        let mut q = generate_prime(bits / 2, rng);
        while q == p {
            q = generate_prime(bits / 2, rng);
        }

        Self::from_primes(&p, &q)
    }

    /// Derive the keypair from two distinct primes.
    pub fn from_primes(p: &BigUint, q: &BigUint) -> Result<Self, Error> {
        let one = BigUint::one();
        let n = p * q;
        if n <= one {
            return Err(Error::ModulusTooSmall);
        }

        let public = PaillierPublicKey::new(n);
        let lambda = (p - &one).lcm(&(q - &one));

        let x = public.g.modpow(&lambda, &public.n_squared);
        let mu = mod_inverse(&l_function(&x, &public.n)?, &public.n)?;

        Ok(PaillierKeyPair { public, lambda, mu })
    }

    pub fn public_key(&self) -> &PaillierPublicKey {
        &self.public
    }

    /// Carmichael's `λ(n) = lcm(p-1, q-1)`
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    pub fn mu(&self) -> &BigUint {
        &self.mu
    }

    /// Decrypt: `m = L(c^λ mod n²) · μ mod n`
    ///
    /// Only units modulo `n²` are ciphertexts. Zero and any other value sharing a factor
    /// with `n` fail with `CiphertextNotUnit`.
    pub fn decrypt(&self, ciphertext: &PaillierCiphertext) -> Result<BigUint, Error> {
        let public = &self.public;
        if ciphertext.0 >= public.n_squared {
            return Err(Error::CiphertextOutOfRange);
        }
        if !ciphertext.0.gcd(&public.n).is_one() {
            return Err(Error::CiphertextNotUnit);
        }

        let x = ciphertext.0.modpow(&self.lambda, &public.n_squared);
        let l = l_function(&x, &public.n)?;
        Ok((l * &self.mu) % &public.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn small_keypair() -> PaillierKeyPair {
        PaillierKeyPair::from_primes(&big(1_000_000_007), &big(1_000_000_009)).unwrap()
    }

    #[test]
    fn test_textbook_parameters() {
        let keypair = PaillierKeyPair::from_primes(&big(7), &big(11)).unwrap();
        assert_eq!(keypair.public.n, big(77));
        assert_eq!(keypair.public.n_squared, big(5929));
        assert_eq!(keypair.public.g, big(78));
        assert_eq!(keypair.lambda(), &big(30));
        assert_eq!(keypair.mu(), &big(18));
    }

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let keypair = small_keypair();
        let n = keypair.public.n.clone();

        let values = vec![big(0), big(1), big(42), big(1_000_000_007), &n - big(1)];
        for m in values {
            let c = keypair.public.encrypt(&m, &mut rng).unwrap();
            assert!(c.as_biguint() < &keypair.public.n_squared);
            assert_eq!(keypair.decrypt(&c).unwrap(), m);
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let keypair = small_keypair();

        let a = keypair.public.encrypt(&big(5), &mut rng).unwrap();
        let b = keypair.public.encrypt(&big(5), &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(keypair.decrypt(&a).unwrap(), keypair.decrypt(&b).unwrap());
    }

    #[test]
    fn test_homomorphic_addition() {
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let keypair = small_keypair();
        let public = &keypair.public;

        let c1 = public.encrypt(&big(121), &mut rng).unwrap();
        let c2 = public.encrypt(&big(24), &mut rng).unwrap();
        assert_eq!(keypair.decrypt(&public.add(&c1, &c2)).unwrap(), big(145));

        // Addition wraps modulo n
        let top = public.encrypt(&(&public.n - big(1)), &mut rng).unwrap();
        let five = public.encrypt(&big(5), &mut rng).unwrap();
        assert_eq!(keypair.decrypt(&public.add(&top, &five)).unwrap(), big(4));

        let ciphertexts: Vec<_> = [1u64, 11, 11, 121, 1]
            .iter()
            .map(|w| public.encrypt(&big(*w), &mut rng).unwrap())
            .collect();
        assert_eq!(keypair.decrypt(&public.sum(&ciphertexts)).unwrap(), big(145));

        let empty: Vec<PaillierCiphertext> = vec![];
        assert_eq!(keypair.decrypt(&public.sum(&empty)).unwrap(), big(0));
    }

    #[test]
    fn test_out_of_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(24);
        let keypair = small_keypair();
        let public = &keypair.public;

        let err = public.encrypt(&public.n, &mut rng).unwrap_err();
        assert!(matches!(err, Error::PlaintextOutOfRange));
        assert!(err.is_invalid_argument());

        let too_big = PaillierCiphertext::new(public.n_squared.clone());
        assert!(matches!(
            keypair.decrypt(&too_big),
            Err(Error::CiphertextOutOfRange)
        ));
    }

    #[test]
    fn test_decrypt_rejects_non_units() {
        let keypair = small_keypair();

        for value in &[big(0), big(1_000_000_007), big(1_000_000_009) * big(3)] {
            let err = keypair
                .decrypt(&PaillierCiphertext::new(value.clone()))
                .unwrap_err();
            assert!(matches!(err, Error::CiphertextNotUnit));
            assert!(err.is_invalid_argument());
        }

        // The identity is a unit and decrypts to zero
        assert_eq!(
            keypair.decrypt(&PaillierCiphertext::new(big(1))).unwrap(),
            big(0)
        );
    }

    #[test]
    fn test_generate() {
        let mut rng = ChaCha20Rng::seed_from_u64(25);
        let keypair = PaillierKeyPair::generate(256, &mut rng).unwrap();
        let public = &keypair.public;

        assert!(public.bits() >= 255 && public.bits() <= 256);
        assert_eq!(public.g, &public.n + big(1));

        let values = vec![big(0), big(1), big(987_654_321), &public.n - big(1)];
        for m in values {
            let c = public.encrypt(&m, &mut rng).unwrap();
            assert_eq!(keypair.decrypt(&c).unwrap(), m);
        }
    }

    #[test]
    fn test_generate_rejects_bad_sizes() {
        let mut rng = ChaCha20Rng::seed_from_u64(26);
        for &bits in &[0usize, 32, 63, 65] {
            assert!(matches!(
                PaillierKeyPair::generate(bits, &mut rng),
                Err(Error::InvalidKeySize(b)) if b == bits
            ));
        }
    }

    #[test]
    fn test_debug_hides_private_key() {
        let keypair = PaillierKeyPair::from_primes(&big(7), &big(11)).unwrap();
        let debug = format!("{:?}", keypair);
        assert!(debug.contains("public"));
        assert!(!debug.contains("lambda"));
        assert!(!debug.contains("mu"));
    }

    #[test]
    fn test_ciphertext_hex_form() {
        let c = PaillierCiphertext::new(big(255));
        assert_eq!(c.to_string(), "ff");
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"ff\"");
        assert_eq!("FF".parse::<PaillierCiphertext>().unwrap(), c);
        assert!(matches!(
            "xyz".parse::<PaillierCiphertext>(),
            Err(Error::IntegerBadHex)
        ));

        let keypair = small_keypair();
        let json = serde_json::to_string(&keypair).unwrap();
        let restored: PaillierKeyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, keypair);
    }
}
