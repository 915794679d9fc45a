//! Arbitrary-precision helpers for Paillier: L function, modular inverse, primes.

use crate::*;
use num_bigint::{BigInt, BigUint, RandBigInt, Sign, ToBigUint};
use num_integer::Integer;
use num_traits::{CheckedSub, One, Zero};
use rand::{CryptoRng, Rng};

/// Miller-Rabin rounds used by [`is_probable_prime`] when generating keys.
pub const MILLER_RABIN_ROUNDS: usize = 32;

const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Paillier's L function: `L(x) = (x - 1) / n`, using exact integer division.
pub fn l_function(x: &BigUint, n: &BigUint) -> Result<BigUint, Error> {
    if n.is_zero() {
        return Err(Error::ZeroModulus);
    }
    let shifted = x
        .checked_sub(&BigUint::one())
        .ok_or(Error::LFunctionDomain)?;
    Ok(shifted / n)
}

/// Inverse of `a` modulo `m` by the extended Euclidean algorithm.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, Error> {
    if m.is_zero() {
        return Err(Error::ZeroModulus);
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let (mut old_r, mut r) = (BigInt::from_biguint(Sign::Plus, a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(Error::NoModularInverse);
    }

    old_s
        .mod_floor(&modulus)
        .to_biguint()
        .ok_or(Error::NoModularInverse)
}

/// Draw `r` uniformly from `[1, n)` with `gcd(r, n) = 1`, retrying until one is found.
pub fn random_coprime<R: Rng + CryptoRng + ?Sized>(
    n: &BigUint,
    rng: &mut R,
) -> Result<BigUint, Error> {
    if *n <= BigUint::one() {
        return Err(Error::ModulusTooSmall);
    }
    loop {
        let r = rng.gen_biguint_below(n);
        if !r.is_zero() && r.gcd(n).is_one() {
            return Ok(r);
        }
    }
}

/// Probabilistic primality test: trial division by small primes, then Miller-Rabin
/// with `rounds` random bases.
pub fn is_probable_prime<R: Rng + CryptoRng + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    miller_rabin(n, rounds, rng)
}

// `n` is odd and larger than every small prime
fn miller_rabin<R: Rng + CryptoRng + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - &one;

    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1usize;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// The smallest probable prime greater than or equal to `start`.
pub fn next_probable_prime<R: Rng + CryptoRng + ?Sized>(start: &BigUint, rng: &mut R) -> BigUint {
    let two = BigUint::from(2u32);
    if *start <= two {
        return two;
    }

    let mut candidate = start.clone();
    if candidate.is_even() {
        candidate += 1u32;
    }
    while !is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, rng) {
        candidate += 2u32;
    }
    candidate
}

/// Generate a probable prime of exactly `bits` bits.
///
/// A random candidate gets its top bit set (to fix the size) and its bottom bit set (to
/// force it odd), then advances to the next probable prime. A search that carries past
/// `bits` bits starts over.
pub fn generate_prime<R: Rng + CryptoRng + ?Sized>(bits: usize, rng: &mut R) -> BigUint {
    let bits = std::cmp::max(bits, 2);
    loop {
        let mut candidate = rng.gen_biguint(bits as u64);
        candidate |= BigUint::one() << (bits - 1);
        candidate |= BigUint::one();

        let prime = next_probable_prime(&candidate, rng);
        if prime.bits() == bits as u64 {
            return prime;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::str::FromStr;

    fn big(s: &str) -> BigUint {
        BigUint::from_str(s).unwrap()
    }

    #[test]
    fn test_l_function() {
        assert_eq!(l_function(&big("21"), &big("5")).unwrap(), big("4"));
        assert_eq!(l_function(&big("1"), &big("5")).unwrap(), big("0"));
        assert!(matches!(
            l_function(&big("21"), &big("0")),
            Err(Error::ZeroModulus)
        ));
        assert!(matches!(
            l_function(&big("0"), &big("5")),
            Err(Error::LFunctionDomain)
        ));
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(&big("3"), &big("11")).unwrap(), big("4"));
        assert_eq!(mod_inverse(&big("10"), &big("17")).unwrap(), big("12"));
        // Input larger than the modulus is reduced first
        assert_eq!(mod_inverse(&big("14"), &big("11")).unwrap(), big("4"));

        let m = big("1000000007");
        let a = big("123456789");
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!((a * inv) % &m, big("1"));

        let err = mod_inverse(&big("6"), &big("9")).unwrap_err();
        assert!(matches!(err, Error::NoModularInverse));
        assert!(!err.is_invalid_argument());

        assert!(matches!(
            mod_inverse(&big("3"), &big("0")),
            Err(Error::ZeroModulus)
        ));
    }

    #[test]
    fn test_random_coprime() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let n = big("15");
        for _ in 0..100 {
            let r = random_coprime(&n, &mut rng).unwrap();
            assert!(r > big("0") && r < n);
            assert!(r.gcd(&n).is_one());
        }

        for bad in &["0", "1"] {
            let err = random_coprime(&big(bad), &mut rng).unwrap_err();
            assert!(matches!(err, Error::ModulusTooSmall));
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let primes = [
            "2",
            "3",
            "97",
            "251",
            "257",
            "1000000007",
            "2305843009213693951",
            "170141183460469231731687303715884105727",
        ];
        for p in primes.iter() {
            assert!(is_probable_prime(&big(p), MILLER_RABIN_ROUNDS, &mut rng), "{}", p);
        }

        let composites = [
            "0",
            "1",
            "4",
            "561",
            "65537000000000",
            "3215031751",
            "1000000016000000063",
        ];
        for c in composites.iter() {
            assert!(!is_probable_prime(&big(c), MILLER_RABIN_ROUNDS, &mut rng), "{}", c);
        }
    }

    #[test]
    fn test_next_probable_prime() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        assert_eq!(next_probable_prime(&big("0"), &mut rng), big("2"));
        assert_eq!(next_probable_prime(&big("3"), &mut rng), big("3"));
        assert_eq!(next_probable_prime(&big("14"), &mut rng), big("17"));
        assert_eq!(next_probable_prime(&big("17"), &mut rng), big("17"));
        assert_eq!(
            next_probable_prime(&big("1000000000"), &mut rng),
            big("1000000007")
        );
    }

    #[test]
    fn test_generate_prime() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        for &bits in &[16usize, 64, 128] {
            let p = generate_prime(bits, &mut rng);
            assert_eq!(p.bits(), bits as u64);
            assert!(p.is_odd());
            assert!(is_probable_prime(&p, MILLER_RABIN_ROUNDS, &mut rng));
        }
    }
}
