//! Byte arithmetic in GF(2^8) modulo the AES polynomial x^8 + x^4 + x^3 + x + 1.

/// Low byte of the AES reduction polynomial.
const REDUCTION: u8 = 0x1b;

/// Multiply by x (i.e. double) in GF(2^8).
#[inline]
pub fn xtime(x: u8) -> u8 {
    let doubled = x << 1;
    if x & 0x80 != 0 {
        doubled ^ REDUCTION
    } else {
        doubled
    }
}

/// General multiplication in GF(2^8) by shift-and-add.
#[inline]
pub fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xtime() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x47), 0x8e);
        assert_eq!(xtime(0x8e), 0x07);
    }

    #[test]
    fn test_gmul() {
        // FIPS-197 section 4.2 worked example
        assert_eq!(gmul(0x57, 0x83), 0xc1);
        assert_eq!(gmul(0x57, 0x13), 0xfe);

        for x in 0..=255u8 {
            assert_eq!(gmul(x, 1), x);
            assert_eq!(gmul(x, 2), xtime(x));
            assert_eq!(gmul(x, 0), 0);
        }
    }

    #[test]
    fn test_gmul_commutes() {
        for a in (0..=255u8).step_by(7) {
            for b in (0..=255u8).step_by(11) {
                assert_eq!(gmul(a, b), gmul(b, a));
            }
        }
    }
}
