//! AES-256 (FIPS 197) with a CBC wrapper for ballot PII.

use crate::*;
use hex::FromHex;
use rand::{CryptoRng, Rng};
use zeroize::Zeroize;

pub const AES_BLOCK_SIZE: usize = 16;
pub const AES_KEY_SIZE: usize = 32;

const ROUNDS: usize = 14;

type Block = [u8; AES_BLOCK_SIZE];
type Word = [u8; 4];

// Forward S-box
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

// Inverse S-box
const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

// Round constants, indexed by i / 8. Index 0 is never used.
const RCON: [u8; 8] = [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40];

/// A 256-bit AES key
#[derive(Clone)]
pub struct AesKey([u8; AES_KEY_SIZE]);

impl AesKey {
    pub fn new(bytes: [u8; AES_KEY_SIZE]) -> Self {
        AesKey(bytes)
    }

    /// Generate a random key
    pub fn generate<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; AES_KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        AesKey(bytes)
    }

    /// Parse a key from exactly 64 hex digits
    pub fn from_hex(hex_key: &str) -> Result<Self, Error> {
        let hex_key = hex_key.trim();
        if hex_key.len() != AES_KEY_SIZE * 2 {
            return Err(Error::KeyBadLen);
        }
        let bytes = <[u8; AES_KEY_SIZE]>::from_hex(hex_key).map_err(|_| Error::KeyBadHex)?;
        Ok(AesKey(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.0
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// AES-256 block cipher with an expanded key schedule
#[derive(Clone)]
pub struct Aes256 {
    round_keys: [Block; ROUNDS + 1],
}

impl Aes256 {
    pub fn new(key: &AesKey) -> Self {
        Aes256 {
            round_keys: expand_key(key.as_bytes()),
        }
    }

    /// The 15 round keys, round 0 first
    pub fn round_keys(&self) -> &[Block; ROUNDS + 1] {
        &self.round_keys
    }

    pub fn encrypt(&self, block: &mut Block) {
        add_round_key(block, &self.round_keys[0]);

        for round in 1..ROUNDS {
            sub_bytes(block);
            shift_rows(block);
            mix_columns(block);
            add_round_key(block, &self.round_keys[round]);
        }

        sub_bytes(block);
        shift_rows(block);
        add_round_key(block, &self.round_keys[ROUNDS]);
    }

    pub fn decrypt(&self, block: &mut Block) {
        add_round_key(block, &self.round_keys[ROUNDS]);
        inv_shift_rows(block);
        inv_sub_bytes(block);

        for round in (1..ROUNDS).rev() {
            add_round_key(block, &self.round_keys[round]);
            inv_mix_columns(block);
            inv_shift_rows(block);
            inv_sub_bytes(block);
        }

        add_round_key(block, &self.round_keys[0]);
    }
}

impl Drop for Aes256 {
    fn drop(&mut self) {
        for round_key in self.round_keys.iter_mut() {
            round_key.zeroize();
        }
    }
}

impl BlockCipher for Aes256 {
    const BLOCK_SIZE: usize = AES_BLOCK_SIZE;

    fn encrypt_block(&self, block: &mut [u8]) {
        let mut state = [0u8; AES_BLOCK_SIZE];
        state.copy_from_slice(block);
        self.encrypt(&mut state);
        block.copy_from_slice(&state);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let mut state = [0u8; AES_BLOCK_SIZE];
        state.copy_from_slice(block);
        self.decrypt(&mut state);
        block.copy_from_slice(&state);
    }
}

/// Expand a 32-byte key into 15 round keys.
///
/// `w[i] = w[i-8] ^ f(w[i-1])` where f is RotWord + SubWord + Rcon when `i % 8 == 0`,
/// SubWord alone when `i % 8 == 4`, and the identity otherwise.
fn expand_key(key: &[u8; AES_KEY_SIZE]) -> [Block; ROUNDS + 1] {
    let mut w = [[0u8; 4]; 4 * (ROUNDS + 1)];

    for (i, word) in w.iter_mut().take(8).enumerate() {
        word.copy_from_slice(&key[4 * i..4 * i + 4]);
    }

    for i in 8..w.len() {
        let mut temp = w[i - 1];
        if i % 8 == 0 {
            temp.rotate_left(1);
            sub_word(&mut temp);
            temp[0] ^= RCON[i / 8];
        } else if i % 8 == 4 {
            sub_word(&mut temp);
        }
        for j in 0..4 {
            w[i][j] = w[i - 8][j] ^ temp[j];
        }
    }

    let mut round_keys = [[0u8; AES_BLOCK_SIZE]; ROUNDS + 1];
    for (r, round_key) in round_keys.iter_mut().enumerate() {
        for c in 0..4 {
            round_key[4 * c..4 * c + 4].copy_from_slice(&w[4 * r + c]);
        }
    }
    w.iter_mut().for_each(|word| word.zeroize());

    round_keys
}

fn sub_word(word: &mut Word) {
    for b in word.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

fn add_round_key(state: &mut Block, round_key: &Block) {
    for (s, k) in state.iter_mut().zip(round_key.iter()) {
        *s ^= k;
    }
}

fn sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

fn inv_sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = INV_SBOX[*b as usize];
    }
}

// State layout is column-major: state[row + 4 * col]. Row r rotates left by r.
fn shift_rows(state: &mut Block) {
    let copy = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[row + 4 * col] = copy[row + 4 * ((col + row) % 4)];
        }
    }
}

fn inv_shift_rows(state: &mut Block) {
    let copy = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[row + 4 * ((col + row) % 4)] = copy[row + 4 * col];
        }
    }
}

fn mix_columns(state: &mut Block) {
    for column in state.chunks_mut(4) {
        let (s0, s1, s2, s3) = (column[0], column[1], column[2], column[3]);
        let (t0, t1, t2, t3) = (xtime(s0), xtime(s1), xtime(s2), xtime(s3));

        column[0] = t0 ^ t1 ^ s1 ^ s2 ^ s3;
        column[1] = s0 ^ t1 ^ t2 ^ s2 ^ s3;
        column[2] = s0 ^ s1 ^ t2 ^ t3 ^ s3;
        column[3] = t0 ^ s0 ^ s1 ^ s2 ^ t3;
    }
}

fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_mut(4) {
        let (s0, s1, s2, s3) = (column[0], column[1], column[2], column[3]);

        column[0] = gmul(s0, 0x0e) ^ gmul(s1, 0x0b) ^ gmul(s2, 0x0d) ^ gmul(s3, 0x09);
        column[1] = gmul(s0, 0x09) ^ gmul(s1, 0x0e) ^ gmul(s2, 0x0b) ^ gmul(s3, 0x0d);
        column[2] = gmul(s0, 0x0d) ^ gmul(s1, 0x09) ^ gmul(s2, 0x0e) ^ gmul(s3, 0x0b);
        column[3] = gmul(s0, 0x0b) ^ gmul(s1, 0x0d) ^ gmul(s2, 0x09) ^ gmul(s3, 0x0e);
    }
}

/// AES-256 in CBC mode: `IV (16 bytes) || ciphertext blocks`
#[derive(Clone)]
pub struct Aes256Cbc {
    key: AesKey,
    cipher: Aes256,
    padding: Padding,
}

impl Aes256Cbc {
    pub fn new(key: &AesKey, padding: Padding) -> Self {
        Aes256Cbc {
            key: key.clone(),
            cipher: Aes256::new(key),
            padding,
        }
    }

    pub fn key(&self) -> &AesKey {
        &self.key
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }
}

impl SymmetricCipher for Aes256Cbc {
    fn encrypt<R: Rng + CryptoRng + ?Sized>(&self, plaintext: &[u8], rng: &mut R) -> Vec<u8> {
        let mut iv = [0u8; AES_BLOCK_SIZE];
        rng.fill_bytes(&mut iv);

        let mut data = self.padding.pad(plaintext, AES_BLOCK_SIZE);
        cbc_encrypt(&self.cipher, &iv, &mut data);

        let mut message = Vec::with_capacity(AES_BLOCK_SIZE + data.len());
        message.extend_from_slice(&iv);
        message.extend(data);
        message
    }

    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let (iv, ciphertext) = split_iv(message, AES_BLOCK_SIZE)?;

        let mut data = ciphertext.to_vec();
        cbc_decrypt(&self.cipher, iv, &mut data);

        self.padding.unpad(data, AES_BLOCK_SIZE)
    }
}

/// Encrypt with AES-256-CBC and PKCS#7 padding, returning `IV || ciphertext`.
pub fn encrypt_aes256<R: Rng + CryptoRng + ?Sized>(
    plaintext: &[u8],
    key: &AesKey,
    rng: &mut R,
) -> Vec<u8> {
    Aes256Cbc::new(key, Padding::Pkcs7).encrypt(plaintext, rng)
}

/// Decrypt an `IV || ciphertext` message produced by [`encrypt_aes256`].
pub fn decrypt_aes256(message: &[u8], key: &AesKey) -> Result<Vec<u8>, Error> {
    Aes256Cbc::new(key, Padding::Pkcs7).decrypt(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn key_from_hex(s: &str) -> AesKey {
        AesKey::from_hex(s).unwrap()
    }

    fn block_from_hex(s: &str) -> Block {
        <[u8; 16]>::from_hex(s).unwrap()
    }

    // FIPS-197 Appendix C.3
    #[test]
    fn test_aes256_known_vector() {
        let key = key_from_hex("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
        let aes = Aes256::new(&key);

        let mut block = block_from_hex("00112233445566778899aabbccddeeff");
        aes.encrypt(&mut block);
        assert_eq!(hex::encode(block), "8ea2b7ca516745bfeafc49904b496089");

        aes.decrypt(&mut block);
        assert_eq!(hex::encode(block), "00112233445566778899aabbccddeeff");
    }

    #[test]
    fn test_key_schedule() {
        let key = key_from_hex("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
        let aes = Aes256::new(&key);
        let round_keys = aes.round_keys();

        assert_eq!(round_keys.len(), 15);
        assert_eq!(hex::encode(round_keys[0]), "000102030405060708090a0b0c0d0e0f");
        assert_eq!(hex::encode(round_keys[1]), "101112131415161718191a1b1c1d1e1f");
        assert_eq!(hex::encode(round_keys[14]), "24fc79ccbf0979e9371ac23c6d68de36");

        // FIPS-197 Appendix A.3: w[8]
        let key = key_from_hex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let aes = Aes256::new(&key);
        assert_eq!(hex::encode(&aes.round_keys()[2][..4]), "9ba35411");
    }

    // NIST SP 800-38A F.2.5: CBC-AES256.Encrypt, first two blocks
    #[test]
    fn test_cbc_known_vector() {
        let key = key_from_hex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let aes = Aes256::new(&key);
        let iv = block_from_hex("000102030405060708090a0b0c0d0e0f");

        let mut data =
            hex::decode("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
                .unwrap();
        cbc_encrypt(&aes, &iv, &mut data);
        assert_eq!(
            hex::encode(&data),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d"
        );

        cbc_decrypt(&aes, &iv, &mut data);
        assert_eq!(
            hex::encode(&data),
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"
        );
    }

    #[test]
    fn test_shift_rows_inverse() {
        let mut state: Block = [0; 16];
        for (i, b) in state.iter_mut().enumerate() {
            *b = i as u8;
        }
        let original = state;

        shift_rows(&mut state);
        assert_eq!(
            state,
            [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11]
        );
        inv_shift_rows(&mut state);
        assert_eq!(state, original);

        mix_columns(&mut state);
        inv_mix_columns(&mut state);
        assert_eq!(state, original);
    }

    #[test]
    fn test_aes_cbc_pkcs7_every_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let cipher = Aes256Cbc::new(&AesKey::generate(&mut rng), Padding::Pkcs7);

        for len in 0..=3 * AES_BLOCK_SIZE + 1 {
            let text: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
            let mut nulls = text.clone();
            if let Some(last) = nulls.last_mut() {
                *last = 0;
            }
            let all_nulls = vec![0u8; len];

            for plaintext in &[text, nulls, all_nulls] {
                let message = cipher.encrypt(plaintext, &mut rng);
                assert_eq!(message.len(), AES_BLOCK_SIZE * (len / AES_BLOCK_SIZE + 2));
                assert_eq!(&cipher.decrypt(&message).unwrap(), plaintext);
            }
        }
    }

    #[test]
    fn test_aes_cbc_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let key = AesKey::generate(&mut rng);

        for padding in &[Padding::Pkcs7, Padding::Zero] {
            let cipher = Aes256Cbc::new(&key, *padding);
            for plaintext in &[
                &b"FName_0 LName_0"[..],
                &b"exactly 16 bytes"[..],
                &b"a considerably longer string spanning several blocks"[..],
            ] {
                let message = cipher.encrypt(plaintext, &mut rng);
                assert_eq!(message.len() % AES_BLOCK_SIZE, 0);
                assert_eq!(cipher.decrypt(&message).unwrap(), *plaintext);
            }
        }
    }

    #[test]
    fn test_aes_empty_plaintext() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let key = AesKey::generate(&mut rng);

        for padding in &[Padding::Pkcs7, Padding::Zero] {
            let cipher = Aes256Cbc::new(&key, *padding);
            let message = cipher.encrypt(b"", &mut rng);
            assert_eq!(message.len(), AES_BLOCK_SIZE * 2);
            assert!(cipher.decrypt(&message).unwrap().is_empty());
        }
    }

    #[test]
    fn test_aes_iv_is_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let key = AesKey::generate(&mut rng);

        let first = encrypt_aes256(b"same plaintext", &key, &mut rng);
        let second = encrypt_aes256(b"same plaintext", &key, &mut rng);
        assert_ne!(first, second);
        assert_eq!(decrypt_aes256(&first, &key).unwrap(), b"same plaintext");
        assert_eq!(decrypt_aes256(&second, &key).unwrap(), b"same plaintext");
    }

    #[test]
    fn test_aes_wrong_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let key = AesKey::generate(&mut rng);
        let other = AesKey::generate(&mut rng);

        let cipher = Aes256Cbc::new(&key, Padding::Zero);
        let message = cipher.encrypt(b"Barak Obama", &mut rng);
        let decrypted = Aes256Cbc::new(&other, Padding::Zero).decrypt(&message).unwrap();
        assert_ne!(decrypted, b"Barak Obama");
    }

    #[test]
    fn test_aes_invalid_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let key = AesKey::generate(&mut rng);
        let message = encrypt_aes256(b"hello", &key, &mut rng);

        let err = decrypt_aes256(&message[..AES_BLOCK_SIZE], &key).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(decrypt_aes256(&message[..message.len() - 1], &key).is_err());
        assert!(decrypt_aes256(&[], &key).is_err());
    }

    #[test]
    fn test_key_hex() {
        assert!(matches!(AesKey::from_hex("abcd"), Err(Error::KeyBadLen)));
        assert!(matches!(
            AesKey::from_hex(&"zz".repeat(32)),
            Err(Error::KeyBadHex)
        ));

        let hex_key = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
        assert_eq!(AesKey::from_hex(hex_key).unwrap().to_hex(), hex_key);
    }
}
