//! DES (FIPS 46-3) on big-endian 64-bit blocks, with a CBC wrapper for ballot PII.
//!
//! Bit positions in the tables are numbered from 1 at the most significant bit, as in the
//! standard.

use crate::*;
use hex::FromHex;
use rand::{CryptoRng, Rng};
use zeroize::Zeroize;

pub const DES_BLOCK_SIZE: usize = 8;
pub const DES_KEY_SIZE: usize = 8;

const ROUNDS: usize = 16;

// Initial permutation
const IP: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, 60, 52, 44, 36, 28, 20, 12, 4, //
    62, 54, 46, 38, 30, 22, 14, 6, 64, 56, 48, 40, 32, 24, 16, 8, //
    57, 49, 41, 33, 25, 17, 9, 1, 59, 51, 43, 35, 27, 19, 11, 3, //
    61, 53, 45, 37, 29, 21, 13, 5, 63, 55, 47, 39, 31, 23, 15, 7,
];

// Final permutation (IP^-1)
const FP: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, 39, 7, 47, 15, 55, 23, 63, 31, //
    38, 6, 46, 14, 54, 22, 62, 30, 37, 5, 45, 13, 53, 21, 61, 29, //
    36, 4, 44, 12, 52, 20, 60, 28, 35, 3, 43, 11, 51, 19, 59, 27, //
    34, 2, 42, 10, 50, 18, 58, 26, 33, 1, 41, 9, 49, 17, 57, 25,
];

// Permuted choice 1: 64 -> 56 bits, drops the parity bits
const PC1: [u8; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18, //
    10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60, 52, 44, 36, //
    63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22, //
    14, 6, 61, 53, 45, 37, 29, 21, 13, 5, 28, 20, 12, 4,
];

// Permuted choice 2: 56 -> 48 bits
const PC2: [u8; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10, //
    23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2, //
    41, 52, 31, 37, 47, 55, 30, 40, 51, 45, 33, 48, //
    44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32,
];

// Left rotations of each 28-bit key half, per round
const SHIFTS: [u32; ROUNDS] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

// Expansion: 32 -> 48 bits
const E: [u8; 48] = [
    32, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9, //
    8, 9, 10, 11, 12, 13, 12, 13, 14, 15, 16, 17, //
    16, 17, 18, 19, 20, 21, 20, 21, 22, 23, 24, 25, //
    24, 25, 26, 27, 28, 29, 28, 29, 30, 31, 32, 1,
];

// P-box applied to the S-box output
const P: [u8; 32] = [
    16, 7, 20, 21, 29, 12, 28, 17, 1, 15, 23, 26, 5, 18, 31, 10, //
    2, 8, 24, 14, 32, 27, 3, 9, 19, 13, 30, 6, 22, 11, 4, 25,
];

const S_BOXES: [[[u8; 16]; 4]; 8] = [
    [
        [14, 4, 13, 1, 2, 15, 11, 8, 3, 10, 6, 12, 5, 9, 0, 7],
        [0, 15, 7, 4, 14, 2, 13, 1, 10, 6, 12, 11, 9, 5, 3, 8],
        [4, 1, 14, 8, 13, 6, 2, 11, 15, 12, 9, 7, 3, 10, 5, 0],
        [15, 12, 8, 2, 4, 9, 1, 7, 5, 11, 3, 14, 10, 0, 6, 13],
    ],
    [
        [15, 1, 8, 14, 6, 11, 3, 4, 9, 7, 2, 13, 12, 0, 5, 10],
        [3, 13, 4, 7, 15, 2, 8, 14, 12, 0, 1, 10, 6, 9, 11, 5],
        [0, 14, 7, 11, 10, 4, 13, 1, 5, 8, 12, 6, 9, 3, 2, 15],
        [13, 8, 10, 1, 3, 15, 4, 2, 11, 6, 7, 12, 0, 5, 14, 9],
    ],
    [
        [10, 0, 9, 14, 6, 3, 15, 5, 1, 13, 12, 7, 11, 4, 2, 8],
        [13, 7, 0, 9, 3, 4, 6, 10, 2, 8, 5, 14, 12, 11, 15, 1],
        [13, 6, 4, 9, 8, 15, 3, 0, 11, 1, 2, 12, 5, 10, 14, 7],
        [1, 10, 13, 0, 6, 9, 8, 7, 4, 15, 14, 3, 11, 5, 2, 12],
    ],
    [
        [7, 13, 14, 3, 0, 6, 9, 10, 1, 2, 8, 5, 11, 12, 4, 15],
        [13, 8, 11, 5, 6, 15, 0, 3, 4, 7, 2, 12, 1, 10, 14, 9],
        [10, 6, 9, 0, 12, 11, 7, 13, 15, 1, 3, 14, 5, 2, 8, 4],
        [3, 15, 0, 6, 10, 1, 13, 8, 9, 4, 5, 11, 12, 7, 2, 14],
    ],
    [
        [2, 12, 4, 1, 7, 10, 11, 6, 8, 5, 3, 15, 13, 0, 14, 9],
        [14, 11, 2, 12, 4, 7, 13, 1, 5, 0, 15, 10, 3, 9, 8, 6],
        [4, 2, 1, 11, 10, 13, 7, 8, 15, 9, 12, 5, 6, 3, 0, 14],
        [11, 8, 12, 7, 1, 14, 2, 13, 6, 15, 0, 9, 10, 4, 5, 3],
    ],
    [
        [12, 1, 10, 15, 9, 2, 6, 8, 0, 13, 3, 4, 14, 7, 5, 11],
        [10, 15, 4, 2, 7, 12, 9, 5, 6, 1, 13, 14, 0, 11, 3, 8],
        [9, 14, 15, 5, 2, 8, 12, 3, 7, 0, 4, 10, 1, 13, 11, 6],
        [4, 3, 2, 12, 9, 5, 15, 10, 11, 14, 1, 7, 6, 0, 8, 13],
    ],
    [
        [4, 11, 2, 14, 15, 0, 8, 13, 3, 12, 9, 7, 5, 10, 6, 1],
        [13, 0, 11, 7, 4, 9, 1, 10, 14, 3, 5, 12, 2, 15, 8, 6],
        [1, 4, 11, 13, 12, 3, 7, 14, 10, 15, 6, 8, 0, 5, 9, 2],
        [6, 11, 13, 8, 1, 4, 10, 7, 9, 5, 0, 15, 14, 2, 3, 12],
    ],
    [
        [13, 2, 8, 4, 6, 15, 11, 1, 10, 9, 3, 14, 5, 0, 12, 7],
        [1, 15, 13, 8, 10, 3, 7, 4, 12, 5, 6, 11, 0, 14, 9, 2],
        [7, 11, 4, 1, 9, 12, 14, 2, 0, 6, 10, 13, 15, 3, 5, 8],
        [2, 1, 14, 7, 4, 10, 8, 13, 15, 12, 9, 0, 3, 5, 6, 11],
    ],
];

const HALF_KEY_MASK: u64 = 0x0fff_ffff;

/// A 64-bit DES key (56 key bits plus 8 parity bits)
#[derive(Clone)]
pub struct DesKey([u8; DES_KEY_SIZE]);

impl DesKey {
    pub fn new(bytes: [u8; DES_KEY_SIZE]) -> Self {
        DesKey(bytes)
    }

    /// Generate a random key
    pub fn generate<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; DES_KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        DesKey(bytes)
    }

    /// Parse a key from up to 16 hex digits. Shorter input is left-padded with zeros.
    pub fn from_hex(hex_key: &str) -> Result<Self, Error> {
        let hex_key = hex_key.trim();
        if hex_key.is_empty() || hex_key.len() > DES_KEY_SIZE * 2 {
            return Err(Error::KeyBadLen);
        }
        let padded = format!("{:0>16}", hex_key);
        let bytes = <[u8; DES_KEY_SIZE]>::from_hex(padded).map_err(|_| Error::KeyBadHex)?;
        Ok(DesKey(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl Drop for DesKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// DES block cipher with its 16 round subkeys
#[derive(Clone)]
pub struct Des {
    subkeys: [u64; ROUNDS],
}

impl Des {
    pub fn new(key: &DesKey) -> Self {
        Des {
            subkeys: key_schedule(key.as_u64()),
        }
    }

    /// The 16 48-bit round subkeys, round 1 first
    pub fn subkeys(&self) -> &[u64; ROUNDS] {
        &self.subkeys
    }

    pub fn encrypt(&self, block: u64) -> u64 {
        feistel(block, self.subkeys.iter())
    }

    pub fn decrypt(&self, block: u64) -> u64 {
        feistel(block, self.subkeys.iter().rev())
    }

    /// CBC-encrypt the blocks in place. No padding is applied.
    pub fn encrypt_cbc(&self, blocks: &mut [u64], iv: u64) {
        let mut previous = iv;
        for block in blocks.iter_mut() {
            *block = self.encrypt(*block ^ previous);
            previous = *block;
        }
    }

    /// CBC-decrypt the blocks in place.
    pub fn decrypt_cbc(&self, blocks: &mut [u64], iv: u64) {
        let mut previous = iv;
        for block in blocks.iter_mut() {
            let ciphertext = *block;
            *block = self.decrypt(ciphertext) ^ previous;
            previous = ciphertext;
        }
    }
}

impl Drop for Des {
    fn drop(&mut self) {
        self.subkeys.zeroize();
    }
}

/// Gather `table.len()` bits out of the low `width` bits of `input`.
fn permute(input: u64, width: u32, table: &[u8]) -> u64 {
    table.iter().fold(0u64, |output, &position| {
        (output << 1) | ((input >> (width - position as u32)) & 1)
    })
}

fn rotate_half(half: u64, shift: u32) -> u64 {
    ((half << shift) | (half >> (28 - shift))) & HALF_KEY_MASK
}

fn key_schedule(key: u64) -> [u64; ROUNDS] {
    let permuted = permute(key, 64, &PC1);
    let mut c = (permuted >> 28) & HALF_KEY_MASK;
    let mut d = permuted & HALF_KEY_MASK;

    let mut subkeys = [0u64; ROUNDS];
    for (subkey, &shift) in subkeys.iter_mut().zip(SHIFTS.iter()) {
        c = rotate_half(c, shift);
        d = rotate_half(d, shift);
        *subkey = permute((c << 28) | d, 56, &PC2);
    }
    subkeys
}

fn feistel<'a, I>(block: u64, subkeys: I) -> u64
where
    I: Iterator<Item = &'a u64>,
{
    let permuted = permute(block, 64, &IP);
    let mut left = (permuted >> 32) as u32;
    let mut right = permuted as u32;

    for &subkey in subkeys {
        let next = left ^ round_function(right, subkey);
        left = right;
        right = next;
    }

    // Halves are swapped back before the final permutation
    let preoutput = ((right as u64) << 32) | left as u64;
    permute(preoutput, 64, &FP)
}

fn round_function(right: u32, subkey: u64) -> u32 {
    let mixed = permute(right as u64, 32, &E) ^ subkey;

    let mut substituted = 0u64;
    for (i, sbox) in S_BOXES.iter().enumerate() {
        let six_bits = (mixed >> (42 - 6 * i)) & 0x3f;
        let row = (((six_bits & 0x20) >> 4) | (six_bits & 0x01)) as usize;
        let col = ((six_bits >> 1) & 0x0f) as usize;
        substituted = (substituted << 4) | sbox[row][col] as u64;
    }

    permute(substituted, 32, &P) as u32
}

/// DES in CBC mode: `IV (8 bytes) || ciphertext blocks`
#[derive(Clone)]
pub struct DesCbc {
    key: DesKey,
    cipher: Des,
    padding: Padding,
}

impl DesCbc {
    pub fn new(key: &DesKey, padding: Padding) -> Self {
        DesCbc {
            key: key.clone(),
            cipher: Des::new(key),
            padding,
        }
    }

    pub fn key(&self) -> &DesKey {
        &self.key
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }
}

impl SymmetricCipher for DesCbc {
    fn encrypt<R: Rng + CryptoRng + ?Sized>(&self, plaintext: &[u8], rng: &mut R) -> Vec<u8> {
        let iv = rng.next_u64();

        let padded = self.padding.pad(plaintext, DES_BLOCK_SIZE);
        let mut blocks = to_blocks(&padded);
        self.cipher.encrypt_cbc(&mut blocks, iv);

        let mut message = Vec::with_capacity(DES_BLOCK_SIZE * (blocks.len() + 1));
        message.extend_from_slice(&iv.to_be_bytes());
        for block in blocks {
            message.extend_from_slice(&block.to_be_bytes());
        }
        message
    }

    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let (iv, ciphertext) = split_iv(message, DES_BLOCK_SIZE)?;
        let iv = to_blocks(iv)[0];

        let mut blocks = to_blocks(ciphertext);
        self.cipher.decrypt_cbc(&mut blocks, iv);

        let data = blocks.iter().flat_map(|b| b.to_be_bytes().to_vec()).collect();
        self.padding.unpad(data, DES_BLOCK_SIZE)
    }
}

// Callers guarantee `bytes.len()` is a multiple of the block size
fn to_blocks(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(DES_BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; DES_BLOCK_SIZE];
            block.copy_from_slice(chunk);
            u64::from_be_bytes(block)
        })
        .collect()
}
