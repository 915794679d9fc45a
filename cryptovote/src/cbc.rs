//! Cipher Block Chaining and the padding schemes shared by the AES and DES wrappers.
//!
//! A CBC message on the wire is `IV || ciphertext blocks`, with no length prefix.

use crate::*;
use rand::{CryptoRng, Rng};
use std::str::FromStr;

/// A block cipher operating in place on fixed-size byte blocks.
pub trait BlockCipher {
    const BLOCK_SIZE: usize;

    fn encrypt_block(&self, block: &mut [u8]);

    fn decrypt_block(&self, block: &mut [u8]);
}

/// A string-oriented cipher producing self-contained `IV || ciphertext` messages.
pub trait SymmetricCipher {
    /// Encrypt the plaintext under a fresh random IV
    fn encrypt<R: Rng + CryptoRng + ?Sized>(&self, plaintext: &[u8], rng: &mut R) -> Vec<u8>;

    /// Decrypt an `IV || ciphertext` message and strip its padding
    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Padding applied to the plaintext before chaining.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// PKCS#7: always appends between 1 and `block` bytes, each holding the pad length.
    Pkcs7,

    /// Zero-fill to a block multiple. Trailing null bytes of the plaintext are lost on decrypt.
    Zero,
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Pkcs7
    }
}

impl FromStr for Padding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pkcs7" => Ok(Padding::Pkcs7),
            "zero" => Ok(Padding::Zero),
            other => Err(format!("unknown padding '{}' (expected pkcs7 or zero)", other)),
        }
    }
}

impl Padding {
    /// Pad `data` to a non-zero multiple of `block` bytes.
    pub fn pad(self, data: &[u8], block: usize) -> Vec<u8> {
        let mut padded = data.to_vec();
        match self {
            Padding::Pkcs7 => {
                let pad_len = block - (data.len() % block);
                padded.resize(data.len() + pad_len, pad_len as u8);
            }
            Padding::Zero => {
                let num_blocks = std::cmp::max(1, (data.len() + block - 1) / block);
                padded.resize(num_blocks * block, 0);
            }
        }
        padded
    }

    /// Remove the padding added by [`Padding::pad`].
    pub fn unpad(self, mut data: Vec<u8>, block: usize) -> Result<Vec<u8>, Error> {
        match self {
            Padding::Pkcs7 => {
                let pad_len = *data.last().ok_or(Error::InvalidPadding)? as usize;
                if pad_len == 0 || pad_len > block || pad_len > data.len() {
                    return Err(Error::InvalidPadding);
                }
                let tail = &data[data.len() - pad_len..];
                if tail.iter().any(|&b| b as usize != pad_len) {
                    return Err(Error::InvalidPadding);
                }
                data.truncate(data.len() - pad_len);
            }
            Padding::Zero => {
                while data.last() == Some(&0) {
                    data.pop();
                }
            }
        }
        Ok(data)
    }
}

/// Split a CBC message into its IV and ciphertext.
///
/// The ciphertext part must be a positive multiple of the block size.
pub fn split_iv(message: &[u8], block: usize) -> Result<(&[u8], &[u8]), Error> {
    let len = message.len();
    if len < 2 * block || len % block != 0 {
        return Err(Error::InvalidCiphertextLength { len, block });
    }
    Ok(message.split_at(block))
}

/// CBC-encrypt already padded data in place.
pub fn cbc_encrypt<C: BlockCipher>(cipher: &C, iv: &[u8], data: &mut [u8]) {
    debug_assert_eq!(iv.len(), C::BLOCK_SIZE);
    debug_assert_eq!(data.len() % C::BLOCK_SIZE, 0);

    let mut prev = iv.to_vec();
    for chunk in data.chunks_mut(C::BLOCK_SIZE) {
        xor_in_place(chunk, &prev);
        cipher.encrypt_block(chunk);
        prev.copy_from_slice(chunk);
    }
}

/// CBC-decrypt in place. Each block is decrypted first, then XORed with the previous
/// *ciphertext* block.
pub fn cbc_decrypt<C: BlockCipher>(cipher: &C, iv: &[u8], data: &mut [u8]) {
    debug_assert_eq!(iv.len(), C::BLOCK_SIZE);
    debug_assert_eq!(data.len() % C::BLOCK_SIZE, 0);

    let mut prev = iv.to_vec();
    let mut current = vec![0u8; C::BLOCK_SIZE];
    for chunk in data.chunks_mut(C::BLOCK_SIZE) {
        current.copy_from_slice(chunk);
        cipher.decrypt_block(chunk);
        xor_in_place(chunk, &prev);
        std::mem::swap(&mut prev, &mut current);
    }
}

fn xor_in_place(target: &mut [u8], source: &[u8]) {
    for (t, s) in target.iter_mut().zip(source) {
        *t ^= s;
    }
}

/// Which symmetric cipher protects ballot PII.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CipherKind {
    Aes,
    Des,
}

impl FromStr for CipherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aes" | "aes256" | "aes-256" => Ok(CipherKind::Aes),
            "des" => Ok(CipherKind::Des),
            other => Err(format!("unknown cipher '{}' (expected aes or des)", other)),
        }
    }
}

/// Either of the two PII ciphers, chosen at runtime.
pub enum PiiCipher {
    Aes(Aes256Cbc),
    Des(DesCbc),
}

impl PiiCipher {
    /// Generate a fresh key for the given cipher kind
    pub fn generate<R: Rng + CryptoRng + ?Sized>(
        kind: CipherKind,
        padding: Padding,
        rng: &mut R,
    ) -> Self {
        match kind {
            CipherKind::Aes => PiiCipher::Aes(Aes256Cbc::new(&AesKey::generate(rng), padding)),
            CipherKind::Des => PiiCipher::Des(DesCbc::new(&DesKey::generate(rng), padding)),
        }
    }

    /// Rebuild a cipher from a hex encoded key
    pub fn from_hex_key(kind: CipherKind, padding: Padding, key: &str) -> Result<Self, Error> {
        Ok(match kind {
            CipherKind::Aes => PiiCipher::Aes(Aes256Cbc::new(&AesKey::from_hex(key)?, padding)),
            CipherKind::Des => PiiCipher::Des(DesCbc::new(&DesKey::from_hex(key)?, padding)),
        })
    }

    pub fn kind(&self) -> CipherKind {
        match self {
            PiiCipher::Aes(_) => CipherKind::Aes,
            PiiCipher::Des(_) => CipherKind::Des,
        }
    }

    pub fn padding(&self) -> Padding {
        match self {
            PiiCipher::Aes(c) => c.padding(),
            PiiCipher::Des(c) => c.padding(),
        }
    }

    /// Hex encoding of the underlying key
    pub fn key_hex(&self) -> String {
        match self {
            PiiCipher::Aes(c) => c.key().to_hex(),
            PiiCipher::Des(c) => c.key().to_hex(),
        }
    }
}

impl SymmetricCipher for PiiCipher {
    fn encrypt<R: Rng + CryptoRng + ?Sized>(&self, plaintext: &[u8], rng: &mut R) -> Vec<u8> {
        match self {
            PiiCipher::Aes(c) => c.encrypt(plaintext, rng),
            PiiCipher::Des(c) => c.encrypt(plaintext, rng),
        }
    }

    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            PiiCipher::Aes(c) => c.decrypt(message),
            PiiCipher::Des(c) => c.decrypt(message),
        }
    }
}
