//! Card number encryption and masking

use crate::CryptoError;
use aes::Aes128;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;

/// AES-128 key size in bytes
const KEY_LEN: usize = 16;

/// Characters shown in place of everything but the last four digits
pub const MASK: &str = "****";

/// Encrypted and masked forms of one card number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedCard {
    /// Base64 ciphertext, for storage only
    pub encrypted: String,

    /// `****` plus the last four characters, safe to display
    pub masked: String,
}

/// Encrypts card numbers for storage and masks them for display.
///
/// The key is the first 16 bytes of SHA-256 over the UTF-8 secret. Encryption
/// is AES-128 in ECB mode with PKCS#7 padding, output as standard base64.
///
/// ECB without an IV is deterministic: equal card numbers give equal
/// ciphertexts, so stored values reveal which payments share a card. The
/// scheme is kept so existing ciphertexts remain readable.
pub struct CardProtector {
    secret: SecretString,
}

impl CardProtector {
    /// Create a protector. An empty secret is rejected.
    pub fn new(secret: SecretString) -> Result<Self, CryptoError> {
        if secret.expose_secret().is_empty() {
            return Err(CryptoError::KeyDerivation(
                "encryption secret is empty".to_string(),
            ));
        }
        Ok(Self { secret })
    }

    fn derive_key(&self) -> [u8; KEY_LEN] {
        let digest = Sha256::digest(self.secret.expose_secret().as_bytes());
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest[..KEY_LEN]);
        key
    }

    /// Encrypt `plaintext` to base64
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let key = self.derive_key();
        let cipher = Aes128EcbEnc::new_from_slice(&key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        Ok(BASE64.encode(ciphertext))
    }

    /// Reverse [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let ciphertext = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::Decryption(format!("Base64 decode failed: {}", e)))?;

        let key = self.derive_key();
        let cipher = Aes128EcbDec::new_from_slice(&key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| {
                CryptoError::Decryption("invalid block length or padding".to_string())
            })?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    /// Whether `encrypted` is the ciphertext of `plaintext`, compared in constant time
    pub fn matches(&self, plaintext: &str, encrypted: &str) -> Result<bool, CryptoError> {
        let expected = self.encrypt(plaintext)?;
        Ok(expected.as_bytes().ct_eq(encrypted.as_bytes()).into())
    }

    /// Encrypt and mask a card number in one step
    pub fn protect(&self, card_number: &str) -> Result<ProtectedCard, CryptoError> {
        Ok(ProtectedCard {
            encrypted: self.encrypt(card_number)?,
            masked: mask_card_number(card_number),
        })
    }
}

impl std::fmt::Debug for CardProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardProtector").finish_non_exhaustive()
    }
}

/// Mask a possibly missing card number.
///
/// `None` and values shorter than four characters become `****`.
pub fn mask(card_number: Option<&str>) -> String {
    match card_number {
        Some(number) => mask_card_number(number),
        None => MASK.to_string(),
    }
}

/// `****` followed by the last four characters
pub fn mask_card_number(card_number: &str) -> String {
    let count = card_number.chars().count();
    if count < 4 {
        return MASK.to_string();
    }

    let last_four: String = card_number.chars().skip(count - 4).collect();
    format!("{}{}", MASK, last_four)
}
