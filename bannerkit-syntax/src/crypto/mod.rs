//! AES-CBC title-key unwrap and per-content decryption.
//!
//! Wii tickets and WAD contents are both encrypted with AES-128-CBC and carry no
//! padding of their own: a title key is exactly one 16-byte block, and a content's
//! ciphertext is exactly its 16-byte-aligned encrypted size, trimmed to the record's
//! plaintext size by the caller afterward. Both decrypt calls below pass `unpad:
//! false` to [`aes::AES128Cipher::decrypt_cbc`] for that reason; its `unpad` flag
//! (an optional trailing PKCS#7 strip) exists only so the same primitive can also
//! back the crate's own CBC round-trip test.

mod aes;

use crate::error::BannerError;
use aes::AES128Cipher;

/// One of the three platform-wide 128-bit keys used to decrypt a ticket's title key.
pub const COMMON_KEYS: [[u8; 16]; 3] = [
    // Retail common key.
    [
        0xeb, 0xe4, 0x2a, 0x22, 0x5e, 0x85, 0x93, 0xe4, 0x48, 0xd9, 0xc5, 0x45, 0x73, 0x81, 0xaa,
        0xf7,
    ],
    // Korean common key.
    [
        0x63, 0xb8, 0x2b, 0xb4, 0xf4, 0x61, 0x4e, 0x2e, 0x13, 0xf2, 0xfe, 0xfb, 0xba, 0x4c, 0x9b,
        0x7e,
    ],
    // vWii / Wii U common key (third common-key index used on later titles).
    [
        0x30, 0xbf, 0xc7, 0x6e, 0x7c, 0x19, 0xaf, 0xbb, 0x23, 0x16, 0x33, 0x30, 0xce, 0xd7, 0xc2,
        0x8d,
    ],
];

/// Decrypt a ticket's encrypted title key, using `titleIdBytes` (zero-padded to 16
/// bytes) as the CBC initialization vector.
///
/// Returns a [`BannerError::unsupported`] if `common_key_index` is out of range, or
/// a [`BannerError::decrypt_failure`] if the AES primitive rejects the key length.
pub fn decrypt_title_key(
    encrypted_title_key: &[u8; 16],
    title_id_bytes: &[u8; 8],
    common_key_index: u8,
) -> Result<[u8; 16], BannerError> {
    let key = COMMON_KEYS.get(common_key_index as usize).ok_or_else(|| {
        BannerError::unsupported(format!("common key index {common_key_index}"))
    })?;

    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(title_id_bytes);

    let cipher = AES128Cipher::new(key)
        .ok_or_else(|| BannerError::decrypt_failure("invalid common key length"))?;

    let plain = cipher.decrypt_cbc(encrypted_title_key, &iv, false);
    let mut title_key = [0u8; 16];
    title_key.copy_from_slice(&plain[..16]);
    Ok(title_key)
}

/// Decrypt one content's ciphertext using the unwrapped title key.
///
/// The IV is `[indexHi, indexLo, 0 × 14]` as specified by the Wii content-encryption
/// scheme. `ciphertext` must be the content's 16-byte-aligned encrypted size;
/// the caller is responsible for trimming the result to the record's exact
/// plaintext size afterward.
pub fn decrypt_content(
    title_key: &[u8; 16],
    content_index: u16,
    ciphertext: &[u8],
) -> Result<Vec<u8>, BannerError> {
    if ciphertext.len() % 16 != 0 {
        return Err(BannerError::decrypt_failure(format!(
            "content ciphertext length {} is not 16-byte aligned",
            ciphertext.len()
        )));
    }

    let mut iv = [0u8; 16];
    iv[0] = (content_index >> 8) as u8;
    iv[1] = (content_index & 0xff) as u8;

    let cipher = AES128Cipher::new(title_key)
        .ok_or_else(|| BannerError::decrypt_failure("invalid title key length"))?;

    Ok(cipher.decrypt_cbc(ciphertext, &iv, false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_common_key_index() {
        let enc = [0u8; 16];
        let title_id = [0u8; 8];
        assert!(decrypt_title_key(&enc, &title_id, 9).is_err());
    }

    #[test]
    fn content_decrypt_rejects_unaligned_ciphertext() {
        let key = [0u8; 16];
        assert!(decrypt_content(&key, 0, &[0u8; 17]).is_err());
    }

    #[test]
    fn content_decrypt_roundtrips_under_a_known_title_key() {
        let title_key = [0x42u8; 16];
        let plaintext = [0xABu8; 32];

        let cipher = AES128Cipher::new(&title_key).unwrap();
        let mut iv = [0u8; 16];
        iv[1] = 0x03; // content index 3
        let mut ciphertext = Vec::new();
        let mut prev = iv;
        for block in plaintext.chunks(16) {
            let mut b = [0u8; 16];
            b.copy_from_slice(block);
            for i in 0..16 {
                b[i] ^= prev[i];
            }
            let enc = cipher.encrypt_block(&b);
            ciphertext.extend_from_slice(&enc);
            prev = enc;
        }

        let decrypted = decrypt_content(&title_key, 3, &ciphertext).unwrap();
        assert_eq!(&decrypted[..32], &plaintext[..]);
    }
}
