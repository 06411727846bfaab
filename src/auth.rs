//! Digest-based write-credential verification.
//!
//! Only the SHA-256 digest of the secret is kept in memory. Candidates are
//! hashed and the digests compared through an HMAC-SHA256 tag check, which
//! runs in constant time.

use anyhow::{bail, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use maillots_core::auth::CredentialVerifier;

use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

const TAG_KEY: &[u8] = b"maillots-catalog/edit-credential";

pub struct SecretVerifier {
    expected_tag: Vec<u8>,
}

impl SecretVerifier {
    pub fn from_plaintext(secret: &str) -> Self {
        Self::from_digest(&sha256(secret))
    }

    /// From a hex-encoded SHA-256 digest of the secret.
    pub fn from_sha256_hex(digest_hex: &str) -> Result<Self> {
        let digest = hex::decode(digest_hex.trim())?;
        if digest.len() != 32 {
            bail!("expected a 32-byte SHA-256 digest, got {} bytes", digest.len());
        }
        Ok(Self::from_digest(&digest))
    }

    pub fn from_config(auth: &AuthConfig) -> Result<Self> {
        match &auth.edit_password_sha256 {
            Some(digest) => Self::from_sha256_hex(digest),
            None => Ok(Self::from_plaintext(&auth.edit_password)),
        }
    }

    fn from_digest(digest: &[u8]) -> Self {
        Self {
            expected_tag: tag(digest).finalize().into_bytes().to_vec(),
        }
    }
}

impl CredentialVerifier for SecretVerifier {
    fn verify(&self, candidate: &str) -> bool {
        tag(&sha256(candidate))
            .verify_slice(&self.expected_tag)
            .is_ok()
    }
}

fn sha256(text: &str) -> Vec<u8> {
    Sha256::digest(text.as_bytes()).to_vec()
}

fn tag(digest: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(TAG_KEY).expect("HMAC can take key of any size");
    mac.update(digest);
    mac
}

/// Hex SHA-256 of `secret`, for `auth.edit_password_sha256`.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(sha256(secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_secret() {
        let verifier = SecretVerifier::from_plaintext("ritmicacenter");
        assert!(verifier.verify("ritmicacenter"));
        assert!(!verifier.verify("ritmicacenter "));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_hashed_secret_matches_plaintext() {
        let digest = hash_secret("ritmicacenter");
        assert_eq!(digest.len(), 64);
        let verifier = SecretVerifier::from_sha256_hex(&digest).unwrap();
        assert!(verifier.verify("ritmicacenter"));
        assert!(!verifier.verify("RITMICACENTER"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(SecretVerifier::from_sha256_hex("zz").is_err());
        assert!(SecretVerifier::from_sha256_hex("abcd").is_err());
    }

    #[test]
    fn test_from_config_prefers_digest() {
        let auth = AuthConfig {
            edit_password: "plain".to_string(),
            edit_password_sha256: Some(hash_secret("hashed")),
        };
        let verifier = SecretVerifier::from_config(&auth).unwrap();
        assert!(verifier.verify("hashed"));
        assert!(!verifier.verify("plain"));
    }
}
