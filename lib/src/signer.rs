// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Authority signer boundary and software keychain
//!
//! A descriptor only becomes usable once a trusted authority has signed its
//! serialized form. [`AuthoritySigner`] is that boundary: implementations
//! receive the exact signable bytes and return a raw signature, nothing
//! else. Key custody and algorithm internals stay behind the trait.
//!
//! [`Keychain`] provides the software profile used by tooling and tests,
//! holding named ed25519 keys ("CAL" style identifiers).

use std::collections::HashMap;

use ed25519_dalek::{SigningKey, VerifyingKey};
use log::debug;
use rand_core::OsRng;
use zeroize::Zeroize;

/// Errors surfaced from an authority signing backend.
///
/// These pass through the descriptor pipeline unchanged, retry policy
/// belongs to the caller or the backend itself.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// No key loaded under the requested identifier
    #[error("signing key '{0}' unavailable")]
    KeyUnavailable(String),

    /// Opaque signing backend failure
    #[error("signing backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Authority signer over exact descriptor bytes.
///
/// Callers guarantee the input is the canonical signable slice, byte-exact
/// and reproducible. Implementations must not transform the input before
/// signing, and the returned signature is appended to the descriptor
/// without modification.
pub trait AuthoritySigner {
    /// Sign the provided bytes, returning the raw signature
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignerError>;
}

impl<S: AuthoritySigner + ?Sized> AuthoritySigner for &S {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignerError> {
        (**self).sign(data)
    }
}

/// Software authority signing via ed25519, deterministic with fixed
/// 64-byte signatures
impl AuthoritySigner for SigningKey {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignerError> {
        let sig = ed25519_dalek::Signer::sign(self, data);
        Ok(sig.to_bytes().to_vec())
    }
}

/// Named authority key store.
///
/// Mirrors the signing profiles of a certificate-authority deployment,
/// keys are loaded once under a well-known identifier and looked up per
/// signing request.
#[derive(Default)]
pub struct Keychain {
    keys: HashMap<String, SigningKey>,
}

impl Keychain {
    /// Create an empty keychain
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Load a signing key under the given identifier
    pub fn insert(&mut self, name: impl Into<String>, key: SigningKey) {
        let name = name.into();

        debug!(
            "loaded authority key '{}' ({})",
            name,
            hex::encode(key.verifying_key().as_bytes())
        );

        self.keys.insert(name, key);
    }

    /// Load a signing key from a raw seed, wiping the caller's copy
    pub fn insert_seed(&mut self, name: impl Into<String>, seed: &mut [u8; 32]) {
        let key = SigningKey::from_bytes(seed);
        seed.zeroize();

        self.insert(name, key);
    }

    /// Generate and load a fresh authority key, returning the public half
    pub fn generate(&mut self, name: impl Into<String>) -> VerifyingKey {
        let key = SigningKey::generate(&mut OsRng);
        let public = key.verifying_key();

        self.insert(name, key);

        public
    }

    /// Fetch the signer loaded under `name`
    pub fn signer(&self, name: &str) -> Result<&SigningKey, SignerError> {
        self.keys
            .get(name)
            .ok_or_else(|| SignerError::KeyUnavailable(name.to_string()))
    }

    /// Fetch the public half of a loaded key, for wallet provisioning
    pub fn verifying_key(&self, name: &str) -> Result<VerifyingKey, SignerError> {
        self.signer(name).map(|k| k.verifying_key())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keychain_lookup() {
        let mut seed = [7u8; 32];

        let mut keys = Keychain::new();
        keys.insert_seed("CAL", &mut seed);

        // Seed copy is wiped on insertion
        assert_eq!(seed, [0u8; 32]);

        assert!(keys.signer("CAL").is_ok());
        assert!(matches!(
            keys.signer("SSL"),
            Err(SignerError::KeyUnavailable(_))
        ));
    }

    #[test]
    fn generated_keys_usable() {
        let mut keys = Keychain::new();

        let public = keys.generate("CAL");
        assert_eq!(keys.verifying_key("CAL").unwrap(), public);
    }

    #[test]
    fn ed25519_signing_deterministic() {
        let key = SigningKey::from_bytes(&[9u8; 32]);

        let a = AuthoritySigner::sign(&key, b"payload").unwrap();
        let b = AuthoritySigner::sign(&key, b"payload").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
