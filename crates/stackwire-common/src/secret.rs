//! Sensitive values that refuse to print themselves.
//!
//! A [`Secret`] has no `Display` implementation and a redacting `Debug`,
//! so it cannot end up in a log line or a `format!` string by accident.
//! Composing a secret into a larger value goes through [`Secret::map`],
//! whose result is again a secret. Serialization emits only a marker;
//! deserialization reads the plain value from a stack file.
//!
//! Change detection uses [`Secret::fingerprint`], a SHA-256 keyed with the
//! stack's [`SecretKey`]. The key lives in the stack file next to the
//! secrets themselves, so a fingerprint found in a rendered document
//! cannot be used to confirm guesses without that file.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{ENCRYPTION_SALT_KEY, SECRET_DIGEST_DOMAIN};
use crate::error::{Result, StackwireError};
use crate::types::Sha256Hash;

/// A value whose contents must never appear in plaintext output.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Derives a new secret from this one.
    ///
    /// This is the interpolation point: the closure sees the plaintext,
    /// and whatever it builds stays wrapped.
    #[must_use]
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Secret<U> {
        Secret(f(&self.0))
    }

    /// Returns the plaintext value.
    ///
    /// Only for boundaries where the operator explicitly asked to see it.
    #[must_use]
    pub const fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T: AsRef<[u8]>> Secret<T> {
    /// Returns the fingerprint of the value under `key`.
    ///
    /// Equal values under the same key yield equal fingerprints; without
    /// the key a fingerprint says nothing about the value.
    #[must_use]
    pub fn fingerprint(&self, key: &SecretKey) -> Sha256Hash {
        let salt = key.0.reveal().as_bytes();
        let mut data = SECRET_DIGEST_DOMAIN.as_bytes().to_vec();
        data.extend_from_slice(&(salt.len() as u64).to_be_bytes());
        data.extend_from_slice(salt);
        data.extend_from_slice(self.0.as_ref());
        Sha256Hash::of(data)
    }
}

/// Per-stack key for secret fingerprints, read from `encryptionsalt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey(Secret<String>);

impl SecretKey {
    /// Minimum salt length, in bytes.
    pub const MIN_LEN: usize = 16;

    /// Builds a key from the stack's salt.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the salt is shorter than [`Self::MIN_LEN`].
    pub fn from_salt(salt: Secret<String>) -> Result<Self> {
        if salt.reveal().len() < Self::MIN_LEN {
            return Err(StackwireError::InvalidConfig {
                key: ENCRYPTION_SALT_KEY.to_owned(),
                expected: "salt of at least 16 bytes",
            });
        }
        Ok(Self(salt))
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Secret", 1)?;
        state.serialize_field("secret", &true)?;
        state.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}
