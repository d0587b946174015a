//! PIN verifier derivation and checking — the Access Gate primitives.
//!
//! A wishlist stores a random salt and, once protected, a verifier derived
//! from (salt, PIN). The raw PIN is never stored. Verification recomputes
//! the verifier from the stored salt and the submitted PIN and compares —
//! a pure function of its three inputs. Callers regenerate the salt on
//! every PIN change; nothing here keeps an old salt alive.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Outcome of checking a submitted PIN against a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinStatus {
  /// No PIN has ever been set; the list is unlocked by default.
  NotSet,
  Valid,
  Invalid,
}

/// Generate a fresh random salt, encoded as a B64 string.
pub fn generate_salt() -> String {
  SaltString::generate(&mut OsRng).as_str().to_owned()
}

/// Derive the stored verifier for `pin` under `salt`.
///
/// Argon2id with default parameters; deterministic for fixed inputs, so
/// the PHC output string can be compared for equality at verify time.
pub fn derive_verifier(salt: &str, pin: &str) -> Result<String> {
  let salt = SaltString::from_b64(salt)
    .map_err(|e| Error::PinHash(format!("bad salt: {e}")))?;
  let hash = Argon2::default()
    .hash_password(pin.as_bytes(), &salt)
    .map_err(|e| Error::PinHash(e.to_string()))?;
  Ok(hash.to_string())
}

/// Recompute the verifier from (`salt`, `pin`) and compare to `verifier`.
pub fn verify(salt: &str, verifier: &str, pin: &str) -> Result<bool> {
  Ok(derive_verifier(salt, pin)? == verifier)
}
