//! Slug generation and validation.
//!
//! Slugs are the URL path under which a wishlist is shared. Visitors may
//! choose their own; otherwise we generate a short random one.

use rand_core::{OsRng, RngCore};

use crate::{Error, Result};

/// Alphabet for generated slugs. Lowercase alphanumeric keeps the link
/// readable when dictated over the phone.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated slugs.
pub const GENERATED_LEN: usize = 10;

pub const MAX_LEN: usize = 64;

/// Generate a random slug of [`GENERATED_LEN`] characters.
pub fn generate() -> String {
  let mut bytes = [0u8; GENERATED_LEN];
  OsRng.fill_bytes(&mut bytes);
  bytes
    .iter()
    .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
    .collect()
}

/// Validate a caller-supplied slug: non-empty, at most [`MAX_LEN`]
/// characters, drawn from `[a-z0-9_-]`.
pub fn validate(slug: &str) -> Result<()> {
  let ok = !slug.is_empty()
    && slug.len() <= MAX_LEN
    && slug
      .bytes()
      .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
  if ok {
    Ok(())
  } else {
    Err(Error::InvalidSlug(slug.to_owned()))
  }
}

/// Resolve the slug for a new wishlist: a supplied non-blank slug is
/// validated as-is, anything else gets a generated one.
pub fn resolve(requested: Option<&str>) -> Result<String> {
  match requested.map(str::trim) {
    Some(s) if !s.is_empty() => {
      validate(s)?;
      Ok(s.to_owned())
    }
    _ => Ok(generate()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_slugs_are_valid() {
    for _ in 0..32 {
      let slug = generate();
      assert_eq!(slug.len(), GENERATED_LEN);
      validate(&slug).unwrap();
    }
  }

  #[test]
  fn accepts_url_safe_slugs() {
    for slug in ["gift-2026", "b-day_list", "x", "a1-b2_c3"] {
      validate(slug).unwrap();
    }
  }

  #[test]
  fn rejects_unsafe_slugs() {
    for slug in ["", "Has-Upper", "with space", "кириллица", "semi;colon"] {
      assert!(validate(slug).is_err(), "slug {slug:?}");
    }
  }

  #[test]
  fn rejects_overlong_slug() {
    let slug = "a".repeat(MAX_LEN + 1);
    assert!(validate(&slug).is_err());
  }

  #[test]
  fn resolve_falls_back_to_generated() {
    let slug = resolve(None).unwrap();
    assert_eq!(slug.len(), GENERATED_LEN);
    let slug = resolve(Some("   ")).unwrap();
    assert_eq!(slug.len(), GENERATED_LEN);
  }

  #[test]
  fn resolve_keeps_requested() {
    assert_eq!(resolve(Some("gift-2026")).unwrap(), "gift-2026");
  }
}
