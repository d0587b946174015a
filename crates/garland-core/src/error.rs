//! Error types for `garland-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("wishlist not found: {0:?}")]
  WishlistNotFound(String),

  #[error("item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("slug already taken: {0:?}")]
  SlugTaken(String),

  #[error("invalid slug: {0:?}")]
  InvalidSlug(String),

  #[error("item {0} is already claimed by another visitor")]
  AlreadyClaimed(Uuid),

  #[error("pin hashing error: {0}")]
  PinHash(String),

  /// A backend failure that carries no domain meaning (I/O, encoding, …).
  /// Store implementations fold their infrastructure errors into this
  /// variant when converting to the core error.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
