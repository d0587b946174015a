//! Error type for `garland-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] garland_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("wishlist not found: {0:?}")]
  WishlistNotFound(String),

  #[error("item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("slug already taken: {0:?}")]
  SlugTaken(String),

  #[error("item {0} is already claimed by another visitor")]
  AlreadyClaimed(Uuid),
}

/// Fold into the core taxonomy so generic API callers can map status
/// codes without knowing this backend.
impl From<Error> for garland_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::WishlistNotFound(slug) => garland_core::Error::WishlistNotFound(slug),
      Error::ItemNotFound(id) => garland_core::Error::ItemNotFound(id),
      Error::SlugTaken(slug) => garland_core::Error::SlugTaken(slug),
      Error::AlreadyClaimed(id) => garland_core::Error::AlreadyClaimed(id),
      other => garland_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
