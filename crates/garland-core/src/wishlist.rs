//! Wishlist — the slug-addressed list a visitor shares and edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default title assigned when the creator supplies none.
pub const DEFAULT_TITLE: &str = "Мой список желаний";

/// A shareable wishlist.
///
/// `owner_id` is an opaque anonymous identity issued client-side; it is a
/// bearer capability, not a verified account. `salt` feeds PIN verifier
/// derivation and is regenerated on every PIN change. `pin_verifier` absent
/// means the list has never been protected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
  pub wishlist_id:  Uuid,
  pub slug:         String,
  pub title:        String,
  pub owner_id:     String,
  #[serde(skip_serializing, default)]
  pub salt:         String,
  #[serde(skip_serializing, default)]
  pub pin_verifier: Option<String>,
  pub created_at:   DateTime<Utc>,
}

impl Wishlist {
  /// Whether a PIN has ever been set on this list.
  pub fn pin_set(&self) -> bool {
    self.pin_verifier.is_some()
  }
}

/// Input for creating a wishlist. `slug`/`title` fall back to a generated
/// slug and [`DEFAULT_TITLE`] respectively.
#[derive(Debug, Clone)]
pub struct NewWishlist {
  pub owner_id: String,
  pub slug:     Option<String>,
  pub title:    Option<String>,
}

/// One row of the per-owner wishlist listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistSummary {
  pub slug:       String,
  pub title:      String,
  pub created_at: DateTime<Utc>,
  pub item_count: u64,
}
