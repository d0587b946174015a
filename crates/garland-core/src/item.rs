//! Item — a single wished-for thing on a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item owned exclusively by its wishlist. Deleted with the list or
/// individually. `price` is a display string, not an amount — it carries
/// marketplace-formatted prices like `"12 990 ₽"` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub item_id:     Uuid,
  pub wishlist_id: Uuid,
  pub name:        String,
  pub url:         Option<String>,
  pub price:       Option<String>,
  pub image:       Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for adding an item to a wishlist.
#[derive(Debug, Clone)]
pub struct NewItem {
  pub name:  String,
  pub url:   Option<String>,
  pub price: Option<String>,
  pub image: Option<String>,
}

/// A partial update. Outer `None` leaves the field unchanged; for the
/// nullable fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
  pub name:  Option<String>,
  pub url:   Option<Option<String>>,
  pub price: Option<Option<String>>,
  pub image: Option<Option<String>>,
}

impl ItemPatch {
  /// True when no field would change.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.url.is_none()
      && self.price.is_none()
      && self.image.is_none()
  }
}
