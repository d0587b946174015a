//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use garland_core::{item::Item, wishlist::Wishlist};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row carriers ─────────────────────────────────────────────────────────────

/// A `wishlists` row as raw column values, decoded off the database
/// thread.
pub struct RawWishlist {
  pub wishlist_id:  String,
  pub slug:         String,
  pub title:        String,
  pub owner_id:     String,
  pub salt:         String,
  pub pin_verifier: Option<String>,
  pub created_at:   String,
}

impl RawWishlist {
  /// Column order: `wishlist_id, slug, title, owner_id, salt,
  /// pin_verifier, created_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      wishlist_id:  row.get(0)?,
      slug:         row.get(1)?,
      title:        row.get(2)?,
      owner_id:     row.get(3)?,
      salt:         row.get(4)?,
      pin_verifier: row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn decode(self) -> Result<Wishlist> {
    Ok(Wishlist {
      wishlist_id:  decode_uuid(&self.wishlist_id)?,
      slug:         self.slug,
      title:        self.title,
      owner_id:     self.owner_id,
      salt:         self.salt,
      pin_verifier: self.pin_verifier,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// An `items` row as raw column values.
pub struct RawItem {
  pub item_id:     String,
  pub wishlist_id: String,
  pub name:        String,
  pub url:         Option<String>,
  pub price:       Option<String>,
  pub image:       Option<String>,
  pub created_at:  String,
}

impl RawItem {
  /// Column order: `item_id, wishlist_id, name, url, price, image,
  /// created_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      wishlist_id: row.get(1)?,
      name:        row.get(2)?,
      url:         row.get(3)?,
      price:       row.get(4)?,
      image:       row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn decode(self) -> Result<Item> {
    Ok(Item {
      item_id:     decode_uuid(&self.item_id)?,
      wishlist_id: decode_uuid(&self.wishlist_id)?,
      name:        self.name,
      url:         self.url,
      price:       self.price,
      image:       self.image,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
