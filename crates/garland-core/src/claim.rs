//! Claim — a visitor's "I'll buy this" mark on an item.
//!
//! Claims are single-slot: an item has zero or one active claim, never
//! more. The storage layer enforces this with a uniqueness constraint on
//! the item reference; see `garland-store-sqlite`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single claim slot of an item. `claimant_id` is a client-issued
/// bearer-capability string, not a verified account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
  pub claim_id:    Uuid,
  pub item_id:     Uuid,
  pub claimant_id: String,
  pub created_at:  DateTime<Utc>,
}

/// The two mutations a visitor can request on an item's claim slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimAction {
  Claim,
  Unclaim,
}
