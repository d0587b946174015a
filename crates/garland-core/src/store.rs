//! The `WishlistStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `garland-store-sqlite`). Higher layers (`garland-api`,
//! `garland-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  item::{Item, ItemPatch, NewItem},
  wishlist::{NewWishlist, Wishlist, WishlistSummary},
};

/// Abstraction over a Garland storage backend.
///
/// Ordering guarantees: [`list_items`](Self::list_items) and
/// [`list_items_with_claimants`](Self::list_items_with_claimants) return
/// items by creation time ascending; [`list_by_owner`](Self::list_by_owner)
/// returns wishlists by creation time descending.
///
/// The claim operations carry the single-slot contract: at most one claim
/// per item at any observed instant, with a conflicting claim rejected
/// rather than queued. Backends must enforce this with real mutual
/// exclusion (a serialised transaction, a uniqueness constraint, or both)
/// — a bare read-then-write is not sufficient under concurrent callers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait WishlistStore: Send + Sync {
  /// Backend error, convertible into [`crate::Error`] so generic callers
  /// can map domain failures (not-found, conflict) to their own taxonomy.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Wishlists ─────────────────────────────────────────────────────────

  /// Create and persist a wishlist with a fresh salt.
  ///
  /// Fails with the backend's slug-taken error if the (unique) slug is
  /// already in use.
  fn create_wishlist(
    &self,
    input: NewWishlist,
  ) -> impl Future<Output = Result<Wishlist, Self::Error>> + Send + '_;

  /// Retrieve a wishlist by slug. Returns `None` if not found.
  fn get_wishlist<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Wishlist>, Self::Error>> + Send + 'a;

  /// All wishlists owned by `owner_id`, newest first, with item counts.
  fn list_by_owner<'a>(
    &'a self,
    owner_id: &'a str,
  ) -> impl Future<Output = Result<Vec<WishlistSummary>, Self::Error>> + Send + 'a;

  /// Rename a wishlist. Errors if the slug is unknown.
  fn update_title<'a>(
    &'a self,
    slug: &'a str,
    title: &'a str,
  ) -> impl Future<Output = Result<Wishlist, Self::Error>> + Send + 'a;

  /// Delete a wishlist and, through it, its items and their claims.
  fn delete_wishlist<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Store a new (salt, verifier) pair for a wishlist. Called on every
  /// PIN change with a freshly generated salt.
  fn set_pin_verifier<'a>(
    &'a self,
    slug: &'a str,
    salt: &'a str,
    verifier: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Items ─────────────────────────────────────────────────────────────

  /// Append an item to a wishlist.
  fn add_item(
    &self,
    wishlist_id: Uuid,
    input: NewItem,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  /// Retrieve an item by id. Returns `None` if not found.
  fn get_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// Items of a wishlist, oldest first.
  fn list_items(
    &self,
    wishlist_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  /// Items of a wishlist, oldest first, each with its claimant set
  /// (cardinality 0 or 1) — the public read payload.
  fn list_items_with_claimants(
    &self,
    wishlist_id: Uuid,
  ) -> impl Future<Output = Result<Vec<(Item, Vec<String>)>, Self::Error>> + Send + '_;

  /// Apply a partial update to an item and return the new row.
  fn update_item(
    &self,
    item_id: Uuid,
    patch: ItemPatch,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  /// Delete an item (and its claim, if any).
  fn delete_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Claims ────────────────────────────────────────────────────────────

  /// Claim an item for `claimant_id` and return the resulting claimant
  /// set.
  ///
  /// Claiming an item already claimed by a *different* identity fails with
  /// the backend's already-claimed error and mutates nothing. Re-claiming
  /// one's own claim is idempotent.
  fn claim<'a>(
    &'a self,
    item_id: Uuid,
    claimant_id: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Remove `claimant_id`'s claim on an item, if present, and return the
  /// resulting claimant set. Unclaiming someone else's claim is a no-op.
  fn unclaim<'a>(
    &'a self,
    item_id: Uuid,
    claimant_id: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;
}
