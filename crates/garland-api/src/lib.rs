//! JSON REST API for Garland.
//!
//! Exposes an axum [`Router`] backed by any
//! [`garland_core::store::WishlistStore`]. Transport concerns (TLS, request
//! tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", garland_api::api_router(state))
//! ```

pub mod claims;
pub mod enrich;
pub mod error;
pub mod items;
pub mod pin;
pub mod wishlists;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use garland_core::store::WishlistStore;
use garland_enrich::EnrichClient;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
///
/// `enrich` is `None` when no API key is configured; the `/enrich`
/// endpoint then reports the missing credentials instead of calling out.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub enrich: Option<Arc<EnrichClient>>,
}

// Manual impl: `Arc` clones regardless of whether `S` itself is `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      enrich: self.enrich.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: WishlistStore + Send + Sync + 'static,
{
  Router::new()
    // Wishlists
    .route(
      "/wishlists",
      get(wishlists::list::<S>).post(wishlists::create::<S>),
    )
    .route(
      "/wishlists/{slug}",
      get(wishlists::get_public::<S>)
        .patch(wishlists::rename::<S>)
        .delete(wishlists::remove::<S>),
    )
    .route("/wishlists/{slug}/editor", get(wishlists::get_editor::<S>))
    .route("/wishlists/{slug}/items", post(items::create::<S>))
    .route("/wishlists/{slug}/pin", post(pin::set::<S>))
    .route("/wishlists/{slug}/pin/verify", post(pin::verify::<S>))
    // Items
    .route(
      "/items/{id}",
      patch(items::update::<S>).delete(items::remove::<S>),
    )
    .route("/items/{id}/claim", post(claims::resolve::<S>))
    // Enrichment
    .route("/enrich", post(enrich::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
