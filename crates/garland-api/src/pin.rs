//! PIN endpoints — the server side of the Access Gate.
//!
//! The gate itself is client-session-local: a successful verify is held
//! in the visitor's browser, not in a server session. These endpoints
//! only derive, store, and check verifiers.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use garland_core::{
  pin::{self, PinStatus},
  store::WishlistStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::{ApiError, store_err}, wishlists};

// ─── Set ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetBody {
  pub pin:         String,
  /// Required once a PIN is already set; changing the PIN needs the old
  /// one.
  pub current_pin: Option<String>,
}

/// `POST /wishlists/:slug/pin`
///
/// A fresh salt is generated on every change, so an old verifier never
/// stays derivable from the stored salt.
pub async fn set<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
  Json(body): Json<SetBody>,
) -> Result<StatusCode, ApiError>
where
  S: WishlistStore,
{
  if body.pin.trim().is_empty() {
    return Err(ApiError::BadRequest("pin is required".to_owned()));
  }

  let wishlist = wishlists::fetch(&state, &slug).await?;

  if let Some(verifier) = &wishlist.pin_verifier {
    let current = body.current_pin.ok_or(ApiError::InvalidPin)?;
    if !pin::verify(&wishlist.salt, verifier, &current).map_err(ApiError::from)? {
      return Err(ApiError::InvalidPin);
    }
  }

  let salt     = pin::generate_salt();
  let verifier = pin::derive_verifier(&salt, &body.pin).map_err(ApiError::from)?;
  state
    .store
    .set_pin_verifier(&slug, &salt, &verifier)
    .await
    .map_err(store_err)?;

  tracing::info!(%slug, "pin updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Verify ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
  pub status: PinStatus,
}

/// `POST /wishlists/:slug/pin/verify`
///
/// Returns `not_set` when the list was never protected (unlocked by
/// default); otherwise `valid`/`invalid`. Unknown slugs 404 — slug
/// existence is discoverable through the public read anyway.
pub async fn verify<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<VerifyResponse>, ApiError>
where
  S: WishlistStore,
{
  let wishlist = wishlists::fetch(&state, &slug).await?;

  let status = match &wishlist.pin_verifier {
    None => PinStatus::NotSet,
    Some(verifier) => {
      if pin::verify(&wishlist.salt, verifier, &body.pin).map_err(ApiError::from)? {
        PinStatus::Valid
      } else {
        PinStatus::Invalid
      }
    }
  };

  Ok(Json(VerifyResponse { status }))
}
