//! The claim endpoint — the HTTP face of the single-slot claim resolver.

use axum::{
  Json,
  extract::{Path, State},
};
use garland_core::{claim::ClaimAction, store::WishlistStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::{ApiError, store_err}};

#[derive(Debug, Deserialize)]
pub struct ClaimBody {
  pub action:      Option<ClaimAction>,
  pub claimant_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
  /// Resulting claimant identity set; zero or one entry.
  pub claimants: Vec<String>,
}

/// `POST /items/:id/claim` — body `{action: "claim"|"unclaim",
/// claimant_id}`.
///
/// A conflicting claim comes back as 409 with nothing mutated; the caller
/// refreshes and sees the winner.
pub async fn resolve<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ClaimBody>,
) -> Result<Json<ClaimResponse>, ApiError>
where
  S: WishlistStore,
{
  let (Some(action), Some(claimant_id)) = (body.action, body.claimant_id) else {
    return Err(ApiError::BadRequest(
      "action and claimant_id are required".to_owned(),
    ));
  };
  if claimant_id.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "action and claimant_id are required".to_owned(),
    ));
  }

  let claimants = match action {
    ClaimAction::Claim => state.store.claim(id, &claimant_id).await,
    ClaimAction::Unclaim => state.store.unclaim(id, &claimant_id).await,
  }
  .map_err(store_err)?;

  Ok(Json(ClaimResponse { claimants }))
}
