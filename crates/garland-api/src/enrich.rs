//! The `/enrich` endpoint — thin adapter over [`garland_enrich`].

use axum::{Json, extract::State};
use garland_core::store::WishlistStore;
use garland_enrich::Enrichment;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct EnrichBody {
  pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
  pub result: Enrichment,
}

/// `POST /enrich` — body `{query}`.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<EnrichBody>,
) -> Result<Json<EnrichResponse>, ApiError>
where
  S: WishlistStore,
{
  let query = body
    .query
    .as_deref()
    .map(str::trim)
    .filter(|q| !q.is_empty())
    .ok_or_else(|| ApiError::BadRequest("Введите название желания".to_owned()))?;

  let Some(client) = &state.enrich else {
    return Err(ApiError::Upstream(
      "enrichment API key is not configured".to_owned(),
    ));
  };

  let result = client.enrich(query).await.map_err(|e| match e {
    garland_enrich::Error::EmptyQuery => {
      ApiError::BadRequest("Введите название желания".to_owned())
    }
    other => ApiError::Upstream(other.to_string()),
  })?;

  Ok(Json(EnrichResponse { result }))
}
