//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("wrong PIN")]
  InvalidPin,

  #[error("upstream failure: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(garland_core::Error),
}

/// Map a domain error to the HTTP taxonomy. Backend infrastructure
/// failures stay opaque 500s.
impl From<garland_core::Error> for ApiError {
  fn from(e: garland_core::Error) -> Self {
    use garland_core::Error as E;
    match e {
      E::WishlistNotFound(_) => ApiError::NotFound("wishlist not found".to_owned()),
      E::ItemNotFound(_) => ApiError::NotFound("item not found".to_owned()),
      E::SlugTaken(_) => ApiError::Conflict("slug already taken".to_owned()),
      // Message shown inline next to the claim control.
      E::AlreadyClaimed(_) => ApiError::Conflict("Этот подарок уже забрали".to_owned()),
      E::InvalidSlug(slug) => ApiError::BadRequest(format!("invalid slug: {slug:?}")),
      other => ApiError::Store(other),
    }
  }
}

/// Shorthand for handlers: fold any store backend error through the core
/// taxonomy.
pub(crate) fn store_err<E: Into<garland_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::InvalidPin => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Upstream(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
