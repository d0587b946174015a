//! Handlers for item endpoints.
//!
//! Items are created under their wishlist's slug; updates and deletes
//! address the item id directly, as the editor already holds it.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use garland_core::{
  item::{Item, ItemPatch, NewItem},
  store::WishlistStore,
};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{ApiState, error::{ApiError, store_err}, wishlists};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:  String,
  pub url:   Option<String>,
  pub price: Option<String>,
  pub image: Option<String>,
}

/// `POST /wishlists/:slug/items`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishlistStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name is required".to_owned()));
  }

  let wishlist = wishlists::fetch(&state, &slug).await?;
  let item = state
    .store
    .add_item(
      wishlist.wishlist_id,
      NewItem {
        name:  body.name,
        url:   body.url,
        price: body.price,
        image: body.image,
      },
    )
    .await
    .map_err(store_err)?;

  Ok((StatusCode::CREATED, Json(item)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Distinguishes an absent field from an explicit `null`: absent leaves
/// the stored value alone, `null` clears it.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub name: Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub url: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub price: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub image: Option<Option<String>>,
}

/// `PATCH /items/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Item>, ApiError>
where
  S: WishlistStore,
{
  if let Some(name) = &body.name
    && name.trim().is_empty()
  {
    return Err(ApiError::BadRequest("name cannot be blank".to_owned()));
  }

  let item = state
    .store
    .update_item(
      id,
      ItemPatch {
        name:  body.name,
        url:   body.url,
        price: body.price,
        image: body.image,
      },
    )
    .await
    .map_err(store_err)?;
  Ok(Json(item))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /items/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WishlistStore,
{
  state.store.delete_item(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
