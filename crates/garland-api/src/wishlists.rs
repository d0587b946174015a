//! Handlers for `/wishlists` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/wishlists?owner_id=` | per-owner listing, newest first |
//! | `POST` | `/wishlists` | body `{owner_id, slug?, title?}` |
//! | `GET`  | `/wishlists/:slug` | public payload with claimant sets |
//! | `GET`  | `/wishlists/:slug/editor` | editor payload, no claim data |
//! | `PATCH` | `/wishlists/:slug` | body `{title}` |
//! | `DELETE` | `/wishlists/:slug` | cascades to items and claims |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use garland_core::{
  store::WishlistStore,
  wishlist::{NewWishlist, Wishlist, WishlistSummary},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::{ApiError, store_err}};

// ─── List by owner ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub wishlists: Vec<WishlistSummary>,
}

/// `GET /wishlists?owner_id=<identity>`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: WishlistStore,
{
  let owner_id = params
    .owner_id
    .filter(|o| !o.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("owner_id is required".to_owned()))?;

  let wishlists = state
    .store
    .list_by_owner(&owner_id)
    .await
    .map_err(store_err)?;
  Ok(Json(ListResponse { wishlists }))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub owner_id: String,
  pub slug:     Option<String>,
  pub title:    Option<String>,
}

/// `POST /wishlists`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishlistStore,
{
  if body.owner_id.trim().is_empty() {
    return Err(ApiError::BadRequest("owner_id is required".to_owned()));
  }

  let wishlist = state
    .store
    .create_wishlist(NewWishlist {
      owner_id: body.owner_id,
      slug:     body.slug,
      title:    body.title,
    })
    .await
    .map_err(store_err)?;

  tracing::info!(slug = %wishlist.slug, "wishlist created");
  Ok((StatusCode::CREATED, Json(wishlist)))
}

// ─── Public read ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PublicItem {
  pub id:        Uuid,
  pub name:      String,
  pub image:     Option<String>,
  pub price:     Option<String>,
  pub url:       Option<String>,
  /// Claimant identity set; zero or one entry.
  pub claimants: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicWishlist {
  pub slug:  String,
  pub title: String,
  pub items: Vec<PublicItem>,
}

/// `GET /wishlists/:slug` — the payload the shared (visitor-facing) page
/// polls. Claim changes propagate by refresh only.
pub async fn get_public<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
) -> Result<Json<PublicWishlist>, ApiError>
where
  S: WishlistStore,
{
  let wishlist = fetch(&state, &slug).await?;
  let items = state
    .store
    .list_items_with_claimants(wishlist.wishlist_id)
    .await
    .map_err(store_err)?;

  Ok(Json(PublicWishlist {
    slug:  wishlist.slug,
    title: wishlist.title,
    items: items
      .into_iter()
      .map(|(item, claimants)| PublicItem {
        id: item.item_id,
        name: item.name,
        image: item.image,
        price: item.price,
        url: item.url,
        claimants,
      })
      .collect(),
  }))
}

// ─── Editor read ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EditorItem {
  pub id:    Uuid,
  pub name:  String,
  pub image: Option<String>,
  pub price: Option<String>,
  pub url:   Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditorWishlist {
  pub slug:    String,
  pub title:   String,
  pub pin_set: bool,
  pub items:   Vec<EditorItem>,
}

/// `GET /wishlists/:slug/editor` — claim data deliberately omitted so the
/// owner cannot peek at who grabbed what.
pub async fn get_editor<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
) -> Result<Json<EditorWishlist>, ApiError>
where
  S: WishlistStore,
{
  let wishlist = fetch(&state, &slug).await?;
  let items = state
    .store
    .list_items(wishlist.wishlist_id)
    .await
    .map_err(store_err)?;

  let pin_set = wishlist.pin_set();
  Ok(Json(EditorWishlist {
    slug:    wishlist.slug,
    pin_set,
    title:   wishlist.title,
    items:   items
      .into_iter()
      .map(|item| EditorItem {
        id: item.item_id,
        name: item.name,
        image: item.image,
        price: item.price,
        url: item.url,
      })
      .collect(),
  }))
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub title: String,
}

/// `PATCH /wishlists/:slug`
pub async fn rename<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
  Json(body): Json<RenameBody>,
) -> Result<Json<Wishlist>, ApiError>
where
  S: WishlistStore,
{
  let title = body.title.trim();
  if title.is_empty() {
    return Err(ApiError::BadRequest("title is required".to_owned()));
  }

  let wishlist = state
    .store
    .update_title(&slug, title)
    .await
    .map_err(store_err)?;
  Ok(Json(wishlist))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /wishlists/:slug`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(slug): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: WishlistStore,
{
  state
    .store
    .delete_wishlist(&slug)
    .await
    .map_err(store_err)?;
  tracing::info!(%slug, "wishlist deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Shared ──────────────────────────────────────────────────────────────────

/// Load a wishlist or 404.
pub(crate) async fn fetch<S>(
  state: &ApiState<S>,
  slug: &str,
) -> Result<Wishlist, ApiError>
where
  S: WishlistStore,
{
  state
    .store
    .get_wishlist(slug)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound("wishlist not found".to_owned()))
}
