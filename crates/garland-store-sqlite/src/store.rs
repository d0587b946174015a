//! [`SqliteStore`] — the SQLite implementation of [`WishlistStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use garland_core::{
  item::{Item, ItemPatch, NewItem},
  pin, slug,
  store::WishlistStore,
  wishlist::{DEFAULT_TITLE, NewWishlist, Wishlist, WishlistSummary},
};

use crate::{
  Error, Result,
  encode::{RawItem, RawWishlist, decode_dt, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Garland wishlist store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// operations on one store share one connection, so every multi-statement
/// write below runs serialised inside its own transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Result of the claim transaction, carried out of the database closure.
enum ClaimOutcome {
  Claimants(Vec<String>),
  Conflict,
  MissingItem,
}

/// `UNIQUE`/constraint violation — raised by the slug constraint on
/// `wishlists` and the single-slot constraint on `claims`.
fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a full wishlist row by slug.
  async fn fetch_wishlist(&self, slug_str: String) -> Result<Option<Wishlist>> {
    let raw: Option<RawWishlist> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT wishlist_id, slug, title, owner_id, salt, pin_verifier,
                      created_at
               FROM wishlists WHERE slug = ?1",
              rusqlite::params![slug_str],
              RawWishlist::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawWishlist::decode).transpose()
  }
}

// ─── WishlistStore implementation ────────────────────────────────────────────

impl WishlistStore for SqliteStore {
  type Error = Error;

  // ── Wishlists ─────────────────────────────────────────────────────────

  async fn create_wishlist(&self, input: NewWishlist) -> Result<Wishlist> {
    let wishlist = Wishlist {
      wishlist_id:  Uuid::new_v4(),
      slug:         slug::resolve(input.slug.as_deref()).map_err(Error::Core)?,
      title:        input
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
      owner_id:     input.owner_id,
      salt:         pin::generate_salt(),
      pin_verifier: None,
      created_at:   Utc::now(),
    };

    let id_str     = encode_uuid(wishlist.wishlist_id);
    let slug_str   = wishlist.slug.clone();
    let title      = wishlist.title.clone();
    let owner_id   = wishlist.owner_id.clone();
    let salt       = wishlist.salt.clone();
    let created_at = encode_dt(wishlist.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO wishlists
             (wishlist_id, slug, title, owner_id, salt, pin_verifier, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
          rusqlite::params![id_str, slug_str, title, owner_id, salt, created_at],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if inserted {
      Ok(wishlist)
    } else {
      Err(Error::SlugTaken(wishlist.slug))
    }
  }

  async fn get_wishlist(&self, slug: &str) -> Result<Option<Wishlist>> {
    self.fetch_wishlist(slug.to_owned()).await
  }

  async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<WishlistSummary>> {
    let owner = owner_id.to_owned();
    let rows: Vec<(String, String, String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT w.slug, w.title, w.created_at, COUNT(i.item_id)
           FROM wishlists w
           LEFT JOIN items i ON i.wishlist_id = w.wishlist_id
           WHERE w.owner_id = ?1
           GROUP BY w.wishlist_id
           ORDER BY w.created_at DESC, w.rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(slug, title, created_at, count)| {
        Ok(WishlistSummary {
          slug,
          title,
          created_at: decode_dt(&created_at)?,
          item_count: count as u64,
        })
      })
      .collect()
  }

  async fn update_title(&self, slug: &str, title: &str) -> Result<Wishlist> {
    let slug_str  = slug.to_owned();
    let title_str = title.to_owned();
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE wishlists SET title = ?1 WHERE slug = ?2",
          rusqlite::params![title_str, slug_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::WishlistNotFound(slug.to_owned()));
    }
    self
      .fetch_wishlist(slug.to_owned())
      .await?
      .ok_or_else(|| Error::WishlistNotFound(slug.to_owned()))
  }

  async fn delete_wishlist(&self, slug: &str) -> Result<()> {
    let slug_str = slug.to_owned();
    let changed: usize = self
      .conn
      .call(move |conn| {
        // Items and claims go with the list via ON DELETE CASCADE.
        Ok(conn.execute(
          "DELETE FROM wishlists WHERE slug = ?1",
          rusqlite::params![slug_str],
        )?)
      })
      .await?;

    if changed == 0 {
      Err(Error::WishlistNotFound(slug.to_owned()))
    } else {
      Ok(())
    }
  }

  async fn set_pin_verifier(
    &self,
    slug: &str,
    salt: &str,
    verifier: &str,
  ) -> Result<()> {
    let slug_str     = slug.to_owned();
    let salt_str     = salt.to_owned();
    let verifier_str = verifier.to_owned();
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE wishlists SET salt = ?1, pin_verifier = ?2 WHERE slug = ?3",
          rusqlite::params![salt_str, verifier_str, slug_str],
        )?)
      })
      .await?;

    if changed == 0 {
      Err(Error::WishlistNotFound(slug.to_owned()))
    } else {
      Ok(())
    }
  }

  // ── Items ─────────────────────────────────────────────────────────────

  async fn add_item(&self, wishlist_id: Uuid, input: NewItem) -> Result<Item> {
    let item = Item {
      item_id:    Uuid::new_v4(),
      wishlist_id,
      name:       input.name,
      url:        input.url,
      price:      input.price,
      image:      input.image,
      created_at: Utc::now(),
    };

    let id_str       = encode_uuid(item.item_id);
    let wishlist_str = encode_uuid(item.wishlist_id);
    let name         = item.name.clone();
    let url          = item.url.clone();
    let price        = item.price.clone();
    let image        = item.image.clone();
    let created_at   = encode_dt(item.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO items
             (item_id, wishlist_id, name, url, price, image, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, wishlist_str, name, url, price, image, created_at],
        ) {
          Ok(_) => Ok(true),
          // FK violation: the parent wishlist is gone.
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if inserted {
      Ok(item)
    } else {
      Err(Error::WishlistNotFound(encode_uuid(wishlist_id)))
    }
  }

  async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>> {
    let id_str = encode_uuid(item_id);
    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT item_id, wishlist_id, name, url, price, image, created_at
               FROM items WHERE item_id = ?1",
              rusqlite::params![id_str],
              RawItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawItem::decode).transpose()
  }

  async fn list_items(&self, wishlist_id: Uuid) -> Result<Vec<Item>> {
    let wishlist_str = encode_uuid(wishlist_id);
    let raw: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT item_id, wishlist_id, name, url, price, image, created_at
           FROM items WHERE wishlist_id = ?1
           ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![wishlist_str], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawItem::decode).collect()
  }

  async fn list_items_with_claimants(
    &self,
    wishlist_id: Uuid,
  ) -> Result<Vec<(Item, Vec<String>)>> {
    let wishlist_str = encode_uuid(wishlist_id);
    let raw: Vec<(RawItem, Option<String>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT i.item_id, i.wishlist_id, i.name, i.url, i.price, i.image,
                  i.created_at, c.claimant_id
           FROM items i
           LEFT JOIN claims c ON c.item_id = i.item_id
           WHERE i.wishlist_id = ?1
           ORDER BY i.created_at ASC, i.rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![wishlist_str], |r| {
            Ok((RawItem::from_row(r)?, r.get::<_, Option<String>>(7)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raw
      .into_iter()
      .map(|(item, claimant)| {
        Ok((item.decode()?, claimant.into_iter().collect()))
      })
      .collect()
  }

  async fn update_item(&self, item_id: Uuid, patch: ItemPatch) -> Result<Item> {
    let id_str = encode_uuid(item_id);
    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(mut row) = tx
          .query_row(
            "SELECT item_id, wishlist_id, name, url, price, image, created_at
             FROM items WHERE item_id = ?1",
            rusqlite::params![id_str],
            RawItem::from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };

        if let Some(name) = patch.name {
          row.name = name;
        }
        if let Some(url) = patch.url {
          row.url = url;
        }
        if let Some(price) = patch.price {
          row.price = price;
        }
        if let Some(image) = patch.image {
          row.image = image;
        }

        tx.execute(
          "UPDATE items SET name = ?1, url = ?2, price = ?3, image = ?4
           WHERE item_id = ?5",
          rusqlite::params![row.name, row.url, row.price, row.image, id_str],
        )?;
        tx.commit()?;
        Ok(Some(row))
      })
      .await?;

    match raw {
      Some(row) => row.decode(),
      None => Err(Error::ItemNotFound(item_id)),
    }
  }

  async fn delete_item(&self, item_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(item_id);
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM items WHERE item_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      Err(Error::ItemNotFound(item_id))
    } else {
      Ok(())
    }
  }

  // ── Claims — the single-slot resolver ─────────────────────────────────

  async fn claim(&self, item_id: Uuid, claimant_id: &str) -> Result<Vec<String>> {
    let id_str   = encode_uuid(item_id);
    let claimant = claimant_id.to_owned();
    let claim_id = encode_uuid(Uuid::new_v4());
    let now      = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        // Read-check-replace runs inside one transaction; the UNIQUE
        // (item_id) constraint on claims backs it up should a second
        // writer ever slip past the check.
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM items WHERE item_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(ClaimOutcome::MissingItem);
        }

        let current: Option<String> = tx
          .query_row(
            "SELECT claimant_id FROM claims WHERE item_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(current) = current
          && current != claimant
        {
          return Ok(ClaimOutcome::Conflict);
        }

        // Replacement, not insertion-only: a same-owner re-claim swaps
        // the row and keeps the slot invariant under stale reads.
        tx.execute(
          "DELETE FROM claims WHERE item_id = ?1",
          rusqlite::params![id_str],
        )?;
        match tx.execute(
          "INSERT INTO claims (claim_id, item_id, claimant_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![claim_id, id_str, claimant, now],
        ) {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e) => {
            return Ok(ClaimOutcome::Conflict);
          }
          Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        Ok(ClaimOutcome::Claimants(vec![claimant]))
      })
      .await?;

    match outcome {
      ClaimOutcome::Claimants(c) => Ok(c),
      ClaimOutcome::Conflict => Err(Error::AlreadyClaimed(item_id)),
      ClaimOutcome::MissingItem => Err(Error::ItemNotFound(item_id)),
    }
  }

  async fn unclaim(&self, item_id: Uuid, claimant_id: &str) -> Result<Vec<String>> {
    let id_str   = encode_uuid(item_id);
    let claimant = claimant_id.to_owned();

    // None = item missing; Some(set) = resulting claimant set.
    let remaining: Option<Vec<String>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM items WHERE item_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        // Scoped by identity: someone else's claim is left alone.
        tx.execute(
          "DELETE FROM claims WHERE item_id = ?1 AND claimant_id = ?2",
          rusqlite::params![id_str, claimant],
        )?;

        let remaining: Option<String> = tx
          .query_row(
            "SELECT claimant_id FROM claims WHERE item_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        tx.commit()?;
        Ok(Some(remaining.into_iter().collect()))
      })
      .await?;

    remaining.ok_or(Error::ItemNotFound(item_id))
  }
}
