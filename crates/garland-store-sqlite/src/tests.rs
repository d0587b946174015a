//! Integration tests for `SqliteStore` against an in-memory database.

use garland_core::{
  item::{ItemPatch, NewItem},
  pin,
  store::WishlistStore,
  wishlist::{DEFAULT_TITLE, NewWishlist},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_wishlist(owner: &str, slug: Option<&str>) -> NewWishlist {
  NewWishlist {
    owner_id: owner.to_owned(),
    slug:     slug.map(str::to_owned),
    title:    None,
  }
}

fn headphones() -> NewItem {
  NewItem {
    name:  "Headphones".to_owned(),
    url:   Some("https://www.ozon.ru/product/12345".to_owned()),
    price: Some("12 990 ₽".to_owned()),
    image: None,
  }
}

// ─── Wishlists ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_wishlist() {
  let s = store().await;

  let created = s
    .create_wishlist(new_wishlist("owner-a", Some("gift-2026")))
    .await
    .unwrap();
  assert_eq!(created.slug, "gift-2026");
  assert_eq!(created.title, DEFAULT_TITLE);
  assert!(!created.salt.is_empty());
  assert!(created.pin_verifier.is_none());

  let fetched = s.get_wishlist("gift-2026").await.unwrap().unwrap();
  assert_eq!(fetched.wishlist_id, created.wishlist_id);
  assert_eq!(fetched.owner_id, "owner-a");
  assert_eq!(fetched.salt, created.salt);
}

#[tokio::test]
async fn get_wishlist_missing_returns_none() {
  let s = store().await;
  assert!(s.get_wishlist("no-such-slug").await.unwrap().is_none());
}

#[tokio::test]
async fn blank_slug_gets_generated() {
  let s = store().await;
  let created = s.create_wishlist(new_wishlist("owner-a", None)).await.unwrap();
  assert_eq!(created.slug.len(), garland_core::slug::GENERATED_LEN);
}

#[tokio::test]
async fn invalid_slug_is_rejected() {
  let s = store().await;
  let result = s
    .create_wishlist(new_wishlist("owner-a", Some("Not A Slug")))
    .await;
  assert!(matches!(
    result,
    Err(Error::Core(garland_core::Error::InvalidSlug(_)))
  ));
}

#[tokio::test]
async fn duplicate_slug_fails_and_first_survives() {
  let s = store().await;
  let first = s
    .create_wishlist(new_wishlist("owner-a", Some("taken")))
    .await
    .unwrap();

  let second = s
    .create_wishlist(new_wishlist("owner-b", Some("taken")))
    .await;
  assert!(matches!(second, Err(Error::SlugTaken(slug)) if slug == "taken"));

  // The first wishlist is untouched.
  let fetched = s.get_wishlist("taken").await.unwrap().unwrap();
  assert_eq!(fetched.owner_id, first.owner_id);
}

#[tokio::test]
async fn list_by_owner_newest_first_with_counts() {
  let s = store().await;
  let older = s
    .create_wishlist(new_wishlist("owner-a", Some("older")))
    .await
    .unwrap();
  s.create_wishlist(new_wishlist("owner-a", Some("newer")))
    .await
    .unwrap();
  s.create_wishlist(new_wishlist("owner-b", Some("other-owner")))
    .await
    .unwrap();

  s.add_item(older.wishlist_id, headphones()).await.unwrap();
  s.add_item(older.wishlist_id, headphones()).await.unwrap();

  let listed = s.list_by_owner("owner-a").await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].slug, "newer");
  assert_eq!(listed[0].item_count, 0);
  assert_eq!(listed[1].slug, "older");
  assert_eq!(listed[1].item_count, 2);
}

#[tokio::test]
async fn update_title() {
  let s = store().await;
  s.create_wishlist(new_wishlist("owner-a", Some("renamed")))
    .await
    .unwrap();

  let updated = s.update_title("renamed", "Новый год").await.unwrap();
  assert_eq!(updated.title, "Новый год");

  let missing = s.update_title("no-such-slug", "x").await;
  assert!(matches!(missing, Err(Error::WishlistNotFound(_))));
}

#[tokio::test]
async fn delete_wishlist_cascades_to_items_and_claims() {
  let s = store().await;
  let wl = s
    .create_wishlist(new_wishlist("owner-a", Some("doomed")))
    .await
    .unwrap();
  let item = s.add_item(wl.wishlist_id, headphones()).await.unwrap();
  s.claim(item.item_id, "visitor-a").await.unwrap();

  s.delete_wishlist("doomed").await.unwrap();

  assert!(s.get_wishlist("doomed").await.unwrap().is_none());
  assert!(s.get_item(item.item_id).await.unwrap().is_none());
  // The claim row went with the item: claiming a missing item errors.
  let result = s.claim(item.item_id, "visitor-b").await;
  assert!(matches!(result, Err(Error::ItemNotFound(_))));
}

#[tokio::test]
async fn delete_missing_wishlist_errors() {
  let s = store().await;
  let result = s.delete_wishlist("no-such-slug").await;
  assert!(matches!(result, Err(Error::WishlistNotFound(_))));
}

// ─── PIN persistence ─────────────────────────────────────────────────────────

#[tokio::test]
async fn set_pin_verifier_rotates_salt() {
  let s = store().await;
  let created = s
    .create_wishlist(new_wishlist("owner-a", Some("locked")))
    .await
    .unwrap();

  let salt1     = pin::generate_salt();
  let verifier1 = pin::derive_verifier(&salt1, "4821").unwrap();
  s.set_pin_verifier("locked", &salt1, &verifier1).await.unwrap();

  let loaded = s.get_wishlist("locked").await.unwrap().unwrap();
  assert_ne!(loaded.salt, created.salt);
  assert_eq!(loaded.pin_verifier.as_deref(), Some(verifier1.as_str()));
  assert!(pin::verify(&loaded.salt, loaded.pin_verifier.as_deref().unwrap(), "4821").unwrap());

  // A PIN change stores a fresh salt as well.
  let salt2     = pin::generate_salt();
  let verifier2 = pin::derive_verifier(&salt2, "9999").unwrap();
  s.set_pin_verifier("locked", &salt2, &verifier2).await.unwrap();

  let reloaded = s.get_wishlist("locked").await.unwrap().unwrap();
  assert_ne!(reloaded.salt, loaded.salt);
  assert!(!pin::verify(&reloaded.salt, reloaded.pin_verifier.as_deref().unwrap(), "4821").unwrap());
  assert!(pin::verify(&reloaded.salt, reloaded.pin_verifier.as_deref().unwrap(), "9999").unwrap());
}

#[tokio::test]
async fn set_pin_on_missing_wishlist_errors() {
  let s = store().await;
  let result = s.set_pin_verifier("no-such-slug", "salt", "verifier").await;
  assert!(matches!(result, Err(Error::WishlistNotFound(_))));
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn items_listed_in_creation_order() {
  let s = store().await;
  let wl = s
    .create_wishlist(new_wishlist("owner-a", Some("ordered")))
    .await
    .unwrap();

  for name in ["first", "second", "third"] {
    s.add_item(
      wl.wishlist_id,
      NewItem {
        name:  name.to_owned(),
        url:   None,
        price: None,
        image: None,
      },
    )
    .await
    .unwrap();
  }

  let items = s.list_items(wl.wishlist_id).await.unwrap();
  let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
  assert_eq!(names, ["first", "second", "third"]);
}

#[tokio::test]
async fn add_item_to_missing_wishlist_errors() {
  let s = store().await;
  let result = s.add_item(Uuid::new_v4(), headphones()).await;
  assert!(matches!(result, Err(Error::WishlistNotFound(_))));
}

#[tokio::test]
async fn update_item_patch_semantics() {
  let s = store().await;
  let wl = s
    .create_wishlist(new_wishlist("owner-a", Some("patchy")))
    .await
    .unwrap();
  let item = s.add_item(wl.wishlist_id, headphones()).await.unwrap();

  // Rename only: url/price untouched.
  let updated = s
    .update_item(
      item.item_id,
      ItemPatch {
        name: Some("Better headphones".to_owned()),
        ..ItemPatch::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(updated.name, "Better headphones");
  assert_eq!(updated.url, item.url);
  assert_eq!(updated.price, item.price);

  // Explicitly clear the url.
  let cleared = s
    .update_item(
      item.item_id,
      ItemPatch {
        url: Some(None),
        ..ItemPatch::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(cleared.url, None);
  assert_eq!(cleared.name, "Better headphones");
}

#[tokio::test]
async fn update_missing_item_errors() {
  let s = store().await;
  let result = s.update_item(Uuid::new_v4(), ItemPatch::default()).await;
  assert!(matches!(result, Err(Error::ItemNotFound(_))));
}

#[tokio::test]
async fn delete_item_removes_it() {
  let s = store().await;
  let wl = s
    .create_wishlist(new_wishlist("owner-a", Some("shrinking")))
    .await
    .unwrap();
  let item = s.add_item(wl.wishlist_id, headphones()).await.unwrap();

  s.delete_item(item.item_id).await.unwrap();
  assert!(s.get_item(item.item_id).await.unwrap().is_none());

  let again = s.delete_item(item.item_id).await;
  assert!(matches!(again, Err(Error::ItemNotFound(_))));
}

// ─── Claims ──────────────────────────────────────────────────────────────────

async fn wishlist_with_item(s: &SqliteStore) -> Uuid {
  let wl = s
    .create_wishlist(new_wishlist("owner-a", None))
    .await
    .unwrap();
  s.add_item(wl.wishlist_id, headphones())
    .await
    .unwrap()
    .item_id
}

#[tokio::test]
async fn claim_then_conflict() {
  let s = store().await;
  let item_id = wishlist_with_item(&s).await;

  let claimants = s.claim(item_id, "visitor-a").await.unwrap();
  assert_eq!(claimants, ["visitor-a"]);

  let conflict = s.claim(item_id, "visitor-b").await;
  assert!(matches!(conflict, Err(Error::AlreadyClaimed(id)) if id == item_id));

  // The original claim is untouched.
  let wl = s.get_item(item_id).await.unwrap().unwrap().wishlist_id;
  let listed = s.list_items_with_claimants(wl).await.unwrap();
  assert_eq!(listed[0].1, ["visitor-a"]);
}

#[tokio::test]
async fn reclaim_by_owner_is_idempotent() {
  let s = store().await;
  let item_id = wishlist_with_item(&s).await;

  s.claim(item_id, "visitor-a").await.unwrap();
  let claimants = s.claim(item_id, "visitor-a").await.unwrap();
  assert_eq!(claimants, ["visitor-a"]);
}

#[tokio::test]
async fn unclaim_by_non_owner_is_a_noop() {
  let s = store().await;
  let item_id = wishlist_with_item(&s).await;

  s.claim(item_id, "visitor-a").await.unwrap();
  let claimants = s.unclaim(item_id, "visitor-b").await.unwrap();
  assert_eq!(claimants, ["visitor-a"]);
}

#[tokio::test]
async fn unclaim_frees_the_slot() {
  let s = store().await;
  let item_id = wishlist_with_item(&s).await;

  s.claim(item_id, "visitor-a").await.unwrap();
  let claimants = s.unclaim(item_id, "visitor-a").await.unwrap();
  assert!(claimants.is_empty());

  let claimants = s.claim(item_id, "visitor-b").await.unwrap();
  assert_eq!(claimants, ["visitor-b"]);
}

#[tokio::test]
async fn claim_missing_item_errors() {
  let s = store().await;
  let result = s.claim(Uuid::new_v4(), "visitor-a").await;
  assert!(matches!(result, Err(Error::ItemNotFound(_))));

  let result = s.unclaim(Uuid::new_v4(), "visitor-a").await;
  assert!(matches!(result, Err(Error::ItemNotFound(_))));
}

#[tokio::test]
async fn concurrent_claims_admit_exactly_one() {
  const VISITORS: usize = 8;

  let s = store().await;
  let item_id = wishlist_with_item(&s).await;

  let mut handles = Vec::new();
  for n in 0..VISITORS {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.claim(item_id, &format!("visitor-{n}")).await
    }));
  }

  let mut won  = 0;
  let mut lost = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(claimants) => {
        assert_eq!(claimants.len(), 1);
        won += 1;
      }
      Err(Error::AlreadyClaimed(id)) => {
        assert_eq!(id, item_id);
        lost += 1;
      }
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  assert_eq!(won, 1, "exactly one visitor wins the slot");
  assert_eq!(lost, VISITORS - 1);

  // Single-slot invariant holds after the dust settles.
  let wl = s.get_item(item_id).await.unwrap().unwrap().wishlist_id;
  let listed = s.list_items_with_claimants(wl).await.unwrap();
  assert_eq!(listed[0].1.len(), 1);
}
