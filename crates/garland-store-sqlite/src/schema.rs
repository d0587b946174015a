//! SQL schema for the Garland SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS wishlists (
    wishlist_id  TEXT PRIMARY KEY,
    slug         TEXT NOT NULL UNIQUE,
    title        TEXT NOT NULL,
    owner_id     TEXT NOT NULL,
    salt         TEXT NOT NULL,
    pin_verifier TEXT,              -- NULL until a PIN is first set
    created_at   TEXT NOT NULL      -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS items (
    item_id      TEXT PRIMARY KEY,
    wishlist_id  TEXT NOT NULL REFERENCES wishlists(wishlist_id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    url          TEXT,
    price        TEXT,              -- display string, e.g. '12 990 ₽'
    image        TEXT,
    created_at   TEXT NOT NULL
);

-- Single-slot claims. UNIQUE (item_id) is the storage-level guarantee
-- that an item never holds two claims, whatever races happen above.
CREATE TABLE IF NOT EXISTS claims (
    claim_id     TEXT PRIMARY KEY,
    item_id      TEXT NOT NULL REFERENCES items(item_id) ON DELETE CASCADE,
    claimant_id  TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    UNIQUE (item_id)
);

CREATE INDEX IF NOT EXISTS items_wishlist_idx  ON items(wishlist_id);
CREATE INDEX IF NOT EXISTS wishlists_owner_idx ON wishlists(owner_id);

PRAGMA user_version = 1;
";
