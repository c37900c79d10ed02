//! SQL schema for the Circle SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS identities (
    identity_id   TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    avatar        TEXT NOT NULL,
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL           -- RFC 3339 UTC
);

-- One document per profile. `owner_id` and `handle` are copies of fields in
-- `document`, kept as columns for lookups and uniqueness.
-- No foreign key to identities: deleting a profile and its identity are two
-- independent writes.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL UNIQUE,
    handle      TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,
    document    TEXT NOT NULL             -- JSON-encoded Profile
);

-- Posts outlive their author's identity.
CREATE TABLE IF NOT EXISTS posts (
    post_id     TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    document    TEXT NOT NULL             -- JSON-encoded Post
);

CREATE INDEX IF NOT EXISTS posts_created_idx ON posts(created_at);
CREATE INDEX IF NOT EXISTS posts_owner_idx   ON posts(owner_id);

PRAGMA user_version = 1;
";
