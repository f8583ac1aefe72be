//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The local mirror of a site's people. At most one row per
-- (site_id, user_id, kind); the same remote user may appear under several
-- kinds independently.
CREATE TABLE IF NOT EXISTS people (
    site_id        INTEGER NOT NULL,
    user_id        INTEGER NOT NULL,
    kind           TEXT    NOT NULL,   -- 'user' | 'follower' | 'viewer'
    login          TEXT    NOT NULL,
    display_name   TEXT    NOT NULL,
    first_name     TEXT,
    last_name      TEXT,
    email          TEXT,
    avatar_url     TEXT,
    role           TEXT,               -- role slug; team members only
    is_super_admin INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT    NOT NULL,   -- ISO 8601 UTC; store-assigned
    PRIMARY KEY (site_id, user_id, kind)
);

-- Cached role definitions per site, replaced wholesale on refresh.
CREATE TABLE IF NOT EXISTS roles (
    site_id INTEGER NOT NULL,
    slug    TEXT    NOT NULL,
    name    TEXT    NOT NULL,
    PRIMARY KEY (site_id, slug)
);

CREATE INDEX IF NOT EXISTS people_site_kind_idx ON people(site_id, kind);

PRAGMA user_version = 1;
";
