//! SQL schema for the SZL SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per initiated subject. Never updated, never deleted.
-- The UNIQUE constraint on subject_token is what makes get-or-create
-- idempotent under concurrent requests.
CREATE TABLE IF NOT EXISTS subjects (
    id             TEXT PRIMARY KEY,
    subject_token  TEXT NOT NULL UNIQUE,
    division       TEXT NOT NULL,   -- display label, e.g. 'VOID WALKERS'
    answers        TEXT NOT NULL,   -- JSON array of raw answer indices
    wallet_address TEXT,            -- set at creation or never
    created_at     TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Transmissions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- subject_id is a weak link: feed entries must survive any future notion of
-- subject removal, so no cascade.
CREATE TABLE IF NOT EXISTS transmissions (
    id             TEXT PRIMARY KEY,
    content        TEXT NOT NULL,
    subject_id     TEXT REFERENCES subjects(id),
    tx_signature   TEXT,            -- set together with wallet_address or not at all
    wallet_address TEXT,
    created_at     TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    CHECK ((tx_signature IS NULL) = (wallet_address IS NULL))
);

CREATE INDEX IF NOT EXISTS transmissions_created_idx ON transmissions(created_at);
CREATE INDEX IF NOT EXISTS transmissions_subject_idx ON transmissions(subject_id);

PRAGMA user_version = 1;
";
