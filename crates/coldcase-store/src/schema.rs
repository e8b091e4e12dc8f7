//! SQL schema for the coldcase SQLite store.
//!
//! Run once as an explicit migration step at [`Store::open`](crate::Store::open),
//! decoupled from the normal read/write paths. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`; future migrations gate on `user_version`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS missing_persons (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT NOT NULL,
    age                INTEGER,
    gender             TEXT,
    last_seen_date     TEXT,
    last_seen_location TEXT,
    description        TEXT,
    case_number        TEXT NOT NULL UNIQUE,
    face_encoding      TEXT,            -- JSON array of f32; immutable once set
    photo_path         TEXT,
    status             TEXT NOT NULL DEFAULT 'MISSING',
    created_date       TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS unidentified_bodies (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    case_number    TEXT NOT NULL UNIQUE,
    found_date     TEXT,
    found_location TEXT,
    estimated_age  INTEGER,
    gender         TEXT,
    description    TEXT,
    face_encoding  TEXT,
    photo_path     TEXT,
    status         TEXT NOT NULL DEFAULT 'UNIDENTIFIED',
    created_date   TEXT NOT NULL
);

-- Many-to-many join between the two record kinds; written only by the
-- match engine and the query flow.
CREATE TABLE IF NOT EXISTS matches (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    missing_person_id    INTEGER NOT NULL REFERENCES missing_persons(id),
    unidentified_body_id INTEGER NOT NULL REFERENCES unidentified_bodies(id),
    confidence_score     REAL NOT NULL,
    match_date           TEXT NOT NULL,
    verified             INTEGER NOT NULL DEFAULT 0,
    notes                TEXT
);

CREATE INDEX IF NOT EXISTS missing_persons_status_idx    ON missing_persons(status);
CREATE INDEX IF NOT EXISTS unidentified_bodies_status_idx ON unidentified_bodies(status);
CREATE INDEX IF NOT EXISTS matches_score_idx              ON matches(confidence_score);

PRAGMA user_version = 1;
";
