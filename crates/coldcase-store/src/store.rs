//! [`Store`]: synchronous SQLite access for the three relations.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::encode::{decode_dt, decode_features, encode_dt, encode_features};
use crate::records::{
    MatchDetail, MatchRecord, MissingPerson, NewMissingPerson, NewUnidentifiedBody, Stats,
    UnidentifiedBody, STATUS_MISSING, STATUS_UNIDENTIFIED,
};
use crate::schema::SCHEMA;
use crate::{Error, Result};

/// A coldcase record store backed by a single SQLite file.
///
/// Holds one connection; every operation is a single autocommitted
/// statement. Constructed once per process and passed explicitly to the
/// engines that need it.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (or create) a store at `path` and run the idempotent schema
    /// migration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ── Writes ───────────────────────────────────────────────────────────

    /// Insert a missing-person record, returning its assigned id.
    ///
    /// A duplicate case number is rejected with
    /// [`Error::DuplicateCaseNumber`] and the store is left unchanged.
    pub fn add_missing_person(&self, new: &NewMissingPerson) -> Result<i64> {
        let encoding = encode_features(new.features.as_ref())?;
        let created = encode_dt(Utc::now());

        self.conn
            .execute(
                "INSERT INTO missing_persons
                   (name, age, gender, last_seen_date, last_seen_location,
                    description, case_number, face_encoding, photo_path, created_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    new.name,
                    new.age,
                    new.gender,
                    new.last_seen_date,
                    new.last_seen_location,
                    new.description,
                    new.case_number,
                    encoding,
                    new.photo_path,
                    created,
                ],
            )
            .map_err(|e| map_case_conflict(e, &new.case_number))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, case_number = %new.case_number, "missing person recorded");
        Ok(id)
    }

    /// Insert an unidentified-body record, returning its assigned id.
    pub fn add_unidentified_body(&self, new: &NewUnidentifiedBody) -> Result<i64> {
        let encoding = encode_features(new.features.as_ref())?;
        let created = encode_dt(Utc::now());

        self.conn
            .execute(
                "INSERT INTO unidentified_bodies
                   (case_number, found_date, found_location, estimated_age,
                    gender, description, face_encoding, photo_path, created_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    new.case_number,
                    new.found_date,
                    new.found_location,
                    new.estimated_age,
                    new.gender,
                    new.description,
                    encoding,
                    new.photo_path,
                    created,
                ],
            )
            .map_err(|e| map_case_conflict(e, &new.case_number))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, case_number = %new.case_number, "unidentified body recorded");
        Ok(id)
    }

    /// Insert a match between the two parent records.
    ///
    /// Foreign keys are enforced: both parents must exist. The verification
    /// flag starts unset.
    pub fn add_match(
        &self,
        missing_person_id: i64,
        unidentified_body_id: i64,
        confidence_score: f32,
        notes: &str,
    ) -> Result<i64> {
        let match_date = encode_dt(Utc::now());
        self.conn.execute(
            "INSERT INTO matches
               (missing_person_id, unidentified_body_id, confidence_score, match_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                missing_person_id,
                unidentified_body_id,
                confidence_score as f64,
                match_date,
                notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// All missing-person records still in `MISSING` status.
    pub fn missing_persons(&self) -> Result<Vec<MissingPerson>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, age, gender, last_seen_date, last_seen_location,
                    description, case_number, face_encoding, photo_path, status,
                    created_date
             FROM missing_persons WHERE status = ?1",
        )?;
        let raws = stmt
            .query_map(params![STATUS_MISSING], |row| {
                Ok(RawPerson {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    age: row.get(2)?,
                    gender: row.get(3)?,
                    last_seen_date: row.get(4)?,
                    last_seen_location: row.get(5)?,
                    description: row.get(6)?,
                    case_number: row.get(7)?,
                    face_encoding: row.get(8)?,
                    photo_path: row.get(9)?,
                    status: row.get(10)?,
                    created_date: row.get(11)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raws.into_iter().map(RawPerson::into_record).collect()
    }

    /// All unidentified-body records still in `UNIDENTIFIED` status.
    pub fn unidentified_bodies(&self) -> Result<Vec<UnidentifiedBody>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, case_number, found_date, found_location, estimated_age,
                    gender, description, face_encoding, photo_path, status,
                    created_date
             FROM unidentified_bodies WHERE status = ?1",
        )?;
        let raws = stmt
            .query_map(params![STATUS_UNIDENTIFIED], |row| {
                Ok(RawBody {
                    id: row.get(0)?,
                    case_number: row.get(1)?,
                    found_date: row.get(2)?,
                    found_location: row.get(3)?,
                    estimated_age: row.get(4)?,
                    gender: row.get(5)?,
                    description: row.get(6)?,
                    face_encoding: row.get(7)?,
                    photo_path: row.get(8)?,
                    status: row.get(9)?,
                    created_date: row.get(10)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raws.into_iter().map(RawBody::into_record).collect()
    }

    /// Persisted matches at or above `threshold`, joined with the parent
    /// records' display fields, best score first.
    pub fn matches_above(&self, threshold: f32) -> Result<Vec<MatchDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.missing_person_id, m.unidentified_body_id,
                    m.confidence_score, m.match_date, m.verified, m.notes,
                    mp.name, mp.case_number, ub.case_number, ub.found_location
             FROM matches m
             JOIN missing_persons mp    ON m.missing_person_id = mp.id
             JOIN unidentified_bodies ub ON m.unidentified_body_id = ub.id
             WHERE m.confidence_score >= ?1
             ORDER BY m.confidence_score DESC",
        )?;
        let raws = stmt
            .query_map(params![threshold as f64], |row| {
                Ok(RawMatch {
                    id: row.get(0)?,
                    missing_person_id: row.get(1)?,
                    unidentified_body_id: row.get(2)?,
                    confidence_score: row.get(3)?,
                    match_date: row.get(4)?,
                    verified: row.get(5)?,
                    notes: row.get(6)?,
                    person_name: row.get(7)?,
                    person_case: row.get(8)?,
                    body_case: row.get(9)?,
                    found_location: row.get(10)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raws.into_iter().map(RawMatch::into_detail).collect()
    }

    /// Record counts: active persons, active bodies, all matches.
    pub fn stats(&self) -> Result<Stats> {
        let count = |sql: &str, p: &[&dyn rusqlite::ToSql]| -> Result<u64> {
            Ok(self.conn.query_row(sql, p, |row| row.get::<_, i64>(0))? as u64)
        };
        Ok(Stats {
            missing_persons: count(
                "SELECT COUNT(*) FROM missing_persons WHERE status = ?1",
                &[&STATUS_MISSING],
            )?,
            unidentified_bodies: count(
                "SELECT COUNT(*) FROM unidentified_bodies WHERE status = ?1",
                &[&STATUS_UNIDENTIFIED],
            )?,
            matches: count("SELECT COUNT(*) FROM matches", &[])?,
        })
    }
}

/// Map a UNIQUE violation on the case-number column to the typed rejection;
/// everything else passes through.
fn map_case_conflict(err: rusqlite::Error, case_number: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("case_number") {
            return Error::DuplicateCaseNumber(case_number.to_string());
        }
    }
    Error::Database(err)
}

// ── Raw row carriers ─────────────────────────────────────────────────────

struct RawPerson {
    id: i64,
    name: String,
    age: Option<u32>,
    gender: Option<String>,
    last_seen_date: Option<String>,
    last_seen_location: Option<String>,
    description: Option<String>,
    case_number: String,
    face_encoding: Option<String>,
    photo_path: Option<String>,
    status: String,
    created_date: String,
}

impl RawPerson {
    fn into_record(self) -> Result<MissingPerson> {
        let features = decode_features(self.face_encoding, "missing_persons", self.id);
        Ok(MissingPerson {
            id: self.id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            last_seen_date: self.last_seen_date,
            last_seen_location: self.last_seen_location,
            description: self.description,
            case_number: self.case_number,
            features,
            photo_path: self.photo_path,
            status: self.status,
            created_date: decode_dt(&self.created_date)?,
        })
    }
}

struct RawBody {
    id: i64,
    case_number: String,
    found_date: Option<String>,
    found_location: Option<String>,
    estimated_age: Option<u32>,
    gender: Option<String>,
    description: Option<String>,
    face_encoding: Option<String>,
    photo_path: Option<String>,
    status: String,
    created_date: String,
}

impl RawBody {
    fn into_record(self) -> Result<UnidentifiedBody> {
        let features = decode_features(self.face_encoding, "unidentified_bodies", self.id);
        Ok(UnidentifiedBody {
            id: self.id,
            case_number: self.case_number,
            found_date: self.found_date,
            found_location: self.found_location,
            estimated_age: self.estimated_age,
            gender: self.gender,
            description: self.description,
            features,
            photo_path: self.photo_path,
            status: self.status,
            created_date: decode_dt(&self.created_date)?,
        })
    }
}

struct RawMatch {
    id: i64,
    missing_person_id: i64,
    unidentified_body_id: i64,
    confidence_score: f64,
    match_date: String,
    verified: bool,
    notes: Option<String>,
    person_name: String,
    person_case: String,
    body_case: String,
    found_location: Option<String>,
}

impl RawMatch {
    fn into_detail(self) -> Result<MatchDetail> {
        Ok(MatchDetail {
            record: MatchRecord {
                id: self.id,
                missing_person_id: self.missing_person_id,
                unidentified_body_id: self.unidentified_body_id,
                confidence_score: self.confidence_score as f32,
                match_date: decode_dt(&self.match_date)?,
                verified: self.verified,
                notes: self.notes,
            },
            person_name: self.person_name,
            person_case: self.person_case,
            body_case: self.body_case,
            found_location: self.found_location,
        })
    }
}
