//! Named-field record types for the three relations.
//!
//! Every column has a named field; callers never index into raw rows.

use chrono::{DateTime, Utc};
use coldcase_core::FeatureVector;

/// Active status for a missing-person record.
pub const STATUS_MISSING: &str = "MISSING";
/// Active status for an unidentified-body record.
pub const STATUS_UNIDENTIFIED: &str = "UNIDENTIFIED";

/// Input for a new missing-person record. Created on intake; mutated only by
/// status changes; never deleted.
#[derive(Debug, Clone)]
pub struct NewMissingPerson {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub last_seen_date: Option<String>,
    pub last_seen_location: Option<String>,
    pub description: Option<String>,
    pub case_number: String,
    pub features: Option<FeatureVector>,
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MissingPerson {
    pub id: i64,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub last_seen_date: Option<String>,
    pub last_seen_location: Option<String>,
    pub description: Option<String>,
    pub case_number: String,
    /// `None` when never stored or when the stored encoding is malformed.
    pub features: Option<FeatureVector>,
    pub photo_path: Option<String>,
    pub status: String,
    pub created_date: DateTime<Utc>,
}

/// Input for a new unidentified-body record.
#[derive(Debug, Clone)]
pub struct NewUnidentifiedBody {
    pub case_number: String,
    pub found_date: Option<String>,
    pub found_location: Option<String>,
    pub estimated_age: Option<u32>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub features: Option<FeatureVector>,
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UnidentifiedBody {
    pub id: i64,
    pub case_number: String,
    pub found_date: Option<String>,
    pub found_location: Option<String>,
    pub estimated_age: Option<u32>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub features: Option<FeatureVector>,
    pub photo_path: Option<String>,
    pub status: String,
    pub created_date: DateTime<Utc>,
}

/// A persisted association between one missing person and one unidentified
/// body, with the similarity score that produced it.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: i64,
    pub missing_person_id: i64,
    pub unidentified_body_id: i64,
    pub confidence_score: f32,
    pub match_date: DateTime<Utc>,
    pub verified: bool,
    pub notes: Option<String>,
}

/// A match joined with the parent records' display fields.
#[derive(Debug, Clone)]
pub struct MatchDetail {
    pub record: MatchRecord,
    pub person_name: String,
    pub person_case: String,
    pub body_case: String,
    pub found_location: Option<String>,
}

/// Record counts for the stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub missing_persons: u64,
    pub unidentified_bodies: u64,
    pub matches: u64,
}
