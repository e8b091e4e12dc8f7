//! Intake, automated matching, and photo search.
//!
//! Orchestrates the extractor and the record store. Single-threaded,
//! request/response scoped; callers construct the store and extractor once
//! and pass them in explicitly.

pub mod error;
pub mod intake;
pub mod matcher;
pub mod search;

pub use error::EngineError;
pub use intake::{register_missing_person, register_unidentified_body, BodyDetails, PersonDetails};
pub use matcher::{run_auto_match, MatchSummary, DEFAULT_MATCH_THRESHOLD};
pub use search::{
    rank_candidates, search_by_photo, RankedCandidate, RecordKind, ScoreMode,
    DEFAULT_SEARCH_THRESHOLD,
};
