//! Photo search: rank stored records of both kinds against a query photo.
//!
//! Scoring comes in two explicit modes. `Measured` compares the query's
//! extracted vector against each stored vector. `Demo` reproduces the
//! placeholder behavior of the original demo dataset (independently drawn
//! uniform scores that ignore the query entirely) and is seedable so tests
//! can assert that the non-determinism is intentional, never accidental.

use std::path::Path;

use coldcase_core::{FeatureExtractor, FeatureVector};
use coldcase_store::Store;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::EngineError;

pub const DEFAULT_SEARCH_THRESHOLD: f32 = 0.6;
/// Result list cap.
const MAX_RESULTS: usize = 3;
/// Uniform score range drawn in demo mode.
const DEMO_SCORE_LOW: f32 = 0.5;
const DEMO_SCORE_HIGH: f32 = 0.9;

/// Which relation a ranked candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    MissingPerson,
    UnidentifiedBody,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::MissingPerson => write!(f, "missing person"),
            RecordKind::UnidentifiedBody => write!(f, "unidentified body"),
        }
    }
}

/// One search result, annotated with its record kind.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub kind: RecordKind,
    /// Person name; absent for unidentified-body candidates.
    pub name: Option<String>,
    pub case_number: String,
    pub found_location: Option<String>,
    pub score: f32,
    pub photo_path: Option<String>,
}

/// Scoring strategy for the search path.
#[derive(Debug, Clone)]
pub enum ScoreMode {
    /// Genuine cosine scoring against each stored vector.
    Measured,
    /// Placeholder scores, independent of the query. `seed` pins the draw.
    Demo { seed: Option<u64> },
}

/// Search both record kinds with a query photo.
///
/// Extraction errors propagate: an unreadable file and a face-less photo are
/// distinct failures, and neither touches the store.
pub fn search_by_photo(
    store: &Store,
    extractor: &FeatureExtractor,
    photo: &Path,
    threshold: f32,
    mode: &ScoreMode,
) -> Result<Vec<RankedCandidate>, EngineError> {
    let query = extractor.extract(photo)?;
    rank_candidates(store, &query, threshold, mode)
}

/// Rank all active records of both kinds against `query`, returning the top
/// three at or above `threshold`, best score first.
pub fn rank_candidates(
    store: &Store,
    query: &FeatureVector,
    threshold: f32,
    mode: &ScoreMode,
) -> Result<Vec<RankedCandidate>, EngineError> {
    let mut demo_rng = match mode {
        ScoreMode::Measured => None,
        ScoreMode::Demo { seed } => Some(match seed {
            Some(s) => StdRng::seed_from_u64(*s),
            None => StdRng::from_entropy(),
        }),
    };
    let mut score_of = |stored: &FeatureVector| -> f32 {
        match demo_rng.as_mut() {
            Some(rng) => rng.gen_range(DEMO_SCORE_LOW..DEMO_SCORE_HIGH),
            None => query.similarity(stored),
        }
    };

    let mut candidates = Vec::new();

    for person in store.missing_persons()? {
        let Some(stored) = &person.features else {
            continue;
        };
        let score = score_of(stored);
        if score >= threshold {
            candidates.push(RankedCandidate {
                kind: RecordKind::MissingPerson,
                name: Some(person.name),
                case_number: person.case_number,
                found_location: None,
                score,
                photo_path: person.photo_path,
            });
        }
    }

    for body in store.unidentified_bodies()? {
        let Some(stored) = &body.features else {
            continue;
        };
        let score = score_of(stored);
        if score >= threshold {
            candidates.push(RankedCandidate {
                kind: RecordKind::UnidentifiedBody,
                name: None,
                case_number: body.case_number,
                found_location: body.found_location,
                score,
                photo_path: body.photo_path,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(MAX_RESULTS);

    tracing::debug!(results = candidates.len(), threshold, "photo search complete");
    Ok(candidates)
}
