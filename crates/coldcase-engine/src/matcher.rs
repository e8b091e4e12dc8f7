//! Automated person × body matching.
//!
//! One bulk read per record kind, then a full pairwise scan. O(P·B) is
//! acceptable at demo case volumes; nearest-neighbor indexing is the obvious
//! replacement at scale.

use coldcase_store::Store;

use crate::EngineError;

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.7;

/// One qualifying pair, in discovery order.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub match_id: i64,
    pub person_name: String,
    pub person_case: String,
    pub body_case: String,
    pub found_location: Option<String>,
    pub score: f32,
}

/// Score every active missing-person against every active unidentified-body
/// record, persisting each pair at or above `threshold`.
///
/// Returned summaries are in discovery order, not sorted by score. Records
/// without a usable stored vector are skipped; a persistence failure on one
/// pair is logged and skipped without aborting the remaining pairs.
pub fn run_auto_match(store: &Store, threshold: f32) -> Result<Vec<MatchSummary>, EngineError> {
    let persons = store.missing_persons()?;
    let bodies = store.unidentified_bodies()?;

    tracing::info!(
        persons = persons.len(),
        bodies = bodies.len(),
        threshold,
        "starting automated match run"
    );

    let mut summaries = Vec::new();

    for person in &persons {
        let Some(person_vector) = &person.features else {
            continue;
        };
        for body in &bodies {
            let Some(body_vector) = &body.features else {
                continue;
            };

            let score = person_vector.similarity(body_vector);
            if score < threshold {
                continue;
            }

            let notes = format!("Automated match with {score:.2} confidence");
            match store.add_match(person.id, body.id, score, &notes) {
                Ok(match_id) => summaries.push(MatchSummary {
                    match_id,
                    person_name: person.name.clone(),
                    person_case: person.case_number.clone(),
                    body_case: body.case_number.clone(),
                    found_location: body.found_location.clone(),
                    score,
                }),
                Err(err) => {
                    tracing::warn!(
                        person_id = person.id,
                        body_id = body.id,
                        error = %err,
                        "failed to persist match; continuing with remaining pairs"
                    );
                }
            }
        }
    }

    tracing::info!(matches = summaries.len(), "automated match run complete");
    Ok(summaries)
}
