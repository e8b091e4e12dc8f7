//! Integration tests for [`Store`] against an in-memory database.

use coldcase_core::FeatureVector;

use crate::{Error, NewMissingPerson, NewUnidentifiedBody, Store};

fn store() -> Store {
    Store::open_in_memory().expect("in-memory store")
}

fn person(case_number: &str, features: Option<FeatureVector>) -> NewMissingPerson {
    NewMissingPerson {
        name: "Sarah Johnson".into(),
        age: Some(28),
        gender: Some("Female".into()),
        last_seen_date: Some("2024-01-15".into()),
        last_seen_location: Some("Downtown Seattle, WA".into()),
        description: Some("brown hair, blue eyes".into()),
        case_number: case_number.into(),
        features,
        photo_path: Some(format!("photos/{case_number}.jpg")),
    }
}

fn body(case_number: &str, features: Option<FeatureVector>) -> NewUnidentifiedBody {
    NewUnidentifiedBody {
        case_number: case_number.into(),
        found_date: Some("2024-02-20".into()),
        found_location: Some("Green Lake, Seattle".into()),
        estimated_age: Some(30),
        gender: Some("Female".into()),
        description: None,
        features,
        photo_path: None,
    }
}

#[test]
fn add_and_read_person_round_trip() {
    let s = store();
    let vector = FeatureVector::new(vec![0.1, 0.9, 0.4, 0.0]);
    let id = s.add_missing_person(&person("MP-001", Some(vector.clone()))).unwrap();
    assert!(id > 0);

    let all = s.missing_persons().unwrap();
    assert_eq!(all.len(), 1);
    let rec = &all[0];
    assert_eq!(rec.id, id);
    assert_eq!(rec.name, "Sarah Johnson");
    assert_eq!(rec.case_number, "MP-001");
    assert_eq!(rec.status, "MISSING");
    // Feature vector must survive the write/read round trip exactly.
    assert_eq!(rec.features.as_ref(), Some(&vector));
}

#[test]
fn add_and_read_body_round_trip() {
    let s = store();
    let vector = FeatureVector::new(vec![0.3; 16]);
    let id = s.add_unidentified_body(&body("UB-001", Some(vector.clone()))).unwrap();

    let all = s.unidentified_bodies().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].status, "UNIDENTIFIED");
    assert_eq!(all[0].features.as_ref(), Some(&vector));
    assert_eq!(all[0].found_location.as_deref(), Some("Green Lake, Seattle"));
}

#[test]
fn duplicate_case_number_rejected_and_store_unchanged() {
    let s = store();
    s.add_missing_person(&person("MP-001", None)).unwrap();

    let err = s.add_missing_person(&person("MP-001", None)).unwrap_err();
    assert!(matches!(err, Error::DuplicateCaseNumber(ref c) if c == "MP-001"));

    assert_eq!(s.missing_persons().unwrap().len(), 1);
}

#[test]
fn case_numbers_unique_per_record_kind_only() {
    // The same case number may appear once per relation.
    let s = store();
    s.add_missing_person(&person("CASE-7", None)).unwrap();
    s.add_unidentified_body(&body("CASE-7", None)).unwrap();

    let err = s.add_unidentified_body(&body("CASE-7", None)).unwrap_err();
    assert!(matches!(err, Error::DuplicateCaseNumber(_)));
}

#[test]
fn inactive_records_filtered_out() {
    let s = store();
    s.add_missing_person(&person("MP-001", None)).unwrap();
    s.add_missing_person(&person("MP-002", None)).unwrap();

    s.conn
        .execute("UPDATE missing_persons SET status = 'FOUND' WHERE case_number = 'MP-001'", [])
        .unwrap();

    let active = s.missing_persons().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].case_number, "MP-002");
}

#[test]
fn malformed_encoding_reads_as_none() {
    let s = store();
    s.add_missing_person(&person("MP-001", Some(FeatureVector::new(vec![0.5])))).unwrap();

    s.conn
        .execute("UPDATE missing_persons SET face_encoding = '{broken'", [])
        .unwrap();

    // Not an error: the record comes back with no vector.
    let all = s.missing_persons().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].features.is_none());
}

#[test]
fn match_insert_and_threshold_join_read() {
    let s = store();
    let p = s.add_missing_person(&person("MP-001", None)).unwrap();
    let b1 = s.add_unidentified_body(&body("UB-001", None)).unwrap();
    let b2 = s.add_unidentified_body(&body("UB-002", None)).unwrap();

    s.add_match(p, b1, 0.72, "Automated match with 0.72 confidence").unwrap();
    s.add_match(p, b2, 0.91, "Automated match with 0.91 confidence").unwrap();

    let above = s.matches_above(0.8).unwrap();
    assert_eq!(above.len(), 1);
    assert_eq!(above[0].body_case, "UB-002");

    // Ordered best-first, joined display fields populated, unverified default.
    let all = s.matches_above(0.0).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].record.confidence_score >= all[1].record.confidence_score);
    assert_eq!(all[0].person_name, "Sarah Johnson");
    assert_eq!(all[0].person_case, "MP-001");
    assert!(!all[0].record.verified);
    assert!((all[0].record.confidence_score - 0.91).abs() < 1e-6);
}

#[test]
fn match_requires_existing_parents() {
    let s = store();
    let err = s.add_match(41, 42, 0.9, "dangling").unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert_eq!(s.stats().unwrap().matches, 0);
}

#[test]
fn stats_counts_active_records() {
    let s = store();
    s.add_missing_person(&person("MP-001", None)).unwrap();
    s.add_missing_person(&person("MP-002", None)).unwrap();
    let p = s.add_missing_person(&person("MP-003", None)).unwrap();
    let b = s.add_unidentified_body(&body("UB-001", None)).unwrap();
    s.add_match(p, b, 0.8, "").unwrap();

    let stats = s.stats().unwrap();
    assert_eq!(stats.missing_persons, 3);
    assert_eq!(stats.unidentified_bodies, 1);
    assert_eq!(stats.matches, 1);
}

#[test]
fn empty_store_reads_empty() {
    let s = store();
    assert!(s.missing_persons().unwrap().is_empty());
    assert!(s.unidentified_bodies().unwrap().is_empty());
    assert!(s.matches_above(0.0).unwrap().is_empty());
}
