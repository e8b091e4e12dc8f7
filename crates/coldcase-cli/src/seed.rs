//! Sample-data seeding for demos and manual testing.
//!
//! Records carry synthetic random encodings; the sample photos never
//! existed, so the vectors are placeholders of the correct length.

use coldcase_core::{FeatureVector, FEATURE_LEN};
use coldcase_store::{Error, NewMissingPerson, NewUnidentifiedBody, Store};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (name, age, gender, last_seen_date, last_seen_location, description, case)
const SAMPLE_PERSONS: &[(&str, u32, &str, &str, &str, &str, &str)] = &[
    (
        "Sarah Johnson", 28, "Female", "2024-01-15", "Downtown Seattle, WA",
        "5'6\", brown hair, blue eyes, wearing red jacket", "MP-2024-001",
    ),
    (
        "Michael Rodriguez", 34, "Male", "2024-02-03", "Portland, OR",
        "6'0\", black hair, brown eyes, tattoo on left arm", "MP-2024-002",
    ),
    (
        "Emily Chen", 22, "Female", "2024-01-28", "University District, Seattle",
        "5'4\", black hair, brown eyes, student at UW", "MP-2024-003",
    ),
    (
        "David Thompson", 45, "Male", "2024-02-10", "Spokane, WA",
        "5'10\", gray hair, green eyes, beard", "MP-2024-004",
    ),
    (
        "Lisa Martinez", 31, "Female", "2024-01-20", "Tacoma, WA",
        "5'7\", blonde hair, hazel eyes, scar on forehead", "MP-2024-005",
    ),
];

/// (case, found_date, found_location, estimated_age, gender, description)
const SAMPLE_BODIES: &[(&str, &str, &str, u32, &str, &str)] = &[
    (
        "UB-2024-001", "2024-02-15", "Green Lake Park, Seattle", 30, "Female",
        "Caucasian female, brown hair, approximately 5'5\"",
    ),
    (
        "UB-2024-002", "2024-02-08", "Columbia River, Portland", 35, "Male",
        "Hispanic male, black hair, approximately 6'0\"",
    ),
    (
        "UB-2024-003", "2024-02-01", "Discovery Park, Seattle", 25, "Female",
        "Asian female, black hair, approximately 5'4\"",
    ),
    (
        "UB-2024-004", "2024-02-12", "Riverfront Park, Spokane", 45, "Male",
        "Caucasian male, gray hair, approximately 5'10\"",
    ),
];

fn synthetic_vector(rng: &mut StdRng) -> FeatureVector {
    FeatureVector::new((0..FEATURE_LEN).map(|_| rng.gen_range(0.0..1.0)).collect())
}

/// Populate the store with the sample records. Existing case numbers are
/// left alone; re-running is safe.
pub fn populate(store: &Store) -> Result<(), Error> {
    let mut rng = StdRng::from_entropy();
    let mut added = 0usize;

    for &(name, age, gender, last_seen_date, last_seen_location, description, case_number) in
        SAMPLE_PERSONS
    {
        let new = NewMissingPerson {
            name: name.into(),
            age: Some(age),
            gender: Some(gender.into()),
            last_seen_date: Some(last_seen_date.into()),
            last_seen_location: Some(last_seen_location.into()),
            description: Some(description.into()),
            case_number: case_number.into(),
            features: Some(synthetic_vector(&mut rng)),
            photo_path: Some(format!("sample_photos/{case_number}.jpg")),
        };
        match store.add_missing_person(&new) {
            Ok(_) => {
                added += 1;
                println!("Added: {name} ({case_number})");
            }
            Err(Error::DuplicateCaseNumber(_)) => {
                tracing::debug!(case_number, "sample person already present");
            }
            Err(err) => return Err(err),
        }
    }

    for &(case_number, found_date, found_location, estimated_age, gender, description) in
        SAMPLE_BODIES
    {
        let new = NewUnidentifiedBody {
            case_number: case_number.into(),
            found_date: Some(found_date.into()),
            found_location: Some(found_location.into()),
            estimated_age: Some(estimated_age),
            gender: Some(gender.into()),
            description: Some(description.into()),
            features: Some(synthetic_vector(&mut rng)),
            photo_path: Some(format!("sample_photos/{case_number}.jpg")),
        };
        match store.add_unidentified_body(&new) {
            Ok(_) => {
                added += 1;
                println!("Added: {case_number} - {gender}, age {estimated_age}");
            }
            Err(Error::DuplicateCaseNumber(_)) => {
                tracing::debug!(case_number, "sample body already present");
            }
            Err(err) => return Err(err),
        }
    }

    println!("Sample data populated: {added} new records.");
    Ok(())
}
