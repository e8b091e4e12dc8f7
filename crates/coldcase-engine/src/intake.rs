//! Record intake: photo → feature vector → stored record.
//!
//! Extraction failure of either kind (unreadable file, no face) aborts the
//! intake before anything touches the store, so no record is written.

use std::path::Path;

use coldcase_core::FeatureExtractor;
use coldcase_store::{NewMissingPerson, NewUnidentifiedBody, Store};

use crate::EngineError;

/// Case details accompanying a missing-person photo.
#[derive(Debug, Clone)]
pub struct PersonDetails {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub last_seen_date: Option<String>,
    pub last_seen_location: Option<String>,
    pub description: Option<String>,
    pub case_number: String,
}

/// Case details accompanying an unidentified-body photo.
#[derive(Debug, Clone)]
pub struct BodyDetails {
    pub case_number: String,
    pub found_date: Option<String>,
    pub found_location: Option<String>,
    pub estimated_age: Option<u32>,
    pub gender: Option<String>,
    pub description: Option<String>,
}

/// Extract features from `photo` and persist a missing-person record.
pub fn register_missing_person(
    store: &Store,
    extractor: &FeatureExtractor,
    photo: &Path,
    details: PersonDetails,
) -> Result<i64, EngineError> {
    let features = extractor.extract(photo)?;

    let id = store.add_missing_person(&NewMissingPerson {
        name: details.name,
        age: details.age,
        gender: details.gender,
        last_seen_date: details.last_seen_date,
        last_seen_location: details.last_seen_location,
        description: details.description,
        case_number: details.case_number,
        features: Some(features),
        photo_path: Some(photo.display().to_string()),
    })?;

    Ok(id)
}

/// Extract features from `photo` and persist an unidentified-body record.
pub fn register_unidentified_body(
    store: &Store,
    extractor: &FeatureExtractor,
    photo: &Path,
    details: BodyDetails,
) -> Result<i64, EngineError> {
    let features = extractor.extract(photo)?;

    let id = store.add_unidentified_body(&NewUnidentifiedBody {
        case_number: details.case_number,
        found_date: details.found_date,
        found_location: details.found_location,
        estimated_age: details.estimated_age,
        gender: details.gender,
        description: details.description,
        features: Some(features),
        photo_path: Some(photo.display().to_string()),
    })?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldcase_core::ExtractError;
    use image::GrayImage;

    fn details(case_number: &str) -> PersonDetails {
        PersonDetails {
            name: "Test Person".into(),
            age: Some(30),
            gender: None,
            last_seen_date: None,
            last_seen_location: None,
            description: None,
            case_number: case_number.into(),
        }
    }

    #[test]
    fn no_face_means_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        GrayImage::from_pixel(120, 120, image::Luma([128u8]))
            .save(&path)
            .unwrap();

        let store = Store::open_in_memory().unwrap();
        let extractor = FeatureExtractor::with_defaults();

        let err = register_missing_person(&store, &extractor, &path, details("MP-001"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Extract(ExtractError::NoFaceDetected(_))));
        assert_eq!(store.stats().unwrap().missing_persons, 0);
    }

    #[test]
    fn unreadable_photo_means_no_record() {
        let store = Store::open_in_memory().unwrap();
        let extractor = FeatureExtractor::with_defaults();

        let err = register_unidentified_body(
            &store,
            &extractor,
            Path::new("/nonexistent/body.png"),
            BodyDetails {
                case_number: "UB-001".into(),
                found_date: None,
                found_location: None,
                estimated_age: None,
                gender: None,
                description: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Extract(ExtractError::UnreadableImage { .. })));
        assert_eq!(store.stats().unwrap().unidentified_bodies, 0);
    }
}
