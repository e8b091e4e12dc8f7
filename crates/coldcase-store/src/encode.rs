//! Encoding helpers between domain types and the plain-text column
//! representations. Timestamps are RFC 3339 strings; feature vectors are
//! compact JSON arrays.

use chrono::{DateTime, Utc};
use coldcase_core::FeatureVector;

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Timestamp(e.to_string()))
}

pub fn encode_features(features: Option<&FeatureVector>) -> Result<Option<String>> {
    features.map(serde_json::to_string).transpose().map_err(Error::Json)
}

/// Decode a stored `face_encoding` column.
///
/// A malformed encoding decodes to `None` with a warning rather than an
/// error: match and query scans skip such records and keep going.
pub fn decode_features(raw: Option<String>, table: &str, id: i64) -> Option<FeatureVector> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(table, id, error = %err, "malformed stored feature vector; skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dt_round_trip() {
        let now = Utc::now();
        let back = decode_dt(&encode_dt(now)).unwrap();
        assert_eq!(now, back);
    }

    #[test]
    fn test_features_round_trip() {
        let v = FeatureVector::new(vec![0.0, 0.5, 1.0]);
        let text = encode_features(Some(&v)).unwrap().unwrap();
        let back = decode_features(Some(text), "missing_persons", 1).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn test_features_absent() {
        assert!(encode_features(None).unwrap().is_none());
        assert!(decode_features(None, "missing_persons", 1).is_none());
    }

    #[test]
    fn test_malformed_features_decode_to_none() {
        let raw = Some("not json at all".to_string());
        assert!(decode_features(raw, "unidentified_bodies", 7).is_none());
    }
}
