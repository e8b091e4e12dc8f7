//! Face detection and feature extraction engine.
//!
//! Detects face regions with a multi-scale contrast classifier, derives
//! raw pixel-intensity feature vectors, and scores pairs of vectors by
//! cosine similarity.

pub mod detector;
pub mod features;
pub mod types;

pub use detector::{DetectorConfig, DetectorError, FaceDetector};
pub use features::{ExtractError, FeatureExtractor, CANONICAL_SIZE, FEATURE_LEN};
pub use types::{FaceRegion, FeatureVector};
