//! Feature extraction: photo file → fixed-length intensity vector.
//!
//! The pipeline is fixed for comparability with previously stored vectors:
//! crop the dominant face, resize to the canonical 100×100, convert to
//! single-channel intensity, normalize to [0, 1], flatten. Raw pixel
//! intensities are a weak baseline feature; a learned embedding would slot
//! in at this seam without touching callers.

use crate::detector::FaceDetector;
use crate::types::{FaceRegion, FeatureVector};
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

/// Canonical face crop side length.
pub const CANONICAL_SIZE: u32 = 100;
/// Feature vector length: one element per canonical pixel.
pub const FEATURE_LEN: usize = (CANONICAL_SIZE * CANONICAL_SIZE) as usize;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file is missing or not a decodable image. Distinct from
    /// [`ExtractError::NoFaceDetected`] so callers can report it separately.
    #[error("cannot read image {path}: {source}")]
    UnreadableImage {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("no face detected in {0}")]
    NoFaceDetected(String),
}

/// Detects the dominant face in a photo and derives its feature vector.
pub struct FeatureExtractor {
    detector: FaceDetector,
}

impl FeatureExtractor {
    pub fn new(detector: FaceDetector) -> Self {
        Self { detector }
    }

    pub fn with_defaults() -> Self {
        Self { detector: FaceDetector::with_defaults() }
    }

    /// Extract the feature vector for the largest face in the image at `path`.
    ///
    /// Zero detected faces is a non-fatal outcome: the caller must not
    /// persist a record for the photo.
    pub fn extract(&self, path: &Path) -> Result<FeatureVector, ExtractError> {
        let img = image::open(path).map_err(|source| ExtractError::UnreadableImage {
            path: path.display().to_string(),
            source,
        })?;

        let gray = img.to_luma8();
        let faces = self.detector.detect(&gray);
        tracing::debug!(path = %path.display(), faces = faces.len(), "face detection");

        let region = largest_region(&faces)
            .ok_or_else(|| ExtractError::NoFaceDetected(path.display().to_string()))?;

        Ok(vectorize(&img, region))
    }
}

/// The region with the greatest pixel area; ties broken by first-encountered
/// order.
fn largest_region(faces: &[FaceRegion]) -> Option<&FaceRegion> {
    let mut best: Option<&FaceRegion> = None;
    for region in faces {
        match best {
            Some(b) if region.area() <= b.area() => {}
            _ => best = Some(region),
        }
    }
    best
}

/// Crop → resize → grayscale → normalize → flatten. Order is load-bearing.
fn vectorize(img: &DynamicImage, region: &FaceRegion) -> FeatureVector {
    let crop = img.crop_imm(region.x, region.y, region.width, region.height);
    let canonical = crop
        .resize_exact(CANONICAL_SIZE, CANONICAL_SIZE, FilterType::Triangle)
        .to_luma8();

    let values = canonical
        .as_raw()
        .iter()
        .map(|&p| p as f32 / 255.0)
        .collect();

    FeatureVector::new(values)
}
