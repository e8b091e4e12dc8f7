use serde::{Deserialize, Serialize};

/// Bounding box for a detected face, in pixel coordinates of the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    /// Pixel area of the region. Used to select the dominant face when an
    /// image contains more than one.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Fixed-length face feature vector (10 000-dimensional flattened intensities).
///
/// Stored as a JSON array in the `face_encoding` column; immutable once
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Compute cosine similarity between two feature vectors.
    ///
    /// Returns a value in [-1, 1]; with intensity vectors (all elements in
    /// [0, 1]) the result lands in [0, 1]. Higher = more similar. Returns 0.0
    /// when either vector has zero norm.
    pub fn similarity(&self, other: &FeatureVector) -> f32 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "feature vectors must have equal length"
        );
        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;

        for (a, b) in self.values.iter().zip(other.values.iter()) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom > 0.0 { dot / denom } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_identical() {
        let a = FeatureVector::new(vec![1.0, 0.0, 0.0]);
        let b = FeatureVector::new(vec![1.0, 0.0, 0.0]);
        assert!((a.similarity(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_self_nonzero() {
        let v = FeatureVector::new(vec![0.2, 0.7, 0.1, 0.4]);
        assert!((v.similarity(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_symmetric() {
        let a = FeatureVector::new(vec![0.3, 0.9, 0.2]);
        let b = FeatureVector::new(vec![0.8, 0.1, 0.5]);
        assert_eq!(a.similarity(&b), b.similarity(&a));
    }

    #[test]
    fn test_similarity_orthogonal() {
        let a = FeatureVector::new(vec![1.0, 0.0]);
        let b = FeatureVector::new(vec![0.0, 1.0]);
        assert!(a.similarity(&b).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_zero_vector() {
        let a = FeatureVector::new(vec![0.0, 0.0]);
        let b = FeatureVector::new(vec![1.0, 0.0]);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_similarity_length_mismatch_asserts() {
        let a = FeatureVector::new(vec![1.0, 0.0, 0.0]);
        let b = FeatureVector::new(vec![1.0, 0.0]);
        a.similarity(&b);
    }

    #[test]
    fn test_json_round_trip() {
        let v = FeatureVector::new(vec![0.0, 0.25, 0.5, 1.0]);
        let text = serde_json::to_string(&v).unwrap();
        let back: FeatureVector = serde_json::from_str(&text).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn test_region_area_and_ordering() {
        let small = FaceRegion { x: 0, y: 0, width: 10, height: 10 };
        let large = FaceRegion { x: 5, y: 5, width: 20, height: 15 };
        assert_eq!(small.area(), 100);
        assert_eq!(large.area(), 300);
        assert!(large.area() > small.area());
    }
}
