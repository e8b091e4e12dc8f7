//! Multi-scale face detector over grayscale images.
//!
//! Implements a sliding-window pass with an integral-image contrast
//! classifier and neighbor-grouping post-processing. The classifier is a
//! deliberately weak baseline (band contrast + variance + symmetry, no
//! learned stages); the module is the seam where a real detector would go.

use crate::types::FaceRegion;
use image::GrayImage;
use thiserror::Error;

// --- Named constants (no magic numbers) ---
const BASE_WINDOW: u32 = 24;
const DEFAULT_SCALE_FACTOR: f32 = 1.1;
const DEFAULT_MIN_NEIGHBORS: u32 = 4;
/// Windows with intensity stddev below this are flat and can never be a face.
const MIN_WINDOW_STDDEV: f32 = 16.0;
/// The eye band must be at most this fraction of the forehead/cheek mean.
const EYE_CONTRAST_RATIO: f32 = 0.85;
/// Maximum left/right cheek mean difference (intensity levels).
const CHEEK_SYMMETRY_TOLERANCE: f32 = 24.0;
/// Position/size tolerance when clustering raw hits into neighbor groups.
const GROUP_EPS: f32 = 0.2;
/// Horizontal extent of the facial bands, as fractions of the window.
const BAND_COL_SPAN: (f32, f32) = (0.15, 0.85);
/// Vertical band rows as fractions of the window: forehead, eyes, cheeks.
const FOREHEAD_ROW_SPAN: (f32, f32) = (0.05, 0.20);
const EYE_ROW_SPAN: (f32, f32) = (0.20, 0.45);
const CHEEK_ROW_SPAN: (f32, f32) = (0.55, 0.85);

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("scale factor must be > 1.0, got {0}")]
    InvalidScaleFactor(f32),
    #[error("minimum face size must be at least {BASE_WINDOW} pixels, got {0}")]
    WindowTooSmall(u32),
}

/// Tunables for the detection pass, mirroring the classic cascade API.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Window growth factor between scales (must be > 1.0).
    pub scale_factor: f32,
    /// Minimum raw hits a neighbor group needs to become a detection.
    /// Zero disables grouping and returns raw hits.
    pub min_neighbors: u32,
    /// Smallest window side scanned, in pixels.
    pub min_face_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_face_size: BASE_WINDOW,
        }
    }
}

/// Sliding-window face detector.
pub struct FaceDetector {
    config: DetectorConfig,
}

impl FaceDetector {
    /// Build a detector, validating the configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        if config.scale_factor <= 1.0 {
            return Err(DetectorError::InvalidScaleFactor(config.scale_factor));
        }
        if config.min_face_size < BASE_WINDOW {
            return Err(DetectorError::WindowTooSmall(config.min_face_size));
        }
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self { config: DetectorConfig::default() }
    }

    /// Detect candidate face regions in a grayscale image.
    ///
    /// Returns grouped detections in scan order (top-left first, smallest
    /// scale first); an empty result means the image cannot be processed
    /// further, which callers must treat as non-fatal.
    pub fn detect(&self, gray: &GrayImage) -> Vec<FaceRegion> {
        let (width, height) = gray.dimensions();
        let max_window = width.min(height);
        if max_window < self.config.min_face_size {
            return Vec::new();
        }

        let integral = IntegralImage::build(gray);
        let mut raw_hits = Vec::new();

        let mut side = self.config.min_face_size as f32;
        while side.round() as u32 <= max_window {
            let window = side.round() as u32;
            let step = (window / 8).max(2);

            let mut y = 0;
            while y + window <= height {
                let mut x = 0;
                while x + window <= width {
                    if looks_like_face(&integral, x, y, window) {
                        raw_hits.push(FaceRegion { x, y, width: window, height: window });
                    }
                    x += step;
                }
                y += step;
            }

            side *= self.config.scale_factor;
        }

        tracing::debug!(
            raw_hits = raw_hits.len(),
            min_neighbors = self.config.min_neighbors,
            "detection scan complete"
        );

        if self.config.min_neighbors == 0 {
            return raw_hits;
        }
        group_hits(raw_hits, self.config.min_neighbors)
    }
}

/// Summed-area table with a squared companion, for O(1) window statistics.
struct IntegralImage {
    width: usize,
    sums: Vec<u64>,
    squared: Vec<u64>,
}

impl IntegralImage {
    fn build(gray: &GrayImage) -> Self {
        let (w, h) = gray.dimensions();
        let (w, h) = (w as usize, h as usize);
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (h + 1)];
        let mut squared = vec![0u64; stride * (h + 1)];

        for y in 0..h {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for x in 0..w {
                let p = gray.as_raw()[y * w + x] as u64;
                row_sum += p;
                row_sq += p * p;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
                squared[(y + 1) * stride + x + 1] = squared[y * stride + x + 1] + row_sq;
            }
        }

        Self { width: w, sums, squared }
    }

    /// Sum over the half-open rectangle [x0, x1) × [y0, y1).
    fn rect_sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let stride = self.width + 1;
        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        self.sums[y1 * stride + x1] + self.sums[y0 * stride + x0]
            - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0]
    }

    fn rect_sq_sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let stride = self.width + 1;
        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        self.squared[y1 * stride + x1] + self.squared[y0 * stride + x0]
            - self.squared[y0 * stride + x1]
            - self.squared[y1 * stride + x0]
    }

    fn rect_mean(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> f32 {
        let count = ((x1 - x0) as u64 * (y1 - y0) as u64).max(1);
        self.rect_sum(x0, y0, x1, y1) as f32 / count as f32
    }
}

/// Band-contrast face test for one window.
///
/// A frontal face presents a darker eye band between a brighter forehead and
/// brighter, left/right-symmetric cheeks, with enough overall variance to
/// rule out flat regions.
fn looks_like_face(integral: &IntegralImage, x: u32, y: u32, window: u32) -> bool {
    let count = (window as u64 * window as u64) as f32;
    let sum = integral.rect_sum(x, y, x + window, y + window) as f32;
    let sq_sum = integral.rect_sq_sum(x, y, x + window, y + window) as f32;
    let mean = sum / count;
    let variance = (sq_sum / count - mean * mean).max(0.0);
    if variance.sqrt() < MIN_WINDOW_STDDEV {
        return false;
    }

    let band_rows = |span: (f32, f32)| -> (u32, u32) {
        let r0 = y + (span.0 * window as f32).round() as u32;
        let r1 = y + (span.1 * window as f32).round() as u32;
        (r0, r1.max(r0 + 1))
    };
    let col0 = x + (BAND_COL_SPAN.0 * window as f32).round() as u32;
    let col1 = (x + (BAND_COL_SPAN.1 * window as f32).round() as u32).max(col0 + 1);
    let col_mid = col0 + (col1 - col0) / 2;

    let (fr0, fr1) = band_rows(FOREHEAD_ROW_SPAN);
    let (er0, er1) = band_rows(EYE_ROW_SPAN);
    let (cr0, cr1) = band_rows(CHEEK_ROW_SPAN);

    let forehead = integral.rect_mean(col0, fr0, col1, fr1);
    let eyes = integral.rect_mean(col0, er0, col1, er1);
    let left_cheek = integral.rect_mean(col0, cr0, col_mid, cr1);
    let right_cheek = integral.rect_mean(col_mid, cr0, col1, cr1);
    let cheeks = integral.rect_mean(col0, cr0, col1, cr1);

    eyes < EYE_CONTRAST_RATIO * forehead
        && eyes < EYE_CONTRAST_RATIO * cheeks
        && (left_cheek - right_cheek).abs() <= CHEEK_SYMMETRY_TOLERANCE
}

/// Cluster raw hits into neighbor groups and keep groups with at least
/// `min_neighbors` members, averaging each group into one region.
///
/// Groups are emitted in first-seen order so the "largest face, first
/// encountered wins ties" rule downstream stays deterministic.
fn group_hits(raw_hits: Vec<FaceRegion>, min_neighbors: u32) -> Vec<FaceRegion> {
    let mut groups: Vec<(FaceRegion, Vec<FaceRegion>)> = Vec::new();

    for hit in raw_hits {
        match groups.iter_mut().find(|(anchor, _)| similar(anchor, &hit)) {
            Some((_, members)) => members.push(hit),
            None => groups.push((hit.clone(), vec![hit])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() as u32 >= min_neighbors)
        .map(|(_, members)| average_region(&members))
        .collect()
}

/// Position/size similarity between two hits, scaled by window size.
fn similar(a: &FaceRegion, b: &FaceRegion) -> bool {
    let delta = GROUP_EPS * 0.5 * (a.width.min(b.width) + a.height.min(b.height)) as f32;
    let close = |p: u32, q: u32| (p as f32 - q as f32).abs() <= delta;
    close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.x + a.width, b.x + b.width)
        && close(a.y + a.height, b.y + b.height)
}

fn average_region(members: &[FaceRegion]) -> FaceRegion {
    let n = members.len() as u64;
    let avg = |f: fn(&FaceRegion) -> u32| {
        (members.iter().map(|r| f(r) as u64).sum::<u64>() / n) as u32
    };
    FaceRegion {
        x: avg(|r| r.x),
        y: avg(|r| r.y),
        width: avg(|r| r.width),
        height: avg(|r| r.height),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Paint a synthetic frontal "face": a bright square with a darker eye
    /// band, on a dark background.
    pub(crate) fn synthetic_face_image(
        width: u32,
        height: u32,
        face_x: u32,
        face_y: u32,
        face_size: u32,
    ) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = x >= face_x
                && x < face_x + face_size
                && y >= face_y
                && y < face_y + face_size;
            if !inside {
                return image::Luma([40u8]);
            }
            let eye_top = face_y + face_size / 5;
            let eye_bottom = face_y + face_size * 9 / 20;
            let eye_left = face_x + face_size * 3 / 20;
            let eye_right = face_x + face_size * 17 / 20;
            if y >= eye_top && y < eye_bottom && x >= eye_left && x < eye_right {
                image::Luma([60u8])
            } else {
                image::Luma([220u8])
            }
        })
    }

    #[test]
    fn test_uniform_image_has_no_faces() {
        let gray = GrayImage::from_pixel(128, 128, image::Luma([128u8]));
        let detector = FaceDetector::with_defaults();
        assert!(detector.detect(&gray).is_empty());
    }

    #[test]
    fn test_synthetic_face_is_detected() {
        let gray = synthetic_face_image(120, 120, 20, 20, 80);
        let detector = FaceDetector::with_defaults();
        let faces = detector.detect(&gray);
        assert!(!faces.is_empty(), "synthetic face not detected");

        // The best (largest) region must overlap the painted face.
        let largest = faces.iter().max_by_key(|r| r.area()).unwrap();
        let center_x = largest.x + largest.width / 2;
        let center_y = largest.y + largest.height / 2;
        assert!((20..100).contains(&center_x), "center x {center_x}");
        assert!((20..100).contains(&center_y), "center y {center_y}");
    }

    #[test]
    fn test_min_neighbors_is_monotone() {
        let gray = synthetic_face_image(120, 120, 20, 20, 80);
        let lenient = FaceDetector::new(DetectorConfig {
            min_neighbors: 1,
            ..DetectorConfig::default()
        })
        .unwrap();
        let strict = FaceDetector::new(DetectorConfig {
            min_neighbors: 6,
            ..DetectorConfig::default()
        })
        .unwrap();
        assert!(lenient.detect(&gray).len() >= strict.detect(&gray).len());
    }

    #[test]
    fn test_zero_min_neighbors_returns_raw_hits() {
        let gray = synthetic_face_image(120, 120, 20, 20, 80);
        let raw = FaceDetector::new(DetectorConfig {
            min_neighbors: 0,
            ..DetectorConfig::default()
        })
        .unwrap();
        let grouped = FaceDetector::with_defaults();
        assert!(raw.detect(&gray).len() >= grouped.detect(&gray).len());
    }

    #[test]
    fn test_invalid_scale_factor_rejected() {
        let err = FaceDetector::new(DetectorConfig {
            scale_factor: 1.0,
            ..DetectorConfig::default()
        });
        assert!(matches!(err, Err(DetectorError::InvalidScaleFactor(_))));
    }

    #[test]
    fn test_tiny_image_yields_nothing() {
        let gray = GrayImage::from_pixel(10, 10, image::Luma([200u8]));
        let detector = FaceDetector::with_defaults();
        assert!(detector.detect(&gray).is_empty());
    }

    #[test]
    fn test_integral_rect_sum() {
        let gray = GrayImage::from_fn(4, 4, |x, y| image::Luma([(y * 4 + x) as u8]));
        let integral = IntegralImage::build(&gray);
        // Full image: 0 + 1 + ... + 15 = 120
        assert_eq!(integral.rect_sum(0, 0, 4, 4), 120);
        // Bottom-right 2x2: 10 + 11 + 14 + 15 = 50
        assert_eq!(integral.rect_sum(2, 2, 4, 4), 50);
        // Single pixel (1, 2) = 9
        assert_eq!(integral.rect_sum(1, 2, 2, 3), 9);
    }

    #[test]
    fn test_grouping_averages_similar_hits() {
        let hits = vec![
            FaceRegion { x: 10, y: 10, width: 50, height: 50 },
            FaceRegion { x: 12, y: 12, width: 50, height: 50 },
            FaceRegion { x: 11, y: 10, width: 52, height: 52 },
            // Far away, should form its own (undersized) group.
            FaceRegion { x: 200, y: 200, width: 50, height: 50 },
        ];
        let grouped = group_hits(hits, 3);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].x, 11);
        assert_eq!(grouped[0].y, 10);
    }
}
