use std::path::PathBuf;

/// Runtime configuration, loaded from environment variables.
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Similarity threshold for the automated match run.
    pub match_threshold: f32,
    /// Similarity threshold for photo search.
    pub search_threshold: f32,
    /// Detector window growth factor between scales.
    pub scale_factor: f32,
    /// Detector neighbor-group minimum.
    pub min_neighbors: u32,
    /// Smallest face side scanned, in pixels.
    pub min_face_size: u32,
}

impl Config {
    /// Load configuration from `COLDCASE_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("coldcase");

        let db_path = std::env::var("COLDCASE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("records.db"));

        Self {
            db_path,
            match_threshold: env_f32(
                "COLDCASE_MATCH_THRESHOLD",
                coldcase_engine::DEFAULT_MATCH_THRESHOLD,
            ),
            search_threshold: env_f32(
                "COLDCASE_SEARCH_THRESHOLD",
                coldcase_engine::DEFAULT_SEARCH_THRESHOLD,
            ),
            scale_factor: env_f32("COLDCASE_SCALE_FACTOR", 1.1),
            min_neighbors: env_u32("COLDCASE_MIN_NEIGHBORS", 4),
            min_face_size: env_u32("COLDCASE_MIN_FACE_SIZE", 24),
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
