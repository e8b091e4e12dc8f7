use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coldcase_core::{DetectorConfig, FaceDetector, FeatureExtractor};
use coldcase_engine::{
    register_missing_person, register_unidentified_body, run_auto_match, search_by_photo,
    BodyDetails, PersonDetails, ScoreMode,
};
use coldcase_store::Store;

mod config;
mod seed;

use config::Config;

#[derive(Parser)]
#[command(
    name = "coldcase",
    about = "Correlate missing-person and unidentified-remains records by facial similarity"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a missing person from a photo
    AddPerson {
        #[arg(long)]
        name: String,
        #[arg(long)]
        case_number: String,
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        last_seen_date: Option<String>,
        #[arg(long)]
        last_seen_location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Register an unidentified body from a photo
    AddBody {
        #[arg(long)]
        case_number: String,
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        found_date: Option<String>,
        #[arg(long)]
        found_location: Option<String>,
        #[arg(long)]
        estimated_age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Score all person/body pairs and persist matches above the threshold
    AutoMatch {
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Search stored records with a query photo
    Search {
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
        /// Use placeholder demo scores instead of measured similarity.
        /// The photo is still decoded and must contain a face; only the
        /// scoring is faked.
        #[arg(long)]
        demo: bool,
        /// Pin the demo-score draw (implies --demo)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List persisted matches above a threshold
    Matches {
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Show record counts
    Stats,
    /// Populate sample records with synthetic encodings
    Seed,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::open(&config.db_path)?;
    let detector = FaceDetector::new(DetectorConfig {
        scale_factor: config.scale_factor,
        min_neighbors: config.min_neighbors,
        min_face_size: config.min_face_size,
    })?;
    let extractor = FeatureExtractor::new(detector);

    match cli.command {
        Commands::AddPerson {
            name,
            case_number,
            photo,
            age,
            gender,
            last_seen_date,
            last_seen_location,
            description,
        } => {
            let id = register_missing_person(
                &store,
                &extractor,
                &photo,
                PersonDetails {
                    name,
                    age,
                    gender,
                    last_seen_date,
                    last_seen_location,
                    description,
                    case_number,
                },
            )?;
            println!("Missing person recorded with id {id}");
        }
        Commands::AddBody {
            case_number,
            photo,
            found_date,
            found_location,
            estimated_age,
            gender,
            description,
        } => {
            let id = register_unidentified_body(
                &store,
                &extractor,
                &photo,
                BodyDetails {
                    case_number,
                    found_date,
                    found_location,
                    estimated_age,
                    gender,
                    description,
                },
            )?;
            println!("Unidentified body recorded with id {id}");
        }
        Commands::AutoMatch { threshold } => {
            let threshold = threshold.unwrap_or(config.match_threshold);
            let matches = run_auto_match(&store, threshold)?;
            if matches.is_empty() {
                println!("No matches found above threshold {threshold}");
            } else {
                println!("Found {} potential matches:", matches.len());
                for (i, m) in matches.iter().enumerate() {
                    println!(
                        "{}. {} ({}) <-> {}{}, confidence {:.1}%",
                        i + 1,
                        m.person_name,
                        m.person_case,
                        m.body_case,
                        m.found_location
                            .as_deref()
                            .map(|l| format!(", found at {l}"))
                            .unwrap_or_default(),
                        m.score * 100.0
                    );
                }
            }
        }
        Commands::Search {
            photo,
            threshold,
            demo,
            seed,
        } => {
            let threshold = threshold.unwrap_or(config.search_threshold);
            let mode = if demo || seed.is_some() {
                ScoreMode::Demo { seed }
            } else {
                ScoreMode::Measured
            };
            let results = search_by_photo(&store, &extractor, &photo, threshold, &mode)?;
            if results.is_empty() {
                println!("No matches found");
            } else {
                println!("Found {} potential matches:", results.len());
                for (i, r) in results.iter().enumerate() {
                    println!(
                        "{}. [{}] {}{}, confidence {:.1}%",
                        i + 1,
                        r.kind,
                        r.name
                            .as_deref()
                            .map(|n| format!("{n}, case "))
                            .unwrap_or_else(|| "case ".to_string()),
                        r.case_number,
                        r.score * 100.0
                    );
                }
            }
        }
        Commands::Matches { threshold } => {
            let threshold = threshold.unwrap_or(0.0);
            let matches = store.matches_above(threshold)?;
            if matches.is_empty() {
                println!("No persisted matches at or above {threshold}");
            } else {
                for m in &matches {
                    println!(
                        "#{} {} ({}) <-> {}: {:.1}%{}",
                        m.record.id,
                        m.person_name,
                        m.person_case,
                        m.body_case,
                        m.record.confidence_score * 100.0,
                        if m.record.verified { " [verified]" } else { "" }
                    );
                }
            }
        }
        Commands::Stats => {
            let stats = store.stats()?;
            println!("Missing persons:     {}", stats.missing_persons);
            println!("Unidentified bodies: {}", stats.unidentified_bodies);
            println!("Persisted matches:   {}", stats.matches);
        }
        Commands::Seed => {
            seed::populate(&store)?;
        }
    }

    Ok(())
}
