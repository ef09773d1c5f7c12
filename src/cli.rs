//! Command-line interface for stagedb

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stagedb")]
#[command(about = "A stage-based snapshot harness for embedded SQLite datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override workspace location
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize stagedb workspace
    Init {
        /// Force initialization even if workspace exists
        #[arg(long)]
        force: bool,
    },

    /// Create a fresh lineage-root stage with the base schema
    Create {
        /// Label for the new stage (e.g. "01")
        stage: String,
    },

    /// Clone an existing stage into a new stage
    Clone {
        /// Source stage label
        source: String,

        /// Target stage label
        target: String,
    },

    /// Load CSV data into a stage
    Load {
        /// Directory containing movies.csv (and optionally ratings.csv)
        data_dir: PathBuf,

        /// Stage to load into
        #[arg(long)]
        stage: String,

        /// Load phase: "flat", "links", "ratings", or "all"
        #[arg(long, default_value = "all")]
        phase: String,

        /// Batch size for name/lookup tables (must be > 0)
        #[arg(long, default_value = "500", value_parser = validate_batch_size)]
        batch_size: usize,

        /// Batch size for the ratings fact table (must be > 0)
        #[arg(long, default_value = "50000", value_parser = validate_batch_size)]
        ratings_batch_size: usize,
    },

    /// Execute raw SQL statements against a stage
    Exec {
        /// Stage to execute against
        stage: String,

        /// Semicolon-separated SQL statements
        sql: String,

        /// Enable foreign-key constraint enforcement for the session
        #[arg(long)]
        foreign_keys: bool,
    },

    /// Run a read query against a stage and print the rows
    Query {
        /// Stage to query
        stage: String,

        /// SELECT statement
        sql: String,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// List all stages
    List {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse load phase string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Flat,
    Links,
    Ratings,
    All,
}

impl LoadPhase {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "links" => Ok(Self::Links),
            "ratings" => Ok(Self::Ratings),
            "all" => Ok(Self::All),
            _ => Err(format!(
                "Invalid load phase: {}. Use 'flat', 'links', 'ratings', or 'all'",
                s
            )),
        }
    }
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Validate that batch size is greater than 0
fn validate_batch_size(s: &str) -> Result<usize, String> {
    let batch_size: usize = s
        .parse()
        .map_err(|_| format!("Invalid batch size: '{}'. Must be a positive integer.", s))?;

    if batch_size == 0 {
        return Err("Batch size must be greater than 0".to_string());
    }

    Ok(batch_size)
}
