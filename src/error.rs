//! Error types for stagedb operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StagedbError>;

#[derive(Error, Debug)]
pub enum StagedbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Stage already exists: {label}")]
    StageExists { label: String },

    #[error("Stage not found: {label}")]
    StageNotFound { label: String },

    #[error("Source stage not found: {label}")]
    SourceStageNotFound { label: String },

    #[error("Execution error in `{statement}`: {source}")]
    Execution {
        statement: String,
        source: rusqlite::Error,
    },

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl StagedbError {
    pub fn workspace(msg: impl Into<String>) -> Self {
        Self::Workspace(msg.into())
    }

    pub fn stage_exists(label: impl Into<String>) -> Self {
        Self::StageExists {
            label: label.into(),
        }
    }

    pub fn stage_not_found(label: impl Into<String>) -> Self {
        Self::StageNotFound {
            label: label.into(),
        }
    }

    pub fn source_stage_not_found(label: impl Into<String>) -> Self {
        Self::SourceStageNotFound {
            label: label.into(),
        }
    }

    pub fn execution(statement: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Execution {
            statement: statement.into(),
            source,
        }
    }

    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
