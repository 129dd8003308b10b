use std::path::PathBuf;

use polars::prelude::PolarsError;

use crate::schema::TableKind;

/// Failures surfaced by the pipeline.
///
/// Join misses and numeric coercion failures are not errors: they are
/// reported alongside results (`JoinReport`, `Coerced`).
#[derive(thiserror::Error, Debug)]
pub enum AnalyticsError {
    /// A source file is missing, unreadable or not a valid table.
    #[error("{table} data unavailable at {}: {reason}", path.display())]
    DataUnavailable {
        table: TableKind,
        path: PathBuf,
        reason: String,
    },

    /// A source table loaded but lacks part of the column contract.
    #[error("{table} table is missing columns: {}", missing.join(", "))]
    SchemaMismatch {
        table: TableKind,
        missing: Vec<String>,
    },

    /// A required selector (team, season, player) has no value yet.
    #[error("selection incomplete: no {0} selected")]
    SelectionIncomplete(&'static str),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Short machine-readable kind, used in empty payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsError::DataUnavailable { .. } => "data_unavailable",
            AnalyticsError::SchemaMismatch { .. } => "schema_mismatch",
            AnalyticsError::SelectionIncomplete(_) => "selection_incomplete",
            AnalyticsError::Polars(_) => "polars",
            AnalyticsError::Io(_) => "io",
            AnalyticsError::Csv(_) => "csv",
            AnalyticsError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
