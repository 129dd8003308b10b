use std::path::{Path, PathBuf};

use log::{info, warn};
use polars::prelude::*;
use serde::Serialize;

use crate::columns::{has_column, text};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::schema::TableKind;

/// Read one parquet table, validate its column contract and normalize it.
///
/// Nothing is returned unless the whole file loaded: a missing or corrupt
/// file is `DataUnavailable`, a missing column is `SchemaMismatch`.
pub fn load(path: &Path, table: TableKind) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(AnalyticsError::DataUnavailable {
            table,
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    let df = LazyFrame::scan_parquet(path, ScanArgsParquet::default())
        .and_then(|lf| lf.collect())
        .map_err(|err| AnalyticsError::DataUnavailable {
            table,
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    prepare(df, table)
}

/// Validate and normalize an in-memory frame the same way `load` does.
pub fn prepare(df: DataFrame, table: TableKind) -> Result<DataFrame> {
    validate_schema(&df, table)?;

    let categorical = table.categorical_columns();
    let mut exprs: Vec<Expr> = categorical
        .iter()
        .map(|name| {
            text(name).cast(DataType::Categorical(None, CategoricalOrdering::Physical))
        })
        .collect();
    exprs.extend(
        table
            .identifier_columns()
            .iter()
            .filter(|name| !categorical.contains(name) && has_column(&df, name))
            .map(|name| text(name)),
    );

    if exprs.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(exprs).collect()?)
}

fn validate_schema(df: &DataFrame, table: TableKind) -> Result<()> {
    let missing: Vec<String> = table
        .required_columns()
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalyticsError::SchemaMismatch { table, missing })
    }
}

#[derive(Debug, Clone)]
enum LoadFailure {
    Unavailable { path: PathBuf, reason: String },
    Schema { missing: Vec<String> },
}

impl LoadFailure {
    fn from_error(path: &Path, err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::SchemaMismatch { missing, .. } => LoadFailure::Schema { missing },
            AnalyticsError::DataUnavailable { path, reason, .. } => {
                LoadFailure::Unavailable { path, reason }
            }
            other => LoadFailure::Unavailable {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    fn to_error(&self, table: TableKind) -> AnalyticsError {
        match self {
            LoadFailure::Unavailable { path, reason } => AnalyticsError::DataUnavailable {
                table,
                path: path.clone(),
                reason: reason.clone(),
            },
            LoadFailure::Schema { missing } => AnalyticsError::SchemaMismatch {
                table,
                missing: missing.clone(),
            },
        }
    }
}

type Slot = std::result::Result<DataFrame, LoadFailure>;

/// Immutable snapshot of every source table, loaded once per process and
/// shared read-only between requests.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Slot,
    team_stats: Slot,
    kpi: Slot,
    lineups: Slot,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub table: TableKind,
    pub loaded: bool,
    pub rows: usize,
    pub columns: Vec<String>,
    pub error: Option<String>,
}

impl EventStore {
    /// Load all tables named by the config. A table that fails to load is
    /// kept as a failure slot so the others stay usable.
    pub fn open(config: &AnalyticsConfig) -> Self {
        let slot = |table: TableKind| -> Slot {
            let path = config.path_for(table);
            match load(&path, table) {
                Ok(df) => {
                    info!("loaded {} from {} ({} rows)", table, path.display(), df.height());
                    Ok(df)
                }
                Err(err) => {
                    warn!("{}", err);
                    Err(LoadFailure::from_error(&path, err))
                }
            }
        };

        Self {
            events: slot(TableKind::Events),
            team_stats: slot(TableKind::TeamStats),
            kpi: slot(TableKind::Kpi),
            lineups: slot(TableKind::Lineups),
        }
    }

    /// Build a store from frames already in memory. `None` marks a table as
    /// unavailable.
    pub fn from_frames(
        events: Option<DataFrame>,
        team_stats: Option<DataFrame>,
        kpi: Option<DataFrame>,
        lineups: Option<DataFrame>,
    ) -> Result<Self> {
        let slot = |df: Option<DataFrame>, table: TableKind| -> Result<Slot> {
            match df {
                Some(df) => Ok(Ok(prepare(df, table)?)),
                None => Ok(Err(LoadFailure::Unavailable {
                    path: PathBuf::from("<memory>"),
                    reason: "table not provided".to_string(),
                })),
            }
        };

        Ok(Self {
            events: slot(events, TableKind::Events)?,
            team_stats: slot(team_stats, TableKind::TeamStats)?,
            kpi: slot(kpi, TableKind::Kpi)?,
            lineups: slot(lineups, TableKind::Lineups)?,
        })
    }

    pub fn table(&self, table: TableKind) -> Result<&DataFrame> {
        let slot = match table {
            TableKind::Events => &self.events,
            TableKind::TeamStats => &self.team_stats,
            TableKind::Kpi => &self.kpi,
            TableKind::Lineups => &self.lineups,
            TableKind::Users => {
                return Err(AnalyticsError::DataUnavailable {
                    table,
                    path: PathBuf::new(),
                    reason: "users are not part of the event store".to_string(),
                });
            }
        };
        slot.as_ref().map_err(|failure| failure.to_error(table))
    }

    pub fn events(&self) -> Result<&DataFrame> {
        self.table(TableKind::Events)
    }

    pub fn team_stats(&self) -> Result<&DataFrame> {
        self.table(TableKind::TeamStats)
    }

    pub fn kpi(&self) -> Result<&DataFrame> {
        self.table(TableKind::Kpi)
    }

    pub fn lineups(&self) -> Result<&DataFrame> {
        self.table(TableKind::Lineups)
    }

    /// Shape and columns of each table, for diagnostics.
    pub fn describe(&self) -> Vec<TableSummary> {
        TableKind::PARQUET
            .iter()
            .map(|&table| match self.table(table) {
                Ok(df) => TableSummary {
                    table,
                    loaded: true,
                    rows: df.height(),
                    columns: df
                        .get_column_names()
                        .iter()
                        .map(|name| name.to_string())
                        .collect(),
                    error: None,
                },
                Err(err) => TableSummary {
                    table,
                    loaded: false,
                    rows: 0,
                    columns: Vec::new(),
                    error: Some(err.to_string()),
                },
            })
            .collect()
    }
}
