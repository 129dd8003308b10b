//! Football event analytics pipeline behind the BePro dashboard.
//!
//! Parquet event, team statistics, KPI and lineup tables are loaded once into
//! an immutable [`EventStore`]. A [`Selection`] drives the cascading filter
//! catalog, the aggregation engine joins the sources into a match-scoped
//! working set, and the metric computers reduce that set into chart payloads.

pub mod aggregate;
pub mod auth;
pub mod catalog;
pub mod columns;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod payload;
pub mod report;
pub mod schema;
pub mod selection;

pub use aggregate::{Detailed, DetailedCache, JoinMiss, JoinReport, PlayerSummary, detailed_data};
pub use catalog::SeasonFilter;
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use loader::EventStore;
pub use payload::ChartData;
pub use report::{PlayerReport, TeamReport, match_report, player_report, team_report};
pub use schema::TableKind;
pub use selection::{Selection, SelectorOptions, derive_options, refresh};
