use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::grid::GridSpec;
use crate::schema::TableKind;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub data_dir: PathBuf,
    pub events_file: String,
    pub team_stats_file: String,
    pub kpi_file: String,
    pub lineups_file: String,
    pub users_path: PathBuf,
    /// Only teams whose name contains this substring reach the selectors.
    pub club_filter: String,
    /// Season value meaning "every season".
    pub all_seasons_label: String,
    pub half_length_minutes: f64,
    pub heatmap_grid: GridSpec,
    pub flow_grid: GridSpec,
    pub smoothing_sigma: Option<f64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/archivos_parquet"),
            events_file: "eventos_metricas_alaves.parquet".to_string(),
            team_stats_file: "team_stats_league_all.parquet".to_string(),
            kpi_file: "eventos_datos_acumulados.parquet".to_string(),
            lineups_file: "lineups_league_all.parquet".to_string(),
            users_path: PathBuf::from("data/usuarios.csv"),
            club_filter: "Alav".to_string(),
            all_seasons_label: "Todas".to_string(),
            half_length_minutes: 45.0,
            heatmap_grid: GridSpec::heatmap(),
            flow_grid: GridSpec::flow(),
            smoothing_sigma: Some(1.0),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn path_for(&self, table: TableKind) -> PathBuf {
        match table {
            TableKind::Events => self.data_dir.join(&self.events_file),
            TableKind::TeamStats => self.data_dir.join(&self.team_stats_file),
            TableKind::Kpi => self.data_dir.join(&self.kpi_file),
            TableKind::Lineups => self.data_dir.join(&self.lineups_file),
            TableKind::Users => self.users_path.clone(),
        }
    }
}
