use log::{info, warn};
use serde::Serialize;

use crate::aggregate::{self, Detailed, DetailedCache, JoinReport, PlayerSummary};
use crate::catalog::SeasonFilter;
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::loader::EventStore;
use crate::metrics::heatmap::HeatmapParams;
use crate::metrics::pass_flow::PassFlowParams;
use crate::metrics::xg_evolution::XgParams;
use crate::metrics::{self, bars, heatmap, info as info_cards, kpi, lineup, pass_flow, xg_evolution};
use crate::payload::ChartData;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    Ready,
    Empty { kind: String, reason: String },
}

/// Every chart of the team page for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub status: ReportStatus,
    pub cards: ChartData,
    pub heatmap: ChartData,
    pub pass_flow: ChartData,
    pub lineup: ChartData,
    pub xg_evolution: ChartData,
    pub kpi_radar: ChartData,
    pub kpi_evolution: ChartData,
    pub advanced_metrics: ChartData,
    pub join: Option<JoinReport>,
}

impl TeamReport {
    pub fn empty(kind: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let chart = ChartData::empty(reason.clone());
        Self {
            status: ReportStatus::Empty {
                kind: kind.to_string(),
                reason,
            },
            cards: info_cards::placeholder_cards().into(),
            heatmap: chart.clone(),
            pass_flow: chart.clone(),
            lineup: chart.clone(),
            xg_evolution: chart.clone(),
            kpi_radar: chart.clone(),
            kpi_evolution: chart.clone(),
            advanced_metrics: chart,
            join: None,
        }
    }

    fn from_error(err: &AnalyticsError) -> Self {
        Self::empty(err.kind(), err.to_string())
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReportStatus::Ready
    }
}

/// Build the team page for `selection`. Never fails: a missing selection,
/// missing data or an empty working set all yield an empty report.
///
/// When `selection.match_id` is set the working set is narrowed to that
/// match.
pub fn team_report(
    store: &EventStore,
    cache: Option<&DetailedCache>,
    config: &AnalyticsConfig,
    selection: &Selection,
) -> TeamReport {
    let (team, season_label) = match selection.require_team_season() {
        Ok(choice) => choice,
        Err(err) => return TeamReport::from_error(&err),
    };
    let season = SeasonFilter::parse(season_label, &config.all_seasons_label);

    let detailed = match cache {
        Some(cache) => cache.get_or_compute(store, team, &season),
        None => aggregate::detailed_data(store, team, &season),
    };
    let detailed = match selection.match_id.as_deref() {
        Some(match_id) => detailed.and_then(|d| d.for_match(match_id)),
        None => detailed,
    };
    let detailed = match detailed {
        Ok(detailed) => detailed,
        Err(err) => {
            warn!("team report for {} / {} unavailable: {}", team, season_label, err);
            return TeamReport::from_error(&err);
        }
    };

    if detailed.is_empty() {
        let mut report = TeamReport::empty("no_rows", format!("no data for {} in {}", team, season_label));
        report.join = Some(detailed.join);
        return report;
    }

    info!(
        "team report for {} / {}: {} rows over {} matches",
        team,
        season_label,
        detailed.frame.height(),
        detailed.join.joined_matches
    );
    build_team_report(store, config, team, season_label, detailed)
}

/// Team page restricted to one match. An absent match id is reported as an
/// incomplete selection rather than widening to the whole season.
pub fn match_report(
    store: &EventStore,
    cache: Option<&DetailedCache>,
    config: &AnalyticsConfig,
    selection: &Selection,
) -> TeamReport {
    if selection.match_id.is_none() {
        return TeamReport::from_error(&AnalyticsError::SelectionIncomplete("match"));
    }
    team_report(store, cache, config, selection)
}

fn build_team_report(
    store: &EventStore,
    config: &AnalyticsConfig,
    team: &str,
    season_label: &str,
    detailed: Detailed,
) -> TeamReport {
    let frame = &detailed.frame;
    let season_ids = detailed.season_ids().ok();

    let heatmap = metrics::chart(
        "heatmap",
        heatmap::compute(
            frame,
            &HeatmapParams {
                team: Some(team.to_string()),
                season_ids: season_ids.clone(),
                grid: config.heatmap_grid,
                sigma: config.smoothing_sigma,
            },
        ),
    );
    let pass_flow = metrics::chart(
        "pass flow",
        pass_flow::compute(
            frame,
            &PassFlowParams {
                team: Some(team.to_string()),
                season_ids,
                grid: config.flow_grid,
            },
        ),
    );
    let lineup = metrics::chart(
        "lineup",
        store
            .lineups()
            .and_then(|lineups| lineup::compute(lineups, team, Some(&detailed.match_ids))),
    );
    let xg_evolution = metrics::chart(
        "xg evolution",
        xg_evolution::compute(
            frame,
            &XgParams {
                team: Some(team.to_string()),
                half_length: config.half_length_minutes,
            },
        ),
    );
    let kpi_radar = metrics::chart("kpi radar", kpi::radar(frame, Some(team)));
    let kpi_evolution = metrics::chart("kpi evolution", kpi::evolution(frame, Some(team)));
    let advanced_metrics = metrics::chart(
        "advanced metrics",
        aggregate::team_statistics(store, team, &detailed.match_ids)
            .and_then(|stats| bars::compute(&stats, &bars::advanced_metric_groups())),
    );

    TeamReport {
        status: ReportStatus::Ready,
        cards: info_cards::cards(frame, team, season_label).into(),
        heatmap,
        pass_flow,
        lineup,
        xg_evolution,
        kpi_radar,
        kpi_evolution,
        advanced_metrics,
        join: Some(detailed.join),
    }
}

/// Player page: aggregate summary plus the player's own heatmap and xG
/// evolution over the chosen seasons.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub status: ReportStatus,
    pub summary: Vec<PlayerSummary>,
    pub heatmap: ChartData,
    pub xg_evolution: ChartData,
}

impl PlayerReport {
    fn from_error(err: &AnalyticsError) -> Self {
        let chart = ChartData::empty(err.to_string());
        Self {
            status: ReportStatus::Empty {
                kind: err.kind().to_string(),
                reason: err.to_string(),
            },
            summary: Vec::new(),
            heatmap: chart.clone(),
            xg_evolution: chart,
        }
    }
}

pub fn player_report(
    store: &EventStore,
    config: &AnalyticsConfig,
    player_id: &str,
    season_ids: &[String],
) -> PlayerReport {
    match build_player_report(store, config, player_id, season_ids) {
        Ok(report) => report,
        Err(err) => {
            warn!("player report for {} unavailable: {}", player_id, err);
            PlayerReport::from_error(&err)
        }
    }
}

fn build_player_report(
    store: &EventStore,
    config: &AnalyticsConfig,
    player_id: &str,
    season_ids: &[String],
) -> Result<PlayerReport> {
    let events = aggregate::player_events(store, player_id, season_ids)?;
    if events.height() == 0 {
        return Ok(PlayerReport {
            status: ReportStatus::Empty {
                kind: "no_rows".to_string(),
                reason: format!("no events for player {}", player_id),
            },
            summary: Vec::new(),
            heatmap: ChartData::empty("no events"),
            xg_evolution: ChartData::empty("no events"),
        });
    }

    let summary = aggregate::player_aggregate(&events)?;
    let heatmap = metrics::chart(
        "player heatmap",
        heatmap::compute(
            &events,
            &HeatmapParams {
                grid: config.heatmap_grid,
                sigma: config.smoothing_sigma,
                ..HeatmapParams::default()
            },
        ),
    );
    let xg_evolution = metrics::chart(
        "player xg evolution",
        xg_evolution::compute(
            &events,
            &XgParams {
                team: None,
                half_length: config.half_length_minutes,
            },
        ),
    );

    Ok(PlayerReport {
        status: ReportStatus::Ready,
        summary,
        heatmap,
        xg_evolution,
    })
}
