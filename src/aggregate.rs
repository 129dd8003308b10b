use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use log::{debug, warn};
use polars::prelude::*;
use serde::Serialize;

use crate::catalog::{self, SeasonFilter};
use crate::columns::{distinct_strings, has_column, strings, text};
use crate::error::{AnalyticsError, Result};
use crate::loader::EventStore;
use crate::schema::{
    DEMARCACION, EQUIPO, MATCH_ID, PLAYER_ID, PLAYER_NAME, SEASON_ID, TEMPORADA, TableKind,
};

/// A match that the selection resolved to but that did not survive the
/// inner joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinMiss {
    pub match_id: String,
    /// Sources with no row for this match. Empty when every source has the
    /// match but the season ids or team names disagree.
    pub missing_in: Vec<TableKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub requested_matches: usize,
    pub joined_matches: usize,
    pub misses: Vec<JoinMiss>,
}

impl JoinReport {
    pub fn is_complete(&self) -> bool {
        self.misses.is_empty()
    }
}

/// Match-scoped working set for one (team, season) selection.
#[derive(Debug, Clone)]
pub struct Detailed {
    pub frame: DataFrame,
    pub match_ids: BTreeSet<String>,
    pub join: JoinReport,
}

impl Detailed {
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn season_ids(&self) -> Result<Vec<String>> {
        Ok(distinct_strings(&self.frame, SEASON_ID)?.into_iter().collect())
    }

    /// Narrow the working set to a single match.
    pub fn for_match(&self, match_id: &str) -> Result<Detailed> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(text(MATCH_ID).eq(lit(match_id)))
            .collect()?;
        let match_ids: BTreeSet<String> = self
            .match_ids
            .iter()
            .filter(|id| id.as_str() == match_id)
            .cloned()
            .collect();
        let misses: Vec<JoinMiss> = self
            .join
            .misses
            .iter()
            .filter(|miss| miss.match_id == match_id)
            .cloned()
            .collect();
        let join = JoinReport {
            requested_matches: match_ids.len(),
            joined_matches: usize::from(!match_ids.is_empty() && misses.is_empty()),
            misses,
        };
        Ok(Detailed {
            frame,
            match_ids,
            join,
        })
    }
}

const STATS_KEYS: [&str; 2] = [MATCH_ID, SEASON_ID];
const KPI_KEYS: [&str; 3] = [MATCH_ID, SEASON_ID, EQUIPO];

/// Events joined with team statistics and KPIs for the matches of a team.
///
/// Both joins are inner joins: a match missing from any source is absent
/// from the result and listed in the `JoinReport`.
pub fn detailed_data(store: &EventStore, team: &str, season: &SeasonFilter) -> Result<Detailed> {
    let events = store.events()?;
    let stats = store.team_stats()?;
    let kpi = store.kpi()?;

    let match_ids = catalog::match_ids_for(events, team, season)?;
    let ids = Series::new("match_ids", match_ids.iter().cloned().collect::<Vec<String>>());

    let mut seen = column_names(events);
    let stats_side = right_side(stats, &seen, &STATS_KEYS)?;
    seen.extend(column_names(&stats_side));
    let kpi_side = right_side(kpi, &seen, &KPI_KEYS)?;

    let frame = plain_keys(events.clone().lazy(), &[SEASON_ID, EQUIPO, TEMPORADA])
        .filter(col(MATCH_ID).is_in(lit(ids)))
        .join(
            plain_keys(stats_side.lazy(), &STATS_KEYS),
            [col(MATCH_ID), col(SEASON_ID)],
            [col(MATCH_ID), col(SEASON_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            plain_keys(kpi_side.lazy(), &KPI_KEYS),
            [col(MATCH_ID), col(SEASON_ID), col(EQUIPO)],
            [col(MATCH_ID), col(SEASON_ID), col(EQUIPO)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    let join = join_report(&frame, &match_ids, stats, kpi, team)?;
    if !join.is_complete() {
        warn!(
            "team={} season={:?}: {} of {} matches dropped by inner join: {:?}",
            team,
            season,
            join.misses.len(),
            join.requested_matches,
            join.misses
        );
    }

    Ok(Detailed {
        frame,
        match_ids,
        join,
    })
}

/// Team statistics rows for the given matches, restricted to `team` when
/// the statistics table carries a team column.
pub fn team_statistics(store: &EventStore, team: &str, match_ids: &BTreeSet<String>) -> Result<DataFrame> {
    let stats = store.team_stats()?;
    let ids = Series::new("match_ids", match_ids.iter().cloned().collect::<Vec<String>>());
    let mut lf = stats.clone().lazy().filter(text(MATCH_ID).is_in(lit(ids)));
    if has_column(stats, EQUIPO) {
        lf = lf.filter(text(EQUIPO).eq(lit(team)));
    }
    Ok(lf.collect()?)
}

/// Events of one player over the given season ids, compared as strings.
pub fn player_events(store: &EventStore, player_id: &str, season_ids: &[String]) -> Result<DataFrame> {
    if player_id.trim().is_empty() {
        return Err(AnalyticsError::SelectionIncomplete("player"));
    }
    if season_ids.is_empty() {
        return Err(AnalyticsError::SelectionIncomplete("season"));
    }

    let events = store.events()?;
    let seasons = Series::new("season_ids", season_ids.to_vec());
    Ok(events
        .clone()
        .lazy()
        .filter(
            text(PLAYER_ID)
                .eq(lit(player_id.trim()))
                .and(text(SEASON_ID).is_in(lit(seasons))),
        )
        .collect()?)
}

/// One row per (player, team, player id) with its seasons, positions and
/// season ids as sorted, de-duplicated, comma-joined strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub player_name: String,
    pub equipo: String,
    pub player_id: String,
    pub temporadas: String,
    pub demarcaciones: String,
    pub season_ids: String,
}

#[derive(Default)]
struct PlayerSets {
    seasons: BTreeSet<String>,
    positions: BTreeSet<String>,
    season_ids: BTreeSet<String>,
}

pub fn player_aggregate(events: &DataFrame) -> Result<Vec<PlayerSummary>> {
    let names = strings(events, PLAYER_NAME)?;
    let teams = strings(events, EQUIPO)?;
    let ids = strings(events, PLAYER_ID)?;
    let seasons = strings(events, TEMPORADA)?;
    let positions = strings(events, DEMARCACION)?;
    let season_ids = strings(events, SEASON_ID)?;

    let mut groups: BTreeMap<(String, String, String), PlayerSets> = BTreeMap::new();
    for row in 0..events.height() {
        let key = (
            names[row].clone().unwrap_or_default(),
            teams[row].clone().unwrap_or_default(),
            ids[row].clone().unwrap_or_default(),
        );
        let sets = groups.entry(key).or_default();
        if let Some(season) = &seasons[row] {
            sets.seasons.insert(season.clone());
        }
        if let Some(position) = &positions[row] {
            sets.positions.insert(position.clone());
        }
        if let Some(season_id) = &season_ids[row] {
            sets.season_ids.insert(season_id.clone());
        }
    }

    Ok(groups
        .into_iter()
        .map(|((player_name, equipo, player_id), sets)| PlayerSummary {
            player_name,
            equipo,
            player_id,
            temporadas: joined(sets.seasons),
            demarcaciones: joined(sets.positions),
            season_ids: joined(sets.season_ids),
        })
        .collect())
}

fn joined(values: BTreeSet<String>) -> String {
    values.into_iter().collect::<Vec<_>>().join(", ")
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

// Keep the join keys plus the columns the left side does not already have.
fn right_side(right: &DataFrame, left_columns: &[String], keys: &[&str]) -> Result<DataFrame> {
    let keep: Vec<String> = right
        .get_column_names()
        .iter()
        .filter(|name| keys.contains(*name) || !left_columns.iter().any(|c| c.as_str() == **name))
        .map(|name| name.to_string())
        .collect();
    Ok(right.select(keep)?)
}

fn plain_keys(lf: LazyFrame, keys: &[&str]) -> LazyFrame {
    lf.with_columns(keys.iter().map(|key| text(key)).collect::<Vec<Expr>>())
}

fn join_report(
    frame: &DataFrame,
    requested: &BTreeSet<String>,
    stats: &DataFrame,
    kpi: &DataFrame,
    team: &str,
) -> Result<JoinReport> {
    // Opponent rows survive the joins on their own, so only the team's rows
    // say whether one of its matches made it through.
    let team_rows = frame
        .clone()
        .lazy()
        .filter(text(EQUIPO).eq(lit(team)))
        .collect()?;
    let joined = distinct_strings(&team_rows, MATCH_ID)?;
    let dropped: Vec<&String> = requested.difference(&joined).collect();

    let mut misses = Vec::with_capacity(dropped.len());
    if !dropped.is_empty() {
        let stats_ids = distinct_strings(stats, MATCH_ID)?;
        let team_kpi = kpi
            .clone()
            .lazy()
            .filter(text(EQUIPO).eq(lit(team)))
            .collect()?;
        let kpi_ids = distinct_strings(&team_kpi, MATCH_ID)?;

        for match_id in dropped {
            let mut missing_in = Vec::new();
            if !stats_ids.contains(match_id) {
                missing_in.push(TableKind::TeamStats);
            }
            if !kpi_ids.contains(match_id) {
                missing_in.push(TableKind::Kpi);
            }
            misses.push(JoinMiss {
                match_id: match_id.clone(),
                missing_in,
            });
        }
    }

    Ok(JoinReport {
        requested_matches: requested.len(),
        joined_matches: joined.len(),
        misses,
    })
}

/// Memo of `detailed_data` keyed by (team, season), valid for the life of
/// one `EventStore` snapshot.
#[derive(Debug, Default)]
pub struct DetailedCache {
    entries: RwLock<HashMap<(String, SeasonFilter), Detailed>>,
}

impl DetailedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, store: &EventStore, team: &str, season: &SeasonFilter) -> Result<Detailed> {
        let key = (team.to_string(), season.clone());
        if let Ok(entries) = self.entries.read() {
            if let Some(hit) = entries.get(&key) {
                debug!("detailed cache hit team={} season={:?}", team, season);
                return Ok(hit.clone());
            }
        }

        let fresh = detailed_data(store, team, season)?;
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, fresh.clone());
        }
        Ok(fresh)
    }

    /// Call after reloading the store.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
