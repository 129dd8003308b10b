use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::columns::{strings, text};
use crate::error::Result;
use crate::schema::{EQUIPO, MATCH_ID, PLAYER_ID, PLAYER_NAME, TEMPORADA};

/// Season selector value. `All` skips the season predicate entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonFilter {
    All,
    Season(String),
}

impl SeasonFilter {
    /// `sentinel` is the configured "every season" label; `All` is always
    /// accepted as well.
    pub fn parse(raw: &str, sentinel: &str) -> Self {
        let raw = raw.trim();
        if raw == sentinel || raw.eq_ignore_ascii_case("all") {
            SeasonFilter::All
        } else {
            SeasonFilter::Season(raw.to_string())
        }
    }
}

/// Distinct (team, season) pairs for teams whose name contains `club`.
pub fn distinct_team_seasons(events: &DataFrame, club: &str) -> Result<BTreeSet<(String, String)>> {
    let pairs = events
        .clone()
        .lazy()
        .select([text(EQUIPO), text(TEMPORADA)])
        .unique(None, UniqueKeepStrategy::Any)
        .collect()?;

    let teams = strings(&pairs, EQUIPO)?;
    let seasons = strings(&pairs, TEMPORADA)?;
    Ok(teams
        .into_iter()
        .zip(seasons)
        .filter_map(|(team, season)| Some((team?, season?)))
        .filter(|(team, _)| team.contains(club))
        .collect())
}

pub fn match_ids_for(events: &DataFrame, team: &str, season: &SeasonFilter) -> Result<BTreeSet<String>> {
    let mut lf = events.clone().lazy().filter(text(EQUIPO).eq(lit(team)));
    if let SeasonFilter::Season(season) = season {
        lf = lf.filter(text(TEMPORADA).eq(lit(season.as_str())));
    }
    let ids = lf.select([text(MATCH_ID)]).collect()?;
    Ok(strings(&ids, MATCH_ID)?.into_iter().flatten().collect())
}

pub fn team_options(events: &DataFrame, club: &str) -> Result<Vec<String>> {
    let teams: BTreeSet<String> = distinct_team_seasons(events, club)?
        .into_iter()
        .map(|(team, _)| team)
        .collect();
    Ok(teams.into_iter().collect())
}

pub fn season_options(events: &DataFrame, club: &str, team: &str) -> Result<Vec<String>> {
    let seasons: BTreeSet<String> = distinct_team_seasons(events, club)?
        .into_iter()
        .filter(|(t, _)| t == team)
        .map(|(_, season)| season)
        .collect();
    Ok(seasons.into_iter().collect())
}

pub fn match_options(events: &DataFrame, team: &str, season: &SeasonFilter) -> Result<Vec<String>> {
    Ok(match_ids_for(events, team, season)?.into_iter().collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerOption {
    pub player_id: String,
    pub player_name: String,
}

/// Players who appear in the team's events, sorted by name.
pub fn player_options(events: &DataFrame, team: &str, season: &SeasonFilter) -> Result<Vec<PlayerOption>> {
    let mut lf = events.clone().lazy().filter(text(EQUIPO).eq(lit(team)));
    if let SeasonFilter::Season(season) = season {
        lf = lf.filter(text(TEMPORADA).eq(lit(season.as_str())));
    }
    let players = lf
        .select([text(PLAYER_ID), text(PLAYER_NAME)])
        .unique(None, UniqueKeepStrategy::Any)
        .collect()?;

    let mut by_id: BTreeMap<String, String> = BTreeMap::new();
    for (id, name) in strings(&players, PLAYER_ID)?
        .into_iter()
        .zip(strings(&players, PLAYER_NAME)?)
    {
        if let Some(id) = id {
            by_id.entry(id).or_insert_with(|| name.unwrap_or_default());
        }
    }

    let mut options: Vec<PlayerOption> = by_id
        .into_iter()
        .map(|(player_id, player_name)| PlayerOption {
            player_id,
            player_name,
        })
        .collect();
    options.sort_by(|a, b| {
        a.player_name
            .cmp(&b.player_name)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    Ok(options)
}
