use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, PlayerOption, SeasonFilter};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};

/// Current user choice in the cascading selectors. Held per request and
/// passed explicitly to every derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub team: Option<String>,
    pub season: Option<String>,
    pub match_id: Option<String>,
    pub player_id: Option<String>,
}

/// Option lists for every selector, derived from a `Selection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub teams: Vec<String>,
    pub seasons: Vec<String>,
    pub matches: Vec<String>,
    pub players: Vec<PlayerOption>,
}

impl Selection {
    pub fn new(team: Option<String>, season: Option<String>) -> Self {
        Self {
            team,
            season,
            ..Self::default()
        }
    }

    /// Changing the team invalidates every downstream choice.
    pub fn with_team(&self, team: Option<String>) -> Self {
        Self {
            team,
            ..Self::default()
        }
    }

    pub fn with_season(&self, season: Option<String>) -> Self {
        Self {
            team: self.team.clone(),
            season,
            ..Self::default()
        }
    }

    pub fn with_match(&self, match_id: Option<String>) -> Self {
        Self {
            match_id,
            ..self.clone()
        }
    }

    pub fn with_player(&self, player_id: Option<String>) -> Self {
        Self {
            player_id,
            ..self.clone()
        }
    }

    pub fn require_team_season(&self) -> Result<(&str, &str)> {
        let team = non_empty(&self.team).ok_or(AnalyticsError::SelectionIncomplete("team"))?;
        let season = non_empty(&self.season).ok_or(AnalyticsError::SelectionIncomplete("season"))?;
        Ok((team, season))
    }

    pub fn season_filter(&self, config: &AnalyticsConfig) -> Option<SeasonFilter> {
        non_empty(&self.season).map(|season| SeasonFilter::parse(season, &config.all_seasons_label))
    }

    /// Drop choices that are no longer among their options, walking the
    /// chain top-down so a dropped team also clears everything below it.
    pub fn reconciled(&self, options: &SelectorOptions, config: &AnalyticsConfig) -> Self {
        let team = self.team.clone().filter(|t| options.teams.contains(t));
        if team.is_none() {
            return Self::default();
        }
        let season = self.season.clone().filter(|s| {
            options.seasons.contains(s)
                || SeasonFilter::parse(s, &config.all_seasons_label) == SeasonFilter::All
        });
        if season.is_none() {
            return Self::new(team, None);
        }
        let match_id = self.match_id.clone().filter(|m| options.matches.contains(m));
        let player_id = self
            .player_id
            .clone()
            .filter(|p| options.players.iter().any(|o| &o.player_id == p));
        Self {
            team,
            season,
            match_id,
            player_id,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Recompute every selector's options from the full current selection.
pub fn derive_options(events: &DataFrame, config: &AnalyticsConfig, selection: &Selection) -> Result<SelectorOptions> {
    let teams = catalog::team_options(events, &config.club_filter)?;

    let Some(team) = non_empty(&selection.team).filter(|t| teams.iter().any(|o| o.as_str() == *t)) else {
        return Ok(SelectorOptions {
            teams,
            ..SelectorOptions::default()
        });
    };

    let seasons = catalog::season_options(events, &config.club_filter, team)?;

    let Some(season) = selection.season_filter(config) else {
        return Ok(SelectorOptions {
            teams,
            seasons,
            ..SelectorOptions::default()
        });
    };

    let matches = catalog::match_options(events, team, &season)?;
    let players = catalog::player_options(events, team, &season)?;

    Ok(SelectorOptions {
        teams,
        seasons,
        matches,
        players,
    })
}

/// Options for `selection` after dropping the choices the data no longer
/// offers. Returns the reconciled selection alongside its options.
pub fn refresh(
    events: &DataFrame,
    config: &AnalyticsConfig,
    selection: &Selection,
) -> Result<(Selection, SelectorOptions)> {
    let options = derive_options(events, config, selection)?;
    let reconciled = selection.reconciled(&options, config);
    if reconciled == *selection {
        return Ok((reconciled, options));
    }
    let options = derive_options(events, config, &reconciled)?;
    Ok((reconciled, options))
}
