use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;

use crate::columns::{has_column, numbers, strings, text};
use crate::error::Result;
use crate::payload::Marker;
use crate::schema::{
    MATCH_ID, PLAYER_ID, PLAYER_LAST_NAME, PLAYER_NAME, POSITION_NAME, POSITION_X, POSITION_Y,
    TEAM_NAME,
};

/// Lineup coordinates are stored in [0, 1].
pub const POSITION_SCALE: f64 = 100.0;

#[derive(Default)]
struct Spot {
    hover: String,
    x: f64,
    y: f64,
    count: usize,
}

/// Average position of each (role, player) of a team, scaled to the
/// plotting frame. `match_ids` narrows the lineups to those matches.
pub fn compute(lineups: &DataFrame, team: &str, match_ids: Option<&BTreeSet<String>>) -> Result<Vec<Marker>> {
    if lineups.height() == 0 {
        return Ok(Vec::new());
    }

    let mut lf = lineups.clone().lazy().filter(text(TEAM_NAME).eq(lit(team)));
    if let Some(ids) = match_ids {
        let ids = Series::new("match_ids", ids.iter().cloned().collect::<Vec<String>>());
        lf = lf.filter(text(MATCH_ID).is_in(lit(ids)));
    }
    let rows = lf.collect()?;

    let roles = strings(&rows, POSITION_NAME)?;
    let ids = strings(&rows, PLAYER_ID)?;
    let names = strings(&rows, PLAYER_NAME)?;
    let last_names = if has_column(&rows, PLAYER_LAST_NAME) {
        strings(&rows, PLAYER_LAST_NAME)?
    } else {
        vec![None; rows.height()]
    };
    let xs = numbers(&rows, POSITION_X)?;
    let ys = numbers(&rows, POSITION_Y)?;

    let mut spots: BTreeMap<(String, String), Spot> = BTreeMap::new();
    for i in 0..rows.height() {
        let (Some(x), Some(y)) = (xs.values[i], ys.values[i]) else {
            continue;
        };
        let role = roles[i].clone().unwrap_or_default();
        let id = ids[i].clone().unwrap_or_default();
        let spot = spots.entry((role, id)).or_default();
        if spot.count == 0 {
            spot.hover = full_name(names[i].as_deref(), last_names[i].as_deref());
        }
        spot.x += x;
        spot.y += y;
        spot.count += 1;
    }

    Ok(spots
        .into_iter()
        .map(|((role, _), spot)| Marker {
            label: role,
            hover: spot.hover,
            x: spot.x / spot.count as f64 * POSITION_SCALE,
            y: spot.y / spot.count as f64 * POSITION_SCALE,
        })
        .collect())
}

fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    match (first, last) {
        (Some(first), Some(last)) if !last.is_empty() => format!("{} {}", first, last),
        (Some(first), _) => first.to_string(),
        (None, Some(last)) => last.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineups() -> DataFrame {
        df!(
            "match_id" => &["1", "2", "1", "1"],
            "team_name" => &["Alavés", "Alavés", "Alavés", "Rival"],
            "player_id" => &["7", "7", "9", "20"],
            "position_x" => &[Some(0.5), Some(0.7), None, Some(0.1)],
            "position_y" => &[Some(0.2), Some(0.4), Some(0.5), Some(0.1)],
            "position_name" => &["MC", "MC", "DC", "POR"],
            "player_name" => &["Luis", "Luis", "Ander", "Mikel"],
            "player_last_name" => &["Rioja", "Rioja", "Guevara", "Merino"]
        )
        .unwrap()
    }

    #[test]
    fn averages_and_scales_positions_per_role() {
        let markers = compute(&lineups(), "Alavés", None).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].label, "MC");
        assert_eq!(markers[0].hover, "Luis Rioja");
        assert!((markers[0].x - 60.0).abs() < 1e-9);
        assert!((markers[0].y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn restricts_to_selected_matches() {
        let ids: BTreeSet<String> = ["2".to_string()].into_iter().collect();
        let markers = compute(&lineups(), "Alavés", Some(&ids)).unwrap();
        assert_eq!(markers.len(), 1);
        assert!((markers[0].x - 70.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_team_has_no_markers() {
        assert!(compute(&lineups(), "Nadie", None).unwrap().is_empty());
    }
}
