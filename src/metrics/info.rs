use polars::prelude::DataFrame;

use crate::columns::{has_column, scoped};
use crate::payload::Card;
use crate::schema::{EQUIPO, MATCH_ID};

/// Summary cards shown above the charts: team, season and the number of
/// matches in which the team itself has rows.
pub fn cards(frame: &DataFrame, team: &str, season: &str) -> Vec<Card> {
    let own = if has_column(frame, EQUIPO) {
        scoped(frame, Some(team), None).ok()
    } else {
        Some(frame.clone())
    };
    let matches = match own {
        Some(rows) if has_column(&rows, MATCH_ID) => rows
            .column(MATCH_ID)
            .and_then(|ids| ids.n_unique())
            .unwrap_or(0),
        _ => 0,
    };

    vec![
        card("Equipo", team),
        card("Temporada", season),
        card("Partidos", &matches.to_string()),
    ]
}

/// Cards shown before a complete selection is made.
pub fn placeholder_cards() -> Vec<Card> {
    vec![card("Sin datos", "Seleccione equipo y temporada"); 3]
}

fn card(label: &str, value: &str) -> Card {
    Card {
        label: label.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn counts_distinct_matches() {
        let df = df!("match_id" => &["1", "1", "2"]).unwrap();
        let cards = cards(&df, "Alavés", "2022");
        assert_eq!(cards[0].value, "Alavés");
        assert_eq!(cards[1].value, "2022");
        assert_eq!(cards[2].label, "Partidos");
        assert_eq!(cards[2].value, "2");
    }

    #[test]
    fn counts_only_the_teams_own_matches() {
        let df = df!(
            "match_id" => &["1", "2", "2"],
            "equipo" => &["X", "Y", "Y"]
        )
        .unwrap();
        assert_eq!(cards(&df, "X", "2022")[2].value, "1");
    }

    #[test]
    fn empty_frame_has_zero_matches() {
        let cards = cards(&DataFrame::default(), "Alavés", "Todas");
        assert_eq!(cards[2].value, "0");
    }
}
