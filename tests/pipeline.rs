use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use polars::prelude::*;
use tempfile::TempDir;

use bepro_analytics::catalog;
use bepro_analytics::metrics::pass_flow::{self, PassFlowParams};
use bepro_analytics::report::ReportStatus;
use bepro_analytics::schema::KPI_COLUMNS;
use bepro_analytics::{
    AnalyticsConfig, ChartData, DetailedCache, EventStore, SeasonFilter, Selection, TableKind,
    detailed_data, player_report, team_report,
};

fn write(dir: &Path, name: &str, mut df: DataFrame) {
    let mut file = File::create(dir.join(name)).unwrap();
    ParquetWriter::new(&mut file).finish(&mut df).unwrap();
}

fn events() -> DataFrame {
    df!(
        "match_id" => &[1i64, 1, 1, 2, 2, 3],
        "season_id" => &[2022i64, 2022, 2022, 2022, 2022, 2021],
        "equipo" => &["X", "X", "X", "X", "Y", "X"],
        "temporada" => &["2022", "2022", "2022", "2022", "2022", "2021"],
        "tipo_evento" => &["Pase", "Tiro", "Recuperación", "Pase", "Pase", "Tiro"],
        "xstart" => &[Some("10"), Some("100"), Some("n/a"), Some("60"), Some("50"), Some("110")],
        "ystart" => &[Some("20"), Some("40"), Some("30"), Some("60"), Some("50"), Some("35")],
        "xend" => &[Some("30"), None, None, Some("80"), Some("40"), None],
        "yend" => &[Some("40"), None, None, Some("70"), Some("50"), None],
        "event_time" => &["10:15", "20:00", "05:00", "40:00", "41:00", "12:00"],
        "periodo" => &["1ª_parte", "2ª_parte", "2ª_parte", "1ª_parte", "1ª_parte", "1ª_parte"],
        "xg" => &[0.0, 0.35, 0.0, 0.0, 0.0, 0.6],
        "player_id" => &[7i64, 9, 7, 7, 20, 9],
        "player_name" => &["Luis", "Ander", "Luis", "Luis", "Mikel", "Ander"],
        "demarcacion" => &["MC", "DC", "MCO", "MC", "DC", "DC"]
    )
    .unwrap()
}

fn team_stats() -> DataFrame {
    df!(
        "match_id" => &[1i64, 2, 3],
        "season_id" => &[2022i64, 2022, 2021],
        "pases_largos_exitosos" => &["3", "x", "5"],
        "recuperaciones_zona_media" => &[2i64, 1, 4]
    )
    .unwrap()
}

fn kpi() -> DataFrame {
    let mut columns = vec![
        Series::new("match_id", &[1i64, 2, 2, 3]),
        Series::new("season_id", &[2022i64, 2022, 2022, 2021]),
        Series::new("equipo", &["X", "X", "Y", "X"]),
        Series::new("jornada", &[1i64, 2, 2, 30]),
    ];
    for name in KPI_COLUMNS {
        columns.push(Series::new(name, &[4.0, 6.0, 2.0, 8.0]));
    }
    DataFrame::new(columns).unwrap()
}

fn lineups() -> DataFrame {
    df!(
        "match_id" => &[1i64, 2, 1],
        "team_name" => &["X", "X", "Y"],
        "player_id" => &[7i64, 7, 20],
        "position_x" => &[0.4, 0.6, 0.5],
        "position_y" => &[0.5, 0.5, 0.5],
        "position_name" => &["MC", "MC", "DC"],
        "player_name" => &["Luis", "Luis", "Mikel"]
    )
    .unwrap()
}

fn fixture(with_kpi: bool) -> (TempDir, AnalyticsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalyticsConfig {
        data_dir: dir.path().to_path_buf(),
        club_filter: "X".to_string(),
        ..AnalyticsConfig::default()
    };
    write(dir.path(), &config.events_file, events());
    write(dir.path(), &config.team_stats_file, team_stats());
    write(dir.path(), &config.lineups_file, lineups());
    if with_kpi {
        write(dir.path(), &config.kpi_file, kpi());
    }
    (dir, config)
}

fn selection(team: &str, season: &str) -> Selection {
    Selection::new(Some(team.to_string()), Some(season.to_string()))
}

#[test]
fn loads_and_describes_every_table() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let summary = store.describe();
    assert!(summary.iter().all(|table| table.loaded));
    assert_eq!(summary[0].rows, 6);
    assert!(matches!(
        store.events().unwrap().column("equipo").unwrap().dtype(),
        DataType::Categorical(..)
    ));
}

#[test]
fn single_pass_yields_one_flow_bin() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let detailed = detailed_data(&store, "X", &SeasonFilter::Season("2022".to_string())).unwrap();
    let match_one = detailed.for_match("1").unwrap();
    assert_eq!(match_one.frame.height(), 3);

    let params = PassFlowParams {
        team: Some("X".to_string()),
        ..PassFlowParams::default()
    };
    let flow = pass_flow::compute(&match_one.frame, &params).unwrap();
    assert_eq!(flow.bins.len(), 1);
    assert_eq!(flow.bins[0].count, 1);
    assert_eq!((flow.bins[0].dx, flow.bins[0].dy), (20.0, 20.0));
}

#[test]
fn team_report_fills_every_chart() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let report = team_report(&store, None, &config, &selection("X", "2022"));

    assert!(report.is_ready());
    match &report.cards {
        ChartData::Cards { cards } => assert_eq!(cards[2].value, "2"),
        other => panic!("unexpected cards payload {:?}", other),
    }
    match &report.kpi_radar {
        ChartData::Labeled { values } => {
            assert_eq!(values.len(), 11);
            assert_eq!(values[0].label, "Progresion_Ataque");
        }
        other => panic!("unexpected radar payload {:?}", other),
    }
    match &report.advanced_metrics {
        ChartData::Labeled { values } => {
            let long = values
                .iter()
                .find(|v| v.label == "Pases Largos Exitosos")
                .unwrap();
            assert_eq!(long.value, 3.0);
        }
        other => panic!("unexpected bars payload {:?}", other),
    }
    match &report.xg_evolution {
        ChartData::Series { points } => {
            assert!(points.windows(2).all(|w| w[1].y >= w[0].y));
            assert_eq!(points.last().unwrap().x, 65.0);
        }
        other => panic!("unexpected xg payload {:?}", other),
    }
    match &report.lineup {
        ChartData::Markers { markers } => {
            assert_eq!(markers.len(), 1);
            assert!((markers[0].x - 50.0).abs() < 1e-9);
        }
        other => panic!("unexpected lineup payload {:?}", other),
    }
    assert!(report.join.as_ref().unwrap().is_complete());
}

#[test]
fn all_seasons_covers_every_season() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let all = detailed_data(&store, "X", &SeasonFilter::parse("Todas", &config.all_seasons_label)).unwrap();
    let s2021 = detailed_data(&store, "X", &SeasonFilter::Season("2021".to_string())).unwrap();
    let s2022 = detailed_data(&store, "X", &SeasonFilter::Season("2022".to_string())).unwrap();
    assert_eq!(all.frame.height(), s2021.frame.height() + s2022.frame.height());
    assert_eq!(all.match_ids.len(), 3);
}

#[test]
fn pairs_outside_the_catalog_are_empty() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let catalog = catalog::distinct_team_seasons(store.events().unwrap(), &config.club_filter).unwrap();
    assert!(catalog.contains(&("X".to_string(), "2022".to_string())));
    for (team, season) in [("X", "1999"), ("Nadie", "2022")] {
        assert!(!catalog.contains(&(team.to_string(), season.to_string())));
        let detailed = detailed_data(&store, team, &SeasonFilter::Season(season.to_string())).unwrap();
        assert!(detailed.is_empty());
    }

    let report = team_report(&store, None, &config, &selection("Nadie", "2022"));
    assert_eq!(
        report.status,
        ReportStatus::Empty {
            kind: "no_rows".to_string(),
            reason: "no data for Nadie in 2022".to_string(),
        }
    );
}

#[test]
fn missing_kpi_source_is_reported_not_raised() {
    let (_dir, config) = fixture(false);
    let store = EventStore::open(&config);
    assert!(store.events().is_ok());
    assert_eq!(store.kpi().unwrap_err().kind(), "data_unavailable");

    let report = team_report(&store, None, &config, &selection("X", "2022"));
    match &report.status {
        ReportStatus::Empty { kind, .. } => assert_eq!(kind, "data_unavailable"),
        other => panic!("expected empty report, got {:?}", other),
    }
    assert!(report.heatmap.is_empty());
}

#[test]
fn incomplete_selection_yields_placeholders() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let report = team_report(&store, None, &config, &Selection::new(Some("X".to_string()), None));
    match &report.status {
        ReportStatus::Empty { kind, .. } => assert_eq!(kind, "selection_incomplete"),
        other => panic!("expected empty report, got {:?}", other),
    }
}

#[test]
fn match_missing_from_kpi_is_dropped_and_flagged() {
    let (dir, config) = fixture(true);
    let kpi_without_match_two = kpi()
        .lazy()
        .filter(col("match_id").neq(lit(2i64)))
        .collect()
        .unwrap();
    write(dir.path(), &config.kpi_file, kpi_without_match_two);

    let store = EventStore::open(&config);
    let detailed = detailed_data(&store, "X", &SeasonFilter::Season("2022".to_string())).unwrap();
    assert_eq!(detailed.match_ids.len(), 2);
    assert_eq!(detailed.join.joined_matches, 1);
    assert_eq!(detailed.join.misses.len(), 1);
    assert_eq!(detailed.join.misses[0].match_id, "2");
    assert_eq!(detailed.join.misses[0].missing_in, vec![TableKind::Kpi]);
}

#[test]
fn team_missing_from_kpi_is_flagged_even_when_opponent_is_present() {
    let (dir, config) = fixture(true);
    let kpi_without_x_in_match_two = kpi()
        .lazy()
        .filter(
            col("match_id")
                .eq(lit(2i64))
                .and(col("equipo").eq(lit("X")))
                .not(),
        )
        .collect()
        .unwrap();
    write(dir.path(), &config.kpi_file, kpi_without_x_in_match_two);

    let store = EventStore::open(&config);
    let detailed = detailed_data(&store, "X", &SeasonFilter::Season("2022".to_string())).unwrap();
    assert_eq!(detailed.join.joined_matches, 1);
    assert_eq!(detailed.join.misses.len(), 1);
    assert_eq!(detailed.join.misses[0].match_id, "2");
    assert_eq!(detailed.join.misses[0].missing_in, vec![TableKind::Kpi]);

    let report = team_report(&store, None, &config, &selection("X", "2022"));
    match &report.cards {
        ChartData::Cards { cards } => assert_eq!(cards[2].value, "1"),
        other => panic!("unexpected cards payload {:?}", other),
    }
}

#[test]
fn schema_mismatch_fails_at_load() {
    let (dir, config) = fixture(true);
    let broken = events().drop("xstart").unwrap();
    write(dir.path(), &config.events_file, broken);

    let store = EventStore::open(&config);
    let err = store.events().unwrap_err();
    assert_eq!(err.kind(), "schema_mismatch");
    assert!(err.to_string().contains("xstart"));
}

#[test]
fn player_report_summarizes_seasons_and_positions() {
    let (_dir, config) = fixture(true);
    let store = EventStore::open(&config);
    let report = player_report(&store, &config, "7", &["2022".to_string(), "2021".to_string()]);
    assert_eq!(report.status, ReportStatus::Ready);
    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].demarcaciones, "MC, MCO");
    assert_eq!(report.summary[0].temporadas, "2022");
}

#[test]
fn concurrent_reports_share_one_store() {
    let (_dir, config) = fixture(true);
    let store = Arc::new(EventStore::open(&config));
    let cache = Arc::new(DetailedCache::new());
    let baseline = serde_json::to_value(team_report(&store, None, &config, &selection("X", "Todas"))).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let cache = Arc::clone(&cache);
                let config = config.clone();
                scope.spawn(move || {
                    serde_json::to_value(team_report(&store, Some(cache.as_ref()), &config, &selection("X", "Todas"))).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), baseline);
        }
    });
    assert_eq!(cache.len(), 1);
}
