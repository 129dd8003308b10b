use serde::Serialize;
use strum::{Display, EnumString};

pub const MATCH_ID: &str = "match_id";
pub const SEASON_ID: &str = "season_id";
pub const EQUIPO: &str = "equipo";
pub const TEMPORADA: &str = "temporada";
pub const TIPO_EVENTO: &str = "tipo_evento";
pub const XSTART: &str = "xstart";
pub const YSTART: &str = "ystart";
pub const XEND: &str = "xend";
pub const YEND: &str = "yend";
pub const EVENT_TIME: &str = "event_time";
pub const PERIODO: &str = "periodo";
pub const XG: &str = "xg";
pub const PLAYER_ID: &str = "player_id";
pub const PLAYER_NAME: &str = "player_name";
pub const PLAYER_LAST_NAME: &str = "player_last_name";
pub const DEMARCACION: &str = "demarcacion";

pub const JORNADA: &str = "jornada";
pub const KPI_RENDIMIENTO: &str = "KPI_Rendimiento";

pub const TEAM_NAME: &str = "team_name";
pub const POSITION_X: &str = "position_x";
pub const POSITION_Y: &str = "position_y";
pub const POSITION_NAME: &str = "position_name";

/// Radar axes. The order defines the polygon and must not change.
pub const KPI_COLUMNS: [&str; 11] = [
    "Progresion_Ataque",
    "Verticalidad",
    "Ataques_Bandas",
    "Peligro_Generado",
    "Rendimiento_Finalizacion",
    "Eficacia_Defensiva",
    "Estilo_Combinativo_Directo",
    "Zonas_Recuperacion",
    "Altura_Bloque_Defensivo",
    "Posesion_Dominante",
    KPI_RENDIMIENTO,
];

const EVENT_COLUMNS: &[&str] = &[
    MATCH_ID,
    SEASON_ID,
    EQUIPO,
    TEMPORADA,
    TIPO_EVENTO,
    XSTART,
    YSTART,
    XEND,
    YEND,
    EVENT_TIME,
    PERIODO,
    XG,
    PLAYER_ID,
    PLAYER_NAME,
    DEMARCACION,
];

const TEAM_STATS_COLUMNS: &[&str] = &[MATCH_ID, SEASON_ID];

const KPI_TABLE_COLUMNS: &[&str] = &[
    MATCH_ID,
    SEASON_ID,
    EQUIPO,
    JORNADA,
    "Progresion_Ataque",
    "Verticalidad",
    "Ataques_Bandas",
    "Peligro_Generado",
    "Rendimiento_Finalizacion",
    "Eficacia_Defensiva",
    "Estilo_Combinativo_Directo",
    "Zonas_Recuperacion",
    "Altura_Bloque_Defensivo",
    "Posesion_Dominante",
    KPI_RENDIMIENTO,
];

const LINEUP_COLUMNS: &[&str] = &[
    MATCH_ID,
    TEAM_NAME,
    PLAYER_ID,
    POSITION_X,
    POSITION_Y,
    POSITION_NAME,
    PLAYER_NAME,
];

/// The source tables the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Events,
    TeamStats,
    Kpi,
    Lineups,
    Users,
}

impl TableKind {
    pub const PARQUET: [TableKind; 4] = [
        TableKind::Events,
        TableKind::TeamStats,
        TableKind::Kpi,
        TableKind::Lineups,
    ];

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Events => EVENT_COLUMNS,
            TableKind::TeamStats => TEAM_STATS_COLUMNS,
            TableKind::Kpi => KPI_TABLE_COLUMNS,
            TableKind::Lineups => LINEUP_COLUMNS,
            TableKind::Users => &["username", "password"],
        }
    }

    /// Identifier columns arrive as a mix of integers and strings and are
    /// compared by their string form.
    pub fn identifier_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Events => &[MATCH_ID, SEASON_ID, PLAYER_ID],
            TableKind::TeamStats => &[MATCH_ID, SEASON_ID],
            TableKind::Kpi => &[MATCH_ID, SEASON_ID],
            TableKind::Lineups => &[MATCH_ID, PLAYER_ID],
            TableKind::Users => &[],
        }
    }

    /// Low-cardinality columns stored as categoricals.
    pub fn categorical_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Events => &[EQUIPO, TEMPORADA, SEASON_ID],
            _ => &[],
        }
    }
}

/// Event type labels as written in the event file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EventType {
    #[strum(serialize = "Pase", serialize = "Pass")]
    Pass,
    #[strum(serialize = "Tiro", serialize = "Disparo", serialize = "Shot")]
    Shot,
    #[strum(serialize = "Recuperación", serialize = "Recuperacion", serialize = "Recovery")]
    Recovery,
    #[strum(serialize = "Entrada", serialize = "Tackle")]
    Tackle,
    #[strum(default)]
    Other(String),
}

impl EventType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse() {
            Ok(kind) => kind,
            Err(_) => EventType::Other(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    FirstHalf,
    SecondHalf,
    Unknown,
}

impl Period {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().to_lowercase();
        if value.starts_with('1') || value == "first_half" {
            Period::FirstHalf
        } else if value.starts_with('2') || value == "second_half" {
            Period::SecondHalf
        } else {
            Period::Unknown
        }
    }
}
