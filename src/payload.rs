//! Numeric outputs handed to whatever renders the dashboard. Nothing here
//! knows about HTML or chart libraries.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Bin matrix indexed `[row][column]`, rows along the pitch width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridData {
    pub counts: Vec<Vec<f64>>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    /// Points that made it into a bin.
    pub binned: usize,
    /// Rows dropped for absent, non-numeric or off-pitch coordinates.
    pub skipped: usize,
    /// Coordinate cells that were present but not numeric.
    pub coercion_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowBin {
    pub column: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub count: usize,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowData {
    pub bins: Vec<FlowBin>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub hover: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Cards { cards: Vec<Card> },
    Grid(GridData),
    Flow(FlowData),
    Series { points: Vec<Point> },
    Labeled { values: Vec<LabeledValue> },
    Markers { markers: Vec<Marker> },
    Empty { reason: String },
}

impl ChartData {
    pub fn empty(reason: impl Into<String>) -> Self {
        ChartData::Empty {
            reason: reason.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartData::Empty { .. })
    }
}

impl From<GridData> for ChartData {
    fn from(grid: GridData) -> Self {
        ChartData::Grid(grid)
    }
}

impl From<FlowData> for ChartData {
    fn from(flow: FlowData) -> Self {
        ChartData::Flow(flow)
    }
}

impl From<Vec<Card>> for ChartData {
    fn from(cards: Vec<Card>) -> Self {
        ChartData::Cards { cards }
    }
}

impl From<Vec<Point>> for ChartData {
    fn from(points: Vec<Point>) -> Self {
        ChartData::Series { points }
    }
}

impl From<Vec<LabeledValue>> for ChartData {
    fn from(values: Vec<LabeledValue>) -> Self {
        ChartData::Labeled { values }
    }
}

impl From<Vec<Marker>> for ChartData {
    fn from(markers: Vec<Marker>) -> Self {
        ChartData::Markers { markers }
    }
}
