use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use crate::columns::{numbers, scoped, strings};
use crate::error::Result;
use crate::metrics::grid::GridSpec;
use crate::payload::{FlowBin, FlowData};
use crate::schema::{EventType, TIPO_EVENTO, XEND, XSTART, YEND, YSTART};

#[derive(Debug, Clone, PartialEq)]
pub struct PassFlowParams {
    pub team: Option<String>,
    pub season_ids: Option<Vec<String>>,
    pub grid: GridSpec,
}

impl Default for PassFlowParams {
    fn default() -> Self {
        Self {
            team: None,
            season_ids: None,
            grid: GridSpec::flow(),
        }
    }
}

/// Passes binned by start location, with the mean (end - start) vector of
/// each occupied bin. Passes missing any coordinate are ignored.
pub fn compute(frame: &DataFrame, params: &PassFlowParams) -> Result<FlowData> {
    let grid = params.grid;
    let mut flow = FlowData {
        bins: Vec::new(),
        x_edges: grid.x_edges(),
        y_edges: grid.y_edges(),
    };
    if frame.height() == 0 {
        return Ok(flow);
    }

    let rows = scoped(frame, params.team.as_deref(), params.season_ids.as_deref())?;
    let kinds = strings(&rows, TIPO_EVENTO)?;
    let xs = numbers(&rows, XSTART)?;
    let ys = numbers(&rows, YSTART)?;
    let xe = numbers(&rows, XEND)?;
    let ye = numbers(&rows, YEND)?;

    // (row, column) -> (count, sum dx, sum dy)
    let mut acc: BTreeMap<(usize, usize), (usize, f64, f64)> = BTreeMap::new();
    for i in 0..rows.height() {
        let is_pass = kinds[i]
            .as_deref()
            .is_some_and(|kind| EventType::parse(kind) == EventType::Pass);
        if !is_pass {
            continue;
        }
        let (Some(x0), Some(y0), Some(x1), Some(y1)) = (xs.values[i], ys.values[i], xe.values[i], ye.values[i])
        else {
            continue;
        };
        let Some((column, row)) = grid.bin(x0, y0) else {
            continue;
        };
        let entry = acc.entry((row, column)).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += x1 - x0;
        entry.2 += y1 - y0;
    }

    flow.bins = acc
        .into_iter()
        .map(|((row, column), (count, sdx, sdy))| {
            let (x, y) = grid.center(column, row);
            FlowBin {
                column,
                row,
                x,
                y,
                count,
                dx: sdx / count as f64,
                dy: sdy / count as f64,
            }
        })
        .collect();
    Ok(flow)
}
