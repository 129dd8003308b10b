//! Reducers from a working set to chart payloads. Every computer is a pure
//! function of its inputs and yields a zero/placeholder payload for an
//! empty working set.

pub mod bars;
pub mod grid;
pub mod heatmap;
pub mod info;
pub mod kpi;
pub mod lineup;
pub mod pass_flow;
pub mod xg_evolution;

use log::warn;

use crate::error::Result;
use crate::payload::ChartData;

/// Convert a computer result into a payload. Failures become an empty
/// chart carrying the reason.
pub fn chart<T: Into<ChartData>>(name: &str, result: Result<T>) -> ChartData {
    match result {
        Ok(value) => value.into(),
        Err(err) => {
            warn!("{} not computed: {}", name, err);
            ChartData::empty(format!("{}: {}", err.kind(), err))
        }
    }
}
