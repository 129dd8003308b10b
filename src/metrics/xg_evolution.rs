use polars::prelude::DataFrame;

use crate::columns::{numbers, scoped, strings};
use crate::error::Result;
use crate::payload::Point;
use crate::schema::{EVENT_TIME, PERIODO, Period, XG};

#[derive(Debug, Clone, PartialEq)]
pub struct XgParams {
    pub team: Option<String>,
    pub half_length: f64,
}

impl Default for XgParams {
    fn default() -> Self {
        Self {
            team: None,
            half_length: 45.0,
        }
    }
}

/// Minute part of an `MM:SS` clock (or a bare minute value).
pub fn clock_minutes(raw: &str) -> Option<f64> {
    raw.trim()
        .split(':')
        .next()
        .and_then(|minutes| minutes.trim().parse::<f64>().ok())
        .filter(|minutes| minutes.is_finite())
}

/// Match minute of an event: the half clock plus one half length for
/// second-half events.
pub fn match_minute(clock: f64, period: Period, half_length: f64) -> f64 {
    match period {
        Period::SecondHalf => clock + half_length,
        Period::FirstHalf | Period::Unknown => clock,
    }
}

/// Running xG total against match minute, sorted by minute. Events with no
/// readable clock are left out; a missing xG counts as zero.
pub fn compute(frame: &DataFrame, params: &XgParams) -> Result<Vec<Point>> {
    if frame.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = scoped(frame, params.team.as_deref(), None)?;
    let clocks = strings(&rows, EVENT_TIME)?;
    let periods = strings(&rows, PERIODO)?;
    let xg = numbers(&rows, XG)?;

    let mut events: Vec<(f64, f64)> = clocks
        .iter()
        .zip(&periods)
        .zip(xg.or_zero())
        .filter_map(|((clock, period), xg)| {
            let clock = clock_minutes(clock.as_deref()?)?;
            let period = period.as_deref().map_or(Period::Unknown, Period::parse);
            Some((match_minute(clock, period, params.half_length), xg))
        })
        .collect();
    events.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut total = 0.0;
    Ok(events
        .into_iter()
        .map(|(minute, xg)| {
            total += xg;
            Point { x: minute, y: total }
        })
        .collect())
}
