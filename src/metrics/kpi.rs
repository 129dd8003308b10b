use std::cmp::Ordering;
use std::collections::BTreeMap;

use polars::prelude::*;

use crate::columns::{numbers, scoped, strings};
use crate::error::Result;
use crate::payload::LabeledValue;
use crate::schema::{JORNADA, KPI_COLUMNS, KPI_RENDIMIENTO};

/// Mean of every KPI column, one value per axis in declared order. Axes
/// with no data read as zero.
pub fn radar(frame: &DataFrame, team: Option<&str>) -> Result<Vec<LabeledValue>> {
    if frame.height() == 0 {
        return Ok(placeholder());
    }

    let rows = scoped(frame, team, None)?;
    let means = rows
        .lazy()
        .select(
            KPI_COLUMNS
                .iter()
                .map(|name| col(name).cast(DataType::Float64).mean())
                .collect::<Vec<Expr>>(),
        )
        .collect()?;

    KPI_COLUMNS
        .iter()
        .map(|name| {
            let value = means.column(name)?.f64()?.get(0).filter(|v| v.is_finite());
            Ok(LabeledValue {
                label: name.to_string(),
                value: value.unwrap_or(0.0),
            })
        })
        .collect()
}

fn placeholder() -> Vec<LabeledValue> {
    KPI_COLUMNS
        .iter()
        .map(|name| LabeledValue {
            label: name.to_string(),
            value: 0.0,
        })
        .collect()
}

/// `KPI_Rendimiento` per matchday, averaged over the rows of that matchday
/// and ordered by matchday.
pub fn evolution(frame: &DataFrame, team: Option<&str>) -> Result<Vec<LabeledValue>> {
    if frame.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = scoped(frame, team, None)?;
    let matchdays = strings(&rows, JORNADA)?;
    let scores = numbers(&rows, KPI_RENDIMIENTO)?;

    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (matchday, score) in matchdays.into_iter().zip(scores.values) {
        let (Some(matchday), Some(score)) = (matchday, score) else {
            continue;
        };
        let entry = acc.entry(matchday).or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }

    let mut values: Vec<LabeledValue> = acc
        .into_iter()
        .map(|(label, (sum, count))| LabeledValue {
            label,
            value: sum / count as f64,
        })
        .collect();
    values.sort_by(|a, b| matchday_order(&a.label, &b.label));
    Ok(values)
}

// Numeric matchdays sort numerically and before any non-numeric label.
fn matchday_order(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
