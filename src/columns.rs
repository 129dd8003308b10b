use std::collections::BTreeSet;

use polars::prelude::*;

use crate::error::Result;

/// String view of a column. Categorical and numeric identifiers compare
/// through this.
pub fn text(name: &str) -> Expr {
    col(name).cast(DataType::String)
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| *c == name)
}

pub fn strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

pub fn distinct_strings(df: &DataFrame, name: &str) -> Result<BTreeSet<String>> {
    Ok(strings(df, name)?.into_iter().flatten().collect())
}

/// A column coerced to `f64`. Values that are present but not numeric
/// become `None` and are counted in `failures`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub values: Vec<Option<f64>>,
    pub failures: usize,
}

impl Coerced {
    pub fn or_zero(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|v| v.unwrap_or(0.0))
    }
}

pub fn numbers(df: &DataFrame, name: &str) -> Result<Coerced> {
    let raw = df.column(name)?;
    let cast = raw.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = cast
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect();
    let absent = values.iter().filter(|v| v.is_none()).count();
    Ok(Coerced {
        failures: absent.saturating_sub(raw.null_count()),
        values,
    })
}

/// Restrict a frame to one team and, optionally, a set of season ids.
pub fn scoped(df: &DataFrame, team: Option<&str>, season_ids: Option<&[String]>) -> Result<DataFrame> {
    let mut lf = df.clone().lazy();
    if let Some(team) = team {
        lf = lf.filter(text(crate::schema::EQUIPO).eq(lit(team)));
    }
    if let Some(ids) = season_ids {
        let ids = Series::new("season_ids", ids.to_vec());
        lf = lf.filter(text(crate::schema::SEASON_ID).is_in(lit(ids)));
    }
    Ok(lf.collect()?)
}
