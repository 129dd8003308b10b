use log::debug;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::columns::{has_column, numbers};
use crate::error::Result;
use crate::payload::LabeledValue;

/// A bar whose value is the sum of several underlying columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricGroup {
    pub label: String,
    pub columns: Vec<String>,
}

impl MetricGroup {
    pub fn new(label: &str, columns: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Advanced team metrics built from the zone columns of the team
/// statistics table.
pub fn advanced_metric_groups() -> Vec<MetricGroup> {
    vec![
        MetricGroup::new(
            "Duelos Ganados",
            &[
                "duelos_ganados_zona_defensiva",
                "duelos_ganados_zona_media",
                "duelos_ganados_zona_ofensiva",
            ],
        ),
        MetricGroup::new(
            "Recuperaciones",
            &[
                "recuperaciones_zona_defensiva",
                "recuperaciones_zona_media",
                "recuperaciones_zona_ofensiva",
            ],
        ),
        MetricGroup::new(
            "Entradas",
            &[
                "entradas_zona_defensiva",
                "entradas_zona_media",
                "entradas_zona_ofensiva",
            ],
        ),
        MetricGroup::new("Pases Largos Exitosos", &["pases_largos_exitosos"]),
        MetricGroup::new(
            "Cambios de Orientación Exitosos",
            &["cambios_orientacion_exitosos"],
        ),
    ]
}

/// One value per group, in group order. Non-numeric cells and absent
/// columns add nothing.
pub fn compute(frame: &DataFrame, groups: &[MetricGroup]) -> Result<Vec<LabeledValue>> {
    groups
        .iter()
        .map(|group| {
            let mut value = 0.0;
            for column in &group.columns {
                if !has_column(frame, column) {
                    debug!("{}: column {} absent, counted as 0", group.label, column);
                    continue;
                }
                let coerced = numbers(frame, column)?;
                if coerced.failures > 0 {
                    debug!(
                        "{}: {} non-numeric values in {} counted as 0",
                        group.label, coerced.failures, column
                    );
                }
                value += coerced.or_zero().sum::<f64>();
            }
            Ok(LabeledValue {
                label: group.label.clone(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn non_numeric_cells_count_as_zero() {
        let df = df!("pases_largos_exitosos" => &["3", "x", "5"]).unwrap();
        let groups = vec![MetricGroup::new("Pases Largos Exitosos", &["pases_largos_exitosos"])];
        let values = compute(&df, &groups).unwrap();
        assert_eq!(values[0].value, 8.0);
    }

    #[test]
    fn group_sums_all_of_its_columns() {
        let df = df!(
            "recuperaciones_zona_defensiva" => &[1i64, 2],
            "recuperaciones_zona_media" => &[3i64, 4],
            "recuperaciones_zona_ofensiva" => &[Some(5i64), None]
        )
        .unwrap();
        let values = compute(&df, &advanced_metric_groups()).unwrap();
        let labels: Vec<&str> = values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels[1], "Recuperaciones");
        assert_eq!(values[1].value, 15.0);
        assert_eq!(values[0].value, 0.0);
    }

    #[test]
    fn empty_frame_gives_zero_bars() {
        let values = compute(&DataFrame::default(), &advanced_metric_groups()).unwrap();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| v.value == 0.0));
    }
}
