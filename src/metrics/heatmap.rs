use polars::prelude::DataFrame;

use crate::columns::{numbers, scoped};
use crate::error::Result;
use crate::metrics::grid::GridSpec;
use crate::payload::GridData;
use crate::schema::{XSTART, YSTART};

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapParams {
    pub team: Option<String>,
    pub season_ids: Option<Vec<String>>,
    pub grid: GridSpec,
    /// Gaussian smoothing width in bins; `None` keeps raw counts.
    pub sigma: Option<f64>,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            team: None,
            season_ids: None,
            grid: GridSpec::heatmap(),
            sigma: None,
        }
    }
}

/// 2D histogram of event start locations.
pub fn compute(frame: &DataFrame, params: &HeatmapParams) -> Result<GridData> {
    let grid = params.grid;
    let mut data = GridData {
        counts: grid.zeros(),
        x_edges: grid.x_edges(),
        y_edges: grid.y_edges(),
        binned: 0,
        skipped: 0,
        coercion_failures: 0,
    };
    if frame.height() == 0 {
        return Ok(data);
    }

    let rows = scoped(frame, params.team.as_deref(), params.season_ids.as_deref())?;
    let xs = numbers(&rows, XSTART)?;
    let ys = numbers(&rows, YSTART)?;
    data.coercion_failures = xs.failures + ys.failures;

    for (x, y) in xs.values.iter().zip(&ys.values) {
        match (x, y) {
            (Some(x), Some(y)) => match grid.bin(*x, *y) {
                Some((column, row)) => {
                    data.counts[row][column] += 1.0;
                    data.binned += 1;
                }
                None => data.skipped += 1,
            },
            _ => data.skipped += 1,
        }
    }

    if let Some(sigma) = params.sigma.filter(|s| *s > 0.0) {
        data.counts = gaussian_smooth(&data.counts, sigma);
    }
    Ok(data)
}

/// Separable Gaussian blur truncated at 3 sigma. Near the borders each
/// output cell is normalized by the kernel weight that fell inside.
pub fn gaussian_smooth(matrix: &[Vec<f64>], sigma: f64) -> Vec<Vec<f64>> {
    let rows = matrix.len();
    let columns = matrix.first().map_or(0, Vec::len);
    if rows == 0 || columns == 0 || sigma.is_nan() || sigma <= 0.0 {
        return matrix.to_vec();
    }

    // A kernel wider than the grid adds nothing but zero-weight taps.
    let reach = rows.max(columns) as f64;
    let radius = (3.0 * sigma).ceil().min(reach) as isize;
    let kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-((k * k) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();

    let mut horizontal = vec![vec![0.0; columns]; rows];
    for r in 0..rows {
        for c in 0..columns {
            horizontal[r][c] = weighted(&kernel, radius, c, columns, |cc| matrix[r][cc]);
        }
    }

    let mut out = vec![vec![0.0; columns]; rows];
    for r in 0..rows {
        for c in 0..columns {
            out[r][c] = weighted(&kernel, radius, r, rows, |rr| horizontal[rr][c]);
        }
    }
    out
}

fn weighted(kernel: &[f64], radius: isize, at: usize, len: usize, value: impl Fn(usize) -> f64) -> f64 {
    let mut acc = 0.0;
    let mut weight = 0.0;
    for (i, w) in kernel.iter().enumerate() {
        let idx = at as isize + i as isize - radius;
        if idx < 0 || idx >= len as isize {
            continue;
        }
        acc += w * value(idx as usize);
        weight += w;
    }
    if weight > 0.0 { acc / weight } else { 0.0 }
}
