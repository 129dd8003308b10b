use serde::{Deserialize, Serialize};

/// Regular grid over the pitch, anchored at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x_bins: usize,
    pub y_bins: usize,
    pub length: f64,
    pub width: f64,
}

pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

impl GridSpec {
    pub fn heatmap() -> Self {
        Self {
            x_bins: 20,
            y_bins: 20,
            length: PITCH_LENGTH,
            width: PITCH_WIDTH,
        }
    }

    pub fn flow() -> Self {
        Self {
            x_bins: 6,
            y_bins: 4,
            length: PITCH_LENGTH,
            width: PITCH_WIDTH,
        }
    }

    /// Bin of a point as `(column, row)`. The far edges belong to the last
    /// bin; points off the pitch have no bin.
    pub fn bin(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if self.x_bins == 0 || self.y_bins == 0 {
            return None;
        }
        if !(0.0..=self.length).contains(&x) || !(0.0..=self.width).contains(&y) {
            return None;
        }
        let column = ((x / self.length) * self.x_bins as f64).floor() as usize;
        let row = ((y / self.width) * self.y_bins as f64).floor() as usize;
        Some((column.min(self.x_bins - 1), row.min(self.y_bins - 1)))
    }

    pub fn x_edges(&self) -> Vec<f64> {
        edges(self.length, self.x_bins)
    }

    pub fn y_edges(&self) -> Vec<f64> {
        edges(self.width, self.y_bins)
    }

    pub fn center(&self, column: usize, row: usize) -> (f64, f64) {
        let dx = self.length / self.x_bins as f64;
        let dy = self.width / self.y_bins as f64;
        ((column as f64 + 0.5) * dx, (row as f64 + 0.5) * dy)
    }

    /// Zero matrix indexed `[row][column]`.
    pub fn zeros(&self) -> Vec<Vec<f64>> {
        vec![vec![0.0; self.x_bins]; self.y_bins]
    }
}

fn edges(extent: f64, bins: usize) -> Vec<f64> {
    (0..=bins)
        .map(|i| extent * i as f64 / bins.max(1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_edge_falls_in_last_bin() {
        let grid = GridSpec::heatmap();
        assert_eq!(grid.bin(120.0, 80.0), Some((19, 19)));
        assert_eq!(grid.bin(0.0, 0.0), Some((0, 0)));
        assert_eq!(grid.bin(120.1, 10.0), None);
        assert_eq!(grid.bin(-1.0, 10.0), None);
    }

    #[test]
    fn flow_grid_bins_are_twenty_units_wide() {
        let grid = GridSpec::flow();
        assert_eq!(grid.bin(10.0, 20.0), Some((0, 1)));
        assert_eq!(grid.x_edges(), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0]);
        assert_eq!(grid.y_edges(), vec![0.0, 20.0, 40.0, 60.0, 80.0]);
        assert_eq!(grid.center(0, 1), (10.0, 30.0));
    }
}
