//! Regular color-magnitude grid and the boolean selection mask over it.
//!
//! The grid covers (color, magnitude) space with fixed bin widths. Bin
//! counts are derived once at construction from `ceil((max - min)/step)`,
//! so every consumer sees the same exact shape; nothing downstream steps
//! through floating-point ranges. Cell coordinates are bin origins
//! (`min + i*step`), matching histogram binning of catalog stars with
//! `floor((value - min)/step)`.

use ndarray::Array2;
use thiserror::Error;

/// Errors raised by grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid {axis} bounds ({min}, {max}): min must be less than max")]
    InvalidBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid {axis} step {step}: must be positive")]
    InvalidStep { axis: &'static str, step: f64 },
}

/// Specification of a regular 2D grid over (color, magnitude) space.
#[derive(Debug, Clone)]
pub struct GridSpec {
    color_min: f64,
    color_step: f64,
    n_color: usize,
    mag_min: f64,
    mag_step: f64,
    n_mag: usize,
}

impl GridSpec {
    /// Create a grid from per-axis `(min, max, step)` bounds.
    ///
    /// Bin counts are fixed here as `ceil((max - min)/step)`; the final bin
    /// may extend past `max`.
    pub fn new(
        color_min: f64,
        color_max: f64,
        color_step: f64,
        mag_min: f64,
        mag_max: f64,
        mag_step: f64,
    ) -> Result<Self, GridError> {
        let bins = |axis: &'static str, min: f64, max: f64, step: f64| {
            if !(min < max) {
                return Err(GridError::InvalidBounds { axis, min, max });
            }
            if !(step > 0.0) {
                return Err(GridError::InvalidStep { axis, step });
            }
            Ok(((max - min) / step).ceil() as usize)
        };

        Ok(Self {
            color_min,
            color_step,
            n_color: bins("color", color_min, color_max, color_step)?,
            mag_min,
            mag_step,
            n_mag: bins("magnitude", mag_min, mag_max, mag_step)?,
        })
    }

    /// Number of color bins.
    pub fn n_color(&self) -> usize {
        self.n_color
    }

    /// Number of magnitude bins.
    pub fn n_mag(&self) -> usize {
        self.n_mag
    }

    /// Color coordinate (bin origin) of color bin `i`.
    pub fn color_value(&self, i: usize) -> f64 {
        self.color_min + i as f64 * self.color_step
    }

    /// Magnitude coordinate (bin origin) of magnitude bin `j`.
    pub fn mag_value(&self, j: usize) -> f64 {
        self.mag_min + j as f64 * self.mag_step
    }

    /// Bin index of `color`, or `None` if it falls outside the grid.
    pub fn color_bin(&self, color: f64) -> Option<usize> {
        Self::bin(color, self.color_min, self.color_step, self.n_color)
    }

    /// Bin index of `mag`, or `None` if it falls outside the grid.
    pub fn mag_bin(&self, mag: f64) -> Option<usize> {
        Self::bin(mag, self.mag_min, self.mag_step, self.n_mag)
    }

    fn bin(value: f64, min: f64, step: f64, n: usize) -> Option<usize> {
        let idx = ((value - min) / step).floor();
        if idx < 0.0 || idx >= n as f64 {
            return None;
        }
        Some(idx as usize)
    }
}

impl Default for GridSpec {
    /// The standard stream-search window: color in [-0.3, 1.2), magnitude
    /// in [15, 28), both at 0.01 bins.
    fn default() -> Self {
        Self::new(-0.3, 1.2, 0.01, 15.0, 28.0, 0.01)
            .expect("default grid bounds are valid")
    }
}

/// Boolean grid marking the cells consistent with the isochrone track.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMask {
    cells: Array2<bool>,
}

impl SelectionMask {
    /// All-false mask with the shape of `grid`.
    pub fn empty(grid: &GridSpec) -> Self {
        Self {
            cells: Array2::from_elem((grid.n_color(), grid.n_mag()), false),
        }
    }

    /// Mask shape as (n_color, n_mag).
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Whether cell (i, j) is inside the selection region; out-of-range
    /// indices are outside by definition.
    pub fn is_selected(&self, i: usize, j: usize) -> bool {
        self.cells.get((i, j)).copied().unwrap_or(false)
    }

    pub fn set(&mut self, i: usize, j: usize, selected: bool) {
        self.cells[(i, j)] = selected;
    }

    /// Number of selected cells.
    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// The underlying boolean array.
    pub fn cells(&self) -> &Array2<bool> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid_shape() {
        let grid = GridSpec::default();
        assert_eq!(grid.n_color(), 150);
        assert_eq!(grid.n_mag(), 1300);
    }

    #[test]
    fn test_bin_counts_from_ceil() {
        let grid = GridSpec::new(0.0, 1.05, 0.5, 0.0, 2.0, 1.0).unwrap();
        assert_eq!(grid.n_color(), 3);
        assert_eq!(grid.n_mag(), 2);
    }

    #[test]
    fn test_cell_coordinates_are_bin_origins() {
        let grid = GridSpec::default();
        assert_relative_eq!(grid.color_value(0), -0.3, epsilon = 1e-12);
        assert_relative_eq!(grid.color_value(1), -0.29, epsilon = 1e-12);
        assert_relative_eq!(grid.mag_value(0), 15.0, epsilon = 1e-12);
        assert_relative_eq!(grid.mag_value(100), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_binning() {
        let grid = GridSpec::default();
        assert_eq!(grid.color_bin(-0.3), Some(0));
        assert_eq!(grid.color_bin(0.0), Some(30));
        assert_eq!(grid.color_bin(-0.31), None);
        assert_eq!(grid.color_bin(1.3), None);
        assert_eq!(grid.mag_bin(15.0), Some(0));
        assert_eq!(grid.mag_bin(27.995), Some(1299));
        assert_eq!(grid.mag_bin(28.5), None);
        assert_eq!(grid.mag_bin(14.9), None);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(matches!(
            GridSpec::new(1.0, -1.0, 0.1, 15.0, 28.0, 0.01),
            Err(GridError::InvalidBounds { axis: "color", .. })
        ));
        assert!(matches!(
            GridSpec::new(-0.3, 1.2, 0.0, 15.0, 28.0, 0.01),
            Err(GridError::InvalidStep { axis: "color", .. })
        ));
        assert!(matches!(
            GridSpec::new(-0.3, 1.2, 0.01, 28.0, 15.0, 0.01),
            Err(GridError::InvalidBounds { axis: "magnitude", .. })
        ));
    }

    #[test]
    fn test_mask_roundtrip() {
        let grid = GridSpec::new(0.0, 1.0, 0.5, 0.0, 1.0, 0.5).unwrap();
        let mut mask = SelectionMask::empty(&grid);
        assert_eq!(mask.shape(), (2, 2));
        assert_eq!(mask.selected_count(), 0);

        mask.set(1, 0, true);
        assert!(mask.is_selected(1, 0));
        assert!(!mask.is_selected(0, 0));
        assert!(!mask.is_selected(5, 5));
        assert_eq!(mask.selected_count(), 1);
    }
}
