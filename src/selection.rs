//! Isochrone selection-region construction.
//!
//! Separates stream-like stars from the general field by marking the region
//! of color-magnitude space statistically consistent with a stream's
//! isochrone track. For every grid cell the nearest point on the densely
//! resampled curve is found in raw (g, r) magnitude space, and the cell is
//! selected when both per-band residuals are within `sigma_threshold` times
//! the survey's photometric error at that magnitude.
//!
//! The nearest-point metric is deliberately unweighted; residuals are
//! evaluated per band against band-specific errors afterwards. Cells
//! outside the curve's magnitude span still resolve to the nearest curve
//! endpoint, so the selection region closes smoothly around the track's
//! ends rather than cutting off.

use log::debug;
use thiserror::Error;

use crate::algo::{KdTree2, LookupError, LookupTable};
use crate::grid::{GridSpec, SelectionMask};
use crate::isochrone::IsochroneCurve;
use crate::photometry::{Band, MagnitudeErrorModel};

/// Magnitude span of the precomputed photometric-error table.
const ERROR_TABLE_RANGE: (f64, f64) = (15.0, 28.0);
/// Sample count of the precomputed photometric-error table.
const ERROR_TABLE_SAMPLES: usize = 1000;
/// Floor on the per-band magnitude error, keeps the sigma test bounded for
/// bright stars where the model error collapses.
const MIN_MAG_ERROR: f64 = 0.01;

/// Errors raised while building a selection mask.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The isochrone curve has no sample points to query against
    #[error("isochrone curve has no sample points")]
    EmptyCurve,

    #[error("failed to build photometric error table: {0}")]
    ErrorTable(#[from] LookupError),
}

/// Build the boolean selection mask for `grid` around `curve`.
///
/// The error model is evaluated through a fixed 1000-point lookup table
/// over magnitudes [15, 28] (model calls are treated as expensive), clamped
/// at the table edges and floored at 0.01 mag.
///
/// Deterministic and side-effect free for fixed inputs; the selected region
/// grows monotonically with `sigma_threshold`.
pub fn build_selection_mask(
    curve: &IsochroneCurve,
    error_model: &dyn MagnitudeErrorModel,
    grid: &GridSpec,
    sigma_threshold: f64,
) -> Result<SelectionMask, SelectionError> {
    let points: Vec<(f64, f64)> = curve.points().collect();
    if points.is_empty() {
        return Err(SelectionError::EmptyCurve);
    }
    let tree = KdTree2::new(&points);

    let (err_min, err_max) = ERROR_TABLE_RANGE;
    let g_err = LookupTable::sample(err_min, err_max, ERROR_TABLE_SAMPLES, |m| {
        error_model.mag_error(m, Band::G)
    })?;
    let r_err = LookupTable::sample(err_min, err_max, ERROR_TABLE_SAMPLES, |m| {
        error_model.mag_error(m, Band::R)
    })?;

    let mut mask = SelectionMask::empty(grid);
    for i in 0..grid.n_color() {
        let color = grid.color_value(i);
        for j in 0..grid.n_mag() {
            let r = grid.mag_value(j);
            let g = color + r;

            let (nearest, _) = tree
                .nearest((g, r))
                .expect("tree built from non-empty curve");
            let (curve_g, curve_r) = points[nearest];

            let eg = g_err.eval(g).max(MIN_MAG_ERROR);
            let er = r_err.eval(r).max(MIN_MAG_ERROR);

            let dg = g - curve_g;
            let dr = r - curve_r;
            if (dg / eg).abs() < sigma_threshold && (dr / er).abs() < sigma_threshold {
                mask.set(i, j, true);
            }
        }
    }

    debug!(
        "selection mask: {} of {} cells selected at {} sigma",
        mask.selected_count(),
        grid.n_color() * grid.n_mag(),
        sigma_threshold
    );
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat error model for predictable selection widths.
    struct ConstErrorModel(f64);

    impl MagnitudeErrorModel for ConstErrorModel {
        fn mag_error(&self, _mag: f64, _band: Band) -> f64 {
            self.0
        }

        fn mag_limit(&self, _band: Band) -> f64 {
            27.0
        }
    }

    fn test_grid() -> GridSpec {
        GridSpec::new(-0.3, 1.2, 0.05, 15.0, 28.0, 0.1).unwrap()
    }

    /// Straight track at constant color 0.5 spanning r = 18..24.
    fn straight_curve() -> IsochroneCurve {
        let r: Vec<f64> = (0..=600).map(|i| 18.0 + i as f64 * 0.01).collect();
        let g: Vec<f64> = r.iter().map(|r| r + 0.5).collect();
        IsochroneCurve { g, r }
    }

    #[test]
    fn test_empty_curve_rejected() {
        let curve = IsochroneCurve {
            g: vec![],
            r: vec![],
        };
        let result = build_selection_mask(&curve, &ConstErrorModel(0.1), &test_grid(), 2.0);
        assert!(matches!(result, Err(SelectionError::EmptyCurve)));
    }

    #[test]
    fn test_deterministic() {
        let curve = straight_curve();
        let grid = test_grid();
        let model = ConstErrorModel(0.1);
        let a = build_selection_mask(&curve, &model, &grid, 2.0).unwrap();
        let b = build_selection_mask(&curve, &model, &grid, 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_selects_on_curve_cells_only() {
        let curve = straight_curve();
        let grid = test_grid();
        let mask = build_selection_mask(&curve, &ConstErrorModel(0.1), &grid, 2.0).unwrap();

        // A cell sitting on the track: color 0.5, r 20.0.
        let on_i = grid.color_bin(0.5).unwrap();
        let on_j = grid.mag_bin(20.0).unwrap();
        assert!(mask.is_selected(on_i, on_j));

        // Same magnitude, color far off the track (residual 10 sigma).
        let off_i = grid.color_bin(-0.2).unwrap();
        assert!(!mask.is_selected(off_i, on_j));

        // Same color, magnitude far below the faint end of the track.
        let faint_j = grid.mag_bin(27.0).unwrap();
        assert!(!mask.is_selected(on_i, faint_j));
    }

    #[test]
    fn test_monotonic_in_sigma_threshold() {
        let curve = straight_curve();
        let grid = test_grid();
        let model = ConstErrorModel(0.1);
        let narrow = build_selection_mask(&curve, &model, &grid, 1.0).unwrap();
        let wide = build_selection_mask(&curve, &model, &grid, 3.0).unwrap();

        assert!(wide.selected_count() > narrow.selected_count());
        for i in 0..grid.n_color() {
            for j in 0..grid.n_mag() {
                if narrow.is_selected(i, j) {
                    assert!(
                        wide.is_selected(i, j),
                        "cell ({i}, {j}) lost when widening the threshold"
                    );
                }
            }
        }
    }

    #[test]
    fn test_endpoint_extrapolation_beyond_track() {
        let curve = straight_curve();
        let grid = test_grid();
        let mask = build_selection_mask(&curve, &ConstErrorModel(0.1), &grid, 2.0).unwrap();

        // Just past the bright end of the track the nearest assignment is
        // the endpoint and the residual is still inside the threshold.
        let i = grid.color_bin(0.5).unwrap();
        let near_j = grid.mag_bin(17.9).unwrap();
        assert!(mask.is_selected(i, near_j));

        // Well past it the endpoint residual exceeds the threshold.
        let far_j = grid.mag_bin(16.0).unwrap();
        assert!(!mask.is_selected(i, far_j));
    }
}
