//! Background stellar-density estimation from a mock catalog.
//!
//! Counts the mock-catalog stars that land inside the isochrone selection
//! region and are brighter than the survey detection limit, then normalizes
//! by the sky area the catalog covers. The result is the surface density of
//! field stars that survive the same color-magnitude cuts as stream
//! members, the contaminating population a stream gap has to be detected
//! against.

use log::debug;
use thiserror::Error;

use crate::catalogs::MockCatalog;
use crate::grid::{GridSpec, SelectionMask};

/// Errors raised by density estimation.
#[derive(Debug, Error)]
pub enum DensityError {
    #[error("invalid survey area {0}: must be positive")]
    InvalidArea(f64),
}

/// Surface density of catalog stars inside the selection region.
///
/// A star contributes when its (color, magnitude) bin falls inside the
/// grid, the selection mask is true at that cell, and its r magnitude is
/// brighter than `mag_limit`. Units follow `survey_area` (conventionally
/// stars per deg² for an area in deg²).
pub fn estimate_density(
    catalog: &MockCatalog,
    mask: &SelectionMask,
    grid: &GridSpec,
    mag_limit: f64,
    survey_area: f64,
) -> Result<f64, DensityError> {
    if !(survey_area > 0.0) {
        return Err(DensityError::InvalidArea(survey_area));
    }

    let mut count = 0usize;
    for (g, r) in catalog.stars() {
        let (Some(i), Some(j)) = (grid.color_bin(g - r), grid.mag_bin(r)) else {
            continue;
        };
        if mask.is_selected(i, j) && r < mag_limit {
            count += 1;
        }
    }

    debug!(
        "background: {count} of {} mock stars selected over {survey_area} area units",
        catalog.len()
    );
    Ok(count as f64 / survey_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> GridSpec {
        GridSpec::default()
    }

    /// Mask with the single cell containing (color, mag) set.
    fn mask_with_cell(grid: &GridSpec, color: f64, mag: f64) -> SelectionMask {
        let mut mask = SelectionMask::empty(grid);
        mask.set(
            grid.color_bin(color).unwrap(),
            grid.mag_bin(mag).unwrap(),
            true,
        );
        mask
    }

    fn one_star(g: f64, r: f64) -> MockCatalog {
        MockCatalog {
            g: vec![g],
            r: vec![r],
        }
    }

    #[test]
    fn test_single_star_in_masked_cell() {
        let grid = grid();
        // Star at color 0.5, r 20.0; its cell is masked true.
        let catalog = one_star(20.5, 20.0);
        let mask = mask_with_cell(&grid, 0.5, 20.0);

        let density = estimate_density(&catalog, &mask, &grid, 27.0, 10.0).unwrap();
        assert_relative_eq!(density, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_star_fainter_than_limit_not_counted() {
        let grid = grid();
        let catalog = one_star(21.3, 20.8);
        let mask = mask_with_cell(&grid, 0.5, 20.8);

        let density = estimate_density(&catalog, &mask, &grid, 20.0, 10.0).unwrap();
        assert_relative_eq!(density, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_star_in_unmasked_cell_not_counted() {
        let grid = grid();
        let catalog = one_star(20.5, 20.0);
        // Mask selects a different cell entirely.
        let mask = mask_with_cell(&grid, 0.9, 22.0);

        let density = estimate_density(&catalog, &mask, &grid, 27.0, 10.0).unwrap();
        assert_relative_eq!(density, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_star_outside_grid_not_counted() {
        let grid = grid();
        let mask = mask_with_cell(&grid, 0.5, 20.0);

        // Color 2.0 is off the color axis; magnitude 14 is off the
        // magnitude axis.
        let red = one_star(22.0, 20.0);
        let bright = one_star(14.5, 14.0);
        assert_relative_eq!(
            estimate_density(&red, &mask, &grid, 27.0, 10.0).unwrap(),
            0.0
        );
        assert_relative_eq!(
            estimate_density(&bright, &mask, &grid, 27.0, 10.0).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_density_scales_inversely_with_area() {
        let grid = grid();
        let catalog = MockCatalog {
            g: vec![20.5, 20.52, 20.48],
            r: vec![20.0, 20.02, 19.98],
        };
        let mut mask = SelectionMask::empty(&grid);
        for (g, r) in catalog.stars() {
            mask.set(grid.color_bin(g - r).unwrap(), grid.mag_bin(r).unwrap(), true);
        }

        let d1 = estimate_density(&catalog, &mask, &grid, 27.0, 50.0).unwrap();
        let d2 = estimate_density(&catalog, &mask, &grid, 27.0, 100.0).unwrap();
        assert!(d1 >= 0.0);
        assert_relative_eq!(d1, 2.0 * d2, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_area_rejected() {
        let grid = grid();
        let catalog = one_star(20.5, 20.0);
        let mask = SelectionMask::empty(&grid);
        assert!(matches!(
            estimate_density(&catalog, &mask, &grid, 27.0, 0.0),
            Err(DensityError::InvalidArea(_))
        ));
        assert!(matches!(
            estimate_density(&catalog, &mask, &grid, 27.0, -5.0),
            Err(DensityError::InvalidArea(_))
        ));
    }
}
