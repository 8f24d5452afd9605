//! Gap-detectability prediction.
//!
//! Composes the photometric error model, the isochrone pipeline, the mock
//! background density, and the stream/gap collaborators into a detection
//! forecast: for a grid of subhalo masses, the theoretical fractional gap
//! depth against the smallest depth observable at 3 sigma given Poisson
//! shot noise in the stream and background populations.
//!
//! Fail-fast throughout: any stage or collaborator error aborts the
//! prediction and surfaces to the caller unchanged. The isochrone and mock
//! catalog files are re-read on every call; nothing is cached.

use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use crate::catalogs::{read_mock_catalog, CatalogError};
use crate::density::{estimate_density, DensityError};
use crate::grid::GridSpec;
use crate::isochrone::{
    distance_modulus, read_isochrone, IsochroneCurve, IsochroneError,
};
use crate::models::{GapPhysicsModel, ModelError, StreamDensityModel};
use crate::photometry::{Band, MagnitudeErrorModel};
use crate::selection::{build_selection_mask, SelectionError};

/// Log10 bounds of the subhalo mass grid, in solar masses.
const MASS_LOG_RANGE: (f64, f64) = (5.5, 8.5);
/// Number of subhalo mass samples.
const MASS_SAMPLES: usize = 10;
/// Detection confidence in sigma for the Poisson criterion.
const DETECTION_SIGMA: f64 = 3.0;

/// Errors surfaced by the prediction pipeline, tagged by failing stage.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("isochrone curve construction failed: {0}")]
    Isochrone(#[from] IsochroneError),

    #[error("selection mask construction failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("mock catalog read failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("background density estimation failed: {0}")]
    Density(#[from] DensityError),

    #[error("collaborator model failed: {0}")]
    Model(#[from] ModelError),
}

/// File inputs and tuning knobs of the prediction pipeline.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Isochrone table for the stream population
    pub isochrone_path: PathBuf,
    /// Mock catalog of the field population
    pub mock_catalog_path: PathBuf,
    /// Sky area covered by the mock catalog, deg²
    pub mock_area: f64,
    /// Color-magnitude grid for the selection region
    pub grid: GridSpec,
    /// Selection half-width in units of the photometric error
    pub sigma_threshold: f64,
    /// Latest evolutionary stage kept on the isochrone track
    pub max_stage: i32,
    /// Magnitude step of the resampled isochrone curve
    pub mag_step: f64,
    /// Fraction of stream members surviving survey-side cuts
    pub stream_fraction: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            isochrone_path: PathBuf::from("iso_a12.0_z0.00020.dat"),
            mock_catalog_path: PathBuf::from("stream_gap_mock.csv"),
            mock_area: 100.0,
            grid: GridSpec::default(),
            sigma_threshold: 2.0,
            max_stage: 3,
            mag_step: 0.01,
            stream_fraction: 0.6,
        }
    }
}

/// Detection forecast over the subhalo mass grid; the three arrays are
/// parallel and index by mass sample.
#[derive(Debug, Clone)]
pub struct GapPrediction {
    /// Subhalo masses in solar masses
    pub masses: Vec<f64>,
    /// Theoretical fractional gap depths
    pub gap_depths: Vec<f64>,
    /// Smallest fractional depth detectable at 3 sigma
    pub detection_fractions: Vec<f64>,
}

impl GapPrediction {
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

/// Orchestrates a full gap-detectability forecast from injected
/// collaborators.
pub struct GapDetectionPredictor<'a> {
    error_model: &'a dyn MagnitudeErrorModel,
    stream_model: &'a dyn StreamDensityModel,
    gap_model: &'a dyn GapPhysicsModel,
    config: PredictorConfig,
}

impl<'a> GapDetectionPredictor<'a> {
    pub fn new(
        error_model: &'a dyn MagnitudeErrorModel,
        stream_model: &'a dyn StreamDensityModel,
        gap_model: &'a dyn GapPhysicsModel,
        config: PredictorConfig,
    ) -> Self {
        Self {
            error_model,
            stream_model,
            gap_model,
            config,
        }
    }

    /// Background density of field stars passing the stream's
    /// color-magnitude selection, in stars per deg².
    ///
    /// Reads the configured isochrone and mock catalog, builds the
    /// selection mask for a stream at `distance_kpc`, and counts the mock
    /// stars inside it.
    pub fn background_density(&self, distance_kpc: f64) -> Result<f64, PredictError> {
        let dm = distance_modulus(distance_kpc);
        let table = read_isochrone(&self.config.isochrone_path)?;
        let curve = IsochroneCurve::build(&table, self.config.max_stage, dm, self.config.mag_step)?;
        let mask = build_selection_mask(
            &curve,
            self.error_model,
            &self.config.grid,
            self.config.sigma_threshold,
        )?;
        let catalog = read_mock_catalog(&self.config.mock_catalog_path)?;
        let mag_limit = self.error_model.mag_limit(Band::R);

        let density = estimate_density(
            &catalog,
            &mask,
            &self.config.grid,
            mag_limit,
            self.config.mock_area,
        )?;
        Ok(density)
    }

    /// Forecast gap detectability for a stream.
    ///
    /// # Arguments
    /// * `surface_brightness` - Stream surface brightness in mag/arcsec²
    /// * `distance_kpc` - Heliocentric distance in kpc
    /// * `width_pc` - Physical stream width in pc
    pub fn predict(
        &self,
        surface_brightness: f64,
        distance_kpc: f64,
        width_pc: f64,
    ) -> Result<GapPrediction, PredictError> {
        let width_deg = (width_pc / (distance_kpc * 1e3)).to_degrees();
        let masses = subhalo_mass_grid();

        let mut gap_depths = Vec::with_capacity(masses.len());
        let mut gap_sizes_deg = Vec::with_capacity(masses.len());
        for &mass in &masses {
            gap_depths.push(self.gap_model.gap_depth(mass)?);
            gap_sizes_deg.push(self.gap_model.gap_size_deg(mass, distance_kpc)?);
        }

        let mag_limit = self.error_model.mag_limit(Band::R);
        let density_bg = self.background_density(distance_kpc)?;
        let density_stream = self.stream_model.density(
            surface_brightness,
            distance_kpc,
            mag_limit,
            self.config.stream_fraction,
        )?;
        info!(
            "densities: background {density_bg:.4} stream {density_stream:.4} stars/deg²"
        );

        let mut detection_fractions = Vec::with_capacity(masses.len());
        for (&mass, &size_deg) in masses.iter().zip(&gap_sizes_deg) {
            // Expected counts in the gap aperture: stream width times the
            // full gap extent.
            let n_bg = density_bg * width_deg * size_deg * 2.0;
            let n_stream = density_stream * width_deg * size_deg * 2.0;
            let det_frac = detection_fraction(n_bg, n_stream);
            debug!(
                "mass {mass:.3e}: N_stream {n_stream:.2} N_bg {n_bg:.2} det_frac {det_frac:.4}"
            );
            detection_fractions.push(det_frac);
        }

        Ok(GapPrediction {
            masses,
            gap_depths,
            detection_fractions,
        })
    }
}

/// Subhalo masses sampled log-uniformly over the standard range.
fn subhalo_mass_grid() -> Vec<f64> {
    let (lo, hi) = MASS_LOG_RANGE;
    let step = (hi - lo) / (MASS_SAMPLES - 1) as f64;
    (0..MASS_SAMPLES)
        .map(|i| 10f64.powf(lo + i as f64 * step))
        .collect()
}

/// Smallest fractional gap depth detectable at [`DETECTION_SIGMA`] given
/// Poisson shot noise in both populations.
fn detection_fraction(n_bg: f64, n_stream: f64) -> f64 {
    DETECTION_SIGMA * (n_bg + n_stream).sqrt() / n_stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mass_grid_spans_standard_range() {
        let masses = subhalo_mass_grid();
        assert_eq!(masses.len(), 10);
        assert_relative_eq!(masses[0], 10f64.powf(5.5), max_relative = 1e-12);
        assert_relative_eq!(masses[9], 10f64.powf(8.5), max_relative = 1e-12);
        for pair in masses.windows(2) {
            // Log-uniform spacing: constant ratio between samples.
            assert_relative_eq!(pair[1] / pair[0], 10f64.powf(3.0 / 9.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_detection_fraction_poisson_criterion() {
        // 100 stream stars on zero background: 3*sqrt(100)/100 = 0.3.
        assert_relative_eq!(detection_fraction(0.0, 100.0), 0.3, epsilon = 1e-12);
        // Background inflates the noise term.
        assert!(detection_fraction(300.0, 100.0) > 0.3);
    }

    #[test]
    fn test_detection_fraction_no_stream_is_infinite() {
        assert!(detection_fraction(50.0, 0.0).is_infinite());
    }
}
