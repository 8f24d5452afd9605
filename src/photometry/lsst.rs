//! LSST photometric error model.
//!
//! Implements the standard LSST photometric performance parametrization:
//! the total error combines a systematic floor with a random component
//!
//! ```text
//! sigma^2      = sigma_sys^2 + sigma_rand^2
//! sigma_rand^2 = (0.04 - gamma) * x + gamma * x^2      [mag^2]
//! x            = 10^(0.4 * (m - m5))
//! ```
//!
//! where `m5` is the 5-sigma point-source depth and `gamma` encodes the
//! sky-background and instrumental-noise properties of the band.

use super::{Band, MagnitudeErrorModel};

/// LSST photometric performance model for the g and r bands.
#[derive(Debug, Clone)]
pub struct LsstErrorModel {
    /// Systematic error floor in magnitudes
    sigma_sys: f64,
}

impl LsstErrorModel {
    /// 10-year coadd 5-sigma depth, g band
    const M5_G: f64 = 27.4;
    /// 10-year coadd 5-sigma depth, r band
    const M5_R: f64 = 27.5;

    /// Band-dependent noise parameter, g band
    const GAMMA_G: f64 = 0.039;
    /// Band-dependent noise parameter, r band
    const GAMMA_R: f64 = 0.039;

    /// Adopted catalog detection limit, g band
    const LIMIT_G: f64 = 27.4;
    /// Adopted catalog detection limit, r band
    const LIMIT_R: f64 = 27.0;

    /// Create a model with the given systematic error floor in magnitudes.
    pub fn new(sigma_sys: f64) -> Self {
        Self { sigma_sys }
    }

    fn band_params(band: Band) -> (f64, f64) {
        match band {
            Band::G => (Self::M5_G, Self::GAMMA_G),
            Band::R => (Self::M5_R, Self::GAMMA_R),
        }
    }
}

impl Default for LsstErrorModel {
    fn default() -> Self {
        // 5 mmag systematic floor from the survey design
        Self::new(0.005)
    }
}

impl MagnitudeErrorModel for LsstErrorModel {
    fn mag_error(&self, mag: f64, band: Band) -> f64 {
        let (m5, gamma) = Self::band_params(band);
        let x = 10f64.powf(0.4 * (mag - m5));
        let sigma_rand_sq = (0.04 - gamma) * x + gamma * x * x;
        (self.sigma_sys * self.sigma_sys + sigma_rand_sq).sqrt()
    }

    fn mag_limit(&self, band: Band) -> f64 {
        match band {
            Band::G => Self::LIMIT_G,
            Band::R => Self::LIMIT_R,
        }
    }
}
