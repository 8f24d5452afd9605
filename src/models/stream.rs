//! Stream surface-density calibration.
//!
//! Converts a stream's V-band surface brightness into the surface density
//! of member stars the survey can actually catalog, the signal population
//! for gap detection.

use super::ModelError;

/// Expected surface density of detectable stream stars.
pub trait StreamDensityModel {
    /// Stream star density in stars per deg².
    ///
    /// # Arguments
    /// * `surface_brightness` - V-band surface brightness in mag/arcsec²
    /// * `distance_kpc` - Heliocentric distance in kpc
    /// * `mag_limit` - Survey detection limit (apparent r magnitude)
    /// * `fraction` - Fraction of members surviving survey-side quality and
    ///   membership cuts, in (0, 1]
    fn density(
        &self,
        surface_brightness: f64,
        distance_kpc: f64,
        mag_limit: f64,
        fraction: f64,
    ) -> Result<f64, ModelError>;
}

/// Luminosity-scaled stream density model.
///
/// Surface brightness is converted to V-band surface luminosity with the
/// standard relation `Sigma_L = 10^((26.402 - mu)/2.5)` Lsun/pc² (solar
/// absolute magnitude 4.83), scaled to the physical area subtended by one
/// square degree at the stream's distance, and multiplied by a
/// luminosity-function normalization. The magnitude limit enters as the
/// fraction of the main sequence brighter than the limit at that distance.
#[derive(Debug, Clone)]
pub struct LuminosityScaledStreamDensity {
    /// Stars per solar luminosity for the stream population
    stars_per_lsun: f64,
}

impl LuminosityScaledStreamDensity {
    /// Surface-brightness zero point: mu at 1 Lsun/pc² in V
    const MU_ZERO: f64 = 26.402;
    /// Absolute r magnitude of the main-sequence turnoff of an old,
    /// metal-poor population
    const TURNOFF_ABS: f64 = 4.0;
    /// Absolute r magnitude of the bottom of the luminous main sequence
    const FAINT_END_ABS: f64 = 12.0;

    pub fn new(stars_per_lsun: f64) -> Self {
        Self { stars_per_lsun }
    }
}

impl Default for LuminosityScaledStreamDensity {
    fn default() -> Self {
        // Luminosity-function normalization for an old, metal-poor
        // population integrated over the main sequence.
        Self::new(2.0)
    }
}

impl StreamDensityModel for LuminosityScaledStreamDensity {
    fn density(
        &self,
        surface_brightness: f64,
        distance_kpc: f64,
        mag_limit: f64,
        fraction: f64,
    ) -> Result<f64, ModelError> {
        if !(distance_kpc > 0.0) {
            return Err(ModelError::new(format!(
                "stream density needs a positive distance, got {distance_kpc} kpc"
            )));
        }
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ModelError::new(format!(
                "stream member fraction {fraction} outside (0, 1]"
            )));
        }

        let surface_luminosity = 10f64.powf((Self::MU_ZERO - surface_brightness) / 2.5);
        let pc_per_deg = distance_kpc * 1e3 * std::f64::consts::PI / 180.0;
        let luminosity_per_deg2 = surface_luminosity * pc_per_deg * pc_per_deg;

        // Fraction of the main sequence above the survey limit at this
        // distance.
        let dm = 5.0 * (distance_kpc * 1e3).log10() - 5.0;
        let limit_abs = mag_limit - dm;
        let completeness = ((limit_abs - Self::TURNOFF_ABS)
            / (Self::FAINT_END_ABS - Self::TURNOFF_ABS))
            .clamp(0.0, 1.0);

        Ok(luminosity_per_deg2 * self.stars_per_lsun * fraction * completeness)
    }
}
