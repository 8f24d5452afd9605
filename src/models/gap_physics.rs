//! Subhalo gap-formation physics.
//!
//! Analytic description of the density gap a passing dark-matter subhalo
//! carves into a thin stellar stream: the fractional depth of the deficit
//! and its angular extent along the stream.

use super::ModelError;

/// Properties of the gap carved by a subhalo of a given mass.
pub trait GapPhysicsModel {
    /// Theoretical fractional gap depth in [0, 1] for a subhalo of `mass`
    /// solar masses.
    fn gap_depth(&self, mass: f64) -> Result<f64, ModelError>;

    /// Angular full size of the gap in degrees, for a stream at
    /// `distance_kpc`.
    fn gap_size_deg(&self, mass: f64, distance_kpc: f64) -> Result<f64, ModelError>;
}

/// Cube-root scaling model for gap depth and size.
///
/// Both the depth and the physical size of a well-developed gap scale
/// roughly with the cube root of the perturber mass over the subhalo mass
/// range of interest; the normalizations below are set at a reference mass
/// of 10^7 solar masses and the depth saturates at a fully evacuated gap.
#[derive(Debug, Clone)]
pub struct PowerLawGapModel {
    /// Fractional depth produced by the reference mass
    depth_at_reference: f64,
    /// Physical gap size produced by the reference mass, in kpc
    size_kpc_at_reference: f64,
}

impl PowerLawGapModel {
    /// Reference subhalo mass in solar masses
    const REFERENCE_MASS: f64 = 1e7;
    /// Common scaling exponent for depth and size
    const MASS_EXPONENT: f64 = 1.0 / 3.0;

    pub fn new(depth_at_reference: f64, size_kpc_at_reference: f64) -> Self {
        Self {
            depth_at_reference,
            size_kpc_at_reference,
        }
    }

    fn check_mass(mass: f64) -> Result<(), ModelError> {
        if !(mass > 0.0) {
            return Err(ModelError::new(format!(
                "subhalo mass must be positive, got {mass}"
            )));
        }
        Ok(())
    }
}

impl Default for PowerLawGapModel {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

impl GapPhysicsModel for PowerLawGapModel {
    fn gap_depth(&self, mass: f64) -> Result<f64, ModelError> {
        Self::check_mass(mass)?;
        let scale = (mass / Self::REFERENCE_MASS).powf(Self::MASS_EXPONENT);
        Ok((self.depth_at_reference * scale).min(1.0))
    }

    fn gap_size_deg(&self, mass: f64, distance_kpc: f64) -> Result<f64, ModelError> {
        Self::check_mass(mass)?;
        if !(distance_kpc > 0.0) {
            return Err(ModelError::new(format!(
                "gap size needs a positive distance, got {distance_kpc} kpc"
            )));
        }
        let scale = (mass / Self::REFERENCE_MASS).powf(Self::MASS_EXPONENT);
        let size_kpc = self.size_kpc_at_reference * scale;
        Ok((size_kpc / distance_kpc).to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_depth_bounded_and_monotonic() {
        let model = PowerLawGapModel::default();
        let mut prev = 0.0;
        for log_mass in [5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5] {
            let depth = model.gap_depth(10f64.powf(log_mass)).unwrap();
            assert!((0.0..=1.0).contains(&depth));
            assert!(depth >= prev, "depth must not shrink with mass");
            prev = depth;
        }
    }

    #[test]
    fn test_depth_at_reference_mass() {
        let model = PowerLawGapModel::default();
        assert_relative_eq!(model.gap_depth(1e7).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_depth_saturates() {
        let model = PowerLawGapModel::default();
        assert_relative_eq!(model.gap_depth(1e10).unwrap(), 1.0);
    }

    #[test]
    fn test_size_scales_with_mass_and_distance() {
        let model = PowerLawGapModel::default();
        let near = model.gap_size_deg(1e7, 10.0).unwrap();
        let far = model.gap_size_deg(1e7, 20.0).unwrap();
        assert_relative_eq!(near, 2.0 * far, epsilon = 1e-12);

        let heavy = model.gap_size_deg(8e7, 10.0).unwrap();
        assert_relative_eq!(heavy, 2.0 * near, epsilon = 1e-9);
    }

    #[test]
    fn test_reference_size_at_ten_kpc() {
        let model = PowerLawGapModel::default();
        // 0.5 kpc at 10 kpc is 0.05 rad.
        assert_relative_eq!(
            model.gap_size_deg(1e7, 10.0).unwrap(),
            0.05f64.to_degrees(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let model = PowerLawGapModel::default();
        assert!(model.gap_depth(0.0).is_err());
        assert!(model.gap_depth(-1e6).is_err());
        assert!(model.gap_size_deg(1e7, 0.0).is_err());
    }
}
