//! Stream-gap detectability forecasting
//!
//! This crate estimates whether a density gap carved into a stellar tidal
//! stream by a passing dark-matter subhalo would be detectable by a given
//! photometric survey. It combines a survey photometric-noise model, an
//! isochrone-based selection region in color-magnitude space, a background
//! density estimated from a synthetic mock catalog, and an analytic gap
//! formation model into a detection-significance curve over subhalo mass.

pub mod algo;
pub mod catalogs;
pub mod density;
pub mod grid;
pub mod isochrone;
pub mod models;
pub mod photometry;
pub mod predict;
pub mod selection;

// Re-exports for easier access
pub use catalogs::{read_mock_catalog, MockCatalog};
pub use density::estimate_density;
pub use grid::{GridSpec, SelectionMask};
pub use isochrone::{distance_modulus, read_isochrone, IsochroneCurve, IsochroneTable};
pub use models::{
    GapPhysicsModel, LuminosityScaledStreamDensity, ModelError, PowerLawGapModel,
    StreamDensityModel,
};
pub use photometry::{Band, LsstErrorModel, MagnitudeErrorModel};
pub use predict::{GapDetectionPredictor, GapPrediction, PredictError, PredictorConfig};
pub use selection::build_selection_mask;
