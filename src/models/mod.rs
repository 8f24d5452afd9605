//! Analytic collaborator models for the gap-detectability forecast.
//!
//! The predictor composes two physics collaborators: the expected surface
//! density of stream stars ([`StreamDensityModel`]) and the properties of a
//! subhalo-carved gap ([`GapPhysicsModel`]). Both are injected as trait
//! objects so calibrated replacements can be swapped in without touching
//! the orchestration; the implementations shipped here are analytic
//! stand-ins with documented normalizations.

pub mod gap_physics;
pub mod stream;

pub use gap_physics::{GapPhysicsModel, PowerLawGapModel};
pub use stream::{LuminosityScaledStreamDensity, StreamDensityModel};

use thiserror::Error;

/// Failure of an injected collaborator model.
///
/// Passed through the prediction pipeline unmodified; the pipeline never
/// retries or substitutes a fallback value.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ModelError(String);

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
