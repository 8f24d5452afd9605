//! Generic algorithms shared across the forecasting pipeline.
//!
//! This module provides the spatial index used for nearest-curve-point
//! queries and the sampled-function lookup table used to amortize expensive
//! photometric error-model evaluations.

pub mod kdtree;
pub mod lookup_table;

pub use kdtree::KdTree2;
pub use lookup_table::{LookupError, LookupTable};
