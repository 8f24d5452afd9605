//! Lookup table with linear interpolation for fast function evaluation.
//!
//! Precomputes function values at regular intervals over a fixed domain and
//! linearly interpolates between them. Used to amortize per-magnitude
//! photometric error-model calls, which are treated as expensive: the model
//! is sampled once over the magnitude range and every grid cell is served
//! from the table.
//!
//! Evaluation outside the domain clamps to the nearest endpoint. The tables
//! built here sample smooth monotone error curves, so flat extrapolation at
//! the edges is the intended behavior rather than an error.

use thiserror::Error;

/// Error type for lookup table construction
#[derive(Debug, Error)]
pub enum LookupError {
    /// Domain bounds are inverted or degenerate
    #[error("invalid domain ({min}, {max}): min must be less than max")]
    InvalidDomain { min: f64, max: f64 },

    /// Not enough sample points to interpolate
    #[error("table needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// A sampled function over a fixed domain with linear interpolation.
#[derive(Debug, Clone)]
pub struct LookupTable {
    /// Domain bounds (min, max)
    domain: (f64, f64),
    /// Step size between sample points
    dx: f64,
    /// Precomputed function values
    values: Vec<f64>,
}

impl LookupTable {
    /// Sample `f` at `n_points` regular intervals over `[x_min, x_max]`.
    ///
    /// # Arguments
    /// * `x_min` - Lower bound of the domain
    /// * `x_max` - Upper bound of the domain
    /// * `n_points` - Number of sample points (minimum 2)
    /// * `f` - Function to evaluate at each sample point
    pub fn sample<F>(x_min: f64, x_max: f64, n_points: usize, f: F) -> Result<Self, LookupError>
    where
        F: Fn(f64) -> f64,
    {
        if !(x_min < x_max) {
            return Err(LookupError::InvalidDomain {
                min: x_min,
                max: x_max,
            });
        }
        if n_points < 2 {
            return Err(LookupError::TooFewPoints(n_points));
        }

        let dx = (x_max - x_min) / (n_points - 1) as f64;
        let values = (0..n_points).map(|i| f(x_min + i as f64 * dx)).collect();

        Ok(Self {
            domain: (x_min, x_max),
            dx,
            values,
        })
    }

    /// Evaluate the sampled function at `x` by linear interpolation.
    ///
    /// Values of `x` outside the domain return the nearest endpoint sample.
    pub fn eval(&self, x: f64) -> f64 {
        let (min, max) = self.domain;
        if x <= min {
            return self.values[0];
        }
        if x >= max {
            return self.values[self.values.len() - 1];
        }

        let t = (x - min) / self.dx;
        let i = (t.floor() as usize).min(self.values.len() - 2);
        let frac = t - i as f64;

        self.values[i] * (1.0 - frac) + self.values[i + 1] * frac
    }

    /// Domain bounds of the table.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Number of sample points in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table holds no samples (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
