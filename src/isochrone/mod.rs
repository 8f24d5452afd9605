//! Stellar isochrone tables and their dense curve resampling.
//!
//! An isochrone table is an ordered sequence of stellar-model points
//! (initial mass, evolutionary stage, g and r absolute magnitudes) for a
//! single age and metallicity. Tables are read from whitespace-delimited
//! text files whose last comment line names the columns, the layout used by
//! the Padova/Girardi isochrone distributions.
//!
//! For nearest-point distance queries the table is too coarse: segments
//! near the turnoff span whole magnitudes. [`IsochroneCurve::build`]
//! resamples the track piecewise-linearly so that consecutive samples
//! differ by at most a fixed magnitude step in whichever band changes
//! faster, and shifts the result to apparent magnitudes via the distance
//! modulus.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use thiserror::Error;

/// Errors raised while reading or resampling an isochrone.
#[derive(Debug, Error)]
pub enum IsochroneError {
    #[error("failed to read isochrone file: {0}")]
    Io(#[from] std::io::Error),

    /// No `#`-prefixed header line was found before the data rows
    #[error("isochrone table has no column-header comment line")]
    MissingHeader,

    /// A required column is absent from the header
    #[error("isochrone table is missing required column '{0}'")]
    MissingColumn(String),

    /// A data row could not be parsed
    #[error("malformed isochrone row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Fewer than two points survive the stage filter, so no segment can
    /// be interpolated
    #[error("isochrone has {0} usable points after stage filtering, need at least 2")]
    TooFewPoints(usize),
}

/// One stellar-model point of an isochrone table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsochronePoint {
    /// Initial stellar mass in solar masses
    pub initial_mass: f64,
    /// Evolutionary stage code (0 = lower main sequence, larger = later)
    pub stage: i32,
    /// Absolute g-band magnitude
    pub g: f64,
    /// Absolute r-band magnitude
    pub r: f64,
}

/// An isochrone: points ordered monotonically by initial mass along a
/// single evolutionary sequence.
#[derive(Debug, Clone)]
pub struct IsochroneTable {
    pub points: Vec<IsochronePoint>,
}

impl IsochroneTable {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Column names required of an isochrone table header.
const COL_MASS: &str = "M_ini";
const COL_STAGE: &str = "stage";
const COL_G: &str = "DES-g";
const COL_R: &str = "DES-r";

/// Read an isochrone table from a whitespace-delimited text file.
///
/// Comment lines start with `#`; the last comment line before the data is
/// taken as the column header and must name the `M_ini`, `stage`, `DES-g`
/// and `DES-r` columns.
pub fn read_isochrone<P: AsRef<Path>>(path: P) -> Result<IsochroneTable, IsochroneError> {
    let file = File::open(path.as_ref())?;
    let table = parse_isochrone(BufReader::new(file))?;
    debug!(
        "read isochrone {} ({} points)",
        path.as_ref().display(),
        table.len()
    );
    Ok(table)
}

/// Parse an isochrone table from any buffered reader. See [`read_isochrone`].
pub fn parse_isochrone<R: BufRead>(reader: R) -> Result<IsochroneTable, IsochroneError> {
    let mut header: Option<Vec<String>> = None;
    let mut columns: Option<(usize, usize, usize, usize)> = None;
    let mut points = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(names) = trimmed.strip_prefix('#') {
            // Later comment lines override earlier ones; the header is the
            // last comment before the data.
            if columns.is_none() {
                header = Some(names.split_whitespace().map(str::to_owned).collect());
            }
            continue;
        }

        let (mass_col, stage_col, g_col, r_col) = match columns {
            Some(cols) => cols,
            None => {
                let names = header.take().ok_or(IsochroneError::MissingHeader)?;
                let find = |name: &str| {
                    names
                        .iter()
                        .position(|n| n == name)
                        .ok_or_else(|| IsochroneError::MissingColumn(name.to_owned()))
                };
                let cols = (find(COL_MASS)?, find(COL_STAGE)?, find(COL_G)?, find(COL_R)?);
                columns = Some(cols);
                cols
            }
        };

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let field = |col: usize| -> Result<f64, IsochroneError> {
            let raw = fields
                .get(col)
                .ok_or_else(|| IsochroneError::MalformedRow {
                    line: line_no + 1,
                    reason: format!("expected at least {} fields, found {}", col + 1, fields.len()),
                })?;
            raw.parse::<f64>().map_err(|_| IsochroneError::MalformedRow {
                line: line_no + 1,
                reason: format!("'{raw}' is not a number"),
            })
        };

        points.push(IsochronePoint {
            initial_mass: field(mass_col)?,
            stage: field(stage_col)? as i32,
            g: field(g_col)?,
            r: field(r_col)?,
        });
    }

    if columns.is_none() {
        return Err(IsochroneError::MissingHeader);
    }
    Ok(IsochroneTable { points })
}

/// Distance modulus for a distance given in kiloparsecs.
pub fn distance_modulus(distance_kpc: f64) -> f64 {
    5.0 * (distance_kpc * 1e3).log10() - 5.0
}

/// A densely resampled isochrone track in apparent (g, r) magnitude space.
///
/// Recomputed per prediction; never cached across calls.
#[derive(Debug, Clone)]
pub struct IsochroneCurve {
    /// Apparent g magnitudes of the samples, in track order
    pub g: Vec<f64>,
    /// Apparent r magnitudes of the samples, in track order
    pub r: Vec<f64>,
}

impl IsochroneCurve {
    /// Resample `table` into a dense piecewise-linear curve.
    ///
    /// Rows with `stage > max_stage` are dropped (keeping the main sequence
    /// through the early giant branch for the default of 3). Each surviving
    /// segment is sampled with `floor(max(|dg|, |dr|)/mag_step) + 2` points
    /// so consecutive samples never differ by more than `mag_step` in the
    /// faster-changing band. Both bands are shifted by `distance_modulus`.
    pub fn build(
        table: &IsochroneTable,
        max_stage: i32,
        distance_modulus: f64,
        mag_step: f64,
    ) -> Result<Self, IsochroneError> {
        let rows: Vec<&IsochronePoint> = table
            .points
            .iter()
            .filter(|p| p.stage <= max_stage)
            .collect();
        if rows.len() < 2 {
            return Err(IsochroneError::TooFewPoints(rows.len()));
        }

        let mut g = Vec::new();
        let mut r = Vec::new();
        for pair in rows.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let span = (b.g - a.g).abs().max((b.r - a.r).abs());
            let n = (span / mag_step).floor() as usize + 2;
            for k in 0..n {
                let t = k as f64 / (n - 1) as f64;
                g.push(a.g + t * (b.g - a.g) + distance_modulus);
                r.push(a.r + t * (b.r - a.r) + distance_modulus);
            }
        }

        debug!(
            "resampled isochrone: {} rows -> {} curve points",
            rows.len(),
            g.len()
        );
        Ok(Self { g, r })
    }

    /// Curve samples as (g, r) pairs, in track order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.g.iter().copied().zip(self.r.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.g.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g.is_empty()
    }
}
