//! Forecast subhalo gap detectability for a stellar stream
//!
//! Runs the full prediction pipeline for one stream configuration and
//! prints the subhalo-mass / gap-depth / detectable-depth table. A gap is
//! observable where the theoretical depth exceeds the smallest depth
//! detectable above shot noise.
//!
//! Usage:
//! ```
//! cargo run --bin gap_forecast -- --isochrone iso.dat --mock-catalog mock.csv
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tidalgap::{
    GapDetectionPredictor, GridSpec, LsstErrorModel, LuminosityScaledStreamDensity,
    PowerLawGapModel, PredictorConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Forecast subhalo gap detectability in a stellar stream")]
struct Args {
    /// Stream surface brightness in mag/arcsec²
    #[arg(long, default_value_t = 30.0)]
    surface_brightness: f64,

    /// Heliocentric distance of the stream in kpc
    #[arg(long, default_value_t = 20.0)]
    distance_kpc: f64,

    /// Physical stream width in pc
    #[arg(long, default_value_t = 50.0)]
    width_pc: f64,

    /// Isochrone table for the stream population
    #[arg(long, default_value = "iso_a12.0_z0.00020.dat")]
    isochrone: PathBuf,

    /// Mock catalog of the field population (CSV with g,r columns)
    #[arg(long, default_value = "stream_gap_mock.csv")]
    mock_catalog: PathBuf,

    /// Sky area covered by the mock catalog in deg²
    #[arg(long, default_value_t = 100.0)]
    mock_area: f64,

    /// Selection half-width in units of the photometric error
    #[arg(long, default_value_t = 2.0)]
    sigma_threshold: f64,

    /// Latest evolutionary stage kept on the isochrone track
    #[arg(long, default_value_t = 3)]
    max_stage: i32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = PredictorConfig {
        isochrone_path: args.isochrone,
        mock_catalog_path: args.mock_catalog,
        mock_area: args.mock_area,
        grid: GridSpec::default(),
        sigma_threshold: args.sigma_threshold,
        max_stage: args.max_stage,
        ..PredictorConfig::default()
    };

    let error_model = LsstErrorModel::default();
    let stream_model = LuminosityScaledStreamDensity::default();
    let gap_model = PowerLawGapModel::default();
    let predictor = GapDetectionPredictor::new(&error_model, &stream_model, &gap_model, config);

    let prediction = predictor
        .predict(args.surface_brightness, args.distance_kpc, args.width_pc)
        .context("gap detectability forecast failed")?;

    println!(
        "{:>12} {:>12} {:>16} {:>12}",
        "mass [Msun]", "gap depth", "min detectable", "observable"
    );
    for i in 0..prediction.len() {
        let depth = prediction.gap_depths[i];
        let det_frac = prediction.detection_fractions[i];
        println!(
            "{:>12.3e} {:>12.4} {:>16.4} {:>12}",
            prediction.masses[i],
            depth,
            det_frac,
            if depth >= det_frac { "yes" } else { "no" }
        );
    }

    Ok(())
}
