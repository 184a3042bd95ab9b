//! Drone range calculator.
//!
//! Computes the flood-filled range cells around a point and optionally
//! classifies a CSV of markers against them or writes the cells as GeoJSON.

use anyhow::{Context, Result};
use clap::Parser;
use drone_range::{
    CalculationMethod, CellsToGeoJson, CsvRangeConfig, GeoPoint, RangePlanner, RangeSettings,
    classify_csv,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Drone travel range over the cube-face cell grid.
#[derive(Parser, Debug)]
#[command(name = "drone-range")]
#[command(about = "Computes drone range cells and classifies markers against them")]
struct Args {
    /// Latitude of the range centre in degrees.
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the range centre in degrees.
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Calculation method as "{radius}/{level}", overrides the settings file.
    #[arg(short, long)]
    method: Option<CalculationMethod>,

    /// Settings JSON file.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// CSV of markers to classify.
    #[arg(long, requires = "output")]
    markers: Option<PathBuf>,

    /// Latitude column in the marker CSV.
    #[arg(long, default_value = "lat")]
    lat_column: String,

    /// Longitude column in the marker CSV.
    #[arg(long, default_value = "lng")]
    lng_column: String,

    /// Classified marker CSV output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the range cells as a GeoJSON FeatureCollection.
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => RangeSettings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => RangeSettings::default(),
    };
    if let Some(method) = args.method {
        settings = settings.calculation_method(method);
    }

    let center = GeoPoint::new(args.lat, args.lng)?;
    let planner = RangePlanner::new(settings);
    let range = planner.range(&center)?;

    println!("Method: {}", settings.calculation_method);
    println!("Seed cell: {}", range.seed());
    println!("Range cells: {}", range.len());
    if let Some(key_range) = settings.key_range_meters() {
        println!("Key range: {} m", key_range);
    }

    if let Some(path) = &args.geojson {
        std::fs::write(path, range.to_geojson().to_string())
            .with_context(|| format!("Failed to write GeoJSON: {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    if let (Some(markers), Some(output)) = (&args.markers, &args.output) {
        let config = CsvRangeConfig::from_coords(center, &args.lat_column, &args.lng_column)
            .settings(settings);
        classify_csv(markers, output, &config)
            .with_context(|| format!("Failed to classify markers: {}", markers.display()))?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}
