//! CSV export of a simulation series.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use chrono::Utc;
use shared::protocol::{SimulationPoint, SimulationResult};

pub const DEFAULT_CSV_FILE_NAME: &str = "reactor_simulation_results.csv";

#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Prefix the table with `#` comment lines describing the run.
    pub include_metadata: bool,
}

type Column = (&'static str, fn(&SimulationPoint) -> Option<f64>);

const COLUMNS: &[Column] = &[
    ("time", |point| Some(point.time)),
    ("conversion", |point| Some(point.conversion)),
    ("temperature", |point| point.temperature),
    ("coolingTemperature", |point| point.cooling_temperature),
    ("equilibriumConversion", |point| point.equilibrium_conversion),
    ("concentrationA", |point| point.concentration_a),
    ("concentrationB", |point| point.concentration_b),
    ("concentrationC", |point| point.concentration_c),
    ("concentrationD", |point| point.concentration_d),
    ("heatGenerated", |point| point.heat_generated),
    ("heatRemoved", |point| point.heat_removed),
    ("inverseRate", |point| point.inverse_rate),
];

/// Writes one row per point. Optional columns appear only when some point has them.
pub fn write_csv<W: Write>(
    result: &SimulationResult,
    mut out: W,
    options: &CsvOptions,
) -> std::io::Result<()> {
    let columns: Vec<&Column> = COLUMNS
        .iter()
        .filter(|(_, value)| result.data.iter().any(|point| value(point).is_some()))
        .collect();

    if options.include_metadata {
        writeln!(out, "# Batch Reactor Simulation Results")?;
        writeln!(out, "# Generated: {}", Utc::now().to_rfc3339())?;
        if !result.message.is_empty() {
            writeln!(out, "# Message: {}", result.message)?;
        }
        writeln!(out, "# Points: {}", result.data.len())?;
        writeln!(out, "#")?;
    }

    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    writeln!(out, "{}", header.join(","))?;

    for point in &result.data {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, value)| value(point).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
}

pub fn export_csv(result: &SimulationResult, path: &Path, options: &CsvOptions) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create csv file {}", path.display()))?;
    write_csv(result, BufWriter::new(file), options)
        .with_context(|| format!("failed to write csv file {}", path.display()))
}
