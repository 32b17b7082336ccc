//! Command implementations for the NWQ CLI.
//!
//! Every command loads the registry once, answers one request, and writes
//! the resulting payload as JSON to stdout for the renderer.

use anyhow::Context;
use clap::{Args, Subcommand};
use nwq_registry::config::DEFAULT_YEARS;
use nwq_registry::{DatasetRegistry, RegistryConfig};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

pub mod map;
pub mod sensor;

/// Where the survey data lives and how to read it.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Directory holding {year}.csv, wards.geojson and sensor.csv
    #[arg(short = 'd', long, default_value = "fixtures")]
    pub data_dir: PathBuf,

    /// JSON manifest naming the files explicitly (overrides --data-dir)
    #[arg(short = 'm', long)]
    pub manifest: Option<PathBuf>,

    /// Survey years to load, comma separated (default: 2021,2022,2023)
    #[arg(long, value_delimiter = ',')]
    pub years: Vec<String>,

    /// Spatial match tolerance in degrees
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl DataArgs {
    /// Build the registry configuration from the flags.
    pub fn config(&self) -> anyhow::Result<RegistryConfig> {
        let config = match &self.manifest {
            Some(manifest) => {
                let config = RegistryConfig::from_manifest(manifest)
                    .with_context(|| format!("reading manifest {}", manifest.display()))?;
                if self.years.is_empty() {
                    config
                } else {
                    config.select_years(&self.years)?
                }
            }
            None if self.years.is_empty() => {
                RegistryConfig::from_data_dir(&self.data_dir, DEFAULT_YEARS)
            }
            None => RegistryConfig::from_data_dir(&self.data_dir, self.years.iter().cloned()),
        };
        Ok(match self.tolerance {
            Some(tolerance) => config.with_tolerance(tolerance),
            None => config,
        })
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Map markers, statistics and ward overlay for one survey year
    Map {
        /// Survey year to plot
        #[arg(long)]
        year: String,

        /// Earlier/later year to match sample locations against
        #[arg(long)]
        compare: Option<String>,

        /// Leave the ward boundaries out of the payload
        #[arg(long)]
        no_boundaries: bool,
    },

    /// Mean/median/exceedance statistics (all years when --year is omitted)
    Stats {
        #[arg(long)]
        year: Option<String>,
    },

    /// IoT sensor series and seasonal summary
    Sensor {
        /// Parameters to chart, comma separated (default: TDS,pH)
        #[arg(long, value_delimiter = ',')]
        parameters: Vec<String>,

        /// Print the plain-text seasonal report instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// List the loaded survey years
    Years,
}

/// Write `value` as one JSON document followed by a newline.
pub fn emit<T: Serialize, W: Write>(value: &T, pretty: bool, out: &mut W) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Answer one command against a loaded registry.
pub fn execute<W: Write>(
    registry: &DatasetRegistry,
    command: &Command,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Map {
            year,
            compare,
            no_boundaries,
        } => map::run_map(registry, year, compare.as_deref(), !no_boundaries, pretty, out),
        Command::Stats { year } => map::run_stats(registry, year.as_deref(), pretty, out),
        Command::Sensor { parameters, text } => {
            sensor::run_sensor(registry, parameters, *text, pretty, out)
        }
        Command::Years => emit(&registry.years(), pretty, out),
    }
}

pub fn run(data: &DataArgs, command: Command) -> anyhow::Result<()> {
    let config = data.config()?;
    let registry = DatasetRegistry::load(&config).context("loading survey data")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&registry, &command, data.pretty, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        data: DataArgs,
        #[command(subcommand)]
        command: Command,
    }

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    #[test]
    fn parses_map_command_with_comparison() {
        let cli = TestCli::try_parse_from([
            "nwq", "--years", "2021,2022", "map", "--year", "2022", "--compare", "2021",
        ])
        .unwrap();
        assert_eq!(cli.data.years, vec!["2021", "2022"]);
        match cli.command {
            Command::Map {
                year,
                compare,
                no_boundaries,
            } => {
                assert_eq!(year, "2022");
                assert_eq!(compare.as_deref(), Some("2021"));
                assert!(!no_boundaries);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_from_data_dir_flags() {
        let data = DataArgs {
            data_dir: fixtures_dir(),
            manifest: None,
            years: vec![],
            tolerance: Some(0.5),
            pretty: false,
        };
        let config = data.config().unwrap();
        assert_eq!(config.datasets.len(), 3);
        assert_eq!(config.tolerance, 0.5);
    }

    #[test]
    fn config_from_manifest_with_year_subset() {
        let data = DataArgs {
            data_dir: PathBuf::from("unused"),
            manifest: Some(fixtures_dir().join("manifest.json")),
            years: vec!["2023".to_string()],
            tolerance: None,
            pretty: false,
        };
        let config = data.config().unwrap();
        assert_eq!(config.datasets.len(), 1);
        assert_eq!(config.datasets[0].year, "2023");
    }

    #[test]
    fn years_command_lists_years() {
        let data = DataArgs {
            data_dir: fixtures_dir(),
            manifest: None,
            years: vec![],
            tolerance: None,
            pretty: false,
        };
        let registry = DatasetRegistry::load(&data.config().unwrap()).unwrap();
        let mut out = Vec::new();
        execute(&registry, &Command::Years, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\"2021\",\"2022\",\"2023\"]\n");
    }
}
