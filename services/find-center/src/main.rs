//! Vortex center finder CLI.
//!
//! Reads a storm-relative wind case from JSON, locates the vortex center and
//! radius of maximum wind, and writes a JSON report. Logs go to stderr so the
//! report can be piped from stdout.

mod input;
mod report;

use anyhow::{Context, Result};
use center_finder::{find_center, CenterFinderConfig, FirstGuess, SearchParams};
use clap::Parser;
use geodesy::KernelKind;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use input::CaseFile;
use report::CenterReport;

#[derive(Parser, Debug)]
#[command(name = "find-center")]
#[command(about = "Locate a tropical cyclone center from a gridded wind field")]
struct Args {
    /// JSON case file with u, v, lat and lon grids
    #[arg(short, long)]
    input: PathBuf,

    /// Report destination (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of azimuthal sectors
    #[arg(long, default_value_t = 8)]
    sectors: usize,

    /// Search window half-width in grid cells
    #[arg(long, default_value_t = 6)]
    spad: usize,

    /// Maximum number of search iterations
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// First-guess longitude (used only together with --first-guess-lat)
    #[arg(long, allow_hyphen_values = true)]
    first_guess_lon: Option<f64>,

    /// First-guess latitude (used only together with --first-guess-lon)
    #[arg(long, allow_hyphen_values = true)]
    first_guess_lat: Option<f64>,

    /// Geodesic kernel: reference or parallel
    #[arg(long)]
    kernel: Option<String>,

    /// Score candidates on a single thread
    #[arg(long)]
    sequential: bool,

    /// Include the vorticity and deviation grids in the report
    #[arg(long)]
    include_diagnostics: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Environment configuration with command-line overrides applied.
    fn config(&self) -> Result<CenterFinderConfig> {
        let mut config = CenterFinderConfig::from_env();
        if let Some(kernel) = &self.kernel {
            config.kernel = KernelKind::from_str(kernel);
        }
        if self.sequential {
            config.parallel_scoring = false;
        }
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
        Ok(config)
    }

    fn params(&self) -> SearchParams {
        SearchParams::new(self.sectors, self.spad, self.iterations)
    }

    fn first_guess(&self) -> Option<FirstGuess> {
        FirstGuess::from_parts(self.first_guess_lon, self.first_guess_lat)
    }
}

fn main() -> Result<()> {
    // VORTEX_* overrides may come from a .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.config()?;
    info!(
        input = %args.input.display(),
        kernel = %config.kernel,
        parallel_scoring = config.parallel_scoring,
        "Starting center finder"
    );

    let report = run(
        &args.input,
        &args.params(),
        args.first_guess(),
        &config,
        args.include_diagnostics,
    )?;
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!(output = %path.display(), "Report written");
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Load a case and find its center.
fn run(
    input: &Path,
    params: &SearchParams,
    first_guess: Option<FirstGuess>,
    config: &CenterFinderConfig,
    include_diagnostics: bool,
) -> Result<CenterReport> {
    let case = CaseFile::from_path(input)
        .with_context(|| format!("reading case file {}", input.display()))?;
    let (wind, grid) = case.into_inputs()?;
    info!(rows = grid.rows(), cols = grid.cols(), "Loaded case");

    let result = find_center(&wind, &grid, params, first_guess, config)?;
    Ok(CenterReport::new(&result, config.kernel.as_str(), include_diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::array_to_rows;
    use std::io::Write;
    use test_utils::{assert_coords_approx_eq, scenarios};

    fn write_case(spec: &test_utils::RankineSpec) -> tempfile::NamedTempFile {
        let case = spec.build();
        let file = CaseFile {
            u: array_to_rows(&case.u),
            v: array_to_rows(&case.v),
            lat: array_to_rows(&case.lat),
            lon: array_to_rows(&case.lon),
        };
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(serde_json::to_string(&file).unwrap().as_bytes())
            .unwrap();
        tmp
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "find-center",
            "--input",
            "case.json",
            "--sectors",
            "4",
            "--first-guess-lon",
            "-60.5",
            "--sequential",
        ]);
        assert_eq!(args.params(), SearchParams::new(4, 6, 5));
        // Latitude missing: the longitude alone is ignored
        assert!(args.first_guess().is_none());
        assert!(args.sequential);
    }

    #[test]
    fn test_run_rankine_case() {
        let tmp = write_case(&scenarios::RANKINE_21X21);
        let report = run(
            tmp.path(),
            &SearchParams::default(),
            None,
            &CenterFinderConfig::default(),
            true,
        )
        .unwrap();

        assert_eq!(report.status, center_finder::SearchStatus::Converged);
        assert_eq!(report.center_index, Some(vortex_common::GridIndex::new(10, 10)));
        assert_eq!(report.rmw_km, Some(10.0));
        assert_coords_approx_eq!(
            (report.center_lat.unwrap(), report.center_lon.unwrap()),
            (scenarios::RANKINE_21X21.center_lat, scenarios::RANKINE_21X21.center_lon),
            1e-9
        );

        let grids = report.grids.as_ref().unwrap();
        assert_eq!(grids.smoothed_vorticity.len(), 21);
        assert_eq!(grids.sector_errors.as_ref().unwrap().len(), 8);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "converged");
        assert_eq!(json["start_source"], "vorticity");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = run(
            &missing,
            &SearchParams::default(),
            None,
            &CenterFinderConfig::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reading case file"));
    }
}
