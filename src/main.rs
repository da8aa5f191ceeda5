//! powernet-sim entry point: CLI wiring and config-driven engine construction.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use powernet_sim::config::ScenarioConfig;
use powernet_sim::io::export::export_csv;
use powernet_sim::scenario::build_engine;
use powernet_sim::sim::kpi::KpiReport;

#[derive(Parser)]
#[command(name = "powernet-sim")]
#[command(about = "Deterministic fixed-step power network simulator")]
struct Cli {
    /// Load scenario from a TOML config file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (idle, baseline, scarcity, player_exchange)
    #[arg(long)]
    preset: Option<String>,

    /// Override the number of ticks
    #[arg(long)]
    ticks: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Export tick records to CSV
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Only print the KPI report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // --scenario takes priority, then --preset, then baseline
    let mut scenario = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::baseline(),
    };
    if let Some(ticks) = cli.ticks {
        scenario.simulation.ticks = ticks;
    }
    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }

    let mut engine = match build_engine(&scenario) {
        Ok(engine) => engine,
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            bail!("scenario has {} invalid field(s)", errors.len());
        }
    };

    let records = engine.run();
    if !cli.quiet {
        for r in &records {
            println!("{r}");
        }
        println!();
    }
    println!("{}", KpiReport::from_records(&records));

    if let Some(path) = &cli.telemetry_out {
        export_csv(&records, path)
            .with_context(|| format!("failed to write telemetry to {}", path.display()))?;
        info!("telemetry written to {}", path.display());
    }
    Ok(())
}
