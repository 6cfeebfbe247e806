use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use health_core::{run_simulation, HealthConfig, HealthEvent, PlayerHealthState, SimulationReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Inspect and exercise player-health arbitration settings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a settings file and report whether every value is in range.
    Check(CheckArgs),
    /// Print the default settings file.
    Defaults,
    /// Replay a JSON event script and emit a JSON report.
    Simulate(SimulateArgs),
    /// Pretty-print an existing report.
    Report(ReportArgs),
}

#[derive(Args)]
struct CheckArgs {
    #[arg(long, default_value = "health.toml")]
    config: PathBuf,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "health.toml")]
    config: PathBuf,
    /// JSON array such as `[{"kind":"damage","amount":95},{"kind":"tick"}]`.
    #[arg(long)]
    script: PathBuf,
    /// Starting health; defaults to the configured maximum.
    #[arg(long)]
    health: Option<i32>,
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Defaults => handle_defaults(),
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn init_tracing(config: Option<&HealthConfig>) {
    let fallback = match config {
        Some(cfg) if cfg.enable_logging() => "debug",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let config = HealthConfig::from_path(&args.config)?;
    init_tracing(Some(&config));
    info!(target: "health_cli", path = %args.config.display(), "configuration valid");
    println!(
        "max_health={} god_mode={} regen_per_tick={} one_shot_protection={} one_shot_min_health={} max_single_damage={}",
        config.max_health(),
        config.god_mode(),
        config.regen_per_tick(),
        config.one_shot_protection(),
        config.one_shot_min_health(),
        config.max_single_damage(),
    );
    Ok(())
}

fn handle_defaults() -> Result<()> {
    print!("{}", HealthConfig::default().to_toml_string()?);
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = HealthConfig::from_path(&args.config)?;
    init_tracing(Some(&config));
    let events = load_script(&args.script)?;

    let initial = PlayerHealthState::new(
        args.health.unwrap_or(config.max_health()),
        config.max_health(),
    );
    let run_id = args
        .id
        .unwrap_or_else(|| format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S")));

    let report = run_simulation(run_id, &config, initial, &events);
    info!(
        target: "health_cli",
        steps = report.steps.len(),
        final_health = report.final_state.health,
        "simulation finished"
    );
    let rendered = serde_json::to_string_pretty(&report)?;
    println!("{rendered}");

    if let Some(out) = args.out.as_ref() {
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, &rendered).with_context(|| format!("failed to write {}", out.display()))?;
        println!("Report written to {}", out.display());
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<()> {
    init_tracing(None);
    let data = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let report: SimulationReport = serde_json::from_str(&data)?;
    let summary = &report.summary;
    println!(
        "Report {} -> health {}/{} after {} steps (hits {}, blocked {}, damage {}/{}, lowest {})",
        report.id,
        report.final_state.health,
        report.final_state.max_health,
        report.steps.len(),
        summary.hits,
        summary.blocked_hits,
        summary.applied_damage,
        summary.incoming_damage,
        summary.lowest_health,
    );
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<HealthEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let events = serde_json::from_str(&data)
        .with_context(|| format!("invalid event script {}", path.display()))?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_fails_on_out_of_range_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("health.toml");
        fs::write(&config, "[protection]\nmax_single_damage = 20000\n").unwrap();

        let err = handle_check(CheckArgs { config }).unwrap_err();
        assert!(format!("{err:#}").contains("max_single_damage"), "{err:#}");
    }

    #[test]
    fn check_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("absent.toml");
        assert!(handle_check(CheckArgs { config }).is_err());
    }

    #[test]
    fn check_accepts_rendered_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("health.toml");
        fs::write(&config, HealthConfig::default().to_toml_string().unwrap()).unwrap();
        handle_check(CheckArgs { config }).unwrap();
    }
}
