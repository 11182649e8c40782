use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

use octane::config::{loader, OctaneConfig};
use octane::hardware::PlatformInfoProvider;
use octane::models::TestResults;
use octane::octane::{OctaneCalculator, OctaneRating};
use octane::performance::CpuTestSuite;
use octane::report::{HostInfo, ReportBuilder, ReportStore};
use octane::LogCollector;

/// Octane Rating hardware benchmark
#[derive(Parser)]
#[command(name = "octane")]
#[command(about = "Benchmark hardware and rate it on the Octane (RON 70-100) scale")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: ~/.config/octane/settings.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the CPU test suite
    Cpu {
        /// Worker threads for multi-threaded phases (0 = all logical CPUs)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Time budget, e.g. "60s", "2m", "1m 30s"
        #[arg(short, long)]
        duration: Option<String>,

        /// Test family: all, compute, crypto, compress
        #[arg(short = 'T', long = "type")]
        test_type: Option<String>,

        /// Store a full report in the report directory
        #[arg(long)]
        save: bool,
    },

    /// Show processor and host information
    Info,

    /// Rate a saved test results document
    Score {
        /// JSON file with test results
        results: PathBuf,

        /// Baseline tier to score against
        #[arg(long)]
        tier: Option<String>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List baseline tiers
    Baselines,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = loader::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()?
    };
    let collector = LogCollector::new(level, config.log_dir().as_deref())
        .map_err(anyhow::Error::msg)
        .context("Failed to start log collector")?;
    if let Err(e) = collector.install() {
        eprintln!("[Main] WARNING: Failed to register logger: {}", e);
    }
    if let Some(path) = collector.session_log_path() {
        log::debug!("[Main] Session log: {}", path.display());
    }

    let outcome = match cli.command {
        Commands::Cpu {
            threads,
            duration,
            test_type,
            save,
        } => run_cpu(&config, threads, duration, test_type, save),
        Commands::Info => show_info(),
        Commands::Score { results, tier, output } => score_results(&config, &results, tier, output),
        Commands::Baselines => list_baselines(&config),
    };

    if let Err(ref e) = outcome {
        log::error!("[Main] {:#}", e);
    }
    let _ = collector.wait_for_empty();
    outcome
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_cpu(
    config: &OctaneConfig,
    threads: Option<usize>,
    duration: Option<String>,
    test_type: Option<String>,
    save: bool,
) -> Result<()> {
    let threads = threads.unwrap_or(config.tests.threads);
    let duration = duration.unwrap_or_else(|| config.tests.duration.clone());
    let test_type = test_type.unwrap_or_else(|| config.tests.test_type.clone());

    let mut suite = CpuTestSuite::new(threads).with_thermal(config.thermal_probe());
    let cpu = suite
        .execute(&duration, &test_type)
        .context("CPU test configuration rejected")?;

    let registry = config.baseline_registry();
    let calculator = OctaneCalculator::new(&registry).with_tier(config.octane.baseline_tier.clone());
    let results = TestResults {
        cpu,
        ..TestResults::default()
    };
    let rating = OctaneRating::from_ron(calculator.cpu_ron(&results.cpu));
    log::info!("[Main] CPU rating: {}", rating);

    print_json(&results.cpu)?;

    if save {
        let report = ReportBuilder::new(&calculator)
            .platform(PlatformInfoProvider::detect())
            .host(HostInfo::detect())
            .upload_settings(&config.upload)
            .duration(duration)
            .precision(config.octane.precision)
            .fuel_analysis(config.tests.fuel_analysis)
            .build(&results);
        let store = ReportStore::new(config.report_dir())?;
        let id = store.save(&report)?;
        eprintln!("Report saved: {}", store.dir().join(id).display());
    }
    Ok(())
}

fn show_info() -> Result<()> {
    #[derive(serde::Serialize)]
    struct Info {
        host: HostInfo,
        cpu: octane::PlatformInfo,
    }

    print_json(&Info {
        host: HostInfo::detect(),
        cpu: PlatformInfoProvider::detect(),
    })
}

fn score_results(config: &OctaneConfig, path: &Path, tier: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let results: TestResults =
        serde_json::from_str(&content).with_context(|| format!("Invalid test results in {}", path.display()))?;

    let registry = config.baseline_registry();
    let tier = tier.unwrap_or_else(|| config.octane.baseline_tier.clone());
    if !registry.contains(&tier) {
        log::warn!("[Main] Unknown tier '{}', scoring against the default baseline", tier);
    }
    let calculator = OctaneCalculator::new(&registry).with_tier(tier);

    let report = ReportBuilder::new(&calculator)
        .platform(PlatformInfoProvider::detect())
        .host(HostInfo::detect())
        .upload_settings(&config.upload)
        .duration(results.cpu.duration.clone())
        .precision(config.octane.precision)
        .fuel_analysis(config.tests.fuel_analysis)
        .build(&results);

    match output {
        Some(out) => {
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(&out, json).with_context(|| format!("Failed to write {}", out.display()))?;
            eprintln!("Report written: {}", out.display());
            Ok(())
        }
        None => print_json(&report),
    }
}

fn list_baselines(config: &OctaneConfig) -> Result<()> {
    print_json(&config.baseline_registry().all())
}
