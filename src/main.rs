use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use startrack::config::Config;
use startrack::constraints::ConstraintEvaluator;
use startrack::ephemeris::load_orbit_path;
use startrack::geodetic::project_ground_track;
use startrack::report::analyze_path;
use startrack::segment::longest_run;
use startrack::simulator::{AlignmentAxis, Maneuver, SimulationConfig, SimulationRecord, SimulatorClient};

#[derive(Parser)]
#[command(name = "startrack")]
#[command(about = "Star tracker exclusion analysis and ground tracks")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every pass of an ephemeris report
    Analyze {
        ephemeris: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the longest continuous valid run
    Longest { ephemeris: PathBuf },
    /// Run the remote attitude simulation and save the record
    Simulate {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        maneuver: Maneuver,
        #[arg(long, value_enum)]
        axis: AlignmentAxis,
        /// Simulated span, minutes
        #[arg(long)]
        span: u32,
        #[arg(long)]
        output: PathBuf,
    },
    /// Project a saved simulation onto the ground
    GroundTrack {
        record: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Analyze { ephemeris, output } => analyze(&config, &ephemeris, output.as_deref()),
        Commands::Longest { ephemeris } => longest(&config, &ephemeris),
        Commands::Simulate {
            name,
            maneuver,
            axis,
            span,
            output,
        } => simulate(&config, SimulationConfig::new(&name, maneuver, span, axis), &output),
        Commands::GroundTrack { record, output } => ground_track(&config, &record, output.as_deref()),
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> ExitCode {
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match output {
        Some(path) => match fs::write(path, json) {
            Ok(()) => {
                println!("Wrote {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
    }
}

fn analyze(config: &Config, ephemeris: &Path, output: Option<&Path>) -> ExitCode {
    let path = match load_orbit_path(ephemeris) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Ephemeris error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let evaluator = ConstraintEvaluator::new(&config.constraints);
    let report = analyze_path(
        &path,
        &config.tracker.boresight(),
        &evaluator,
        config.tracker.terminal_slew_rate,
    );

    for (i, pass) in report.passes.iter().enumerate() {
        println!(
            "  {}: {} -> {} ({} valid, {} runs)",
            i + 1,
            pass.start,
            pass.end,
            pass.valid_indices.len(),
            pass.valid_runs.len()
        );
    }
    println!(
        "{} passes, {} partially valid, {} fully valid",
        report.passes.len(),
        report.partially_valid_passes,
        report.fully_valid_passes
    );

    match output {
        Some(_) => write_json(&report, output),
        None => ExitCode::SUCCESS,
    }
}

fn longest(config: &Config, ephemeris: &Path) -> ExitCode {
    let path = match load_orbit_path(ephemeris) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Ephemeris error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let evaluated = path
        .annotate(&config.tracker.boresight(), config.tracker.terminal_slew_rate)
        .evaluate(&ConstraintEvaluator::new(&config.constraints));

    match longest_run(&evaluated) {
        Some(longest) => {
            let fragment = longest.fragment();
            println!(
                "Pass {}: samples {}..={} ({} samples)",
                longest.pass_index + 1,
                longest.run.start,
                longest.run.end,
                longest.run.len()
            );
            println!("  {} -> {}", fragment.start(), fragment.end());
            ExitCode::SUCCESS
        }
        None => {
            println!("No valid samples");
            ExitCode::SUCCESS
        }
    }
}

fn simulate(config: &Config, simulation: SimulationConfig, output: &Path) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = SimulatorClient::new(&config.simulator);
    let record = match runtime.block_on(client.run(simulation)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Simulation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match record.save(output) {
        Ok(()) => {
            println!("Simulation saved ({} samples)", record.timestamps.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error saving record: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn ground_track(config: &Config, record: &Path, output: Option<&Path>) -> ExitCode {
    let track = match SimulationRecord::load(record).and_then(|r| r.attitude_track()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Record error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = &config.ground_track;
    let dense = track.interpolate(settings.sample_period);
    let entries = project_ground_track(&dense, settings.boresight, settings.strategy);
    let hits = entries.iter().filter(|e| e.point.is_some()).count();
    log::info!("{} of {} samples intersect the Earth", hits, entries.len());

    write_json(&entries, output)
}
