//! Spineguard CLI
//!
//! Real-time posture monitoring, CSV replay, and dataset collection.

use clap::{Parser, Subcommand};
use spineguard::{
    config::Config,
    core::{PostureModel, PosturePipeline},
    datalog::FeatureLogger,
    sensor::{load_samples, sim::generate_sample, PostureProfile, SimSensor, SimSensorConfig},
    session::create_shared_log_with_persistence,
    VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "spineguard")]
#[command(version = VERSION)]
#[command(about = "Wearable posture monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live monitor against the simulated sensors
    Run {
        /// Posture profile to simulate (upright, slouched, alternating)
        #[arg(long, default_value = "alternating")]
        profile: String,

        /// Model parameters file (defaults to the configured path)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Stop after this many seconds (runs until Ctrl+C if omitted)
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Replay a recorded raw-sample CSV through the pipeline
    Replay {
        /// Raw-sample CSV file
        input: PathBuf,

        /// Model parameters file (defaults to the configured path)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Collect a labeled feature dataset (CSV, one row per sample)
    Log {
        /// Output CSV file
        #[arg(long, short)]
        output: PathBuf,

        /// Session label: 1 = good posture, 0 = bad posture
        #[arg(long)]
        label: u8,

        /// Posture profile to simulate (upright, slouched, alternating)
        #[arg(long, default_value = "upright")]
        profile: String,

        /// How many seconds of data to collect
        #[arg(long, default_value = "60")]
        duration: u64,
    },

    /// Show configuration and cumulative session statistics
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            profile,
            model,
            duration,
        } => cmd_run(&profile, model, duration),
        Commands::Replay { input, model } => cmd_replay(&input, model),
        Commands::Log {
            output,
            label,
            profile,
            duration,
        } => cmd_log(&output, label, &profile, duration),
        Commands::Status => cmd_status(),
        Commands::Config => cmd_config(),
    }
}

fn load_validated_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    }
}

fn load_model(config: &Config, override_path: Option<PathBuf>) -> PostureModel {
    let path = override_path.unwrap_or_else(|| config.model_path.clone());
    match PostureModel::load(&path) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error loading model from {path:?}: {e}");
            eprintln!("A trained parameter file is required; see assets/model.json for the format.");
            std::process::exit(1);
        }
    }
}

fn parse_profile(s: &str) -> PostureProfile {
    match PostureProfile::parse(s) {
        Some(profile) => profile,
        None => {
            eprintln!("Error: unknown profile {s:?} (expected upright, slouched, or alternating)");
            std::process::exit(1);
        }
    }
}

fn cmd_run(profile: &str, model_path: Option<PathBuf>, duration: Option<u64>) {
    println!("Spineguard v{VERSION}");
    println!();

    let config = load_validated_config();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }
    let model = load_model(&config, model_path);
    let profile = parse_profile(profile);

    println!("Starting monitor...");
    println!("  Profile: {profile:?}");
    println!(
        "  Sampling: every {} ms, window {} samples, evaluation every {} samples",
        config.sample_period.as_millis(),
        config.window_len,
        config.eval_step
    );
    println!(
        "  Alert after: {} ms of sustained bad posture",
        config.alert_threshold.as_millis()
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let session_log = create_shared_log_with_persistence(config.data_path.join("session.json"));

    let mut pipeline = PosturePipeline::new(
        model,
        config.window_len,
        config.eval_step,
        chrono::Duration::from_std(config.alert_threshold).unwrap_or_else(|_| {
            chrono::Duration::milliseconds(3000)
        }),
    );

    let mut sensor = SimSensor::new(SimSensorConfig {
        profile,
        sample_period: config.sample_period,
    });
    if let Err(e) = sensor.start() {
        eprintln!("Error starting sensor source: {e}");
        std::process::exit(1);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let started = Instant::now();
    let receiver = sensor.receiver().clone();

    while running.load(Ordering::SeqCst) {
        if let Some(secs) = duration {
            if started.elapsed() >= Duration::from_secs(secs) {
                break;
            }
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(timed) => {
                session_log.record_sample();
                if let Some(eval) = pipeline.ingest(&timed.sample, timed.timestamp) {
                    session_log.record_evaluation(eval.classification.is_bad);
                    println!(
                        "[{}] p_good = {:.3} -> {}",
                        eval.timestamp.format("%H:%M:%S%.3f"),
                        eval.classification.p_good,
                        if eval.classification.is_bad { "BAD" } else { "GOOD" }
                    );
                    if eval.alert_fired {
                        session_log.record_alert();
                        fire_alert();
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Sensor source disconnected unexpectedly");
                break;
            }
        }
    }

    println!();
    println!("Stopping monitor...");
    sensor.stop();

    if let Err(e) = session_log.save() {
        eprintln!("Warning: Could not save session stats: {e}");
    }

    println!();
    println!("{}", session_log.summary());
}

fn cmd_replay(input: &PathBuf, model_path: Option<PathBuf>) {
    let config = load_validated_config();
    let model = load_model(&config, model_path);

    let samples = match load_samples(input) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("Error loading {input:?}: {e}");
            std::process::exit(1);
        }
    };
    println!("Replaying {} samples from {:?}", samples.len(), input);
    println!();

    let mut pipeline = PosturePipeline::new(
        model,
        config.window_len,
        config.eval_step,
        chrono::Duration::from_std(config.alert_threshold)
            .unwrap_or_else(|_| chrono::Duration::milliseconds(3000)),
    );

    let mut evaluations = 0u64;
    let mut bad = 0u64;
    let mut alerts = 0u64;

    for timed in &samples {
        if let Some(eval) = pipeline.ingest(&timed.sample, timed.timestamp) {
            evaluations += 1;
            if eval.classification.is_bad {
                bad += 1;
            }
            println!(
                "[{} ms] p_good = {:.3} -> {}{}",
                timed.timestamp.timestamp_millis(),
                eval.classification.p_good,
                if eval.classification.is_bad { "BAD" } else { "GOOD" },
                if eval.alert_fired { "  ** ALERT **" } else { "" }
            );
            if eval.alert_fired {
                alerts += 1;
            }
        }
    }

    println!();
    println!(
        "Replay complete: {evaluations} evaluations, {bad} bad, {alerts} alerts"
    );
}

fn cmd_log(output: &PathBuf, label: u8, profile: &str, duration: u64) {
    if label > 1 {
        eprintln!("Error: label must be 0 (bad session) or 1 (good session)");
        std::process::exit(1);
    }
    let config = load_validated_config();
    let profile = parse_profile(profile);

    let mut logger = match FeatureLogger::create(output, label) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Error creating {output:?}: {e}");
            std::process::exit(1);
        }
    };

    let period_ms = config.sample_period.as_millis() as i64;
    let total = (duration as i64 * 1000) / period_ms.max(1);
    // ~5 s phases, as in the live simulator.
    let phase_ticks = 5000 / period_ms.max(1) as u64;

    println!(
        "Collecting {duration}s ({total} samples) of {profile:?} data, label {label}..."
    );

    for tick in 0..total {
        let sample = generate_sample(profile, tick as u64, phase_ticks);
        let features = PosturePipeline::extract(&sample);
        if let Err(e) = logger.log(tick * period_ms, &features) {
            eprintln!("Error writing row: {e}");
            std::process::exit(1);
        }
    }

    match logger.finish() {
        Ok(rows) => println!("Wrote {rows} rows to {output:?}"),
        Err(e) => {
            eprintln!("Error flushing {output:?}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_status() {
    let config = load_validated_config();

    println!("Spineguard Status");
    println!("=================");
    println!();
    println!("Configuration:");
    println!("  Sample period: {} ms", config.sample_period.as_millis());
    println!("  Window: {} samples", config.window_len);
    println!("  Evaluation step: {} samples", config.eval_step);
    println!(
        "  Alert threshold: {} ms",
        config.alert_threshold.as_millis()
    );
    println!("  Model: {:?}", config.model_path);
    println!();

    let stats_path = config.data_path.join("session.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(v) = stats.get("samples_ingested") {
                    println!("  Samples ingested: {v}");
                }
                if let Some(v) = stats.get("windows_evaluated") {
                    println!("  Windows evaluated: {v}");
                }
                if let Some(v) = stats.get("bad_windows") {
                    println!("  Bad-posture windows: {v}");
                }
                if let Some(v) = stats.get("alerts_fired") {
                    println!("  Alerts fired: {v}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = load_validated_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Render the alert. The hardware actuator is a buzzer; here it is the
/// terminal bell plus a visible line.
fn fire_alert() {
    print!("\x07");
    println!("*** ALERT: bad posture sustained - sit up ***");
}
