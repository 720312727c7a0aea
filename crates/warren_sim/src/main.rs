//! # WARREN Simulation Binary
//!
//! ## Usage
//!
//! ```bash
//! warren_sim --config sim.toml --ticks 3600 --seed 7
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use warren_sim::{SimConfig, Simulation};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    // Simple parsing, no external deps.
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut ticks_override: Option<u64> = None;
    let mut seed_override: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--ticks" | "-t" => {
                if i + 1 < args.len() {
                    ticks_override = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    seed_override = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: warren_sim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   TOML config file (defaults built in)");
                println!("  -t, --ticks <N>       Override the number of ticks to run");
                println!("  -s, --seed <N>        Override the random seed");
                println!("  -h, --help            Show this help");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown argument: {other} (try --help)");
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{}: {error}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    if let Some(ticks) = ticks_override {
        config.run_ticks = ticks;
    }
    if let Some(seed) = seed_override {
        config.seed = seed;
    }

    println!("┌─ CONFIGURATION ────────────────────────────────┐");
    println!("│ Tick Rate:       {} Hz", config.tick_hz);
    println!("│ Ticks:           {}", config.run_ticks);
    println!("│ Seed:            {}", config.seed);
    println!("│ Mote Types:      {}", config.motes.len());
    for (index, mote) in config.motes.iter().enumerate() {
        println!(
            "│   [{index}] {:?} x{} ({}s lifetime)",
            mote.kind, mote.capacity, mote.lifetime
        );
    }
    println!("└────────────────────────────────────────────────┘");

    let simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    let stats = simulation.run();

    println!("┌─ RUN SUMMARY ──────────────────────────────────┐");
    println!("│ Ticks:           {}", stats.ticks);
    println!("│ Instantiated:    {}", stats.instantiated);
    println!("│ Spawned:         {}", stats.spawned);
    println!("│ Retired:         {}", stats.retired);
    println!("│ Exhausted:       {}", stats.exhausted);
    println!("│ Strikes:         {} ({} stale)", stats.strikes, stats.stale_hits);
    println!("│ Peak Active:     {}", stats.peak_active);
    println!("└────────────────────────────────────────────────┘");

    ExitCode::SUCCESS
}
