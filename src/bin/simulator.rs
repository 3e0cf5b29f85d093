//! Headless loot generation simulator
//!
//! Runs the loot generator against a fixture file without a game server,
//! collecting metrics for loot balance analysis. Uses the same
//! `LootGenerator` pass a raid start would.
//!
//! Usage:
//!   cargo run --bin simulator -- --fixture FILE --location ID [OPTIONS]
//!
//! Options:
//!   --runs N        Number of runs with incrementing seeds (default: 100)
//!   --seed N        RNG seed (default: 42)
//!   --top N         Templates listed in the report (default: 10)
//!   --verbose       Per-run lines and generator logging
//!   --json          Print the report as JSON

use lootgen::simulator::{run_simulation, LootFixture, SimConfig};
use log::{Level, LevelFilter, Log, Metadata, Record};

// ── Logging ──────────────────────────────────────────────────────────

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let tag = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN ",
                Level::Info => "INFO ",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            };
            eprintln!("[{tag}] {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliConfig {
    fixture: Option<String>,
    location: Option<String>,
    runs: u32,
    seed: u64,
    top: usize,
    verbose: bool,
    json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            location: None,
            runs: 100,
            seed: 42,
            top: 10,
            verbose: false,
            json: false,
        }
    }
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fixture" => {
                i += 1;
                config.fixture = Some(value_of(&args, i, "--fixture"));
            }
            "--location" => {
                i += 1;
                config.location = Some(value_of(&args, i, "--location"));
            }
            "--runs" => {
                i += 1;
                config.runs = number_of(&args, i, "--runs");
            }
            "--seed" => {
                i += 1;
                config.seed = number_of(&args, i, "--seed");
            }
            "--top" => {
                i += 1;
                config.top = number_of(&args, i, "--top");
            }
            "--verbose" => config.verbose = true,
            "--json" => config.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("{flag} requires a value");
            std::process::exit(1);
        }
    }
}

fn number_of<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match value_of(args, i, flag).parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("{flag} requires a number");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "Loot Generation Simulator\n\
         \n\
         Usage: simulator --fixture FILE --location ID [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --fixture FILE  JSON fixture with database and config\n\
         \x20 --location ID   Location to generate\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 100)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --top N         Templates listed in the report (default: 10)\n\
         \x20 --verbose       Per-run lines and generator logging\n\
         \x20 --json          Print the report as JSON\n\
         \x20 --help, -h      Show this help"
    );
}

fn main() {
    let cli = parse_args();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    let (Some(fixture_path), Some(location)) = (cli.fixture.as_deref(), cli.location.clone()) else {
        print_usage();
        std::process::exit(1);
    };

    let fixture = match LootFixture::load(fixture_path) {
        Ok(fixture) => fixture,
        Err(e) => {
            eprintln!("Failed to load fixture {fixture_path}: {e}");
            std::process::exit(1);
        }
    };

    if !cli.json {
        eprintln!(
            "Loot Simulator: {} run(s) on {}, seed={}",
            cli.runs, location, cli.seed
        );
    }

    let config = SimConfig {
        location_id: location,
        num_runs: cli.runs,
        seed: Some(cli.seed),
        top_templates: cli.top,
        verbosity: if cli.verbose && !cli.json { 2 } else { 1 },
    };

    match run_simulation(&fixture, &config) {
        Ok(report) if cli.json => println!("{}", report.to_json()),
        Ok(report) => print!("{}", report.to_text()),
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            std::process::exit(1);
        }
    }
}
