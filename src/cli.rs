use std::time::Instant;

use tracing::warn;

use crate::config::{parse_workers, workers_from_env, SimulationConfig, DEFAULT_ITERATIONS};
use crate::echo::catalog_entries;
use crate::simulation::{run_simulation, Report};

const USAGE: &str =
    "usage: echo-solver <simulate [iterations] [seed] [--workers N] [--json] | catalog>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Catalog,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("catalog") => Some(Command::Catalog),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Catalog) => handle_catalog(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the command, with `--flag value` pairs removed.
fn positional(args: &[String]) -> Vec<&String> {
    let mut out = Vec::new();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--workers" => {
                rest.next();
            }
            "--json" => {}
            _ => out.push(arg),
        }
    }
    out
}

/// `Ok(None)` when `flag` is absent, an error when it is present without a value.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a String>, String> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(index) => args
            .get(index + 1)
            .map(Some)
            .ok_or_else(|| format!("missing value for {flag}\n{USAGE}")),
    }
}

pub fn simulation_config_from_args(args: &[String]) -> Result<SimulationConfig, String> {
    let positional = positional(args);
    let iterations = parse_u64_arg(positional.first().copied(), "iterations", DEFAULT_ITERATIONS);
    let seed = positional
        .get(1)
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("invalid seed '{raw}', using OS entropy");
                None
            }
        });

    let workers = match flag_value(args, "--workers")? {
        Some(raw) => parse_workers(raw).map_err(|err| err.to_string())?,
        None => workers_from_env()
            .map_err(|err| err.to_string())?
            .unwrap_or(0),
    };

    let config = SimulationConfig::default()
        .with_iterations(iterations)
        .with_workers(workers);
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn handle_simulate(args: &[String]) -> i32 {
    let as_json = args.iter().any(|arg| arg == "--json");
    let config = match simulation_config_from_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };

    let started = Instant::now();
    let result = match run_simulation(&config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };
    let elapsed = started.elapsed();

    let report = Report::from_result(&result);
    if as_json {
        let payload = serde_json::json!({
            "result": result,
            "report": report,
            "elapsed_seconds": elapsed.as_secs_f64(),
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize simulation result: {err}");
                return 1;
            }
        }
    } else {
        print!("{}", report.render_text(Some(elapsed)));
    }

    0
}

fn handle_catalog() -> i32 {
    match serde_json::to_string_pretty(&catalog_entries()) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize catalog: {err}");
            1
        }
    }
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
