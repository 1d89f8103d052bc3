use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use echo_solver::cli::run_with_args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("echo_solver=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let code = run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
