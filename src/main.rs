//! SQL playground - a terminal SQL query runner over generated mock data.

use sql_playground::app::Session;
use sql_playground::cli::Cli;
use sql_playground::config::Config;
use sql_playground::error::{PlaygroundError, Result};
use sql_playground::{logging, tui};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    // The TUI owns the terminal, so its logs go to a file.
    if cli.headless {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| PlaygroundError::internal(format!("Failed to start runtime: {e}")))?;

    if cli.headless {
        return runtime.block_on(tui::headless::run_headless(&cli, &config));
    }

    let session = Session::from_config(&config, cli.seed)?;
    runtime.block_on(tui::run(&config, session))?;
    Ok(0)
}
