//! `warehouse <history.json> <commands.json>`

use std::path::Path;
use std::process::ExitCode;

use warehouse_cli::{CliError, Config, JsonLinesSink};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(error.exit_code());
        }
    };

    // 2. Initialize tracing
    warehouse_cli::init_tracing(&config);

    // 3. Parse arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [history, commands] = args.as_slice() else {
        eprintln!("{}", CliError::Usage);
        return ExitCode::from(CliError::Usage.exit_code());
    };

    // 4. Run, publishing to stdout
    let sink = JsonLinesSink::new(tokio::io::stdout());
    match warehouse_cli::run(&config, Path::new(history), Path::new(commands), sink).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "run failed");
            ExitCode::from(error.exit_code())
        }
    }
}
