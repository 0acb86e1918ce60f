use std::process::ExitCode;

use wde_game::*;
use wde_logger::{error, parse_level, Logger};

#[tokio::main]
async fn main() -> ExitCode {
    // Read configuration
    let config = match TerrainConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create logger
    let logger = match Logger::new("log.txt", "trace.json", parse_level(&config.log_level)) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run viewer
    let result = App::new(config).run().await;
    if let Err(e) = &result {
        error!("Viewer stopped : {}.", e);
    }

    // Close logger
    logger.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
