use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::LoggerLayer;
#[cfg(feature = "tracing")]
use crate::TracingLayer;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Unable to open the log output: {0}")]
    Io(#[from] std::io::Error),
    #[error("A global logger is already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

pub struct Logger {
    #[allow(dead_code)]
    tracing_file_name: String,
}

impl Logger {
    /// Create a new logger instance.
    /// This must be called once before any other logging function.
    ///
    /// # Arguments
    ///
    /// * `log_file_name` - The name of the file to write the log data to.
    /// * `tracing_file_name` - The name of the file to write the tracing data to (feature `tracing`).
    /// * `level` - Most verbose level displayed.
    pub fn new(log_file_name: &str, tracing_file_name: &str, level: LevelFilter) -> Result<Self, LoggerError> {
        let logger_layer = LoggerLayer::new(log_file_name, level)?;

        #[cfg(feature = "tracing")]
        {
            let tracing_layer = TracingLayer::new(tracing_file_name)?;
            tracing_subscriber::registry()
                .with(tracing_layer)
                .with(logger_layer)
                .try_init()?;
        }

        #[cfg(not(feature = "tracing"))]
        tracing_subscriber::registry()
            .with(logger_layer)
            .try_init()?;

        Ok(Self {
            tracing_file_name: tracing_file_name.to_string(),
        })
    }

    /// Close the logger instance.
    /// This must be called once after all other logging functions.
    pub fn close(&self) {
        #[cfg(feature = "tracing")]
        if let Err(e) = TracingLayer::close(&self.tracing_file_name) {
            eprintln!("Unable to finish the trace file: {}", e);
        }
    }
}

/// Parse a level name (`"trace"`, `"info"`, `"off"`...), falling back to `INFO`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level("WARN"), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("loud"), LevelFilter::INFO);
    }
}
