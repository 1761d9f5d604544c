use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, LogLevel};

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    // stdout carries command output (schema json, query results), so logs go to stderr
    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::All)
        .build()?);

    builder.sink(stderr);

    Ok(())
}

/// Logger for `config`. Without a `[log]` section, info and above go to stderr.
fn build_logger(config: &Config) -> spdlog::Result<Arc<Logger>> {
    let mut builder = Logger::builder();

    let level = match config.log {
        None => {
            add_console_sinks(&mut builder)?;
            Level::Info
        }
        Some(ref log) => {
            if let Some(ref location) = log.location {
                let daily_sink = Arc::new(RotatingFileSink::builder()
                    .base_path(location)
                    .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
                    .max_files(60)
                    .rotate_on_open(false)
                    .build()?);
                builder.sink(daily_sink);
            }

            if log.log_to_console {
                add_console_sinks(&mut builder)?;
            }
            log.level.into()
        }
    };

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(level));

    Ok(logger)
}

pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    spdlog::set_default_logger(build_logger(config)?);

    Ok(())
}
