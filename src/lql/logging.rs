//! Logger bootstrap
//!
//! The library logs through the `log` facade only. Binaries call [init] once at
//! startup to install `env_logger`, with the level from [LoggingConfig] unless
//! `RUST_LOG` says otherwise.
//!
//! The interactive console owns the terminal, so it never logs to stderr: without
//! a configured file, logging is switched off there.

use super::config::LoggingConfig;
use env_logger::{Builder, Env, Target, TimestampPrecision};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Install(#[from] log::SetLoggerError),
}

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Off,
    Stderr,
    File(PathBuf),
}

/// Pick the destination for a process. `interactive` is true when the process
/// draws on the terminal.
pub fn destination(config: &LoggingConfig, interactive: bool) -> Destination {
    match &config.file {
        Some(path) => Destination::File(path.clone()),
        None if interactive => Destination::Off,
        None => Destination::Stderr,
    }
}

/// Install the global logger
pub fn init(config: &LoggingConfig, interactive: bool) -> Result<(), LoggingError> {
    let destination = destination(config, interactive);
    if destination == Destination::Off {
        log::set_max_level(log::LevelFilter::Off);
        return Ok(());
    }

    let mut builder = Builder::from_env(Env::default().default_filter_or(config.level.as_str()));
    builder.format_timestamp(Some(TimestampPrecision::Millis));
    if let Destination::File(path) = &destination {
        builder.target(Target::Pipe(Box::new(open_append(path)?)));
        builder.write_style(env_logger::WriteStyle::Never);
    }
    builder.try_init()?;

    log::debug!("logging to {:?} at level {}", destination, config.level);
    Ok(())
}

fn open_append(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(file: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            file: file.map(PathBuf::from),
        }
    }

    #[test]
    fn test_console_without_file_is_silent() {
        assert_eq!(destination(&config(None), true), Destination::Off);
    }

    #[test]
    fn test_commands_log_to_stderr() {
        assert_eq!(destination(&config(None), false), Destination::Stderr);
    }

    #[test]
    fn test_file_wins_everywhere() {
        let expected = Destination::File(PathBuf::from("lql.log"));
        assert_eq!(destination(&config(Some("lql.log")), true), expected);
        assert_eq!(destination(&config(Some("lql.log")), false), expected);
    }

    #[test]
    fn test_unwritable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_append(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("cannot open log file"));
    }
}
