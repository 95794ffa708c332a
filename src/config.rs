use crate::error::AppError;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "TDO_DIR";
const STORAGE_FILE_NAME: &str = "storage.json";
const LOG_FILE_NAME: &str = "tdo.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Terminal to-do list.
#[derive(Debug, Default, Parser)]
#[command(name = "tdo", version)]
pub struct Cli {
    /// Directory holding the task storage file and the log file.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `tdo=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Keep tasks in memory only; nothing is written to the storage file.
    #[arg(long)]
    pub ephemeral: bool,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub ephemeral: bool,
}

impl Config {
    /// Resolves the configuration from command line flags and the process environment.
    pub fn from_cli(cli: Cli) -> Config {
        Self::resolve(cli, |name| std::env::var(name).ok(), dirs::data_dir())
    }

    /// Flags win over environment variables, which win over the platform data directory.
    fn resolve(
        cli: Cli,
        env: impl Fn(&str) -> Option<String>,
        platform_data_dir: Option<PathBuf>,
    ) -> Config {
        let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let data_dir = cli
            .data_dir
            .or_else(|| non_empty(DATA_DIR_ENV).map(PathBuf::from))
            .or_else(|| platform_data_dir.map(|dir| dir.join("tdo")))
            .unwrap_or_else(|| PathBuf::from("."));

        let log_filter = cli
            .log_level
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Config {
            storage_path: data_dir.join(STORAGE_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
            log_filter,
            ephemeral: cli.ephemeral,
        }
    }

    /// Creates the data directory if it doesn't exist yet.
    pub fn ensure_data_dir(&self) -> Result<(), AppError> {
        ensure_dir(&self.data_dir)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    if dir.exists() && !dir.is_dir() {
        return Err(AppError::Config(format!(
            "data directory {} exists but is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_flag_wins_over_env() {
        let cli = Cli {
            data_dir: Some(PathBuf::from("/from/flag")),
            log_level: Some("debug".to_string()),
            ephemeral: true,
        };
        let config = Config::resolve(
            cli,
            |name| match name {
                DATA_DIR_ENV => Some("/from/env".to_string()),
                "RUST_LOG" => Some("trace".to_string()),
                _ => None,
            },
            Some(PathBuf::from("/platform")),
        );

        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.storage_path, PathBuf::from("/from/flag/storage.json"));
        assert_eq!(config.log_path, PathBuf::from("/from/flag/tdo.log"));
        assert_eq!(config.log_filter, "debug");
        assert!(config.ephemeral);
    }

    #[test]
    fn test_env_used_when_flag_missing() {
        let config = Config::resolve(
            Cli::default(),
            |name| (name == DATA_DIR_ENV).then(|| "/from/env".to_string()),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let config = Config::resolve(
            Cli::default(),
            |name| (name == DATA_DIR_ENV).then(|| "  ".to_string()),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(config.data_dir, PathBuf::from("/platform/tdo"));
    }

    #[test]
    fn test_falls_back_to_current_dir() {
        let config = Config::resolve(Cli::default(), no_env, None);
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_ensure_data_dir_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("not_a_dir");
        fs::write(&file_path, "x").unwrap();

        let config = Config::resolve(
            Cli {
                data_dir: Some(file_path),
                log_level: None,
                ephemeral: false,
            },
            no_env,
            None,
        );
        assert!(matches!(config.ensure_data_dir(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_ensure_data_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let config = Config::resolve(
            Cli {
                data_dir: Some(nested.clone()),
                log_level: None,
                ephemeral: false,
            },
            no_env,
            None,
        );
        config.ensure_data_dir().unwrap();
        assert!(nested.is_dir());
    }
}
