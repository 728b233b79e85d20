//! Runtime configuration for the binary

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::persistence::DEFAULT_QUIET_PERIOD;

/// Environment fallback for `--data-dir`
pub const DATA_DIR_ENV: &str = "THEMELAB_DATA_DIR";
/// Environment variable holding the log filter
pub const LOG_ENV: &str = "THEMELAB_LOG";

const DEFAULT_DATA_DIR: &str = ".themelab";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the saved state and the log file
    pub data_dir: PathBuf,
    /// Write the exported theme here and exit instead of starting the TUI
    pub export: Option<PathBuf>,
    /// Quiet period before edits are saved
    pub debounce: Duration,
    /// Optional `[{ "family": ... }]` font list
    pub font_catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            export: None,
            debounce: DEFAULT_QUIET_PERIOD,
            font_catalog: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{flag} expects a value")]
    MissingValue { flag: String },
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error("help requested")]
    HelpRequested,
}

impl Config {
    /// Parse `args` (without the program name). `data_dir_env` is the value of
    /// [`DATA_DIR_ENV`], used when `--data-dir` is absent.
    pub fn from_args<I>(args: I, data_dir_env: Option<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        if let Some(dir) = data_dir_env.filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => config.data_dir = PathBuf::from(value_for(&arg, &mut args)?),
                "--export" => config.export = Some(PathBuf::from(value_for(&arg, &mut args)?)),
                "--fonts" => {
                    config.font_catalog = Some(PathBuf::from(value_for(&arg, &mut args)?))
                }
                "--debounce-ms" => {
                    let value = value_for(&arg, &mut args)?;
                    let millis = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                        flag: arg.clone(),
                        value: value.clone(),
                    })?;
                    config.debounce = Duration::from_millis(millis);
                }
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }
        Ok(config)
    }

    /// Parse the process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args().skip(1), std::env::var(DATA_DIR_ENV).ok())
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("themelab.log")
    }
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, ConfigError> {
    args.next().ok_or_else(|| ConfigError::MissingValue {
        flag: flag.to_string(),
    })
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--data-dir DIR] [--export FILE] [--debounce-ms N] [--fonts FILE]\n\
         \n\
         Options:\n  \
           --data-dir DIR     where state and logs are kept (env {DATA_DIR_ENV}, default {DEFAULT_DATA_DIR})\n  \
           --export FILE      write the composed theme to FILE and exit\n  \
           --debounce-ms N    quiet period before edits are saved (default 2000)\n  \
           --fonts FILE       JSON list of font families to offer\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(Vec::new(), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.debounce, Duration::from_secs(2));
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::from_args(
            args(&["--data-dir", "/tmp/a", "--debounce-ms", "250", "--export", "theme.js"]),
            Some("/tmp/env".to_string()),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/a"));
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.export, Some(PathBuf::from("theme.js")));

        let config = Config::from_args(Vec::new(), Some("/tmp/env".to_string())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/env"));
    }

    #[test]
    fn test_bad_arguments() {
        assert_eq!(
            Config::from_args(args(&["--debounce-ms"]), None),
            Err(ConfigError::MissingValue {
                flag: "--debounce-ms".to_string()
            })
        );
        assert!(matches!(
            Config::from_args(args(&["--debounce-ms", "soon"]), None),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(
            Config::from_args(args(&["--verbose"]), None),
            Err(ConfigError::UnknownArgument("--verbose".to_string()))
        );
    }
}
