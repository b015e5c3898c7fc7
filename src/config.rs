use std::path::PathBuf;

/// Environment variable consulted when no data directory is given.
pub const DATA_DIR_ENV: &str = "ANSWER_AND_WIN_DATA";

pub const USAGE: &str = "\
Usage: answer-and-win [data_dir]

  data_dir   directory holding the JSON stores (default: ./data,
             or $ANSWER_AND_WIN_DATA when set)

An empty data directory is filled with a starter set of levels,
categories and questions.

Logging: set RUST_LOG=info or RUST_LOG=debug for verbose output";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl AppConfig {
    /// Build from the process arguments (program name first) and the value of
    /// [`DATA_DIR_ENV`]. Returns `None` when help was requested.
    pub fn from_args(args: &[String], env_dir: Option<String>) -> Option<Self> {
        match args.get(1).map(String::as_str) {
            Some("-h") | Some("--help") => None,
            Some(dir) => Some(Self {
                data_dir: PathBuf::from(dir),
            }),
            None => Some(
                env_dir
                    .filter(|dir| !dir.trim().is_empty())
                    .map(|dir| Self {
                        data_dir: PathBuf::from(dir),
                    })
                    .unwrap_or_default(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_wins_over_env() {
        let config = AppConfig::from_args(&args(&["aw", "/tmp/quiz"]), Some("/srv".into()));
        assert_eq!(config.unwrap().data_dir, PathBuf::from("/tmp/quiz"));
    }

    #[test]
    fn test_env_then_default() {
        let config = AppConfig::from_args(&args(&["aw"]), Some("/srv".into())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv"));

        let config = AppConfig::from_args(&args(&["aw"]), Some("  ".into())).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(AppConfig::from_args(&args(&["aw"]), None), Some(AppConfig::default()));
    }

    #[test]
    fn test_help() {
        assert_eq!(AppConfig::from_args(&args(&["aw", "--help"]), None), None);
        assert_eq!(AppConfig::from_args(&args(&["aw", "-h"]), None), None);
    }
}
