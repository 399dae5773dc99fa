use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::data::loader::{FilePattern, Source, DEFAULT_LEAGUE_SUFFIX};
use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VALUE_ODDS_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "value-odds.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field has a default, so `{}` is a valid file.
///
/// ```json
/// { "data_path": "leagues", "league_suffix": "_rating_backtest.csv" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// A backtest CSV, or a directory of per-league backtest CSVs.
    pub data_path: PathBuf,
    pub league_prefix: String,
    pub league_suffix: String,
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: PathBuf::from("championship_rating_backtest.csv"),
            league_prefix: String::new(),
            league_suffix: DEFAULT_LEAGUE_SUFFIX.to_string(),
            title: "Value Odds – Match Rating Betting Dashboard".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Resolve the config for this process: `$VALUE_ODDS_CONFIG`, else
    /// `value-odds.json` in the working directory, else defaults.  A data
    /// path given on the command line wins over the file.
    pub fn resolve(env_path: Option<PathBuf>, cli_data_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let file = env_path.or_else(|| {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        });

        let mut config = match file {
            Some(path) => {
                info!("Reading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file, using defaults");
                DashboardConfig::default()
            }
        };

        if let Some(path) = cli_data_path {
            config.data_path = path;
        }
        Ok(config)
    }

    pub fn pattern(&self) -> FilePattern {
        FilePattern::new(self.league_prefix.clone(), self.league_suffix.clone())
    }

    /// A directory selects the multi-league mode; anything else is read as a
    /// single file.
    pub fn source(&self) -> Source {
        if self.data_path.is_dir() {
            Source::Directory {
                dir: self.data_path.clone(),
                pattern: self.pattern(),
            }
        } else {
            Source::File(self.data_path.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_object_gives_defaults() {
        let config = DashboardConfig::from_json("{}", Path::new("cfg.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = DashboardConfig::from_json(
            r#"{ "data_path": "leagues", "league_prefix": "bt_" }"#,
            Path::new("cfg.json"),
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("leagues"));
        assert_eq!(config.pattern(), FilePattern::new("bt_", DEFAULT_LEAGUE_SUFFIX));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = DashboardConfig::from_json("{ data_path", Path::new("cfg.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn cli_path_overrides_file() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("cfg.json");
        std::fs::write(&cfg, r#"{ "data_path": "from_file.csv" }"#).unwrap();

        let config =
            DashboardConfig::resolve(Some(cfg.clone()), Some(PathBuf::from("cli.csv"))).unwrap();
        assert_eq!(config.data_path, PathBuf::from("cli.csv"));

        let config = DashboardConfig::resolve(Some(cfg), None).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from_file.csv"));

        let missing = DashboardConfig::resolve(Some(dir.path().join("absent.json")), None);
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn directory_selects_multi_league_mode() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig {
            data_path: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.source(), Source::Directory { .. }));

        let config = DashboardConfig {
            data_path: dir.path().join("one.csv"),
            ..DashboardConfig::default()
        };
        assert_eq!(config.source(), Source::File(dir.path().join("one.csv")));
    }
}
