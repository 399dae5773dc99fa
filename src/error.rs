use std::path::PathBuf;

use thiserror::Error;

/// Failures while discovering, parsing or exporting backtest CSV files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing to load; the session cannot start.
    #[error("no data available: no backtest files found at {}", location.display())]
    NoSources { location: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row or a cell that does not parse as its column's type.
    #[error("parsing {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error(
        "{} has columns {found:?}, expected the same columns as the other files {expected:?}",
        path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Failures while reading the dashboard configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
