use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::model::{BetRecord, BetTable, REQUIRED_COLUMNS};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Suffix of the per-league backtest exports, e.g. `league_one_rating_backtest.csv`.
pub const DEFAULT_LEAGUE_SUFFIX: &str = "_rating_backtest.csv";

/// Where the unified table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// One backtest file; rows keep whatever `League` column it has.
    File(PathBuf),
    /// Every file in `dir` matching `pattern`; each row is tagged with the
    /// league derived from its file name.
    Directory { dir: PathBuf, pattern: FilePattern },
}

impl Source {
    pub fn location(&self) -> &Path {
        match self {
            Source::File(path) => path,
            Source::Directory { dir, .. } => dir,
        }
    }
}

/// File-name pattern `prefix*suffix` used to enumerate league files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    pub prefix: String,
    pub suffix: String,
}

impl Default for FilePattern {
    fn default() -> Self {
        FilePattern {
            prefix: String::new(),
            suffix: DEFAULT_LEAGUE_SUFFIX.to_string(),
        }
    }
}

impl FilePattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        FilePattern {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() >= self.prefix.len() + self.suffix.len()
            && file_name.starts_with(&self.prefix)
            && file_name.ends_with(&self.suffix)
    }

    /// League label for a matching file: the name with prefix and suffix
    /// stripped.  Falls back to the file stem when nothing is left.
    pub fn league_tag(&self, file_name: &str) -> Option<String> {
        if !self.matches(file_name) {
            return None;
        }
        let tag = &file_name[self.prefix.len()..file_name.len() - self.suffix.len()];
        if tag.is_empty() {
            Path::new(file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        } else {
            Some(tag.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the unified table for a session.
///
/// Fails with [`LoadError::NoSources`] when the file does not exist or the
/// directory holds no matching files; the caller must not render anything
/// as if data were present in that case.
pub fn load(source: &Source) -> Result<BetTable, LoadError> {
    let records = match source {
        Source::File(path) => {
            if !path.is_file() {
                return Err(LoadError::NoSources {
                    location: path.clone(),
                });
            }
            load_file(path, None)?.1
        }
        Source::Directory { dir, pattern } => load_directory(dir, pattern)?,
    };

    let table = BetTable::from_records(records);
    info!(
        "Loaded {} bets from {} ({} seasons, {} leagues, {} markets)",
        table.len(),
        source.location().display(),
        table.seasons().len(),
        table.leagues().len(),
        table.markets().len()
    );
    Ok(table)
}

/// List the files in `dir` matching `pattern`, sorted by name.
pub fn discover(dir: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>, LoadError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NoSources {
                location: dir.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if !pattern.matches(name) || !path.is_file() {
            debug!("Skipping {name}");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn load_directory(dir: &Path, pattern: &FilePattern) -> Result<Vec<BetRecord>, LoadError> {
    let files = discover(dir, pattern)?;
    if files.is_empty() {
        return Err(LoadError::NoSources {
            location: dir.to_path_buf(),
        });
    }

    let mut expected: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for path in &files {
        let league = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| pattern.league_tag(name));
        let (mut headers, mut rows) = load_file(path, league.as_deref())?;
        debug!(
            "{}: {} rows tagged {:?}",
            path.display(),
            rows.len(),
            league
        );

        headers.sort();
        match &expected {
            None => expected = Some(headers),
            Some(exp) if *exp != headers => {
                return Err(LoadError::SchemaMismatch {
                    path: path.clone(),
                    expected: exp.clone(),
                    found: headers,
                });
            }
            Some(_) => {}
        }

        records.append(&mut rows);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse one backtest file.  Returns the header row alongside the records.
pub fn load_file(
    path: &Path,
    league: Option<&str>,
) -> Result<(Vec<String>, Vec<BetRecord>), LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file, path, league)
}

/// Parse backtest rows from any reader.  `origin` only labels errors.
///
/// When `league` is given it overrides the `League` column of every row.
pub fn read_records<R: io::Read>(
    input: R,
    origin: &Path,
    league: Option<&str>,
) -> Result<(Vec<String>, Vec<BetRecord>), LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(LoadError::MissingColumn {
            path: origin.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<BetRecord>() {
        let mut record = result.map_err(csv_err)?;
        if let Some(tag) = league {
            record.league = Some(tag.to_string());
        }
        records.push(record);
    }

    Ok((headers, records))
}
