use std::fs;
use std::io;
use std::path::Path;

use log::info;

use super::filter::FilteredView;
use super::model::{BetRecord, LEAGUE_COLUMN, REQUIRED_COLUMNS};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// CSV export of a filtered view
// ---------------------------------------------------------------------------

/// Header row for an export, with `League` after `Season` when the table
/// carries leagues.
pub fn export_headers(with_league: bool) -> Vec<&'static str> {
    let mut headers = Vec::with_capacity(REQUIRED_COLUMNS.len() + 1);
    for col in REQUIRED_COLUMNS {
        headers.push(col);
        if with_league && col == "Season" {
            headers.push(LEAGUE_COLUMN);
        }
    }
    headers
}

/// One record as display/export cells, in [`export_headers`] order.
pub fn record_cells(rec: &BetRecord, with_league: bool) -> Vec<String> {
    let mut row = vec![
        rec.date.clone(),
        rec.fixture.clone(),
        rec.season.clone(),
    ];
    if with_league {
        row.push(rec.league.clone().unwrap_or_default());
    }
    row.extend([
        rec.market.clone(),
        rec.match_rating.to_string(),
        rec.available_odds.to_string(),
        rec.fair_odds.to_string(),
        rec.value_rating.clone(),
        rec.result.clone(),
        rec.profit_loss.to_string(),
    ]);
    row
}

/// Write `view` as CSV in the same layout the loader reads.
///
/// Numbers use the shortest representation that parses back to the same
/// value, so loading the output reproduces the view row for row.
pub fn write_csv<W: io::Write>(view: &FilteredView<'_>, out: W) -> csv::Result<()> {
    let with_league = view.table().has_leagues();
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(export_headers(with_league))?;
    for rec in view.rows() {
        writer.write_record(record_cells(rec, with_league))?;
    }
    writer.flush()?;
    Ok(())
}

/// The export as an in-memory string (clipboard / download payload).
pub fn to_csv_string(view: &FilteredView<'_>) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the export to `path`, replacing any existing file.
pub fn export_to_path(view: &FilteredView<'_>, path: &Path) -> Result<(), LoadError> {
    let file = fs::File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(view, io::BufWriter::new(file)).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} bets to {}", view.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::Path;

    use super::*;
    use crate::data::filter::{apply_filters, FilterSet};
    use crate::data::loader::{load, read_records, Source};
    use crate::data::model::tests::bet;
    use crate::data::model::BetTable;

    fn sample_table() -> BetTable {
        let mut tricky = bet("22-23", "Away", 3.25, "win", 2.0 / 3.0);
        tricky.fixture = "Sheffield Wed v \"QPR\", replay".to_string();
        tricky.available_odds = 4.1;
        BetTable::from_records(vec![
            bet("23-24", "Home", 7.0, "win", 1.5),
            bet("23-24", "Draw", 7.0, "loss", -1.0),
            tricky,
        ])
    }

    #[test]
    fn headers_follow_loader_layout() {
        assert_eq!(export_headers(false), REQUIRED_COLUMNS.to_vec());
        let with_league = export_headers(true);
        assert_eq!(with_league[3], "League");
        assert_eq!(with_league.len(), 11);
    }

    #[test]
    fn export_reloads_to_the_same_rows() {
        let table = sample_table();
        let filters = FilterSet {
            markets: ["Away", "Home"].iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
            ..FilterSet::all(&table)
        };
        let view = apply_filters(&table, &filters);
        let text = to_csv_string(&view).unwrap();

        let (_, reloaded) = read_records(text.as_bytes(), Path::new("export.csv"), None).unwrap();
        let original: Vec<_> = view.rows().cloned().collect();
        assert_eq!(reloaded, original);

        // Passing the reloaded table through an identity filter changes nothing.
        let reloaded = BetTable::from_records(reloaded);
        let again = apply_filters(&reloaded, &FilterSet::all(&reloaded));
        assert_eq!(again.rows().cloned().collect::<Vec<_>>(), original);
    }

    #[test]
    fn integer_ratings_stay_integers() {
        let table = sample_table();
        let text = to_csv_string(&apply_filters(&table, &FilterSet::all(&table))).unwrap();
        let first_row = text.lines().nth(1).unwrap();
        assert_eq!(
            first_row,
            "2023-08-12,Leeds v Cardiff,23-24,Home,7,2.5,2.1,Good,win,1.5"
        );
    }

    #[test]
    fn league_column_round_trips_through_a_file() {
        let mut rec = bet("23-24", "Home", 7.0, "win", 1.5);
        rec.league = Some("championship".to_string());
        let table = BetTable::from_records(vec![rec]);
        let view = apply_filters(&table, &FilterSet::all(&table));

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("filtered.csv");
        export_to_path(&view, &path).unwrap();

        let reloaded = load(&Source::File(path)).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn empty_view_exports_header_only() {
        let table = sample_table();
        let filters = FilterSet {
            seasons: BTreeSet::new(),
            ..FilterSet::all(&table)
        };
        let text = to_csv_string(&apply_filters(&table, &filters)).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
