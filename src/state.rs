use std::path::Path;

use anyhow::{Context, Result};
use value_odds::data::export;
use value_odds::data::filter::{apply_filters, Facet, FilterSet, FilteredView, RatingRange};
use value_odds::data::loader::{self, Source};
use value_odds::data::model::{BetTable, Rating};
use value_odds::data::summary::Report;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Tabs of the central panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Performance,
    StrategyExplorer,
    FilteredData,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Performance, Tab::StrategyExplorer, Tab::FilteredData];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Performance => "Performance",
            Tab::StrategyExplorer => "Strategy Explorer",
            Tab::FilteredData => "Filtered Data",
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
#[derive(Default)]
pub struct DashboardState {
    /// The session's unified table; `None` until a load succeeds.
    pub table: Option<BetTable>,

    pub filters: FilterSet,

    /// Rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics and chart series for `visible_indices` (cached).
    pub report: Report,

    /// Stable colour per market for the season/market chart.
    pub market_colors: Option<ColorMap>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Load `source` and make it the session table.  On failure the previous
    /// table (if any) stays and the error is surfaced as the status.
    pub fn load(&mut self, source: &Source) {
        match loader::load(source) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.location().display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded table, select everything and recompute.
    pub fn set_table(&mut self, table: BetTable) {
        self.filters = FilterSet::all(&table);
        self.market_colors = Some(ColorMap::new(table.markets()));
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view and report after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let view = apply_filters(table, &self.filters);
        self.report = Report::build(&view);
        self.visible_indices = view.into_indices();
        log::debug!(
            "Filters matched {} of {} bets",
            self.visible_indices.len(),
            table.len()
        );
    }

    /// The current filtered view, rebuilt from the cached indices.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.table
            .as_ref()
            .map(|table| FilteredView::from_indices(table, self.visible_indices.clone()))
    }

    pub fn toggle(&mut self, facet: Facet, value: &str) {
        self.filters.toggle(facet, value);
        self.refilter();
    }

    pub fn select_all(&mut self, facet: Facet) {
        if let Some(table) = &self.table {
            self.filters.select_all(facet, table);
            self.refilter();
        }
    }

    pub fn select_none(&mut self, facet: Facet) {
        self.filters.select_none(facet);
        self.refilter();
    }

    /// Set the inclusive rating range.  Non-finite bounds are ignored.
    pub fn set_rating_range(&mut self, min: f64, max: f64) {
        if let (Some(min), Some(max)) = (Rating::new(min), Rating::new(max)) {
            self.filters.rating_range = Some(RatingRange { min, max });
            self.refilter();
        }
    }

    pub fn set_exclude_draws(&mut self, exclude: bool) {
        self.filters.exclude_draws = exclude;
        self.refilter();
    }

    /// Write the current view to `path` as CSV.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let view = self.view().context("no data loaded")?;
        let n = view.len();
        export::export_to_path(&view, path)
            .with_context(|| format!("exporting filtered bets to {}", path.display()))?;
        self.status_message = Some(format!("Exported {n} bets to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use value_odds::data::loader::read_records;

    const CSV: &str = "\
Date,Fixture,Season,Market,MatchRating,Available Odds,Fair Odds,Value Rating,Result,P/L
2023-08-12,Leeds v Cardiff,23-24,Home,7,2.5,2.1,Good,win,1.5
2023-08-19,Hull v Bristol City,23-24,Draw,7,3.4,3.1,Fair,loss,-1
2022-10-01,Derby v Bolton,22-23,Away,3,3,2.6,Excellent,win,2
";

    fn loaded_state() -> DashboardState {
        let (_, records) = read_records(CSV.as_bytes(), Path::new("mem.csv"), None).unwrap();
        let mut state = DashboardState::default();
        state.set_table(BetTable::from_records(records));
        state
    }

    #[test]
    fn new_table_selects_everything() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, [0, 1, 2]);
        assert_eq!(state.report.metrics.total_bets, 3);
        assert!(state.market_colors.is_some());
    }

    #[test]
    fn filter_changes_recompute_the_report() {
        let mut state = loaded_state();

        state.toggle(Facet::Season, "22-23");
        state.set_exclude_draws(true);
        assert_eq!(state.visible_indices, [0]);
        assert_eq!(state.report.metrics.roi, 150.0);

        state.select_none(Facet::Market);
        assert!(state.report.is_empty());
        assert!(state.report.by_rating.is_empty());

        state.select_all(Facet::Market);
        state.set_exclude_draws(false);
        assert_eq!(state.visible_indices, [0, 1]);
    }

    #[test]
    fn rating_range_from_sliders() {
        let mut state = loaded_state();
        state.set_rating_range(5.0, 10.0);
        assert_eq!(state.visible_indices, [0, 1]);
        assert_eq!(state.report.by_rating.len(), 1);

        state.set_rating_range(f64::NAN, 10.0);
        assert_eq!(state.visible_indices, [0, 1]);
    }

    #[test]
    fn failed_load_keeps_nothing_rendered() {
        let dir = TempDir::new().unwrap();
        let mut state = DashboardState::default();
        state.load(&Source::File(dir.path().join("missing.csv")));

        assert!(state.table.is_none());
        assert!(state.view().is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("no data available"), "{msg}");
    }

    #[test]
    fn export_writes_the_visible_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filtered.csv");
        let mut state = loaded_state();
        state.toggle(Facet::Market, "Draw");

        state.export_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("Hull v Bristol City"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Exported 2 bets"));
    }

    #[test]
    fn export_without_data_fails() {
        let dir = TempDir::new().unwrap();
        let mut state = DashboardState::default();
        assert!(state.export_to(&dir.path().join("x.csv")).is_err());
    }
}
