use std::collections::BTreeSet;

use super::model::{BetRecord, BetTable, Rating};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// The categorical columns the sidebar filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Season,
    League,
    Market,
    ValueTier,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Season, Facet::League, Facet::Market, Facet::ValueTier];

    pub fn label(self) -> &'static str {
        match self {
            Facet::Season => "Season",
            Facet::League => "League",
            Facet::Market => "Market",
            Facet::ValueTier => "Value Tier",
        }
    }

    /// Every value of this facet present in the table.
    pub fn domain(self, table: &BetTable) -> &BTreeSet<String> {
        match self {
            Facet::Season => table.seasons(),
            Facet::League => table.leagues(),
            Facet::Market => table.markets(),
            Facet::ValueTier => table.value_tiers(),
        }
    }
}

/// Inclusive `[min, max]` interval over match ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRange {
    pub min: Rating,
    pub max: Rating,
}

impl RatingRange {
    pub fn contains(&self, rating: Rating) -> bool {
        self.min <= rating && rating <= self.max
    }
}

/// The user's filter selection.
///
/// An empty set for a categorical facet selects nothing (the view is empty),
/// it does not mean "no filter".  `leagues: None` and `rating_range: None`
/// leave that column unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub seasons: BTreeSet<String>,
    pub leagues: Option<BTreeSet<String>>,
    pub markets: BTreeSet<String>,
    pub value_tiers: BTreeSet<String>,
    pub rating_range: Option<RatingRange>,
    /// Drop `Draw` market rows after the other predicates.
    pub exclude_draws: bool,
}

impl FilterSet {
    /// Select everything in `table`: all values, full rating range, draws kept.
    pub fn all(table: &BetTable) -> Self {
        FilterSet {
            seasons: table.seasons().clone(),
            leagues: table.has_leagues().then(|| table.leagues().clone()),
            markets: table.markets().clone(),
            value_tiers: table.value_tiers().clone(),
            rating_range: table
                .rating_bounds()
                .map(|(min, max)| RatingRange { min, max }),
            exclude_draws: false,
        }
    }

    /// Whether `record` passes every predicate, draw exclusion included.
    pub fn accepts(&self, record: &BetRecord) -> bool {
        let league_ok = match &self.leagues {
            None => true,
            Some(selected) => selected.contains(record.league_key()),
        };

        self.seasons.contains(&record.season)
            && league_ok
            && self.markets.contains(&record.market)
            && self.value_tiers.contains(&record.value_rating)
            && self
                .rating_range
                .map_or(true, |range| range.contains(record.match_rating))
            && !(self.exclude_draws && record.is_draw_market())
    }

    /// Selected values for a facet.  `None` only for an unconstrained league.
    pub fn selected(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        match facet {
            Facet::Season => Some(&self.seasons),
            Facet::League => self.leagues.as_ref(),
            Facet::Market => Some(&self.markets),
            Facet::ValueTier => Some(&self.value_tiers),
        }
    }

    /// Mutable selection for a facet; an unconstrained league stays `None`.
    fn selected_mut(&mut self, facet: Facet) -> Option<&mut BTreeSet<String>> {
        match facet {
            Facet::Season => Some(&mut self.seasons),
            Facet::League => self.leagues.as_mut(),
            Facet::Market => Some(&mut self.markets),
            Facet::ValueTier => Some(&mut self.value_tiers),
        }
    }

    /// Flip a single value in a facet's selection.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        if let Some(selected) = self.selected_mut(facet) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
        }
    }

    /// Select every value of `facet` present in `table`.  Leagues are only
    /// constrained when the table has any.
    pub fn select_all(&mut self, facet: Facet, table: &BetTable) {
        if facet == Facet::League {
            self.leagues = table.has_leagues().then(|| table.leagues().clone());
        } else if let Some(selected) = self.selected_mut(facet) {
            *selected = facet.domain(table).clone();
        }
    }

    /// Deselect every value of `facet`.
    pub fn select_none(&mut self, facet: Facet) {
        if let Some(selected) = self.selected_mut(facet) {
            selected.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Read-only subset of a [`BetTable`]: the table handle plus the ascending
/// indices of the rows that passed.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a BetTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from indices cached by the caller.
    pub fn from_indices(table: &'a BetTable, indices: Vec<usize>) -> Self {
        debug_assert!(indices.iter().all(|&i| i < table.len()));
        FilteredView { table, indices }
    }

    pub fn table(&self) -> &'a BetTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a BetRecord> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply `filters` to `table`.  Pure: the table is never touched and each call
/// allocates a fresh view.
pub fn apply_filters<'a>(table: &'a BetTable, filters: &FilterSet) -> FilteredView<'a> {
    let indices = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.accepts(rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { table, indices }
}
