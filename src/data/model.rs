use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Rating – a totally ordered match rating
// ---------------------------------------------------------------------------

/// A match rating.  Ratings may be integers or floats in the source file, so
/// they are held as `f64`; NaN and infinities are rejected on construction so
/// that the manual `Ord` below is a true total order over loaded data.
/// Negative zero is stored as zero, so `Ord` and `PartialEq` agree.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub struct Rating(f64);

impl Rating {
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Rating(value + 0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("match rating must be finite, got {value}"))
    }
}

// -- Manual Eq/Ord so ratings can key a BTreeMap --

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `f64` Display is the shortest round-trip form: 7.0 prints as "7".
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BetRecord – one row of the backtest table
// ---------------------------------------------------------------------------

/// One settled historical wager.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BetRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Fixture")]
    pub fixture: String,
    #[serde(rename = "Season")]
    pub season: String,
    /// Present in the multi-league variant, either read from a `League`
    /// column or synthesized from the source file name.
    #[serde(rename = "League", default)]
    pub league: Option<String>,
    #[serde(rename = "Market")]
    pub market: String,
    #[serde(rename = "MatchRating")]
    pub match_rating: Rating,
    #[serde(rename = "Available Odds", deserialize_with = "positive_odds")]
    pub available_odds: f64,
    #[serde(rename = "Fair Odds", deserialize_with = "positive_odds")]
    pub fair_odds: f64,
    #[serde(rename = "Value Rating")]
    pub value_rating: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "P/L", deserialize_with = "finite")]
    pub profit_loss: f64,
}

fn finite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("expected a finite number, got {value}")))
    }
}

fn positive_odds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = finite(deserializer)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("decimal odds must be positive, got {value}")))
    }
}

pub const RESULT_WIN: &str = "win";
/// League label standing in for a blank `League` cell in a table that
/// otherwise has leagues.
pub const NO_LEAGUE: &str = "(none)";
pub const MARKET_DRAW: &str = "Draw";

impl BetRecord {
    pub fn is_win(&self) -> bool {
        self.result == RESULT_WIN
    }

    pub fn is_draw_market(&self) -> bool {
        self.market == MARKET_DRAW
    }

    /// League as a filter value; blank leagues map to [`NO_LEAGUE`].
    pub fn league_key(&self) -> &str {
        self.league.as_deref().unwrap_or(NO_LEAGUE)
    }
}

/// Columns every source file must carry, in export order (minus `League`).
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Date",
    "Fixture",
    "Season",
    "Market",
    "MatchRating",
    "Available Odds",
    "Fair Odds",
    "Value Rating",
    "Result",
    "P/L",
];

pub const LEAGUE_COLUMN: &str = "League";

// ---------------------------------------------------------------------------
// BetTable – the unified, immutable dataset
// ---------------------------------------------------------------------------

/// The unified table for one dashboard session, with the categorical
/// domains enumerated up front for the filter widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BetTable {
    records: Vec<BetRecord>,
    seasons: BTreeSet<String>,
    leagues: BTreeSet<String>,
    markets: BTreeSet<String>,
    value_tiers: BTreeSet<String>,
    rating_bounds: Option<(Rating, Rating)>,
    integer_ratings: bool,
}

impl BetTable {
    /// Build the column domains from the loaded records.
    pub fn from_records(records: Vec<BetRecord>) -> Self {
        let mut seasons = BTreeSet::new();
        let mut leagues = BTreeSet::new();
        let mut markets = BTreeSet::new();
        let mut value_tiers = BTreeSet::new();
        let mut rating_bounds: Option<(Rating, Rating)> = None;
        let mut blank_league = false;
        let mut integer_ratings = true;

        for rec in &records {
            seasons.insert(rec.season.clone());
            match &rec.league {
                Some(league) => {
                    leagues.insert(league.clone());
                }
                None => blank_league = true,
            }
            markets.insert(rec.market.clone());
            value_tiers.insert(rec.value_rating.clone());

            let r = rec.match_rating;
            integer_ratings &= r.value().fract() == 0.0;
            rating_bounds = Some(match rating_bounds {
                None => (r, r),
                Some((lo, hi)) => (lo.min(r), hi.max(r)),
            });
        }

        // A partly blank League column keeps its blank rows selectable.
        if blank_league && !leagues.is_empty() {
            leagues.insert(NO_LEAGUE.to_string());
        }

        BetTable {
            records,
            seasons,
            leagues,
            markets,
            value_tiers,
            rating_bounds,
            integer_ratings,
        }
    }

    pub fn records(&self) -> &[BetRecord] {
        &self.records
    }

    pub fn seasons(&self) -> &BTreeSet<String> {
        &self.seasons
    }

    pub fn leagues(&self) -> &BTreeSet<String> {
        &self.leagues
    }

    pub fn markets(&self) -> &BTreeSet<String> {
        &self.markets
    }

    pub fn value_tiers(&self) -> &BTreeSet<String> {
        &self.value_tiers
    }

    /// Lowest and highest match rating, `None` for an empty table.
    pub fn rating_bounds(&self) -> Option<(Rating, Rating)> {
        self.rating_bounds
    }

    /// Whether every match rating is a whole number.
    pub fn has_integer_ratings(&self) -> bool {
        self.integer_ratings
    }

    /// Whether any row carries a league label.
    pub fn has_leagues(&self) -> bool {
        !self.leagues.is_empty()
    }

    /// Number of bets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
