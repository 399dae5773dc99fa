use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::{BetRecord, Rating, NO_LEAGUE};

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Headline numbers for a filtered view.  Kept at full precision; use
/// [`Metrics::rounded`] for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub total_bets: usize,
    pub total_profit: f64,
    /// Percentage of bets won.
    pub strike_rate: f64,
    /// Summed profit per bet, as a percentage.  Stakes are not modelled, so
    /// this is average points per bet rather than return on stake.
    pub roi: f64,
}

impl Metrics {
    pub fn rounded(&self) -> Metrics {
        Metrics {
            total_bets: self.total_bets,
            total_profit: round2(self.total_profit),
            strike_rate: round2(self.strike_rate),
            roi: round2(self.roi),
        }
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is zero.
fn percent(part: f64, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part / whole as f64 * 100.0
    }
}

pub fn summarize(view: &FilteredView<'_>) -> Metrics {
    let mut total_profit = 0.0;
    let mut wins = 0usize;
    for rec in view.rows() {
        total_profit += rec.profit_loss;
        wins += usize::from(rec.is_win());
    }

    let total_bets = view.len();
    Metrics {
        total_bets,
        total_profit,
        strike_rate: percent(wins as f64, total_bets),
        roi: percent(total_profit, total_bets),
    }
}

// ---------------------------------------------------------------------------
// Grouped aggregates (chart series)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingProfit {
    pub rating: Rating,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierRoi {
    pub tier: String,
    pub bets: usize,
    pub profit: f64,
    pub wins: usize,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonMarketProfit {
    pub season: String,
    pub market: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueProfit {
    pub league: String,
    pub bets: usize,
    pub profit: f64,
}

/// Running totals for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    bets: usize,
    wins: usize,
    profit: f64,
}

impl Tally {
    fn add(&mut self, rec: &BetRecord) {
        self.bets += 1;
        self.wins += usize::from(rec.is_win());
        self.profit += rec.profit_loss;
    }
}

/// Tally rows by key; the `BTreeMap` gives ascending key order and only ever
/// holds keys that occur in the view.
fn tally_by<'a, K: Ord>(
    view: &FilteredView<'a>,
    key: impl Fn(&'a BetRecord) -> Option<K>,
) -> BTreeMap<K, Tally> {
    let mut groups: BTreeMap<K, Tally> = BTreeMap::new();
    for rec in view.rows() {
        if let Some(k) = key(rec) {
            groups.entry(k).or_default().add(rec);
        }
    }
    groups
}

/// Summed profit per distinct match rating, ascending by rating.
pub fn group_profit_by_rating(view: &FilteredView<'_>) -> Vec<RatingProfit> {
    tally_by(view, |rec| Some(rec.match_rating))
        .into_iter()
        .map(|(rating, t)| RatingProfit {
            rating,
            profit: t.profit,
        })
        .collect()
}

/// Bets, profit, wins and ROI per value tier, ascending by tier label.
pub fn roi_by_tier(view: &FilteredView<'_>) -> Vec<TierRoi> {
    tally_by(view, |rec| Some(rec.value_rating.as_str()))
        .into_iter()
        .map(|(tier, t)| TierRoi {
            tier: tier.to_string(),
            bets: t.bets,
            profit: t.profit,
            wins: t.wins,
            roi: percent(t.profit, t.bets),
        })
        .collect()
}

/// Summed profit per observed (season, market) pair, ascending by season then market.
pub fn group_profit_by_season_and_market(view: &FilteredView<'_>) -> Vec<SeasonMarketProfit> {
    tally_by(view, |rec| Some((rec.season.as_str(), rec.market.as_str())))
        .into_iter()
        .map(|((season, market), t)| SeasonMarketProfit {
            season: season.to_string(),
            market: market.to_string(),
            profit: t.profit,
        })
        .collect()
}

/// Bets and profit per league.  Rows without a league are grouped under
/// [`NO_LEAGUE`], and a table with no leagues at all yields nothing.
pub fn group_profit_by_league(view: &FilteredView<'_>) -> Vec<LeagueProfit> {
    let has_leagues = view.table().has_leagues();
    tally_by(view, |rec| has_leagues.then(|| rec.league_key()))
        .into_iter()
        .map(|(league, t)| LeagueProfit {
            league: league.to_string(),
            bets: t.bets,
            profit: t.profit,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard renders for one filter selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub metrics: Metrics,
    pub by_rating: Vec<RatingProfit>,
    pub by_tier: Vec<TierRoi>,
    pub by_season_market: Vec<SeasonMarketProfit>,
    pub by_league: Vec<LeagueProfit>,
}

impl Report {
    pub fn build(view: &FilteredView<'_>) -> Self {
        Report {
            metrics: summarize(view),
            by_rating: group_profit_by_rating(view),
            by_tier: roi_by_tier(view),
            by_season_market: group_profit_by_season_and_market(view),
            by_league: group_profit_by_league(view),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.total_bets == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply_filters, FilterSet, RatingRange};
    use crate::data::model::tests::bet;
    use crate::data::model::BetTable;

    fn scenario_table() -> BetTable {
        BetTable::from_records(vec![
            bet("23-24", "Home", 7.0, "win", 1.5),
            bet("23-24", "Draw", 7.0, "loss", -1.0),
            bet("22-23", "Away", 3.0, "win", 2.0),
        ])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn season_filter_without_draws() {
        let table = scenario_table();
        let filters = FilterSet {
            seasons: ["23-24".to_string()].into_iter().collect(),
            exclude_draws: true,
            ..FilterSet::all(&table)
        };
        let metrics = summarize(&apply_filters(&table, &filters));

        assert_eq!(metrics.total_bets, 1);
        assert!(close(metrics.total_profit, 1.5));
        assert!(close(metrics.strike_rate, 100.0));
        assert!(close(metrics.roi, 150.0));
    }

    #[test]
    fn empty_view_is_all_zero() {
        let table = scenario_table();
        let filters = FilterSet {
            markets: BTreeSet::new(),
            ..FilterSet::all(&table)
        };
        let view = apply_filters(&table, &filters);
        let report = Report::build(&view);

        assert!(report.is_empty());
        assert_eq!(report.metrics, Metrics::default());
        assert!(report.by_rating.is_empty());
        assert!(report.by_tier.is_empty());
        assert!(report.by_season_market.is_empty());
        assert!(report.by_league.is_empty());
    }

    #[test]
    fn identity_filter_sums_whole_table() {
        let table = scenario_table();
        let metrics = summarize(&apply_filters(&table, &FilterSet::all(&table)));
        let total: f64 = table.records().iter().map(|r| r.profit_loss).sum();

        assert_eq!(metrics.total_bets, 3);
        assert!(close(metrics.total_profit, total));
        assert!(close(metrics.strike_rate, 200.0 / 3.0));
    }

    #[test]
    fn profit_by_rating_within_range() {
        let table = scenario_table();
        let mut filters = FilterSet::all(&table);
        filters.rating_range = Some(RatingRange {
            min: Rating::new(5.0).unwrap(),
            max: Rating::new(10.0).unwrap(),
        });
        let groups = group_profit_by_rating(&apply_filters(&table, &filters));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rating.value(), 7.0);
        assert!(close(groups[0].profit, 0.5));
    }

    #[test]
    fn profit_by_rating_is_ascending() {
        let table = BetTable::from_records(vec![
            bet("23-24", "Home", 9.0, "win", 1.0),
            bet("23-24", "Home", 2.5, "loss", -1.0),
            bet("23-24", "Away", 9.0, "win", 3.0),
        ]);
        let groups = group_profit_by_rating(&apply_filters(&table, &FilterSet::all(&table)));
        let keys: Vec<f64> = groups.iter().map(|g| g.rating.value()).collect();
        assert_eq!(keys, [2.5, 9.0]);
        assert!(close(groups[1].profit, 4.0));
    }

    #[test]
    fn tier_groups_partition_the_view() {
        let mut records = vec![
            bet("23-24", "Home", 7.0, "win", 1.5),
            bet("23-24", "Draw", 7.0, "loss", -1.0),
            bet("22-23", "Away", 3.0, "win", 2.0),
        ];
        records[1].value_rating = "Excellent".to_string();
        records[2].value_rating = "Fair".to_string();
        let table = BetTable::from_records(records);
        let view = apply_filters(&table, &FilterSet::all(&table));

        let tiers = roi_by_tier(&view);
        let names: Vec<_> = tiers.iter().map(|t| t.tier.as_str()).collect();
        assert_eq!(names, ["Excellent", "Fair", "Good"]);
        assert_eq!(tiers.iter().map(|t| t.bets).sum::<usize>(), summarize(&view).total_bets);

        let excellent = &tiers[0];
        assert_eq!((excellent.bets, excellent.wins), (1, 0));
        assert!(close(excellent.roi, -100.0));
        let good = &tiers[2];
        assert!(close(good.roi, 150.0));
    }

    #[test]
    fn season_market_pairs() {
        let table = BetTable::from_records(vec![
            bet("23-24", "Home", 7.0, "win", 1.5),
            bet("22-23", "Home", 6.0, "loss", -1.0),
            bet("23-24", "Home", 4.0, "win", 0.5),
            bet("23-24", "Away", 4.0, "loss", -1.0),
        ]);
        let pairs = group_profit_by_season_and_market(&apply_filters(&table, &FilterSet::all(&table)));
        let keys: Vec<_> = pairs
            .iter()
            .map(|p| (p.season.as_str(), p.market.as_str()))
            .collect();
        assert_eq!(keys, [("22-23", "Home"), ("23-24", "Away"), ("23-24", "Home")]);
        assert!(close(pairs[2].profit, 2.0));
    }

    #[test]
    fn league_groups_label_untagged_rows() {
        let mut a = bet("23-24", "Home", 7.0, "win", 1.5);
        a.league = Some("premier".to_string());
        let b = bet("23-24", "Home", 7.0, "loss", -1.0);
        let table = BetTable::from_records(vec![a, b]);

        let leagues = group_profit_by_league(&apply_filters(&table, &FilterSet::all(&table)));
        assert_eq!(
            leagues,
            [
                LeagueProfit { league: NO_LEAGUE.to_string(), bets: 1, profit: -1.0 },
                LeagueProfit { league: "premier".to_string(), bets: 1, profit: 1.5 },
            ]
        );

        let untagged = scenario_table();
        let view = apply_filters(&untagged, &FilterSet::all(&untagged));
        assert!(group_profit_by_league(&view).is_empty());
    }

    #[test]
    fn signed_zero_ratings_share_a_group() {
        let table = BetTable::from_records(vec![
            bet("23-24", "Home", -0.0, "loss", -1.0),
            bet("23-24", "Home", 0.0, "win", 1.0),
        ]);
        let mut filters = FilterSet::all(&table);
        filters.rating_range = Some(RatingRange {
            min: Rating::new(0.0).unwrap(),
            max: Rating::new(5.0).unwrap(),
        });
        let view = apply_filters(&table, &filters);
        assert_eq!(view.len(), 2);

        let groups = group_profit_by_rating(&view);
        assert_eq!(groups.len(), 1);
        assert!(close(groups[0].profit, 0.0));
    }

    #[test]
    fn rounding_for_display() {
        let metrics = Metrics {
            total_bets: 3,
            total_profit: 2.0 / 3.0,
            strike_rate: 200.0 / 3.0,
            roi: -12.345,
        };
        let shown = metrics.rounded();
        assert_eq!(shown.total_profit, 0.67);
        assert_eq!(shown.strike_rate, 66.67);
        assert!(close(shown.roi, -12.35) || close(shown.roi, -12.34));
        assert_eq!(round2(0.0), 0.0);
    }
}
