use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use value_odds::data::export::export_to_path;
use value_odds::data::filter::{apply_filters, FilterSet};
use value_odds::data::loader::DEFAULT_LEAGUE_SUFFIX;
use value_odds::data::model::{BetRecord, BetTable, Rating};

struct League {
    name: &'static str,
    teams: &'static [&'static str],
}

const LEAGUES: [League; 3] = [
    League {
        name: "championship",
        teams: &[
            "Leeds", "Leicester", "Ipswich", "Southampton", "West Brom", "Norwich",
            "Hull", "Coventry", "Middlesbrough", "Preston", "Bristol City", "Cardiff",
        ],
    },
    League {
        name: "league_one",
        teams: &[
            "Portsmouth", "Derby", "Bolton", "Peterborough", "Oxford", "Barnsley",
            "Lincoln", "Blackpool", "Stevenage", "Wycombe",
        ],
    },
    League {
        name: "league_two",
        teams: &[
            "Stockport", "Wrexham", "Mansfield", "MK Dons", "Doncaster", "Crewe",
            "Barrow", "Crawley",
        ],
    },
];

const SEASONS: [(&str, i32); 3] = [("2021-22", 2021), ("2022-23", 2022), ("2023-24", 2023)];
const MARKETS: [&str; 3] = ["Home", "Draw", "Away"];
const FIXTURES_PER_SEASON: usize = 90;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn value_tier(available: f64, fair: f64) -> &'static str {
    let edge = available / fair;
    if edge >= 1.15 {
        "Excellent"
    } else if edge >= 1.05 {
        "Good"
    } else {
        "Fair"
    }
}

/// Model probability for a market given a match rating in `-15..=15`
/// (positive favours the home side).
fn model_probability(market: &str, rating: i32) -> f64 {
    let home = (0.45 + rating as f64 * 0.02).clamp(0.1, 0.8);
    let draw = 0.27 - (rating.abs() as f64 * 0.005);
    match market {
        "Home" => home,
        "Draw" => draw,
        _ => (1.0 - home - draw).max(0.05),
    }
}

fn generate_league(league: &League, rng: &mut SimpleRng) -> Vec<BetRecord> {
    let mut records = Vec::new();

    for (season, start_year) in SEASONS {
        for n in 0..FIXTURES_PER_SEASON {
            let home = rng.below(league.teams.len());
            let away = (home + 1 + rng.below(league.teams.len() - 1)) % league.teams.len();

            // Spread over August to May.
            let month_index = n * 10 / FIXTURES_PER_SEASON;
            let (year, month) = if month_index < 5 {
                (start_year, 8 + month_index)
            } else {
                (start_year + 1, month_index - 4)
            };
            let day = 1 + rng.below(28);

            let rating = rng.below(31) as i32 - 15;
            let Some(match_rating) = Rating::new(rating as f64) else {
                continue;
            };
            let market = MARKETS[rng.below(MARKETS.len())];

            let p = model_probability(market, rating);
            let fair_odds = round2(1.0 / p);
            let available_odds = round2(fair_odds * (0.95 + rng.next_f64() * 0.3));
            let won = rng.next_f64() < p;

            records.push(BetRecord {
                date: format!("{year:04}-{month:02}-{day:02}"),
                fixture: format!("{} v {}", league.teams[home], league.teams[away]),
                season: season.to_string(),
                league: None,
                market: market.to_string(),
                match_rating,
                available_odds,
                fair_odds,
                value_rating: value_tier(available_odds, fair_odds).to_string(),
                result: if won { "win" } else { "loss" }.to_string(),
                profit_loss: if won { round2(available_odds - 1.0) } else { -1.0 },
            });
        }
    }

    records
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let leagues_dir = out_dir.join("leagues");
    fs::create_dir_all(&leagues_dir)
        .with_context(|| format!("creating {}", leagues_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for league in &LEAGUES {
        let table = BetTable::from_records(generate_league(league, &mut rng));
        let view = apply_filters(&table, &FilterSet::all(&table));

        let path = leagues_dir.join(format!("{}{DEFAULT_LEAGUE_SUFFIX}", league.name));
        export_to_path(&view, &path)?;

        if league.name == "championship" {
            export_to_path(&view, &out_dir.join(format!("championship{DEFAULT_LEAGUE_SUFFIX}")))?;
        }
        println!("Wrote {} bets for {}", table.len(), league.name);
    }

    println!(
        "Single-league file in {}, per-league files in {}",
        out_dir.display(),
        leagues_dir.display()
    );
    Ok(())
}
