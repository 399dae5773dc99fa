use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotUi};

use value_odds::data::summary::{LeagueProfit, RatingProfit, SeasonMarketProfit, TierRoi};

use crate::color::{generate_palette, profit_color, ColorMap};

const CHART_HEIGHT: f32 = 320.0;

/// A fixed (non-zoomable) bar plot; `add` draws the charts into it.
fn show_bars(ui: &mut Ui, id: &str, x_label: &str, y_label: &str, add: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, add);
}

/// Shown instead of a chart when the filters leave nothing to plot.
pub fn no_data(ui: &mut Ui) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("No bets match the current filters");
        ui.label("Widen the season, market, tier or rating selection in the sidebar.");
    });
    ui.add_space(24.0);
}

/// Label row mapping category positions on the x axis to their names.
fn category_key(ui: &mut Ui, labels: &[&str]) {
    let key = labels
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{i} = {l}"))
        .collect::<Vec<_>>()
        .join("   ");
    ui.small(key);
}

// ---------------------------------------------------------------------------
// Performance tab
// ---------------------------------------------------------------------------

/// Total profit per match rating.  Bars sit at their rating value, so gaps
/// in the ratings stay visible.
pub fn profit_by_rating(ui: &mut Ui, groups: &[RatingProfit]) {
    let min_gap = groups
        .windows(2)
        .map(|w| w[1].rating.value() - w[0].rating.value())
        .fold(f64::INFINITY, f64::min);
    let width = if min_gap.is_finite() { min_gap * 0.8 } else { 0.8 };

    let bars: Vec<Bar> = groups
        .iter()
        .map(|g| {
            Bar::new(g.rating.value(), g.profit)
                .name(format!("Rating {}: {:.2} pts", g.rating, g.profit))
                .fill(profit_color(g.profit))
                .width(width)
        })
        .collect();

    show_bars(ui, "profit_by_rating", "Match Rating", "Total Profit", |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name("P/L"));
    });
}

/// ROI % per value tier, one legend entry per tier.
pub fn roi_by_tier(ui: &mut Ui, tiers: &[TierRoi]) {
    let palette = generate_palette(tiers.len());

    show_bars(ui, "roi_by_tier", "Value Tier", "ROI %", |plot_ui| {
        for (i, (t, color)) in tiers.iter().zip(palette).enumerate() {
            let bar = Bar::new(i as f64, t.roi)
                .name(format!(
                    "{}: {} bets, {} wins, P/L {:.2}, ROI {:.2}%",
                    t.tier, t.bets, t.wins, t.profit, t.roi
                ))
                .width(0.6);
            plot_ui.bar_chart(BarChart::new(vec![bar]).name(&t.tier).color(color));
        }
    });

    let labels: Vec<&str> = tiers.iter().map(|t| t.tier.as_str()).collect();
    category_key(ui, &labels);
}

// ---------------------------------------------------------------------------
// Strategy explorer tab
// ---------------------------------------------------------------------------

/// Profit per season, grouped side by side per market.
pub fn profit_by_season_and_market(ui: &mut Ui, pairs: &[SeasonMarketProfit], colors: Option<&ColorMap>) {
    let mut seasons: Vec<&str> = pairs.iter().map(|p| p.season.as_str()).collect();
    seasons.dedup();
    let mut markets: Vec<&str> = pairs.iter().map(|p| p.market.as_str()).collect();
    markets.sort_unstable();
    markets.dedup();

    let slot = 0.8 / markets.len().max(1) as f64;

    show_bars(ui, "profit_by_season_market", "Season", "P/L", |plot_ui| {
        for (m, market) in markets.iter().enumerate() {
            let offset = (m as f64 - (markets.len() as f64 - 1.0) / 2.0) * slot;
            let bars: Vec<Bar> = pairs
                .iter()
                .filter(|p| p.market == *market)
                .filter_map(|p| {
                    let s = seasons.iter().position(|s| *s == p.season)?;
                    Some(
                        Bar::new(s as f64 + offset, p.profit)
                            .name(format!("{} {}: {:.2} pts", p.season, p.market, p.profit))
                            .width(slot * 0.9),
                    )
                })
                .collect();

            let color = colors.map_or(egui::Color32::LIGHT_BLUE, |c| c.color_for(market));
            plot_ui.bar_chart(BarChart::new(bars).name(*market).color(color));
        }
    });

    category_key(ui, &seasons);
}

/// Profit per league (multi-league data only).
pub fn profit_by_league(ui: &mut Ui, leagues: &[LeagueProfit]) {
    let bars: Vec<Bar> = leagues
        .iter()
        .enumerate()
        .map(|(i, l)| {
            Bar::new(i as f64, l.profit)
                .name(format!("{}: {} bets, {:.2} pts", l.league, l.bets, l.profit))
                .fill(profit_color(l.profit))
                .width(0.6)
        })
        .collect();

    show_bars(ui, "profit_by_league", "League", "P/L", |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name("P/L"));
    });

    let labels: Vec<&str> = leagues.iter().map(|l| l.league.as_str()).collect();
    category_key(ui, &labels);
}
