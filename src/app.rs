use eframe::egui::{self, RichText, ScrollArea, Ui};

use value_odds::data::loader::FilePattern;

use crate::state::{DashboardState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ValueOddsApp {
    pub state: DashboardState,
    title: String,
    /// Used when the user opens a folder of league files.
    pattern: FilePattern,
}

impl ValueOddsApp {
    pub fn new(state: DashboardState, title: String, pattern: FilePattern) -> Self {
        Self {
            state,
            title,
            pattern,
        }
    }
}

impl eframe::App for ValueOddsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.pattern);
        });

        // ---- Left side panel: filters ----
        if self.state.table.is_some() {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: metrics + tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.title.as_str());
            ui.label(
                RichText::new("Explore profit/loss by match rating, market, season and value tier")
                    .weak(),
            );
            ui.separator();

            if self.state.table.is_none() {
                no_dataset(ui, &self.state);
                return;
            }

            panels::metrics_row(ui, &self.state);
            ui.separator();

            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui.selectable_label(self.state.tab == tab, tab.label()).clicked() {
                        self.state.tab = tab;
                    }
                }
            });
            ui.separator();

            match self.state.tab {
                Tab::Performance => performance_tab(ui, &self.state),
                Tab::StrategyExplorer => strategy_tab(ui, &self.state),
                Tab::FilteredData => {
                    ui.strong("Filtered Bets");
                    table::bet_table(ui, &self.state);
                }
            }
        });
    }
}

/// Startup failed or nothing was opened yet: explain instead of drawing an
/// empty dashboard.
fn no_dataset(ui: &mut Ui, state: &DashboardState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let text = match &state.status_message {
            Some(msg) => format!("{msg}\n\nOpen a backtest file or folder  (File → Open…)"),
            None => "Open a backtest file or folder  (File → Open…)".to_string(),
        };
        ui.heading(text);
    });
}

fn performance_tab(ui: &mut Ui, state: &DashboardState) {
    let report = &state.report;
    if report.is_empty() {
        plot::no_data(ui);
        return;
    }
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.strong("Profit by Match Rating");
        plot::profit_by_rating(ui, &report.by_rating);
        ui.add_space(12.0);
        ui.strong("ROI by Value Tier");
        plot::roi_by_tier(ui, &report.by_tier);
    });
}

fn strategy_tab(ui: &mut Ui, state: &DashboardState) {
    let report = &state.report;
    if report.is_empty() {
        plot::no_data(ui);
        return;
    }
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.strong("Profit by Season and Market");
        plot::profit_by_season_and_market(
            ui,
            &report.by_season_market,
            state.market_colors.as_ref(),
        );
        if !report.by_league.is_empty() {
            ui.add_space(12.0);
            ui.strong("Profit by League");
            plot::profit_by_league(ui, &report.by_league);
        }
    });
}
