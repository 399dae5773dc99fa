use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use value_odds::data::filter::Facet;
use value_odds::data::loader::{FilePattern, Source};

use crate::color::profit_color;
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };

    // Copy what the widgets need so `state` can be mutated below.
    let facets: Vec<(Facet, BTreeSet<String>)> = Facet::ALL
        .iter()
        .filter(|f| **f != Facet::League || table.has_leagues())
        .map(|&f| (f, f.domain(table).clone()))
        .collect();
    let bounds = table.rating_bounds();
    // Whole-number ratings get whole-number slider steps.
    let step = if table.has_integer_ratings() { 1.0 } else { 0.0 };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (facet, all_values) in &facets {
                facet_filter(ui, state, *facet, all_values);
            }
            ui.separator();

            if let Some((lo, hi)) = bounds {
                ui.strong("Match Rating Range");
                let (mut min, mut max) = state
                    .filters
                    .rating_range
                    .map(|r| (r.min.value(), r.max.value()))
                    .unwrap_or((lo.value(), hi.value()));
                let range = lo.value()..=hi.value();
                let mut changed = ui
                    .add(egui::Slider::new(&mut min, range.clone()).step_by(step).text("min"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut max, range).step_by(step).text("max"))
                    .changed();
                if changed {
                    state.set_rating_range(min, max);
                }
                ui.separator();
            }

            let mut exclude = state.filters.exclude_draws;
            if ui.checkbox(&mut exclude, "Exclude Draws").changed() {
                state.set_exclude_draws(exclude);
            }
        });
}

/// Collapsible checkbox list for one categorical facet.
fn facet_filter(ui: &mut Ui, state: &mut DashboardState, facet: Facet, all_values: &BTreeSet<String>) {
    let n_selected = state
        .filters
        .selected(facet)
        .map_or(all_values.len(), |s| s.len());
    let header_text = format!("{}  ({n_selected}/{})", facet.label(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(facet.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            let mut toggled = None;
            for val in all_values {
                let mut checked = state
                    .filters
                    .selected(facet)
                    .map_or(true, |s| s.contains(val));
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    toggled = Some(val.as_str());
                }
            }
            if let Some(val) = toggled {
                state.toggle(facet, val);
            }
        });
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: RichText) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(value.size(24.0).strong());
    });
}

/// Headline numbers above the tabs, rounded to two decimals.
pub fn metrics_row(ui: &mut Ui, state: &DashboardState) {
    let m = state.report.metrics.rounded();
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Bets", RichText::new(m.total_bets.to_string()));
        metric(
            &mut cols[1],
            "Total Profit",
            RichText::new(format!("{:.2}", m.total_profit)).color(profit_color(m.total_profit)),
        );
        metric(&mut cols[2], "Strike Rate", RichText::new(format!("{:.2}%", m.strike_rate)));
        metric(
            &mut cols[3],
            "ROI",
            RichText::new(format!("{:.2}%", m.roi)).color(profit_color(m.roi)),
        );
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState, pattern: &FilePattern) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open file…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state, pattern);
                ui.close_menu();
            }
            ui.separator();
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} bets loaded, {} visible",
                table.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rating backtest")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&Source::File(path));
    }
}

pub fn open_folder_dialog(state: &mut DashboardState, pattern: &FilePattern) {
    let dir = rfd::FileDialog::new()
        .set_title("Open folder of league backtests")
        .pick_folder();

    if let Some(dir) = dir {
        state.load(&Source::Directory {
            dir,
            pattern: pattern.clone(),
        });
    }
}

pub fn export_dialog(state: &mut DashboardState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered bets")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_bets.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("{e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
