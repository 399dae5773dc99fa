use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use value_odds::data::export::{export_headers, record_cells};

use crate::state::DashboardState;

const ROW_HEIGHT: f32 = 18.0;

/// The filtered bets, in the same columns as the CSV export.
pub fn bet_table(ui: &mut Ui, state: &DashboardState) {
    let Some(table) = &state.table else {
        return;
    };
    if state.visible_indices.is_empty() {
        crate::ui::plot::no_data(ui);
        return;
    }

    let with_league = table.has_leagues();
    let headers = export_headers(with_league);
    let records = table.records();
    let indices = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(48.0), headers.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for h in &headers {
                header.col(|ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                let rec = &records[indices[row.index()]];
                for cell in record_cells(rec, with_league) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
