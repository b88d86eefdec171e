use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::IntRange;
use crate::state::AppState;
use crate::view::MapLayer;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Interactive Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let countries = dataset.countries.clone();
    let age_bounds = dataset.age_bounds;
    let credit_bounds = dataset.credit_score_bounds;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Country multi-select ----
            let header_text = format!(
                "Select Country  ({}/{})",
                state.criteria.countries.len(),
                countries.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_countries();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_countries();
                        }
                    });

                    let mut toggled: Option<&String> = None;
                    for country in &countries {
                        let mut checked = state.criteria.countries.contains(country);
                        let mut text = RichText::new(country);
                        if let Some(cm) = &state.country_colors {
                            text = text.color(cm.color_for(country));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            toggled = Some(country);
                        }
                    }
                    if let Some(country) = toggled {
                        state.toggle_country(country);
                    }
                });
            ui.separator();

            // ---- Range sliders ----
            if let Some(bounds) = age_bounds {
                ui.strong("Select Age Range");
                let range = range_sliders(ui, "age", state.criteria.age, bounds);
                state.set_age_range(range);
                ui.separator();
            }
            if let Some(bounds) = credit_bounds {
                ui.strong("Select Credit Score Range");
                let range = range_sliders(ui, "credit", state.criteria.credit_score, bounds);
                state.set_credit_range(range);
                ui.separator();
            }

            // ---- Map layers ----
            ui.strong("Map Layers");
            for layer in MapLayer::ALL {
                ui.checkbox(state.layers.flag_mut(layer), layer.title());
            }
        });
}

/// A min and a max slider over `bounds`; dragging one past the other pushes it along.
fn range_sliders(ui: &mut Ui, id: &str, current: IntRange, bounds: IntRange) -> IntRange {
    let mut min = current.min;
    let mut max = current.max;
    ui.push_id(id, |ui: &mut Ui| {
        let min_changed = ui
            .add(egui::Slider::new(&mut min, bounds.min..=bounds.max).text("min"))
            .changed();
        let max_changed = ui
            .add(egui::Slider::new(&mut max, bounds.min..=bounds.max).text("max"))
            .changed();
        if min > max {
            if min_changed {
                max = min;
            } else if max_changed {
                min = max;
            }
        }
    });
    IntRange::new(min, max)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.view.as_ref().map_or(0, |v| v.customer_count);
            ui.label(format!(
                "{} customers loaded, {} visible, {} rows dropped",
                ds.len(),
                visible,
                ds.dropped_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open customer data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
