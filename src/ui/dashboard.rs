use eframe::egui::{self, RichText, ScrollArea, Ui};

use super::{charts, map};
use crate::state::AppState;
use crate::view::ViewModel;

// ---------------------------------------------------------------------------
// Central panel – the dashboard page
// ---------------------------------------------------------------------------

/// Render every dashboard section for the current view.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        view,
        orbit,
        layers,
        country_colors,
        ..
    } = state;

    let Some(view) = view.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore customers  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("Bank Customer Churn Dashboard").size(24.0));
            ui.add_space(8.0);

            section(ui, "Key Metrics");
            metric_tiles(ui, view);

            section(ui, "Balance vs Credit Score");
            charts::balance_scatter(ui, view);

            section(ui, "3D Graph: Credit Score vs Age vs Num of Products");
            charts::scatter_3d(ui, view, orbit);

            section(ui, "Layered Map: Customer Exit Rates, Credit Score, and Balance by Country");
            map::layered_map(ui, view, layers);
            if let Some(colors) = country_colors.as_ref() {
                map::country_legend(ui, colors);
            }
            ui.add_space(6.0);
            map::country_table(ui, view, country_colors.as_ref());

            section(ui, "Gender-Based Analysis of Customer Exit Rates");
            charts::group_bars(ui, "gender_bars", "Gender", &view.gender_counts);

            section(ui, "Exit Rates by Active/Inactive Membership");
            charts::group_bars(ui, "activity_bars", "IsActiveMember", &view.activity_counts);

            section(ui, "Estimated Salary vs Exit Status");
            charts::salary_boxes(ui, view);

            section(
                ui,
                &format!(
                    "Data Overview for Selected Filters: {} customers",
                    view.customer_count
                ),
            );
            ui.label("Explore customer behavior with dynamic filtering and deeper insights.");
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
}

/// Four metric tiles, or a "no data" notice when nothing matches.
fn metric_tiles(ui: &mut Ui, view: &ViewModel) {
    let Some(m) = &view.metrics else {
        ui.label(RichText::new("No data for the selected filters.").italics());
        return;
    };

    ui.columns(4, |cols: &mut [Ui]| {
        let tiles = [
            ("Average Credit Score", &m.credit_score),
            ("Average Age", &m.age),
            ("Average Tenure", &m.tenure),
            ("Average Balance", &m.balance),
        ];
        for (ui, (label, value)) in cols.iter_mut().zip(tiles) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.label(label);
                ui.label(RichText::new(value.as_str()).size(22.0).strong());
            });
        }
    });
}
