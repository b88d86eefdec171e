use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Plot, PlotPoint, Points, Text};

use crate::color::{layer_color, ColorMap};
use crate::view::{
    country_location, format_currency, format_percent, LayerVisibility, MapLayer, ViewModel,
};

/// Degrees of longitude / latitude shown around the map centre.
const MAP_SPAN: f64 = 12.0;

// ---------------------------------------------------------------------------
// Marker map
// ---------------------------------------------------------------------------

/// Country markers on a lon/lat plane; hovering a marker shows its popup text.
pub fn layered_map(ui: &mut Ui, view: &ViewModel, layers: &LayerVisibility) {
    let center = view.map_center;

    Plot::new("country_map")
        .height(420.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .include_x(center.lon - MAP_SPAN)
        .include_x(center.lon + MAP_SPAN)
        .include_y(center.lat - MAP_SPAN / 2.0)
        .include_y(center.lat + MAP_SPAN / 2.0)
        .show(ui, |plot_ui| {
            for layer in MapLayer::ALL {
                if !layers.is_visible(layer) {
                    continue;
                }
                let color = layer_color(layer);
                for marker in view.layer_markers(layer) {
                    plot_ui.points(
                        Points::new(vec![[marker.location.lon, marker.location.lat]])
                            .radius(marker.radius.max(1.0) as f32)
                            .filled(true)
                            .color(color.gamma_multiply(0.6))
                            .name(&marker.popup),
                    );
                }
            }

            for agg in &view.country_aggregates {
                let loc = country_location(&agg.country);
                plot_ui.text(Text::new(
                    PlotPoint::new(loc.lon, loc.lat),
                    RichText::new(&agg.country).strong(),
                ));
            }
        });
}

/// One coloured swatch per country, headed by the column name.
pub fn country_legend(ui: &mut Ui, colors: &ColorMap) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(format!("{}:", colors.column));
        for (label, color) in colors.legend_entries() {
            ui.label(RichText::new("■").color(color));
            ui.label(label);
        }
    });
}

// ---------------------------------------------------------------------------
// Per-country table
// ---------------------------------------------------------------------------

pub fn country_table(ui: &mut Ui, view: &ViewModel, colors: Option<&ColorMap>) {
    ui.push_id("country_table", |ui: &mut Ui| country_rows(ui, view, colors));
}

fn country_rows(ui: &mut Ui, view: &ViewModel, colors: Option<&ColorMap>) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto().at_least(110.0), 4)
        .header(20.0, |mut header| {
            for title in ["Country", "Customers", "Exit Rate", "Avg Credit Score", "Avg Balance"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for agg in &view.country_aggregates {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let mut text = RichText::new(&agg.country);
                        if let Some(cm) = colors {
                            text = text.color(cm.color_for(&agg.country));
                        }
                        ui.label(text);
                    });
                    row.col(|ui| {
                        ui.label(agg.customers.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format_percent(agg.exit_rate));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", agg.avg_credit_score));
                    });
                    row.col(|ui| {
                        ui.label(format_currency(agg.avg_balance));
                    });
                });
            }
        });
}
