use eframe::egui;

use crate::data::filter::DashboardDefaults;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ChurnLensApp {
    pub state: AppState,
}

impl Default for ChurnLensApp {
    fn default() -> Self {
        Self::new(DashboardDefaults::default())
    }
}

impl ChurnLensApp {
    pub fn new(defaults: DashboardDefaults) -> Self {
        Self {
            state: AppState::new(defaults),
        }
    }
}

impl eframe::App for ChurnLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::dashboard(ui, &mut self.state);
        });
    }
}
