use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FaultExplorerApp {
    pub state: AppState,
}

impl FaultExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FaultExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        if let Some(message) = &self.state.status_message {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::fatal_error(ui, message);
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: analysis tabs ----
        egui::SidePanel::right("analysis_panel")
            .default_width(420.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::analysis_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: background reading ----
        egui::TopBottomPanel::bottom("tectonics_panel")
            .resizable(false)
            .show(ctx, panels::tectonics_footer);

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::fault_map(ui, &mut self.state);
        });
    }
}
