mod app;
mod color;
mod data;
/// Synthetic point cloud approximating seismic-risk density around each
/// fault system, consumed by the heatmap layer only. The constants in
/// [`heatmap::HeatmapParams`] are visual tuning values, not physical
/// quantities.
mod heatmap;
mod render;
mod state;
mod ui;

use app::FaultExplorerApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let state = match data::loader::load_embedded() {
        Ok(dataset) => AppState::new(dataset),
        Err(e) => {
            log::error!("Failed to load embedded datasets: {e}");
            AppState::failed(format!("Error: {e}"))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fault Explorer – Southern Italy",
        options,
        Box::new(move |_cc| Ok(Box::new(FaultExplorerApp::new(state)))),
    )
}
