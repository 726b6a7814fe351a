use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Layer;
use crate::state::{AnalysisTab, AppState};
use crate::ui::charts;

const ABOUT_TEXT: &str = "Southern Italy lies at a complex tectonic crossroads, making it one of \
Europe's most seismically active regions. This explorer shows the major fault systems \
(coloured by system), significant historical earthquakes (sized and coloured by magnitude) \
and a generalised seismic risk heatmap derived from the fault systems. Use the control panel \
to filter the data and choose map layers; the analysis tabs summarise the current selection.";

const TECTONICS_TEXT: &[&str] = &[
    "Southern Italy's complex geology results from the ongoing collision between the African \
     and Eurasian tectonic plates. Key features include:",
    "• Subduction: the African plate dives beneath the Eurasian plate, particularly under the \
     Calabrian Arc, driving volcanism and deep earthquakes.",
    "• Extension: the Tyrrhenian Sea is opening, causing stretching and normal faulting in the \
     Apennines.",
    "• Lateral movement: strike-slip faults accommodate sideways motion between crustal blocks.",
    "This dynamic environment makes the region prone to significant seismic hazards.",
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Control Panel");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy what we need so we can mutate state below.
    let risks = dataset.risk_categories();
    let year_bounds = dataset.year_bounds();
    let magnitude_bounds = dataset.magnitude_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Layers ----
            ui.strong("Layers to Display");
            for layer in Layer::ALL {
                let mut on = state.criteria.is_active(layer);
                if ui.checkbox(&mut on, layer.label()).changed() {
                    state.toggle_layer(layer);
                }
            }
            ui.separator();

            // ---- Risk categories ----
            let n_selected = state.criteria.selected_risks.len();
            ui.strong(format!(
                "Filter Faults by Seismic Risk  ({n_selected}/{})",
                risks.len()
            ));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_risks();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_risks();
                }
            });
            for risk in &risks {
                let mut checked = state.criteria.selected_risks.contains(risk);
                if ui.checkbox(&mut checked, risk.label()).changed() {
                    state.toggle_risk(*risk);
                }
            }
            ui.separator();

            // ---- Earthquake period ----
            if let Some((min_year, max_year)) = year_bounds {
                ui.strong("Historical Earthquake Period");
                let (mut from, mut to) = state.criteria.year_range;
                let a = ui.add(egui::Slider::new(&mut from, min_year..=max_year).text("from"));
                let b = ui.add(egui::Slider::new(&mut to, min_year..=max_year).text("to"));
                if a.changed() || b.changed() {
                    state.set_year_range(from, to);
                }
            }

            // ---- Magnitude ----
            if let Some((min_mag, max_mag)) = magnitude_bounds {
                ui.strong("Earthquake Magnitude Range (Mw)");
                let (mut from, mut to) = state.criteria.magnitude_range;
                let a = ui.add(
                    egui::Slider::new(&mut from, min_mag..=max_mag)
                        .step_by(0.1)
                        .fixed_decimals(1)
                        .text("from"),
                );
                let b = ui.add(
                    egui::Slider::new(&mut to, min_mag..=max_mag)
                        .step_by(0.1)
                        .fixed_decimals(1)
                        .text("to"),
                );
                if a.changed() || b.changed() {
                    state.set_magnitude_range(from, to);
                }
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            egui::CollapsingHeader::new("About this explorer")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(ABOUT_TEXT);
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(
            RichText::new("Fault Systems & Seismic History of Southern Italy")
                .strong()
                .size(18.0),
        );

        if let (Some(ds), Some(render)) = (&state.dataset, &state.render) {
            ui.separator();
            ui.label(format!(
                "{}/{} fault systems, {}/{} earthquakes visible",
                render.visible_faults,
                ds.faults().len(),
                render.visible_quakes,
                ds.earthquakes().len()
            ));
            for warning in ds.warnings() {
                ui.separator();
                ui.label(RichText::new(warning).color(Color32::from_rgb(0xDD, 0x6B, 0x20)));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Right panel – analysis tabs
// ---------------------------------------------------------------------------

pub fn analysis_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, AnalysisTab::Faults, "📊 Fault Analysis");
        ui.selectable_value(&mut state.tab, AnalysisTab::Earthquakes, "📈 Earthquake History");
    });
    ui.separator();

    let Some(render) = &state.render else {
        return;
    };
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            AnalysisTab::Faults => charts::fault_analysis(ui, render),
            AnalysisTab::Earthquakes => charts::earthquake_history(ui, render),
        });
}

// ---------------------------------------------------------------------------
// Bottom panel
// ---------------------------------------------------------------------------

pub fn tectonics_footer(ui: &mut Ui) {
    egui::CollapsingHeader::new("Understanding Italian Tectonics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for paragraph in TECTONICS_TEXT {
                ui.label(*paragraph);
            }
        });
}

/// Full-window message for a dataset that failed validation.
pub fn fatal_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(RichText::new(message).color(Color32::RED));
    });
}
