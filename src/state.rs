use crate::data::filter::{FilterCriteria, Layer};
use crate::data::model::{Dataset, SeismicRisk};
use crate::render::{on_filter_changed, Popup, RenderModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisTab {
    #[default]
    Faults,
    Earthquakes,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Validated dataset (None when loading failed fatally).
    pub dataset: Option<Dataset>,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Output of the last filter pass (cached until criteria change).
    pub render: Option<RenderModel>,

    /// Map feature whose details are shown under the map.
    pub selected: Option<Popup>,

    /// Whether the heatmap overlay is drawn (the layer can exist but start hidden).
    pub heatmap_visible: bool,

    pub tab: AnalysisTab,

    /// Fatal error shown instead of the dashboard.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest the loaded dataset, initialise filters and run the first pass.
    pub fn new(dataset: Dataset) -> Self {
        let criteria = FilterCriteria::defaults_for(&dataset);
        let mut state = Self {
            dataset: Some(dataset),
            criteria,
            render: None,
            selected: None,
            heatmap_visible: false,
            tab: AnalysisTab::default(),
            status_message: None,
        };
        state.refilter();
        state
    }

    /// State for a dataset that could not be loaded.
    pub fn failed(message: String) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria {
                selected_risks: Default::default(),
                year_range: (0, 0),
                magnitude_range: (0.0, 0.0),
                active_layers: Default::default(),
            },
            render: None,
            selected: None,
            heatmap_visible: false,
            tab: AnalysisTab::default(),
            status_message: Some(message),
        }
    }

    /// Recompute the render model after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let render = on_filter_changed(ds, &self.criteria);
            self.heatmap_visible = render
                .map
                .heatmap
                .as_ref()
                .is_some_and(|h| h.shown_by_default);
            self.render = Some(render);
            self.selected = None;
        }
    }

    /// Toggle a single risk category.
    pub fn toggle_risk(&mut self, risk: SeismicRisk) {
        if !self.criteria.selected_risks.remove(&risk) {
            self.criteria.selected_risks.insert(risk);
        }
        self.refilter();
    }

    /// Select every risk category present in the dataset.
    pub fn select_all_risks(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.selected_risks = ds.risk_categories();
            self.refilter();
        }
    }

    /// Deselect all risk categories.
    pub fn select_no_risks(&mut self) {
        self.criteria.selected_risks.clear();
        self.refilter();
    }

    pub fn toggle_layer(&mut self, layer: Layer) {
        if !self.criteria.active_layers.remove(&layer) {
            self.criteria.active_layers.insert(layer);
        }
        self.refilter();
    }

    /// Keep `(from, to)` ordered after a slider moved one end past the other.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        self.criteria.year_range = (from.min(to), from.max(to));
        self.refilter();
    }

    pub fn set_magnitude_range(&mut self, from: f64, to: f64) {
        self.criteria.magnitude_range = (from.min(to), from.max(to));
        self.refilter();
    }

    /// Restore the initial sidebar selections.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::defaults_for(ds);
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_embedded;

    fn state() -> AppState {
        AppState::new(load_embedded().unwrap())
    }

    #[test]
    fn new_state_runs_first_pass() {
        let s = state();
        let render = s.render.as_ref().unwrap();
        assert_eq!(render.visible_faults, 5);
        assert_eq!(render.visible_quakes, 7);
    }

    #[test]
    fn risk_toggles_refilter() {
        let mut s = state();
        s.toggle_risk(SeismicRisk::VeryHigh);
        assert_eq!(s.render.as_ref().unwrap().visible_faults, 3);
        s.toggle_risk(SeismicRisk::VeryHigh);
        assert_eq!(s.render.as_ref().unwrap().visible_faults, 5);

        s.select_no_risks();
        assert_eq!(s.render.as_ref().unwrap().visible_faults, 0);
        s.select_all_risks();
        assert_eq!(s.render.as_ref().unwrap().visible_faults, 5);
    }

    #[test]
    fn ranges_are_kept_ordered() {
        let mut s = state();
        s.set_year_range(2000, 1900);
        assert_eq!(s.criteria.year_range, (1900, 2000));
        s.set_magnitude_range(7.0, 6.5);
        assert_eq!(s.criteria.magnitude_range, (6.5, 7.0));
        // 1908 M7.1 is now excluded by magnitude
        let years: Vec<i32> = s
            .render
            .as_ref()
            .unwrap()
            .charts
            .timeline
            .iter()
            .map(|p| p.year)
            .collect();
        assert_eq!(years, vec![1915, 1930, 1980]);
    }

    #[test]
    fn layer_toggle_and_reset() {
        let mut s = state();
        s.toggle_layer(Layer::SeismicRiskHeatmap);
        assert!(s.render.as_ref().unwrap().map.heatmap.is_some());
        assert!(!s.heatmap_visible);
        s.toggle_layer(Layer::FaultSystems);
        s.toggle_layer(Layer::HistoricalEarthquakes);
        assert!(s.heatmap_visible);
        s.reset_filters();
        assert!(s.render.as_ref().unwrap().map.heatmap.is_none());
        assert_eq!(s.criteria, FilterCriteria::defaults_for(s.dataset.as_ref().unwrap()));
    }

    #[test]
    fn failed_state_has_no_render() {
        let mut s = AppState::failed("boom".into());
        s.refilter();
        assert!(s.render.is_none());
        assert_eq!(s.status_message.as_deref(), Some("boom"));
    }
}
