use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use super::model::{Dataset, FaultSystem, HistoricalEarthquake, SeismicRisk};

/// Year the earthquake period starts at before the user touches the slider.
pub const DEFAULT_START_YEAR: i32 = 1900;
/// Lower magnitude bound before the user touches the slider.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 6.0;

// ---------------------------------------------------------------------------
// Map layers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    FaultSystems,
    HistoricalEarthquakes,
    SeismicRiskHeatmap,
}

impl Layer {
    pub const ALL: [Layer; 3] = [
        Layer::FaultSystems,
        Layer::HistoricalEarthquakes,
        Layer::SeismicRiskHeatmap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Layer::FaultSystems => "Fault Systems",
            Layer::HistoricalEarthquakes => "Historical Earthquakes",
            Layer::SeismicRiskHeatmap => "Seismic Risk Heatmap",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Filter criteria: what the sidebar currently selects
// ---------------------------------------------------------------------------

/// One snapshot of the sidebar controls.
///
/// An empty `selected_risks` set selects nothing; there is no implicit
/// "show all".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub selected_risks: BTreeSet<SeismicRisk>,
    /// Inclusive `(from, to)` years.
    pub year_range: (i32, i32),
    /// Inclusive `(from, to)` moment magnitudes.
    pub magnitude_range: (f64, f64),
    pub active_layers: BTreeSet<Layer>,
}

impl FilterCriteria {
    /// Initial sidebar state for a dataset: every risk category present,
    /// earthquakes from `max(1900, first year)` with magnitude from
    /// `max(6.0, smallest magnitude)`, and the fault and earthquake layers
    /// switched on.
    pub fn defaults_for(dataset: &Dataset) -> Self {
        let year_range = match dataset.year_bounds() {
            Some((min, max)) => (DEFAULT_START_YEAR.clamp(min, max), max),
            None => (DEFAULT_START_YEAR, DEFAULT_START_YEAR),
        };
        let magnitude_range = match dataset.magnitude_bounds() {
            Some((min, max)) => (DEFAULT_MIN_MAGNITUDE.clamp(min, max), max),
            None => (DEFAULT_MIN_MAGNITUDE, DEFAULT_MIN_MAGNITUDE),
        };
        FilterCriteria {
            selected_risks: dataset.risk_categories(),
            year_range,
            magnitude_range,
            active_layers: [Layer::FaultSystems, Layer::HistoricalEarthquakes]
                .into_iter()
                .collect(),
        }
    }

    pub fn is_active(&self, layer: Layer) -> bool {
        self.active_layers.contains(&layer)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.year_range.0..=self.year_range.1
    }

    pub fn magnitudes(&self) -> RangeInclusive<f64> {
        self.magnitude_range.0..=self.magnitude_range.1
    }
}

// ---------------------------------------------------------------------------
// Filters – pure projections borrowing the source tables
// ---------------------------------------------------------------------------

/// Fault systems whose risk category is in `selected`, in table order.
pub fn filter_by_risk<'a>(
    faults: &'a [FaultSystem],
    selected: &BTreeSet<SeismicRisk>,
) -> Vec<&'a FaultSystem> {
    faults
        .iter()
        .filter(|f| selected.contains(&f.seismic_risk))
        .collect()
}

/// Earthquakes inside both inclusive ranges, in table order.
pub fn filter_quakes<'a>(
    quakes: &'a [HistoricalEarthquake],
    years: RangeInclusive<i32>,
    magnitudes: RangeInclusive<f64>,
) -> Vec<&'a HistoricalEarthquake> {
    quakes
        .iter()
        .filter(|q| years.contains(&q.year) && magnitudes.contains(&q.magnitude))
        .collect()
}

/// Split a comma-separated `fault_types` field into trimmed, non-empty tags.
pub fn fault_type_tags(fault_types: &str) -> Vec<&str> {
    fault_types
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_embedded;

    fn subsets(items: &[SeismicRisk]) -> Vec<BTreeSet<SeismicRisk>> {
        (0..1u32 << items.len())
            .map(|mask| {
                items
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn risk_filter_matches_membership_for_every_subset() {
        let ds = load_embedded().unwrap();
        for selected in subsets(&SeismicRisk::ALL) {
            let kept = filter_by_risk(ds.faults(), &selected);
            let expected: Vec<&FaultSystem> = ds
                .faults()
                .iter()
                .filter(|f| selected.contains(&f.seismic_risk))
                .collect();
            assert_eq!(kept, expected, "selection {selected:?}");
            for f in &kept {
                assert!(ds.faults().iter().any(|orig| std::ptr::eq(orig, *f)));
            }
        }
    }

    #[test]
    fn empty_risk_selection_selects_nothing() {
        let ds = load_embedded().unwrap();
        assert!(!ds.faults().is_empty());
        assert!(filter_by_risk(ds.faults(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn very_high_only() {
        let ds = load_embedded().unwrap();
        let selected = [SeismicRisk::VeryHigh].into_iter().collect();
        let names: Vec<&str> = filter_by_risk(ds.faults(), &selected)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Calabrian Arc", "Messina Strait"]);
    }

    #[test]
    fn quake_filter_default_window() {
        let ds = load_embedded().unwrap();
        let kept = filter_quakes(ds.earthquakes(), 1900..=2016, 6.0..=7.4);
        let years: Vec<i32> = kept.iter().map(|q| q.year).collect();
        assert_eq!(years, vec![1908, 1915, 1930, 1968, 1980, 2009, 2016]);
        assert!(kept.iter().any(|q| q.location == "Messina Strait" && q.magnitude == 7.1));
        assert!(!kept.iter().any(|q| q.year == 1857));
    }

    #[test]
    fn quake_filter_bounds_are_inclusive_and_conjunctive() {
        let ds = load_embedded().unwrap();
        let exact = filter_quakes(ds.earthquakes(), 1908..=1908, 7.1..=7.1);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].location, "Messina Strait");

        // 1857 is in the magnitude window but not the year window
        let none = filter_quakes(ds.earthquakes(), 1858..=1907, 7.0..=7.4);
        assert!(none.is_empty());

        let inverted = filter_quakes(ds.earthquakes(), 2016..=1900, 6.0..=7.4);
        assert!(inverted.is_empty());
    }

    #[test]
    fn repeated_filtering_is_deterministic() {
        let ds = load_embedded().unwrap();
        let criteria = FilterCriteria::defaults_for(&ds);
        let first = (
            filter_by_risk(ds.faults(), &criteria.selected_risks),
            filter_quakes(ds.earthquakes(), criteria.years(), criteria.magnitudes()),
        );
        let second = (
            filter_by_risk(ds.faults(), &criteria.selected_risks),
            filter_quakes(ds.earthquakes(), criteria.years(), criteria.magnitudes()),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        assert_eq!(
            fault_type_tags("Normal, Thrust, Strike-Slip"),
            vec!["Normal", "Thrust", "Strike-Slip"]
        );
        assert_eq!(fault_type_tags(" Normal,, ,Thrust ,"), vec!["Normal", "Thrust"]);
        assert!(fault_type_tags("").is_empty());
    }

    #[test]
    fn defaults_follow_dataset_extents() {
        let ds = load_embedded().unwrap();
        let criteria = FilterCriteria::defaults_for(&ds);
        assert_eq!(
            criteria.selected_risks,
            [
                SeismicRisk::ModerateToHigh,
                SeismicRisk::High,
                SeismicRisk::VeryHigh
            ]
            .into_iter()
            .collect()
        );
        assert_eq!(criteria.year_range, (1900, 2016));
        // smallest embedded magnitude is the 2016 M6.2 event
        assert_eq!(criteria.magnitude_range, (6.2, 7.4));
        assert!(criteria.is_active(Layer::FaultSystems));
        assert!(criteria.is_active(Layer::HistoricalEarthquakes));
        assert!(!criteria.is_active(Layer::SeismicRiskHeatmap));
    }

    #[test]
    fn defaults_keep_floor_when_data_reaches_below_it() {
        let ds = crate::data::loader::load_from_str(
            include_str!("../../assets/fault_systems.json"),
            r#"[
                {"year": 1857, "location": "Basilicata", "magnitude": 5.4, "lat": 40.35,
                 "lon": 15.84, "deaths": 10000, "description": "Great Neapolitan earthquake"},
                {"year": 1980, "location": "Irpinia", "magnitude": 6.9, "lat": 40.8,
                 "lon": 15.3, "deaths": 2914, "description": "Campania-Basilicata"}
            ]"#,
        )
        .unwrap();
        let criteria = FilterCriteria::defaults_for(&ds);
        assert_eq!(criteria.year_range, (1900, 1980));
        assert_eq!(criteria.magnitude_range, (6.0, 6.9));
    }
}
