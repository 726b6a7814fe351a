use eframe::egui::Color32;
use rand::Rng;

use crate::color::{self, ColorScale};
use crate::data::filter::{fault_type_tags, filter_by_risk, filter_quakes, FilterCriteria, Layer};
use crate::data::model::{Dataset, FaultSystem, HistoricalEarthquake, SeismicRisk};
use crate::heatmap::{self, HeatPoint, HeatmapParams};

// ---------------------------------------------------------------------------
// Renderer constants
// ---------------------------------------------------------------------------

/// Initial map centre, `[lat, lon]`.
pub const MAP_CENTER: [f64; 2] = [40.0, 15.5];
/// Initial zoom level, slippy-map convention.
pub const MAP_ZOOM: u8 = 6;

pub const MIN_SLIP_CIRCLE_M: f64 = 5000.0;
pub const SLIP_CIRCLE_M_PER_MM_YR: f64 = 7000.0;
pub const SLIP_CIRCLE_OPACITY: f32 = 0.15;

pub const QUAKE_BASE_RADIUS: f32 = 3.0;
pub const QUAKE_RADIUS_PER_MW: f32 = 2.0;
pub const QUAKE_FIXED_RADIUS: f32 = 5.0;
pub const QUAKE_FILL_OPACITY: f32 = 0.6;

pub const HEAT_MAX_VAL: f64 = 5.0;
pub const HEAT_RADIUS: f32 = 18.0;
pub const HEAT_BLUR: f32 = 15.0;
pub const HEAT_MIN_OPACITY: f32 = 0.2;

pub const DEADLIEST_COUNT: usize = 5;
pub const TIMELINE_MAX_RADIUS: f32 = 12.5;
pub const TIMELINE_MIN_RADIUS: f32 = 2.0;

pub const NO_FAULTS_NOTICE: &str = "No fault systems match the selected risk filter.";
pub const NO_FAULT_TYPES_NOTICE: &str = "No fault type data available for the selected systems.";
pub const NO_QUAKES_NOTICE: &str = "No historical earthquakes match your filter criteria.";

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

/// Click-through details for a map feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub accent: Option<Color32>,
    pub lines: Vec<String>,
    /// Free-text footnote shown in italics.
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaultMarker {
    pub name: String,
    /// `[lat, lon]`
    pub position: [f64; 2],
    pub tooltip: String,
    pub popup: Popup,
    pub icon_color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlipCircle {
    pub center: [f64; 2],
    pub radius_m: f64,
    pub stroke: Color32,
    pub fill: Color32,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuakeMarker {
    pub position: [f64; 2],
    /// Screen radius, pixels.
    pub radius: f32,
    pub color: Color32,
    pub fill: Color32,
    pub tooltip: String,
    pub popup: Popup,
}

#[derive(Debug, Clone)]
pub struct HeatmapLayer {
    pub points: Vec<HeatPoint>,
    pub gradient: ColorScale,
    /// Intensity that maps to the top of the gradient.
    pub max_val: f64,
    pub radius: f32,
    pub blur: f32,
    pub min_opacity: f32,
    /// Hidden initially when another feature layer is on.
    pub shown_by_default: bool,
}

#[derive(Debug, Clone)]
pub struct MapModel {
    pub center: [f64; 2],
    pub zoom: u8,
    pub fault_markers: Vec<FaultMarker>,
    pub slip_circles: Vec<SlipCircle>,
    pub quake_markers: Vec<QuakeMarker>,
    pub magnitude_scale: Option<ColorScale>,
    pub heatmap: Option<HeatmapLayer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlipBar {
    pub name: String,
    pub slip_rate: f64,
    pub risk: SeismicRisk,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaultTypeShare {
    pub tag: String,
    pub count: usize,
    /// Fraction of all tags, `0..=1`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub year: i32,
    pub magnitude: f64,
    pub deaths: u64,
    pub location: String,
    pub description: String,
    pub radius: f32,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlyEvent {
    pub year: i32,
    pub location: String,
    pub magnitude: f64,
    pub deaths: u64,
}

impl DeadlyEvent {
    /// `"1908 Messina Strait (M7.1)"`
    pub fn headline(&self) -> String {
        format!("{} {} (M{:.1})", self.year, self.location, self.magnitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartsModel {
    /// Sorted by slip rate, highest first.
    pub slip_bars: Vec<SlipBar>,
    /// Sorted by count, highest first.
    pub fault_types: Vec<FaultTypeShare>,
    /// Sorted by year.
    pub timeline: Vec<TimelinePoint>,
    pub timeline_title: String,
    pub deadliest: Vec<DeadlyEvent>,
    pub deadliest_caption: Option<String>,
}

/// Explicit empty states; `None` means the panel has data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notices {
    pub faults: Option<&'static str>,
    pub fault_types: Option<&'static str>,
    pub earthquakes: Option<&'static str>,
}

/// Everything the map and chart renderers need for one filter state.
#[derive(Debug, Clone)]
pub struct RenderModel {
    pub map: MapModel,
    pub charts: ChartsModel,
    pub notices: Notices,
    pub visible_faults: usize,
    pub visible_quakes: usize,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Recompute the full render model for `criteria`.
pub fn on_filter_changed(dataset: &Dataset, criteria: &FilterCriteria) -> RenderModel {
    on_filter_changed_with(
        dataset,
        criteria,
        &HeatmapParams::default(),
        &mut rand::thread_rng(),
    )
}

/// [`on_filter_changed`] with explicit heatmap tuning and randomness.
pub fn on_filter_changed_with<R: Rng>(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    params: &HeatmapParams,
    rng: &mut R,
) -> RenderModel {
    let faults = filter_by_risk(dataset.faults(), &criteria.selected_risks);
    let quakes = filter_quakes(
        dataset.earthquakes(),
        criteria.years(),
        criteria.magnitudes(),
    );
    log::debug!(
        "Filter pass: {}/{} faults, {}/{} earthquakes, layers {:?}",
        faults.len(),
        dataset.faults().len(),
        quakes.len(),
        dataset.earthquakes().len(),
        criteria.active_layers
    );

    let fault_types = fault_type_shares(&faults);
    let notices = Notices {
        faults: faults.is_empty().then_some(NO_FAULTS_NOTICE),
        fault_types: (!faults.is_empty() && fault_types.is_empty())
            .then_some(NO_FAULT_TYPES_NOTICE),
        earthquakes: quakes.is_empty().then_some(NO_QUAKES_NOTICE),
    };

    let (deadliest, deadliest_caption) = deadliest(&quakes);
    let charts = ChartsModel {
        slip_bars: slip_bars(&faults),
        fault_types,
        timeline: timeline(&quakes),
        timeline_title: format!(
            "Earthquakes ({}-{}, M{:.1}-{:.1})",
            criteria.year_range.0,
            criteria.year_range.1,
            criteria.magnitude_range.0,
            criteria.magnitude_range.1
        ),
        deadliest,
        deadliest_caption,
    };

    RenderModel {
        map: map_model(&faults, &quakes, criteria, params, rng),
        charts,
        notices,
        visible_faults: faults.len(),
        visible_quakes: quakes.len(),
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

fn map_model<R: Rng>(
    faults: &[&FaultSystem],
    quakes: &[&HistoricalEarthquake],
    criteria: &FilterCriteria,
    params: &HeatmapParams,
    rng: &mut R,
) -> MapModel {
    let mut map = MapModel {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        fault_markers: Vec::new(),
        slip_circles: Vec::new(),
        quake_markers: Vec::new(),
        magnitude_scale: None,
        heatmap: None,
    };

    if criteria.is_active(Layer::FaultSystems) && !faults.is_empty() {
        for fault in faults {
            let (marker, circle) = fault_features(fault);
            map.fault_markers.push(marker);
            map.slip_circles.push(circle);
        }
    }

    if criteria.is_active(Layer::HistoricalEarthquakes) && !quakes.is_empty() {
        let (min, max) = magnitude_extent(quakes);
        let scale = color::magnitude_gradient(min, max);
        map.quake_markers = quakes
            .iter()
            .map(|q| quake_marker(q, min, max, &scale))
            .collect();
        map.magnitude_scale = Some(scale);
    }

    if criteria.is_active(Layer::SeismicRiskHeatmap) && !faults.is_empty() {
        let points = heatmap::synthesize(faults, params, rng);
        if !points.is_empty() {
            map.heatmap = Some(HeatmapLayer {
                points,
                gradient: color::heat_gradient(),
                max_val: HEAT_MAX_VAL,
                radius: HEAT_RADIUS,
                blur: HEAT_BLUR,
                min_opacity: HEAT_MIN_OPACITY,
                shown_by_default: !(criteria.is_active(Layer::FaultSystems)
                    || criteria.is_active(Layer::HistoricalEarthquakes)),
            });
        }
    }

    map
}

/// `max(5 km, slip × 7 km)`.
pub fn slip_circle_radius_m(annual_slip_rate: f64) -> f64 {
    MIN_SLIP_CIRCLE_M.max(annual_slip_rate * SLIP_CIRCLE_M_PER_MM_YR)
}

/// Marker radius for a magnitude within the filtered `[min, max]`.
pub fn quake_radius(magnitude: f64, min: f64, max: f64) -> f32 {
    if min == max {
        QUAKE_FIXED_RADIUS
    } else {
        QUAKE_BASE_RADIUS + (magnitude - min) as f32 * QUAKE_RADIUS_PER_MW
    }
}

fn fault_features(fault: &FaultSystem) -> (FaultMarker, SlipCircle) {
    // Colours are validated at load.
    let color = color::parse_hex(&fault.color).unwrap_or(Color32::GRAY);
    let position = fault.location();

    let popup = Popup {
        title: fault.name.clone(),
        accent: Some(color),
        lines: vec![
            format!("Description: {}", fault.description),
            format!("Types: {}", fault.fault_types),
            format!("Drivers: {}", fault.tectonic_drivers),
            format!("Examples: {}", fault.examples),
            format!("Last Major EQ: {}", fault.last_major_earthquake),
            format!("Seismic Risk: {}", fault.seismic_risk),
            format!("Slip Rate: {:.1} mm/year", fault.annual_slip_rate),
        ],
        note: None,
    };

    let marker = FaultMarker {
        name: fault.name.clone(),
        position,
        tooltip: format!("{}\nRisk: {}", fault.name, fault.seismic_risk),
        popup,
        icon_color: color,
    };
    let circle = SlipCircle {
        center: position,
        radius_m: slip_circle_radius_m(fault.annual_slip_rate),
        stroke: color,
        fill: color::with_opacity(color, SLIP_CIRCLE_OPACITY),
        tooltip: format!(
            "{} (Slip: {:.1} mm/yr)",
            fault.name, fault.annual_slip_rate
        ),
    };
    (marker, circle)
}

fn magnitude_extent(quakes: &[&HistoricalEarthquake]) -> (f64, f64) {
    quakes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), q| {
            (lo.min(q.magnitude), hi.max(q.magnitude))
        })
}

fn quake_marker(q: &HistoricalEarthquake, min: f64, max: f64, scale: &ColorScale) -> QuakeMarker {
    let color = scale.color_at(q.magnitude);
    QuakeMarker {
        position: [q.lat, q.lon],
        radius: quake_radius(q.magnitude, min, max),
        color,
        fill: color::with_opacity(color, QUAKE_FILL_OPACITY),
        tooltip: format!("{} {} (M{:.1})", q.year, q.location, q.magnitude),
        popup: Popup {
            title: format!("{} {}", q.year, q.location),
            accent: None,
            lines: vec![
                format!("Magnitude (Mw): {:.1}", q.magnitude),
                format!("Deaths: {}", format_thousands(q.deaths)),
            ],
            note: Some(q.description.clone()),
        },
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn slip_bars(faults: &[&FaultSystem]) -> Vec<SlipBar> {
    let mut bars: Vec<SlipBar> = faults
        .iter()
        .map(|f| SlipBar {
            name: f.name.clone(),
            slip_rate: f.annual_slip_rate,
            risk: f.seismic_risk,
            color: color::risk_color(f.seismic_risk),
        })
        .collect();
    bars.sort_by(|a, b| b.slip_rate.total_cmp(&a.slip_rate));
    bars
}

/// Tag frequencies across `faults`, most frequent first; equal counts keep
/// the order in which tags first appear.
pub fn fault_type_shares(faults: &[&FaultSystem]) -> Vec<FaultTypeShare> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for fault in faults {
        for tag in fault_type_tags(&fault.fault_types) {
            match counts.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, n)) => *n += 1,
                None => counts.push((tag, 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(tag, count)| FaultTypeShare {
            tag: tag.to_string(),
            count,
            share: count as f64 / total as f64,
        })
        .collect()
}

fn timeline(quakes: &[&HistoricalEarthquake]) -> Vec<TimelinePoint> {
    if quakes.is_empty() {
        return Vec::new();
    }
    let (min, max) = magnitude_extent(quakes);
    let scale = if min == max {
        color::orange_red_scale(min - 0.1, max + 0.1)
    } else {
        color::orange_red_scale(min, max)
    };
    let max_deaths = quakes.iter().map(|q| q.deaths).max().unwrap_or(0);

    let mut sorted: Vec<&HistoricalEarthquake> = quakes.to_vec();
    sorted.sort_by_key(|q| q.year);
    sorted
        .into_iter()
        .map(|q| {
            // marker area proportional to deaths
            let radius = if max_deaths == 0 {
                TIMELINE_MIN_RADIUS
            } else {
                let frac = (q.deaths as f64 / max_deaths as f64).sqrt() as f32;
                (TIMELINE_MAX_RADIUS * frac).max(TIMELINE_MIN_RADIUS)
            };
            TimelinePoint {
                year: q.year,
                magnitude: q.magnitude,
                deaths: q.deaths,
                location: q.location.clone(),
                description: q.description.clone(),
                radius,
                color: scale.color_at(q.magnitude),
            }
        })
        .collect()
}

fn deadliest(quakes: &[&HistoricalEarthquake]) -> (Vec<DeadlyEvent>, Option<String>) {
    if quakes.is_empty() {
        return (Vec::new(), None);
    }
    let mut ranked: Vec<&HistoricalEarthquake> = quakes.to_vec();
    ranked.sort_by(|a, b| b.deaths.cmp(&a.deaths));
    let top: Vec<DeadlyEvent> = ranked
        .into_iter()
        .take(DEADLIEST_COUNT)
        .map(|q| DeadlyEvent {
            year: q.year,
            location: q.location.clone(),
            magnitude: q.magnitude,
            deaths: q.deaths,
        })
        .collect();

    let caption = if quakes.len() > DEADLIEST_COUNT {
        format!(
            "Showing top {} deadliest out of {} filtered events.",
            top.len(),
            quakes.len()
        )
    } else {
        format!("Showing all {} filtered events.", quakes.len())
    };
    (top, Some(caption))
}

/// `123000` → `"123,000"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_embedded;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn render(ds: &Dataset, criteria: &FilterCriteria) -> RenderModel {
        let mut rng = StdRng::seed_from_u64(1);
        on_filter_changed_with(ds, criteria, &HeatmapParams::default(), &mut rng)
    }

    #[test]
    fn default_view() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));

        assert_eq!(model.visible_faults, 5);
        assert_eq!(model.visible_quakes, 7);
        assert_eq!(model.map.center, [40.0, 15.5]);
        assert_eq!(model.map.zoom, 6);
        assert_eq!(model.map.fault_markers.len(), 5);
        assert_eq!(model.map.slip_circles.len(), 5);
        assert_eq!(model.map.quake_markers.len(), 7);
        assert!(model.map.heatmap.is_none());
        assert_eq!(model.notices, Notices::default());
        assert_eq!(
            model.charts.timeline_title,
            "Earthquakes (1900-2016, M6.2-7.4)"
        );
    }

    #[test]
    fn fault_marker_text() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));
        let messina = model
            .map
            .fault_markers
            .iter()
            .find(|m| m.name == "Messina Strait")
            .unwrap();
        assert_eq!(messina.position, [38.2, 15.6]);
        assert_eq!(messina.tooltip, "Messina Strait\nRisk: Very High");
        assert_eq!(messina.icon_color, Color32::from_rgb(0xD5, 0x3F, 0x8C));
        assert!(messina
            .popup
            .lines
            .contains(&"Slip Rate: 2.5 mm/year".to_string()));

        let circle = model
            .map
            .slip_circles
            .iter()
            .find(|c| c.tooltip.starts_with("Gargano"))
            .unwrap();
        assert_eq!(circle.tooltip, "Gargano Fault System (Slip: 1.0 mm/yr)");
        assert_eq!(circle.radius_m, 7000.0);
        assert_eq!(circle.fill.a(), 38);
    }

    #[test]
    fn slip_circle_radius_has_floor() {
        assert_eq!(slip_circle_radius_m(0.3), 5000.0);
        assert_eq!(slip_circle_radius_m(2.5), 17500.0);
    }

    #[test]
    fn quake_markers_scale_with_magnitude() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));
        let messina = model
            .map
            .quake_markers
            .iter()
            .find(|m| m.tooltip == "1908 Messina Strait (M7.1)")
            .unwrap();
        // filtered min is 6.2 (2016)
        assert!((messina.radius - 4.8).abs() < 1e-4);
        assert!(messina.popup.lines.contains(&"Deaths: 123,000".to_string()));
        assert_eq!(messina.fill.a(), 153);

        let smallest = model
            .map
            .quake_markers
            .iter()
            .find(|m| m.tooltip.starts_with("2016"))
            .unwrap();
        assert_eq!(smallest.radius, QUAKE_BASE_RADIUS);
        assert_eq!(smallest.color, Color32::from_rgb(255, 255, 0));
    }

    #[test]
    fn single_magnitude_uses_fixed_radius_and_two_colour_scale() {
        let ds = load_embedded().unwrap();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.magnitude_range = (7.1, 7.1);
        let model = render(&ds, &criteria);
        assert_eq!(model.map.quake_markers.len(), 1);
        assert_eq!(model.map.quake_markers[0].radius, QUAKE_FIXED_RADIUS);
        let scale = model.map.magnitude_scale.as_ref().unwrap();
        assert_eq!(scale.stops().len(), 2);
        assert_eq!(quake_radius(7.1, 7.1, 7.1), 5.0);
    }

    #[test]
    fn empty_selection_yields_notices_not_errors() {
        let ds = load_embedded().unwrap();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.selected_risks.clear();
        criteria.year_range = (1000, 1100);
        criteria.active_layers = Layer::ALL.into_iter().collect();
        let model = render(&ds, &criteria);

        assert!(model.map.fault_markers.is_empty());
        assert!(model.map.quake_markers.is_empty());
        assert!(model.map.magnitude_scale.is_none());
        assert!(model.map.heatmap.is_none());
        assert!(model.charts.slip_bars.is_empty());
        assert!(model.charts.fault_types.is_empty());
        assert!(model.charts.timeline.is_empty());
        assert!(model.charts.deadliest.is_empty());
        assert_eq!(model.charts.deadliest_caption, None);
        assert_eq!(model.notices.faults, Some(NO_FAULTS_NOTICE));
        assert_eq!(model.notices.fault_types, None);
        assert_eq!(model.notices.earthquakes, Some(NO_QUAKES_NOTICE));
    }

    #[test]
    fn inactive_layers_still_feed_charts() {
        let ds = load_embedded().unwrap();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.active_layers = BTreeSet::new();
        let model = render(&ds, &criteria);
        assert!(model.map.fault_markers.is_empty());
        assert!(model.map.quake_markers.is_empty());
        assert_eq!(model.charts.slip_bars.len(), 5);
        assert_eq!(model.charts.timeline.len(), 7);
    }

    #[test]
    fn heatmap_layer_visibility() {
        let ds = load_embedded().unwrap();
        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.active_layers.insert(Layer::SeismicRiskHeatmap);
        let model = render(&ds, &criteria);
        let heat = model.map.heatmap.as_ref().unwrap();
        assert!(!heat.shown_by_default);
        assert_eq!(heat.max_val, 5.0);
        assert_eq!(heat.gradient.stops().len(), 5);

        let params = HeatmapParams::default();
        let expected: usize = ds
            .faults()
            .iter()
            .map(|f| params.point_count(f.seismic_risk.weight(), f.annual_slip_rate))
            .sum();
        assert_eq!(heat.points.len(), expected);

        criteria.active_layers = [Layer::SeismicRiskHeatmap].into_iter().collect();
        let model = render(&ds, &criteria);
        assert!(model.map.heatmap.unwrap().shown_by_default);
    }

    #[test]
    fn slip_bars_sorted_descending_with_risk_colours() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));
        let names: Vec<&str> = model
            .charts
            .slip_bars
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Messina Strait",
                "Calabrian Arc",
                "Apennine Fault System",
                "Siculo-Calabrian Rift Zone",
                "Gargano Fault System"
            ]
        );
        assert_eq!(
            model.charts.slip_bars[0].color,
            color::risk_color(SeismicRisk::VeryHigh)
        );
    }

    #[test]
    fn fault_type_frequencies() {
        let ds = load_embedded().unwrap();
        let faults: Vec<&FaultSystem> = ds.faults().iter().collect();
        let shares = fault_type_shares(&faults);
        let counts: Vec<(&str, usize)> = shares.iter().map(|s| (s.tag.as_str(), s.count)).collect();
        assert_eq!(
            counts,
            vec![
                ("Normal", 4),
                ("Thrust", 3),
                ("Strike-Slip", 3),
                ("Oblique-Slip", 1),
                ("Transpressional", 1),
                ("Minor Normal", 1)
            ]
        );
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deadliest_top_five_with_caption() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));
        let years: Vec<i32> = model.charts.deadliest.iter().map(|d| d.year).collect();
        assert_eq!(years, vec![1908, 1915, 1980, 1930, 2009]);
        assert_eq!(
            model.charts.deadliest[0].headline(),
            "1908 Messina Strait (M7.1)"
        );
        assert_eq!(
            model.charts.deadliest_caption.as_deref(),
            Some("Showing top 5 deadliest out of 7 filtered events.")
        );

        let mut criteria = FilterCriteria::defaults_for(&ds);
        criteria.year_range = (1960, 2016);
        let model = render(&ds, &criteria);
        assert_eq!(model.charts.deadliest.len(), 4);
        assert_eq!(
            model.charts.deadliest_caption.as_deref(),
            Some("Showing all 4 filtered events.")
        );
    }

    #[test]
    fn timeline_sorted_by_year_and_sized_by_deaths() {
        let ds = load_embedded().unwrap();
        let model = render(&ds, &FilterCriteria::defaults_for(&ds));
        let timeline = &model.charts.timeline;
        assert!(timeline.windows(2).all(|w| w[0].year <= w[1].year));
        let messina = timeline.iter().find(|p| p.year == 1908).unwrap();
        assert_eq!(messina.radius, TIMELINE_MAX_RADIUS);
        assert!(timeline
            .iter()
            .all(|p| p.radius >= TIMELINE_MIN_RADIUS && p.radius <= TIMELINE_MAX_RADIUS));
    }

    #[test]
    fn identical_criteria_give_identical_tables() {
        let ds = load_embedded().unwrap();
        let criteria = FilterCriteria::defaults_for(&ds);
        let a = on_filter_changed(&ds, &criteria);
        let b = on_filter_changed(&ds, &criteria);
        assert_eq!(a.map.fault_markers, b.map.fault_markers);
        assert_eq!(a.map.quake_markers, b.map.quake_markers);
        assert_eq!(a.charts, b.charts);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1400), "1,400");
        assert_eq!(format_thousands(123000), "123,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
