use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, Points, Polygon, Text};

use crate::color::{with_opacity, ColorScale};
use crate::heatmap::HeatPoint;
use crate::render::{HeatmapLayer, MapModel, Popup};
use crate::state::AppState;

const METERS_PER_DEG_LAT: f64 = 111_320.0;
const CIRCLE_SEGMENTS: usize = 48;
const HEAT_CELL_DEG: f64 = 0.1;
const FAULT_MARKER_RADIUS: f32 = 7.0;
/// Label offset north of a fault marker, degrees.
const FAULT_LABEL_OFFSET_DEG: f64 = 0.12;
const LEGEND_STEPS: usize = 24;
/// Clicks farther than this (degrees) from every marker select nothing.
const PICK_DISTANCE_DEG: f64 = 0.25;

// ---------------------------------------------------------------------------
// Map (central panel)
// ---------------------------------------------------------------------------

/// Render the map in lon/lat plot coordinates, plus details of the
/// selected feature underneath.
pub fn fault_map(ui: &mut Ui, state: &mut AppState) {
    let Some(render) = &state.render else {
        return;
    };
    let map = &render.map;

    if let Some(heat) = &map.heatmap {
        ui.checkbox(&mut state.heatmap_visible, "Show seismic risk heatmap")
            .on_hover_text(format!(
                "{} synthetic points, radius {} px, blur {} px",
                heat.points.len(),
                heat.radius,
                heat.blur
            ));
    }
    let show_heat = state.heatmap_visible;
    if let Some(scale) = &map.magnitude_scale {
        magnitude_legend(ui, scale);
    }

    let [center_lat, center_lon] = map.center;
    let half_lon = 360.0 / 2f64.powi(i32::from(map.zoom)) * 1.25;
    let half_lat = half_lon * 0.75;
    let details_height = if state.selected.is_some() { 160.0 } else { 0.0 };

    let response = Plot::new("fault_map")
        .height((ui.available_height() - details_height).max(200.0))
        .data_aspect((1.0 / center_lat.to_radians().cos()) as f32)
        .include_x(center_lon - half_lon)
        .include_x(center_lon + half_lon)
        .include_y(center_lat - half_lat)
        .include_y(center_lat + half_lat)
        .x_axis_label("Longitude (°E)")
        .y_axis_label("Latitude (°N)")
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.2}°N {:.2}°E", value.y, value.x)
            } else {
                name.to_owned()
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if show_heat {
                if let Some(heat) = &map.heatmap {
                    for polygon in heat_cells(heat) {
                        plot_ui.polygon(polygon);
                    }
                }
            }

            for circle in &map.slip_circles {
                plot_ui.polygon(
                    Polygon::new(circle_outline(circle.center, circle.radius_m))
                        .fill_color(circle.fill)
                        .stroke(Stroke::new(1.0, circle.stroke))
                        .name(&circle.tooltip),
                );
            }

            for quake in &map.quake_markers {
                let [lat, lon] = quake.position;
                plot_ui.points(
                    Points::new(vec![[lon, lat]])
                        .shape(MarkerShape::Circle)
                        .radius(quake.radius)
                        .filled(true)
                        .color(quake.fill)
                        .name(&quake.tooltip),
                );
                plot_ui.points(
                    Points::new(vec![[lon, lat]])
                        .shape(MarkerShape::Circle)
                        .radius(quake.radius)
                        .filled(false)
                        .color(quake.color),
                );
            }

            for fault in &map.fault_markers {
                let [lat, lon] = fault.position;
                plot_ui.points(
                    Points::new(vec![[lon, lat]])
                        .shape(MarkerShape::Diamond)
                        .radius(FAULT_MARKER_RADIUS)
                        .filled(true)
                        .color(fault.icon_color)
                        .name(&fault.tooltip),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(lon, lat + FAULT_LABEL_OFFSET_DEG),
                        RichText::new(&fault.name).size(11.0).strong(),
                    )
                    .color(fault.icon_color)
                    .anchor(egui::Align2::CENTER_BOTTOM),
                );
            }

            plot_ui.pointer_coordinate()
        });

    let picked = if response.response.clicked() {
        response.inner.map(|pointer| pick(map, pointer))
    } else {
        None
    };
    if let Some(selection) = picked {
        state.selected = selection;
    }

    if let Some(popup) = &state.selected {
        ui.separator();
        popup_card(ui, popup);
    }
}

/// Horizontal colour bar for the earthquake magnitude scale.
fn magnitude_legend(ui: &mut Ui, scale: &ColorScale) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Magnitude (Mw) {:.1}", scale.vmin()));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 12.0), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let step_w = rect.width() / LEGEND_STEPS as f32;
        for i in 0..LEGEND_STEPS {
            let t = (i as f64 + 0.5) / LEGEND_STEPS as f64;
            let value = scale.vmin() + t * (scale.vmax() - scale.vmin());
            let x0 = rect.left() + i as f32 * step_w;
            let cell = egui::Rect::from_min_size(
                egui::pos2(x0, rect.top()),
                egui::vec2(step_w + 0.5, rect.height()),
            );
            painter.rect_filled(cell, 0.0, scale.color_at(value));
        }
        for (pos, _) in scale.stops() {
            let x = rect.left() + pos * rect.width();
            painter.vline(x, rect.y_range(), Stroke::new(1.0, Color32::DARK_GRAY));
        }
        ui.label(format!("{:.1}", scale.vmax()));
    });
}

/// Popup of the marker nearest to `pointer`, if any is close enough.
fn pick(map: &MapModel, pointer: PlotPoint) -> Option<Popup> {
    let lon_scale = pointer.y.to_radians().cos();
    let distance = |[lat, lon]: [f64; 2]| {
        let dx = (lon - pointer.x) * lon_scale;
        let dy = lat - pointer.y;
        (dx * dx + dy * dy).sqrt()
    };

    let faults = map
        .fault_markers
        .iter()
        .map(|m| (distance(m.position), &m.popup));
    let quakes = map
        .quake_markers
        .iter()
        .map(|m| (distance(m.position), &m.popup));

    faults
        .chain(quakes)
        .filter(|(d, _)| *d <= PICK_DISTANCE_DEG)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, popup)| popup.clone())
}

fn popup_card(ui: &mut Ui, popup: &Popup) {
    let title = RichText::new(&popup.title).heading();
    ui.label(match popup.accent {
        Some(c) => title.color(c),
        None => title,
    });
    for line in &popup.lines {
        ui.label(line);
    }
    if let Some(note) = &popup.note {
        ui.label(RichText::new(note).italics());
    }
}

/// Closed polygon approximating a ground circle, in `[lon, lat]`.
fn circle_outline(center: [f64; 2], radius_m: f64) -> Vec<[f64; 2]> {
    let [lat, lon] = center;
    let dlat = radius_m / METERS_PER_DEG_LAT;
    let dlon = radius_m / (METERS_PER_DEG_LAT * lat.to_radians().cos());
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = i as f64 / CIRCLE_SEGMENTS as f64 * std::f64::consts::TAU;
            [lon + dlon * theta.cos(), lat + dlat * theta.sin()]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heatmap density grid
// ---------------------------------------------------------------------------

/// Bin points into square cells of `cell_deg`; returns `(south-west corner
/// [lat, lon], count)` sorted by corner.
fn density_grid(points: &[HeatPoint], cell_deg: f64) -> Vec<([f64; 2], usize)> {
    let mut bins: HashMap<(i64, i64), usize> = HashMap::new();
    for p in points {
        let key = (
            (p.lat / cell_deg).floor() as i64,
            (p.lon / cell_deg).floor() as i64,
        );
        *bins.entry(key).or_default() += 1;
    }
    let mut cells: Vec<([f64; 2], usize)> = bins
        .into_iter()
        .map(|((i, j), n)| ([i as f64 * cell_deg, j as f64 * cell_deg], n))
        .collect();
    cells.sort_by(|a, b| a.0[0].total_cmp(&b.0[0]).then(a.0[1].total_cmp(&b.0[1])));
    cells
}

fn heat_cells(heat: &HeatmapLayer) -> Vec<Polygon> {
    density_grid(&heat.points, HEAT_CELL_DEG)
        .into_iter()
        .map(|([lat, lon], count)| {
            let intensity = (count as f64 / heat.max_val).min(1.0);
            let opacity = (intensity as f32).max(heat.min_opacity);
            let color: Color32 = with_opacity(heat.gradient.color_at(intensity), opacity);
            Polygon::new(vec![
                [lon, lat],
                [lon + HEAT_CELL_DEG, lat],
                [lon + HEAT_CELL_DEG, lat + HEAT_CELL_DEG],
                [lon, lat + HEAT_CELL_DEG],
            ])
            .fill_color(color)
            .stroke(Stroke::NONE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_grid_counts_per_cell() {
        let points = [
            HeatPoint { lat: 38.21, lon: 15.61 },
            HeatPoint { lat: 38.29, lon: 15.69 },
            HeatPoint { lat: 38.31, lon: 15.61 },
        ];
        let cells = density_grid(&points, 0.1);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].1, 2);
        assert_eq!(cells[1].1, 1);
        assert!(density_grid(&[], 0.1).is_empty());
    }

    #[test]
    fn circle_outline_is_wider_in_longitude() {
        let outline = circle_outline([40.0, 15.5], 7000.0);
        assert_eq!(outline.len(), CIRCLE_SEGMENTS);
        let max_dlon = outline.iter().map(|p| (p[0] - 15.5).abs()).fold(0.0, f64::max);
        let max_dlat = outline.iter().map(|p| (p[1] - 40.0).abs()).fold(0.0, f64::max);
        assert!(max_dlon > max_dlat);
        assert!((max_dlat - 7000.0 / METERS_PER_DEG_LAT).abs() < 1e-3);
    }

    #[test]
    fn pick_selects_nearest_marker_within_reach() {
        let ds = crate::data::loader::load_embedded().unwrap();
        let criteria = crate::data::filter::FilterCriteria::defaults_for(&ds);
        let render = crate::render::on_filter_changed(&ds, &criteria);

        // Messina Strait fault and the 1908 quake share a location; faults win ties
        let popup = pick(&render.map, PlotPoint::new(15.6, 38.2)).unwrap();
        assert_eq!(popup.title, "Messina Strait");

        let popup = pick(&render.map, PlotPoint::new(13.02, 37.8)).unwrap();
        assert_eq!(popup.title, "1968 Belice Valley, Sicily");

        assert!(pick(&render.map, PlotPoint::new(10.0, 45.0)).is_none());
    }
}
