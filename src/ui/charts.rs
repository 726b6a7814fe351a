use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoint, Points, Polygon, Text};

use crate::color::{generate_palette, risk_color};
use crate::data::model::SeismicRisk;
use crate::render::{format_thousands, FaultTypeShare, RenderModel};

const DONUT_HOLE: f64 = 0.4;
/// Widest angle of one convex donut segment.
const DONUT_STEP_RAD: f64 = 0.1;

// ---------------------------------------------------------------------------
// Fault analysis tab
// ---------------------------------------------------------------------------

pub fn fault_analysis(ui: &mut Ui, render: &RenderModel) {
    ui.heading("Fault Characteristics");

    if let Some(notice) = render.notices.faults {
        ui.colored_label(Color32::from_rgb(0xDD, 0x6B, 0x20), notice);
        return;
    }

    slip_rate_chart(ui, render);
    ui.add_space(8.0);

    ui.strong("Distribution of Reported Fault Types");
    match render.notices.fault_types {
        Some(notice) => {
            ui.label(notice);
        }
        None => fault_type_donut(ui, &render.charts.fault_types),
    }
}

fn slip_rate_chart(ui: &mut Ui, render: &RenderModel) {
    let bars = &render.charts.slip_bars;
    ui.strong("Fault System Activity (Slip Rate)");

    let names: Vec<String> = bars.iter().map(|b| b.name.clone()).collect();
    Plot::new("slip_rate_chart")
        .height(260.0)
        .legend(Legend::default())
        .y_axis_label("Slip Rate (mm/yr)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // One chart per risk category so the legend reads "Risk".
            for risk in SeismicRisk::ALL {
                let group: Vec<Bar> = bars
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.risk == risk)
                    .map(|(i, b)| {
                        Bar::new(i as f64, b.slip_rate)
                            .name(format!("{}: {:.1} mm/yr", b.name, b.slip_rate))
                            .fill(b.color)
                            .width(0.7)
                    })
                    .collect();
                if group.is_empty() {
                    continue;
                }
                plot_ui.bar_chart(
                    BarChart::new(group)
                        .name(risk.label())
                        .color(risk_color(risk)),
                );
            }
        });
}

fn fault_type_donut(ui: &mut Ui, shares: &[FaultTypeShare]) {
    let palette = generate_palette(shares.len());

    Plot::new("fault_type_donut")
        .height(240.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // start at twelve o'clock, clockwise
            let mut start = FRAC_PI_2;
            for (share, color) in shares.iter().zip(palette) {
                let sweep = share.share * TAU;
                let end = start - sweep;
                let name = format!(
                    "{}: {} ({:.0}%)",
                    share.tag,
                    share.count,
                    share.share * 100.0
                );
                for segment in donut_segments(start, end) {
                    plot_ui.polygon(
                        Polygon::new(segment)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&name),
                    );
                }

                let mid = (start + end) / 2.0;
                let label_r = (1.0 + DONUT_HOLE) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(label_r * mid.cos(), label_r * mid.sin()),
                    RichText::new(format!("{}\n{:.0}%", share.tag, share.share * 100.0))
                        .size(10.0)
                        .color(Color32::BLACK),
                ));
                start = end;
            }
        });
}

/// Split the ring sector between angles `start` and `end` into convex
/// quads.
fn donut_segments(start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = ((start - end).abs() / DONUT_STEP_RAD).ceil().max(1.0) as usize;
    let at = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    (0..steps)
        .map(|i| {
            let a0 = start + (end - start) * i as f64 / steps as f64;
            let a1 = start + (end - start) * (i + 1) as f64 / steps as f64;
            vec![
                at(DONUT_HOLE, a0),
                at(1.0, a0),
                at(1.0, a1),
                at(DONUT_HOLE, a1),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Earthquake history tab
// ---------------------------------------------------------------------------

pub fn earthquake_history(ui: &mut Ui, render: &RenderModel) {
    ui.heading("Historical Earthquake Patterns");

    if let Some(notice) = render.notices.earthquakes {
        ui.label(notice);
        return;
    }

    let charts = &render.charts;
    ui.strong(&charts.timeline_title);
    Plot::new("earthquake_timeline")
        .height(260.0)
        .x_axis_label("Year")
        .y_axis_label("Magnitude (Mw)")
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.0}, M{:.1}", value.x, value.y)
            } else {
                name.to_owned()
            }
        })
        .show(ui, |plot_ui| {
            for p in &charts.timeline {
                plot_ui.points(
                    Points::new(vec![[f64::from(p.year), p.magnitude]])
                        .shape(MarkerShape::Circle)
                        .radius(p.radius)
                        .filled(true)
                        .color(p.color)
                        .name(format!(
                            "{} ({})\nMagnitude: {:.1} Mw\nDeaths: {}\n{}",
                            p.location,
                            p.year,
                            p.magnitude,
                            format_thousands(p.deaths),
                            p.description
                        )),
                );
            }
        });

    ui.add_space(8.0);
    ui.strong("Deadliest Events in Filtered Range");
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Event");
            });
            header.col(|ui| {
                ui.strong("Deaths");
            });
        })
        .body(|mut body| {
            for event in &charts.deadliest {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(event.headline());
                    });
                    row.col(|ui| {
                        ui.label(format_thousands(event.deaths));
                    });
                });
            }
        });

    if let Some(caption) = &charts.deadliest_caption {
        ui.small(caption);
    }
}
