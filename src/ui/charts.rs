use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Sense, Shape, Stroke, Ui, vec2};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::{self, ColorMap, PaletteKind};
use crate::data::aggregate::{BinarySplit, Histogram, ValueCounts};
use crate::data::summary::{DashboardSummary, Slot};

const CHART_HEIGHT: f32 = 260.0;
const WARNING: Color32 = Color32::from_rgb(230, 180, 40);

// ---------------------------------------------------------------------------
// Page layout
// ---------------------------------------------------------------------------

/// Four chart columns followed by the full-width category chart.
pub fn dashboard(ui: &mut Ui, summary: &DashboardSummary) {
    ui.columns(4, |cols: &mut [Ui]| {
        let ui = &mut cols[0];
        ui.heading("Offender Age");
        age_histogram(ui, "offender_age", &summary.offender_age, "Offender Age", color::OFFENDER_AGE);
        ui.heading("Victim Age");
        age_histogram(ui, "victim_age", &summary.victim_age, "Victim Age", color::VICTIM_AGE);

        let ui = &mut cols[1];
        ui.heading("Offender Race");
        category_bars(ui, "offender_race", &summary.offender_race, PaletteKind::Pastel, "Count");
        ui.heading("Victim Race");
        category_bars(ui, "victim_race", &summary.victim_race, PaletteKind::Prism, "Count");

        let ui = &mut cols[2];
        ui.heading("Offender Gender");
        category_pie(ui, &summary.offender_gender, PaletteKind::Set2);
        ui.heading("Victim Gender");
        category_pie(ui, &summary.victim_gender, PaletteKind::Set3);

        let ui = &mut cols[3];
        ui.heading("Report Type Breakdown");
        split_donut(ui, &summary.report_type);
        ui.heading("Victim's Injuries Status");
        split_donut(ui, &summary.fatal_status);
    });

    ui.separator();
    ui.heading("Overall Crime Categories");
    category_bars(
        ui,
        "overall_categories",
        &summary.overall_categories,
        PaletteKind::Pastel,
        "Number of Cases",
    );
}

/// Data of a ready slot; otherwise paints the warning in the chart's place.
fn ready<'a, T>(ui: &mut Ui, slot: &'a Slot<T>) -> Option<&'a T> {
    if let Slot::Unavailable { warning } = slot {
        ui.colored_label(WARNING, format!("⚠ {warning}"));
    }
    slot.ready()
}

// ---------------------------------------------------------------------------
// Histograms and bar charts (egui_plot)
// ---------------------------------------------------------------------------

pub fn age_histogram(ui: &mut Ui, id: &str, slot: &Slot<Histogram>, x_label: &str, fill: Color32) {
    let Some(hist) = ready(ui, slot) else {
        return;
    };
    ui.label(format!("Distribution of Crime Cases by {x_label} ({} cases)", hist.total()));
    if hist.is_empty() {
        ui.label("No ages for this selection.");
        return;
    }

    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let (lo, hi) = hist.bin_range(i);
            Bar::new(hist.bin_center(i), count as f64)
                .width(hist.bin_width)
                .fill(fill)
                .stroke(Stroke::new(1.5, color::BAR_OUTLINE))
                .name(format!("{lo:.0}–{hi:.0}"))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Number of Cases")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(fill));
        });
}

/// One bar per value, coloured per value, with value names on the x axis.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    slot: &Slot<ValueCounts>,
    palette: PaletteKind,
    y_label: &str,
) {
    let Some(counts) = ready(ui, slot) else {
        return;
    };
    if counts.is_empty() {
        ui.label("No values for this selection.");
        return;
    }

    let color_map = ColorMap::new(counts.entries.iter().map(|(v, _)| v.as_str()), palette);
    let bars: Vec<Bar> = counts
        .entries
        .iter()
        .enumerate()
        .map(|(i, (value, n))| {
            Bar::new(i as f64, *n as f64)
                .width(0.8)
                .fill(color_map.color_for(value))
                .name(value)
        })
        .collect();

    let labels: Vec<String> = counts.entries.iter().map(|(v, _)| v.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(counts.column.header())
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(counts.column.header()));
        });
}

// ---------------------------------------------------------------------------
// Pie and donut charts (painter)
// ---------------------------------------------------------------------------

struct Slice<'a> {
    label: &'a str,
    value: usize,
    color: Color32,
}

pub fn category_pie(ui: &mut Ui, slot: &Slot<ValueCounts>, palette: PaletteKind) {
    let Some(counts) = ready(ui, slot) else {
        return;
    };
    let color_map = ColorMap::new(counts.entries.iter().map(|(v, _)| v.as_str()), palette);
    let slices: Vec<Slice> = counts
        .entries
        .iter()
        .map(|(label, value)| Slice {
            label,
            value: *value,
            color: color_map.color_for(label),
        })
        .collect();

    ring(ui, &slices, 0.0, None);
    let total = counts.total().max(1) as f64;
    legend(ui, slices.iter().map(|s| {
        (s.color, format!("{}  {} ({:.1}%)", s.label, s.value, s.value as f64 * 100.0 / total))
    }));
}

pub fn split_donut(ui: &mut Ui, slot: &Slot<BinarySplit>) {
    let Some(split) = ready(ui, slot) else {
        return;
    };
    let slices: Vec<Slice> = (0..2)
        .map(|i| Slice {
            label: &split.labels[i],
            value: split.counts[i],
            color: color::SPLIT[i],
        })
        .collect();

    ring(ui, &slices, 0.7, Some(color::DONUT_BACKGROUND));
    legend(ui, (0..2).map(|i| {
        (
            color::SPLIT[i],
            format!("{}  {} ({:.1}%)", split.labels[i], split.counts[i], split.percents[i]),
        )
    }));
}

/// Paint slices clockwise from twelve o'clock.  `hole` is the inner radius
/// as a fraction of the outer one; 0 draws a full pie.
fn ring(ui: &mut Ui, slices: &[Slice<'_>], hole: f32, background: Option<Color32>) {
    let size = ui.available_width().min(CHART_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
    let painter = ui.painter_at(rect);
    if let Some(bg) = background {
        painter.rect_filled(rect, 4.0, bg);
    }

    let center = rect.center();
    let outer = size * 0.45;
    let inner = outer * hole;
    let total: usize = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "No data",
            FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let point = |radius: f32, angle: f32| center + vec2(angle.cos(), angle.sin()) * radius;
    let mut start = -FRAC_PI_2;
    for slice in slices.iter().filter(|s| s.value > 0) {
        let sweep = TAU * slice.value as f32 / total as f32;
        let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
        for step in 0..steps {
            let a0 = start + sweep * step as f32 / steps as f32;
            let a1 = start + sweep * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![point(inner, a0), point(outer, a0), point(outer, a1), point(inner, a1)],
                slice.color,
                Stroke::NONE,
            ));
        }

        let share = slice.value as f32 * 100.0 / total as f32;
        if share >= 4.0 {
            painter.text(
                point((inner + outer) / 2.0, start + sweep / 2.0),
                Align2::CENTER_CENTER,
                format!("{share:.1}%"),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }
        start += sweep;
    }
}

fn legend(ui: &mut Ui, entries: impl Iterator<Item = (Color32, String)>) {
    for (color, text) in entries {
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(color, "■");
            ui.label(text);
        });
    }
    ui.add_space(8.0);
}
