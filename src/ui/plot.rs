use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use flightboard::color::{FlightScale, RatioScale};
use flightboard::data::aggregate::{ratio_extent, WeekCell};
use flightboard::data::model::FlightRecord;
use flightboard::state::{AppState, ChartView};

const BAR_COLOR: Color32 = Color32::from_rgb(0x21, 0x71, 0xb5);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        centered_message(ui, "Loading flight data…");
        return;
    }

    match state.view {
        ChartView::Daily => daily_bars(ui, state),
        ChartView::Timeline => timeline(ui, state),
        ChartView::HeatMap => heat_map(ui, state),
        ChartView::Totals => totals(ui, state),
    }
}

fn centered_message(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

fn no_records(ui: &mut Ui, state: &AppState) -> bool {
    if state.visible.is_empty() {
        centered_message(ui, "No flights match the current selection.");
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// Daily bars
// ---------------------------------------------------------------------------

/// Flights per day; several entities on one day are summed.
fn daily_bars(ui: &mut Ui, state: &AppState) {
    if no_records(ui, state) {
        return;
    }

    let mut bars: Vec<Bar> = Vec::new();
    for day in state.visible.chunk_by(|a, b| a.date == b.date) {
        let flights = day.iter().fold(0u64, |sum, r| sum.saturating_add(r.flights));
        let first = &day[0];
        let name = match day {
            [single] => single.describe(),
            _ => format!("{}: {flights} flights", first.day),
        };
        bars.push(
            Bar::new(day_axis(first), flights as f64)
                .name(name)
                .fill(BAR_COLOR)
                .width(0.9),
        );
    }

    let (from, to) = (&state.visible[0].day, &state.visible[state.visible.len() - 1].day);
    ui.label(RichText::new(format!("Flight data from {from} to {to}")).strong());

    Plot::new("daily_bars")
        .x_axis_label("Day of year")
        .y_axis_label("Flights")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Flights"));
        });
}

// ---------------------------------------------------------------------------
// Comparison timeline
// ---------------------------------------------------------------------------

/// One line per selected entity over the visible days.
fn timeline(ui: &mut Ui, state: &AppState) {
    if no_records(ui, state) {
        return;
    }

    let mut order: Vec<&str> = Vec::new();
    let mut series: HashMap<&str, Vec<[f64; 2]>> = HashMap::new();
    for r in &state.visible {
        series
            .entry(r.entity.as_str())
            .or_insert_with(|| {
                order.push(r.entity.as_str());
                Vec::new()
            })
            .push([day_axis(r), r.flights as f64]);
    }

    Plot::new("timeline")
        .legend(Legend::default())
        .x_axis_label("Day of year")
        .y_axis_label("Flights")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for entity in order {
                let points: PlotPoints = series
                    .remove(entity)
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                let line = Line::new(points)
                    .name(entity)
                    .color(state.entity_colors.color_for(entity))
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

fn day_axis(record: &FlightRecord) -> f64 {
    use chrono::Datelike;
    record.date.ordinal() as f64
}

// ---------------------------------------------------------------------------
// Heat map: weekly flights relative to 2019
// ---------------------------------------------------------------------------

const CELL: egui::Vec2 = egui::vec2(20.0, 18.0);

fn heat_map(ui: &mut Ui, state: &AppState) {
    ui.heading(format!(
        "Fluctuation in number of flights in {} compared to 2019",
        state.year
    ));

    let cells = state.heat_cells();
    let Some((min, max)) = ratio_extent(&cells) else {
        centered_message(
            ui,
            "No data available for the selected season and country group.",
        );
        return;
    };
    let scale = RatioScale::new(min, max);
    ui.label(format!(
        "Weekly flights as share of 2019: {:.0}% (red) to {:.0}% (blue)",
        min * 100.0,
        max * 100.0
    ));

    let mut entities: Vec<&str> = Vec::new();
    let mut weeks: Vec<u32> = Vec::new();
    let mut lookup: HashMap<(&str, u32), &WeekCell> = HashMap::new();
    for cell in &cells {
        if !entities.contains(&cell.entity.as_str()) {
            entities.push(cell.entity.as_str());
        }
        if !weeks.contains(&cell.week) {
            weeks.push(cell.week);
        }
        lookup.insert((cell.entity.as_str(), cell.week), cell);
    }
    weeks.sort_unstable();

    ScrollArea::both().show(ui, |ui: &mut Ui| {
        egui::Grid::new("heat_map")
            .spacing([2.0, 2.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("");
                for week in &weeks {
                    ui.label(RichText::new(week.to_string()).small());
                }
                ui.end_row();

                for entity in &entities {
                    ui.label(RichText::new(*entity).strong());
                    for week in &weeks {
                        let (rect, response) = ui.allocate_exact_size(CELL, Sense::hover());
                        let Some(cell) = lookup.get(&(*entity, *week)) else {
                            continue;
                        };
                        let fill = cell
                            .ratio()
                            .map_or(Color32::DARK_GRAY, |r| scale.color_for(r));
                        ui.painter().rect_filled(rect, 3.0, fill);
                        let ratio = cell
                            .ratio()
                            .map_or("n/a".to_string(), |r| format!("{:.2}%", r * 100.0));
                        let mut hover = format!(
                            "{entity}\nWeek: {week}\nFlights: {}\nFlights 2019: {}\nRatio: {ratio}",
                            cell.flights, cell.flights_2019
                        );
                        if let Some(previous) = cell.flights_previous_year {
                            hover.push_str(&format!("\nPrevious year: {previous}"));
                        }
                        response.on_hover_text(hover);
                    }
                    ui.end_row();
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Per-entity totals
// ---------------------------------------------------------------------------

/// Ranked totals over the current season / range, coloured by volume.
fn totals(ui: &mut Ui, state: &AppState) {
    if state.totals.is_empty() {
        centered_message(ui, "No flights match the current selection.");
        return;
    }

    let mut ranked = state.totals.clone();
    ranked.sort_by(|a, b| b.flights.cmp(&a.flights));
    let scale = FlightScale::new(ranked[0].flights);

    let bars: Vec<Bar> = ranked
        .iter()
        .rev()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.flights as f64)
                .name(format!("{}: {}", t.entity, t.flights))
                .fill(scale.color_for(t.flights))
                .width(0.8)
        })
        .collect();

    Plot::new("totals")
        .x_axis_label("Flights")
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Total flights"));
        });
}
