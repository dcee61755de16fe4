use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use flightboard::data::aggregate::COUNTRY_GROUPS;
use flightboard::data::filter::{DateRange, EntitySelector};
use flightboard::data::season::Season;
use flightboard::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let entities = match &state.dataset {
        Some(ds) if !ds.is_empty() => ds.entities().to_vec(),
        _ => {
            ui.label("No data loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Entity ----
            ui.strong("State");
            if state.view == ChartView::Timeline {
                compare_list(ui, state, &entities);
            } else {
                entity_combo(ui, state, &entities);
            }
            ui.separator();

            // ---- Season ----
            ui.strong("Season");
            let current = state.criteria.season;
            egui::ComboBox::from_id_salt("season")
                .selected_text(current.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for season in Season::ALL_CHOICES {
                        if ui.selectable_label(current == season, season.name()).clicked() {
                            state.set_season(season);
                        }
                    }
                });
            if state.criteria.range.is_some() {
                ui.label(RichText::new("Overridden by the date range").weak());
            }
            ui.separator();

            date_range(ui, state);

            if state.view == ChartView::HeatMap {
                ui.separator();
                heat_group_combo(ui, state);
            }
        });
}

fn entity_combo(ui: &mut Ui, state: &mut AppState, entities: &[String]) {
    let selected_text = match &state.criteria.entity {
        EntitySelector::All => "All".to_string(),
        EntitySelector::One(name) => name.clone(),
        EntitySelector::Set(names) => format!("{} selected", names.len()),
    };
    egui::ComboBox::from_id_salt("entity")
        .selected_text(selected_text)
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            let is_all = state.criteria.entity == EntitySelector::All;
            if ui.selectable_label(is_all, "All").clicked() {
                state.set_entity(EntitySelector::All);
            }
            for entity in entities {
                let is_selected = state.criteria.entity == EntitySelector::One(entity.clone());
                if ui.selectable_label(is_selected, entity.as_str()).clicked() {
                    state.set_entity(EntitySelector::One(entity.clone()));
                }
            }
        });
}

/// Multi-select used by the comparison chart; labels carry the line colour.
fn compare_list(ui: &mut Ui, state: &mut AppState, entities: &[String]) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("None").clicked() {
            state.set_entity(EntitySelector::Set(Default::default()));
        }
    });
    ScrollArea::vertical()
        .id_salt("compare_list")
        .max_height(260.0)
        .show(ui, |ui: &mut Ui| {
            for entity in entities {
                let mut checked = state.criteria.entity.matches(entity)
                    && state.criteria.entity != EntitySelector::All;
                let color = state.entity_colors.color_for(entity);
                let text = RichText::new(entity.as_str()).color(color);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_compared_entity(entity);
                }
            }
        });
}

fn date_range(ui: &mut Ui, state: &mut AppState) {
    let mut custom = state.criteria.range.is_some();
    if ui.checkbox(&mut custom, "Custom date range").changed() {
        let range = if custom { state.year_bounds() } else { None };
        state.set_date_range(range);
    }

    let Some(range) = state.criteria.range else {
        return;
    };
    let mut start = range.start();
    let mut end = range.end();
    let mut changed = false;

    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut start).id_salt("range_start"))
            .changed();
        ui.end_row();
        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut end).id_salt("range_end"))
            .changed();
        ui.end_row();
    });

    if changed {
        state.set_date_range(Some(DateRange::new(start, end)));
    }
}

fn heat_group_combo(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Country group");
    egui::ComboBox::from_id_salt("heat_group")
        .selected_text(state.heat_group.clone())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut state.heat_group, "All".to_string(), "All");
            for (group, members) in COUNTRY_GROUPS {
                let label = format!("{group} ({} countries)", members.len());
                ui.selectable_value(&mut state.heat_group, group.to_string(), label);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Year");
        let current_year = state.year.clone();
        egui::ComboBox::from_id_salt("year")
            .selected_text(current_year.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for year in state.config.years.clone() {
                    if ui.selectable_label(current_year == year, year.as_str()).clicked() {
                        state.select_year(&year);
                    }
                }
            });

        ui.separator();

        for view in ChartView::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} records, {} shown",
                ds.year(),
                ds.len(),
                state.visible.len()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Choose the folder holding csv{year}.csv files")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
    }
}
