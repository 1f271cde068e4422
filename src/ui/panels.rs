use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::PREDICTION_FILE_NAME;
use crate::error::PipelineError;
use crate::state::AppState;
use crate::ui::{plot, table};

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 170, 40);
const INFO_COLOR: Color32 = Color32::from_rgb(90, 160, 230);

// ---------------------------------------------------------------------------
// Left side panel – data requirements
// ---------------------------------------------------------------------------

/// Render the sidebar describing the expected upload format.
pub fn side_panel(ui: &mut Ui) {
    ui.heading("Data requirements");
    ui.label(
        RichText::new(
            "To run the model, upload a CSV with the four iris features \
             (sepal length, sepal width, petal length, petal width).",
        )
        .small(),
    );
    egui::CollapsingHeader::new("Data format")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(" - utf-8");
            ui.label(" - separated by comma");
            ui.label(" - decimal mark \".\"");
            ui.label(" - first row - header");
        });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(state.started, egui::Button::new("Open CSV…"))
                .clicked()
            {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.download.is_some(), egui::Button::new("Save predictions…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload model").clicked() {
                state.reload_model();
                ui.close_menu();
            }
        });

        ui.separator();

        let model_label = if state.model.is_loaded() {
            RichText::new(format!("Model: {}", state.model.path().display()))
        } else {
            RichText::new(format!("Model unavailable: {}", state.model.path().display()))
                .color(Color32::RED)
        };
        ui.label(model_label);

        if let Some(upload) = &state.upload {
            ui.separator();
            ui.label(format!("{}: {} rows", upload.name, upload.table.len()));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – upload, previews, predictions
// ---------------------------------------------------------------------------

/// Render the main workflow: start gate, upload, previews and download.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Iris Species Predictor");
    ui.add_space(8.0);

    if ui.button("Let's get started").clicked() {
        state.begin();
    }
    if !state.started {
        return;
    }

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Choose a file…").clicked() {
            open_file_dialog(state);
        }
        ui.weak("or drop a .csv file onto the window");
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }

    let Some(upload) = &state.upload else {
        return;
    };
    let preview_rows = state.preview_rows;
    let mut save_clicked = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_space(8.0);
            ui.heading("Uploaded data sample");
            ScrollArea::horizontal()
                .id_salt("uploaded_scroll")
                .show(ui, |ui: &mut Ui| {
                    table::uploaded_preview(ui, &upload.table.head(preview_rows));
                });
            if upload.table.is_empty() {
                ui.weak("The file has a header row but no data rows.");
            }

            let Some(report) = &state.report else {
                return;
            };

            ui.add_space(8.0);
            for notice in &report.notices {
                let color = if notice.is_warning() { WARNING_COLOR } else { INFO_COLOR };
                ui.label(RichText::new(notice.to_string()).color(color));
            }

            match &report.outcome {
                Ok(predictions) => {
                    ui.add_space(8.0);
                    ui.heading(format!("Predicted values (first {preview_rows} rows)"));
                    let head = predictions.head(preview_rows);
                    table::prediction_preview(ui, &head);
                    ui.add_space(8.0);
                    plot::probability_chart(ui, &head);

                    if state.download.is_some() {
                        save_clicked = ui.button("Download full prediction CSV").clicked();
                    }
                }
                Err(e @ PipelineError::ModelUnavailable { .. }) => {
                    ui.label(RichText::new(format!("{e}")).color(Color32::RED));
                    ui.weak("Place the model artifact at that path and use File → Reload model.");
                }
                Err(e) => {
                    ui.label(RichText::new(format!("{e}")).color(Color32::RED));
                }
            }
        });

    // The save dialog needs `&mut state`, so it runs after the previews.
    if save_clicked {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.ingest_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(download) = &state.download else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save predictions")
        .set_file_name(download.file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_download(&path) {
            log::error!("Failed to save {PREDICTION_FILE_NAME}: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
