use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::class_colors;
use crate::data::table::{PredictionTable, UploadedTable};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Preview tables
// ---------------------------------------------------------------------------

/// Render the first rows of the upload with a leading row-index column.
pub fn uploaded_preview(ui: &mut Ui, table: &UploadedTable) {
    ui.push_id("uploaded_preview", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto())
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.label("");
                });
                for name in &table.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for (idx, row) in table.rows.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut r| {
                        r.col(|ui| {
                            ui.weak(idx.to_string());
                        });
                        for cell in row {
                            r.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

/// Render prediction rows; class headers use the class colours.
pub fn prediction_preview(ui: &mut Ui, table: &PredictionTable) {
    let colors = class_colors();
    ui.push_id("prediction_preview", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .columns(Column::auto().at_least(140.0), colors.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.label("");
                });
                for (name, color) in table.columns().iter().zip(colors) {
                    header.col(|ui| {
                        ui.label(RichText::new(*name).strong().color(color));
                    });
                }
            })
            .body(|mut body| {
                for (idx, row) in table.rows.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut r| {
                        r.col(|ui| {
                            ui.weak(idx.to_string());
                        });
                        for p in row {
                            r.col(|ui| {
                                ui.monospace(format!("{p:.6}"));
                            });
                        }
                    });
                }
            });
    });
}
