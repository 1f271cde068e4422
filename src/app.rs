use eframe::egui;

use crate::config::AppConfig;
use crate::data::loader::is_csv_name;
use crate::model::ModelHandle;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct IrisPredictorApp {
    pub state: AppState,
}

impl IrisPredictorApp {
    pub fn new(config: &AppConfig, model: ModelHandle) -> Self {
        Self {
            state: AppState::new(config, model),
        }
    }

    /// Treat files dropped onto the window as uploads.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.state.started {
            return;
        }
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Last one wins when several files are dropped at once.
        if let Some(file) = dropped.last() {
            let name = if file.name.is_empty() {
                file.path
                    .as_deref()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string()
            } else {
                file.name.clone()
            };
            if !is_csv_name(&name) {
                self.state.reject_upload(&name);
                return;
            }
            if let Some(bytes) = &file.bytes {
                self.state.ingest_bytes(&name, bytes);
            } else if let Some(path) = &file.path {
                self.state.ingest_path(path);
            }
        }
    }
}

impl eframe::App for IrisPredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data requirements ----
        egui::SidePanel::left("requirements_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui);
            });

        // ---- Central panel: upload and predictions ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });
    }
}
