use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::class_colors;
use crate::data::table::PredictionTable;

// ---------------------------------------------------------------------------
// Probability chart
// ---------------------------------------------------------------------------

/// Stacked bars, one per preview row, split by class probability.
pub fn probability_chart(ui: &mut Ui, table: &PredictionTable) {
    if table.is_empty() {
        return;
    }
    let colors = class_colors();

    let mut charts: Vec<BarChart> = Vec::with_capacity(colors.len());
    for (class_idx, (name, color)) in table.columns().iter().zip(colors).enumerate() {
        let bars: Vec<Bar> = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, probs)| Bar::new(row_idx as f64, probs[class_idx]).width(0.6))
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars).name(*name).color(color).stack_on(&below);
        charts.push(chart);
    }

    Plot::new("probability_plot")
        .legend(Legend::default())
        .height(220.0)
        .x_axis_label("Row")
        .y_axis_label("Probability")
        .include_y(0.0)
        .include_y(1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
