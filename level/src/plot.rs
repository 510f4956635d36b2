use crate::drift::DriftReport;
use crate::session::Capture;
use eframe::egui::{self, Color32};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use level_traits::{Axis, LevelError, Result};

const WINDOW_TITLE: &str = "Level data";

struct FitOverlay {
    line: Vec<[f64; 2]>,
    label: String,
    label_at: [f64; 2],
}

struct LevelPlot {
    data: Vec<[f64; 2]>,
    fit: Option<FitOverlay>,
}

impl eframe::App for LevelPlot {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(WINDOW_TITLE);

            let mut plot = Plot::new("level_plot")
                .x_axis_label("Time (s)")
                .y_axis_label("Angle (degrees)");
            if self.fit.is_some() {
                plot = plot.legend(Legend::default());
            }

            plot.show(ui, |plot_ui| {
                plot_ui.points(Points::new("Data", PlotPoints::from(self.data.clone())).radius(2.0));

                if let Some(fit) = &self.fit {
                    plot_ui.line(Line::new("Fit", PlotPoints::from(fit.line.clone())).width(1.5));
                    plot_ui.text(
                        Text::new(
                            "drift",
                            PlotPoint::new(fit.label_at[0], fit.label_at[1]),
                            fit.label.as_str(),
                        )
                        .color(Color32::GREEN),
                    );
                }
            });
        });
    }
}

fn series(capture: &Capture, axis: Axis) -> Vec<[f64; 2]> {
    capture
        .time
        .iter()
        .zip(capture.angles(axis))
        .map(|(&t, &angle)| [t, angle])
        .collect()
}

fn fit_line(capture: &Capture, report: &DriftReport) -> Vec<[f64; 2]> {
    capture
        .time
        .iter()
        .map(|&t| [t, report.fit.at(t)])
        .collect()
}

// Lower left of the data, 10% in from the left and 15% up from the bottom.
fn label_anchor(points: &[[f64; 2]]) -> [f64; 2] {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &[x, y] in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if points.is_empty() {
        return [0.0, 0.0];
    }
    [
        x_min + 0.1 * (x_max - x_min),
        y_min + 0.15 * (y_max - y_min),
    ]
}

fn show(plot: LevelPlot) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(plot))),
    )
    .map_err(|e| LevelError::Plot(e.to_string()))
}

/// Scatter of angle X against time. Blocks until the window is closed.
pub fn show_capture(capture: &Capture) -> Result<()> {
    show(LevelPlot {
        data: series(capture, Axis::X),
        fit: None,
    })
}

/// Data, fitted line and the drift rate. Blocks until the window is closed.
pub fn show_fit(capture: &Capture, report: &DriftReport) -> Result<()> {
    let data = series(capture, report.axis);
    let fit = FitOverlay {
        line: fit_line(capture, report),
        label: report.to_string(),
        label_at: label_anchor(&data),
    };
    show(LevelPlot {
        data,
        fit: Some(fit),
    })
}
