use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use ascent_guidance::sim::{fly, FlightSample, SimulatedVessel};
use ascent_guidance::vehicle::TelemetrySource;
use ascent_guidance::GuidanceConfig;

fn main() -> eframe::Result {
    let mut vessel = SimulatedVessel::two_stage();
    let mut status: Vec<String> = Vec::new();
    let outcome = match fly(GuidanceConfig::default(), &mut vessel, &mut status) {
        Ok(report) => Ok(report.log.samples),
        Err(err) => Err(err.to_string()),
    };

    let app = AscentViz {
        launcher: vessel.launcher().name.clone(),
        apoapsis: vessel.apoapsis_altitude().unwrap_or(f64::NAN),
        periapsis: vessel.periapsis_altitude(),
        outcome,
        status,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Ascent Guidance", options, Box::new(|_| Ok(Box::new(app))))
}

struct AscentViz {
    launcher: String,
    apoapsis: f64,
    periapsis: f64,
    outcome: Result<Vec<FlightSample>, String>,
    status: Vec<String>,
}

fn series(samples: &[&FlightSample], f: impl Fn(&FlightSample) -> Option<f64>) -> PlotPoints<'static> {
    samples
        .iter()
        .filter_map(|s| f(*s).map(|y| [s.time, y]))
        .collect()
}

impl eframe::App for AscentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Launcher: {}", self.launcher));
            match &self.outcome {
                Ok(samples) => {
                    let max_q = samples.iter().map(|s| s.dynamic_pressure).fold(0.0_f64, f64::max);
                    ui.label(format!(
                        "Apoapsis: {:.1} km  |  Periapsis: {:.1} km  |  Max Q: {:.1} kPa  |  Flight: {:.0} s",
                        self.apoapsis / 1000.0,
                        self.periapsis / 1000.0,
                        max_q / 1000.0,
                        samples.last().map_or(0.0, |s| s.time),
                    ));
                }
                Err(err) => {
                    ui.colored_label(egui::Color32::RED, format!("Ascent failed: {err}"));
                }
            }
            if let Some(last) = self.status.last() {
                ui.label(format!("Status: {last}"));
            }
        });

        let Ok(samples) = &self.outcome else {
            return;
        };
        let step = (samples.len() / 2000).max(1);
        let sampled: Vec<&FlightSample> = samples.iter().step_by(step).collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Altitude and apoapsis vs Time
                ui.vertical(|ui| {
                    ui.label("Altitude (km)");
                    let altitude = series(&sampled, |s| Some(s.altitude / 1000.0));
                    let apoapsis = series(&sampled, |s| {
                        s.apoapsis_altitude.is_finite().then(|| s.apoapsis_altitude / 1000.0)
                    });
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .legend(Legend::default())
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", altitude));
                            plot_ui.line(Line::new("Apoapsis", apoapsis));
                        });
                });

                // Dynamic pressure vs Time
                ui.vertical(|ui| {
                    ui.label("Dynamic Pressure (kPa)");
                    let q = series(&sampled, |s| Some(s.dynamic_pressure / 1000.0));
                    Plot::new("dynamic_pressure")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Q", q));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Commanded throttle vs Time
                ui.vertical(|ui| {
                    ui.label("Throttle");
                    let throttle = series(&sampled, |s| Some(s.throttle));
                    Plot::new("throttle")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .include_y(0.0)
                        .include_y(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Throttle", throttle));
                        });
                });

                // Commanded pitch vs Time
                ui.vertical(|ui| {
                    ui.label("Pitch Program (deg)");
                    let pitch = series(&sampled, |s| s.pitch);
                    Plot::new("pitch")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Pitch", pitch));
                        });
                });
            });
        });
    }
}
