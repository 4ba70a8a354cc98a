use std::collections::VecDeque;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use figure8_sim::sim::{RunState, SimulationContext};
use figure8_sim::types::SimConfig;

const TRAIL_LEN: usize = 900;

fn main() -> eframe::Result {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::from_yaml_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let ctx = match SimulationContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("invalid scenario: {}", e);
            std::process::exit(1);
        }
    };

    let app = SimViz { trail: VecDeque::with_capacity(TRAIL_LEN), ctx };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Figure-Eight Guidance", options, Box::new(|_| Ok(Box::new(app))))
}

struct SimViz {
    ctx: SimulationContext,
    trail: VecDeque<[f64; 2]>,
}

impl SimViz {
    fn record_trail(&mut self) {
        let p = self.ctx.state().pos;
        if self.trail.len() == TRAIL_LEN {
            self.trail.pop_front();
        }
        self.trail.push_back([p.x, p.y]);
    }
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ctx.advance_frame().unwrap_or(0) > 0 {
            self.record_trail();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = match self.ctx.run_state() {
                    RunState::Stopped => "Start Simulation",
                    RunState::Running => "Pause",
                    RunState::Paused => "Resume",
                    RunState::Failed => "Failed",
                };
                if ui.button(label).clicked() {
                    self.ctx.toggle();
                }
                if ui.button("Reset").clicked() {
                    self.ctx.reset();
                    self.trail.clear();
                }

                let batch = &self.ctx.config().batch;
                let (min, max) = (batch.min, batch.max);
                let mut steps = self.ctx.batch_size();
                ui.add(egui::Slider::new(&mut steps, min..=max).text("steps/frame"));
                if steps != self.ctx.batch_size() {
                    if let Err(e) = self.ctx.set_batch_size(steps) {
                        ui.colored_label(egui::Color32::RED, e.to_string());
                    }
                }

                ui.separator();
                ui.heading(self.ctx.elapsed().to_string());
                if let Some(err) = self.ctx.failure() {
                    ui.colored_label(egui::Color32::RED, err.to_string());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let path: PlotPoints = self
                .ctx
                .waypoints()
                .iter()
                .map(|w| [w.position.x, w.position.y])
                .collect();
            let trail: PlotPoints = self.trail.iter().copied().collect();
            let [primary, satellite] = self.ctx.bodies();
            let rocket = self.ctx.state();
            // Short nose line along the heading
            let nose = [
                rocket.pos.x + 60.0 * rocket.heading.cos(),
                rocket.pos.y + 60.0 * rocket.heading.sin(),
            ];

            Plot::new("space")
                .data_aspect(1.0)
                .show_axes([false, false])
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new("Reference path", path)
                            .color(egui::Color32::from_rgba_unmultiplied(211, 255, 211, 100))
                            .width(2.0),
                    );
                    plot_ui.line(Line::new("Trail", trail).color(egui::Color32::LIGHT_BLUE));
                    plot_ui.points(
                        Points::new("Primary", vec![[primary.position.x, primary.position.y]])
                            .radius(30.0)
                            .color(egui::Color32::from_rgb(70, 130, 220)),
                    );
                    plot_ui.points(
                        Points::new("Satellite", vec![[satellite.position.x, satellite.position.y]])
                            .radius(14.0)
                            .color(egui::Color32::GRAY),
                    );
                    plot_ui.line(
                        Line::new("Heading", vec![[rocket.pos.x, rocket.pos.y], nose])
                            .color(egui::Color32::WHITE)
                            .width(2.0),
                    );
                    plot_ui.points(
                        Points::new("Rocket", vec![[rocket.pos.x, rocket.pos.y]])
                            .radius(5.0)
                            .color(egui::Color32::ORANGE),
                    );
                });
        });

        if self.ctx.run_state() == RunState::Running {
            ctx.request_repaint();
        }
    }
}
