use std::sync::Arc;

use figure8_sim::gnc::{Controller, Trajectory};
use figure8_sim::types::{SimConfig, Vec2};
use figure8_sim::SimulationContext;

/// Always-on proportional pull toward the nearest waypoint: the tracking law
/// with its deadband removed, so the rocket never coasts.
struct AlwaysOn {
    trajectory: Arc<Trajectory>,
    divisor: f64,
}

impl Controller for AlwaysOn {
    fn accel(&self, pos: &Vec2) -> Vec2 {
        let (idx, _) = self.trajectory.nearest(pos);
        (self.trajectory.waypoints()[idx].position - pos) / self.divisor
    }

    fn name(&self) -> &str {
        "always-on"
    }
}

fn mean_path_error(mut ctx: SimulationContext, frames: u32) -> (String, f64) {
    ctx.start();
    let mut total = 0.0;
    for _ in 0..frames {
        ctx.advance_frame().expect("run diverged");
        total += ctx.path_error();
    }
    (ctx.controller().name().to_string(), total / frames as f64)
}

fn main() {
    let frames = 400;
    let config = SimConfig::default();

    let deadband = SimulationContext::new(config.clone()).expect("valid scenario");
    let always_on = SimulationContext::with_controller(config, |trajectory| {
        Ok(Box::new(AlwaysOn { trajectory, divisor: 50_000.0 }) as Box<dyn Controller>)
    })
    .expect("valid scenario");

    for ctx in [deadband, always_on] {
        let (name, err) = mean_path_error(ctx, frames);
        println!("{:>18}: mean distance from path {:.1} over {} frames", name, err, frames);
    }
}
