use anyhow::{Context, Result};
use clap::Parser;

use figure8_sim::io::{self, TrackSample};
use figure8_sim::types::SimConfig;
use figure8_sim::SimulationContext;

/// Headless figure-eight guidance run.
#[derive(Parser, Debug)]
struct Args {
    /// Scenario YAML; built-in Earth/Moon scenario when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Frames to simulate (3080 frames = one displayed year at the default batch)
    #[arg(short, long, default_value_t = 3080)]
    frames: u32,

    /// Updates per frame, overriding the scenario default
    #[arg(short, long)]
    batch: Option<u32>,

    /// Write the per-frame rocket track to this CSV file
    #[arg(long)]
    track_csv: Option<String>,

    /// Write the reference waypoints to this CSV file
    #[arg(long)]
    waypoints_csv: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_yaml_file(path)
            .with_context(|| format!("loading scenario {}", path))?,
        None => SimConfig::default(),
    };

    let mut ctx = SimulationContext::new(config).context("building simulation")?;
    if let Some(batch) = args.batch {
        ctx.set_batch_size(batch)?;
    }

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let mut track = Vec::with_capacity(args.frames as usize + 1);
    let sample = |ctx: &SimulationContext| TrackSample {
        tick: ctx.clock().ticks(),
        time: ctx.sim_time(),
        state: *ctx.state(),
        path_error: ctx.path_error(),
    };
    track.push(sample(&ctx));

    ctx.start();
    let mut failure = None;
    for _ in 0..args.frames {
        if let Err(e) = ctx.advance_frame() {
            failure = Some(e);
            break;
        }
        track.push(sample(&ctx));
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    let cfg = ctx.config();
    let [primary, satellite] = ctx.bodies();
    let final_state = ctx.state();

    let deadband = cfg.controller.deadband;
    let max_err = track.iter().map(|s| s.path_error).fold(0.0_f64, f64::max);
    let mean_err = track.iter().map(|s| s.path_error).sum::<f64>() / track.len() as f64;
    let inside = track.iter().filter(|s| s.path_error <= deadband).count();

    println!();
    println!("====================================================================");
    println!("  FIGURE-EIGHT GUIDANCE RUN — controller: {}", ctx.controller().name());
    println!("====================================================================");
    println!();
    println!("  Scenario");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Primary:    ({:>8.1}, {:>8.1})  m={:>7.1}",
        primary.position.x, primary.position.y, primary.mass
    );
    println!(
        "  Satellite:  ({:>8.1}, {:>8.1})  m={:>7.1}",
        satellite.position.x, satellite.position.y, satellite.mass
    );
    println!(
        "  G:          {:>8.3}     Softening:  {:>8.3}     dt: {}",
        ctx.gravity().g,
        ctx.gravity().softening,
        cfg.dt
    );
    println!(
        "  Deadband:   {:>8.1}     Divisor:    {:>8.0}     Waypoints: {}",
        deadband,
        cfg.controller.correction_divisor,
        ctx.trajectory().len()
    );
    println!(
        "  Batch:      {:>8} updates x {} substeps per frame",
        ctx.batch_size(),
        cfg.substeps
    );
    println!();

    println!("  Result");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Elapsed:    {}   ({} steps, t={:.1})",
        ctx.elapsed(),
        ctx.clock().ticks(),
        ctx.sim_time()
    );
    println!(
        "  Position:   ({:>8.1}, {:>8.1})   speed {:.3}   heading {:.1} deg",
        final_state.pos.x,
        final_state.pos.y,
        final_state.speed(),
        final_state.heading.to_degrees()
    );
    println!(
        "  Path error: max {:.1}   mean {:.1}   inside deadband {:.1}% of frames",
        max_err,
        mean_err,
        100.0 * inside as f64 / track.len() as f64
    );
    println!();

    if let Some(path) = &args.track_csv {
        io::write_track_file(path, &track).with_context(|| format!("writing {}", path))?;
        println!("  Exported track: {}", path);
    }
    if let Some(path) = &args.waypoints_csv {
        io::write_waypoints_file(path, ctx.waypoints())
            .with_context(|| format!("writing {}", path))?;
        println!("  Exported waypoints: {}", path);
    }
    println!("====================================================================");

    if let Some(e) = failure {
        return Err(e).context("simulation aborted");
    }
    Ok(())
}
