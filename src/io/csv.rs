use std::io::{self, Write};

use crate::dynamics::state::RocketState;
use crate::gnc::Waypoint;

/// Rocket state sampled once per frame by a headless run.
#[derive(Debug, Clone, Copy)]
pub struct TrackSample {
    pub tick: u64,
    pub time: f64,
    pub state: RocketState,
    pub path_error: f64, // distance to nearest waypoint
}

/// Write the reference path.
///
/// Columns: index, x, y
pub fn write_waypoints<W: Write>(writer: &mut W, waypoints: &[Waypoint]) -> io::Result<()> {
    writeln!(writer, "index,x,y")?;
    for (i, wp) in waypoints.iter().enumerate() {
        writeln!(writer, "{},{:.6},{:.6}", i, wp.position.x, wp.position.y)?;
    }
    Ok(())
}

/// Write sampled rocket states.
///
/// Columns: tick, time, x, y, vx, vy, heading_deg, path_error
pub fn write_track<W: Write>(writer: &mut W, track: &[TrackSample]) -> io::Result<()> {
    writeln!(writer, "tick,time,x,y,vx,vy,heading_deg,path_error")?;
    for s in track {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.4},{:.6},{:.6},{:.2},{:.4}",
            s.tick,
            s.time,
            s.state.pos.x, s.state.pos.y,
            s.state.vel.x, s.state.vel.y,
            s.state.heading.to_degrees(),
            s.path_error,
        )?;
    }
    Ok(())
}

pub fn write_waypoints_file(path: &str, waypoints: &[Waypoint]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_waypoints(&mut file, waypoints)
}

pub fn write_track_file(path: &str, track: &[TrackSample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_track(&mut file, track)
}
