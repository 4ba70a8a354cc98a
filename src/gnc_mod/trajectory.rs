use std::f64::consts::TAU;

use serde::Deserialize;

use crate::dynamics::state::{distance, Vec2};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Reference path: lopsided figure-eight
// ---------------------------------------------------------------------------

/// Shape constants of the reference figure-eight.
///
/// The base curve is `(sin t, sin t cos t)`. Points with `sin t > 0` (the
/// right-hand loop) are additionally shrunk by `right_loop_scale`, so the
/// right loop hugs the satellite while the left loop sweeps wide around the
/// primary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrajectoryShape {
    pub horizontal_scale: f64,
    pub vertical_scale: f64,
    pub right_loop_scale: f64,
    pub x_offset: f64,
    /// Number of parameter intervals over `[0, 2pi]`; yields `points + 1` waypoints.
    pub points: usize,
}

impl Default for TrajectoryShape {
    fn default() -> Self {
        Self {
            horizontal_scale: 2200.0,
            vertical_scale: 650.0,
            right_loop_scale: 0.6,
            x_offset: 380.0,
            points: 500,
        }
    }
}

impl TrajectoryShape {
    /// Curve point at parameter `t`.
    pub fn point_at(&self, t: f64) -> Vec2 {
        let base_x = t.sin();
        let base_y = t.sin() * t.cos();
        let scale = if base_x > 0.0 { self.right_loop_scale } else { 1.0 };
        Vec2::new(
            self.x_offset + self.horizontal_scale * base_x * scale,
            self.vertical_scale * base_y * scale,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.points == 0 {
            return Err(ConfigError::EmptyTrajectory);
        }
        for (name, value) in [
            ("horizontal_scale", self.horizontal_scale),
            ("vertical_scale", self.vertical_scale),
            ("right_loop_scale", self.right_loop_scale),
            ("x_offset", self.x_offset),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { name, requirement: "finite", value });
            }
        }
        Ok(())
    }

    /// Parameter value of waypoint `i`.
    pub fn parameter(&self, i: usize) -> f64 {
        TAU * i as f64 / self.points as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec2,
}

/// Closed, ordered, never-empty waypoint sequence. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    /// Sample the figure-eight at `points + 1` uniform parameter steps.
    pub fn generate(shape: &TrajectoryShape) -> Result<Self, ConfigError> {
        shape.validate()?;
        let waypoints = (0..=shape.points)
            .map(|i| Waypoint { position: shape.point_at(shape.parameter(i)) })
            .collect();
        Ok(Self { waypoints })
    }

    /// Build from an explicit list of positions.
    pub fn from_points(points: Vec<Vec2>) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::EmptyTrajectory);
        }
        if let Some(p) = points.iter().find(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(ConfigError::Invalid {
                name: "waypoint",
                requirement: "finite",
                value: p.x + p.y,
            });
        }
        Ok(Self {
            waypoints: points.into_iter().map(|position| Waypoint { position }).collect(),
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the waypoint closest to `pos` and the distance to it.
    ///
    /// Linear scan with strict comparison: on exact ties the lowest index wins.
    pub fn nearest(&self, pos: &Vec2) -> (usize, f64) {
        let mut best = (0, distance(pos, &self.waypoints[0].position));
        for (i, wp) in self.waypoints.iter().enumerate().skip(1) {
            let d = distance(pos, &wp.position);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }
}
