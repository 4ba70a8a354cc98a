use nalgebra::Vector2;

/// Point or displacement in simulation space.
pub type Vec2 = Vector2<f64>;

/// Euclidean distance between two points.
pub fn distance(a: &Vec2, b: &Vec2) -> f64 {
    (b - a).norm()
}

// ---------------------------------------------------------------------------
// Fixed attractors
// ---------------------------------------------------------------------------

/// A static gravitating body. Never moves, feels no back-reaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub mass: f64,
}

impl Body {
    pub fn new(position: Vec2, mass: f64) -> Self {
        Self { position, mass }
    }
}

// ---------------------------------------------------------------------------
// Rocket state: position, velocity, heading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocketState {
    pub pos: Vec2,     // simulation units
    pub vel: Vec2,     // units per time unit
    pub heading: f64,  // rad, derived from vel
}

impl RocketState {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel, heading: heading_of(&vel) }
    }

    /// Advance by a derivative scaled by dt (RK4 stage point).
    /// Heading is carried over; it is only refreshed on a completed step.
    pub fn apply(&self, d: &Deriv, dt: f64) -> RocketState {
        RocketState {
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            heading: self.heading,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().all(|v| v.is_finite())
            && self.vel.iter().all(|v| v.is_finite())
            && self.heading.is_finite()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// Direction of travel, `atan2(vy, vx)`.
pub fn heading_of(vel: &Vec2) -> f64 {
    vel.y.atan2(vel.x)
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Deriv {
    pub dpos: Vec2, // velocity
    pub dvel: Vec2, // acceleration
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(&Vec2::new(1.0, 2.0), &Vec2::new(4.0, 6.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn heading_follows_velocity() {
        let s = RocketState::new(Vec2::zeros(), Vec2::new(0.0, 3.0));
        assert!((s.heading - FRAC_PI_2).abs() < 1e-12);
        let at_rest = RocketState::new(Vec2::zeros(), Vec2::zeros());
        assert_eq!(at_rest.heading, 0.0);
    }

    #[test]
    fn apply_keeps_heading() {
        let s = RocketState::new(Vec2::zeros(), Vec2::new(1.0, 0.0));
        let d = Deriv { dpos: Vec2::new(1.0, 0.0), dvel: Vec2::new(0.0, 10.0) };
        let next = s.apply(&d, 0.5);
        assert_eq!(next.pos, Vec2::new(0.5, 0.0));
        assert_eq!(next.vel, Vec2::new(1.0, 5.0));
        assert_eq!(next.heading, s.heading);
    }

    #[test]
    fn non_finite_detected() {
        let s = RocketState::new(Vec2::new(f64::NAN, 0.0), Vec2::zeros());
        assert!(!s.is_finite());
        assert!(RocketState::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)).is_finite());
    }
}
