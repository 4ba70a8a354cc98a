use crate::dynamics::state::{distance, Body, Vec2};
use crate::error::ConfigError;

/// Softened inverse-square acceleration from a single fixed body.
///
/// `a = -G m (r - r_body) / (softening + |r - r_body|)^3`. The softening term is
/// added to the raw distance before cubing, so the field stays finite (and is
/// exactly zero) at the body's own position.
pub fn softened_accel(body: &Body, pos: &Vec2, g: f64, softening: f64) -> Vec2 {
    let r = distance(pos, &body.position);
    let coeff = -g * body.mass / (softening + r).powi(3);
    (pos - body.position) * coeff
}

// ---------------------------------------------------------------------------
// Two-attractor gravity field
// ---------------------------------------------------------------------------

/// Static primary + satellite pair acting on a massless test particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    pub primary: Body,
    pub satellite: Body,
    pub g: f64,
    pub softening: f64,
}

impl GravityModel {
    pub fn new(primary: Body, satellite: Body, g: f64, softening: f64) -> Result<Self, ConfigError> {
        if !(softening > 0.0 && softening.is_finite()) {
            return Err(ConfigError::NonPositiveSoftening(softening));
        }
        if !(g > 0.0 && g.is_finite()) {
            return Err(ConfigError::Invalid {
                name: "gravitational constant",
                requirement: "positive and finite",
                value: g,
            });
        }
        for body in [&primary, &satellite] {
            if !(body.mass >= 0.0 && body.mass.is_finite()) {
                return Err(ConfigError::Invalid {
                    name: "body mass",
                    requirement: "non-negative and finite",
                    value: body.mass,
                });
            }
            if !body.position.iter().all(|v| v.is_finite()) {
                return Err(ConfigError::Invalid {
                    name: "body position",
                    requirement: "finite",
                    value: body.position.x + body.position.y,
                });
            }
        }
        Ok(Self { primary, satellite, g, softening })
    }

    pub fn bodies(&self) -> [&Body; 2] {
        [&self.primary, &self.satellite]
    }

    /// Net gravitational acceleration at `pos`.
    pub fn accel(&self, pos: &Vec2) -> Vec2 {
        softened_accel(&self.primary, pos, self.g, self.softening)
            + softened_accel(&self.satellite, pos, self.g, self.softening)
    }

    /// Upper bound on the acceleration magnitude a single body can produce.
    pub fn accel_bound(&self, body: &Body) -> f64 {
        self.g * body.mass / (self.softening * self.softening)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn equal_pair() -> GravityModel {
        GravityModel::new(
            Body::new(Vec2::new(-500.0, 0.0), 80.0),
            Body::new(Vec2::new(500.0, 0.0), 80.0),
            5.0,
            5.0,
        )
        .unwrap()
    }

    #[test]
    fn midpoint_of_equal_masses_is_balanced() {
        let a = equal_pair().accel(&Vec2::zeros());
        assert_abs_diff_eq!(a.x, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(a.y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn off_axis_midpoint_pulls_back_to_axis() {
        let a = equal_pair().accel(&Vec2::new(0.0, 120.0));
        assert_abs_diff_eq!(a.x, 0.0, epsilon = 1e-15);
        assert!(a.y < 0.0);
    }

    #[test]
    fn attraction_points_at_body() {
        let body = Body::new(Vec2::new(10.0, 0.0), 100.0);
        let a = softened_accel(&body, &Vec2::new(110.0, 0.0), 5.0, 5.0);
        assert!(a.x < 0.0);
        let expected = 5.0 * 100.0 * 100.0 / 105.0_f64.powi(3);
        assert_abs_diff_eq!(a.norm(), expected, epsilon = 1e-12);
    }

    #[test]
    fn softening_bounds_accel_near_contact() {
        let model = GravityModel::new(
            Body::new(Vec2::new(3.0, -2.0), 50.0),
            Body::new(Vec2::new(900.0, 0.0), 0.0),
            5.0,
            5.0,
        )
        .unwrap();
        let bound = model.accel_bound(&model.primary);
        for offset in [10.0, 2.5, 1.0, 1e-3, 1e-9, 0.0] {
            let pos = model.primary.position + Vec2::new(offset, offset * 0.5);
            let a = model.accel(&pos);
            assert!(a.norm().is_finite());
            assert!(a.norm() <= bound, "|a|={} exceeds bound {} at offset {}", a.norm(), bound, offset);
        }
        assert_eq!(model.accel(&model.primary.position), Vec2::zeros());
    }

    #[test]
    fn rejects_bad_constants() {
        let b = Body::new(Vec2::zeros(), 1.0);
        assert!(matches!(
            GravityModel::new(b, b, 1.0, 0.0),
            Err(ConfigError::NonPositiveSoftening(_))
        ));
        assert!(matches!(
            GravityModel::new(b, b, 1.0, -3.0),
            Err(ConfigError::NonPositiveSoftening(_))
        ));
        assert!(GravityModel::new(b, b, 0.0, 5.0).is_err());
        assert!(GravityModel::new(b, Body::new(Vec2::zeros(), -1.0), 1.0, 5.0).is_err());
    }
}
