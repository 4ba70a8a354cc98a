use crate::dynamics::{self, AccelField};
use crate::dynamics::state::{heading_of, RocketState};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta integrator
// ---------------------------------------------------------------------------

/// Single RK4 step: advance state by dt.
///
/// The field (gravity and guidance) is re-evaluated at all four stage points,
/// so the controller can switch on or off within one step. Heading is
/// refreshed from the new velocity.
pub fn rk4_step(state: &RocketState, field: &AccelField, dt: f64) -> RocketState {
    let k1 = dynamics::derivatives(state, field);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), field);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), field);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), field);

    let vel = state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0);
    RocketState {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel,
        heading: heading_of(&vel),
    }
}
