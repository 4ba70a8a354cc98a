use std::sync::Arc;

use crate::config::SimConfig;
use crate::dynamics::AccelField;
use crate::dynamics::state::{Body, RocketState};
use crate::error::{ConfigError, SimError};
use crate::gnc::{Controller, NoControl, Trajectory, TrackingController, Waypoint};
use crate::physics::GravityModel;
use super::clock::{ElapsedTime, SimulationClock};
use super::integrator::rk4_step;

/// Run mode of the simulation as driven by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    Paused,
    /// A step went non-finite. Only `reset` leaves this state.
    Failed,
}

// ---------------------------------------------------------------------------
// Simulation context: everything a run owns
// ---------------------------------------------------------------------------

/// Owns the single mutable rocket state together with the fixed bodies, the
/// reference path, the guidance law and the run-mode bookkeeping.
///
/// The shell drives it by calling [`advance_frame`](Self::advance_frame) once
/// per rendered frame and reads the results back through the accessors.
pub struct SimulationContext {
    config: SimConfig,
    gravity: GravityModel,
    trajectory: Arc<Trajectory>,
    controller: Box<dyn Controller>,
    state: RocketState,
    clock: SimulationClock,
    run_state: RunState,
    batch_size: u32,
    failure: Option<SimError>,
}

impl SimulationContext {
    /// Build a context with the guidance law named by the configuration.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let ctrl = config.controller.clone();
        Self::with_controller(config, move |trajectory| {
            if ctrl.enabled {
                let tracking =
                    TrackingController::new(trajectory, ctrl.deadband, ctrl.correction_divisor)?;
                Ok(Box::new(tracking) as Box<dyn Controller>)
            } else {
                Ok(Box::new(NoControl) as Box<dyn Controller>)
            }
        })
    }

    /// Build a context with a caller-supplied guidance law. The closure
    /// receives the generated reference path.
    pub fn with_controller<F>(config: SimConfig, make_controller: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(Arc<Trajectory>) -> Result<Box<dyn Controller>, ConfigError>,
    {
        config.validate()?;
        let gravity = GravityModel::new(
            config.primary.to_body(),
            config.satellite.to_body(),
            config.g,
            config.softening,
        )?;
        let trajectory = Arc::new(Trajectory::generate(&config.trajectory)?);
        let controller = make_controller(Arc::clone(&trajectory))?;

        Ok(Self {
            state: config.start.to_state(),
            batch_size: config.batch.default,
            gravity,
            trajectory,
            controller,
            clock: SimulationClock::new(),
            run_state: RunState::Stopped,
            failure: None,
            config,
        })
    }

    // -----------------------------------------------------------------------
    // Control surface
    // -----------------------------------------------------------------------

    /// Begin (or resume) integration. Returns false if the run has failed.
    pub fn start(&mut self) -> bool {
        match self.run_state {
            RunState::Failed => false,
            _ => {
                self.run_state = RunState::Running;
                true
            }
        }
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
        }
    }

    /// Start/pause button: running pauses, anything else starts.
    pub fn toggle(&mut self) -> RunState {
        if self.run_state == RunState::Running {
            self.pause();
        } else {
            self.start();
        }
        self.run_state
    }

    /// Back to the starting state: rocket, clock and batch size restored.
    pub fn reset(&mut self) {
        self.state = self.config.start.to_state();
        self.clock.reset();
        self.batch_size = self.config.batch.default;
        self.run_state = RunState::Stopped;
        self.failure = None;
    }

    pub fn set_batch_size(&mut self, batch_size: u32) -> Result<(), ConfigError> {
        let (min, max) = (self.config.batch.min, self.config.batch.max);
        if batch_size < min || batch_size > max {
            return Err(ConfigError::BatchSizeOutOfRange { value: batch_size, min, max });
        }
        self.batch_size = batch_size;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Integration
    // -----------------------------------------------------------------------

    /// One logical update: `substeps` RK4 steps back to back.
    ///
    /// Runs regardless of run mode; use [`advance_frame`](Self::advance_frame)
    /// from a frame loop. A step that would leave the state non-finite is
    /// discarded and the run is marked failed.
    pub fn update(&mut self) -> Result<(), SimError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let field = AccelField::new(&self.gravity, self.controller.as_ref());
        for _ in 0..self.config.substeps {
            let next = rk4_step(&self.state, &field, self.config.dt);
            if !next.is_finite() {
                let err = SimError::Diverged { tick: self.clock.ticks() };
                self.run_state = RunState::Failed;
                self.failure = Some(err.clone());
                return Err(err);
            }
            self.state = next;
            self.clock.tick();
        }
        Ok(())
    }

    /// Run one frame's batch if the simulation is running.
    /// Returns the number of RK4 steps taken.
    pub fn advance_frame(&mut self) -> Result<u64, SimError> {
        if self.run_state != RunState::Running {
            return Ok(0);
        }
        let before = self.clock.ticks();
        for _ in 0..self.batch_size {
            self.update()?;
        }
        Ok(self.clock.ticks() - before)
    }

    // -----------------------------------------------------------------------
    // Queries for the shell
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &RocketState {
        &self.state
    }

    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.trajectory.waypoints()
    }

    pub fn bodies(&self) -> [&Body; 2] {
        self.gravity.bodies()
    }

    pub fn gravity(&self) -> &GravityModel {
        &self.gravity
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn sim_time(&self) -> f64 {
        self.clock.sim_time(self.config.dt)
    }

    pub fn elapsed(&self) -> ElapsedTime {
        self.clock.elapsed(self.config.ticks_per_month)
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    pub fn failure(&self) -> Option<&SimError> {
        self.failure.as_ref()
    }

    /// Distance from the rocket to the closest waypoint.
    pub fn path_error(&self) -> f64 {
        self.trajectory.nearest(&self.state.pos).1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::dynamics::state::Vec2;

    fn small_batches() -> SimConfig {
        let mut cfg = SimConfig::default();
        cfg.batch.default = 120;
        cfg
    }

    #[test]
    fn starts_stopped_at_default_state() {
        let ctx = SimulationContext::new(SimConfig::default()).unwrap();
        assert_eq!(ctx.run_state(), RunState::Stopped);
        assert_eq!(ctx.state().pos, Vec2::new(350.0, 150.0));
        assert_eq!(ctx.state().vel, Vec2::zeros());
        assert_eq!(ctx.clock().ticks(), 0);
        assert_eq!(ctx.batch_size(), 250);
        assert_eq!(ctx.waypoints().len(), 501);
        assert_eq!(ctx.controller().name(), "nearest-waypoint");
    }

    #[test]
    fn stopped_frame_does_nothing() {
        let mut ctx = SimulationContext::new(SimConfig::default()).unwrap();
        assert_eq!(ctx.advance_frame().unwrap(), 0);
        assert_eq!(ctx.state().pos, Vec2::new(350.0, 150.0));
    }

    #[test]
    fn frame_runs_two_substeps_per_update() {
        let mut ctx = SimulationContext::new(small_batches()).unwrap();
        ctx.start();
        assert_eq!(ctx.advance_frame().unwrap(), 240);
        assert_eq!(ctx.clock().ticks(), 240);
        assert!((ctx.sim_time() - 2.4).abs() < 1e-9);
        assert_ne!(ctx.state().pos, Vec2::new(350.0, 150.0));
        let v = ctx.state().vel;
        assert!((ctx.heading() - v.y.atan2(v.x)).abs() < 1e-15);
    }

    #[test]
    fn pause_retains_state() {
        let mut ctx = SimulationContext::new(small_batches()).unwrap();
        ctx.start();
        ctx.advance_frame().unwrap();
        assert_eq!(ctx.toggle(), RunState::Paused);
        let frozen = *ctx.state();
        let ticks = ctx.clock().ticks();
        assert_eq!(ctx.advance_frame().unwrap(), 0);
        assert_eq!(*ctx.state(), frozen);
        assert_eq!(ctx.clock().ticks(), ticks);
        assert_eq!(ctx.toggle(), RunState::Running);
        ctx.advance_frame().unwrap();
        assert!(ctx.clock().ticks() > ticks);
    }

    #[test]
    fn reset_restores_start_regardless_of_progress() {
        let mut ctx = SimulationContext::new(small_batches()).unwrap();
        let start = *ctx.state();
        ctx.start();
        ctx.set_batch_size(900).unwrap();
        for _ in 0..5 {
            ctx.advance_frame().unwrap();
        }
        assert!(ctx.clock().ticks() > 0);
        ctx.reset();
        assert_eq!(ctx.run_state(), RunState::Stopped);
        assert_eq!(*ctx.state(), start);
        assert_eq!(ctx.clock().ticks(), 0);
        assert_eq!(ctx.batch_size(), 120);
        assert_eq!(ctx.elapsed().to_string(), "Month: 1");
    }

    #[test]
    fn batch_size_is_bounded() {
        let mut ctx = SimulationContext::new(SimConfig::default()).unwrap();
        assert!(ctx.set_batch_size(1000).is_ok());
        assert!(matches!(
            ctx.set_batch_size(1001),
            Err(ConfigError::BatchSizeOutOfRange { value: 1001, min: 100, max: 1000 })
        ));
        assert!(ctx.set_batch_size(99).is_err());
        assert_eq!(ctx.batch_size(), 1000);
    }

    #[test]
    fn identical_runs_are_deterministic() {
        let run = || {
            let mut ctx = SimulationContext::new(small_batches()).unwrap();
            ctx.start();
            for _ in 0..3 {
                ctx.advance_frame().unwrap();
            }
            *ctx.state()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn divergence_fails_the_run() {
        let mut cfg = SimConfig::default();
        cfg.dt = f64::MAX;
        cfg.start.velocity = [10.0, 0.0];
        let mut ctx = SimulationContext::new(cfg).unwrap();
        let start = *ctx.state();
        ctx.start();
        let err = ctx.advance_frame().unwrap_err();
        assert_eq!(err, SimError::Diverged { tick: 0 });
        assert_eq!(ctx.run_state(), RunState::Failed);
        assert_eq!(*ctx.state(), start, "Last finite state is kept");
        assert!(!ctx.start());
        assert_eq!(ctx.advance_frame().unwrap(), 0);

        ctx.reset();
        assert_eq!(ctx.run_state(), RunState::Stopped);
        assert!(ctx.failure().is_none());
    }

    #[test]
    fn rejects_misconfiguration() {
        let mut cfg = SimConfig::default();
        cfg.softening = 0.0;
        assert!(matches!(
            SimulationContext::new(cfg),
            Err(ConfigError::NonPositiveSoftening(_))
        ));

        let mut cfg = SimConfig::default();
        cfg.dt = 0.0;
        assert!(matches!(
            SimulationContext::new(cfg),
            Err(ConfigError::NonPositiveTimestep(_))
        ));

        let mut cfg = SimConfig::default();
        cfg.trajectory.points = 0;
        assert!(matches!(SimulationContext::new(cfg), Err(ConfigError::EmptyTrajectory)));
    }

    #[test]
    fn disabled_controller_coasts() {
        let mut cfg = small_batches();
        cfg.controller.enabled = false;
        let ctx = SimulationContext::new(cfg).unwrap();
        assert_eq!(ctx.controller().name(), "none");
    }

    #[test]
    fn guidance_keeps_rocket_near_path() {
        let mut ctx = SimulationContext::new(SimConfig::default()).unwrap();
        ctx.start();
        for _ in 0..100 {
            ctx.advance_frame().unwrap();
        }
        assert!(ctx.state().is_finite());
        assert!(ctx.path_error() < 2000.0, "Drifted {} from path", ctx.path_error());
    }

    struct CountingController {
        calls: Rc<Cell<u32>>,
    }

    impl Controller for CountingController {
        fn accel(&self, _pos: &Vec2) -> Vec2 {
            self.calls.set(self.calls.get() + 1);
            Vec2::zeros()
        }
    }

    #[test]
    fn update_queries_controller_four_times_per_substep() {
        let calls = Rc::new(Cell::new(0));
        let shared = Rc::clone(&calls);
        let mut ctx = SimulationContext::with_controller(SimConfig::default(), move |_| {
            Ok(Box::new(CountingController { calls: shared }) as Box<dyn Controller>)
        })
        .unwrap();

        ctx.update().unwrap();
        assert_eq!(calls.get(), 8);
        assert_eq!(ctx.clock().ticks(), 2);
    }

    #[test]
    fn exposes_built_gravity_and_path() {
        let ctx = SimulationContext::new(SimConfig::default()).unwrap();
        assert_eq!(ctx.gravity().g, 5.0);
        assert_eq!(ctx.gravity().softening, 5.0);
        assert_eq!(ctx.trajectory().len(), ctx.waypoints().len());
        assert_eq!(ctx.trajectory().waypoints()[0].position, Vec2::new(380.0, 0.0));
    }
}
