pub mod controller;
pub mod trajectory;

pub use controller::{validate_gains, Controller, NoControl, TrackingCommand, TrackingController};
pub use trajectory::{Trajectory, TrajectoryShape, Waypoint};
