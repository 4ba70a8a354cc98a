pub mod gravity;

pub use gravity::{softened_accel, GravityModel};
