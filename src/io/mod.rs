pub mod csv;

pub use csv::{write_track, write_track_file, write_waypoints, write_waypoints_file, TrackSample};
