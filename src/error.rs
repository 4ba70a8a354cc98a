use thiserror::Error;

/// Rejected scenario configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("softening must be positive and finite, got {0}")]
    NonPositiveSoftening(f64),

    #[error("timestep must be positive and finite, got {0}")]
    NonPositiveTimestep(f64),

    #[error("reference trajectory has no waypoints")]
    EmptyTrajectory,

    #[error("{name} must be {requirement}, got {value}")]
    Invalid {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("batch size {value} is outside the allowed range [{min}, {max}]")]
    BatchSizeOutOfRange { value: u32, min: u32, max: u32 },

    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Invariant violation raised while integrating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("rocket state became non-finite at tick {tick}")]
    Diverged { tick: u64 },
}
