use thiserror::Error;

/// Validation failures raised while building the portrait components.
///
/// Every variant is a precondition violation on caller-supplied input; nothing
/// here is retried or coerced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhaseError {
    #[error("invalid {axis} axis: {reason}")]
    InvalidAxisSpec { axis: char, reason: String },

    #[error("surface extent must be positive and finite, got {width} x {height}")]
    InvalidSurfaceExtent { width: f64, height: f64 },

    #[error("sampling gap must be positive, finite and coarse enough for a bounded lattice, got {0}")]
    InvalidSamplingGap(f64),

    #[error("integration requires positive finite dt and horizon within the step limit, got dt={dt}, horizon={horizon}")]
    InvalidIntegrationParameters { dt: f64, horizon: f64 },

    #[error("time step policy yields no usable dt: {0}")]
    InvalidTimeStep(String),

    #[error("invalid model parameter {name}: {value}")]
    InvalidModelParameter { name: &'static str, value: f64 },

    #[error("invalid field style: {0}")]
    InvalidFieldStyle(String),
}

pub type Result<T> = std::result::Result<T, PhaseError>;
