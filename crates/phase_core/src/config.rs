use crate::coordinates::{AxisSpec, GridStyle};
use crate::error::{PhaseError, Result};
use crate::field::FieldStyle;
use crate::models::OdeModel;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How the integration step is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TimeStep {
    /// One simulated frame per rendered frame: `dt = 1 / target_fps`.
    FrameRate { target_fps: f64 },
    /// A constant step, independent of the animation rate.
    Fixed { dt: f64 },
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::FrameRate { target_fps: 60.0 }
    }
}

impl TimeStep {
    pub fn dt(&self) -> Result<f64> {
        match *self {
            TimeStep::FrameRate { target_fps } => {
                if !target_fps.is_finite() || target_fps <= 0.0 {
                    return Err(PhaseError::InvalidTimeStep(format!(
                        "target frame rate must be positive, got {target_fps}"
                    )));
                }
                Ok(1.0 / target_fps)
            }
            TimeStep::Fixed { dt } => {
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(PhaseError::InvalidTimeStep(format!(
                        "fixed dt must be positive, got {dt}"
                    )));
                }
                Ok(dt)
            }
        }
    }
}

/// Everything a portrait session is built from. Passed by value into the
/// constructors; nothing reads configuration from shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub grid: GridStyle,
    pub field: FieldStyle,
    pub model: OdeModel,
    pub time_step: TimeStep,
    /// Simulated seconds covered by one trajectory.
    pub horizon: f64,
    /// Surface units per unit of pendulum length in the pendulum view.
    pub bob_scale: f64,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            x_axis: AxisSpec::new(-3.0 * PI, 3.0 * PI, PI / 2.0),
            y_axis: AxisSpec::new(-4.0, 4.0, 1.0),
            grid: GridStyle::default(),
            field: FieldStyle::default(),
            model: OdeModel::default(),
            time_step: TimeStep::default(),
            horizon: 100.0,
            bob_scale: 75.0,
        }
    }
}
