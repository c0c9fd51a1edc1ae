//! The `phase_core` crate is the numeric engine behind the phase-space
//! portrait. It has no rendering or input handling of its own.
//!
//! Key components:
//! - **Coordinates**: `CoordinateSpace` maps math points to surface points and back,
//!   and lays out grid lines and tick labels.
//! - **Field**: `VectorField` samples a second-order ODE, reduced to the phase plane,
//!   on a regular lattice with a magnitude color ramp.
//! - **Trajectory**: `TrajectoryIntegrator` runs fixed-step explicit Euler eagerly.
//! - **Playback**: `PlaybackController` reveals a trajectory one point per frame.
//! - **Portrait**: `PhasePortrait` wires the above to pointer and confirm input.
pub mod config;
pub mod coordinates;
pub mod error;
pub mod field;
pub mod models;
pub mod playback;
pub mod portrait;
pub mod solvers;
pub mod traits;
pub mod trajectory;

pub use config::{PortraitConfig, TimeStep};
pub use coordinates::{AxisSpec, CoordinateSpace, Point2};
pub use error::PhaseError;
pub use portrait::PhasePortrait;
