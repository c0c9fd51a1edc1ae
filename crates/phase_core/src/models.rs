//! Second-order models and their reduction to a planar first-order system.

use crate::coordinates::Point2;
use crate::error::{PhaseError, Result};
use crate::traits::{DynamicalSystem, Scalar, SecondOrderOde};
use serde::{Deserialize, Serialize};

/// Wraps `x″ = f(x, x′)` as the planar system `(x, v)′ = (v, f(x, v))`.
pub struct PlanarSystem<O> {
    ode: O,
}

impl<O> PlanarSystem<O> {
    pub fn new(ode: O) -> Self {
        Self { ode }
    }

    pub fn ode(&self) -> &O {
        &self.ode
    }
}

impl<T: Scalar, O: SecondOrderOde<T>> DynamicalSystem<T> for PlanarSystem<O> {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = x[1];
        out[1] = self.ode.acceleration(x[0], x[1]);
    }
}

/// Phase-plane velocity `(θ′, θ″)` at `point = (θ, θ′)`.
pub fn planar_velocity<O: SecondOrderOde<f64> + ?Sized>(ode: &O, point: Point2) -> Point2 {
    Point2::new(point.y, ode.acceleration(point.x, point.y))
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PhaseError::InvalidModelParameter { name, value })
    }
}

/// `θ″ = -(g / L) sin θ - μ θ′`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampedPendulum {
    pub g: f64,
    pub length: f64,
    pub damping: f64,
}

impl Default for DampedPendulum {
    fn default() -> Self {
        Self {
            g: 9.81,
            length: 5.5,
            damping: 0.75,
        }
    }
}

impl SecondOrderOde<f64> for DampedPendulum {
    fn acceleration(&self, theta: f64, omega: f64) -> f64 {
        (-self.g / self.length) * theta.sin() - self.damping * omega
    }
}

/// `x″ = μ (1 - x²) x′ - x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanDerPol {
    pub mu: f64,
}

impl Default for VanDerPol {
    fn default() -> Self {
        Self { mu: 1.0 }
    }
}

impl SecondOrderOde<f64> for VanDerPol {
    fn acceleration(&self, x: f64, v: f64) -> f64 {
        self.mu * (1.0 - x * x) * v - x
    }
}

/// Vertical fall with linear drag: `s″ = -g - μ v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingBody {
    pub g: f64,
    pub drag: f64,
}

impl Default for FallingBody {
    fn default() -> Self {
        Self { g: 9.81, drag: 1.0 }
    }
}

impl SecondOrderOde<f64> for FallingBody {
    fn acceleration(&self, _s: f64, v: f64) -> f64 {
        -self.g - self.drag * v
    }
}

/// The models selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum OdeModel {
    DampedPendulum(DampedPendulum),
    VanDerPol(VanDerPol),
    FallingBody(FallingBody),
}

impl Default for OdeModel {
    fn default() -> Self {
        OdeModel::DampedPendulum(DampedPendulum::default())
    }
}

impl OdeModel {
    pub fn validate(&self) -> Result<()> {
        match self {
            OdeModel::DampedPendulum(p) => {
                require_finite("g", p.g)?;
                require_finite("damping", p.damping)?;
                if !p.length.is_finite() || p.length <= 0.0 {
                    return Err(PhaseError::InvalidModelParameter {
                        name: "length",
                        value: p.length,
                    });
                }
                Ok(())
            }
            OdeModel::VanDerPol(v) => require_finite("mu", v.mu),
            OdeModel::FallingBody(f) => {
                require_finite("g", f.g)?;
                require_finite("drag", f.drag)
            }
        }
    }

    /// Pendulum length, when the model describes a pendulum.
    pub fn pendulum_length(&self) -> Option<f64> {
        match self {
            OdeModel::DampedPendulum(p) => Some(p.length),
            _ => None,
        }
    }
}

impl SecondOrderOde<f64> for OdeModel {
    fn acceleration(&self, x: f64, v: f64) -> f64 {
        match self {
            OdeModel::DampedPendulum(m) => m.acceleration(x, v),
            OdeModel::VanDerPol(m) => m.acceleration(x, v),
            OdeModel::FallingBody(m) => m.acceleration(x, v),
        }
    }
}
