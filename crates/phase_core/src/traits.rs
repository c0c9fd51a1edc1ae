//! Numeric seams shared by the models, the stepper and the integrator.

use num_traits::Float;
use std::fmt::Debug;

/// Floating-point type a phase-plane state is made of.
pub trait Scalar: Float + Debug + 'static {}

impl<T: Float + Debug + 'static> Scalar for T {}

/// A first-order system `dx/dt = F(t, x)` over a flat state slice.
///
/// The phase plane is the two-dimensional case, with `x = [θ, θ′]`.
pub trait DynamicalSystem<T: Scalar> {
    /// Length of the state slice `apply` expects.
    fn dimension(&self) -> usize;

    /// Writes `dx/dt` at `(t, x)` into `out`, which is `dimension()` long.
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// Advances a state in place by one fixed step.
pub trait Steppable<T: Scalar> {
    /// Moves `state` from `t` to `t + dt` and updates `t` to match.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}

/// The right-hand side of an autonomous second-order ODE `x″ = f(x, x′)`.
///
/// Any `Fn(T, T) -> T` closure qualifies, so callers can hand in an ad-hoc
/// equation without defining a type for it.
pub trait SecondOrderOde<T: Scalar> {
    /// Returns `x″` for the position `x` and velocity `v`.
    fn acceleration(&self, x: T, v: T) -> T;
}

impl<T, F> SecondOrderOde<T> for F
where
    T: Scalar,
    F: Fn(T, T) -> T,
{
    fn acceleration(&self, x: T, v: T) -> T {
        self(x, v)
    }
}
