use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Forward Euler stepper.
///
/// `y_next = y + dt * f(t, y)`. First order: local error O(dt²), global error
/// O(dt). The derivative buffer is kept between steps so stepping does not
/// allocate.
pub struct ExplicitEuler<T: Scalar> {
    k: Vec<T>,
}

impl<T: Scalar> ExplicitEuler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for ExplicitEuler<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        system.apply(*t, state, &mut self.k);

        for i in 0..state.len() {
            state[i] = state[i] + self.k[i] * dt;
        }

        *t = *t + dt;
    }
}
