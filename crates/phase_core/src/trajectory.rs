//! Eager fixed-step integration of a single trajectory.

use crate::coordinates::{is_finite_point, whole_steps, Point2, MAX_STEPS};
use crate::error::{PhaseError, Result};
use crate::models::PlanarSystem;
use crate::solvers::ExplicitEuler;
use crate::traits::{SecondOrderOde, Steppable};
use serde::Serialize;

/// Phase-plane states visited from one initial condition, `dt` apart.
///
/// Index 0 is the start point. Points are carried as computed: a run that
/// blows up keeps its non-finite coordinates, see [`Trajectory::first_non_finite`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    points: Vec<Point2>,
    dt: f64,
}

impl Trajectory {
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for an integrated trajectory; it holds at least its start.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied()
    }

    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulated time covered by the last point.
    pub fn duration(&self) -> f64 {
        (self.points.len() - 1) as f64 * self.dt
    }

    /// Index of the first point with a NaN or infinite coordinate.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.points.iter().position(|p| !is_finite_point(p))
    }
}

/// Forward Euler integrator for `x″ = f(x, x′)` in the phase plane.
pub struct TrajectoryIntegrator<O> {
    system: PlanarSystem<O>,
}

impl<O: SecondOrderOde<f64>> TrajectoryIntegrator<O> {
    pub fn new(ode: O) -> Self {
        Self {
            system: PlanarSystem::new(ode),
        }
    }

    pub fn ode(&self) -> &O {
        self.system.ode()
    }

    /// Integrates from `start` until `horizon` simulated seconds have elapsed.
    ///
    /// Produces `floor(horizon / dt) + 1` points, each computed as
    /// `next = prev + (prev.y, f(prev.x, prev.y)) * dt`. The result depends
    /// only on the arguments and the ODE. Runs longer than [`MAX_STEPS`] are
    /// rejected up front.
    pub fn integrate(&self, start: Point2, dt: f64, horizon: f64) -> Result<Trajectory> {
        let invalid = PhaseError::InvalidIntegrationParameters { dt, horizon };
        if !dt.is_finite() || !horizon.is_finite() || dt <= 0.0 || horizon <= 0.0 {
            return Err(invalid);
        }
        let steps = whole_steps(horizon, dt).ok_or(invalid)?;
        let mut points = Vec::with_capacity(steps + 1);
        points.push(start);

        let mut stepper = ExplicitEuler::<f64>::new(2);
        let mut state = [start.x, start.y];
        let mut t = 0.0;
        for _ in 0..steps {
            stepper.step(&self.system, &mut t, &mut state, dt);
            points.push(Point2::new(state[0], state[1]));
        }

        let trajectory = Trajectory { points, dt };
        log::debug!(
            "integrated {} points from {:?} with dt={} over {}",
            trajectory.len(),
            start,
            dt,
            horizon
        );
        if let Some(index) = trajectory.first_non_finite() {
            log::warn!(
                "trajectory from {:?} left finite range at step {} (t={})",
                start,
                index,
                index as f64 * dt
            );
        }

        Ok(trajectory)
    }
}
