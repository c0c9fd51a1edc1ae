//! Frame-by-frame reveal of an eagerly integrated trajectory.

use crate::coordinates::{whole_steps, Point2};
use crate::error::{PhaseError, Result};
use crate::traits::SecondOrderOde;
use crate::trajectory::{Trajectory, TrajectoryIntegrator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing chosen, nothing to reveal.
    Idle,
    /// A start point is chosen; integration waits for `start`.
    Armed,
    /// The cursor advances one point per frame.
    Revealing,
    /// The cursor sits on the last point.
    Done,
}

/// Owns the active trajectory and the reveal cursor.
///
/// Picking a new start point drops the previous trajectory and cursor
/// together, so nothing from an earlier run can leak into the next one.
pub struct PlaybackController<O> {
    integrator: TrajectoryIntegrator<O>,
    dt: f64,
    horizon: f64,
    state: PlaybackState,
    pending: Option<Point2>,
    trajectory: Option<Trajectory>,
    cursor: usize,
}

impl<O: SecondOrderOde<f64>> PlaybackController<O> {
    pub fn new(integrator: TrajectoryIntegrator<O>, dt: f64, horizon: f64) -> Result<Self> {
        let valid = dt.is_finite() && horizon.is_finite() && dt > 0.0 && horizon > 0.0;
        if !valid || whole_steps(horizon, dt).is_none() {
            return Err(PhaseError::InvalidIntegrationParameters { dt, horizon });
        }
        Ok(Self {
            integrator,
            dt,
            horizon,
            state: PlaybackState::Idle,
            pending: None,
            trajectory: None,
            cursor: 0,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn integrator(&self) -> &TrajectoryIntegrator<O> {
        &self.integrator
    }

    /// The armed start point, while waiting for `start`.
    pub fn pending_point(&self) -> Option<Point2> {
        self.pending
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Arms playback at `point`, discarding any trajectory in progress.
    pub fn select_start_point(&mut self, point: Point2) {
        self.pending = Some(point);
        self.trajectory = None;
        self.cursor = 0;
        self.state = PlaybackState::Armed;
    }

    /// Integrates the whole trajectory from the armed point and begins the
    /// reveal. Returns `Ok(false)` without doing anything unless armed.
    pub fn start(&mut self) -> Result<bool> {
        let start = match (self.state, self.pending) {
            (PlaybackState::Armed, Some(point)) => point,
            _ => return Ok(false),
        };

        let trajectory = self.integrator.integrate(start, self.dt, self.horizon)?;
        self.state = if trajectory.len() > 1 {
            PlaybackState::Revealing
        } else {
            PlaybackState::Done
        };
        self.trajectory = Some(trajectory);
        self.pending = None;
        self.cursor = 0;
        Ok(true)
    }

    /// Moves the cursor one point forward. Reaching the last point ends the
    /// reveal; later calls hold there.
    pub fn advance_frame(&mut self) -> usize {
        if self.state != PlaybackState::Revealing {
            return self.cursor;
        }
        let last = self.trajectory.as_ref().map_or(0, |t| t.len() - 1);
        if self.cursor < last {
            self.cursor += 1;
        }
        if self.cursor >= last {
            self.state = PlaybackState::Done;
        }
        self.cursor
    }

    /// Points `0..=cursor` of the active trajectory; empty before `start`.
    pub fn revealed_prefix(&self) -> &[Point2] {
        match (self.state, &self.trajectory) {
            (PlaybackState::Revealing | PlaybackState::Done, Some(trajectory)) => {
                &trajectory.points()[..=self.cursor]
            }
            _ => &[],
        }
    }

    /// The point under the cursor, once playback has started.
    pub fn current_point(&self) -> Option<Point2> {
        self.revealed_prefix().last().copied()
    }
}
