//! A complete portrait session: grid, field and trajectory playback wired to
//! pointer and confirm input.

use crate::config::PortraitConfig;
use crate::coordinates::{CoordinateSpace, GridLines, GridStyle, Point2, TickLabel};
use crate::error::Result;
use crate::field::VectorField;
use crate::models::OdeModel;
use crate::playback::{PlaybackController, PlaybackState};
use crate::traits::SecondOrderOde;
use crate::trajectory::TrajectoryIntegrator;

pub struct PhasePortrait<O = OdeModel> {
    space: CoordinateSpace,
    grid: GridStyle,
    field: VectorField,
    playback: PlaybackController<O>,
    bob_scale: f64,
    pendulum_length: Option<f64>,
}

impl PhasePortrait<OdeModel> {
    /// Builds the session for the model named in `config`.
    pub fn from_config(config: &PortraitConfig, width: f64, height: f64) -> Result<Self> {
        config.model.validate()?;
        let portrait = Self::with_ode(config, config.model, width, height)?;
        Ok(match config.model.pendulum_length() {
            Some(length) => portrait.with_pendulum_length(length),
            None => portrait,
        })
    }
}

impl<O: SecondOrderOde<f64>> PhasePortrait<O> {
    /// Builds the session for an arbitrary ODE; `config.model` is ignored.
    pub fn with_ode(config: &PortraitConfig, ode: O, width: f64, height: f64) -> Result<Self> {
        let space = CoordinateSpace::new(config.x_axis, config.y_axis, width, height)?;
        let field = VectorField::new(&space, &ode, config.field)?;
        let dt = config.time_step.dt()?;
        let playback = PlaybackController::new(TrajectoryIntegrator::new(ode), dt, config.horizon)?;

        Ok(Self {
            space,
            grid: config.grid,
            field,
            playback,
            bob_scale: config.bob_scale,
            pendulum_length: None,
        })
    }

    /// Enables the pendulum view for a rod of `length`.
    pub fn with_pendulum_length(mut self, length: f64) -> Self {
        self.pendulum_length = Some(length);
        self
    }

    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn field(&self) -> &VectorField {
        &self.field
    }

    pub fn playback(&self) -> &PlaybackController<O> {
        &self.playback
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn grid_lines(&self) -> GridLines {
        self.space.grid_lines(&self.grid)
    }

    pub fn tick_labels(&self) -> Vec<TickLabel> {
        self.space.tick_labels(&self.grid)
    }

    /// Handles a press at screen pixel `(px, py)`. Presses outside the surface
    /// are ignored; anything else arms playback at the pressed phase point.
    pub fn pointer_pressed(&mut self, px: f64, py: f64) -> bool {
        if !self.space.contains_screen(px, py) {
            return false;
        }
        let point = self.space.to_math(self.space.screen_to_surface(px, py));
        log::debug!("armed playback at {:?} from pixel ({}, {})", point, px, py);
        self.playback.select_start_point(point);
        true
    }

    pub fn select_start_point(&mut self, point: Point2) {
        self.playback.select_start_point(point);
    }

    /// Starts playback from the armed point; `Ok(false)` when nothing is armed.
    pub fn confirm(&mut self) -> Result<bool> {
        self.playback.start()
    }

    pub fn advance_frame(&mut self) -> usize {
        self.playback.advance_frame()
    }

    /// The revealed prefix converted to surface coordinates.
    pub fn revealed_path(&self) -> Vec<Point2> {
        self.playback
            .revealed_prefix()
            .iter()
            .map(|&p| self.space.to_surface(p))
            .collect()
    }

    /// Surface position of the armed start point.
    pub fn pending_marker(&self) -> Option<Point2> {
        self.playback.pending_point().map(|p| self.space.to_surface(p))
    }

    /// Angle shown by the pendulum view: the armed point while waiting, the
    /// cursor point while playing, and rest otherwise.
    pub fn pendulum_angle(&self) -> f64 {
        match self.playback.state() {
            PlaybackState::Armed => self.playback.pending_point().map_or(0.0, |p| p.x),
            PlaybackState::Revealing | PlaybackState::Done => {
                self.playback.current_point().map_or(0.0, |p| p.x)
            }
            PlaybackState::Idle => 0.0,
        }
    }

    /// Bob position relative to the pivot, y pointing down.
    pub fn bob_position(&self) -> Option<Point2> {
        let length = self.pendulum_length?;
        let theta = self.pendulum_angle();
        let reach = self.bob_scale * length;
        Some(Point2::new(reach * theta.sin(), reach * theta.cos()))
    }
}
