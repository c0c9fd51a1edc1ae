//! Mapping between mathematical coordinates and surface positions.
//!
//! Surface space is centered on the drawing surface with y pointing up, the
//! frame the presentation layer draws in after translating to the center and
//! flipping the y axis. Screen space (origin top-left, y down) only appears at
//! the pointer boundary, see [`CoordinateSpace::screen_to_surface`].

use crate::error::{PhaseError, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Relative slack used when deciding whether a quotient is a whole number of steps.
const STEP_SNAP_TOLERANCE: f64 = 1e-9;

/// A point or vector in either coordinate system.
pub type Point2 = Vector2<f64>;

/// Both components are neither NaN nor infinite.
pub fn is_finite_point(p: &Point2) -> bool {
    p.iter().all(|c| c.is_finite())
}

/// Largest step count derived from a span. Keeps tick, lattice and
/// trajectory buffers allocatable whatever tiny step the caller passes in.
pub const MAX_STEPS: usize = 10_000_000;

/// Number of whole `step`s that fit in `span`, or `None` past [`MAX_STEPS`].
///
/// Quotients within a relative 1e-9 of an integer snap to it, so `0.3 / 0.1`
/// counts as three steps rather than two.
pub(crate) fn whole_steps(span: f64, step: f64) -> Option<usize> {
    let quotient = span / step;
    let nearest = quotient.round();
    let count = if (quotient - nearest).abs() <= STEP_SNAP_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        quotient.floor()
    };
    let count = count.max(0.0);
    (count <= MAX_STEPS as f64).then_some(count as usize)
}

/// One axis' mathematical range and tick granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisSpec {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn validate(&self, axis: char) -> Result<()> {
        let invalid = |reason: String| PhaseError::InvalidAxisSpec { axis, reason };
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(format!(
                "range must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(invalid(format!(
                "min ({}) must be less than max ({})",
                self.min, self.max
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(invalid(format!(
                "step must be positive and finite, got {}",
                self.step
            )));
        }
        if whole_steps(self.span(), self.step).is_none() {
            return Err(invalid(format!(
                "step {} is too fine for range [{}, {}], more than {MAX_STEPS} ticks",
                self.step, self.min, self.max
            )));
        }
        Ok(())
    }

    /// Tick values `min + i * step` that fall inside the range. The last tick
    /// may stop short of `max` when the span is not a multiple of the step.
    /// An axis that would not pass validation yields no ticks.
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        let count = whole_steps(self.span(), self.step).map_or(0, |steps| steps + 1);
        (0..count).map(move |i| self.min + i as f64 * self.step)
    }

    /// Index of the tick sitting on zero, when zero is one of the ticks.
    pub fn zero_tick_index(&self) -> Option<usize> {
        let index = -self.min / self.step;
        let nearest = index.round();
        if nearest < 0.0 || (index - nearest).abs() > STEP_SNAP_TOLERANCE * nearest.max(1.0) {
            return None;
        }
        let nearest = nearest as usize;
        (nearest < self.ticks().count()).then_some(nearest)
    }

    fn is_zero_value(&self, value: f64) -> bool {
        value.abs() <= self.step * STEP_SNAP_TOLERANCE
    }
}

/// How tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Decimal,
    /// Multiples of π: `π`, `-π`, `0.5π`, `-2.5π`.
    PiMultiples,
}

impl LabelStyle {
    pub fn format(self, value: f64) -> String {
        match self {
            LabelStyle::Decimal => format_decimal(value),
            LabelStyle::PiMultiples => {
                let ratio = value / PI;
                if (ratio - 1.0).abs() <= STEP_SNAP_TOLERANCE {
                    "π".to_string()
                } else if (ratio + 1.0).abs() <= STEP_SNAP_TOLERANCE {
                    "-π".to_string()
                } else {
                    format!("{}π", format_decimal((ratio * 100.0).round() / 100.0))
                }
            }
        }
    }
}

fn format_decimal(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Grid presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    /// Number of faded sub-intervals per major interval; 0 or 1 disables them.
    pub faded_line_ratio: u32,
    pub x_labels: LabelStyle,
    pub y_labels: LabelStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            faded_line_ratio: 5,
            x_labels: LabelStyle::PiMultiples,
            y_labels: LabelStyle::Decimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Major,
    Faded,
    Axis,
}

/// A grid line perpendicular to one axis. `position` is the surface coordinate
/// along that axis; the line spans the whole surface in the other direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub kind: LineKind,
    pub value: f64,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridLines {
    /// Lines of constant x.
    pub vertical: Vec<GridLine>,
    /// Lines of constant y.
    pub horizontal: Vec<GridLine>,
}

impl GridLines {
    pub fn axes(&self) -> impl Iterator<Item = &GridLine> {
        self.vertical
            .iter()
            .chain(self.horizontal.iter())
            .filter(|line| line.kind == LineKind::Axis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    pub text: String,
    pub value: f64,
    /// Surface point where the tick meets the perpendicular axis line.
    pub anchor: Point2,
}

/// Affine map between the math plane and the drawing surface.
///
/// Only the axes and the surface extent are stored; line spacing and the
/// surface position of the origin are always derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSpace {
    x_axis: AxisSpec,
    y_axis: AxisSpec,
    width: f64,
    height: f64,
}

impl CoordinateSpace {
    pub fn new(x_axis: AxisSpec, y_axis: AxisSpec, width: f64, height: f64) -> Result<Self> {
        x_axis.validate('x')?;
        y_axis.validate('y')?;
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(PhaseError::InvalidSurfaceExtent { width, height });
        }
        let space = Self {
            x_axis,
            y_axis,
            width,
            height,
        };
        log::debug!(
            "coordinate space {}x{}: x {:?}, y {:?}, origin at {:?}",
            width,
            height,
            x_axis,
            y_axis,
            space.origin()
        );
        Ok(space)
    }

    pub fn x_axis(&self) -> &AxisSpec {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &AxisSpec {
        &self.y_axis
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Surface distance between neighbouring x ticks.
    pub fn x_line_distance(&self) -> f64 {
        self.width * self.x_axis.step / self.x_axis.span()
    }

    /// Surface distance between neighbouring y ticks.
    pub fn y_line_distance(&self) -> f64 {
        self.height * self.y_axis.step / self.y_axis.span()
    }

    /// Surface position of the mathematical origin.
    ///
    /// The left edge carries tick 0, so the origin sits `-min / step` line
    /// distances to the right of it (and likewise upward from the bottom edge).
    pub fn origin(&self) -> Point2 {
        Point2::new(
            -self.width / 2.0 + (-self.x_axis.min / self.x_axis.step) * self.x_line_distance(),
            -self.height / 2.0 + (-self.y_axis.min / self.y_axis.step) * self.y_line_distance(),
        )
    }

    pub fn to_surface(&self, math: Point2) -> Point2 {
        let origin = self.origin();
        Point2::new(
            (math.x / self.x_axis.step) * self.x_line_distance() + origin.x,
            (math.y / self.y_axis.step) * self.y_line_distance() + origin.y,
        )
    }

    pub fn to_math(&self, surface: Point2) -> Point2 {
        let origin = self.origin();
        Point2::new(
            (self.x_axis.step / self.x_line_distance()) * (surface.x - origin.x),
            (self.y_axis.step / self.y_line_distance()) * (surface.y - origin.y),
        )
    }

    /// Converts a screen pixel (origin top-left, y down) into surface space.
    pub fn screen_to_surface(&self, px: f64, py: f64) -> Point2 {
        Point2::new(px - self.width / 2.0, self.height / 2.0 - py)
    }

    pub fn contains_screen(&self, px: f64, py: f64) -> bool {
        (0.0..=self.width).contains(&px) && (0.0..=self.height).contains(&py)
    }

    pub fn grid_lines(&self, style: &GridStyle) -> GridLines {
        let origin = self.origin();
        GridLines {
            vertical: axis_lines(
                &self.x_axis,
                self.width,
                self.x_line_distance(),
                origin.x,
                style.faded_line_ratio,
            ),
            horizontal: axis_lines(
                &self.y_axis,
                self.height,
                self.y_line_distance(),
                origin.y,
                style.faded_line_ratio,
            ),
        }
    }

    /// Labels for every non-zero tick, anchored on the opposite axis line.
    pub fn tick_labels(&self, style: &GridStyle) -> Vec<TickLabel> {
        let origin = self.origin();
        let x_labels = self
            .x_axis
            .ticks()
            .filter(|&value| !self.x_axis.is_zero_value(value))
            .map(|value| TickLabel {
                text: style.x_labels.format(value),
                value,
                anchor: Point2::new(self.to_surface(Point2::new(value, 0.0)).x, origin.y),
            });
        let y_labels = self
            .y_axis
            .ticks()
            .filter(|&value| !self.y_axis.is_zero_value(value))
            .map(|value| TickLabel {
                text: style.y_labels.format(value),
                value,
                anchor: Point2::new(origin.x, self.to_surface(Point2::new(0.0, value)).y),
            });
        x_labels.chain(y_labels).collect()
    }
}

fn axis_lines(
    axis: &AxisSpec,
    extent: f64,
    line_distance: f64,
    origin: f64,
    faded_ratio: u32,
) -> Vec<GridLine> {
    let start = -extent / 2.0;
    let end = extent / 2.0;
    let zero_index = axis.zero_tick_index();
    let mut lines = Vec::new();

    for (i, value) in axis.ticks().enumerate() {
        let position = start + i as f64 * line_distance;
        let kind = if Some(i) == zero_index {
            LineKind::Axis
        } else {
            LineKind::Major
        };
        lines.push(GridLine {
            kind,
            value,
            position,
        });

        if faded_ratio > 1 {
            let sub = line_distance / faded_ratio as f64;
            for j in 1..faded_ratio {
                let offset = j as f64 * sub;
                let faded_position = position + offset;
                if faded_position > end + line_distance * STEP_SNAP_TOLERANCE {
                    break;
                }
                lines.push(GridLine {
                    kind: LineKind::Faded,
                    value: value + axis.step * offset / line_distance,
                    position: faded_position,
                });
            }
        }
    }

    // zero inside the range but between ticks still gets its axis line
    if zero_index.is_none() && axis.min < 0.0 && axis.max > 0.0 {
        lines.push(GridLine {
            kind: LineKind::Axis,
            value: 0.0,
            position: origin,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pendulum_space() -> CoordinateSpace {
        CoordinateSpace::new(
            AxisSpec::new(-3.0 * PI, 3.0 * PI, PI / 2.0),
            AxisSpec::new(-4.0, 4.0, 1.0),
            957.0,
            538.0,
        )
        .expect("valid space")
    }

    fn assert_close(a: f64, b: f64, what: &str) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!(
            (a - b).abs() <= 1e-9 * scale,
            "{what}: expected {b}, got {a}"
        );
    }

    #[test]
    fn line_distances_follow_step_over_span() {
        let space = pendulum_space();
        assert_close(space.x_line_distance(), 957.0 / 12.0, "x line distance");
        assert_close(space.y_line_distance(), 538.0 / 8.0, "y line distance");
    }

    #[test]
    fn symmetric_ranges_put_origin_at_surface_center() {
        let origin = pendulum_space().origin();
        assert_close(origin.x, 0.0, "origin.x");
        assert_close(origin.y, 0.0, "origin.y");
    }

    #[test]
    fn range_corners_map_to_surface_corners() {
        let space = CoordinateSpace::new(
            AxisSpec::new(-1.0, 3.0, 0.5),
            AxisSpec::new(2.0, 10.0, 2.0),
            400.0,
            200.0,
        )
        .expect("valid space");
        let low = space.to_surface(Point2::new(-1.0, 2.0));
        let high = space.to_surface(Point2::new(3.0, 10.0));
        assert_close(low.x, -200.0, "low.x");
        assert_close(low.y, -100.0, "low.y");
        assert_close(high.x, 200.0, "high.x");
        assert_close(high.y, 100.0, "high.y");
    }

    #[test]
    fn to_math_inverts_to_surface() {
        let spaces = [
            pendulum_space(),
            CoordinateSpace::new(
                AxisSpec::new(-1.0, 3.0, 0.5),
                AxisSpec::new(2.0, 10.0, 2.0),
                400.0,
                200.0,
            )
            .expect("valid space"),
            CoordinateSpace::new(
                AxisSpec::new(-0.7, 0.2, 0.3),
                AxisSpec::new(-50.0, -10.0, 7.0),
                123.0,
                77.0,
            )
            .expect("valid space"),
        ];

        for space in &spaces {
            let x = space.x_axis();
            let y = space.y_axis();
            for i in 0..=10 {
                for j in 0..=10 {
                    let p = Point2::new(
                        x.min + x.span() * i as f64 / 10.0,
                        y.min + y.span() * j as f64 / 10.0,
                    );
                    let back = space.to_math(space.to_surface(p));
                    assert_close(back.x, p.x, "round-trip x");
                    assert_close(back.y, p.y, "round-trip y");
                }
            }
        }
    }

    #[test]
    fn origin_lands_on_axis_line() {
        let cases = [
            (AxisSpec::new(-3.0 * PI, 3.0 * PI, PI / 2.0), AxisSpec::new(-4.0, 4.0, 1.0)),
            (AxisSpec::new(-2.0, 6.0, 1.0), AxisSpec::new(-1.0, 0.5, 0.25)),
            (AxisSpec::new(-0.3, 0.9, 0.1), AxisSpec::new(-12.0, 3.0, 3.0)),
        ];
        let style = GridStyle::default();

        for (x_axis, y_axis) in cases {
            let space = CoordinateSpace::new(x_axis, y_axis, 640.0, 360.0).expect("valid space");
            let origin = space.to_surface(Point2::new(0.0, 0.0));
            let lines = space.grid_lines(&style);

            let x_index = x_axis.zero_tick_index().expect("zero is a tick");
            let x_majors: Vec<_> = lines
                .vertical
                .iter()
                .filter(|line| line.kind != LineKind::Faded)
                .collect();
            assert_eq!(x_majors[x_index].kind, LineKind::Axis);
            assert_close(x_majors[x_index].position, origin.x, "vertical axis line");

            let y_index = y_axis.zero_tick_index().expect("zero is a tick");
            let y_majors: Vec<_> = lines
                .horizontal
                .iter()
                .filter(|line| line.kind != LineKind::Faded)
                .collect();
            assert_eq!(y_majors[y_index].kind, LineKind::Axis);
            assert_close(y_majors[y_index].position, origin.y, "horizontal axis line");
        }
    }

    #[test]
    fn origin_between_ticks_still_gets_an_axis_line() {
        let space = CoordinateSpace::new(
            AxisSpec::new(-1.5, 2.5, 1.0),
            AxisSpec::new(-4.0, 4.0, 1.0),
            400.0,
            400.0,
        )
        .expect("valid space");
        let lines = space.grid_lines(&GridStyle::default());
        let axes: Vec<_> = lines
            .vertical
            .iter()
            .filter(|line| line.kind == LineKind::Axis)
            .collect();
        assert_eq!(axes.len(), 1);
        assert_close(axes[0].position, space.to_surface(Point2::zeros()).x, "axis");
        assert_eq!(lines.axes().count(), 2);
    }

    #[test]
    fn partial_final_tick_is_allowed() {
        let axis = AxisSpec::new(0.0, 1.0, 0.3);
        let ticks: Vec<f64> = axis.ticks().collect();
        assert_eq!(ticks.len(), 4);
        assert_close(ticks[3], 0.9, "last tick");

        let snapped = AxisSpec::new(0.0, 0.3, 0.1);
        assert_eq!(snapped.ticks().count(), 4);
    }

    #[test]
    fn faded_lines_subdivide_each_major_gap() {
        let space = CoordinateSpace::new(
            AxisSpec::new(-2.0, 2.0, 1.0),
            AxisSpec::new(-1.0, 1.0, 1.0),
            400.0,
            200.0,
        )
        .expect("valid space");
        let style = GridStyle {
            faded_line_ratio: 4,
            ..GridStyle::default()
        };
        let lines = space.grid_lines(&style);
        let majors = lines
            .vertical
            .iter()
            .filter(|line| line.kind != LineKind::Faded)
            .count();
        let faded: Vec<_> = lines
            .vertical
            .iter()
            .filter(|line| line.kind == LineKind::Faded)
            .collect();
        assert_eq!(majors, 5);
        assert_eq!(faded.len(), 4 * 3);
        assert_close(faded[0].position, -175.0, "first faded line");
        assert_close(faded[0].value, -1.75, "first faded value");

        let plain = space.grid_lines(&GridStyle {
            faded_line_ratio: 1,
            ..GridStyle::default()
        });
        assert!(plain.vertical.iter().all(|line| line.kind != LineKind::Faded));
    }

    #[test]
    fn pi_labels_skip_zero_and_name_unit_multiples() {
        let space = pendulum_space();
        let labels = space.tick_labels(&GridStyle::default());
        let x_texts: Vec<&str> = labels[..12].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            x_texts,
            vec![
                "-3π", "-2.5π", "-2π", "-1.5π", "-π", "-0.5π", "0.5π", "π", "1.5π", "2π",
                "2.5π", "3π"
            ]
        );
        let y_texts: Vec<&str> = labels[12..].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(y_texts, vec!["-4", "-3", "-2", "-1", "1", "2", "3", "4"]);
        assert!(labels[..12].iter().all(|l| l.anchor.y == space.origin().y));
    }

    #[test]
    fn decimal_labels_trim_trailing_zeros() {
        assert_eq!(LabelStyle::Decimal.format(0.5), "0.5");
        assert_eq!(LabelStyle::Decimal.format(-2.0), "-2");
        assert_eq!(LabelStyle::Decimal.format(-0.0000001), "0");
        assert_eq!(LabelStyle::PiMultiples.format(PI / 3.0), "0.33π");
    }

    #[test]
    fn rejects_degenerate_axes_and_extent() {
        let good = AxisSpec::new(-1.0, 1.0, 0.5);
        let zero_step = AxisSpec::new(-1.0, 1.0, 0.0);
        let inverted = AxisSpec::new(1.0, -1.0, 0.5);

        let err = CoordinateSpace::new(zero_step, good, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidAxisSpec { axis: 'x', .. }));
        let err = CoordinateSpace::new(good, inverted, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidAxisSpec { axis: 'y', .. }));
        let err = CoordinateSpace::new(good, AxisSpec::new(-1.0, 1.0, -0.1), 1.0, 1.0)
            .unwrap_err();
        assert!(err.to_string().contains("step must be positive"));
        let err = CoordinateSpace::new(good, good, 0.0, 100.0).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidSurfaceExtent { .. }));
    }

    #[test]
    fn rejects_steps_too_fine_to_enumerate() {
        let good = AxisSpec::new(-1.0, 1.0, 0.5);
        let tiny = AxisSpec::new(-1.0, 1.0, 1e-300);

        let err = CoordinateSpace::new(tiny, good, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidAxisSpec { axis: 'x', .. }));
        assert!(err.to_string().contains("too fine"));
        assert_eq!(tiny.ticks().count(), 0);
    }

    #[test]
    fn whole_steps_snaps_and_caps() {
        assert_eq!(whole_steps(0.3, 0.1), Some(3));
        assert_eq!(whole_steps(1.0, 0.3), Some(3));
        assert_eq!(whole_steps(MAX_STEPS as f64, 1.0), Some(MAX_STEPS));
        assert_eq!(whole_steps(MAX_STEPS as f64 + 1.0, 1.0), None);
        assert_eq!(whole_steps(1.0, 1e-300), None);
    }

    #[test]
    fn screen_pixels_convert_to_centered_surface() {
        let space = pendulum_space();
        let center = space.screen_to_surface(957.0 / 2.0, 538.0 / 2.0);
        assert_close(center.x, 0.0, "center.x");
        assert_close(center.y, 0.0, "center.y");
        let top_left = space.screen_to_surface(0.0, 0.0);
        assert_close(top_left.x, -478.5, "top_left.x");
        assert_close(top_left.y, 269.0, "top_left.y");
        assert!(space.contains_screen(0.0, 538.0));
        assert!(!space.contains_screen(-1.0, 10.0));
        assert!(!space.contains_screen(10.0, 539.0));
    }
}
