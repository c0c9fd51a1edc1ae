//! Vector field sampled on a regular lattice of the phase plane.

use crate::coordinates::{whole_steps, CoordinateSpace, Point2, MAX_STEPS};
use crate::error::{PhaseError, Result};
use crate::models::planar_velocity;
use crate::traits::SecondOrderOde;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL to 8-bit RGB. `saturation` and `lightness` are percentages.
///
/// `hue` is in degrees on `[0, 360)`. Anything outside, including the 360° a
/// saturated speed maps to, has no chroma and comes out as the gray level `m`
/// (black at full saturation and 50% lightness), so the fastest samples never
/// share a color with the stationary ones.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue;
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u8 {
        _ if !(0.0..360.0).contains(&h) => (0.0, 0.0, 0.0),
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// How samples are spaced and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStyle {
    /// Lattice spacing in math units, independent of the axis tick step.
    pub gap: f64,
    /// Speed at which the hue ramp reaches 360°.
    pub saturation_cap: f64,
    /// Drawn arrow length in surface units, whatever the true speed.
    pub arrow_length: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            gap: 0.57,
            saturation_cap: 14.0,
            arrow_length: 30.0,
            saturation: 100.0,
            lightness: 50.0,
        }
    }
}

impl FieldStyle {
    fn validate(&self) -> Result<()> {
        if !self.gap.is_finite() || self.gap <= 0.0 {
            return Err(PhaseError::InvalidSamplingGap(self.gap));
        }
        if !self.saturation_cap.is_finite() || self.saturation_cap <= 0.0 {
            return Err(PhaseError::InvalidFieldStyle(format!(
                "saturation cap must be positive, got {}",
                self.saturation_cap
            )));
        }
        if !self.arrow_length.is_finite() || self.arrow_length < 0.0 {
            return Err(PhaseError::InvalidFieldStyle(format!(
                "arrow length must be non-negative, got {}",
                self.arrow_length
            )));
        }
        for (name, value) in [("saturation", self.saturation), ("lightness", self.lightness)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(PhaseError::InvalidFieldStyle(format!(
                    "{name} must be a percentage, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Linear hue ramp: speed 0 is 0°, `saturation_cap` and above is 360°.
    pub fn hue_for_magnitude(&self, magnitude: f64) -> f64 {
        if magnitude.is_nan() {
            return 0.0;
        }
        (magnitude / self.saturation_cap).clamp(0.0, 1.0) * 360.0
    }
}

/// One lattice point of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    /// `(θ, θ′)` in math coordinates.
    pub point: Point2,
    /// `(θ′, θ″)`.
    pub velocity: Point2,
    pub magnitude: f64,
    pub hue: f64,
    pub color: Rgb,
    /// Arrow start in surface space.
    pub tail: Point2,
    /// Arrow end in surface space, `arrow_length` away from the tail.
    pub head: Point2,
}

/// Read-only lattice of samples, stored column by column (every θ′ for the
/// first θ, then the next θ).
#[derive(Debug, Clone)]
pub struct VectorField {
    samples: Vec<FieldSample>,
    columns: usize,
    rows: usize,
    style: FieldStyle,
}

impl VectorField {
    pub fn new<O>(space: &CoordinateSpace, ode: &O, style: FieldStyle) -> Result<Self>
    where
        O: SecondOrderOde<f64> + ?Sized,
    {
        style.validate()?;

        let x_axis = space.x_axis();
        let y_axis = space.y_axis();
        let (columns, rows) = lattice_shape(x_axis.span(), y_axis.span(), style.gap)
            .ok_or(PhaseError::InvalidSamplingGap(style.gap))?;

        let mut samples = Vec::with_capacity(columns * rows);
        for i in 0..columns {
            let x = x_axis.min + i as f64 * style.gap;
            for j in 0..rows {
                let y = y_axis.min + j as f64 * style.gap;
                samples.push(sample_at(space, ode, &style, Point2::new(x, y)));
            }
        }

        log::debug!(
            "sampled vector field: {} columns x {} rows at gap {}",
            columns,
            rows,
            style.gap
        );

        Ok(Self {
            samples,
            columns,
            rows,
            style,
        })
    }

    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column(&self, index: usize) -> Option<&[FieldSample]> {
        if index >= self.columns {
            return None;
        }
        let start = index * self.rows;
        Some(&self.samples[start..start + self.rows])
    }

    pub fn style(&self) -> &FieldStyle {
        &self.style
    }
}

/// Columns and rows of the lattice, `None` past [`MAX_STEPS`] samples in total.
fn lattice_shape(x_span: f64, y_span: f64, gap: f64) -> Option<(usize, usize)> {
    let columns = whole_steps(x_span, gap)? + 1;
    let rows = whole_steps(y_span, gap)? + 1;
    columns.checked_mul(rows).filter(|&count| count <= MAX_STEPS)?;
    Some((columns, rows))
}

fn sample_at<O>(space: &CoordinateSpace, ode: &O, style: &FieldStyle, point: Point2) -> FieldSample
where
    O: SecondOrderOde<f64> + ?Sized,
{
    let velocity = planar_velocity(ode, point);
    let magnitude = velocity.norm();
    let hue = style.hue_for_magnitude(magnitude);
    let tail = space.to_surface(point);
    // direction comes straight from the math-space velocity, only the color carries speed
    let head = tail + arrow_offset(velocity, magnitude, style.arrow_length);

    FieldSample {
        point,
        velocity,
        magnitude,
        hue,
        color: hsl_to_rgb(hue, style.saturation, style.lightness),
        tail,
        head,
    }
}

/// `velocity` rescaled to `length`. Zero and non-finite velocities draw no arrow.
fn arrow_offset(velocity: Point2, magnitude: f64, length: f64) -> Point2 {
    if !magnitude.is_finite() {
        return Point2::zeros();
    }
    velocity
        .try_normalize(0.0)
        .map_or_else(Point2::zeros, |unit| unit * length)
}
