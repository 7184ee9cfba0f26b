//! Fade curve synthesis for track gain envelopes
//!
//! Produces normalized gain curves sampled at a requested resolution. The
//! same curves drive gain automation during playback and the fade overlay
//! path in the renderer, which keeps what is heard and what is drawn in
//! agreement.
//!
//! Direction is encoded as a reflection of the curve rather than a separate
//! "out" formula: a fade-out is the fade-in curve mirrored in time (linear
//! complements the value instead, which amounts to the same thing for a
//! straight line).

use serde::{Deserialize, Serialize};
use std::f64::consts::{E, FRAC_PI_2, PI};

use crate::error::{Error, Result};

/// Default base for logarithmic curves
pub const LOG_BASE: f64 = 10.0;

/// Fade curve shapes
///
/// - Linear: constant rate of change
/// - Exponential: slow start, fast finish
/// - Logarithmic: fast start, slow finish
/// - SCurve: smooth sigmoid acceleration and deceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FadeShape {
    /// v(x) = x
    Linear,

    /// v(x) = e^(2x-1) / e
    ///
    /// Deliberately not normalized to start at exactly 0.0; the curve
    /// begins at e^-2. Consumers depend on this numeric behavior, so the
    /// formula must not be "corrected".
    Exponential,

    /// v(x) = ln(1 + base*x) / ln(1 + base), base 10
    Logarithmic,

    /// v(i) = sin(pi*i/length - phase)/2 + 0.5, phase = +/- pi/2
    SCurve,
}

/// Fade direction, encoded as a rotation sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Gain rises over the fade window
    In,

    /// Gain falls over the fade window
    Out,
}

impl FadeDirection {
    /// Rotation sign: +1 for fade-in, -1 for fade-out
    pub fn sign(&self) -> i32 {
        match self {
            FadeDirection::In => 1,
            FadeDirection::Out => -1,
        }
    }

    /// Parse a rotation sign into a direction
    ///
    /// Any positive value means fade-in and any negative value fade-out;
    /// zero is not a direction and fails with `UnsupportedDirection`.
    pub fn from_sign(sign: i32) -> Result<Self> {
        match sign {
            s if s > 0 => Ok(FadeDirection::In),
            s if s < 0 => Ok(FadeDirection::Out),
            other => Err(Error::UnsupportedDirection(other)),
        }
    }
}

impl FadeShape {
    /// Parse a shape from its descriptor string
    ///
    /// Accepts the canonical names plus common aliases:
    /// - 'linear'
    /// - 'exponential'
    /// - 'logarithmic'
    /// - 'sCurve', 'scurve', 's-curve', 's_curve'
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(FadeShape::Linear),
            "exponential" => Ok(FadeShape::Exponential),
            "logarithmic" => Ok(FadeShape::Logarithmic),
            "scurve" | "s-curve" | "s_curve" => Ok(FadeShape::SCurve),
            _ => Err(Error::UnsupportedShape(s.to_string())),
        }
    }

    /// Canonical descriptor string
    pub fn as_str(&self) -> &'static str {
        match self {
            FadeShape::Linear => "linear",
            FadeShape::Exponential => "exponential",
            FadeShape::Logarithmic => "logarithmic",
            FadeShape::SCurve => "sCurve",
        }
    }

    /// All shape variants, for UI dropdowns and validation
    pub fn all_variants() -> &'static [FadeShape] {
        &[
            FadeShape::Linear,
            FadeShape::Exponential,
            FadeShape::Logarithmic,
            FadeShape::SCurve,
        ]
    }
}

impl Default for FadeShape {
    /// Default shape for new fades is Logarithmic
    fn default() -> Self {
        FadeShape::Logarithmic
    }
}

impl std::fmt::Display for FadeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generate a gain curve of `length` samples for the given shape and
/// direction
pub fn generate(shape: FadeShape, length: usize, direction: FadeDirection) -> Vec<f32> {
    match shape {
        FadeShape::Linear => linear(length, direction),
        FadeShape::Exponential => exponential(length, direction),
        FadeShape::Logarithmic => logarithmic(length, LOG_BASE, direction),
        FadeShape::SCurve => s_curve(length, direction),
    }
}

/// Linear curve: x for fade-in, 1-x for fade-out
pub fn linear(length: usize, direction: FadeDirection) -> Vec<f32> {
    let mut curve = vec![0.0f32; length];
    let scale = length.saturating_sub(1) as f64;

    for (i, sample) in curve.iter_mut().enumerate() {
        let x = i as f64 / scale;

        *sample = (if direction.sign() > 0 { x } else { 1.0 - x }) as f32;
    }

    curve
}

/// Exponential curve: e^(2x-1)/e, reflected in time for fade-out
pub fn exponential(length: usize, direction: FadeDirection) -> Vec<f32> {
    let mut curve = vec![0.0f32; length];
    let scale = length.saturating_sub(1) as f64;

    for i in 0..length {
        let x = i as f64 / scale;
        let index = if direction.sign() > 0 { i } else { length - 1 - i };

        curve[index] = ((2.0 * x - 1.0).exp() / E) as f32;
    }

    curve
}

/// Logarithmic curve: ln(1 + base*x)/ln(1 + base), reflected in time for
/// fade-out
///
/// Note x runs over i/length, so the final sample stays just short of 1.0.
pub fn logarithmic(length: usize, base: f64, direction: FadeDirection) -> Vec<f32> {
    let mut curve = vec![0.0f32; length];

    for i in 0..length {
        let index = if direction.sign() > 0 { i } else { length - 1 - i };

        let x = i as f64 / length as f64;
        curve[index] = ((1.0 + base * x).ln() / (1.0 + base).ln()) as f32;
    }

    curve
}

/// Sigmoid curve: sin(pi*i/length - phase)/2 + 0.5
///
/// Phase +pi/2 yields the rising half-period, -pi/2 the falling one.
pub fn s_curve(length: usize, direction: FadeDirection) -> Vec<f32> {
    let mut curve = vec![0.0f32; length];
    let phase = if direction.sign() > 0 {
        FRAC_PI_2
    } else {
        -FRAC_PI_2
    };

    for (i, sample) in curve.iter_mut().enumerate() {
        *sample = ((PI * i as f64 / length as f64 - phase).sin() / 2.0 + 0.5) as f32;
    }

    curve
}
