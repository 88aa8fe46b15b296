//! Output and display parts.
//!
//! These drive nothing. The helpers here derive what a front end shows
//! from the part's resolved input values.

use serde::Serialize;

use crate::circuit::PinInputs;

/// What a display or instrument shows after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayState {
    Led { color: String, brightness: f64 },
    Rgb { color: [u8; 3] },
    Servo { angle: f64 },
    SevenSegment { segments: Vec<&'static str> },
    Scope { samples: Vec<f64> },
    Meter { mode: String, reading: f64 },
}

/// An indicator LED lit by `IN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Led {
    pub color: String,
}

impl Default for Led {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
        }
    }
}

impl Led {
    /// Brightness in 0..1.
    pub fn brightness(&self, inputs: PinInputs<'_>) -> f64 {
        inputs.value("IN").clamp(0.0, 1.0)
    }
}

/// Color mixed by an RGB LED from its three channel pins, each 0..255.
pub fn rgb_color(inputs: PinInputs<'_>) -> [u8; 3] {
    let channel = |pin: &str| (inputs.value(pin).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel("RED"), channel("GRN"), channel("BLU")]
}

/// Servo horn angle in degrees from the analog `SIG` input.
pub fn servo_angle(inputs: PinInputs<'_>) -> f64 {
    inputs.value("SIG").clamp(0.0, 1.0) * 180.0
}

/// Segment names of a seven-segment display, in pin order.
pub const SEGMENTS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "DP"];

/// Segments currently lit.
pub fn lit_segments(inputs: PinInputs<'_>) -> Vec<&'static str> {
    SEGMENTS.iter().copied().filter(|s| inputs.is_high(s)).collect()
}
