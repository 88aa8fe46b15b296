//! User-operated inputs: Toggle Switch, Push Button and Potentiometer.

/// A latching switch driving `OUT` high while on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleSwitch {
    pub on: bool,
}

impl ToggleSwitch {
    /// Create a new switch.
    pub fn new(on: bool) -> Self {
        Self { on }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, on: bool) {
        self.on = on;
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    /// Level on `OUT`.
    pub fn output(&self) -> f64 {
        if self.on {
            1.0
        } else {
            0.0
        }
    }
}

/// A momentary button driving `OUT` high while held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushButton {
    pub pressed: bool,
}

impl PushButton {
    /// Create a new button.
    pub fn new(pressed: bool) -> Self {
        Self { pressed }
    }

    /// Press or release the button.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Level on `OUT`.
    pub fn output(&self) -> f64 {
        if self.pressed {
            1.0
        } else {
            0.0
        }
    }
}

/// A potentiometer whose wiper drives its rotation onto `OUT`.
///
/// Rotation is already normalized: 0.0 is fully counter-clockwise and
/// 1.0 fully clockwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Potentiometer {
    rotation: f64,
}

impl Potentiometer {
    /// Create a new potentiometer.
    pub fn new(rotation: f64) -> Self {
        let mut pot = Self::default();
        pot.set_rotation(rotation);
        pot
    }

    /// Current rotation in 0..1.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the rotation; out-of-range values are clamped and NaN reads as 0.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = if rotation.is_nan() {
            0.0
        } else {
            rotation.clamp(0.0, 1.0)
        };
    }

    /// Analog level on `OUT`.
    pub fn output(&self) -> f64 {
        self.rotation
    }
}
