//! Environmental sensors.
//!
//! Each sensor reports a user-set reading. Analog outputs are normalized
//! against the sensor's physical range and clamped to 0..1.

/// Full-scale raw reading of the photoresistor (10-bit ADC).
pub const PHOTORESISTOR_FULL_SCALE: f64 = 1023.0;

/// Default raw light level.
pub const PHOTORESISTOR_DEFAULT_LEVEL: f64 = 512.0;

/// Maximum distance the ultrasonic ranger reports, in centimeters.
pub const ULTRASONIC_RANGE_CM: f64 = 400.0;

/// Default ultrasonic distance, in centimeters.
pub const ULTRASONIC_DEFAULT_CM: f64 = 100.0;

fn normalize(reading: f64, full_scale: f64) -> f64 {
    if reading.is_nan() {
        return 0.0;
    }
    (reading / full_scale).clamp(0.0, 1.0)
}

/// Light-dependent resistor; drives `OUT` with the light level.
#[derive(Debug, Clone, PartialEq)]
pub struct Photoresistor {
    /// Raw light level, 0..1023
    pub level: f64,
}

impl Default for Photoresistor {
    fn default() -> Self {
        Self {
            level: PHOTORESISTOR_DEFAULT_LEVEL,
        }
    }
}

impl Photoresistor {
    /// Analog level on `OUT`.
    pub fn output(&self) -> f64 {
        normalize(self.level, PHOTORESISTOR_FULL_SCALE)
    }
}

/// HC-SR04 style ranger; drives `ECHO` with the distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Ultrasonic {
    pub distance_cm: f64,
}

impl Default for Ultrasonic {
    fn default() -> Self {
        Self {
            distance_cm: ULTRASONIC_DEFAULT_CM,
        }
    }
}

impl Ultrasonic {
    /// Analog level on `ECHO`.
    pub fn output(&self) -> f64 {
        normalize(self.distance_cm, ULTRASONIC_RANGE_CM)
    }
}

/// Passive infrared motion detector; drives `OUT` high on motion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PirSensor {
    pub motion: bool,
}

impl PirSensor {
    /// Level on `OUT`.
    pub fn output(&self) -> f64 {
        if self.motion {
            1.0
        } else {
            0.0
        }
    }
}
