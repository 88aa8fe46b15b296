//! 555 timer modeled as a threshold-comparator latch.
//!
//! Pin roles: `2` TRIG, `3` OUT, `4` RESET, `6` THRES. The remaining pins
//! (GND, VCC, DISCH, CTRL) are accepted but not modeled.

use crate::circuit::PinInputs;
use crate::sketch::Level;

/// Default trigger comparator level (one third of supply).
pub const DEFAULT_TRIGGER: f64 = 0.33;

/// Default threshold comparator level (two thirds of supply).
pub const DEFAULT_THRESHOLD: f64 = 0.66;

/// Bistable 555: set by a low trigger, cleared by a high threshold or reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer555 {
    /// Latched output state
    pub state: Level,
    /// TRIG below this sets the output
    pub trigger: f64,
    /// THRES above this clears the output
    pub threshold: f64,
}

impl Default for Timer555 {
    fn default() -> Self {
        Self {
            state: Level::Low,
            trigger: DEFAULT_TRIGGER,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Timer555 {
    /// Advance the latch one tick and return the level on pin `3`.
    ///
    /// RESET with no value present counts as released. Trigger takes
    /// precedence over threshold when both comparators fire.
    pub fn tick(&mut self, inputs: PinInputs<'_>) -> f64 {
        let reset_asserted = inputs.get("4").map(|v| v == 0.0).unwrap_or(false);

        if reset_asserted {
            self.state = Level::Low;
        } else if inputs.value("2") < self.trigger {
            self.state = Level::High;
        } else if inputs.value("6") > self.threshold {
            self.state = Level::Low;
        }

        self.state.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, PinValues};

    fn step(timer: &mut Timer555, pins: &[(&str, f64)]) -> f64 {
        let id = ComponentId::new("T");
        let mut values = PinValues::new();
        for (pin, v) in pins {
            values.insert(&id, pin, *v);
        }
        timer.tick(values.for_component(&id))
    }

    #[test]
    fn test_latch_holds_until_retriggered() {
        let mut timer = Timer555::default();

        assert_eq!(step(&mut timer, &[("2", 0.1), ("6", 0.0)]), 1.0);
        // Trigger released, still high
        assert_eq!(step(&mut timer, &[("2", 0.5), ("6", 0.5)]), 1.0);
        // Threshold crossed
        assert_eq!(step(&mut timer, &[("2", 0.5), ("6", 0.9)]), 0.0);
        // Threshold drops back, stays low
        assert_eq!(step(&mut timer, &[("2", 0.5), ("6", 0.1)]), 0.0);
        // Trigger again
        assert_eq!(step(&mut timer, &[("2", 0.2), ("6", 0.1)]), 1.0);
    }

    #[test]
    fn test_reset_forces_low() {
        let mut timer = Timer555 {
            state: Level::High,
            ..Timer555::default()
        };
        assert_eq!(step(&mut timer, &[("4", 0.0), ("2", 0.0)]), 0.0);
        assert_eq!(timer.state, Level::Low);
    }

    #[test]
    fn test_unwired_reset_is_released() {
        let mut timer = Timer555::default();
        // No inputs at all: TRIG reads 0, below the trigger level
        assert_eq!(timer.tick(PinInputs::EMPTY), 1.0);
    }

    #[test]
    fn test_trigger_wins_over_threshold() {
        let mut timer = Timer555::default();
        assert_eq!(step(&mut timer, &[("4", 1.0), ("2", 0.0), ("6", 1.0)]), 1.0);
    }

    #[test]
    fn test_custom_comparator_levels() {
        let mut timer = Timer555 {
            trigger: 0.1,
            threshold: 0.9,
            ..Timer555::default()
        };
        assert_eq!(step(&mut timer, &[("2", 0.2), ("6", 0.8)]), 0.0);
        assert_eq!(step(&mut timer, &[("2", 0.05), ("6", 0.8)]), 1.0);
        assert_eq!(step(&mut timer, &[("2", 0.2), ("6", 0.95)]), 0.0);
    }
}
