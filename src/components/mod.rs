//! Component models for the lab simulator.
//!
//! This module provides models for every part in the catalog:
//! - MCU: Arduino Uno, ESP32, Raspberry Pi Pico (sketch-driven pins)
//! - Gates: AND, OR, NOT, NAND, NOR, XOR, plus the 555 timer latch
//! - Sensors: Photoresistor, Ultrasonic, PIR
//! - Inputs: Toggle Switch, Push Button, Potentiometer
//! - Outputs and tools: LEDs, servo, 7-segment, oscilloscope, multimeter,
//!   breadboard
//!
//! Each component evaluates to the values it drives on its own pins,
//! given the inputs resolved on the previous tick.

mod controls;
mod gates;
mod instruments;
mod mcu;
mod outputs;
pub mod registry;
mod sensors;
mod timer;

pub use controls::{Potentiometer, PushButton, ToggleSwitch};
pub use gates::{Gate, GateKind};
pub use instruments::{Multimeter, Oscilloscope, DEFAULT_SCOPE_HISTORY, MAX_SCOPE_HISTORY};
pub use mcu::Mcu;
pub use outputs::{lit_segments, rgb_color, servo_angle, DisplayState, Led, SEGMENTS};
pub use registry::{
    breadboard_pins, Category, PartType, Pin, PinDirection, PinSpec, DEFAULT_BREADBOARD_ROWS,
    MAX_BREADBOARD_ROWS,
};
pub use sensors::{PirSensor, Photoresistor, Ultrasonic};
pub use timer::{Timer555, DEFAULT_THRESHOLD, DEFAULT_TRIGGER};

use std::collections::BTreeMap;

use crate::circuit::{ComponentId, PinInputs, PinValues};
use crate::error::{LabError, Result};

/// Per-kind state of a placed part.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Mcu(Mcu),
    Gate(Gate),
    Timer(Timer555),
    ToggleSwitch(ToggleSwitch),
    PushButton(PushButton),
    Potentiometer(Potentiometer),
    Photoresistor(Photoresistor),
    Ultrasonic(Ultrasonic),
    Pir(PirSensor),
    Led(Led),
    RgbLed,
    ServoMotor,
    SevenSegment,
    Oscilloscope(Oscilloscope),
    Multimeter(Multimeter),
    Breadboard { rows: usize },
    /// A type the catalog does not know; drives nothing
    Passive { type_name: String, category: Category },
}

impl Device {
    /// Default state for a catalog part.
    pub fn default_for(part: PartType) -> Self {
        match part {
            PartType::ArduinoUno | PartType::Esp32 | PartType::RaspberryPiPico => Self::Mcu(Mcu::new(part)),
            PartType::And | PartType::Or | PartType::Not | PartType::Nand | PartType::Nor | PartType::Xor => {
                match GateKind::from_part(part) {
                    Some(kind) => Self::Gate(Gate::new(kind)),
                    None => Self::passive(part.name(), part.category()),
                }
            }
            PartType::Timer555 => Self::Timer(Timer555::default()),
            PartType::Photoresistor => Self::Photoresistor(Photoresistor::default()),
            PartType::Ultrasonic => Self::Ultrasonic(Ultrasonic::default()),
            PartType::PirSensor => Self::Pir(PirSensor::default()),
            PartType::ToggleSwitch => Self::ToggleSwitch(ToggleSwitch::default()),
            PartType::PushButton => Self::PushButton(PushButton::default()),
            PartType::Potentiometer => Self::Potentiometer(Potentiometer::default()),
            PartType::LedLamp => Self::Led(Led::default()),
            PartType::RgbLed => Self::RgbLed,
            PartType::ServoMotor => Self::ServoMotor,
            PartType::SevenSegment => Self::SevenSegment,
            PartType::Oscilloscope => Self::Oscilloscope(Oscilloscope::default()),
            PartType::Multimeter => Self::Multimeter(Multimeter::default()),
            PartType::Breadboard => Self::Breadboard {
                rows: DEFAULT_BREADBOARD_ROWS,
            },
        }
    }

    /// A passive part of an unknown type.
    pub fn passive(type_name: impl Into<String>, category: Category) -> Self {
        Self::Passive {
            type_name: type_name.into(),
            category,
        }
    }

    /// The catalog entry, or `None` for passive unknown types.
    pub fn part_type(&self) -> Option<PartType> {
        let part = match self {
            Self::Mcu(mcu) => mcu.board,
            Self::Gate(gate) => gate.kind.part(),
            Self::Timer(_) => PartType::Timer555,
            Self::ToggleSwitch(_) => PartType::ToggleSwitch,
            Self::PushButton(_) => PartType::PushButton,
            Self::Potentiometer(_) => PartType::Potentiometer,
            Self::Photoresistor(_) => PartType::Photoresistor,
            Self::Ultrasonic(_) => PartType::Ultrasonic,
            Self::Pir(_) => PartType::PirSensor,
            Self::Led(_) => PartType::LedLamp,
            Self::RgbLed => PartType::RgbLed,
            Self::ServoMotor => PartType::ServoMotor,
            Self::SevenSegment => PartType::SevenSegment,
            Self::Oscilloscope(_) => PartType::Oscilloscope,
            Self::Multimeter(_) => PartType::Multimeter,
            Self::Breadboard { .. } => PartType::Breadboard,
            Self::Passive { .. } => return None,
        };
        Some(part)
    }

    /// The type name as the front end spells it.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Passive { type_name, .. } => type_name,
            other => other.part_type().map(|p| p.name()).unwrap_or_default(),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Passive { category, .. } => *category,
            other => other.part_type().map(|p| p.category()).unwrap_or(Category::Output),
        }
    }

    /// Pin layout: the catalog table, or generated rows for a breadboard.
    pub fn pins(&self) -> Vec<Pin> {
        match self {
            Self::Breadboard { rows } => breadboard_pins(*rows),
            other => other
                .part_type()
                .map(|p| p.pins().iter().map(Pin::from).collect())
                .unwrap_or_default(),
        }
    }

    /// Pin pairs tied together inside the part (breadboard `Ln`-`Rn`).
    pub fn internal_shorts(&self) -> Vec<(String, String)> {
        match self {
            Self::Breadboard { rows } => (1..=*rows).map(|i| (format!("L{}", i), format!("R{}", i))).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of internal shorts, without materializing them.
    pub fn internal_short_count(&self) -> usize {
        match self {
            Self::Breadboard { rows } => *rows,
            _ => 0,
        }
    }

    /// Advance sketch execution. No-op for everything but MCUs.
    pub fn run_program(&mut self, time_ms: u64, min_cycle_ms: u64) {
        if let Self::Mcu(mcu) = self {
            mcu.run(time_ms, min_cycle_ms);
        }
    }

    /// Evaluate the part: the value it drives on each of its output pins.
    ///
    /// `inputs` are the part's own pins as resolved on the previous tick.
    /// Stateful parts (555 latch, oscilloscope) update themselves here.
    pub fn drive(&mut self, inputs: PinInputs<'_>) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        match self {
            Self::Mcu(mcu) => return mcu.outputs(),
            Self::Gate(gate) => {
                out.insert("OUT".to_string(), gate.output(inputs));
            }
            Self::Timer(timer) => {
                out.insert("3".to_string(), timer.tick(inputs));
            }
            Self::ToggleSwitch(sw) => {
                out.insert("OUT".to_string(), sw.output());
            }
            Self::PushButton(button) => {
                out.insert("OUT".to_string(), button.output());
            }
            Self::Potentiometer(pot) => {
                out.insert("OUT".to_string(), pot.output());
            }
            Self::Photoresistor(ldr) => {
                out.insert("OUT".to_string(), ldr.output());
            }
            Self::Ultrasonic(sonar) => {
                out.insert("ECHO".to_string(), sonar.output());
            }
            Self::Pir(pir) => {
                out.insert("OUT".to_string(), pir.output());
            }
            Self::Oscilloscope(scope) => scope.record(inputs),
            Self::Led(_)
            | Self::RgbLed
            | Self::ServoMotor
            | Self::SevenSegment
            | Self::Multimeter(_)
            | Self::Breadboard { .. }
            | Self::Passive { .. } => {}
        }
        out
    }
}

impl Device {
    /// What an output part or instrument shows, given its resolved inputs.
    /// `None` for parts with nothing to display.
    pub fn display(&self, inputs: PinInputs<'_>) -> Option<DisplayState> {
        let state = match self {
            Self::Led(led) => DisplayState::Led {
                color: led.color.clone(),
                brightness: led.brightness(inputs),
            },
            Self::RgbLed => DisplayState::Rgb {
                color: rgb_color(inputs),
            },
            Self::ServoMotor => DisplayState::Servo {
                angle: servo_angle(inputs),
            },
            Self::SevenSegment => DisplayState::SevenSegment {
                segments: lit_segments(inputs),
            },
            Self::Oscilloscope(scope) => DisplayState::Scope {
                samples: scope.history().collect(),
            },
            Self::Multimeter(meter) => DisplayState::Meter {
                mode: meter.mode.clone(),
                reading: meter.reading(inputs),
            },
            _ => return None,
        };
        Some(state)
    }
}

/// A part placed on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub device: Device,
}

impl Component {
    /// Place a catalog part with its default state.
    pub fn new(id: impl Into<ComponentId>, part: PartType) -> Self {
        Self::with_device(id, Device::default_for(part))
    }

    /// Place a part with explicit state.
    pub fn with_device(id: impl Into<ComponentId>, device: Device) -> Self {
        Self { id: id.into(), device }
    }

    pub fn type_name(&self) -> &str {
        self.device.type_name()
    }

    pub fn category(&self) -> Category {
        self.device.category()
    }

    /// Display state from this part's resolved pins. See [`Device::display`].
    pub fn display(&self, values: &PinValues) -> Option<DisplayState> {
        self.device.display(values.for_component(&self.id))
    }

    /// Evaluate this part's drivers. See [`Device::drive`].
    pub fn drive(&mut self, inputs: PinInputs<'_>) -> BTreeMap<String, f64> {
        self.device.drive(inputs)
    }

    fn wrong_kind(&self, expected: &'static str) -> LabError {
        LabError::wrong_kind(self.id.as_str(), expected, self.type_name())
    }

    /// Set a toggle switch on or off.
    pub fn set_switch(&mut self, on: bool) -> Result<()> {
        match &mut self.device {
            Device::ToggleSwitch(sw) => {
                sw.set_state(on);
                Ok(())
            }
            _ => Err(self.wrong_kind("Toggle Switch")),
        }
    }

    /// Press or release a push button.
    pub fn set_pressed(&mut self, pressed: bool) -> Result<()> {
        match &mut self.device {
            Device::PushButton(button) => {
                button.set_pressed(pressed);
                Ok(())
            }
            _ => Err(self.wrong_kind("Push Button")),
        }
    }

    /// Turn a potentiometer; clamped to 0..1.
    pub fn set_rotation(&mut self, rotation: f64) -> Result<()> {
        match &mut self.device {
            Device::Potentiometer(pot) => {
                pot.set_rotation(rotation);
                Ok(())
            }
            _ => Err(self.wrong_kind("Potentiometer")),
        }
    }

    /// Set a sensor's raw reading: light level for a photoresistor,
    /// centimeters for an ultrasonic ranger.
    pub fn set_reading(&mut self, reading: f64) -> Result<()> {
        match &mut self.device {
            Device::Photoresistor(ldr) => ldr.level = reading,
            Device::Ultrasonic(sonar) => sonar.distance_cm = reading,
            _ => return Err(self.wrong_kind("Photoresistor or Ultrasonic")),
        }
        Ok(())
    }

    /// Report motion (or its absence) to a PIR sensor.
    pub fn set_motion(&mut self, motion: bool) -> Result<()> {
        match &mut self.device {
            Device::Pir(pir) => {
                pir.motion = motion;
                Ok(())
            }
            _ => Err(self.wrong_kind("PIR Sensor")),
        }
    }

    /// Replace a microcontroller's sketch.
    pub fn set_code(&mut self, code: impl Into<String>) -> Result<()> {
        match &mut self.device {
            Device::Mcu(mcu) => {
                mcu.set_code(code);
                Ok(())
            }
            _ => Err(self.wrong_kind("microcontroller")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_part_round_trips_its_type() {
        for part in PartType::ALL {
            let device = Device::default_for(part);
            assert_eq!(device.part_type(), Some(part));
            assert_eq!(device.type_name(), part.name());
            assert_eq!(device.category(), part.category());
        }
    }

    #[test]
    fn test_breadboard_shorts() {
        let device = Device::Breadboard { rows: 3 };
        assert_eq!(device.pins().len(), 6);
        assert_eq!(device.internal_short_count(), 3);
        assert_eq!(
            device.internal_shorts()[2],
            ("L3".to_string(), "R3".to_string())
        );
    }

    #[test]
    fn test_passive_drives_nothing() {
        let mut device = Device::passive("Flux Capacitor", Category::Tool);
        assert_eq!(device.part_type(), None);
        assert_eq!(device.type_name(), "Flux Capacitor");
        assert!(device.pins().is_empty());
        assert!(device.drive(PinInputs::EMPTY).is_empty());
    }

    #[test]
    fn test_drive_dispatch() {
        let mut values = PinValues::new();
        let id = ComponentId::new("G");
        values.insert(&id, "A", 1.0);
        values.insert(&id, "B", 1.0);

        let mut gate = Component::new("G", PartType::Nand);
        assert_eq!(gate.drive(values.for_component(&id)).get("OUT"), Some(&0.0));

        let mut sonar = Component::new("U", PartType::Ultrasonic);
        assert_eq!(sonar.drive(PinInputs::EMPTY).get("ECHO"), Some(&0.25));

        let mut timer = Component::new("T", PartType::Timer555);
        assert_eq!(timer.drive(PinInputs::EMPTY).get("3"), Some(&1.0));

        let mut led = Component::new("L", PartType::LedLamp);
        assert!(led.drive(values.for_component(&id)).is_empty());
    }

    #[test]
    fn test_mutators_check_kind() {
        let mut sw = Component::new("S1", PartType::ToggleSwitch);
        sw.set_switch(true).unwrap();
        assert_eq!(sw.drive(PinInputs::EMPTY).get("OUT"), Some(&1.0));

        let err = sw.set_rotation(0.5).unwrap_err();
        assert!(matches!(err, LabError::WrongComponentKind { ref id, .. } if id == "S1"));

        let mut pot = Component::new("P1", PartType::Potentiometer);
        pot.set_rotation(0.75).unwrap();
        assert_eq!(pot.drive(PinInputs::EMPTY).get("OUT"), Some(&0.75));

        let mut mcu = Component::new("U1", PartType::Esp32);
        mcu.set_code("void loop() {}").unwrap();
        assert!(mcu.set_motion(true).is_err());
    }

    #[test]
    fn test_display_state() {
        let mut values = PinValues::new();
        let led = Component::new("L1", PartType::LedLamp);
        let meter = Component::new("DMM", PartType::Multimeter);
        values.insert(&led.id, "IN", 1.0);
        values.insert(&meter.id, "V+", 0.75);

        assert_eq!(
            led.display(&values),
            Some(DisplayState::Led {
                color: "red".to_string(),
                brightness: 1.0
            })
        );
        assert_eq!(
            meter.display(&values),
            Some(DisplayState::Meter {
                mode: "VOLTS".to_string(),
                reading: 0.75
            })
        );
        assert_eq!(
            Component::new("M1", PartType::ServoMotor).display(&values),
            Some(DisplayState::Servo { angle: 0.0 })
        );
        assert_eq!(Component::new("S1", PartType::ToggleSwitch).display(&values), None);

        let json = serde_json::to_value(led.display(&values)).unwrap();
        assert_eq!(json["kind"], "led");
        assert_eq!(json["brightness"], 1.0);
    }

    #[test]
    fn test_scope_records_during_drive() {
        let mut scope = Component::new("OSC", PartType::Oscilloscope);
        let id = ComponentId::new("OSC");
        let mut values = PinValues::new();
        values.insert(&id, "IN", 0.5);
        scope.drive(values.for_component(&id));
        scope.drive(PinInputs::EMPTY);
        match &scope.device {
            Device::Oscilloscope(osc) => assert_eq!(osc.history().collect::<Vec<_>>(), vec![0.5, 0.0]),
            other => panic!("expected oscilloscope, got {:?}", other),
        }
    }
}
