//! Board descriptions: the component and wire lists a front end supplies.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "name": "Blink",
//!   "config": { "tickMs": 100 },
//!   "components": [
//!     { "id": "U1", "type": "Arduino Uno", "code": "void loop() { ... }" },
//!     { "id": "LED1", "type": "LED Lamp", "properties": { "color": "green" } },
//!     { "id": "S1", "type": "Toggle Switch", "state": true }
//!   ],
//!   "wires": [
//!     { "id": "w1", "startComponentId": "U1", "startPinId": "13",
//!       "endComponentId": "LED1", "endPinId": "IN" }
//!   ]
//! }
//! ```
//!
//! Component properties may sit in a `properties` object or directly on
//! the component record; `properties` wins when both set a key.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::circuit::{ComponentId, Wire};
use crate::components::{
    Category, Component, Device, Mcu, Oscilloscope, PartType, MAX_BREADBOARD_ROWS, MAX_SCOPE_HISTORY,
};
use crate::engine::SimulatorConfig;
use crate::error::{LabError, Result};
use crate::sketch::Level;

/// One component as it appears in a board file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Value>,
    /// Properties written inline on the record
    #[serde(flatten)]
    pub inline: HashMap<String, Value>,
}

impl ComponentRecord {
    /// Create a record with no properties.
    pub fn new(id: impl Into<ComponentId>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).or_else(|| self.inline.get(key))
    }

    fn prop_f64(&self, key: &str) -> Option<f64> {
        match self.prop(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn prop_bool(&self, key: &str) -> Option<bool> {
        match self.prop(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "high" | "1" => Some(true),
                "false" | "off" | "low" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key)?.as_str()
    }

    fn prop_level(&self, key: &str) -> Option<Level> {
        match self.prop(key)? {
            Value::String(s) => Level::from_token(s.trim()),
            _ => self.prop_bool(key).map(|high| if high { Level::High } else { Level::Low }),
        }
    }

    /// A non-negative count property, clamped to `max`.
    fn bounded(&self, key: &str, n: f64, max: usize) -> usize {
        if n > max as f64 {
            tracing::warn!(id = %self.id, property = key, value = n, max, "property too large, clamping");
            max
        } else {
            n as usize
        }
    }

    /// Build the typed component. Unknown type names become passive parts;
    /// unrecognized or malformed properties keep their defaults.
    pub fn to_component(&self, config: &SimulatorConfig) -> Component {
        let Some(part) = PartType::from_name(&self.type_name) else {
            tracing::warn!(id = %self.id, type_name = %self.type_name, "unknown component type, treating as passive");
            let category = self.category.unwrap_or(Category::Output);
            return Component::with_device(self.id.clone(), Device::passive(self.type_name.clone(), category));
        };

        let mut device = Device::default_for(part);
        match &mut device {
            Device::Mcu(mcu) => {
                let code = self.code.as_deref().or_else(|| self.prop_str("code"));
                if let Some(code) = code {
                    *mcu = Mcu::with_code(part, Some(code.to_string()));
                }
            }
            Device::Timer(timer) => {
                if let Some(level) = self.prop_level("state") {
                    timer.state = level;
                }
                if let Some(trigger) = self.prop_f64("trigger") {
                    timer.trigger = trigger;
                }
                if let Some(threshold) = self.prop_f64("threshold") {
                    timer.threshold = threshold;
                }
            }
            Device::ToggleSwitch(sw) => sw.on = self.prop_bool("state").unwrap_or(sw.on),
            Device::PushButton(button) => button.pressed = self.prop_bool("pressed").unwrap_or(button.pressed),
            Device::Potentiometer(pot) => {
                if let Some(rotation) = self.prop_f64("rotation") {
                    pot.set_rotation(rotation);
                }
            }
            Device::Photoresistor(ldr) => {
                if let Some(level) = self.prop_f64("value").or_else(|| self.prop_f64("level")) {
                    ldr.level = level;
                }
            }
            Device::Ultrasonic(sonar) => {
                if let Some(distance) = self.prop_f64("value").or_else(|| self.prop_f64("distance")) {
                    sonar.distance_cm = distance;
                }
            }
            Device::Pir(pir) => pir.motion = self.prop_bool("motion").unwrap_or(pir.motion),
            Device::Led(led) => {
                if let Some(color) = self.prop_str("color") {
                    led.color = color.to_string();
                }
            }
            Device::Oscilloscope(scope) => {
                let capacity = self
                    .prop_f64("historyLength")
                    .filter(|n| *n >= 1.0)
                    .map(|n| self.bounded("historyLength", n, MAX_SCOPE_HISTORY))
                    .unwrap_or(config.scope_history);
                let mut configured = Oscilloscope::with_capacity(capacity);
                configured.time_scale = self.prop_f64("timeScale").unwrap_or(configured.time_scale);
                configured.volt_scale = self.prop_f64("voltScale").unwrap_or(configured.volt_scale);
                *scope = configured;
            }
            Device::Multimeter(meter) => {
                if let Some(mode) = self.prop_str("mode") {
                    meter.mode = mode.to_string();
                }
            }
            Device::Breadboard { rows } => {
                if let Some(n) = self.prop_f64("rows").filter(|n| *n >= 0.0) {
                    *rows = self.bounded("rows", n, MAX_BREADBOARD_ROWS);
                }
            }
            Device::Gate(_) | Device::RgbLed | Device::ServoMotor | Device::SevenSegment | Device::Passive { .. } => {}
        }

        Component::with_device(self.id.clone(), device)
    }
}

/// Serialized board file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: SimulatorConfig,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

/// A loaded board: typed components plus the wire list.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub name: String,
    pub config: SimulatorConfig,
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
}

impl Board {
    /// Create an empty board.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a board from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        let file: BoardFile = serde_json::from_str(input)?;
        Self::from_file_data(file)
    }

    /// Load a board from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LabError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Build a board from already deserialized data.
    pub fn from_file_data(file: BoardFile) -> Result<Self> {
        file.config.validate()?;

        let mut board = Self::new(file.name);
        board.config = file.config;

        for record in &file.components {
            let component = record.to_component(&board.config);
            board.add_component(component)?;
        }

        for wire in &file.wires {
            for end in [&wire.start_component_id, &wire.end_component_id] {
                if board.find(end).is_none() {
                    tracing::warn!(wire = %wire.id, component = %end, "wire endpoint is not on the board");
                }
            }
        }
        board.wires = file.wires;

        tracing::debug!(
            name = %board.name,
            components = board.components.len(),
            wires = board.wires.len(),
            "loaded board"
        );
        Ok(board)
    }

    fn find(&self, id: &ComponentId) -> Option<usize> {
        self.components.iter().position(|c| &c.id == id)
    }

    /// Get a component by id.
    pub fn component(&self, id: &str) -> Result<&Component> {
        self.components
            .iter()
            .find(|c| c.id.as_str() == id)
            .ok_or_else(|| LabError::unknown_component(id))
    }

    /// Get a component by id for modification.
    pub fn component_mut(&mut self, id: &str) -> Result<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.id.as_str() == id)
            .ok_or_else(|| LabError::unknown_component(id))
    }

    /// Place a component. Ids must be unique.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        if self.find(&component.id).is_some() {
            return Err(LabError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove a component. Wires to it stay and become inert.
    pub fn remove_component(&mut self, id: &str) -> Result<Component> {
        let index = self
            .find(&ComponentId::new(id))
            .ok_or_else(|| LabError::unknown_component(id))?;
        Ok(self.components.remove(index))
    }

    /// Add a wire.
    pub fn connect(&mut self, wire: Wire) {
        self.wires.push(wire);
    }

    /// Remove every wire with the given id. Returns true if any was removed.
    pub fn disconnect(&mut self, wire_id: &str) -> bool {
        let before = self.wires.len();
        self.wires.retain(|w| w.id != wire_id);
        self.wires.len() != before
    }

    pub fn set_switch(&mut self, id: &str, on: bool) -> Result<()> {
        self.component_mut(id)?.set_switch(on)
    }

    pub fn set_pressed(&mut self, id: &str, pressed: bool) -> Result<()> {
        self.component_mut(id)?.set_pressed(pressed)
    }

    pub fn set_rotation(&mut self, id: &str, rotation: f64) -> Result<()> {
        self.component_mut(id)?.set_rotation(rotation)
    }

    pub fn set_reading(&mut self, id: &str, reading: f64) -> Result<()> {
        self.component_mut(id)?.set_reading(reading)
    }

    pub fn set_motion(&mut self, id: &str, motion: bool) -> Result<()> {
        self.component_mut(id)?.set_motion(motion)
    }

    pub fn set_code(&mut self, id: &str, code: impl Into<String>) -> Result<()> {
        self.component_mut(id)?.set_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{GateKind, Timer555};

    const BOARD: &str = r#"{
        "name": "demo",
        "config": { "tickMs": 50 },
        "components": [
            { "id": "U1", "type": "Arduino Uno", "code": "void loop() {}" },
            { "id": "S1", "type": "Toggle Switch", "state": true },
            { "id": "P1", "type": "Potentiometer", "properties": { "rotation": 1.7 } },
            { "id": "T1", "type": "555 Timer", "properties": { "state": "HIGH", "threshold": 0.8 } },
            { "id": "G1", "type": "XOR", "category": "GATE" },
            { "id": "BB", "type": "Breadboard", "properties": { "rows": 10 } },
            { "id": "X1", "type": "Buzzer", "category": "OUTPUT" }
        ],
        "wires": [
            { "id": "w1", "startComponentId": "S1", "startPinId": "OUT",
              "endComponentId": "G1", "endPinId": "A" }
        ]
    }"#;

    #[test]
    fn test_load_board() {
        let board = Board::from_json(BOARD).unwrap();
        assert_eq!(board.name, "demo");
        assert_eq!(board.config.tick_ms, 50);
        assert_eq!(board.components.len(), 7);
        assert_eq!(board.wires.len(), 1);

        match &board.component("U1").unwrap().device {
            Device::Mcu(mcu) => assert_eq!(mcu.code(), Some("void loop() {}")),
            other => panic!("expected MCU, got {:?}", other),
        }
        match &board.component("S1").unwrap().device {
            Device::ToggleSwitch(sw) => assert!(sw.on),
            other => panic!("expected switch, got {:?}", other),
        }
        match &board.component("P1").unwrap().device {
            Device::Potentiometer(pot) => assert_eq!(pot.rotation(), 1.0),
            other => panic!("expected potentiometer, got {:?}", other),
        }
        match &board.component("T1").unwrap().device {
            Device::Timer(timer) => {
                assert_eq!(timer.state, Level::High);
                assert_eq!(timer.threshold, 0.8);
                assert_eq!(timer.trigger, Timer555::default().trigger);
            }
            other => panic!("expected timer, got {:?}", other),
        }
        match &board.component("G1").unwrap().device {
            Device::Gate(gate) => assert_eq!(gate.kind, GateKind::Xor),
            other => panic!("expected gate, got {:?}", other),
        }
        assert_eq!(board.component("BB").unwrap().device.internal_short_count(), 10);
    }

    #[test]
    fn test_unknown_type_is_passive() {
        let board = Board::from_json(BOARD).unwrap();
        let buzzer = board.component("X1").unwrap();
        assert_eq!(buzzer.type_name(), "Buzzer");
        assert_eq!(buzzer.category(), Category::Output);
        assert_eq!(buzzer.device.part_type(), None);
    }

    #[test]
    fn test_default_mcu_code() {
        let board = Board::from_json(r#"{"components":[{"id":"E","type":"ESP32"}]}"#).unwrap();
        match &board.component("E").unwrap().device {
            Device::Mcu(mcu) => assert_eq!(mcu.code(), PartType::Esp32.default_code()),
            other => panic!("expected MCU, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"components":[{"id":"A","type":"AND"},{"id":"A","type":"OR"}]}"#;
        assert!(matches!(
            Board::from_json(json),
            Err(LabError::DuplicateComponent { ref id }) if id == "A"
        ));
    }

    #[test]
    fn test_bad_json_and_config() {
        assert!(matches!(Board::from_json("{"), Err(LabError::BoardFormat { .. })));
        assert!(matches!(
            Board::from_json(r#"{"config":{"tickMs":0}}"#),
            Err(LabError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_dangling_wire_kept() {
        let json = r#"{"components":[{"id":"A","type":"AND"}],
            "wires":[{"id":"w","startComponentId":"A","startPinId":"OUT",
                      "endComponentId":"ghost","endPinId":"IN"}]}"#;
        let board = Board::from_json(json).unwrap();
        assert_eq!(board.wires.len(), 1);
    }

    #[test]
    fn test_mutators() {
        let mut board = Board::from_json(BOARD).unwrap();
        board.set_rotation("P1", 0.25).unwrap();
        board.set_switch("S1", false).unwrap();
        assert!(matches!(board.set_switch("nope", true), Err(LabError::UnknownComponent { .. })));
        assert!(matches!(board.set_rotation("S1", 0.5), Err(LabError::WrongComponentKind { .. })));

        assert!(board.disconnect("w1"));
        assert!(!board.disconnect("w1"));
        let removed = board.remove_component("X1").unwrap();
        assert_eq!(removed.type_name(), "Buzzer");
        assert!(board.add_component(Component::new("S1", PartType::PushButton)).is_err());
    }

    #[test]
    fn test_record_properties() {
        let record = ComponentRecord::new("OSC", "Oscilloscope").with_property("historyLength", 5);
        match record.to_component(&SimulatorConfig::default()).device {
            Device::Oscilloscope(scope) => assert_eq!(scope.capacity(), 5),
            other => panic!("expected oscilloscope, got {:?}", other),
        }
        let record = ComponentRecord::new("OSC", "Oscilloscope");
        let config = SimulatorConfig::new().with_scope_history(12);
        match record.to_component(&config).device {
            Device::Oscilloscope(scope) => assert_eq!(scope.capacity(), 12),
            other => panic!("expected oscilloscope, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_counts_are_clamped() {
        let json = r#"{"components":[
            {"id":"OSC","type":"Oscilloscope","properties":{"historyLength":1e15}},
            {"id":"BB","type":"Breadboard","rows":1e12}
        ]}"#;
        let board = Board::from_json(json).unwrap();
        match &board.component("OSC").unwrap().device {
            Device::Oscilloscope(scope) => assert_eq!(scope.capacity(), MAX_SCOPE_HISTORY),
            other => panic!("expected oscilloscope, got {:?}", other),
        }
        assert_eq!(board.component("BB").unwrap().device.internal_short_count(), MAX_BREADBOARD_ROWS);

        let oversized = format!(r#"{{"config":{{"scopeHistory":{}}}}}"#, MAX_SCOPE_HISTORY + 1);
        assert!(matches!(Board::from_json(&oversized), Err(LabError::InvalidConfig { .. })));
    }
}
