//! Per-pin value maps.
//!
//! The same shape carries driver outputs, resolved net values, and the
//! inputs threaded into the next tick. Values are plain `f64`: digital
//! levels are 0/1, analog readings are normalized to 0..1.

use std::collections::{BTreeMap, HashMap};

use super::types::{ComponentId, PinRef};

/// Values keyed by component, then by pin id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinValues {
    pins: HashMap<ComponentId, HashMap<String, f64>>,
}

impl PinValues {
    /// Create an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a pin, if one was recorded.
    pub fn get(&self, component: &ComponentId, pin: &str) -> Option<f64> {
        self.pins.get(component)?.get(pin).copied()
    }

    /// Get the value of a pin, defaulting to 0 (undriven).
    pub fn value(&self, pin: &PinRef) -> f64 {
        self.get(&pin.component, &pin.pin).unwrap_or(0.0)
    }

    /// Record a value, replacing any previous one.
    pub fn insert(&mut self, component: &ComponentId, pin: &str, value: f64) {
        self.pins
            .entry(component.clone())
            .or_default()
            .insert(pin.to_string(), value);
    }

    /// Record a value for a pin reference.
    pub fn set(&mut self, pin: &PinRef, value: f64) {
        self.insert(&pin.component, &pin.pin, value);
    }

    /// View one component's pins.
    pub fn for_component(&self, component: &ComponentId) -> PinInputs<'_> {
        PinInputs {
            pins: self.pins.get(component),
        }
    }

    /// Number of pins with a recorded value.
    pub fn len(&self) -> usize {
        self.pins.values().map(HashMap::len).sum()
    }

    /// True if no pin has a recorded value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.pins.clear();
    }

    /// Iterate over all recorded values in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &str, f64)> {
        self.pins
            .iter()
            .flat_map(|(id, pins)| pins.iter().map(move |(pin, v)| (id, pin.as_str(), *v)))
    }

    /// All recorded values sorted by pin reference.
    pub fn sorted(&self) -> Vec<(PinRef, f64)> {
        let mut out: Vec<_> = self
            .iter()
            .map(|(id, pin, v)| (PinRef::new(id.clone(), pin), v))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Flatten into a `"component:pin" -> value` map.
    pub fn to_keyed_map(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(id, pin, v)| (format!("{}:{}", id, pin), v))
            .collect()
    }
}

/// Read-only view of one component's pin values.
///
/// Missing pins read as 0 through [`PinInputs::value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PinInputs<'a> {
    pins: Option<&'a HashMap<String, f64>>,
}

impl<'a> PinInputs<'a> {
    /// A view with no values at all.
    pub const EMPTY: PinInputs<'static> = PinInputs { pins: None };

    /// Get a pin's value if one is present.
    pub fn get(&self, pin: &str) -> Option<f64> {
        self.pins?.get(pin).copied()
    }

    /// Get a pin's value, defaulting to 0.
    pub fn value(&self, pin: &str) -> f64 {
        self.get(pin).unwrap_or(0.0)
    }

    /// Nonzero is logic high.
    pub fn is_high(&self, pin: &str) -> bool {
        self.value(pin) != 0.0
    }
}
