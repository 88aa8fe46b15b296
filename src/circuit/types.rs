//! Core types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a placed component, unique on a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Create a new component id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single pin on a single component: the vertex type of the netlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub component: ComponentId,
    pub pin: String,
}

impl PinRef {
    /// Create a new pin reference.
    pub fn new(component: impl Into<ComponentId>, pin: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            pin: pin.into(),
        }
    }

    /// Parse the `component:pin` form used by probes and the WASM bridge.
    ///
    /// The split happens at the last `:` so component ids may contain colons.
    pub fn parse(text: &str) -> Option<Self> {
        let (component, pin) = text.trim().rsplit_once(':')?;
        if component.is_empty() || pin.is_empty() {
            return None;
        }
        Some(Self::new(component, pin))
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.pin)
    }
}

/// An undirected wire between two pins.
///
/// Field names serialize in the camelCase shape the front end produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub start_component_id: ComponentId,
    pub start_pin_id: String,
    pub end_component_id: ComponentId,
    pub end_pin_id: String,
}

impl Wire {
    /// Create a wire between two pins.
    pub fn new(id: impl Into<String>, start: PinRef, end: PinRef) -> Self {
        Self {
            id: id.into(),
            start_component_id: start.component,
            start_pin_id: start.pin,
            end_component_id: end.component,
            end_pin_id: end.pin,
        }
    }

    /// Get the start pin.
    pub fn start(&self) -> PinRef {
        PinRef::new(self.start_component_id.clone(), self.start_pin_id.clone())
    }

    /// Get the end pin.
    pub fn end(&self) -> PinRef {
        PinRef::new(self.end_component_id.clone(), self.end_pin_id.clone())
    }

    /// True if both ends land on the same pin.
    pub fn is_self_loop(&self) -> bool {
        self.start_component_id == self.end_component_id && self.start_pin_id == self.end_pin_id
    }
}
