//! Net resolution: one value per net from all of its drivers.

use crate::circuit::{Netlist, PinRef, PinValues};

/// Resolve driver outputs into the per-pin value map for the next tick.
///
/// Each net takes the maximum of every value driven onto any of its pins
/// (wired-OR), or 0 when nothing drives it. That value is written to every
/// member pin regardless of direction, so two outputs wired together both
/// read the winning value. A driven pin outside any net keeps its own
/// value; pins neither wired nor driven are absent and read as 0.
pub fn resolve(netlist: &Netlist, drives: &PinValues) -> PinValues {
    let mut net_values = vec![0.0_f64; netlist.len()];
    let mut resolved = PinValues::new();

    for (component, pin, value) in drives.iter() {
        let pin_ref = PinRef::new(component.clone(), pin);
        match netlist.net_of(&pin_ref) {
            Some(net) => net_values[net.0] = net_values[net.0].max(value),
            None => resolved.set(&pin_ref, value),
        }
    }

    for (net, value) in netlist.nets().iter().zip(net_values) {
        for pin in &net.pins {
            resolved.set(pin, value);
        }
    }

    resolved
}
