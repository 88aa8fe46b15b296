//! Circuit connectivity.
//!
//! This module holds the identifiers shared by every stage of a tick
//! ([`ComponentId`], [`PinRef`], [`Wire`]), the per-pin value map that
//! flows between stages ([`PinValues`]), and the [`Netlist`] builder that
//! partitions connected pins into nets.

mod netlist;
mod types;
mod values;

pub use netlist::{Net, NetId, Netlist, NetlistCache};
pub use types::*;
pub use values::{PinInputs, PinValues};
