//! Tick engine.
//!
//! One tick runs, in order and synchronously:
//!
//! 1. Every microcontroller evaluates its sketch at the current time
//! 2. The netlist is built (or reused) from the current wiring
//! 3. Every component drives its pins from the previous tick's values
//! 4. Drives are resolved per net (wired-OR) and fanned out to member pins
//!
//! The resolved map is both the tick's output and the next tick's input,
//! so a signal crosses one combinational stage per tick. Feedback loops
//! lag or oscillate visibly rather than settling within a tick.

mod resolve;
mod simulator;

pub use resolve::resolve;
pub use simulator::{Simulator, SimulatorConfig};
