//! # Labsim Core
//!
//! A tick-driven digital circuit simulator for breadboard and
//! microcontroller labs.
//!
//! This library provides:
//! - A catalog of lab parts (MCU boards, logic gates, a 555 timer, sensors,
//!   switches, LEDs and instruments) with their pin layouts
//! - Netlist construction from wires and breadboard row shorts
//! - Wired-OR net resolution with one-tick propagation latency
//! - A forgiving interpreter for Arduino-style `digitalWrite`/`delay` sketches
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`components`] - Part catalog and per-part driver behavior
//! - [`circuit`] - Identifiers, wires, pin value maps and netlists
//! - [`sketch`] - Parser and timeline evaluator for MCU source
//! - [`engine`] - Net resolver and the tick clock
//! - [`board`] - JSON board descriptions
//! - [`probe`] - CSV waveform output (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! labsim blink.json --ticks 40 --probe U1:13
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use labsim_core::{board::Board, circuit::PinRef, Simulator};
//!
//! let mut board = Board::from_json(r#"{ "components": [], "wires": [] }"#)?;
//! let mut sim = Simulator::with_config(board.config.clone());
//! let values = sim.step_board(&mut board);
//! println!("{}", values.value(&PinRef::new("LED1", "IN")));
//! # Ok::<(), labsim_core::LabError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmLabSim } from 'labsim_core';
//!
//! const sim = new WasmLabSim(boardJson);
//! const values = JSON.parse(sim.tick());
//! ```
//!
//! ## Tick Semantics
//!
//! Every tick evaluates all components against the values resolved on the
//! previous tick, so each combinational stage adds one tick of delay.
//! A net driven by several outputs takes the largest value (wired-OR).
//! Sketches are evaluated as periodic waveforms of simulated time rather
//! than executed step by step.

pub mod board;
pub mod circuit;
pub mod components;
pub mod engine;
pub mod error;
pub mod sketch;

#[cfg(feature = "cli")]
pub mod probe;

// Re-export main types for convenience
pub use board::Board;
pub use circuit::{ComponentId, PinRef, PinValues, Wire};
pub use components::{Component, PartType};
pub use engine::{Simulator, SimulatorConfig};
pub use error::{LabError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmLabSim;

/// Default tick period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;
