//! WASM bindings for Labsim Core.
//!
//! This module provides JavaScript-friendly bindings for driving the
//! simulator from a browser front end on a `setInterval` tick.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmLabSim } from 'labsim_core';
//!
//! await init();
//!
//! const sim = new WasmLabSim(JSON.stringify(board));
//!
//! setInterval(() => {
//!   const values = JSON.parse(sim.tick());
//!   led.lit = values['LED1:IN'] > 0.5;
//! }, 100);
//!
//! sim.set_switch('S1', true);
//! const scope = JSON.parse(sim.display_state('OSC1'));
//! ```

use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::circuit::{ComponentId, PinRef};
use crate::engine::Simulator;
use crate::error::LabError;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: LabError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible lab simulator.
///
/// Owns a loaded board and the simulator ticking it.
#[wasm_bindgen]
pub struct WasmLabSim {
    board: Board,
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmLabSim {
    /// Create a new simulator from a board description in JSON.
    ///
    /// # Example
    /// ```javascript
    /// const sim = new WasmLabSim(boardJson);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(board_json: &str) -> Result<WasmLabSim, JsValue> {
        let board = Board::from_json(board_json).map_err(to_js)?;
        let simulator = Simulator::with_config(board.config.clone());
        Ok(WasmLabSim { board, simulator })
    }

    /// Run one tick and return the resolved values as a JSON object
    /// keyed `"component:pin"`.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let values = self.simulator.step_board(&mut self.board).to_keyed_map();
        serde_json::to_string(&values).map_err(|e| {
            to_js(LabError::WasmError {
                message: e.to_string(),
            })
        })
    }

    /// Resolved value of one pin after the last tick (0 if undriven).
    #[wasm_bindgen]
    pub fn pin_value(&self, component: &str, pin: &str) -> f64 {
        self.simulator.pin_value(&PinRef::new(ComponentId::new(component), pin))
    }

    /// Set a toggle switch.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, component: &str, on: bool) -> Result<(), JsValue> {
        self.board.set_switch(component, on).map_err(to_js)
    }

    /// Press or release a push button.
    #[wasm_bindgen]
    pub fn set_pressed(&mut self, component: &str, pressed: bool) -> Result<(), JsValue> {
        self.board.set_pressed(component, pressed).map_err(to_js)
    }

    /// Turn a potentiometer (0..1).
    #[wasm_bindgen]
    pub fn set_rotation(&mut self, component: &str, rotation: f64) -> Result<(), JsValue> {
        self.board.set_rotation(component, rotation).map_err(to_js)
    }

    /// Set a photoresistor's light level or an ultrasonic ranger's
    /// distance in centimeters.
    #[wasm_bindgen]
    pub fn set_reading(&mut self, component: &str, reading: f64) -> Result<(), JsValue> {
        self.board.set_reading(component, reading).map_err(to_js)
    }

    /// Report motion to a PIR sensor.
    #[wasm_bindgen]
    pub fn set_motion(&mut self, component: &str, motion: bool) -> Result<(), JsValue> {
        self.board.set_motion(component, motion).map_err(to_js)
    }

    /// What a display part or instrument shows after the last tick, as
    /// JSON (`null` for parts with nothing to show).
    #[wasm_bindgen]
    pub fn display_state(&self, component: &str) -> Result<String, JsValue> {
        let state = self
            .board
            .component(component)
            .map_err(to_js)?
            .display(self.simulator.values());
        serde_json::to_string(&state).map_err(|e| {
            to_js(LabError::WasmError {
                message: e.to_string(),
            })
        })
    }

    /// Replace a microcontroller's sketch.
    #[wasm_bindgen]
    pub fn set_code(&mut self, component: &str, code: &str) -> Result<(), JsValue> {
        self.board.set_code(component, code).map_err(to_js)
    }

    /// Simulated time of the next tick, in milliseconds.
    #[wasm_bindgen(getter)]
    pub fn time_ms(&self) -> f64 {
        self.simulator.time_ms() as f64
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default tick period in milliseconds.
#[wasm_bindgen]
pub fn default_tick_ms() -> f64 {
    crate::DEFAULT_TICK_MS as f64
}
