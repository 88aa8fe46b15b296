//! Microcontroller boards running an interpreted sketch.

use std::collections::BTreeMap;

use super::registry::{PartType, PinDirection};
use crate::sketch::{self, Program};

/// A program together with the exact source it was compiled from.
#[derive(Debug, Clone, PartialEq)]
struct LoadedProgram {
    source: String,
    program: Program,
}

/// An MCU board: its sketch source, the cached compiled program and the
/// retained level of every pin the sketch has written.
#[derive(Debug, Clone, PartialEq)]
pub struct Mcu {
    pub board: PartType,
    code: Option<String>,
    loaded: Option<LoadedProgram>,
    pin_state: BTreeMap<String, f64>,
}

impl Mcu {
    /// Create a board loaded with its default sketch.
    pub fn new(board: PartType) -> Self {
        Self::with_code(board, board.default_code().map(str::to_string))
    }

    /// Create a board with explicit (or no) sketch source.
    pub fn with_code(board: PartType, code: Option<String>) -> Self {
        Self {
            board,
            code,
            loaded: None,
            pin_state: BTreeMap::new(),
        }
    }

    /// Current sketch source.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Replace the sketch. It is recompiled on the next [`Mcu::run`];
    /// pin levels already written are retained.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
    }

    /// The compiled program, once the board has run at least once.
    pub fn program(&self) -> Option<&Program> {
        self.loaded.as_ref().map(|l| &l.program)
    }

    /// Retained sketch-driven pin levels.
    pub fn pin_state(&self) -> &BTreeMap<String, f64> {
        &self.pin_state
    }

    /// Evaluate the sketch at simulated time `time_ms`.
    ///
    /// Recompiles when the source differs from the cached one, applying
    /// `setup()` writes once per (re)load.
    pub fn run(&mut self, time_ms: u64, min_cycle_ms: u64) {
        let source = self.code.as_deref().unwrap_or("");
        let stale = self.loaded.as_ref().map_or(true, |l| l.source != source);

        if stale {
            let program = sketch::compile(source);
            tracing::debug!(
                board = self.board.name(),
                events = program.timeline.events.len(),
                cycle_ms = program.timeline.cycle_ms(min_cycle_ms),
                has_loop = program.has_loop,
                "loaded sketch"
            );
            program.run_setup(&mut self.pin_state);
            self.loaded = Some(LoadedProgram {
                source: source.to_string(),
                program,
            });
        }

        if let Some(loaded) = &self.loaded {
            loaded.program.run_loop(time_ms, min_cycle_ms, &mut self.pin_state);
        }
    }

    /// Pin outputs: sketch levels, then the supply rails on top.
    pub fn outputs(&self) -> BTreeMap<String, f64> {
        let mut out = self.pin_state.clone();
        for spec in self.board.pins() {
            match spec.direction {
                PinDirection::Power if matches!(spec.id, "5V" | "3V3") => {
                    out.insert(spec.id.to_string(), 1.0);
                }
                PinDirection::Ground => {
                    out.insert(spec.id.to_string(), 0.0);
                }
                _ => {}
            }
        }
        out
    }

    /// Drop the cached program and all pin levels.
    pub fn reset(&mut self) {
        self.loaded = None;
        self.pin_state.clear();
    }
}
