//! Compiled sketch: resolved variables plus a cyclic write timeline.

use std::collections::BTreeMap;

use super::ast::{Instruction, Level, Operand, Sketch};

/// Shortest loop period, so phase arithmetic always has a nonzero modulus.
pub const DEFAULT_MIN_CYCLE_MS: u64 = 100;

/// One `digitalWrite` placed on the loop timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteEvent {
    /// Time since the start of the loop iteration
    pub offset_ms: u64,
    pub pin: String,
    pub level: Level,
}

/// The loop body flattened into timed writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    /// Writes in source order; offsets never decrease
    pub events: Vec<WriteEvent>,
    /// Sum of all delays in one iteration, before clamping
    pub length_ms: u64,
}

impl Timeline {
    /// Build the timeline by walking the instructions in source order.
    pub fn compile(instructions: &[Instruction], variables: &BTreeMap<String, f64>) -> Self {
        let mut offset = 0u64;
        let mut events = Vec::new();

        for instruction in instructions {
            match instruction {
                Instruction::DigitalWrite { pin, level, .. } => events.push(WriteEvent {
                    offset_ms: offset,
                    pin: resolve_pin(pin, variables),
                    level: *level,
                }),
                Instruction::Delay { duration, .. } => {
                    offset = offset.saturating_add(resolve_delay(duration, variables));
                }
            }
        }

        Self {
            events,
            length_ms: offset,
        }
    }

    /// The loop period, never shorter than `min_cycle_ms` (itself at least 1).
    pub fn cycle_ms(&self, min_cycle_ms: u64) -> u64 {
        self.length_ms.max(min_cycle_ms).max(1)
    }

    /// Position within the current iteration at simulated time `time_ms`.
    pub fn phase(&self, time_ms: u64, min_cycle_ms: u64) -> u64 {
        time_ms % self.cycle_ms(min_cycle_ms)
    }

    /// Levels in effect at `phase`: for each pin, the last write at or
    /// before that offset. Pins with no such write are absent.
    pub fn levels_at(&self, phase: u64) -> BTreeMap<String, Level> {
        let mut levels = BTreeMap::new();
        for event in self.events.iter().take_while(|e| e.offset_ms <= phase) {
            levels.insert(event.pin.clone(), event.level);
        }
        levels
    }

    /// Apply the levels in effect at `phase` onto retained pin state.
    pub fn apply(&self, phase: u64, pins: &mut BTreeMap<String, f64>) {
        for (pin, level) in self.levels_at(phase) {
            pins.insert(pin, level.value());
        }
    }
}

/// A sketch ready to run: what the interpreter caches per source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Values bound by declarations, last one wins
    pub variables: BTreeMap<String, f64>,
    /// Writes in `setup()`, applied once when the program loads
    pub setup_writes: Vec<(String, Level)>,
    /// The periodic `loop()` waveform
    pub timeline: Timeline,
    /// False when the source has no `loop()` block
    pub has_loop: bool,
}

impl Program {
    /// Resolve a parsed sketch into a program.
    pub fn from_sketch(sketch: &Sketch) -> Self {
        let variables: BTreeMap<String, f64> = sketch
            .declarations
            .iter()
            .map(|d| (d.name.clone(), d.value))
            .collect();

        let setup_writes = sketch
            .setup
            .iter()
            .flatten()
            .filter_map(|instruction| match instruction {
                Instruction::DigitalWrite { pin, level, .. } => Some((resolve_pin(pin, &variables), *level)),
                Instruction::Delay { .. } => None,
            })
            .collect();

        let timeline = sketch
            .loop_body
            .as_deref()
            .map(|body| Timeline::compile(body, &variables))
            .unwrap_or_default();

        Self {
            variables,
            setup_writes,
            timeline,
            has_loop: sketch.has_loop(),
        }
    }

    /// Seed pin state with the `setup()` writes.
    pub fn run_setup(&self, pins: &mut BTreeMap<String, f64>) {
        for (pin, level) in &self.setup_writes {
            pins.insert(pin.clone(), level.value());
        }
    }

    /// Update pin state for simulated time `time_ms`.
    pub fn run_loop(&self, time_ms: u64, min_cycle_ms: u64, pins: &mut BTreeMap<String, f64>) {
        if self.timeline.events.is_empty() {
            return;
        }
        let phase = self.timeline.phase(time_ms, min_cycle_ms);
        self.timeline.apply(phase, pins);
    }
}

/// Render a pin operand as a pin id. Known variables are substituted;
/// unknown names are taken literally (`A0`, `LED_BUILTIN`).
fn resolve_pin(operand: &Operand, variables: &BTreeMap<String, f64>) -> String {
    match operand {
        Operand::Number(n) => format_pin_number(*n),
        Operand::Name(name) => match variables.get(name) {
            Some(&n) => format_pin_number(n),
            None => name.clone(),
        },
    }
}

/// Whole milliseconds; negative and unresolvable durations are 0.
fn resolve_delay(operand: &Operand, variables: &BTreeMap<String, f64>) -> u64 {
    let ms = match operand {
        Operand::Number(n) => *n,
        Operand::Name(name) => variables.get(name).copied().unwrap_or(0.0),
    };
    if ms.is_finite() && ms > 0.0 {
        ms.trunc() as u64
    } else {
        0
    }
}

fn format_pin_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch;

    fn at(program: &Program, time_ms: u64, pin: &str) -> Option<f64> {
        let mut pins = BTreeMap::new();
        program.run_loop(time_ms, DEFAULT_MIN_CYCLE_MS, &mut pins);
        pins.get(pin).copied()
    }

    #[test]
    fn test_blink_waveform() {
        let program = sketch::compile(
            "void setup() { pinMode(13, OUTPUT); }\nvoid loop() { digitalWrite(13, HIGH); delay(1000); digitalWrite(13, LOW); delay(1000); }",
        );
        assert_eq!(program.timeline.cycle_ms(DEFAULT_MIN_CYCLE_MS), 2000);
        for t in [0, 500, 999, 2000, 2999, 40_000] {
            assert_eq!(at(&program, t, "13"), Some(1.0), "t = {}", t);
        }
        for t in [1000, 1500, 1999, 3000, 41_999] {
            assert_eq!(at(&program, t, "13"), Some(0.0), "t = {}", t);
        }
    }

    #[test]
    fn test_variable_substitution() {
        let program = sketch::compile(
            "int ledPin = 9;\nint pause = 300;\nvoid loop() { digitalWrite(ledPin, HIGH); delay(pause); digitalWrite(ledPin, LOW); delay(pause); }",
        );
        assert_eq!(program.timeline.events[0].pin, "9");
        assert_eq!(program.timeline.length_ms, 600);
        assert_eq!(at(&program, 100, "9"), Some(1.0));
        assert_eq!(at(&program, 100, "ledPin"), None);
    }

    #[test]
    fn test_short_cycle_is_clamped() {
        let program = sketch::compile("void loop() { digitalWrite(5, HIGH); }");
        assert_eq!(program.timeline.length_ms, 0);
        assert_eq!(program.timeline.cycle_ms(DEFAULT_MIN_CYCLE_MS), 100);
        assert_eq!(at(&program, 12_345, "5"), Some(1.0));
    }

    #[test]
    fn test_unwritten_pins_retain_state() {
        // Pin 12 is only written late in the cycle; before that it keeps
        // whatever it held.
        let program = sketch::compile(
            "void loop() { digitalWrite(13, HIGH); delay(500); digitalWrite(12, HIGH); delay(500); digitalWrite(12, LOW); }",
        );
        let mut pins = BTreeMap::new();
        pins.insert("12".to_string(), 0.0);

        program.run_loop(700, DEFAULT_MIN_CYCLE_MS, &mut pins);
        assert_eq!(pins.get("12"), Some(&1.0));

        program.run_loop(100, DEFAULT_MIN_CYCLE_MS, &mut pins);
        assert_eq!(pins.get("12"), Some(&1.0));

        program.run_loop(1000, DEFAULT_MIN_CYCLE_MS, &mut pins);
        // 1000 mod 1000 = 0, only pin 13's write is in effect
        assert_eq!(pins.get("12"), Some(&1.0));
        assert_eq!(pins.get("13"), Some(&1.0));
    }

    #[test]
    fn test_last_write_at_same_offset_wins() {
        let program = sketch::compile("void loop() { digitalWrite(4, HIGH); digitalWrite(4, LOW); delay(200); }");
        assert_eq!(at(&program, 0, "4"), Some(0.0));
    }

    #[test]
    fn test_missing_loop_is_inert() {
        let program = sketch::compile("int x = 1;\nvoid setup() { digitalWrite(7, HIGH); }");
        assert!(!program.has_loop);
        let mut pins = BTreeMap::new();
        program.run_loop(0, DEFAULT_MIN_CYCLE_MS, &mut pins);
        assert!(pins.is_empty());

        program.run_setup(&mut pins);
        assert_eq!(pins.get("7"), Some(&1.0));
    }

    #[test]
    fn test_negative_and_unknown_delays_advance_nothing() {
        let program = sketch::compile("void loop() { delay(-50); delay(mystery); delay(250.9); }");
        assert_eq!(program.timeline.length_ms, 250);
    }

    #[test]
    fn test_literal_pin_names() {
        let program = sketch::compile("void loop() { digitalWrite(A0, HIGH); delay(100); }");
        assert_eq!(program.timeline.events[0].pin, "A0");
    }
}
