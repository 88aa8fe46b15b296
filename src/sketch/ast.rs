//! Syntax tree for the recognized fragment of sketch source.

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Parse a level keyword or literal (`HIGH`, `LOW`, `1`, `0`).
    pub fn from_token(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("HIGH") || text == "1" {
            Some(Self::High)
        } else if text.eq_ignore_ascii_case("LOW") || text == "0" {
            Some(Self::Low)
        } else {
            None
        }
    }

    /// The pin value this level drives.
    pub fn value(&self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Low => 0.0,
        }
    }
}

/// A call argument: a literal or a name to resolve against the sketch's
/// variables.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Name(String),
}

/// One recognized statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `digitalWrite(pin, level)`
    DigitalWrite { pin: Operand, level: Level, line: usize },
    /// `delay(ms)`
    Delay { duration: Operand, line: usize },
}

/// A variable declaration or assignment with a literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: f64,
    pub line: usize,
}

/// The parsed shape of a sketch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    /// Every `name = value;` found anywhere in the source, in source order
    pub declarations: Vec<Declaration>,
    /// Recognized statements of `setup()`, if the block exists
    pub setup: Option<Vec<Instruction>>,
    /// Recognized statements of `loop()`, if the block exists
    pub loop_body: Option<Vec<Instruction>>,
}

impl Sketch {
    /// True when the source has a `loop()` block.
    pub fn has_loop(&self) -> bool {
        self.loop_body.is_some()
    }
}
