//! Interpreter for microcontroller sketches.
//!
//! Sketch source loosely resembles an Arduino program. Only a small
//! fragment is meaningful; everything else is inert and never an error.
//!
//! # Recognized Fragment
//!
//! ```text
//! sketch      = { any | declaration | block }
//! declaration = [ type_word+ ] name '=' literal
//! block       = [ type_word ] ( "setup" | "loop" ) '(' [ "void" ] ')' '{' body '}'
//! body        = { statement ( ';' | '{' | '}' | newline ) }
//! statement   = { any | write | delay }
//! write       = "digitalWrite" '(' operand ',' level ')'
//! delay       = "delay" '(' operand ')'
//!
//! operand     = [ '-' ] number | name
//! level       = "HIGH" | "LOW" | "1" | "0"
//! literal     = [ '-' ] number | "HIGH" | "LOW" | "true"
//! ```
//!
//! Call names and level keywords match case-insensitively. Names in operands
//! resolve against declared variables; unknown names stay literal.
//!
//! # Evaluation
//!
//! The `loop()` statements become a timeline: each write is stamped with
//! the sum of the delays before it, and the loop period is the sum of all
//! delays (at least [`DEFAULT_MIN_CYCLE_MS`]). At simulated time `t`, with
//! `phase = t mod period`, each pin takes the level of the last write at or
//! before `phase`. Pins with no such write keep their previous level.
//!
//! # Example
//!
//! ```text
//! int ledPin = 9;
//!
//! void setup() {
//!   pinMode(ledPin, OUTPUT);
//! }
//!
//! void loop() {
//!   digitalWrite(ledPin, HIGH);
//!   delay(1000);
//!   digitalWrite(ledPin, LOW);
//!   delay(1000);
//! }
//! ```

mod ast;
mod lexer;
mod parser;
mod program;

pub use ast::*;
pub use lexer::{parse_number, Lexer, Token, TokenKind};
pub use parser::Parser;
pub use program::{Program, Timeline, WriteEvent, DEFAULT_MIN_CYCLE_MS};

/// Parse sketch source into its recognized shape.
pub fn parse(input: &str) -> Sketch {
    Parser::new(Lexer::new(input)).parse()
}

/// Parse and resolve sketch source into a runnable program.
pub fn compile(input: &str) -> Program {
    Program::from_sketch(&parse(input))
}
