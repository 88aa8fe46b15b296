//! Recursive-descent parser for sketch source.
//!
//! The parser never fails. It locates the `setup` and `loop` blocks by
//! brace matching, collects literal variable declarations from the whole
//! source, and turns each block into a flat [`Instruction`] list. Any
//! construct other than `digitalWrite(pin, level)` and `delay(ms)` is
//! skipped.

use super::ast::*;
use super::lexer::{parse_number, Lexer, Token, TokenKind};

/// Parser for sketch source.
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'_>) -> Self {
        Self {
            tokens: lexer.tokenize(),
        }
    }

    /// Parse the whole sketch.
    pub fn parse(&self) -> Sketch {
        Sketch {
            declarations: self.declarations(),
            setup: self.find_block("setup").map(|body| self.instructions(body)),
            loop_body: self.find_block("loop").map(|body| self.instructions(body)),
        }
    }

    /// Index of the next non-newline token at or after `from`.
    fn significant(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.tokens[i].kind != TokenKind::Newline)
    }

    /// Index of the previous non-newline token before `before`.
    fn previous_significant(&self, before: usize) -> Option<usize> {
        (0..before).rev().find(|&i| self.tokens[i].kind != TokenKind::Newline)
    }

    fn kind_at(&self, idx: Option<usize>) -> Option<TokenKind> {
        idx.map(|i| self.tokens[i].kind)
    }

    /// Collect `<optional type> name = literal` anywhere in the source.
    fn declarations(&self) -> Vec<Declaration> {
        let mut out = Vec::new();

        for i in 0..self.tokens.len() {
            let name = &self.tokens[i];
            if name.kind != TokenKind::Identifier {
                continue;
            }
            let assign = self.significant(i + 1);
            if self.kind_at(assign) != Some(TokenKind::Assign) {
                continue;
            }
            // `obj.field = 1`, `arr[i] = 1` and `f(x) = 1` are not declarations
            let prev = self.kind_at(self.previous_significant(i));
            if matches!(
                prev,
                Some(TokenKind::Other) | Some(TokenKind::Operator) | Some(TokenKind::CloseParen)
            ) {
                continue;
            }
            let value_at = assign.and_then(|a| self.significant(a + 1));
            out.push(Declaration {
                name: name.text.clone(),
                value: value_at.map(|v| self.literal_value(v)).unwrap_or(0.0),
                line: name.line,
            });
        }

        out
    }

    /// Evaluate a declaration's right-hand side. Only a leading literal
    /// counts; anything else reads as 0.
    fn literal_value(&self, idx: usize) -> f64 {
        let token = &self.tokens[idx];
        match token.kind {
            TokenKind::Number => parse_number(&token.text).unwrap_or(0.0),
            TokenKind::Operator if token.text == "-" => {
                match self.significant(idx + 1).map(|i| &self.tokens[i]) {
                    Some(next) if next.kind == TokenKind::Number => {
                        -parse_number(&next.text).unwrap_or(0.0)
                    }
                    _ => 0.0,
                }
            }
            TokenKind::Identifier if token.is_word("HIGH") || token.is_word("true") => 1.0,
            _ => 0.0,
        }
    }

    /// Find `[type] name ( [void] ) { ... }` at the top level and return the
    /// token range of its body. An unterminated body runs to end of input.
    fn find_block(&self, name: &str) -> Option<std::ops::Range<usize>> {
        let mut depth = 0usize;

        for i in 0..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::OpenBrace => depth += 1,
                TokenKind::CloseBrace => depth = depth.saturating_sub(1),
                TokenKind::Identifier if depth == 0 && self.tokens[i].text == name => {
                    if let Some(open) = self.block_header(i) {
                        return Some(open + 1..self.matching_brace(open));
                    }
                }
                _ => {}
            }
        }

        None
    }

    /// Match `( [void] ) {` after a block name; returns the brace index.
    fn block_header(&self, name_idx: usize) -> Option<usize> {
        let open_paren = self.significant(name_idx + 1)?;
        if self.tokens[open_paren].kind != TokenKind::OpenParen {
            return None;
        }
        let mut next = self.significant(open_paren + 1)?;
        if self.tokens[next].is_word("void") {
            next = self.significant(next + 1)?;
        }
        if self.tokens[next].kind != TokenKind::CloseParen {
            return None;
        }
        let brace = self.significant(next + 1)?;
        (self.tokens[brace].kind == TokenKind::OpenBrace).then_some(brace)
    }

    fn matching_brace(&self, open: usize) -> usize {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::OpenBrace => depth += 1,
                TokenKind::CloseBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
        // Eof token
        self.tokens.len() - 1
    }

    /// Split a block body into statements and recognize calls in each.
    fn instructions(&self, body: std::ops::Range<usize>) -> Vec<Instruction> {
        let mut out = Vec::new();
        let mut statement: Vec<&Token> = Vec::new();
        let mut parens = 0usize;

        for token in &self.tokens[body] {
            let boundary = match token.kind {
                TokenKind::Semicolon | TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::Eof => true,
                TokenKind::Newline => parens == 0,
                TokenKind::OpenParen => {
                    parens += 1;
                    false
                }
                TokenKind::CloseParen => {
                    parens = parens.saturating_sub(1);
                    false
                }
                _ => false,
            };

            if boundary {
                recognize_calls(&statement, &mut out);
                statement.clear();
                parens = 0;
            } else if token.kind != TokenKind::Newline {
                statement.push(token);
            }
        }
        recognize_calls(&statement, &mut out);

        out
    }
}

/// Recognize every `digitalWrite(..)` and `delay(..)` call within one
/// statement, in order.
fn recognize_calls(statement: &[&Token], out: &mut Vec<Instruction>) {
    let mut i = 0;
    while i < statement.len() {
        let token = statement[i];
        let rest = &statement[i + 1..];

        if token.is_word("digitalWrite") {
            if let Some((pin, level, used)) = digital_write_args(rest) {
                out.push(Instruction::DigitalWrite {
                    pin,
                    level,
                    line: token.line,
                });
                i += 1 + used;
                continue;
            }
        } else if token.is_word("delay") {
            if let Some((duration, used)) = delay_args(rest) {
                out.push(Instruction::Delay {
                    duration,
                    line: token.line,
                });
                i += 1 + used;
                continue;
            }
        }

        i += 1;
    }
}

/// `( operand , level )`
fn digital_write_args(tokens: &[&Token]) -> Option<(Operand, Level, usize)> {
    if tokens.first()?.kind != TokenKind::OpenParen {
        return None;
    }
    let (pin, used) = operand(&tokens[1..])?;
    let mut at = 1 + used;
    if tokens.get(at)?.kind != TokenKind::Comma {
        return None;
    }
    at += 1;
    let level_token = tokens.get(at)?;
    if !matches!(level_token.kind, TokenKind::Identifier | TokenKind::Number) {
        return None;
    }
    let level = Level::from_token(&level_token.text)?;
    at += 1;
    if tokens.get(at)?.kind != TokenKind::CloseParen {
        return None;
    }
    Some((pin, level, at + 1))
}

/// `( operand )`
fn delay_args(tokens: &[&Token]) -> Option<(Operand, usize)> {
    if tokens.first()?.kind != TokenKind::OpenParen {
        return None;
    }
    let (duration, used) = operand(&tokens[1..])?;
    let close = 1 + used;
    if tokens.get(close)?.kind != TokenKind::CloseParen {
        return None;
    }
    Some((duration, close + 1))
}

/// A single literal, optionally negated, or a single name.
fn operand(tokens: &[&Token]) -> Option<(Operand, usize)> {
    let first = tokens.first()?;
    match first.kind {
        TokenKind::Number => Some((Operand::Number(parse_number(&first.text)?), 1)),
        TokenKind::Identifier => Some((Operand::Name(first.text.clone()), 1)),
        TokenKind::Operator if first.text == "-" => {
            let next = tokens.get(1)?;
            if next.kind != TokenKind::Number {
                return None;
            }
            Some((Operand::Number(-parse_number(&next.text)?), 2))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Sketch {
        Parser::new(Lexer::new(input)).parse()
    }

    const BLINK: &str = "void setup() {\n  pinMode(13, OUTPUT);\n}\n\nvoid loop() {\n  digitalWrite(13, HIGH);\n  delay(1000);\n  digitalWrite(13, LOW);\n  delay(1000);\n}";

    #[test]
    fn test_parse_blink() {
        let sketch = parse(BLINK);
        assert_eq!(sketch.setup, Some(vec![]));
        let body = sketch.loop_body.unwrap();
        assert_eq!(body.len(), 4);
        assert_eq!(
            body[0],
            Instruction::DigitalWrite {
                pin: Operand::Number(13.0),
                level: Level::High,
                line: 6
            }
        );
        assert_eq!(
            body[1],
            Instruction::Delay {
                duration: Operand::Number(1000.0),
                line: 7
            }
        );
    }

    #[test]
    fn test_missing_blocks() {
        let sketch = parse("digitalWrite(13, HIGH);");
        assert!(sketch.setup.is_none());
        assert!(!sketch.has_loop());
    }

    #[test]
    fn test_declarations() {
        let sketch = parse(
            "const int RED = 13;\nint ledState = LOW;\nfloat duty = -2.5;\nbool on = HIGH;\nlong d = pulseIn(7, HIGH);\nvoid loop() { if (x == 3) {} }",
        );
        let decls: Vec<(&str, f64)> = sketch
            .declarations
            .iter()
            .map(|d| (d.name.as_str(), d.value))
            .collect();
        assert_eq!(
            decls,
            vec![("RED", 13.0), ("ledState", 0.0), ("duty", -2.5), ("on", 1.0), ("d", 0.0)]
        );
    }

    #[test]
    fn test_member_assignment_is_not_a_declaration() {
        let sketch = parse("servo.angle = 90;\nvalues[2] = 5;");
        assert!(sketch.declarations.is_empty());
    }

    #[test]
    fn test_nested_braces_do_not_end_loop() {
        let sketch = parse(
            "void loop() {\n  if (digitalRead(2)) {\n    digitalWrite(9, HIGH);\n  }\n  delay(250);\n  digitalWrite(9, LOW);\n  delay(250);\n}",
        );
        let body = sketch.loop_body.unwrap();
        assert_eq!(body.len(), 4);
        assert!(matches!(body[3], Instruction::Delay { .. }));
    }

    #[test]
    fn test_unrecognized_statements_are_skipped() {
        let sketch = parse(
            "void loop() {\n  Serial.println(\"hi\");\n  analogWrite(9, 128);\n  digitalWrite(ledPin, state);\n  delay(x * 2);\n  delayMicroseconds(10);\n  DigitalWrite(ledPin, 1)\n  DELAY(50)\n}",
        );
        let body = sketch.loop_body.unwrap();
        assert_eq!(
            body,
            vec![
                Instruction::DigitalWrite {
                    pin: Operand::Name("ledPin".to_string()),
                    level: Level::High,
                    line: 7
                },
                Instruction::Delay {
                    duration: Operand::Number(50.0),
                    line: 8
                },
            ]
        );
    }

    #[test]
    fn test_void_parameter_list() {
        let sketch = parse("void loop(void)\n{\n  delay(10);\n}");
        assert_eq!(sketch.loop_body.map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_unterminated_loop_body() {
        let sketch = parse("void loop() {\n  digitalWrite(3, 1);\n  delay(100);");
        assert_eq!(sketch.loop_body.map(|b| b.len()), Some(2));
    }
}
