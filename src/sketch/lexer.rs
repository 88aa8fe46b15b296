//! Lexer (tokenizer) for microcontroller sketch source.
//!
//! The lexer is total: characters it has no use for become
//! [`TokenKind::Other`] tokens rather than errors, so arbitrary text can be
//! scanned for the handful of constructs the interpreter understands.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl Token {
    /// True if this is an identifier spelled `name`, ignoring ASCII case.
    pub fn is_word(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(name)
    }
}

/// Token types in sketch source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier or keyword
    Identifier,
    /// A numeric literal (decimal, fractional or hex)
    Number,
    /// A string or character literal, quotes included
    Str,
    /// A multi-character or arithmetic operator (`==`, `+=`, `<`, ...)
    Operator,
    /// Single equals sign '='
    Assign,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Open brace '{'
    OpenBrace,
    /// Close brace '}'
    CloseBrace,
    /// Comma ','
    Comma,
    /// Semicolon ';'
    Semicolon,
    /// Newline
    Newline,
    /// Any other character
    Other,
    /// End of input
    Eof,
}

/// Lexer for tokenizing sketch source.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The final token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let make = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return make(TokenKind::Eof, String::new()),
        };

        match ch {
            '\n' => {
                self.advance();
                make(TokenKind::Newline, "\n".to_string())
            }
            '(' | ')' | '{' | '}' | ',' | ';' => {
                self.advance();
                let kind = match ch {
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    '{' => TokenKind::OpenBrace,
                    '}' => TokenKind::CloseBrace,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Semicolon,
                };
                make(kind, ch.to_string())
            }
            '"' | '\'' => {
                let text = self.read_quoted(ch);
                make(TokenKind::Str, text)
            }
            '0'..='9' => {
                let text = self.read_number();
                make(TokenKind::Number, text)
            }
            '.' => {
                self.advance();
                if matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                    let mut text = "0.".to_string();
                    text.push_str(&self.read_digits());
                    make(TokenKind::Number, text)
                } else {
                    make(TokenKind::Other, ".".to_string())
                }
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                make(TokenKind::Identifier, text)
            }
            '=' | '!' | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' => {
                let text = self.read_operator();
                let kind = if text == "=" {
                    TokenKind::Assign
                } else {
                    TokenKind::Operator
                };
                make(kind, text)
            }
            _ => {
                self.advance();
                make(TokenKind::Other, ch.to_string())
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '/' if self.peek_second() == Some('/') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                '/' if self.peek_second() == Some('*') => {
                    self.advance();
                    self.advance();
                    let mut prev = '\0';
                    // Unterminated block comments run to end of input
                    while let Some(c) = self.advance() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        prev = c;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = self.read_digits();

        // Hex literal
        if text == "0" && matches!(self.chars.peek(), Some('x') | Some('X')) {
            text.push('x');
            self.advance();
            while let Some(&ch) = self.chars.peek() {
                if ch.is_ascii_hexdigit() {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return text;
        }

        // Decimal part
        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            text.push_str(&self.read_digits());
        }

        // Exponent part, only when digits follow
        if matches!(self.chars.peek(), Some('e') | Some('E')) {
            let mut ahead = self.chars.clone();
            ahead.next();
            let exp_follows = match ahead.next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('-') | Some('+') => matches!(ahead.next(), Some(c) if c.is_ascii_digit()),
                _ => false,
            };
            if exp_follows {
                text.push('e');
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                text.push_str(&self.read_digits());
            }
        }

        // Integer/float suffixes (10UL, 1.5f)
        while let Some(&ch) = self.chars.peek() {
            if matches!(ch, 'u' | 'U' | 'l' | 'L' | 'f' | 'F') {
                self.advance();
            } else {
                break;
            }
        }

        text
    }

    fn read_operator(&mut self) -> String {
        let mut text = String::new();
        if let Some(first) = self.advance() {
            text.push(first);
            if let Some(&next) = self.chars.peek() {
                let pair = matches!(
                    (first, next),
                    ('=', '=')
                        | ('!', '=')
                        | ('<', '=')
                        | ('>', '=')
                        | ('<', '<')
                        | ('>', '>')
                        | ('+', '=')
                        | ('-', '=')
                        | ('*', '=')
                        | ('/', '=')
                        | ('%', '=')
                        | ('&', '=')
                        | ('|', '=')
                        | ('^', '=')
                        | ('+', '+')
                        | ('-', '-')
                        | ('&', '&')
                        | ('|', '|')
                        | ('-', '>')
                );
                if pair {
                    text.push(next);
                    self.advance();
                }
            }
        }
        text
    }

    fn read_quoted(&mut self, quote: char) -> String {
        let mut text = String::new();
        if let Some(open) = self.advance() {
            text.push(open);
        }
        while let Some(ch) = self.advance() {
            text.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.advance() {
                    text.push(escaped);
                }
                continue;
            }
            if ch == quote || ch == '\n' {
                break;
            }
        }
        text
    }
}

/// Parse a numeric literal as produced by the lexer.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_call() {
        let tokens = Lexer::new("digitalWrite(13, HIGH);").tokenize();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["digitalWrite", "(", "13", ",", "HIGH", ")", ";", ""]);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert!(tokens[0].is_word("DIGITALWRITE"));
    }

    #[test]
    fn test_lexer_skips_comments() {
        let input = "// line\nint x = 1; /* block\n still */ delay(5);";
        let tokens = Lexer::new(input).tokenize();
        assert!(tokens.iter().all(|t| !t.text.contains("line") && !t.text.contains("still")));
        let delay = tokens.iter().find(|t| t.text == "delay").unwrap();
        assert_eq!(delay.line, 3);
    }

    #[test]
    fn test_lexer_operators() {
        assert_eq!(
            kinds("a == b = c += 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_strings_do_not_leak() {
        let tokens = Lexer::new("Serial.print(\"delay(5);\");").tokenize();
        assert!(tokens.iter().all(|t| t.text != "delay"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Str));
    }

    #[test]
    fn test_lexer_never_fails() {
        let tokens = Lexer::new("#include <Servo.h>\n@ $ `").tokenize();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1000"), Some(1000.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("0xFF"), Some(255.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_number_suffixes_dropped() {
        let tokens = Lexer::new("1000UL 1.5f").tokenize();
        assert_eq!(tokens[0].text, "1000");
        assert_eq!(tokens[1].text, "1.5");
    }
}
