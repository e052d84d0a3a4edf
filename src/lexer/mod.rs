//! # Lexer
//!
//! Turns Mython source text into a flat token stream with explicit
//! `Indent`/`Dedent`/`Newline` markers, addressable through a cursor.
//!
//! Indentation is significant: every level is exactly two spaces, and the
//! lexer synthesizes one `Indent` when a line is nested deeper than the
//! previous one and one `Dedent` per level left when it is shallower.
//! Blank lines and `#`-comment lines produce no tokens at all and leave
//! the indentation state untouched.

use std::fmt;

use thiserror::Error;

/// A single Mython lexeme.
///
/// `Number`, `Id`, `String`, and `Char` carry a payload; all other
/// variants are bare markers. Two tokens are equal when their variants
/// match and, for valued variants, their payloads match too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(i64),
    Id(String),
    String(String),
    Char(char),
    Class,
    Return,
    If,
    Else,
    Def,
    Print,
    And,
    Or,
    Not,
    None,
    True,
    False,
    Eq,
    NotEq,
    LessOrEq,
    GreaterOrEq,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl Token {
    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Number(value) => format!("number `{value}`"),
            Token::Id(name) => format!("identifier `{name}`"),
            Token::String(value) => format!("string {value:?}"),
            Token::Char(symbol) => format!("`{symbol}`"),
            Token::Class => "`class`".to_string(),
            Token::Return => "`return`".to_string(),
            Token::If => "`if`".to_string(),
            Token::Else => "`else`".to_string(),
            Token::Def => "`def`".to_string(),
            Token::Print => "`print`".to_string(),
            Token::And => "`and`".to_string(),
            Token::Or => "`or`".to_string(),
            Token::Not => "`not`".to_string(),
            Token::None => "`None`".to_string(),
            Token::True => "`True`".to_string(),
            Token::False => "`False`".to_string(),
            Token::Eq => "`==`".to_string(),
            Token::NotEq => "`!=`".to_string(),
            Token::LessOrEq => "`<=`".to_string(),
            Token::GreaterOrEq => "`>=`".to_string(),
            Token::Newline => "end of line".to_string(),
            Token::Indent => "indent".to_string(),
            Token::Dedent => "dedent".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    #[error("line {line}: indentation must be a multiple of two spaces")]
    OddIndent { line: usize },
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
    #[error("line {line}: number literal out of range")]
    NumberOutOfRange { line: usize },
    #[error("line {line}: unexpected character `{found}`")]
    UnexpectedCharacter { found: char, line: usize },
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
}

/// Keywords are only recognized when followed by end of line, whitespace,
/// `:` or `,`. Anything else makes the spelling part of an identifier, so
/// `None_` lexes as one identifier rather than `None` plus `_`.
const KEYWORDS: &[(&str, Token)] = &[
    ("class", Token::Class),
    ("return", Token::Return),
    ("if", Token::If),
    ("else", Token::Else),
    ("def", Token::Def),
    ("print", Token::Print),
    ("and", Token::And),
    ("or", Token::Or),
    ("not", Token::Not),
    ("None", Token::None),
    ("True", Token::True),
    ("False", Token::False),
];

const COMPARISONS: &[(&str, Token)] = &[
    ("==", Token::Eq),
    ("!=", Token::NotEq),
    ("<=", Token::LessOrEq),
    (">=", Token::GreaterOrEq),
];

const PUNCTUATION: &[char] = &['<', '>', '=', '+', '-', '*', '/', '(', ')', '.', ',', ':'];

/// A materialized token stream with a cursor over it.
///
/// The stream always ends with [`Token::Eof`], and the cursor never moves
/// past it: calling [`Lexer::next`] at the end keeps returning `Eof`.
#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    index: usize,
}

impl Lexer {
    /// Tokenize an entire source text.
    ///
    /// Fails on odd indentation, unterminated strings, oversized number
    /// literals, and characters outside the language.
    pub fn new(input: &str) -> Result<Self, LexerError> {
        let mut tokens = Vec::new();
        let mut level = 0usize;

        for (number, line) in input.lines().enumerate() {
            let line_number = number + 1;
            let rest = line.trim_start_matches(' ');
            if rest.trim().is_empty() || rest.starts_with('#') {
                continue;
            }

            let width = line.len() - rest.len();
            if width % 2 != 0 {
                return Err(LexerError::OddIndent { line: line_number });
            }
            let new_level = width / 2;
            if new_level > level {
                tokens.push(Token::Indent);
            } else {
                for _ in 0..level - new_level {
                    tokens.push(Token::Dedent);
                }
            }
            level = new_level;

            Self::tokenize_line(rest, line_number, &mut tokens)?;
            tokens.push(Token::Newline);
        }

        for _ in 0..level {
            tokens.push(Token::Dedent);
        }
        tokens.push(Token::Eof);

        Ok(Self { tokens, index: 0 })
    }

    /// The token the cursor is on.
    pub fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Advance the cursor and return the token it lands on.
    ///
    /// Sticky at the end: once the cursor reaches `Eof` it stays there.
    pub fn next(&mut self) -> &Token {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        &self.tokens[self.index]
    }

    /// Assert that the current token equals `expected`, payload included.
    pub fn expect(&self, expected: &Token) -> Result<&Token, LexerError> {
        let current = self.current();
        if current == expected {
            Ok(current)
        } else {
            Err(LexerError::UnexpectedToken {
                expected: expected.describe(),
                found: current.describe(),
            })
        }
    }

    /// Advance, then assert the new current token equals `expected`.
    pub fn expect_next(&mut self, expected: &Token) -> Result<&Token, LexerError> {
        self.next();
        self.expect(expected)
    }

    /// Assert that the current token is an identifier and return its name.
    pub fn expect_id(&self) -> Result<&str, LexerError> {
        match self.current() {
            Token::Id(name) => Ok(name),
            other => Err(LexerError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: other.describe(),
            }),
        }
    }

    /// Advance, then assert the new current token is an identifier.
    pub fn expect_next_id(&mut self) -> Result<&str, LexerError> {
        self.next();
        self.expect_id()
    }

    fn tokenize_line(
        line: &str,
        line_number: usize,
        tokens: &mut Vec<Token>,
    ) -> Result<(), LexerError> {
        let mut rest = line;
        loop {
            rest = rest.trim_start();
            if rest.is_empty() || rest.starts_with('#') {
                return Ok(());
            }
            tokens.push(Self::split_token(&mut rest, line_number)?);
        }
    }

    /// Strip one token off the front of `rest`. Recognition order matters:
    /// keywords before identifiers, two-character comparisons before their
    /// single-character prefixes.
    fn split_token(rest: &mut &str, line_number: usize) -> Result<Token, LexerError> {
        if let Some(token) = Self::split_keyword(rest) {
            return Ok(token);
        }
        if let Some(token) = Self::split_comparison(rest) {
            return Ok(token);
        }
        if let Some(token) = Self::split_punctuation(rest) {
            return Ok(token);
        }
        if let Some(token) = Self::split_number(rest, line_number)? {
            return Ok(token);
        }
        if let Some(token) = Self::split_string(rest, line_number)? {
            return Ok(token);
        }
        if let Some(token) = Self::split_id(rest) {
            return Ok(token);
        }
        Err(LexerError::UnexpectedCharacter {
            found: rest.chars().next().unwrap_or('\0'),
            line: line_number,
        })
    }

    fn split_keyword(rest: &mut &str) -> Option<Token> {
        for (word, token) in KEYWORDS {
            if let Some(after) = rest.strip_prefix(word) {
                let boundary = match after.chars().next() {
                    None => true,
                    Some(next) => next.is_whitespace() || next == ':' || next == ',',
                };
                if boundary {
                    *rest = after;
                    return Some(token.clone());
                }
            }
        }
        None
    }

    fn split_comparison(rest: &mut &str) -> Option<Token> {
        for (symbol, token) in COMPARISONS {
            if let Some(after) = rest.strip_prefix(symbol) {
                *rest = after;
                return Some(token.clone());
            }
        }
        None
    }

    fn split_punctuation(rest: &mut &str) -> Option<Token> {
        let first = rest.chars().next()?;
        if PUNCTUATION.contains(&first) {
            *rest = &rest[first.len_utf8()..];
            Some(Token::Char(first))
        } else {
            None
        }
    }

    fn split_number(rest: &mut &str, line_number: usize) -> Result<Option<Token>, LexerError> {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Ok(None);
        }
        let value = rest[..digits]
            .parse::<i64>()
            .map_err(|_| LexerError::NumberOutOfRange { line: line_number })?;
        *rest = &rest[digits..];
        Ok(Some(Token::Number(value)))
    }

    fn split_string(rest: &mut &str, line_number: usize) -> Result<Option<Token>, LexerError> {
        let quote = match rest.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Ok(None),
        };

        let mut value = String::new();
        let mut chars = rest.char_indices().skip(1);
        loop {
            let Some((position, c)) = chars.next() else {
                return Err(LexerError::UnterminatedString { line: line_number });
            };
            match c {
                c if c == quote => {
                    *rest = &rest[position + c.len_utf8()..];
                    return Ok(Some(Token::String(value)));
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(LexerError::UnterminatedString { line: line_number });
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        // Unknown escapes keep the escaped character as-is.
                        other => value.push(other),
                    }
                }
                c => value.push(c),
            }
        }
    }

    fn split_id(rest: &mut &str) -> Option<Token> {
        let first = rest.chars().next()?;
        if !first.is_ascii_alphabetic() && first != '_' {
            return None;
        }
        let length = rest.len()
            - rest
                .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_')
                .len();
        let name = rest[..length].to_string();
        *rest = &rest[length..];
        Some(Token::Id(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input).unwrap();
        let mut tokens = vec![lexer.current().clone()];
        while *lexer.current() != Token::Eof {
            tokens.push(lexer.next().clone());
        }
        tokens
    }

    #[test]
    fn keyword_requires_boundary() {
        assert_eq!(
            lex("None_ = None"),
            vec![
                Token::Id("None_".to_string()),
                Token::Char('='),
                Token::None,
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comparison_before_punctuation() {
        assert_eq!(
            lex("a <= b"),
            vec![
                Token::Id("a".to_string()),
                Token::LessOrEq,
                Token::Id("b".to_string()),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn dedents_balance_indents_at_eof() {
        let tokens = lex("if x:\n  if y:\n    print z\n");
        let indents = tokens.iter().filter(|t| **t == Token::Indent).count();
        let dedents = tokens.iter().filter(|t| **t == Token::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(indents, dedents);
    }

    #[test]
    fn odd_indent_is_rejected() {
        assert_eq!(
            Lexer::new("if x:\n   print y\n").unwrap_err(),
            LexerError::OddIndent { line: 2 }
        );
    }
}
