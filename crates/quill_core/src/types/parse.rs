//! Type-string grammar.
//!
//! ```text
//! union  := term ('|' term)*
//! term   := '?' term | name ('<' union (',' union)* '>')?
//! name   := '\'? ident ('\' ident)*  |  '$' ident
//! ```
//!
//! `T[]` is sugar for `array<T>` and is rewritten by [`convert_square_brackets`] before tokenizing.

use crate::lang::primitives;

use super::{Atomic, TypeParseError, Union};

const DELIMITERS: [char; 5] = ['<', '>', '|', '?', ','];

/// Split a type string into names and delimiter tokens, dropping whitespace.
///
/// ## Examples
/// ```rust
/// use quill_core::types::parse::tokenize;
///
/// assert_eq!(tokenize("array<string, int>|null"), vec!["array", "<", "string", ",", "int", ">", "|", "null"]);
/// ```
pub fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in source.chars() {
        if DELIMITERS.contains(&c) || c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Rewrite `T[]` suffixes into `array<T>`, innermost first (`Foo[][]` becomes `array<array<Foo>>`).
///
/// ## Examples
/// ```rust
/// use quill_core::types::parse::convert_square_brackets;
///
/// assert_eq!(convert_square_brackets("string[]|null"), "array<string>|null");
/// assert_eq!(convert_square_brackets("Foo[][]"), "array<array<Foo>>");
/// ```
pub fn convert_square_brackets(source: &str) -> String {
    if !source.contains("[]") {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len() + 8);
    let mut word = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '[' && chars.peek() == Some(&']') {
            chars.next();
            word = format!("array<{word}>");
            continue;
        }
        if DELIMITERS.contains(&c) || c.is_whitespace() {
            out.push_str(&std::mem::take(&mut word));
            out.push(c);
        } else {
            word.push(c);
        }
    }
    out.push_str(&word);
    out
}

/// Parse a type string into a [`Union`].
///
/// Scalar aliases are canonicalised (`integer` → `int`) and a leading `\` is stripped from class names. No class
/// resolution happens here; relative names stay relative.
pub fn parse_type(source: &str) -> Result<Union, TypeParseError> {
    let converted = convert_square_brackets(source.trim());
    let tokens = tokenize(&converted);
    if tokens.is_empty() {
        return Err(TypeParseError::Empty);
    }

    let mut parser = TypeParser { tokens: &tokens, pos: 0 };
    let union = parser.union()?;
    if let Some(token) = parser.peek() {
        return Err(TypeParseError::UnexpectedToken {
            token: token.to_string(),
            position: parser.pos,
        });
    }
    Ok(union)
}

struct TypeParser<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> TypeParser<'t> {
    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn bump(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: &str) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn union(&mut self) -> Result<Union, TypeParseError> {
        let mut atomics = self.term()?;
        while self.eat("|") {
            atomics.extend(self.term()?);
        }
        Ok(Union::new(atomics))
    }

    /// One alternative; `?T` expands to two.
    fn term(&mut self) -> Result<Vec<Atomic>, TypeParseError> {
        if self.eat("?") {
            let mut atomics = self.term()?;
            atomics.push(Atomic::new("null"));
            return Ok(atomics);
        }

        let position = self.pos;
        let token = self.bump().ok_or(TypeParseError::UnexpectedEnd)?;
        if token.len() == 1 && DELIMITERS.iter().any(|d| token.starts_with(*d)) {
            return Err(TypeParseError::UnexpectedToken {
                token: token.to_string(),
                position,
            });
        }

        let name = primitives::canonical_spelling(token.strip_prefix('\\').unwrap_or(token));
        if !self.eat("<") {
            return Ok(vec![Atomic::new(name)]);
        }

        let mut params = vec![self.union()?];
        while self.eat(",") {
            params.push(self.union()?);
        }
        if !self.eat(">") {
            return Err(match self.peek() {
                Some(_) => TypeParseError::UnbalancedBrackets(name),
                None => TypeParseError::UnexpectedEnd,
            });
        }
        Ok(vec![Atomic::generic(name, params)])
    }
}
