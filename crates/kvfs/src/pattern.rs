//! Wildcard specs compiled into key matchers.
//!
//! A spec is literal text in which `*` stands for any run of characters (including none)
//! and `\` makes the following character literal, so `\*` matches a real asterisk.
//! Compilation produces a [`Pattern`]: a regular expression anchored at the start with
//! the namespace prefix, holding the escaped literal segments with `.*` between them.
//! The expression runs in dot-all mode, so a wildcard also spans line breaks.
//!
//! The end of the expression is anchored unless the spec ends with an unescaped `*`:
//! `/*ball` matches `/baseball` but not `/baller`, while `/*ball*` matches both.
//!
//! A spec that ends in a lone `\` keeps that backslash as a literal character.

use crate::error::{KvfsError, KvfsErrorExt};
use regex::Regex;
use std::mem;

/// The wildcard token.
pub const WILDCARD: char = '*';
/// Makes the next character literal.
pub const ESCAPE: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Literal,
    Escape,
}

/// Splits a spec into literal segments and collapsed wildcards.
fn scan(spec: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut segment = String::new();
    let mut mode = Scan::Literal;

    for ch in spec.chars() {
        match (mode, ch) {
            (Scan::Escape, _) => {
                segment.push(ch);
                mode = Scan::Literal;
            },
            (Scan::Literal, ESCAPE) => mode = Scan::Escape,
            (Scan::Literal, WILDCARD) => {
                if !segment.is_empty() {
                    pieces.push(Piece::Literal(mem::take(&mut segment)));
                }
                if pieces.last() != Some(&Piece::Any) {
                    pieces.push(Piece::Any);
                }
            },
            (Scan::Literal, _) => segment.push(ch),
        }
    }

    if mode == Scan::Escape {
        segment.push(ESCAPE);
    }
    if !segment.is_empty() {
        pieces.push(Piece::Literal(segment));
    }

    pieces
}

/// A compiled wildcard spec bound to one namespace prefix.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    literal: bool,
}

impl Pattern {
    /// Compiles `spec` into a matcher over full store keys starting with `prefix`.
    ///
    /// An empty spec is treated as `*` and matches every key under the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`KvfsError::Pattern`] only if the regex engine rejects the expression,
    /// which in practice means the spec exceeded the engine's size limit.
    pub fn compile(prefix: &str, spec: &str) -> Result<Self, KvfsError> {
        let spec = if spec.is_empty() { "*" } else { spec };
        let pieces = scan(spec);

        let mut expr = String::with_capacity(prefix.len() + spec.len() * 2 + 8);
        expr.push_str("(?s)^");
        expr.push_str(&regex::escape(prefix));

        for piece in &pieces {
            match piece {
                Piece::Literal(text) => expr.push_str(&regex::escape(text)),
                Piece::Any => expr.push_str(".*"),
            }
        }

        let open_end = pieces.last() == Some(&Piece::Any);
        if open_end {
            // A trailing `.*` adds nothing to an unanchored end.
            expr.truncate(expr.len() - 2);
        } else {
            expr.push('$');
        }

        let regex = Regex::new(&expr).context(format!("Compiling spec {spec:?}"))?;
        let literal = !pieces.contains(&Piece::Any);

        Ok(Self { regex, literal })
    }

    /// Tests a full store key (prefix included).
    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// `true` when the spec contained no unescaped wildcard.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        self.literal
    }

    /// The generated regular expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
