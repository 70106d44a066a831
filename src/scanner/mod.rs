//! Token scanner for variable-substitution templates
//!
//! A template is plain text interleaved with tokens of the form `%tag%` or
//! `%tag:label%`, where tag and label are runs of word characters. The
//! scanner decomposes a template into an ordered, non-overlapping sequence of
//! literal segments and tokens in a single left-to-right pass. Anything that
//! does not match the token grammar (a stray `%`, an empty tag, non-word
//! characters between the percent signs) is literal text, not an error.

pub mod lexer;

pub use lexer::Span;

use lexer::Chunk;
use logos::Logos;

/// A substitution token found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Tag naming the substitution family that handles this token.
    pub tag: String,
    /// Binding label, present only in the `%tag:label%` form.
    pub label: Option<String>,
    /// Byte range of the whole token, percent signs included.
    pub span: Span,
}

impl Token {
    /// The label this token's data is looked up by. Unlabelled tokens use
    /// their tag as the label, so `%tag%` is shorthand for `%tag:tag%`.
    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.tag)
    }
}

/// One piece of a scanned template, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// Text to copy through unchanged.
    Literal(&'a str),
    /// A token to substitute.
    Token(Token),
}

/// Scan a template into literal and token segments.
///
/// Concatenating the literal slices and token spans reproduces the input
/// exactly. The iterator is lazy; nothing is scanned until it is consumed.
pub fn segments(input: &str) -> impl Iterator<Item = Segment<'_>> + '_ {
    Chunk::lexer(input)
        .spanned()
        .map(move |(chunk, span)| match chunk {
            Ok(Chunk::Var((tag, label))) => Segment::Token(Token { tag, label, span }),
            // Literal runs, stray percent signs, and anything the lexer
            // refuses all pass through as literal text.
            _ => Segment::Literal(&input[span]),
        })
}

/// Scan a template and yield only its tokens.
pub fn tokens(input: &str) -> impl Iterator<Item = Token> + '_ {
    segments(input).filter_map(|segment| match segment {
        Segment::Token(token) => Some(token),
        Segment::Literal(_) => None,
    })
}
