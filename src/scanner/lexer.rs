//! Lexer for the `%tag%` / `%tag:label%` token grammar using logos

use logos::Logos;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// Raw chunks produced by the lexer.
///
/// Every byte of the input lands in exactly one chunk, so the chunk stream
/// can be spliced back together without loss.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Chunk {
    /// A well-formed substitution token: `%tag%` or `%tag:label%`.
    /// Tag and label are one-or-more word characters.
    #[regex(r"%[A-Za-z0-9_]+(:[A-Za-z0-9_]+)?%", parse_var)]
    Var((String, Option<String>)),

    /// A run of ordinary text containing no percent signs.
    #[regex(r"[^%]+")]
    Literal,

    /// A `%` that does not open a well-formed token. Kept as literal text.
    #[token("%")]
    StrayPercent,
}

/// Split the matched `%...%` slice into tag and optional label.
fn parse_var(lex: &mut logos::Lexer<Chunk>) -> (String, Option<String>) {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    match inner.split_once(':') {
        Some((tag, label)) => (tag.to_string(), Some(label.to_string())),
        None => (inner.to_string(), None),
    }
}

/// Lex input into chunks with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Chunk, Span)> + '_ {
    Chunk::lexer(input)
        .spanned()
        .filter_map(|(chunk, span)| chunk.ok().map(|c| (c, span)))
}
