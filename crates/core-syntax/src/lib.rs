//! Per-line syntax tokenization behind a capability trait.
//!
//! The renderer never talks to syntect directly: it holds a `dyn Tokenize`
//! plus a `Theme` value and works in terms of `Token` rows and
//! `StyleCategory`. That keeps grammar machinery swappable (and render
//! tests run against a stub instead of loading grammar sets).
//!
//! Tokenization is deliberately line-local: every line parses with fresh
//! state, so constructs spanning lines (block comments, raw strings) can
//! style neighboring lines stale until they are edited. The per-line
//! highlight cache upstream shares that granularity.

use std::path::Path;

use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use thiserror::Error;
use tracing::debug;

pub mod theme;

pub use theme::{Rgb, StyleAttrs, Theme};

/// Style buckets the renderer distinguishes. Grammar scopes collapse into
/// these; anything unrecognized is `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCategory {
    Keyword,
    String,
    Comment,
    Number,
    Function,
    Type,
    Punctuation,
    Text,
}

pub const CATEGORY_COUNT: usize = 8;

impl StyleCategory {
    pub const ALL: [StyleCategory; CATEGORY_COUNT] = [
        StyleCategory::Keyword,
        StyleCategory::String,
        StyleCategory::Comment,
        StyleCategory::Number,
        StyleCategory::Function,
        StyleCategory::Type,
        StyleCategory::Punctuation,
        StyleCategory::Text,
    ];

    pub fn index(self) -> usize {
        match self {
            StyleCategory::Keyword => 0,
            StyleCategory::String => 1,
            StyleCategory::Comment => 2,
            StyleCategory::Number => 3,
            StyleCategory::Function => 4,
            StyleCategory::Type => 5,
            StyleCategory::Punctuation => 6,
            StyleCategory::Text => 7,
        }
    }

    /// Scope path used to ask a theme how this bucket should look.
    fn representative_scope(self) -> Option<&'static str> {
        match self {
            StyleCategory::Keyword => Some("keyword.control"),
            StyleCategory::String => Some("string.quoted.double"),
            StyleCategory::Comment => Some("comment.line"),
            StyleCategory::Number => Some("constant.numeric"),
            StyleCategory::Function => Some("entity.name.function"),
            StyleCategory::Type => Some("storage.type"),
            StyleCategory::Punctuation => Some("punctuation"),
            StyleCategory::Text => None,
        }
    }
}

/// One styled slice of a line. A line's tokens concatenate back to the line
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: StyleCategory,
    pub text: String,
}

impl Token {
    pub fn new(category: StyleCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    /// Whole-line plain token, the degraded form when tokenization fails.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(StyleCategory::Text, text)
    }
}

/// Upper bound on bytes handed to the grammar engine for one line. Regex
/// grammars stall on pathological single-line files; longer lines degrade
/// to plain text at the caller.
pub const MAX_HIGHLIGHT_LEN: usize = 10_000;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("line of {0} bytes exceeds the highlight limit")]
    LineTooLong(usize),
    #[error("grammar parse failed: {0}")]
    Parse(#[from] syntect::parsing::ParsingError),
    #[error("scope stack error: {0}")]
    Scope(#[from] syntect::parsing::ScopeError),
}

/// Tokenization capability. Held as an owned strategy object by whoever
/// renders.
pub trait Tokenize {
    fn tokenize(&self, line: &str) -> Result<Vec<Token>, TokenizeError>;
}

/// Grammar-set prefixes mapped to style buckets, most specific first.
const SCOPE_CATEGORIES: &[(&str, StyleCategory)] = &[
    ("comment", StyleCategory::Comment),
    ("string", StyleCategory::String),
    ("constant.numeric", StyleCategory::Number),
    ("constant.character", StyleCategory::String),
    ("keyword.operator", StyleCategory::Punctuation),
    ("keyword", StyleCategory::Keyword),
    ("storage.type", StyleCategory::Type),
    ("storage", StyleCategory::Keyword),
    ("entity.name.function", StyleCategory::Function),
    ("support.function", StyleCategory::Function),
    ("entity.name.type", StyleCategory::Type),
    ("entity.name.class", StyleCategory::Type),
    ("support.type", StyleCategory::Type),
    ("support.class", StyleCategory::Type),
    ("punctuation", StyleCategory::Punctuation),
];

fn category_for(stack: &ScopeStack) -> StyleCategory {
    // innermost scope wins
    for scope in stack.as_slice().iter().rev() {
        let s = scope.build_string();
        for (prefix, category) in SCOPE_CATEGORIES {
            if s.starts_with(prefix) {
                return *category;
            }
        }
    }
    StyleCategory::Text
}

/// syntect-backed tokenizer bound to one grammar, chosen by file name at
/// startup.
pub struct SyntectTokenizer {
    syntaxes: SyntaxSet,
    syntax: SyntaxReference,
}

impl SyntectTokenizer {
    /// Pick a grammar for `path` by extension (or full file name, which
    /// covers Makefile-style names), falling back to plain text.
    pub fn for_path(path: &Path) -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let syntax = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| syntaxes.find_syntax_by_extension(ext))
            .or_else(|| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|name| syntaxes.find_syntax_by_extension(name))
            })
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text())
            .clone();
        debug!(target: "syntax", grammar = %syntax.name, path = %path.display(), "grammar_selected");
        Self { syntaxes, syntax }
    }

    /// Plain-text tokenizer (every line one `Text` token).
    pub fn plain() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let syntax = syntaxes.find_syntax_plain_text().clone();
        Self { syntaxes, syntax }
    }

    pub fn grammar_name(&self) -> &str {
        &self.syntax.name
    }
}

impl Tokenize for SyntectTokenizer {
    fn tokenize(&self, line: &str) -> Result<Vec<Token>, TokenizeError> {
        if line.len() > MAX_HIGHLIGHT_LEN {
            return Err(TokenizeError::LineTooLong(line.len()));
        }
        // The "newlines" grammar set expects each parsed line to end in \n.
        let padded = format!("{line}\n");
        let mut state = ParseState::new(&self.syntax);
        let ops = state.parse_line(&padded, &self.syntaxes)?;

        let mut stack = ScopeStack::new();
        let mut tokens: Vec<Token> = Vec::new();
        let mut last = 0usize;
        for (offset, op) in ops {
            if offset > last {
                tokens.push(Token::new(category_for(&stack), &padded[last..offset]));
                last = offset;
            }
            stack.apply(&op)?;
        }
        if last < padded.len() {
            tokens.push(Token::new(category_for(&stack), &padded[last..]));
        }

        // Drop the padding newline again; it always sits at the tail of the
        // final token.
        if let Some(tail) = tokens.last_mut()
            && tail.text.ends_with('\n')
        {
            tail.text.pop();
            if tail.text.is_empty() {
                tokens.pop();
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn tokens_concatenate_back_to_the_line() {
        let tok = SyntectTokenizer::for_path(&PathBuf::from("sample.rs"));
        for line in [
            "fn main() {",
            "    let greeting = \"héllo, 世界\"; // say hi",
            "}",
            "",
            "\t\tx += 1;",
        ] {
            let tokens = tok.tokenize(line).unwrap();
            assert_eq!(concat(&tokens), line);
        }
    }

    #[test]
    fn rust_source_gets_non_plain_categories() {
        let tok = SyntectTokenizer::for_path(&PathBuf::from("sample.rs"));
        let tokens = tok.tokenize("let x = \"s\"; // c").unwrap();
        assert!(
            tokens.iter().any(|t| t.category != StyleCategory::Text),
            "expected at least one styled token, got {tokens:?}"
        );
        assert!(
            tokens
                .iter()
                .any(|t| t.category == StyleCategory::Comment && t.text.contains("//")),
            "comment tail should map to the comment bucket: {tokens:?}"
        );
    }

    #[test]
    fn unknown_extension_falls_back_to_plain_text() {
        let tok = SyntectTokenizer::for_path(&PathBuf::from("notes.zzznope"));
        assert_eq!(tok.grammar_name(), "Plain Text");
        let tokens = tok.tokenize("just words").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category, StyleCategory::Text);
        assert_eq!(tokens[0].text, "just words");
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        let tok = SyntectTokenizer::plain();
        assert!(tok.tokenize("").unwrap().is_empty());
    }

    #[test]
    fn overlong_line_is_refused() {
        let tok = SyntectTokenizer::plain();
        let line = "x".repeat(MAX_HIGHLIGHT_LEN + 1);
        assert!(matches!(
            tok.tokenize(&line),
            Err(TokenizeError::LineTooLong(n)) if n == MAX_HIGHLIGHT_LEN + 1
        ));
    }

    #[test]
    fn scope_prefixes_collapse_most_specific_first() {
        let mut stack = ScopeStack::new();
        stack.push(syntect::parsing::Scope::new("source.rs").unwrap());
        assert_eq!(category_for(&stack), StyleCategory::Text);
        stack.push(syntect::parsing::Scope::new("keyword.operator.arithmetic").unwrap());
        assert_eq!(category_for(&stack), StyleCategory::Punctuation);
        stack.push(syntect::parsing::Scope::new("comment.block.rust").unwrap());
        assert_eq!(category_for(&stack), StyleCategory::Comment);
    }
}
