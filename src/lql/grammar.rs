//! Lexical tag grammar for LQL source
//!
//!     This is the client-side tokenizer used for syntax-aware editing. It is purely
//!     cosmetic: the remote lexer phase is the authority on what a program means, and
//!     the two grammars are kept in step by hand (see [rules::GRAMMAR_VERSION]).
//!
//! Scanning
//!
//!     [classify] walks the source left to right. At each position the rules of
//!     [rules::RULES] are tried in priority order and the first one matching exactly at
//!     that position consumes its span. A character no rule matches becomes a single
//!     character [TokenCategory::Unrecognized] span, so classification never fails and
//!     the spans always tile the input: no gaps, no overlaps, concatenation equals the
//!     source.
//!
//!     Scanning is line-bounded, the same way an editor tokenizer runs per line. Only a
//!     whitespace span may contain a newline, and it ends right after it. Word-boundary
//!     rules still see the characters around the scan position, so `1list` does not
//!     produce a keyword and `anderson` is one identifier.
//!
//!     Signed numbers are an operator span followed by a number span.
//!
//!     The rules are searched together as one alternation. A search that finds
//!     its match further along the line also proves nothing matches in between,
//!     so the match is kept and the characters before it are emitted as
//!     unrecognized without searching again. Each line is scanned in linear time.

pub mod category;
pub mod rules;

pub use category::TokenCategory;
pub use rules::{alternation, rules, GRAMMAR_VERSION, KEYWORDS, LOGICAL_OPERATORS, OPERATORS};

use std::fmt;
use std::ops::Range;

/// A classified span of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<'a> {
    /// Byte range in the classified source
    pub span: Range<usize>,
    /// The spanned text
    pub text: &'a str,
    pub category: TokenCategory,
}

impl fmt::Display for Tagged<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16}{:>5}..{:<5} {:?}",
            self.category.to_string(),
            self.span.start,
            self.span.end,
            self.text
        )
    }
}

/// Lazy scan over a source string.
///
/// Cloning restarts nothing; it forks the scan at the current position. Call
/// [classify] again to start over.
#[derive(Debug, Clone)]
pub struct Classify<'a> {
    source: &'a str,
    pos: usize,
    ahead: Option<Ahead>,
}

/// Result of the last search on the current line
#[derive(Debug, Clone)]
struct Ahead {
    span: Range<usize>,
    /// `None` when no rule matches anywhere from the search position to the
    /// end of the line; `span` is then empty at the line end
    category: Option<TokenCategory>,
}

/// Classify `source` into tagged spans
pub fn classify(source: &str) -> Classify<'_> {
    Classify {
        source,
        pos: 0,
        ahead: None,
    }
}

/// Classify each line of `source` separately.
///
/// Lines are split on `\n`, which is not part of any line. Because scanning is
/// line-bounded, the spans of a line are the same as the spans [classify] yields
/// for that stretch of the whole source.
pub fn classify_lines(source: &str) -> impl Iterator<Item = Vec<Tagged<'_>>> {
    source.split('\n').map(|line| classify(line).collect())
}

impl<'a> Classify<'a> {
    /// End of the line containing the scan position, including its newline
    fn line_end(&self) -> usize {
        match self.source[self.pos..].find('\n') {
            Some(offset) => self.pos + offset + 1,
            None => self.source.len(),
        }
    }

    /// Leftmost rule match between the scan position and the end of its line
    fn search(&self) -> Ahead {
        let line_end = self.line_end();
        // Slicing only the end keeps the left context visible to `\b`.
        let window = &self.source[..line_end];
        alternation()
            .captures_at(window, self.pos)
            .and_then(|captures| {
                captures
                    .iter()
                    .skip(1)
                    .zip(rules())
                    .find_map(|(group, rule)| group.map(|m| (m.range(), rule.category)))
            })
            .map(|(span, category)| Ahead {
                span,
                category: Some(category),
            })
            .unwrap_or(Ahead {
                span: line_end..line_end,
                category: None,
            })
    }

    fn emit(&mut self, end: usize, category: TokenCategory) -> Tagged<'a> {
        let span = self.pos..end;
        self.pos = end;
        Tagged {
            text: &self.source[span.clone()],
            span,
            category,
        }
    }
}

impl<'a> Iterator for Classify<'a> {
    type Item = Tagged<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.source.len() {
            return None;
        }

        let ahead = match self.ahead.take() {
            Some(ahead)
                if ahead.span.start > self.pos
                    || (ahead.span.start == self.pos && ahead.category.is_some()) =>
            {
                ahead
            }
            _ => self.search(),
        };
        if ahead.span.start == self.pos && ahead.span.end > self.pos {
            if let Some(category) = ahead.category {
                return Some(self.emit(ahead.span.end, category));
            }
        }
        self.ahead = Some(ahead);

        let width = self.source[self.pos..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        Some(self.emit(self.pos + width, TokenCategory::Unrecognized))
    }
}
