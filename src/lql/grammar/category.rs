//! Token categories assigned to scanned spans of LQL source

use std::fmt;

/// Classification tag for a lexical span.
///
/// The set is fixed: rules in [rules](super::rules) map onto these and nothing
/// adds members at runtime. `Unrecognized` is the residual category for
/// characters no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Comment,
    Keyword,
    LogicalOperator,
    Number,
    Operator,
    Identifier,
    BracketSquare,
    BracketParen,
    BracketBrace,
    Whitespace,
    Unrecognized,
}

impl TokenCategory {
    /// Every category, in rule priority order, residual last
    pub const ALL: [TokenCategory; 11] = [
        TokenCategory::Comment,
        TokenCategory::Keyword,
        TokenCategory::LogicalOperator,
        TokenCategory::Number,
        TokenCategory::Operator,
        TokenCategory::Identifier,
        TokenCategory::BracketSquare,
        TokenCategory::BracketParen,
        TokenCategory::BracketBrace,
        TokenCategory::Whitespace,
        TokenCategory::Unrecognized,
    ];

    /// Highlight scope consumed by editor themes.
    ///
    /// Logical operators share the `operator` scope with arithmetic and
    /// comparison operators.
    pub fn scope(&self) -> &'static str {
        match self {
            TokenCategory::Comment => "comment",
            TokenCategory::Keyword => "keyword",
            TokenCategory::LogicalOperator => "operator",
            TokenCategory::Number => "number",
            TokenCategory::Operator => "operator",
            TokenCategory::Identifier => "identifier",
            TokenCategory::BracketSquare => "delimiter.square",
            TokenCategory::BracketParen => "delimiter.parenthesis",
            TokenCategory::BracketBrace => "delimiter.brace",
            TokenCategory::Whitespace => "white",
            TokenCategory::Unrecognized => "invalid",
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenCategory::Whitespace | TokenCategory::Comment)
    }

    pub fn is_bracket(&self) -> bool {
        matches!(
            self,
            TokenCategory::BracketSquare | TokenCategory::BracketParen | TokenCategory::BracketBrace
        )
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenCategory::Comment => "Comment",
            TokenCategory::Keyword => "Keyword",
            TokenCategory::LogicalOperator => "LogicalOperator",
            TokenCategory::Number => "Number",
            TokenCategory::Operator => "Operator",
            TokenCategory::Identifier => "Identifier",
            TokenCategory::BracketSquare => "BracketSquare",
            TokenCategory::BracketParen => "BracketParen",
            TokenCategory::BracketBrace => "BracketBrace",
            TokenCategory::Whitespace => "Whitespace",
            TokenCategory::Unrecognized => "Unrecognized",
        };
        f.write_str(name)
    }
}
