//! Declarative rule table for the LQL tag grammar
//!
//! Rules are `(category, pattern)` pairs tried in declaration order; the first
//! rule whose pattern matches at the scan position wins. Order is the grammar:
//!
//! 1. comment (`@` to end of line, shadows everything after it)
//! 2. keyword (word-bounded)
//! 3. logical operator (word-bounded)
//! 4. number (`123`, `1.5`; no sign, no exponent)
//! 5. operator
//! 6. identifier
//! 7. square, paren and brace brackets
//! 8. whitespace
//!
//! Anything left over is consumed one character at a time as
//! [TokenCategory::Unrecognized].
//!
//! Word boundaries are ASCII (`(?-u:\b)`): a digit or keyword right after a
//! non-ASCII letter still starts a token, as it does in the editor's Monarch
//! tokenizer.
//!
//! The remote lexer phase keeps its own grammar. This table mirrors it only as
//! far as highlighting needs; bump [GRAMMAR_VERSION] whenever a rule changes so
//! divergence stays visible.

use super::category::TokenCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// Version of the rule table below
pub const GRAMMAR_VERSION: &str = "1.2";

/// Reserved words of the language
pub const KEYWORDS: &[&str] = &[
    "list",
    "filter",
    "sort",
    "asc",
    "desc",
    "map",
    "print",
    "mean",
    "sum",
    "median",
    "variance",
    "std",
    "min",
    "max",
    "count",
    "union",
    "intersection",
    "difference",
];

/// Word operators
pub const LOGICAL_OPERATORS: &[&str] = &["and", "or", "xor"];

/// Symbolic operators. `%` and `!=` are accepted by the remote lexer, so they
/// are declared here as well.
pub const OPERATORS: &[&str] = &[
    ">=", "<=", "==", "!=", "=>", "+", "-", "*", "/", "%", "=", ">", "<",
];

/// The rule table, highest priority first
pub const RULES: &[(TokenCategory, &str)] = &[
    (TokenCategory::Comment, r"@[^\r\n]*"),
    (
        TokenCategory::Keyword,
        r"(?-u:\b)(?:list|filter|sort|asc|desc|map|print|mean|sum|median|variance|std|min|max|count|union|intersection|difference)(?-u:\b)",
    ),
    (TokenCategory::LogicalOperator, r"(?-u:\b)(?:and|or|xor)(?-u:\b)"),
    (TokenCategory::Number, r"(?-u:\b)[0-9]+(?:\.[0-9]+)?(?-u:\b)"),
    (TokenCategory::Operator, r">=|<=|==|!=|=>|\+|-|\*|/|%|=|>|<"),
    (TokenCategory::Identifier, r"[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenCategory::BracketSquare, r"[\[\]]"),
    (TokenCategory::BracketParen, r"[()]"),
    (TokenCategory::BracketBrace, r"[{}]"),
    (TokenCategory::Whitespace, r"\s+"),
];

/// A compiled rule
#[derive(Debug)]
pub struct LexicalRule {
    pub category: TokenCategory,
    pub regex: Regex,
}

static COMPILED_RULES: Lazy<Vec<LexicalRule>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|(category, pattern)| LexicalRule {
            category: *category,
            regex: Regex::new(pattern).unwrap(),
        })
        .collect()
});

/// Every rule as one capture group of a single alternation, in table order.
/// Leftmost-first matching picks the earliest position any rule matches at, and
/// the first declared rule among those matching there.
static ALTERNATION: Lazy<Regex> = Lazy::new(|| {
    let pattern = RULES
        .iter()
        .map(|(_, pattern)| format!("({})", pattern))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).unwrap()
});

/// The compiled rule table, in priority order
pub fn rules() -> &'static [LexicalRule] {
    &COMPILED_RULES
}

/// The whole table as one regex; capture group `i + 1` is rule `i`
pub fn alternation() -> &'static Regex {
    &ALTERNATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(rules().len(), RULES.len());
    }

    #[test]
    fn test_priority_order() {
        let order: Vec<TokenCategory> = rules().iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
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
            ]
        );
    }

    fn matches_whole(category: TokenCategory, word: &str) -> bool {
        let rule = rules()
            .iter()
            .find(|r| r.category == category)
            .unwrap();
        rule.regex
            .find(word)
            .map(|m| m.start() == 0 && m.end() == word.len())
            .unwrap_or(false)
    }

    #[test]
    fn test_alternation_has_a_group_per_rule() {
        assert_eq!(alternation().captures_len(), RULES.len() + 1);
    }

    #[test]
    fn test_word_boundaries_are_ascii() {
        let keyword = &rules()[1];
        let m = keyword.regex.find_at("élist", 2).unwrap();
        assert_eq!(m.range(), 2..6);
    }

    #[test]
    fn test_keyword_rule_matches_catalogue() {
        for keyword in KEYWORDS {
            assert!(
                matches_whole(TokenCategory::Keyword, keyword),
                "keyword rule should match '{}'",
                keyword
            );
        }
    }

    #[test]
    fn test_logical_rule_matches_catalogue() {
        for op in LOGICAL_OPERATORS {
            assert!(matches_whole(TokenCategory::LogicalOperator, op));
            assert!(!matches_whole(TokenCategory::Keyword, op));
        }
    }

    #[test]
    fn test_operator_rule_matches_catalogue() {
        for op in OPERATORS {
            assert!(
                matches_whole(TokenCategory::Operator, op),
                "operator rule should match '{}'",
                op
            );
        }
    }
}
