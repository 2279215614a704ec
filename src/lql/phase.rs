//! Compilation phases of the remote pipeline
//!
//! The service runs the phases strictly in [Phase::ALL] order. A failure at one
//! phase means no later phase produced anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexer,
    Parser,
    Semantic,
    Tac,
    Optimizer,
    Execution,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Phase; 6] = [
        Phase::Lexer,
        Phase::Parser,
        Phase::Semantic,
        Phase::Tac,
        Phase::Optimizer,
        Phase::Execution,
    ];

    /// Position in the execution order
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Wire name, as used in `error_phase`
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Semantic => "semantic",
            Phase::Tac => "tac",
            Phase::Optimizer => "optimizer",
            Phase::Execution => "execution",
        }
    }

    /// Key of this phase's artifact in the response `phases` object
    pub fn artifact_field(&self) -> &'static str {
        match self {
            Phase::Lexer => "tokens",
            Phase::Parser => "parser",
            Phase::Semantic => "semantic",
            Phase::Tac => "tac",
            Phase::Optimizer => "optimized_tac",
            Phase::Execution => "execution_output",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Phase::Lexer => "Lexer Output",
            Phase::Parser => "Parser Output",
            Phase::Semantic => "Semantic Analyzer",
            Phase::Tac => "Intermediate Code",
            Phase::Optimizer => "Optimizer Output",
            Phase::Execution => "Final Code Output",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phase::Lexer => "Tokenization results",
            Phase::Parser => "Abstract Syntax Tree",
            Phase::Semantic => "Type checking & validation",
            Phase::Tac => "TAC representation",
            Phase::Optimizer => "Optimized instructions",
            Phase::Execution => "Compiled result",
        }
    }

    /// Whether this phase runs after `other`
    pub fn is_after(&self, other: Phase) -> bool {
        self.index() > other.index()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a phase name that is not part of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phase '{0}'")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.name() == s)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}
