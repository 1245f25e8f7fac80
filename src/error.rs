//! Error taxonomy for the generation pipeline.
//!
//! Each stage has its own error type so callers can tell a bad grammar apart from
//! a bad symbol string or a broken asset. [`FloraError`] unifies them for the
//! [`PlantScene`](crate::scene::PlantScene) driver.

use thiserror::Error;

/// Problems with the rule set or the generation parameters.
///
/// Always surfaced before any rewriting starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rule set is empty")]
    EmptyRuleSet,

    #[error("grammar has no axiom")]
    MissingAxiom,

    #[error("malformed rule `{rule}`: {reason}")]
    MalformedRule { rule: String, reason: &'static str },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Failures while walking a symbol string with the turtle.
///
/// `index` is the position of the offending op in the compiled program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpreterError {
    #[error("pop at symbol {index} with an empty pose stack")]
    UnmatchedPop { index: usize },

    #[error("push at symbol {index} exceeds the maximum stack depth of {max_depth}")]
    StackOverflow { index: usize, max_depth: usize },

    #[error("{open} push(es) left open at the end of the symbol string")]
    UnclosedPush { open: usize },
}

/// Which attribute array of a base mesh a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshAttribute {
    Position,
    Normal,
}

impl std::fmt::Display for MeshAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::Normal => f.write_str("normal"),
        }
    }
}

/// Base mesh problems. Fatal for the bake that needs the mesh, and only for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("face {face} references {attribute} {index} but only {len} exist (indices are 1-based)")]
    IndexOutOfRange {
        face: usize,
        attribute: MeshAttribute,
        index: u32,
        len: usize,
    },

    #[error("base mesh `{0}` has not been loaded")]
    NotLoaded(&'static str),
}

/// Any failure of the full grammar → skeleton → mesh pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FloraError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
