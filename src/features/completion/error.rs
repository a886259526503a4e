use thiserror::Error;

use crate::ir::bound_node::NodeType;

/// Failures of a completion query.
///
/// The first two reject a request whose inputs break the binder's contract.
/// The others are internal consistency failures: a tree shape the classifier
/// has no rule for. They are reported, never turned into an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Cursor {line}:{column} is not a valid document position")]
    InvalidPosition { line: u32, column: u32 },

    #[error("Malformed bound tree: {reason}")]
    MalformedTree { reason: String },

    #[error("No completion rule covers a cursor inside {kind}")]
    UnhandledContext { kind: NodeType },

    #[error("Cursor lies in {kind} but between none of its children")]
    UnexpectedGap { kind: NodeType },
}
