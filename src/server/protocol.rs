//! Request and response records of the line protocol.

use serde::{Deserialize, Serialize};

use crate::features::completion::Suggestion;
use crate::ir::bound_node::{BoundDocument, NodeType};

/// One request per input line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[allow(clippy::large_enum_variant)]
pub enum Request {
    /// Suggestions at `line:column` in a bound document.
    Completion {
        id: u64,
        document: BoundDocument,
        line: u32,
        column: u32,
    },
    /// Names of every bound node kind, for the editor's tree view.
    Nodes { id: u64 },
    /// Graceful shutdown
    Shutdown { id: u64 },
}

impl Request {
    pub fn id(&self) -> u64 {
        match self {
            Request::Completion { id, .. } | Request::Nodes { id } | Request::Shutdown { id } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Request::Completion { .. } => "completion",
            Request::Nodes { .. } => "nodes",
            Request::Shutdown { .. } => "shutdown",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Completion(CompletionResponse),
    Nodes(NodesResponse),
    Ok(OkResponse),
    Error(ErrorResponse),
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub id: u64,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct NodesResponse {
    pub id: u64,
    pub nodes: Vec<NodeType>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub id: u64,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub id: u64,
    pub error: String,
}
