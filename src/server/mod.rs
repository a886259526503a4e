//! JSON-per-line request loop
//!
//! Each input line holds one request object; each request gets exactly one
//! response line. stdout carries nothing else, logs go to stderr.

pub mod protocol;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::features::completion::CompletionProvider;
use crate::ir::bound_node::NodeType;
use crate::ir::text_range::Position;
use protocol::{CompletionResponse, ErrorResponse, NodesResponse, OkResponse, Request, Response};

/// Response to one input line, plus whether the loop should stop after
/// writing it.
#[derive(Debug)]
pub struct Reply {
    pub response: Response,
    pub shutdown: bool,
}

pub struct Server {
    provider: CompletionProvider,
}

impl Server {
    pub fn new(provider: CompletionProvider) -> Self {
        Self { provider }
    }

    /// Handle one raw input line. Blank lines get no reply.
    pub fn handle_line(&self, line: &str) -> Option<Reply> {
        if line.trim().is_empty() {
            return None;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("Invalid request: {}", e);
                return Some(Reply {
                    response: Response::Error(ErrorResponse {
                        id: salvage_id(line),
                        error: format!("invalid request: {}", e),
                    }),
                    shutdown: false,
                });
            }
        };

        let shutdown = matches!(request, Request::Shutdown { .. });
        Some(Reply {
            response: self.handle_request(request),
            shutdown,
        })
    }

    pub fn handle_request(&self, request: Request) -> Response {
        debug!("Handling {} request {}", request.name(), request.id());
        match request {
            Request::Completion {
                id,
                document,
                line,
                column,
            } => match self.provider.get(&document, Position::new(line, column)) {
                Ok(suggestions) => Response::Completion(CompletionResponse { id, suggestions }),
                Err(e) => {
                    error!("Completion request {} failed: {}", id, e);
                    Response::Error(ErrorResponse {
                        id,
                        error: e.to_string(),
                    })
                }
            },
            Request::Nodes { id } => Response::Nodes(NodesResponse {
                id,
                nodes: NodeType::ALL.to_vec(),
            }),
            Request::Shutdown { id } => Response::Ok(OkResponse { id, ok: true }),
        }
    }

    /// Serve requests from `input` until it ends or a shutdown request arrives.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        info!("Serving completion requests (index base {:?})", self.provider.index_base());
        for line in input.lines() {
            let line = line.context("failed to read request line")?;
            let Some(reply) = self.handle_line(&line) else {
                continue;
            };
            writeln!(output, "{}", serde_json::to_string(&reply.response)?)?;
            output.flush()?;
            if reply.shutdown {
                info!("Shutdown requested");
                break;
            }
        }
        Ok(())
    }
}

/// Best-effort request id of a line that failed to parse as a request.
fn salvage_id(line: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|value| value.get("id").and_then(serde_json::Value::as_u64))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salvage_id() {
        assert_eq!(salvage_id(r#"{"type":"bogus","id":17}"#), 17);
        assert_eq!(salvage_id("not json"), 0);
    }

    #[test]
    fn test_run_stops_at_shutdown() {
        let server = Server::new(CompletionProvider::default());
        let input = "\n{\"type\":\"nodes\",\"id\":1}\n{\"type\":\"shutdown\",\"id\":2}\n{\"type\":\"nodes\",\"id\":3}\n";
        let mut output = Vec::new();
        server.run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], r#"{"id":2,"ok":true}"#);
    }
}
