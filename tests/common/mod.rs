//! Fixture helpers for building bound trees over real source text.
//!
//! Tests write the script with `indoc!`, then build nodes whose ranges are
//! looked up from snippets of that text, the way the binder would report
//! them: 1-based lines and columns, end position just past the last
//! character.

#![allow(dead_code)]

use std::sync::Arc;

use script_completion_server::ir::bound_node::{BoundDocument, BoundNode, BoundNodeKind};
use script_completion_server::ir::symbol::Symbol;
use script_completion_server::ir::text_range::{Position, TextRange};
use script_completion_server::ir::types::{FunctionType, MethodParameter, ScriptType};

pub struct Source {
    text: String,
}

impl Source {
    pub fn new(text: &str) -> Self {
        Source { text: text.to_string() }
    }

    fn position_at(&self, offset: usize) -> Position {
        let before = &self.text[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() as u32 + 1;
        Position::new(line, column)
    }

    fn offset_of(&self, snippet: &str, occurrence: usize) -> usize {
        self.text
            .match_indices(snippet)
            .nth(occurrence)
            .map(|(offset, _)| offset)
            .unwrap_or_else(|| panic!("snippet {:?} #{} not in source", snippet, occurrence))
    }

    /// Range of the first occurrence of `snippet`.
    pub fn span(&self, snippet: &str) -> TextRange {
        self.span_nth(snippet, 0)
    }

    pub fn span_nth(&self, snippet: &str, occurrence: usize) -> TextRange {
        let start = self.offset_of(snippet, occurrence);
        TextRange::new(self.position_at(start), self.position_at(start + snippet.len()))
    }

    /// Range from the start of `first` to the end of `last`.
    pub fn span_between(&self, first: &str, last: &str) -> TextRange {
        let start = self.span(first).start();
        let end = self.span(last).end();
        TextRange::new(start, end)
    }

    /// Cursor just after the first occurrence of `snippet`.
    pub fn after(&self, snippet: &str) -> Position {
        let start = self.offset_of(snippet, 0);
        self.position_at(start + snippet.len())
    }

    /// Cursor on the first character of `snippet`.
    pub fn at(&self, snippet: &str) -> Position {
        self.position_at(self.offset_of(snippet, 0))
    }
}

pub fn node<I>(kind: BoundNodeKind, range: TextRange, children: I) -> Arc<BoundNode>
where
    I: IntoIterator<Item = Arc<BoundNode>>,
{
    BoundNode::new(kind, range, children)
}

pub fn leaf(kind: BoundNodeKind, range: TextRange) -> Arc<BoundNode> {
    BoundNode::leaf(kind, range)
}

pub fn unit<I>(range: TextRange, sections: I) -> Arc<BoundNode>
where
    I: IntoIterator<Item = Arc<BoundNode>>,
{
    node(BoundNodeKind::CompilationUnit, range, sections)
}

pub fn statements<I>(range: TextRange, children: I) -> Arc<BoundNode>
where
    I: IntoIterator<Item = Arc<BoundNode>>,
{
    node(BoundNodeKind::StatementsList, range, children)
}

pub fn static_decl(name: &str, ty: ScriptType, range: TextRange) -> Arc<BoundNode> {
    leaf(
        BoundNodeKind::VariableDeclaration {
            symbol: Arc::new(Symbol::static_variable(name, ty)),
        },
        range,
    )
}

pub fn local_decl(name: &str, ty: ScriptType, range: TextRange) -> Arc<BoundNode> {
    leaf(
        BoundNodeKind::VariableDeclaration {
            symbol: Arc::new(Symbol::local_variable(name, ty)),
        },
        range,
    )
}

/// Function declaration with a parameter list and a body.
pub fn function(
    name: &str,
    return_type: ScriptType,
    parameters: &[(&str, ScriptType, TextRange)],
    parameters_range: TextRange,
    range: TextRange,
    body: Arc<BoundNode>,
) -> Arc<BoundNode> {
    let ty = ScriptType::Function(FunctionType {
        return_type: Box::new(return_type),
        parameters: parameters
            .iter()
            .map(|(name, ty, _)| MethodParameter {
                name: name.to_string(),
                ty: ty.clone(),
            })
            .collect(),
    });
    let parameter_nodes = parameters.iter().map(|(name, ty, range)| {
        leaf(
            BoundNodeKind::Parameter {
                symbol: Arc::new(Symbol::parameter(*name, ty.clone())),
            },
            *range,
        )
    });
    node(
        BoundNodeKind::Function {
            symbol: Arc::new(Symbol::function(name, ty)),
        },
        range,
        [node(BoundNodeKind::ParameterList, parameters_range, parameter_nodes), body],
    )
}

pub fn document(unit: Arc<BoundNode>) -> BoundDocument {
    BoundDocument::new(unit, vec![])
}

pub fn document_with_constants(unit: Arc<BoundNode>, constants: &[(&str, ScriptType)]) -> BoundDocument {
    BoundDocument::new(
        unit,
        constants
            .iter()
            .map(|(name, ty)| Arc::new(Symbol::external_constant(*name, ty.clone())))
            .collect(),
    )
}

pub fn labels(suggestions: &[script_completion_server::features::completion::Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.label.as_str()).collect()
}
