//! Symbols visible at the cursor
//!
//! Visibility follows declaration order: external constants are always in
//! scope, static variables and functions are file-wide once their section has
//! begun, and locals are visible only after their declaration, in their own
//! block and the blocks nested inside it.

use std::sync::Arc;

use tracing::{debug, trace};

use super::context::{CompletionContext, ContextFrame};
use super::error::CompletionError;
use crate::ir::bound_node::{BoundDocument, BoundNode, BoundNodeKind, NodeType};
use crate::ir::symbol::Symbol;

/// Collect the symbols visible in `context`, ordered as constants, static
/// variables, functions, then locals from the outermost block inward.
pub fn collect_symbols(
    document: &BoundDocument,
    context: &CompletionContext,
) -> Result<Vec<Arc<Symbol>>, CompletionError> {
    let mut symbols: Vec<Arc<Symbol>> = document.static_constants.clone();

    match context {
        CompletionContext::NoCode | CompletionContext::BeforeFirst => {}
        CompletionContext::AfterLast => {
            add_static_variables(&mut symbols, document);
            add_functions(&mut symbols, document);
            symbols.extend(declared_locals(document.statements()));
        }
        CompletionContext::Within { entry, .. } => {
            let frames = context.frames();
            let mut levels: Vec<Vec<Arc<Symbol>>> = Vec::new();
            let mut reached_root = false;

            for frame in &frames {
                if let Some(level) = collect_frame(&mut symbols, document, frame) {
                    levels.push(level);
                }
                if frame.node.node_type() == NodeType::CompilationUnit {
                    reached_root = true;
                    break;
                }
            }

            if !reached_root {
                return Err(CompletionError::UnhandledContext {
                    kind: entry.node.node_type(),
                });
            }

            // Frames run inner to outer; outer declarations come first.
            for level in levels.into_iter().rev() {
                symbols.extend(level);
            }
        }
    }

    debug!("Collected {} visible symbols", symbols.len());
    Ok(symbols)
}

/// Apply the scope rule of one frame. File-level symbols go straight into
/// `symbols`; block-level ones are returned as a level.
fn collect_frame(
    symbols: &mut Vec<Arc<Symbol>>,
    document: &BoundDocument,
    frame: &ContextFrame,
) -> Option<Vec<Arc<Symbol>>> {
    match &frame.node.kind {
        BoundNodeKind::CompilationUnit => {
            let predecessor = frame.enclosing.as_ref().or(frame.prev.as_ref());
            match predecessor.map(|n| n.node_type()) {
                Some(NodeType::StaticVariablesList) => {
                    add_static_variables(symbols, document);
                }
                Some(NodeType::FunctionsList) => {
                    add_static_variables(symbols, document);
                    add_functions(symbols, document);
                }
                Some(NodeType::StatementsList) => {
                    add_static_variables(symbols, document);
                    add_functions(symbols, document);
                    if frame.enclosing.is_none() {
                        // Trailing gap after the statements section.
                        return Some(declared_locals(document.statements()));
                    }
                }
                _ => {}
            }
            None
        }
        BoundNodeKind::StatementsList | BoundNodeKind::ForLoop => {
            let level = declared_locals(frame.preceding_children());
            trace!("{} contributes {} locals", frame.node.node_type(), level.len());
            Some(level)
        }
        // The loop variable is bound per iteration, so the iterable cannot see it.
        BoundNodeKind::ForEachLoop => in_body(frame).then(|| declared_locals(frame.preceding_children())),
        BoundNodeKind::Function { .. } => in_body(frame).then(|| parameters(&frame.node)),
        BoundNodeKind::StaticVariablesList
        | BoundNodeKind::FunctionsList
        | BoundNodeKind::ParameterList
        | BoundNodeKind::Parameter { .. }
        | BoundNodeKind::PredefinedType { .. }
        | BoundNodeKind::VariableDeclaration { .. }
        | BoundNodeKind::ExpressionStatement
        | BoundNodeKind::AssignmentStatement
        | BoundNodeKind::IfStatement
        | BoundNodeKind::WhileLoop
        | BoundNodeKind::ReturnStatement
        | BoundNodeKind::BreakStatement
        | BoundNodeKind::ContinueStatement
        | BoundNodeKind::EmptyStatement
        | BoundNodeKind::NameExpression { .. }
        | BoundNodeKind::PropertyAccessExpression { .. }
        | BoundNodeKind::MethodCallExpression
        | BoundNodeKind::ArgumentsList
        | BoundNodeKind::BinaryExpression
        | BoundNodeKind::BinaryOperator
        | BoundNodeKind::UnaryExpression
        | BoundNodeKind::UnaryOperator
        | BoundNodeKind::ConditionalExpression
        | BoundNodeKind::IndexExpression
        | BoundNodeKind::BooleanLiteral
        | BoundNodeKind::IntegerLiteral
        | BoundNodeKind::CharLiteral
        | BoundNodeKind::FloatLiteral
        | BoundNodeKind::StringLiteral
        | BoundNodeKind::InvalidExpression => None,
    }
}

/// Whether the cursor is inside the braced body of the frame's node.
fn in_body(frame: &ContextFrame) -> bool {
    frame
        .enclosing
        .as_ref()
        .is_some_and(|child| child.node_type() == NodeType::StatementsList)
}

fn add_static_variables(symbols: &mut Vec<Arc<Symbol>>, document: &BoundDocument) {
    symbols.extend(
        document
            .static_variables()
            .filter_map(|decl| decl.declared_symbol())
            .cloned(),
    );
}

fn add_functions(symbols: &mut Vec<Arc<Symbol>>, document: &BoundDocument) {
    symbols.extend(
        document
            .functions()
            .filter_map(|function| function.declared_symbol())
            .cloned(),
    );
}

/// Symbols of the variable declarations among `statements`.
fn declared_locals<'a>(statements: impl Iterator<Item = &'a Arc<BoundNode>>) -> Vec<Arc<Symbol>> {
    statements
        .filter_map(|statement| match &statement.kind {
            BoundNodeKind::VariableDeclaration { symbol } => Some(symbol.clone()),
            _ => None,
        })
        .collect()
}

fn parameters(function: &BoundNode) -> Vec<Arc<Symbol>> {
    function
        .children()
        .filter(|child| child.node_type() == NodeType::ParameterList)
        .flat_map(|list| list.children())
        .filter_map(|parameter| match &parameter.kind {
            BoundNodeKind::Parameter { symbol } => Some(symbol.clone()),
            _ => None,
        })
        .collect()
}
