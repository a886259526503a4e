//! Context detection for code completion
//!
//! Decides what may be typed at the cursor purely from the shape of the bound
//! tree: which node encloses the cursor, and which of its children lie before
//! and after it.
//!
//! There are four kinds of context:
//! 1. No code at all (empty file)
//! 2. Before the first top-level section
//! 3. After all top-level content
//! 4. Within a node, between two of its children (or at either edge)
//!
//! For the last kind the classifier looks for the nearest enclosing node it
//! has a rule for. Expressions and most statements have none; a cursor inside
//! them is classified by the statement list or section around them.

use std::sync::Arc;

use tracing::{debug, trace};

use super::error::CompletionError;
use crate::features::node_finder::{ResolutionEntry, resolve};
use crate::ir::bound_node::{BoundDocument, BoundNode, BoundNodeKind, NodeType};
use crate::ir::text_range::Position;
use crate::ir::types::{MethodInfo, PropertyInfo, ScriptType};

/// Where the cursor sits relative to the bound tree.
#[derive(Debug, Clone)]
pub enum CompletionContext {
    /// The file has no declarations and no statements.
    NoCode,
    /// The cursor precedes every top-level section.
    BeforeFirst,
    /// The cursor follows all top-level content.
    AfterLast,
    /// The cursor lies inside `entry.node`, after `prev` and before `next`
    /// (children of that node; `None` at either edge).
    Within {
        entry: Arc<ResolutionEntry>,
        prev: Option<Arc<BoundNode>>,
        next: Option<Arc<BoundNode>>,
    },
}

/// One step of the outward walk from the innermost node to the root.
///
/// `enclosing` is the child of `node` that contains the cursor; it is `None`
/// only for the innermost frame, where the cursor sits in a gap between
/// `prev` and `next`. For outer frames `prev` and `next` are the siblings of
/// `enclosing`.
#[derive(Debug, Clone)]
pub struct ContextFrame {
    pub node: Arc<BoundNode>,
    pub prev: Option<Arc<BoundNode>>,
    pub next: Option<Arc<BoundNode>>,
    pub enclosing: Option<Arc<BoundNode>>,
}

impl ContextFrame {
    /// Children of this frame's node that lie entirely before the cursor.
    pub fn preceding_children(&self) -> impl Iterator<Item = &Arc<BoundNode>> {
        let boundary = self.enclosing.as_ref().or(self.next.as_ref());
        self.node
            .children()
            .take_while(move |child| boundary.is_none_or(|b| !Arc::ptr_eq(child, b)))
    }
}

impl CompletionContext {
    /// Frames from the innermost node outward; empty outside any node.
    pub fn frames(&self) -> Vec<ContextFrame> {
        let CompletionContext::Within { entry, prev, next } = self else {
            return vec![];
        };

        let mut frames = vec![ContextFrame {
            node: entry.node.clone(),
            prev: prev.clone(),
            next: next.clone(),
            enclosing: None,
        }];

        let mut child = &entry.node;
        for ancestor in entry.ancestors().skip(1) {
            let parent = &ancestor.node;
            let index = parent.children().position(|c| Arc::ptr_eq(c, child));
            let (prev, next) = match index {
                Some(i) => (
                    i.checked_sub(1).and_then(|j| parent.child_at(j)).cloned(),
                    parent.child_at(i + 1).cloned(),
                ),
                None => (None, None),
            };
            frames.push(ContextFrame {
                node: parent.clone(),
                prev,
                next,
                enclosing: Some(child.clone()),
            });
            child = parent;
        }

        frames
    }
}

/// Keyword, type, statement and symbol categories allowed at the cursor.
/// Several may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Admissions {
    pub can_static: bool,
    pub can_void: bool,
    pub can_type: bool,
    pub can_statement: bool,
    pub can_symbol: bool,
}

impl Admissions {
    fn top_level(can_static: bool, can_void_or_type: bool, can_statement: bool) -> Self {
        Admissions {
            can_static,
            can_void: can_void_or_type,
            can_type: can_void_or_type,
            can_statement,
            can_symbol: can_statement,
        }
    }

    fn statement() -> Self {
        Admissions {
            can_statement: true,
            can_symbol: true,
            ..Admissions::default()
        }
    }
}

/// Member completion after `callee.`: members of `callee_type` whose names
/// start with `partial`, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberQuery {
    pub callee_type: ScriptType,
    pub partial: String,
}

impl MemberQuery {
    fn matches(&self, name: &str) -> bool {
        name.to_lowercase().starts_with(&self.partial.to_lowercase())
    }

    pub fn matching_properties(&self) -> Vec<PropertyInfo> {
        self.callee_type
            .instance_properties()
            .into_iter()
            .filter(|p| self.matches(&p.name))
            .collect()
    }

    pub fn matching_methods(&self) -> Vec<MethodInfo> {
        self.callee_type
            .instance_methods()
            .into_iter()
            .filter(|m| self.matches(&m.name))
            .collect()
    }
}

/// Result of classifying a completion context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub admissions: Admissions,
    pub members: Option<MemberQuery>,
}

impl Classification {
    fn admit(admissions: Admissions) -> Self {
        Classification {
            admissions,
            members: None,
        }
    }
}

/// Determine the completion context at `position`.
pub fn determine_context(
    document: &BoundDocument,
    position: Position,
) -> Result<CompletionContext, CompletionError> {
    let unit = &document.unit;
    if unit.child_count() == 0 {
        debug!("No code in document");
        return Ok(CompletionContext::NoCode);
    }

    let entry = match resolve(unit, position) {
        Some(entry) => entry,
        None if unit.range.is_after(position) => return Ok(CompletionContext::BeforeFirst),
        None => return Ok(CompletionContext::AfterLast),
    };

    let node = &entry.node;
    let count = node.child_count();
    // Find i with child[i] before the cursor and child[i + 1] after it;
    // i = -1 stands for the gap before the first child.
    for i in -1..count as isize {
        let prev = if i < 0 { None } else { node.child_at(i as usize) };
        let next = node.child_at((i + 1) as usize);
        let prev_ok = prev.is_none_or(|p| p.range.is_before(position));
        let next_ok = next.is_none_or(|n| n.range.is_after(position));
        if prev_ok && next_ok {
            trace!(
                "Cursor {} within {} between {:?} and {:?}",
                position,
                node.node_type(),
                prev.map(|p| p.node_type()),
                next.map(|n| n.node_type())
            );
            let prev = prev.cloned();
            let next = next.cloned();
            return Ok(CompletionContext::Within { entry, prev, next });
        }
    }

    Err(CompletionError::UnexpectedGap {
        kind: node.node_type(),
    })
}

/// Classify what may be typed in `context`.
pub fn classify(
    document: &BoundDocument,
    context: &CompletionContext,
) -> Result<Classification, CompletionError> {
    let classification = match context {
        CompletionContext::NoCode => Classification::admit(Admissions::top_level(true, true, true)),
        CompletionContext::BeforeFirst => {
            // New content goes in front of whatever section comes first.
            let has_statics = document.has_static_variables();
            let has_functions = document.has_functions();
            Classification::admit(Admissions::top_level(
                true,
                !has_statics,
                !has_statics && !has_functions,
            ))
        }
        CompletionContext::AfterLast => {
            // An earlier section cannot be reopened once a later one began.
            let has_functions = document.has_functions();
            let has_statements = document.has_statements();
            Classification::admit(Admissions::top_level(
                !has_functions && !has_statements,
                !has_statements,
                true,
            ))
        }
        CompletionContext::Within { entry, .. } => {
            classify_within(context.frames(), entry.node.node_type())?
        }
    };

    debug!("Completion context {:?} classified as {:?}", context_name(context), classification);
    Ok(classification)
}

fn classify_within(
    frames: Vec<ContextFrame>,
    innermost: NodeType,
) -> Result<Classification, CompletionError> {
    let mut inner: Option<&ContextFrame> = None;
    for frame in &frames {
        match &frame.node.kind {
            BoundNodeKind::CompilationUnit if frame.enclosing.is_none() => {
                return Ok(Classification::admit(section_admissions(
                    frame.prev.as_ref().map(|n| n.node_type()),
                    frame.next.as_ref().map(|n| n.node_type()),
                )?));
            }
            BoundNodeKind::StatementsList => {
                return Ok(Classification::admit(Admissions::statement()));
            }
            BoundNodeKind::StaticVariablesList => {
                let admissions = match inner {
                    // Between two static declarations.
                    None => Admissions {
                        can_static: true,
                        ..Admissions::default()
                    },
                    Some(declaration) => declaration_admissions(declaration),
                };
                return Ok(Classification::admit(admissions));
            }
            BoundNodeKind::FunctionsList => {
                return Ok(Classification::admit(Admissions::top_level(false, true, false)));
            }
            BoundNodeKind::ParameterList => {
                return Ok(Classification::admit(Admissions {
                    can_type: true,
                    ..Admissions::default()
                }));
            }
            BoundNodeKind::Function { .. } => {
                let on_return_type = frame
                    .enclosing
                    .as_ref()
                    .is_some_and(|child| child.node_type() == NodeType::PredefinedType);
                return Ok(if on_return_type {
                    Classification::admit(Admissions::top_level(false, true, false))
                } else {
                    // Name or another gap in the header.
                    Classification::default()
                });
            }
            BoundNodeKind::PropertyAccessExpression {
                name,
                callee_type,
                member,
            } => {
                if frame.enclosing.is_none() {
                    if member.is_some() {
                        return Ok(Classification::default());
                    }
                    return Ok(Classification {
                        admissions: Admissions::default(),
                        members: Some(MemberQuery {
                            callee_type: callee_type.clone(),
                            partial: name.clone(),
                        }),
                    });
                }
                // Cursor is inside the callee, not on the member name.
                trace!("Cursor inside callee of member access, deferring to parent");
            }
            BoundNodeKind::BooleanLiteral
            | BoundNodeKind::IntegerLiteral
            | BoundNodeKind::CharLiteral
            | BoundNodeKind::FloatLiteral
            | BoundNodeKind::StringLiteral => return Ok(Classification::default()),
            // A unit reached from inside a section means that section had no
            // rule for the cursor.
            BoundNodeKind::CompilationUnit
            | BoundNodeKind::Parameter { .. }
            | BoundNodeKind::PredefinedType { .. }
            | BoundNodeKind::VariableDeclaration { .. }
            | BoundNodeKind::ExpressionStatement
            | BoundNodeKind::AssignmentStatement
            | BoundNodeKind::IfStatement
            | BoundNodeKind::WhileLoop
            | BoundNodeKind::ForLoop
            | BoundNodeKind::ForEachLoop
            | BoundNodeKind::ReturnStatement
            | BoundNodeKind::BreakStatement
            | BoundNodeKind::ContinueStatement
            | BoundNodeKind::EmptyStatement
            | BoundNodeKind::NameExpression { .. }
            | BoundNodeKind::MethodCallExpression
            | BoundNodeKind::ArgumentsList
            | BoundNodeKind::BinaryExpression
            | BoundNodeKind::BinaryOperator
            | BoundNodeKind::UnaryExpression
            | BoundNodeKind::UnaryOperator
            | BoundNodeKind::ConditionalExpression
            | BoundNodeKind::IndexExpression
            | BoundNodeKind::InvalidExpression => {
                trace!("No rule for {}, deferring to parent", frame.node.node_type());
            }
        }
        inner = Some(frame);
    }

    Err(CompletionError::UnhandledContext { kind: innermost })
}

/// Admissions inside a static variable declaration, given the declaration's
/// own frame: its type accepts a type name, everything else is the
/// initializer, which accepts only symbols.
fn declaration_admissions(declaration: &ContextFrame) -> Admissions {
    let part = declaration.enclosing.as_ref().or(declaration.next.as_ref());
    if part.is_some_and(|child| child.node_type() == NodeType::PredefinedType) {
        Admissions {
            can_type: true,
            ..Admissions::default()
        }
    } else {
        Admissions {
            can_symbol: true,
            ..Admissions::default()
        }
    }
}

/// Admissions in a gap between top-level sections. Sections must appear in
/// the order static variables, functions, statements.
fn section_admissions(
    predecessor: Option<NodeType>,
    successor: Option<NodeType>,
) -> Result<Admissions, CompletionError> {
    let statements_may_start = matches!(successor, None | Some(NodeType::StatementsList));
    let admissions = match predecessor {
        // In front of the statics nothing but another static fits, the same
        // as a cursor before the first section.
        None => Admissions::top_level(
            true,
            successor != Some(NodeType::StaticVariablesList),
            statements_may_start,
        ),
        Some(NodeType::StaticVariablesList) => Admissions::top_level(true, true, statements_may_start),
        Some(NodeType::FunctionsList) => Admissions::top_level(false, true, true),
        Some(NodeType::StatementsList) => Admissions::top_level(false, false, true),
        Some(other) => return Err(CompletionError::UnhandledContext { kind: other }),
    };
    Ok(admissions)
}

fn context_name(context: &CompletionContext) -> String {
    match context {
        CompletionContext::NoCode => "NoCode".to_string(),
        CompletionContext::BeforeFirst => "BeforeFirst".to_string(),
        CompletionContext::AfterLast => "AfterLast".to_string(),
        CompletionContext::Within { entry, .. } => format!("Within({})", entry.node.node_type()),
    }
}
