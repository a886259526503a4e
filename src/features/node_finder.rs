//! Locating the bound node under the cursor
//!
//! Descends from the compilation unit to the innermost node whose range
//! contains the cursor and keeps the chain of enclosing nodes, so callers can
//! walk outward without the tree itself storing parent links.

use std::sync::Arc;

use tracing::trace;

use crate::features::completion::error::CompletionError;
use crate::ir::bound_node::{BoundNode, NodeType};
use crate::ir::text_range::Position;

/// Innermost node containing the cursor plus a link to the entry of its parent.
///
/// Entries form a singly linked chain ending at the root. They are rebuilt for
/// every query and never stored on the tree.
#[derive(Debug, Clone)]
pub struct ResolutionEntry {
    pub parent: Option<Arc<ResolutionEntry>>,
    pub node: Arc<BoundNode>,
}

impl ResolutionEntry {
    /// Iterates from this entry outward to the root, this entry included.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of entries in the chain, this one included.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a ResolutionEntry>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ResolutionEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Find the innermost node containing `position`.
///
/// Returns `None` only when the root itself does not contain the position.
/// When the position falls in a gap between children, the node owning the
/// gap is the match.
pub fn resolve(root: &Arc<BoundNode>, position: Position) -> Option<Arc<ResolutionEntry>> {
    if !root.range.contains(position) {
        trace!("Position {} outside root range {}", position, root.range);
        return None;
    }

    let mut entry = Arc::new(ResolutionEntry {
        parent: None,
        node: root.clone(),
    });

    // Children are ordered and disjoint: at most one of them can match.
    loop {
        let next = entry
            .node
            .children()
            .find(|child| child.range.contains(position))
            .cloned();
        let Some(child) = next else {
            break;
        };
        trace!("Descending into {} at {}", child.node_type(), child.range);
        entry = Arc::new(ResolutionEntry {
            parent: Some(entry),
            node: child,
        });
    }

    trace!("Innermost node: {} at {}", entry.node.node_type(), entry.node.range);
    Some(entry)
}

/// Reject trees that break the ordering contract the resolver relies on.
///
/// Every range must be well formed, every child must lie inside its parent,
/// and siblings must be strictly increasing and non-overlapping. A
/// compilation unit may only hold its sections, each at most once and in
/// order.
pub fn validate_tree(root: &BoundNode) -> Result<(), CompletionError> {
    if root.node_type() == NodeType::CompilationUnit {
        validate_sections(root)?;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !node.range.is_well_formed() {
            return Err(CompletionError::MalformedTree {
                reason: format!("{} has inverted range {}", node.node_type(), node.range),
            });
        }

        let mut previous: Option<&Arc<BoundNode>> = None;
        for child in node.children() {
            if !node.range.encloses(&child.range) {
                return Err(CompletionError::MalformedTree {
                    reason: format!(
                        "{} at {} escapes parent {} at {}",
                        child.node_type(),
                        child.range,
                        node.node_type(),
                        node.range
                    ),
                });
            }
            if let Some(previous) = previous {
                if previous.range.end() > child.range.start() {
                    return Err(CompletionError::MalformedTree {
                        reason: format!(
                            "{} at {} overlaps preceding sibling {} at {}",
                            child.node_type(),
                            child.range,
                            previous.node_type(),
                            previous.range
                        ),
                    });
                }
            }
            previous = Some(child);
            stack.push(child);
        }
    }
    Ok(())
}

fn validate_sections(unit: &BoundNode) -> Result<(), CompletionError> {
    let mut last_rank = None;
    for section in unit.children() {
        let rank = match section.node_type() {
            NodeType::StaticVariablesList => 0,
            NodeType::FunctionsList => 1,
            NodeType::StatementsList => 2,
            other => {
                return Err(CompletionError::MalformedTree {
                    reason: format!("{} at {} is not a top-level section", other, section.range),
                });
            }
        };
        if last_rank.is_some_and(|last| last >= rank) {
            return Err(CompletionError::MalformedTree {
                reason: format!("section {} at {} is out of order", section.node_type(), section.range),
            });
        }
        last_rank = Some(rank);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::bound_node::BoundNodeKind;
    use crate::ir::text_range::TextRange;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> TextRange {
        TextRange::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    /// `a + b` laid out on line 1: name(1..2) op(3..4) name(5..6)
    fn binary_tree() -> Arc<BoundNode> {
        let left = BoundNode::leaf(
            BoundNodeKind::NameExpression { name: "a".into(), symbol: None },
            range(1, 1, 1, 2),
        );
        let op = BoundNode::leaf(BoundNodeKind::BinaryOperator, range(1, 3, 1, 4));
        let right = BoundNode::leaf(
            BoundNodeKind::NameExpression { name: "b".into(), symbol: None },
            range(1, 5, 1, 6),
        );
        BoundNode::new(BoundNodeKind::BinaryExpression, range(1, 1, 1, 10), [left, op, right])
    }

    #[test]
    fn test_resolve_token() {
        let root = binary_tree();
        let entry = resolve(&root, Position::new(1, 3)).unwrap();
        assert_eq!(entry.node.node_type(), NodeType::BinaryOperator);
        assert_eq!(entry.depth(), 2);
        let chain: Vec<_> = entry.ancestors().map(|e| e.node.node_type()).collect();
        assert_eq!(chain, vec![NodeType::BinaryOperator, NodeType::BinaryExpression]);
    }

    #[test]
    fn test_resolve_trailing_gap_returns_parent() {
        let root = binary_tree();
        let entry = resolve(&root, Position::new(1, 8)).unwrap();
        assert_eq!(entry.node.node_type(), NodeType::BinaryExpression);
        assert!(entry.parent.is_none());
    }

    #[test]
    fn test_resolve_outside_root() {
        let root = binary_tree();
        assert!(resolve(&root, Position::new(2, 1)).is_none());
        assert!(resolve(&root, Position::new(0, 9)).is_none());
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let a = BoundNode::leaf(BoundNodeKind::IntegerLiteral, range(1, 1, 1, 5));
        let b = BoundNode::leaf(BoundNodeKind::IntegerLiteral, range(1, 3, 1, 6));
        let root = BoundNode::new(BoundNodeKind::BinaryExpression, range(1, 1, 1, 6), [a, b]);
        let err = validate_tree(&root).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedTree { .. }));
    }

    #[test]
    fn test_validate_rejects_escaping_child() {
        let a = BoundNode::leaf(BoundNodeKind::IntegerLiteral, range(1, 1, 2, 1));
        let root = BoundNode::new(BoundNodeKind::ExpressionStatement, range(1, 1, 1, 9), [a]);
        assert!(validate_tree(&root).is_err());
    }

    #[test]
    fn test_validate_rejects_stray_unit_child() {
        let statement = BoundNode::leaf(BoundNodeKind::ExpressionStatement, range(1, 1, 1, 5));
        let unit = BoundNode::new(BoundNodeKind::CompilationUnit, range(1, 1, 1, 5), [statement]);
        let err = validate_tree(&unit).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedTree { .. }));
    }

    #[test]
    fn test_validate_rejects_sections_out_of_order() {
        let statements = BoundNode::leaf(BoundNodeKind::StatementsList, range(1, 1, 1, 5));
        let functions = BoundNode::leaf(BoundNodeKind::FunctionsList, range(2, 1, 2, 5));
        let unit = BoundNode::new(BoundNodeKind::CompilationUnit, range(1, 1, 2, 5), [statements, functions]);
        assert!(validate_tree(&unit).is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        assert!(validate_tree(&binary_tree()).is_ok());
    }
}
