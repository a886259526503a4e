/// Property-based tests for the position resolver and the completion pipeline
///
/// Trees are laid out on a single line from generated token widths and gaps,
/// so every column is known to be inside a token, inside a gap, or outside
/// the root.
mod common;

use std::sync::Arc;

use quickcheck::{QuickCheck, TestResult};

use common::*;
use script_completion_server::features::completion::CompletionProvider;
use script_completion_server::features::node_finder::resolve;
use script_completion_server::ir::bound_node::{BoundNode, BoundNodeKind};
use script_completion_server::ir::text_range::{Position, TextRange};
use script_completion_server::ir::types::ScriptType;

/// Token column spans `[start, end]` built from generated sizes. Gaps are at
/// least two columns wide so every gap has an interior column.
fn layout(sizes: &[(u8, u8)]) -> Vec<(u32, u32)> {
    let mut spans = Vec::with_capacity(sizes.len());
    let mut column = 1u32;
    for (width, gap) in sizes {
        let start = column;
        let end = start + 1 + u32::from(width % 6);
        spans.push((start, end));
        column = end + 2 + u32::from(gap % 3);
    }
    spans
}

fn line_range(start: u32, end: u32) -> TextRange {
    TextRange::new(Position::new(1, start), Position::new(1, end))
}

fn token_tree(spans: &[(u32, u32)]) -> (Arc<BoundNode>, Vec<Arc<BoundNode>>) {
    let tokens: Vec<_> = spans
        .iter()
        .map(|&(start, end)| leaf(BoundNodeKind::IntegerLiteral, line_range(start, end)))
        .collect();
    let end = spans.last().map_or(1, |&(_, end)| end);
    let root = node(BoundNodeKind::ExpressionStatement, line_range(1, end + 1), tokens.clone());
    (root, tokens)
}

#[test]
fn test_token_interior_resolves_to_token() {
    fn prop(sizes: Vec<(u8, u8)>) -> TestResult {
        if sizes.is_empty() {
            return TestResult::discard();
        }
        let spans = layout(&sizes);
        let (root, tokens) = token_tree(&spans);
        for (token, &(start, end)) in tokens.iter().zip(&spans) {
            for column in start + 1..end {
                let Some(entry) = resolve(&root, Position::new(1, column)) else {
                    return TestResult::failed();
                };
                if !Arc::ptr_eq(&entry.node, token) || entry.depth() != 2 {
                    return TestResult::failed();
                }
            }
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<(u8, u8)>) -> TestResult);
}

#[test]
fn test_gap_resolves_to_parent() {
    fn prop(sizes: Vec<(u8, u8)>) -> TestResult {
        if sizes.len() < 2 {
            return TestResult::discard();
        }
        let spans = layout(&sizes);
        let (root, _) = token_tree(&spans);
        for pair in spans.windows(2) {
            let (_, end) = pair[0];
            let (next_start, _) = pair[1];
            for column in end + 1..next_start {
                let Some(entry) = resolve(&root, Position::new(1, column)) else {
                    return TestResult::failed();
                };
                if !Arc::ptr_eq(&entry.node, &root) || entry.parent.is_some() {
                    return TestResult::failed();
                }
            }
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<(u8, u8)>) -> TestResult);
}

#[test]
fn test_repeated_queries_agree() {
    fn prop(sizes: Vec<(u8, u8)>, probe: u8) -> TestResult {
        if sizes.is_empty() {
            return TestResult::discard();
        }
        let spans = layout(&sizes);
        let declarations: Vec<_> = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| local_decl(&format!("v{}", i), ScriptType::Int, line_range(start, end)))
            .collect();
        let end = spans.last().map_or(1, |&(_, end)| end);
        let list = statements(line_range(1, end), declarations);
        let document = document(unit(line_range(1, end), [list]));

        let provider = CompletionProvider::default();
        let position = Position::new(1, 1 + u32::from(probe) % (end + 4));
        let first = provider.get(&document, position);
        let second = provider.get(&document, position);
        TestResult::from_bool(first.is_ok() && first == second)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<(u8, u8)>, u8) -> TestResult);
}

#[test]
fn test_locals_never_leak_forward() {
    fn prop(sizes: Vec<(u8, u8)>, probe: u8) -> TestResult {
        if sizes.is_empty() {
            return TestResult::discard();
        }
        let spans = layout(&sizes);
        let declarations: Vec<_> = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| local_decl(&format!("v{}", i), ScriptType::Int, line_range(start, end)))
            .collect();
        let end = spans.last().map_or(1, |&(_, end)| end);
        let list = statements(line_range(1, end), declarations);
        let document = document(unit(line_range(1, end), [list]));

        let column = 1 + u32::from(probe) % end;
        let Ok(suggestions) = CompletionProvider::default().get(&document, Position::new(1, column)) else {
            return TestResult::failed();
        };
        // Every suggested local must be fully declared before the cursor.
        let leaked = suggestions.iter().any(|s| {
            s.label
                .strip_prefix('v')
                .and_then(|i| i.parse::<usize>().ok())
                .is_some_and(|i| spans[i].1 >= column)
        });
        TestResult::from_bool(!leaked)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<(u8, u8)>, u8) -> TestResult);
}
