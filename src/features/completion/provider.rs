//! Completion pipeline: cursor → context → admissions + visible symbols →
//! suggestions.

use std::sync::Arc;

use tracing::debug;

use super::context::{classify, determine_context};
use super::error::CompletionError;
use super::scope::collect_symbols;
use super::suggestions::{DocumentationProvider, Suggestion, SuggestionSynthesizer};
use crate::features::node_finder::validate_tree;
use crate::ir::bound_node::{BoundDocument, NodeType};
use crate::ir::text_range::{IndexBase, Position};
use crate::ir::types::ScriptType;

/// Answers completion queries against bound documents.
///
/// Holds no per-document state: every call to [`CompletionProvider::get`] is
/// a pure function of the document and the cursor, so one provider can serve
/// concurrent queries.
pub struct CompletionProvider {
    synthesizer: Arc<dyn SuggestionSynthesizer>,
    index_base: IndexBase,
}

impl Default for CompletionProvider {
    fn default() -> Self {
        CompletionProvider::new(Arc::new(DocumentationProvider::new()), IndexBase::default())
    }
}

impl CompletionProvider {
    pub fn new(synthesizer: Arc<dyn SuggestionSynthesizer>, index_base: IndexBase) -> Self {
        Self {
            synthesizer,
            index_base,
        }
    }

    pub fn index_base(&self) -> IndexBase {
        self.index_base
    }

    /// Suggestions for `position` in `document`, in presentation order:
    /// members, `static`, `void`, predefined types, visible symbols, then
    /// statement keywords.
    pub fn get(&self, document: &BoundDocument, position: Position) -> Result<Vec<Suggestion>, CompletionError> {
        if !self.index_base.is_representable(position) {
            return Err(CompletionError::InvalidPosition {
                line: position.line,
                column: position.column,
            });
        }
        validate_tree(&document.unit)?;
        if document.unit.node_type() != NodeType::CompilationUnit {
            return Err(CompletionError::MalformedTree {
                reason: format!("root is {}, expected CompilationUnit", document.unit.node_type()),
            });
        }

        let context = determine_context(document, position)?;
        let classification = classify(document, &context)?;
        let admissions = classification.admissions;
        let synthesizer = &self.synthesizer;

        let mut suggestions = Vec::new();

        if let Some(query) = &classification.members {
            suggestions.extend(query.matching_properties().iter().map(|p| synthesizer.property(p)));
            suggestions.extend(query.matching_methods().iter().map(|m| synthesizer.method(m)));
        }
        if admissions.can_static {
            suggestions.push(synthesizer.static_keyword());
        }
        if admissions.can_void {
            suggestions.push(synthesizer.void_keyword());
        }
        if admissions.can_type {
            suggestions.extend(ScriptType::PREDEFINED.iter().map(|ty| synthesizer.predefined_type(ty)));
        }
        if admissions.can_symbol {
            let symbols = collect_symbols(document, &context)?;
            suggestions.extend(symbols.iter().map(|symbol| synthesizer.symbol(symbol)));
        }
        if admissions.can_statement {
            suggestions.extend(synthesizer.statement_keywords());
        }

        debug!("{} suggestions at {}", suggestions.len(), position);
        Ok(suggestions)
    }
}
