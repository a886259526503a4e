//! Suggestion records handed to the editor
//!
//! The provider decides *what* may be suggested; a [`SuggestionSynthesizer`]
//! decides how each candidate is presented. [`DocumentationProvider`] is the
//! presentation the editor front end ships with.

use serde::{Deserialize, Serialize};

use super::keywords::{STATEMENT_KEYWORDS, STATIC_KEYWORD, VOID_KEYWORD};
use crate::ir::symbol::{Symbol, SymbolKind};
use crate::ir::types::{MethodInfo, PropertyInfo, ScriptType};

/// Icon category of a suggestion in the editor's completion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionItemKind {
    Method,
    Property,
    Variable,
    Keyword,
    Function,
    Struct,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub insert_text: String,
    pub kind: CompletionItemKind,
}

impl Suggestion {
    /// Suggestion whose label is also the inserted text.
    pub fn plain(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        let label = label.into();
        Suggestion {
            insert_text: label.clone(),
            label,
            detail: None,
            documentation: None,
            kind,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, documentation: Option<impl Into<String>>) -> Self {
        self.documentation = documentation.map(Into::into);
        self
    }
}

/// Turns admitted keywords, types, members and symbols into suggestions.
///
/// Implementations are shared across concurrent queries.
pub trait SuggestionSynthesizer: Send + Sync {
    fn static_keyword(&self) -> Suggestion;

    fn void_keyword(&self) -> Suggestion;

    fn predefined_type(&self, ty: &ScriptType) -> Suggestion;

    fn statement_keywords(&self) -> Vec<Suggestion>;

    fn property(&self, property: &PropertyInfo) -> Suggestion;

    fn method(&self, method: &MethodInfo) -> Suggestion;

    fn static_constant(&self, symbol: &Symbol) -> Suggestion;

    fn static_variable(&self, symbol: &Symbol) -> Suggestion;

    fn function(&self, symbol: &Symbol) -> Suggestion;

    fn local_variable(&self, symbol: &Symbol) -> Suggestion;

    fn parameter(&self, symbol: &Symbol) -> Suggestion;

    /// Dispatch on the symbol's kind.
    fn symbol(&self, symbol: &Symbol) -> Suggestion {
        match symbol.kind {
            SymbolKind::ExternalStaticConstant => self.static_constant(symbol),
            SymbolKind::StaticVariable => self.static_variable(symbol),
            SymbolKind::Function => self.function(symbol),
            SymbolKind::LocalVariable => self.local_variable(symbol),
            SymbolKind::Parameter { .. } => self.parameter(symbol),
        }
    }
}

/// Default presentation: variables show their type, functions and methods
/// their signature, predefined types a one-line description.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentationProvider;

impl DocumentationProvider {
    pub fn new() -> Self {
        DocumentationProvider
    }

    fn variable(&self, symbol: &Symbol) -> Suggestion {
        Suggestion::plain(&symbol.name, CompletionItemKind::Variable).with_detail(symbol.ty.to_string())
    }
}

impl SuggestionSynthesizer for DocumentationProvider {
    fn static_keyword(&self) -> Suggestion {
        Suggestion::plain(STATIC_KEYWORD, CompletionItemKind::Keyword)
    }

    fn void_keyword(&self) -> Suggestion {
        Suggestion::plain(VOID_KEYWORD, CompletionItemKind::Keyword)
    }

    fn predefined_type(&self, ty: &ScriptType) -> Suggestion {
        Suggestion::plain(ty.to_string(), CompletionItemKind::Class).with_documentation(ty.documentation())
    }

    fn statement_keywords(&self) -> Vec<Suggestion> {
        STATEMENT_KEYWORDS
            .iter()
            .map(|keyword| Suggestion::plain(*keyword, CompletionItemKind::Keyword))
            .collect()
    }

    fn property(&self, property: &PropertyInfo) -> Suggestion {
        Suggestion::plain(&property.name, CompletionItemKind::Property)
            .with_detail(property.ty.to_string())
            .with_documentation(property.documentation.as_deref())
    }

    fn method(&self, method: &MethodInfo) -> Suggestion {
        Suggestion::plain(&method.name, CompletionItemKind::Method)
            .with_detail(method.signature())
            .with_documentation(method.documentation.as_deref())
    }

    fn static_constant(&self, symbol: &Symbol) -> Suggestion {
        self.variable(symbol)
    }

    fn static_variable(&self, symbol: &Symbol) -> Suggestion {
        self.variable(symbol)
    }

    fn function(&self, symbol: &Symbol) -> Suggestion {
        Suggestion::plain(&symbol.name, CompletionItemKind::Function).with_detail(symbol.ty.to_string())
    }

    fn local_variable(&self, symbol: &Symbol) -> Suggestion {
        self.variable(symbol)
    }

    fn parameter(&self, symbol: &Symbol) -> Suggestion {
        self.variable(symbol)
    }
}
