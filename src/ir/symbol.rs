use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::ScriptType;

/// Where a symbol was declared, which decides where it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SymbolKind {
    /// Provided by the host library; visible everywhere.
    ExternalStaticConstant,
    /// Declared with `static` at the top of the file.
    StaticVariable,
    Function,
    /// Declared by a statement; visible after its declaration in the same block.
    LocalVariable,
    Parameter {
        #[serde(default)]
        by_ref: bool,
    },
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::ExternalStaticConstant => write!(f, "external static constant"),
            SymbolKind::StaticVariable => write!(f, "static variable"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::LocalVariable => write!(f, "local variable"),
            SymbolKind::Parameter { .. } => write!(f, "parameter"),
        }
    }
}

/// A named entity attached to declarations and name references by the binder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ScriptType,
    #[serde(flatten)]
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: ScriptType, kind: SymbolKind) -> Self {
        Symbol {
            name: name.into(),
            ty,
            kind,
        }
    }

    pub fn external_constant(name: impl Into<String>, ty: ScriptType) -> Self {
        Symbol::new(name, ty, SymbolKind::ExternalStaticConstant)
    }

    pub fn static_variable(name: impl Into<String>, ty: ScriptType) -> Self {
        Symbol::new(name, ty, SymbolKind::StaticVariable)
    }

    pub fn function(name: impl Into<String>, ty: ScriptType) -> Self {
        Symbol::new(name, ty, SymbolKind::Function)
    }

    pub fn local_variable(name: impl Into<String>, ty: ScriptType) -> Self {
        Symbol::new(name, ty, SymbolKind::LocalVariable)
    }

    pub fn parameter(name: impl Into<String>, ty: ScriptType) -> Self {
        Symbol::new(name, ty, SymbolKind::Parameter { by_ref: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_kind_json() {
        let symbol: Symbol = serde_json::from_str(
            r#"{"name":"count","type":{"kind":"int"},"kind":"parameter","by_ref":true}"#,
        )
        .unwrap();
        assert_eq!(symbol.kind, SymbolKind::Parameter { by_ref: true });
        assert_eq!(symbol.ty, ScriptType::Int);
    }
}
