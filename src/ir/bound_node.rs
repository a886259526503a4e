//! Bound syntax tree produced by the binder.
//!
//! The tree is immutable once built: children live in persistent vectors of
//! `Arc<BoundNode>` so a tree can be shared between concurrent queries without
//! locking. Children of every node are ordered by position and never overlap.

use std::fmt;
use std::sync::Arc;

use archery::ArcK;
use rpds::Vector;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;
use super::text_range::TextRange;
use super::types::{PropertyInfo, ScriptType};
use crate::serde_helpers::{
    deserialize_arc, deserialize_arc_vec, deserialize_arc_vector, deserialize_option_arc,
    serialize_arc, serialize_arc_vec, serialize_arc_vector, serialize_option_arc,
};

pub type BoundNodeVector = Vector<Arc<BoundNode>, ArcK>;

/// Declares [`NodeType`] and its [`NodeType::ALL`] table from one variant
/// list, so the table cannot fall out of step with the enum.
macro_rules! node_types {
    ($($variant:ident,)+) => {
        /// Payload-free discriminator of [`BoundNodeKind`], used in diagnostics
        /// and when listing node kinds to the editor.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum NodeType {
            $($variant,)+
        }

        impl NodeType {
            /// Every node type, in declaration order.
            pub const ALL: &'static [NodeType] = &[$(NodeType::$variant,)+];
        }
    };
}

node_types! {
    CompilationUnit,
    StaticVariablesList,
    FunctionsList,
    StatementsList,
    Function,
    ParameterList,
    Parameter,
    PredefinedType,
    VariableDeclaration,
    ExpressionStatement,
    AssignmentStatement,
    IfStatement,
    WhileLoop,
    ForLoop,
    ForEachLoop,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,
    NameExpression,
    PropertyAccessExpression,
    MethodCallExpression,
    ArgumentsList,
    BinaryExpression,
    BinaryOperator,
    UnaryExpression,
    UnaryOperator,
    ConditionalExpression,
    IndexExpression,
    BooleanLiteral,
    IntegerLiteral,
    CharLiteral,
    FloatLiteral,
    StringLiteral,
    InvalidExpression,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Kind of a bound node together with the binder data completion needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoundNodeKind {
    /// File root; children are the non-empty sections in order: static
    /// variables, functions, statements.
    CompilationUnit,
    StaticVariablesList,
    FunctionsList,
    /// Statement sequence: the top-level statements section or a braced body.
    StatementsList,
    Function {
        #[serde(serialize_with = "serialize_arc", deserialize_with = "deserialize_arc")]
        symbol: Arc<Symbol>,
    },
    ParameterList,
    Parameter {
        #[serde(serialize_with = "serialize_arc", deserialize_with = "deserialize_arc")]
        symbol: Arc<Symbol>,
    },
    PredefinedType {
        #[serde(rename = "type")]
        ty: ScriptType,
    },
    VariableDeclaration {
        #[serde(serialize_with = "serialize_arc", deserialize_with = "deserialize_arc")]
        symbol: Arc<Symbol>,
    },
    ExpressionStatement,
    AssignmentStatement,
    IfStatement,
    WhileLoop,
    /// First child is the init statement when present.
    ForLoop,
    /// First child is the declaration of the loop variable.
    ForEachLoop,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    EmptyStatement,
    NameExpression {
        name: String,
        #[serde(
            default,
            serialize_with = "serialize_option_arc",
            deserialize_with = "deserialize_option_arc"
        )]
        symbol: Option<Arc<Symbol>>,
    },
    /// `callee.name`; `member` is `None` while `name` matches no member of
    /// the callee's type, e.g. while the user is still typing it.
    PropertyAccessExpression {
        name: String,
        callee_type: ScriptType,
        #[serde(default)]
        member: Option<PropertyInfo>,
    },
    MethodCallExpression,
    ArgumentsList,
    BinaryExpression,
    BinaryOperator,
    UnaryExpression,
    UnaryOperator,
    ConditionalExpression,
    IndexExpression,
    BooleanLiteral,
    IntegerLiteral,
    CharLiteral,
    FloatLiteral,
    StringLiteral,
    /// Placeholder the binder emits for expressions it could not parse.
    InvalidExpression,
}

impl BoundNodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            BoundNodeKind::CompilationUnit => NodeType::CompilationUnit,
            BoundNodeKind::StaticVariablesList => NodeType::StaticVariablesList,
            BoundNodeKind::FunctionsList => NodeType::FunctionsList,
            BoundNodeKind::StatementsList => NodeType::StatementsList,
            BoundNodeKind::Function { .. } => NodeType::Function,
            BoundNodeKind::ParameterList => NodeType::ParameterList,
            BoundNodeKind::Parameter { .. } => NodeType::Parameter,
            BoundNodeKind::PredefinedType { .. } => NodeType::PredefinedType,
            BoundNodeKind::VariableDeclaration { .. } => NodeType::VariableDeclaration,
            BoundNodeKind::ExpressionStatement => NodeType::ExpressionStatement,
            BoundNodeKind::AssignmentStatement => NodeType::AssignmentStatement,
            BoundNodeKind::IfStatement => NodeType::IfStatement,
            BoundNodeKind::WhileLoop => NodeType::WhileLoop,
            BoundNodeKind::ForLoop => NodeType::ForLoop,
            BoundNodeKind::ForEachLoop => NodeType::ForEachLoop,
            BoundNodeKind::ReturnStatement => NodeType::ReturnStatement,
            BoundNodeKind::BreakStatement => NodeType::BreakStatement,
            BoundNodeKind::ContinueStatement => NodeType::ContinueStatement,
            BoundNodeKind::EmptyStatement => NodeType::EmptyStatement,
            BoundNodeKind::NameExpression { .. } => NodeType::NameExpression,
            BoundNodeKind::PropertyAccessExpression { .. } => NodeType::PropertyAccessExpression,
            BoundNodeKind::MethodCallExpression => NodeType::MethodCallExpression,
            BoundNodeKind::ArgumentsList => NodeType::ArgumentsList,
            BoundNodeKind::BinaryExpression => NodeType::BinaryExpression,
            BoundNodeKind::BinaryOperator => NodeType::BinaryOperator,
            BoundNodeKind::UnaryExpression => NodeType::UnaryExpression,
            BoundNodeKind::UnaryOperator => NodeType::UnaryOperator,
            BoundNodeKind::ConditionalExpression => NodeType::ConditionalExpression,
            BoundNodeKind::IndexExpression => NodeType::IndexExpression,
            BoundNodeKind::BooleanLiteral => NodeType::BooleanLiteral,
            BoundNodeKind::IntegerLiteral => NodeType::IntegerLiteral,
            BoundNodeKind::CharLiteral => NodeType::CharLiteral,
            BoundNodeKind::FloatLiteral => NodeType::FloatLiteral,
            BoundNodeKind::StringLiteral => NodeType::StringLiteral,
            BoundNodeKind::InvalidExpression => NodeType::InvalidExpression,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundNode {
    #[serde(flatten)]
    pub kind: BoundNodeKind,
    pub range: TextRange,
    #[serde(
        default = "BoundNode::no_children",
        serialize_with = "serialize_arc_vector",
        deserialize_with = "deserialize_arc_vector"
    )]
    pub children: BoundNodeVector,
}

impl BoundNode {
    pub fn new<I>(kind: BoundNodeKind, range: TextRange, children: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Arc<BoundNode>>,
    {
        let mut vector = BoundNode::no_children();
        for child in children {
            vector.push_back_mut(child);
        }
        Arc::new(BoundNode {
            kind,
            range,
            children: vector,
        })
    }

    pub fn leaf(kind: BoundNodeKind, range: TextRange) -> Arc<Self> {
        BoundNode::new(kind, range, std::iter::empty())
    }

    fn no_children() -> BoundNodeVector {
        Vector::<Arc<BoundNode>, ArcK>::new_with_ptr_kind()
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn children(&self) -> impl Iterator<Item = &Arc<BoundNode>> {
        self.children.iter()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<&Arc<BoundNode>> {
        self.children.get(index)
    }

    /// Symbol introduced by this node, for declarations.
    pub fn declared_symbol(&self) -> Option<&Arc<Symbol>> {
        match &self.kind {
            BoundNodeKind::Function { symbol }
            | BoundNodeKind::Parameter { symbol }
            | BoundNodeKind::VariableDeclaration { symbol } => Some(symbol),
            _ => None,
        }
    }
}

/// Everything the binder hands over for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundDocument {
    #[serde(serialize_with = "serialize_arc", deserialize_with = "deserialize_arc")]
    pub unit: Arc<BoundNode>,
    /// Constants registered by the host library, in registration order.
    #[serde(
        default,
        serialize_with = "serialize_arc_vec",
        deserialize_with = "deserialize_arc_vec"
    )]
    pub static_constants: Vec<Arc<Symbol>>,
}

impl BoundDocument {
    pub fn new(unit: Arc<BoundNode>, static_constants: Vec<Arc<Symbol>>) -> Self {
        BoundDocument {
            unit,
            static_constants,
        }
    }

    /// Top-level section of the given kind, if the file has one.
    pub fn section(&self, node_type: NodeType) -> Option<&Arc<BoundNode>> {
        self.unit.children().find(|child| child.node_type() == node_type)
    }

    fn section_children(&self, node_type: NodeType) -> impl Iterator<Item = &Arc<BoundNode>> {
        self.section(node_type).into_iter().flat_map(|section| section.children())
    }

    /// Declarations of the static-variables section, in order.
    pub fn static_variables(&self) -> impl Iterator<Item = &Arc<BoundNode>> {
        self.section_children(NodeType::StaticVariablesList)
    }

    /// Function declarations, in order.
    pub fn functions(&self) -> impl Iterator<Item = &Arc<BoundNode>> {
        self.section_children(NodeType::FunctionsList)
    }

    /// Top-level statements, in order.
    pub fn statements(&self) -> impl Iterator<Item = &Arc<BoundNode>> {
        self.section_children(NodeType::StatementsList)
    }

    pub fn has_static_variables(&self) -> bool {
        self.static_variables().next().is_some()
    }

    pub fn has_functions(&self) -> bool {
        self.functions().next().is_some()
    }

    pub fn has_statements(&self) -> bool {
        self.statements().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::text_range::Position;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> TextRange {
        TextRange::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn test_node_type_table_follows_declaration_order() {
        for (index, node_type) in NodeType::ALL.iter().enumerate() {
            assert_eq!(*node_type as usize, index, "{} out of place", node_type);
        }
        // The last declared variant closes the table.
        assert_eq!(NodeType::ALL.len(), NodeType::InvalidExpression as usize + 1);
    }

    #[test]
    fn test_every_kind_maps_into_node_type_table() {
        let symbol = Arc::new(Symbol::local_variable("v", ScriptType::Int));
        let kinds = [
            BoundNodeKind::CompilationUnit,
            BoundNodeKind::Function { symbol: symbol.clone() },
            BoundNodeKind::PredefinedType { ty: ScriptType::Int },
            BoundNodeKind::VariableDeclaration { symbol },
            BoundNodeKind::NameExpression {
                name: "v".into(),
                symbol: None,
            },
            BoundNodeKind::InvalidExpression,
        ];
        for kind in kinds {
            assert!(NodeType::ALL.contains(&kind.node_type()));
        }
    }

    #[test]
    fn test_sections_by_kind() {
        let decl = BoundNode::leaf(
            BoundNodeKind::VariableDeclaration {
                symbol: Arc::new(Symbol::static_variable("x", ScriptType::Int)),
            },
            range(1, 1, 1, 18),
        );
        let statics = BoundNode::new(BoundNodeKind::StaticVariablesList, range(1, 1, 1, 18), [decl]);
        let unit = BoundNode::new(BoundNodeKind::CompilationUnit, range(1, 1, 1, 18), [statics]);
        let document = BoundDocument::new(unit, vec![]);

        assert!(document.has_static_variables());
        assert!(!document.has_functions());
        assert!(!document.has_statements());
        let names: Vec<_> = document
            .static_variables()
            .filter_map(|n| n.declared_symbol())
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_deserialize_nested_tree() {
        let json = r#"{
            "kind": "compilationUnit",
            "range": {"line1": 1, "column1": 1, "line2": 1, "column2": 6},
            "children": [{
                "kind": "statementsList",
                "range": {"line1": 1, "column1": 1, "line2": 1, "column2": 6},
                "children": [{
                    "kind": "expressionStatement",
                    "range": {"line1": 1, "column1": 1, "line2": 1, "column2": 6},
                    "children": [{
                        "kind": "nameExpression",
                        "name": "abc",
                        "range": {"line1": 1, "column1": 1, "line2": 1, "column2": 4}
                    }]
                }]
            }]
        }"#;
        let unit: BoundNode = serde_json::from_str(json).unwrap();
        assert_eq!(unit.node_type(), NodeType::CompilationUnit);
        let statement = unit.child_at(0).and_then(|list| list.child_at(0)).unwrap();
        let name = statement.child_at(0).unwrap();
        assert_eq!(name.node_type(), NodeType::NameExpression);
        assert_eq!(name.child_count(), 0);
    }
}
