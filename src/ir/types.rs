//! Static types as reported by the type checker.
//!
//! Completion only needs two things from a type: how to print it and which
//! instance members it exposes. Predefined types carry a fixed member table;
//! class types carry whatever the host library registered for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named, typed parameter of a method or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ScriptType,
}

/// Instance property exposed by a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ScriptType,
    #[serde(default)]
    pub documentation: Option<String>,
}

/// Instance method exposed by a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<MethodParameter>,
    pub return_type: ScriptType,
    #[serde(default)]
    pub documentation: Option<String>,
}

impl MethodInfo {
    /// Human-readable signature, e.g. `int indexOf(string value)`.
    pub fn signature(&self) -> String {
        format!(
            "{} {}({})",
            self.return_type,
            self.name,
            format_parameters(&self.parameters)
        )
    }
}

/// Host-provided class with its instance members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
}

/// Signature of a script function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionType {
    pub return_type: Box<ScriptType>,
    #[serde(default)]
    pub parameters: Vec<MethodParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptType {
    Boolean,
    Int,
    Char,
    Float,
    String,
    Void,
    Array { element: Box<ScriptType> },
    Class(ClassType),
    Function(FunctionType),
}

impl ScriptType {
    /// The predefined types offered wherever a type name may start, in the
    /// order they are suggested.
    pub const PREDEFINED: [ScriptType; 5] = [
        ScriptType::Boolean,
        ScriptType::Int,
        ScriptType::Char,
        ScriptType::Float,
        ScriptType::String,
    ];

    pub fn array_of(element: ScriptType) -> Self {
        ScriptType::Array { element: Box::new(element) }
    }

    pub fn is_predefined(&self) -> bool {
        matches!(
            self,
            ScriptType::Boolean
                | ScriptType::Int
                | ScriptType::Char
                | ScriptType::Float
                | ScriptType::String
        )
    }

    /// Short description shown next to predefined type suggestions.
    pub fn documentation(&self) -> Option<&'static str> {
        match self {
            ScriptType::Boolean => Some("true or false value"),
            ScriptType::Int => Some("32-bit signed integer"),
            ScriptType::Char => Some("Single character"),
            ScriptType::Float => Some("Double-precision floating-point number"),
            ScriptType::String => Some("Text as sequence of characters"),
            _ => None,
        }
    }

    /// Instance properties in declaration order.
    pub fn instance_properties(&self) -> Vec<PropertyInfo> {
        match self {
            ScriptType::String => vec![property(
                "length",
                ScriptType::Int,
                "Number of characters in the string",
            )],
            ScriptType::Array { .. } => vec![property(
                "length",
                ScriptType::Int,
                "Number of elements in the array",
            )],
            ScriptType::Class(class) => class.properties.clone(),
            _ => vec![],
        }
    }

    /// Instance methods in declaration order.
    pub fn instance_methods(&self) -> Vec<MethodInfo> {
        match self {
            ScriptType::String => string_methods(),
            ScriptType::Boolean | ScriptType::Int | ScriptType::Char | ScriptType::Float => {
                vec![method("toString", &[], ScriptType::String, "Converts the value to its text form")]
            }
            ScriptType::Class(class) => class.methods.clone(),
            _ => vec![],
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptType::Boolean => write!(f, "boolean"),
            ScriptType::Int => write!(f, "int"),
            ScriptType::Char => write!(f, "char"),
            ScriptType::Float => write!(f, "float"),
            ScriptType::String => write!(f, "string"),
            ScriptType::Void => write!(f, "void"),
            ScriptType::Array { element } => write!(f, "{}[]", element),
            ScriptType::Class(class) => write!(f, "{}", class.name),
            ScriptType::Function(function) => write!(
                f,
                "{}({})",
                function.return_type,
                format_parameters(&function.parameters)
            ),
        }
    }
}

pub(crate) fn format_parameters(parameters: &[MethodParameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn property(name: &str, ty: ScriptType, documentation: &str) -> PropertyInfo {
    PropertyInfo {
        name: name.to_string(),
        ty,
        documentation: Some(documentation.to_string()),
    }
}

fn method(
    name: &str,
    parameters: &[(&str, ScriptType)],
    return_type: ScriptType,
    documentation: &str,
) -> MethodInfo {
    MethodInfo {
        name: name.to_string(),
        parameters: parameters
            .iter()
            .map(|(name, ty)| MethodParameter {
                name: name.to_string(),
                ty: ty.clone(),
            })
            .collect(),
        return_type,
        documentation: Some(documentation.to_string()),
    }
}

/// Built-in string methods
fn string_methods() -> Vec<MethodInfo> {
    vec![
        method(
            "contains",
            &[("value", ScriptType::String)],
            ScriptType::Boolean,
            "Returns true if the string contains the given text",
        ),
        method(
            "endsWith",
            &[("suffix", ScriptType::String)],
            ScriptType::Boolean,
            "Returns true if the string ends with the given text",
        ),
        method(
            "indexOf",
            &[("value", ScriptType::String)],
            ScriptType::Int,
            "Index of the first occurrence of the given text, or -1",
        ),
        method(
            "startsWith",
            &[("prefix", ScriptType::String)],
            ScriptType::Boolean,
            "Returns true if the string starts with the given text",
        ),
        method(
            "substring",
            &[("begin", ScriptType::Int), ("end", ScriptType::Int)],
            ScriptType::String,
            "Characters from begin (inclusive) to end (exclusive)",
        ),
        method("toLower", &[], ScriptType::String, "Lower-case copy of the string"),
        method("toUpper", &[], ScriptType::String, "Upper-case copy of the string"),
        method("trim", &[], ScriptType::String, "Copy without leading and trailing whitespace"),
    ]
}
