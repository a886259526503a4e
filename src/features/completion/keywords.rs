//! Fixed keyword sets offered by the completion provider

/// Opens a static variable declaration at the top of a file.
pub const STATIC_KEYWORD: &str = "static";

/// Return type of a function that returns nothing.
pub const VOID_KEYWORD: &str = "void";

/// Keywords that can start a statement, in the order they are suggested.
// TODO: offer break/continue inside loop bodies once the classifier tracks
// the enclosing loop.
pub const STATEMENT_KEYWORDS: [&str; 5] = ["for", "foreach", "if", "return", "while"];
