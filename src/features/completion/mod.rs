//! Code completion for script files
//!
//! This module provides:
//! - Context classification from the shape of the bound tree around the cursor
//! - Scoped symbol collection honoring declaration order and block nesting
//! - Member completion by case-insensitive prefix on the callee's type
//! - Suggestion synthesis behind a replaceable trait

pub mod context;
pub mod error;
pub mod keywords;
pub mod provider;
pub mod scope;
pub mod suggestions;

pub use context::{Admissions, Classification, CompletionContext, ContextFrame, MemberQuery, classify, determine_context};
pub use error::CompletionError;
pub use provider::CompletionProvider;
pub use scope::collect_symbols;
pub use suggestions::{CompletionItemKind, DocumentationProvider, Suggestion, SuggestionSynthesizer};
