pub mod bound_node;
pub mod symbol;
pub mod text_range;
pub mod types;
