pub mod completion;
pub mod node_finder;
