pub mod config;
pub mod features;
pub mod ir;
pub mod logging;
pub mod serde_helpers;
pub mod server;
