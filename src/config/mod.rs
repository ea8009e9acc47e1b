//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

pub use parser::{load_config, write_default_config, JsonConfigStore};
pub use types::*;
pub use validate::validate_config;
