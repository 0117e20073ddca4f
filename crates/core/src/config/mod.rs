//! Configuration loading and schema definitions
//!
//! Detection, profile, and logging settings shared by the library and CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
