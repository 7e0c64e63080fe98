//! Command-line front end for `clickorm-core`.
//!
//! `clickorm` reads table schemas from a JSON file and prints the statements
//! the core library compiles for them: CREATE and DROP TABLE, SELECT and
//! COUNT with their parameter maps, and canonical type declarations. It
//! never connects to a server.

pub mod commands;
pub mod error;
pub mod schema_file;

pub use error::{CliError, Result};
