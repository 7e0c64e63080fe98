//! Loading table schemas from JSON.
//!
//! A schema file is a JSON array of tables:
//!
//! ```json
//! [
//!   {
//!     "name": "analytics.events",
//!     "columns": [
//!       {"name": "id", "type": "UInt64", "primary_key": true},
//!       {"name": "ts", "type": "DateTime64(3)"}
//!     ],
//!     "partition_by": "toYYYYMM(ts)",
//!     "settings": {"index_granularity": 8192}
//!   }
//! ]
//! ```

use std::path::Path;

use clickorm_core::{SchemaRegistry, TableSchema};
use tracing::debug;

use crate::error::{CliError, Result};

/// Reads the schema file at `path` into a registry, keeping file order.
///
/// # Errors
///
/// Returns [`CliError::MissingSchema`] without a path, [`CliError::Read`]
/// or [`CliError::Parse`] when the file cannot be read or decoded, and
/// [`CliError::Compile`] when two tables share a name.
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry> {
    let path = path.ok_or(CliError::MissingSchema)?;
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tables: Vec<TableSchema> =
        serde_json::from_str(&json).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut registry = SchemaRegistry::new();
    for table in tables {
        registry.register(table)?;
    }
    debug!(path = %path.display(), tables = registry.len(), "loaded schema file");
    Ok(registry)
}
