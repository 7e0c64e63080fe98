//! A collection of table schemas for bulk DDL.

use tracing::debug;

use super::TableSchema;
use crate::ddl::{CreateTable, DropTable};
use crate::error::{Error, Result};

/// Schemas registered in a fixed order.
///
/// Nothing is registered implicitly: callers add every table they want the
/// bulk operations to cover.
///
/// # Example
///
/// ```rust
/// use clickorm_core::schema::{SchemaRegistry, TableSchema};
/// use clickorm_core::types::ColumnType;
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(TableSchema::builder("users").column("id", ColumnType::UInt64).build())
///     .unwrap();
///
/// assert_eq!(registry.drop_all(), vec![r#"DROP TABLE IF EXISTS "users""#]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds a schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTable`] when a schema with the same name is
    /// already registered.
    pub fn register(&mut self, table: TableSchema) -> Result<()> {
        if self.get(table.name()).is_some() {
            return Err(Error::DuplicateTable(String::from(table.name())));
        }
        debug!(table = table.name(), "registered table");
        self.tables.push(table);
        Ok(())
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Looks up a schema by name, failing when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTable`] when no schema has that name.
    pub fn require(&self, name: &str) -> Result<&TableSchema> {
        self.get(name)
            .ok_or_else(|| Error::UnknownTable(String::from(name)))
    }

    /// Iterates schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Renders CREATE statements for every schema in registration order.
    ///
    /// # Errors
    ///
    /// Fails on the first schema that cannot be rendered.
    pub fn create_all(&self, if_not_exists: bool) -> Result<Vec<String>> {
        self.tables
            .iter()
            .map(|t| CreateTable::from_schema(t).if_not_exists(if_not_exists).build())
            .collect()
    }

    /// Renders DROP statements for every schema in registration order.
    #[must_use]
    pub fn drop_all(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|t| DropTable::new(t.name()).build())
            .collect()
    }
}

impl FromIterator<TableSchema> for SchemaRegistry {
    /// Collects schemas, keeping the first of any duplicates.
    fn from_iter<I: IntoIterator<Item = TableSchema>>(iter: I) -> Self {
        let mut registry = Self::new();
        for table in iter {
            if let Err(err) = registry.register(table) {
                debug!(%err, "skipped table");
            }
        }
        registry
    }
}
