//! ClickHouse dialect.

use super::Dialect;

/// The ClickHouse SQL dialect.
///
/// Identifiers use ANSI double quotes and bound parameters use the
/// `%(name)s` form understood by the HTTP client drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClickHouseDialect;

impl ClickHouseDialect {
    /// Creates a new ClickHouse dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for ClickHouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn placeholder(&self, name: &str) -> String {
        format!("%({name})s")
    }

    // Backslash is an escape character inside ClickHouse string literals,
    // so it has to be escaped before the quote.
    fn quote_string(&self, text: &str) -> String {
        let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{escaped}'")
    }
}
