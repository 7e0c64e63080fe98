//! Identifier quoting, placeholders and string literals.
//!
//! Everything that turns a caller-supplied name or text into SQL goes
//! through this module. All functions are pure and total: any input yields a
//! syntactically valid token.

mod clickhouse;

pub use clickhouse::ClickHouseDialect;

/// Trait for dialect-specific token rendering.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes a single identifier.
    ///
    /// One enclosing pair of quotes is stripped first, then the name is
    /// re-wrapped and every embedded quote character is doubled.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.identifier_quote();
        let raw = strip_any_quotes(name);
        let mut out = String::with_capacity(raw.len() + 2);
        out.push(q);
        for c in raw.chars() {
            if c == q {
                out.push(q);
            }
            out.push(c);
        }
        out.push(q);
        out
    }

    /// Renders a table name, quoting `db.table` parts independently.
    ///
    /// Only a name with exactly one `.` is split; any other name is a
    /// single identifier.
    fn render_table_name(&self, name: &str) -> String {
        let s = name.trim();
        match s.split_once('.').filter(|(_, table)| !table.contains('.')) {
            Some((db, table)) => format!(
                "{}.{}",
                self.quote_identifier(db),
                self.quote_identifier(table)
            ),
            None => self.quote_identifier(s),
        }
    }

    /// Returns the placeholder referencing a bound parameter.
    fn placeholder(&self, name: &str) -> String;

    /// Renders text as a single-quoted string literal.
    fn quote_string(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }
}

/// Strips one layer of enclosing `"`, `` ` `` or `'` quotes.
///
/// Surrounding whitespace is trimmed first. Quotes are only removed when the
/// same character opens and closes the name.
#[must_use]
pub fn strip_any_quotes(name: &str) -> &str {
    let s = name.trim();
    for q in ['"', '`', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Quotes an identifier for the ClickHouse dialect.
///
/// ```rust
/// use clickorm_core::dialect::quote_ident;
///
/// assert_eq!(quote_ident("events"), "\"events\"");
/// assert_eq!(quote_ident("My \"Table\""), "\"My \"\"Table\"\"\"");
/// ```
#[must_use]
pub fn quote_ident(name: &str) -> String {
    ClickHouseDialect.quote_identifier(name)
}

/// Renders a possibly database-qualified table name.
///
/// ```rust
/// use clickorm_core::dialect::render_table_name;
///
/// assert_eq!(render_table_name("analytics.events"), "\"analytics\".\"events\"");
/// ```
#[must_use]
pub fn render_table_name(name: &str) -> String {
    ClickHouseDialect.render_table_name(name)
}

/// Returns the placeholder for a bound parameter name.
#[must_use]
pub fn placeholder(name: &str) -> String {
    ClickHouseDialect.placeholder(name)
}

/// Renders text as an escaped string literal.
#[must_use]
pub fn quote_string(text: &str) -> String {
    ClickHouseDialect.quote_string(text)
}
