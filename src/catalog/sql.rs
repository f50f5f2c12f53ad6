//! SQL text for the generic insert. Identifiers are quoted; values are always bound.

use crate::catalog::repo_types::TableColumn;

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(name))
}

/// `INSERT INTO "schema"."table" ("a", "b") VALUES ($1::"pg_catalog"."int4", $2::...)`.
/// Placeholders are cast to each column's underlying type so a bound
/// value lands with the column's own conversion rules.
pub fn insert_statement<'a, I>(schema: &str, table: &str, columns: I) -> String
where
    I: IntoIterator<Item = &'a TableColumn>,
{
    let mut names = Vec::new();
    let mut placeholders = Vec::new();
    for (i, c) in columns.into_iter().enumerate() {
        names.push(quoted(&c.name));
        placeholders.push(format!("${}::{}", i + 1, qualified(&c.udt_schema, &c.udt_name)));
    }
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified(schema, table),
        names.join(", "),
        placeholders.join(", ")
    )
}
