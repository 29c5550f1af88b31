//! Catalog introspection and cascading drops.

use std::collections::HashSet;

use rusqlite::OptionalExtension;
use tracing::debug;

use super::Gateway;
use crate::error::Result;
use crate::schema::ddl::generate_drop;
use crate::schema::ObjectKind;

/// Tables and views of both the main and the temp schema
const CATALOG_SQL: &str = "SELECT name, type, sql FROM sqlite_master
     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
     UNION ALL
     SELECT name, type, sql FROM sqlite_temp_master
     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'";

/// A table or view found in the database catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: ObjectKind,
    /// Defining SQL as stored by SQLite
    pub sql: String,
}

impl Gateway {
    /// Look up a table or view by name (case-insensitive, temp schema included)
    pub fn find_object(&self, name: &str) -> Result<Option<CatalogEntry>> {
        let sql = format!(
            "SELECT name, type, sql FROM ({}) WHERE name = ?1 COLLATE NOCASE LIMIT 1",
            CATALOG_SQL
        );
        let entry = self
            .conn
            .query_row(&sql, [name], read_entry)
            .optional()?;
        Ok(entry.flatten())
    }

    /// Whether an object named `name` exists, optionally restricted to one kind
    pub fn object_exists(&self, name: &str, kind: Option<ObjectKind>) -> Result<bool> {
        Ok(match self.find_object(name)? {
            Some(entry) => kind.map_or(true, |k| k == entry.kind),
            None => false,
        })
    }

    /// All tables and views currently in the catalog
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>> {
        let entries = self.query_rows(CATALOG_SQL, read_entry)?;
        Ok(entries.into_iter().flatten().collect())
    }

    /// Objects that must go when `entry` is dropped: tables with a foreign
    /// key to it and views whose definition names it
    pub fn dependents(&self, entry: &CatalogEntry) -> Result<Vec<CatalogEntry>> {
        let target = entry.name.to_lowercase();
        let mut dependents = Vec::new();

        for candidate in self.catalog()? {
            if candidate.name.eq_ignore_ascii_case(&entry.name) {
                continue;
            }

            let depends = match candidate.kind {
                ObjectKind::View => references_identifier(&candidate.sql, &target),
                ObjectKind::Table => self
                    .foreign_key_parents(&candidate.name)?
                    .iter()
                    .any(|parent| parent.eq_ignore_ascii_case(&target)),
            };

            if depends {
                dependents.push(candidate);
            }
        }

        Ok(dependents)
    }

    /// Drop `entry` after everything that depends on it, deepest first
    pub fn drop_cascade(&self, entry: &CatalogEntry) -> Result<()> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        self.collect_drop_order(entry, &mut seen, &mut order)?;

        for object in order {
            debug!(name = %object.name, kind = %object.kind, "drop");
            self.execute(&generate_drop(object.kind, &object.name))?;
        }

        Ok(())
    }

    fn collect_drop_order(
        &self,
        entry: &CatalogEntry,
        seen: &mut HashSet<String>,
        order: &mut Vec<CatalogEntry>,
    ) -> Result<()> {
        if !seen.insert(entry.name.to_lowercase()) {
            return Ok(());
        }

        for dependent in self.dependents(entry)? {
            self.collect_drop_order(&dependent, seen, order)?;
        }

        order.push(entry.clone());
        Ok(())
    }

    fn foreign_key_parents(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT \"table\" FROM pragma_foreign_key_list(?1)")?;
        let parents = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(parents)
    }
}

fn read_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<CatalogEntry>> {
    let name: String = row.get(0)?;
    let kind: String = row.get(1)?;
    let sql: Option<String> = row.get(2)?;

    Ok(ObjectKind::from_catalog_type(&kind).map(|kind| CatalogEntry {
        name,
        kind,
        sql: sql.unwrap_or_default(),
    }))
}

/// Whether `sql` mentions `identifier` as a whole word (case-insensitive)
fn references_identifier(sql: &str, identifier: &str) -> bool {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| token.eq_ignore_ascii_case(identifier))
}
