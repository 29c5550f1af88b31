use super::types::{ColumnType, ObjectKind, TableSchema};

/// Generate the body of a CREATE TABLE statement (columns and constraints)
pub fn table_definition(schema: &TableSchema) -> String {
    let mut lines = Vec::new();

    for col in schema.columns {
        let (sql_type, length_check) = match col.col_type {
            ColumnType::Integer => ("INTEGER".to_string(), None),
            ColumnType::Varchar(len) => (
                format!("VARCHAR({})", len),
                Some(format!(" CHECK (length({}) <= {})", col.name, len)),
            ),
        };

        let null_constraint = if !col.nullable || schema.is_primary_key(col.name) {
            " NOT NULL"
        } else {
            ""
        };

        lines.push(format!(
            "    {} {}{}{}",
            col.name,
            sql_type,
            null_constraint,
            length_check.unwrap_or_default()
        ));
    }

    if !schema.primary_key.is_empty() {
        lines.push(format!(
            "    PRIMARY KEY ({})",
            schema.primary_key.join(", ")
        ));
    }

    for columns in schema.unique {
        lines.push(format!("    UNIQUE ({})", columns.join(", ")));
    }

    for fk in schema.foreign_keys {
        lines.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    for check in schema.checks {
        lines.push(format!("    CHECK ({})", check));
    }

    lines.join(",\n")
}

/// Generate CREATE TABLE SQL from a name and definition body
pub fn generate_create_table(name: &str, definition: &str, temporary: bool) -> String {
    let keyword = if temporary { "CREATE TEMP TABLE" } else { "CREATE TABLE" };
    format!("{} {} (\n{}\n)", keyword, name, definition)
}

/// Generate CREATE VIEW SQL
pub fn generate_create_view(name: &str, query: &str) -> String {
    format!("CREATE VIEW {} AS\n{}", name, query)
}

/// Generate DROP SQL for a catalog object
pub fn generate_drop(kind: ObjectKind, name: &str) -> String {
    format!("DROP {} IF EXISTS {}", kind.keyword(), quote_identifier(name))
}

/// Quote an identifier read back from the catalog
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{MAPPING, TOP_10_URLS, URL, URL_TEMP};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(URL.name, &table_definition(&URL), URL.temporary);
        assert!(sql.starts_with("CREATE TABLE url ("));
        assert!(sql.contains("domain_name VARCHAR(50) NOT NULL CHECK (length(domain_name) <= 50)"));
        assert!(sql.contains("PRIMARY KEY (domain_name, tld_id)"));
        assert!(sql.contains("UNIQUE (position)"));
        assert!(sql.contains("FOREIGN KEY (domain_name) REFERENCES domain(domain_name)"));
        assert!(sql.contains("FOREIGN KEY (tld_id) REFERENCES tld(tld_id)"));
        assert!(sql.contains("CHECK (position >= 1 AND position <= 10000)"));
    }

    #[test]
    fn test_temporary_table() {
        let sql = generate_create_table(
            URL_TEMP.name,
            &table_definition(&URL_TEMP),
            URL_TEMP.temporary,
        );
        assert!(sql.starts_with("CREATE TEMP TABLE url_temp ("));
        assert!(sql.contains("tld1 VARCHAR(15) NOT NULL"));
        assert!(sql.contains("tld2 VARCHAR(15) CHECK"));
        assert!(!sql.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_primary_key_columns_are_not_null() {
        let definition = table_definition(&MAPPING);
        assert!(definition.contains("tld VARCHAR(15) NOT NULL"));
        assert!(definition.contains("description VARCHAR(200) NOT NULL"));
    }

    #[test]
    fn test_view_and_drop() {
        let sql = generate_create_view(TOP_10_URLS.name, TOP_10_URLS.query);
        assert!(sql.starts_with("CREATE VIEW top_10_urls AS\nSELECT"));
        assert_eq!(
            generate_drop(ObjectKind::View, "top_10_urls"),
            "DROP VIEW IF EXISTS \"top_10_urls\""
        );
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
