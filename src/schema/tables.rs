//! Table and view definitions for the ranked URL dataset

use super::types::*;

// =============================================================================
// Source Tables (loaded from files)
// =============================================================================

pub static MAPPING: TableSchema = TableSchema {
    name: "mapping",
    columns: &[
        Column::required("tld", ColumnType::Varchar(15)),
        Column::required("description", ColumnType::Varchar(200)),
    ],
    primary_key: &["tld"],
    unique: &[],
    foreign_keys: &[],
    checks: &[],
    temporary: false,
    derives_from: &[],
};

pub static URL_TEMP: TableSchema = TableSchema {
    name: "url_temp",
    columns: &[
        Column::new("pos", ColumnType::Integer),
        Column::new("domain_name", ColumnType::Varchar(50)),
        Column::required("tld1", ColumnType::Varchar(15)),
        Column::new("tld2", ColumnType::Varchar(15)),
    ],
    primary_key: &[],
    unique: &[],
    foreign_keys: &[],
    checks: &[],
    temporary: true,
    derives_from: &[],
};

// =============================================================================
// Normalized Tables (derived from url_temp)
// =============================================================================

pub static TLD: TableSchema = TableSchema {
    name: "tld",
    columns: &[
        Column::required("tld_id", ColumnType::Integer),
        Column::required("tld1", ColumnType::Varchar(15)),
        Column::new("tld2", ColumnType::Varchar(15)),
    ],
    primary_key: &["tld_id"],
    unique: &[],
    foreign_keys: &[],
    checks: &[],
    temporary: false,
    derives_from: &["url_temp"],
};

pub static DOMAIN: TableSchema = TableSchema {
    name: "domain",
    columns: &[Column::required("domain_name", ColumnType::Varchar(50))],
    primary_key: &["domain_name"],
    unique: &[],
    foreign_keys: &[],
    checks: &[],
    temporary: false,
    derives_from: &["url_temp"],
};

pub static URL: TableSchema = TableSchema {
    name: "url",
    columns: &[
        Column::required("domain_name", ColumnType::Varchar(50)),
        Column::required("tld_id", ColumnType::Integer),
        Column::required("position", ColumnType::Integer),
    ],
    primary_key: &["domain_name", "tld_id"],
    unique: &[&["position"]],
    foreign_keys: &[
        ForeignKey::new("domain_name", "domain"),
        ForeignKey::new("tld_id", "tld"),
    ],
    checks: &["position >= 1 AND position <= 10000"],
    temporary: false,
    derives_from: &["url_temp"],
};

// =============================================================================
// Views
// =============================================================================

pub static TOP_10_URLS: ViewSchema = ViewSchema {
    name: "top_10_urls",
    query: "SELECT position, domain_name, tld1, tld2
    FROM url
    NATURAL JOIN tld
    ORDER BY position
    LIMIT 10",
    derives_from: &["url", "tld"],
};

pub static TOP_10_TLDS: ViewSchema = ViewSchema {
    name: "top_10_tlds",
    query: "SELECT min(url.position) AS best_position,
        tld.tld1 AS tld1,
        tld.tld2 AS tld2,
        mapping.description AS description
    FROM url
    JOIN tld ON tld.tld_id = url.tld_id
    JOIN mapping ON mapping.tld = (
        CASE
            WHEN tld.tld2 = '' THEN tld.tld1
            ELSE tld.tld2
        END
    )
    GROUP BY tld.tld1, tld.tld2, mapping.description
    ORDER BY best_position
    LIMIT 10",
    derives_from: &["url", "tld", "mapping"],
};

pub static TOP_10_REPEATED_DOMAINS: ViewSchema = ViewSchema {
    name: "top_10_repeated_domains",
    query: "SELECT min(position) AS best_position, domain_name
    FROM url
    GROUP BY domain_name
    HAVING count(*) > 1
    ORDER BY best_position
    LIMIT 10",
    derives_from: &["url"],
};

// =============================================================================
// Schema Registry
// =============================================================================

/// All table schemas in dependency order
pub static ALL_TABLES: &[&TableSchema] = &[&MAPPING, &URL_TEMP, &TLD, &DOMAIN, &URL];

/// All view schemas
pub static ALL_VIEWS: &[&ViewSchema] = &[&TOP_10_URLS, &TOP_10_TLDS, &TOP_10_REPEATED_DOMAINS];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get view schema by name
pub fn get_view(name: &str) -> Option<&'static ViewSchema> {
    ALL_VIEWS.iter().find(|v| v.name == name).copied()
}

/// Get all table and view names in declaration order
pub fn object_names() -> Vec<&'static str> {
    ALL_TABLES
        .iter()
        .map(|t| t.name)
        .chain(ALL_VIEWS.iter().map(|v| v.name))
        .collect()
}
