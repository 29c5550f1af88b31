//! The four fixed top-10 reports.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use tracing::error;

use crate::gateway::Gateway;
use crate::parser::SqlValue;

/// Left-aligned column: padded to `width`, cut at `max_len` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFormat {
    pub width: usize,
    pub max_len: usize,
}

impl ColumnFormat {
    pub const UNBOUNDED: ColumnFormat = ColumnFormat::new(0, usize::MAX);

    pub const fn new(width: usize, max_len: usize) -> Self {
        Self { width, max_len }
    }

    pub fn apply(&self, text: &str) -> String {
        let truncated: String = text.chars().take(self.max_len).collect();
        format!("{:<width$}", truncated, width = self.width)
    }
}

/// A titled query with one format per result column
#[derive(Debug, Clone)]
pub struct Query {
    pub title: &'static str,
    pub sql: &'static str,
    pub columns: &'static [ColumnFormat],
}

pub static STANDARD_QUERIES: &[Query] = &[
    Query {
        title: "Query 1: 10 most popular URLs in descending order of popularity",
        sql: "SELECT position, domain_name, tld1, tld2 FROM top_10_urls ORDER BY position",
        columns: &[
            ColumnFormat::new(10, 10),
            ColumnFormat::new(15, 50),
            ColumnFormat::new(7, 15),
            ColumnFormat::new(7, 15),
        ],
    },
    Query {
        title: "Query 2: 10 distinct most popular top level domains in descending order of popularity",
        sql: "SELECT tld1, tld2 FROM top_10_tlds ORDER BY best_position",
        columns: &[ColumnFormat::new(7, 15), ColumnFormat::new(7, 15)],
    },
    Query {
        title: "Query 3: 10 distinct most popular descriptions of the rightmost part of tld in descending order of popularity",
        sql: "SELECT description FROM top_10_tlds ORDER BY best_position",
        columns: &[ColumnFormat::new(50, 200)],
    },
    Query {
        title: "Query 4: top 10 distinct domain names that appear more than once, ordered by popularity",
        sql: "SELECT domain_name FROM top_10_repeated_domains ORDER BY best_position",
        columns: &[ColumnFormat::new(15, 50)],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Fixed-width columns
    #[default]
    Text,
    /// One JSON object per query
    Json,
}

/// Result of one query, possibly cut short by an error
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub rendered: usize,
    /// Titles of queries that failed
    pub failed: Vec<&'static str>,
}

pub struct ReportRunner {
    queries: &'static [Query],
    format: ReportFormat,
}

impl ReportRunner {
    pub fn new(queries: &'static [Query], format: ReportFormat) -> Self {
        Self { queries, format }
    }

    pub fn standard(format: ReportFormat) -> Self {
        Self::new(STANDARD_QUERIES, format)
    }

    /// Run every query and write its section. A failing query is logged and
    /// the remaining ones still run; only write errors abort.
    pub fn run(&self, gateway: &Gateway, out: &mut impl Write) -> io::Result<ReportSummary> {
        let mut summary = ReportSummary::default();

        for query in self.queries {
            let section = execute(gateway, query);
            if section.error.is_some() {
                summary.failed.push(query.title);
            }

            match self.format {
                ReportFormat::Text => render_text(&section, query.columns, out)?,
                ReportFormat::Json => {
                    serde_json::to_writer(&mut *out, &section)?;
                    writeln!(out)?;
                }
            }
            summary.rendered += 1;
        }

        out.flush()?;
        Ok(summary)
    }
}

/// Step the query's cursor until it is exhausted or fails
pub fn execute(gateway: &Gateway, query: &Query) -> Section {
    let mut section = Section {
        title: query.title,
        columns: Vec::new(),
        rows: Vec::new(),
        error: None,
    };

    let mut stmt = match gateway.prepare(query.sql) {
        Ok(stmt) => stmt,
        Err(e) => {
            error!(query = query.title, "query failed: {}", e);
            section.error = Some(e.to_string());
            return section;
        }
    };

    section.columns = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = section.columns.len();

    let mut rows = match stmt.query([]) {
        Ok(rows) => rows,
        Err(e) => {
            error!(query = query.title, "query failed: {}", e);
            section.error = Some(e.to_string());
            return section;
        }
    };

    loop {
        match rows.next() {
            Ok(Some(row)) => {
                let values = (0..column_count)
                    .map(|idx| row.get_ref(idx).map(SqlValue::from))
                    .collect::<rusqlite::Result<Vec<_>>>();
                match values {
                    Ok(values) => section.rows.push(values),
                    Err(e) => {
                        error!(query = query.title, "reading row failed: {}", e);
                        section.error = Some(e.to_string());
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(query = query.title, "reading row failed: {}", e);
                section.error = Some(e.to_string());
                break;
            }
        }
    }

    section
}

/// Format one line; integers go through the same column format as text
pub fn format_line(values: &[String], formats: &[ColumnFormat]) -> String {
    let cells: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            formats
                .get(idx)
                .copied()
                .unwrap_or(ColumnFormat::UNBOUNDED)
                .apply(value)
        })
        .collect();
    cells.join(" ").trim_end().to_string()
}

fn render_text(section: &Section, formats: &[ColumnFormat], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n##{}##\n", section.title)?;

    if !section.columns.is_empty() {
        let header: Vec<String> = section.columns.iter().map(|c| c.to_uppercase()).collect();
        writeln!(out, "{}", format_line(&header, formats))?;
    }

    for row in &section.rows {
        let cells: Vec<String> = row.iter().map(SqlValue::render).collect();
        writeln!(out, "{}", format_line(&cells, formats))?;
    }

    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_format_pads_and_truncates() {
        let format = ColumnFormat::new(7, 10);
        assert_eq!(format.apply("com"), "com    ");
        assert_eq!(format.apply("abcdefghijklmno"), "abcdefghij");
        assert_eq!(ColumnFormat::new(3, 2).apply("ééé"), "éé ");
    }

    #[test]
    fn test_format_line() {
        let formats = STANDARD_QUERIES[0].columns;
        let line = format_line(
            &["1".into(), "google".into(), "com".into(), "".into()],
            formats,
        );
        assert_eq!(line, "1          google          com");
    }

    #[test]
    fn test_failed_query_is_isolated() {
        static QUERIES: &[Query] = &[
            Query {
                title: "broken",
                sql: "SELECT * FROM no_such_view",
                columns: &[],
            },
            Query {
                title: "works",
                sql: "SELECT 7 AS answer, 'x' AS label",
                columns: &[ColumnFormat::new(6, 6), ColumnFormat::new(5, 5)],
            },
        ];

        let gateway = Gateway::open_in_memory().unwrap();
        let mut out = Vec::new();
        let summary = ReportRunner::new(QUERIES, ReportFormat::Text)
            .run(&gateway, &mut out)
            .unwrap();

        assert_eq!(summary.rendered, 2);
        assert_eq!(summary.failed, vec!["broken"]);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("##broken##"));
        assert!(text.contains("##works##"));
        assert!(text.contains("ANSWER LABEL"));
        assert!(text.contains("7      x"));
    }

    #[test]
    fn test_json_format() {
        static QUERIES: &[Query] = &[Query {
            title: "numbers",
            sql: "SELECT 1 AS n, 'one' AS word UNION ALL SELECT 2, 'two'",
            columns: &[],
        }];

        let gateway = Gateway::open_in_memory().unwrap();
        let mut out = Vec::new();
        ReportRunner::new(QUERIES, ReportFormat::Json)
            .run(&gateway, &mut out)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["title"], "numbers");
        assert_eq!(value["columns"], serde_json::json!(["n", "word"]));
        assert_eq!(value["rows"], serde_json::json!([[1, "one"], [2, "two"]]));
        assert!(value.get("error").is_none());
    }
}
