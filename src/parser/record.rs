use rusqlite::types::ValueRef;
use serde::Serialize;
use thiserror::Error;

/// Field separator used by both input files
pub const FIELD_SEPARATOR: char = '\t';

/// A parsed row ready for insertion, values in statement parameter order
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub values: Vec<SqlValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }

    /// Text form used by the fixed-width report
    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Text(s) => s.clone(),
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                SqlValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Integer(i)
    }
}

/// Why a single input line was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: &'static str, found: usize },

    #[error("rank '{0}' is not an integer")]
    InvalidPosition(String),
}

/// One line of the mapping file: `tld\tdescription`
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRecord {
    pub tld: String,
    pub description: String,
}

impl MappingRecord {
    pub fn to_row(&self) -> ParsedRow {
        ParsedRow {
            values: vec![self.tld.as_str().into(), self.description.as_str().into()],
        }
    }
}

/// One line of the ranked URL file: `position\tdomain\ttld1[\ttld2]`
#[derive(Debug, Clone, PartialEq)]
pub struct RankedUrl {
    pub position: i64,
    pub domain_name: String,
    pub tld1: String,
    /// Empty when the line has no secondary TLD
    pub tld2: String,
}

impl RankedUrl {
    pub fn to_row(&self) -> ParsedRow {
        ParsedRow {
            values: vec![
                self.position.into(),
                self.domain_name.as_str().into(),
                self.tld1.as_str().into(),
                self.tld2.as_str().into(),
            ],
        }
    }

    /// TLD used to look up a description: tld2 when present, else tld1
    pub fn effective_tld(&self) -> &str {
        if self.tld2.is_empty() {
            &self.tld1
        } else {
            &self.tld2
        }
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.strip_suffix('\r')
        .unwrap_or(line)
        .split(FIELD_SEPARATOR)
        .collect()
}

/// Parse a mapping line into a (tld, description) pair
pub fn parse_mapping(line: &str) -> Result<MappingRecord, RecordError> {
    match split_fields(line).as_slice() {
        [tld, description] => Ok(MappingRecord {
            tld: tld.to_string(),
            description: description.to_string(),
        }),
        fields => Err(RecordError::FieldCount {
            expected: "2",
            found: fields.len(),
        }),
    }
}

/// Parse a ranked URL line; the rank must be an integer
pub fn parse_ranked_url(line: &str) -> Result<RankedUrl, RecordError> {
    let fields = split_fields(line);
    let (rank, domain, tld1, tld2) = match fields.as_slice() {
        [rank, domain, tld1] => (*rank, *domain, *tld1, ""),
        [rank, domain, tld1, tld2] => (*rank, *domain, *tld1, *tld2),
        _ => {
            return Err(RecordError::FieldCount {
                expected: "3 or 4",
                found: fields.len(),
            })
        }
    };

    let position = rank
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidPosition(rank.to_string()))?;

    Ok(RankedUrl {
        position,
        domain_name: domain.to_string(),
        tld1: tld1.to_string(),
        tld2: tld2.to_string(),
    })
}
