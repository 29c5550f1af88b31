//! Data population for each table.

use std::path::Path;

use tracing::warn;

use super::{Inputs, MissingInputPolicy};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::parser::{parse_mapping, parse_ranked_url, read_records, ParsedRow, RecordError};

pub const INSERT_MAPPING: &str =
    "INSERT INTO mapping (tld, description) VALUES (?1, ?2) ON CONFLICT DO NOTHING";

pub const INSERT_URL_TEMP: &str =
    "INSERT INTO url_temp (pos, domain_name, tld1, tld2) VALUES (?1, ?2, ?3, ?4)";

/// One id per distinct (tld1, tld2) pair, ranked by the pair's best position
pub const INSERT_TLD: &str = "INSERT INTO tld (tld_id, tld1, tld2)
    SELECT row_number() OVER (ORDER BY min(pos), tld1, tld2), tld1, tld2
    FROM url_temp
    WHERE true
    GROUP BY tld1, tld2
    ON CONFLICT DO NOTHING";

pub const INSERT_DOMAIN: &str = "INSERT INTO domain (domain_name)
    SELECT domain_name
    FROM url_temp
    WHERE true
    GROUP BY domain_name
    ORDER BY domain_name
    ON CONFLICT DO NOTHING";

pub const SELECT_RESOLVED_URLS: &str = "SELECT url_temp.pos, url_temp.domain_name, tld.tld_id
    FROM url_temp
    JOIN tld ON url_temp.tld1 = tld.tld1 AND url_temp.tld2 = tld.tld2
    ORDER BY url_temp.pos";

/// Only a repeated (domain, tld) pair is skipped; a repeated or
/// out-of-range position still fails
pub const INSERT_URL: &str = "INSERT INTO url (position, domain_name, tld_id) VALUES (?1, ?2, ?3)
    ON CONFLICT (domain_name, tld_id) DO NOTHING";

pub fn mapping(gateway: &mut Gateway, inputs: &Inputs) -> Result<u64> {
    let Some(rows) = read_rows(&inputs.mapping_file, inputs.missing_input, |line| {
        parse_mapping(line).map(|record| record.to_row())
    })?
    else {
        return Ok(0);
    };

    gateway.insert_batch(INSERT_MAPPING, &rows)
}

pub fn url_temp(gateway: &mut Gateway, inputs: &Inputs) -> Result<u64> {
    let Some(rows) = read_rows(&inputs.urls_file, inputs.missing_input, |line| {
        parse_ranked_url(line).map(|record| record.to_row())
    })?
    else {
        return Ok(0);
    };

    gateway.insert_batch(INSERT_URL_TEMP, &rows)
}

pub fn tld(gateway: &mut Gateway) -> Result<u64> {
    Ok(gateway.execute(INSERT_TLD)? as u64)
}

pub fn domain(gateway: &mut Gateway) -> Result<u64> {
    Ok(gateway.execute(INSERT_DOMAIN)? as u64)
}

pub fn url(gateway: &mut Gateway) -> Result<u64> {
    let rows = gateway.query_rows(SELECT_RESOLVED_URLS, |row| {
        Ok(ParsedRow {
            values: vec![
                row.get_ref(0)?.into(),
                row.get_ref(1)?.into(),
                row.get_ref(2)?.into(),
            ],
        })
    })?;

    gateway.insert_batch(INSERT_URL, &rows)
}

/// Read an input file, applying the missing-input policy to I/O failures.
///
/// `Ok(None)` means the file could not be read and the failure was only
/// reported.
fn read_rows(
    path: &Path,
    policy: MissingInputPolicy,
    parse: impl Fn(&str) -> std::result::Result<ParsedRow, RecordError>,
) -> Result<Option<Vec<ParsedRow>>> {
    match read_records(path, parse) {
        Ok(rows) => Ok(Some(rows)),
        Err(err @ Error::FileRead { .. }) if policy == MissingInputPolicy::Warn => {
            warn!("{}; leaving table empty", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
