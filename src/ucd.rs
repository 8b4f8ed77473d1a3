// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reads the case mappings out of `UnicodeData.txt` and `SpecialCasing.txt`.
//!
//! Download both at:
//!   https://www.unicode.org/Public/UCD/latest/ucd/

use tracing::debug;

use crate::casemap::{CaseMap, CaseMaps, Codepoint, MAX_CODEPOINT, MIN_CODEPOINT};
use crate::error::{Error, Result};

/// The longest mapping either file contains (e.g. U+FB03 uppercases to "FFI").
pub const MAX_MAPPING_LEN: usize = 3;

const UNICODE_DATA_UPPER: usize = 12;
const UNICODE_DATA_LOWER: usize = 13;

const SPECIAL_CASING_LOWER: usize = 1;
const SPECIAL_CASING_UPPER: usize = 3;
const SPECIAL_CASING_CONDITIONS: usize = 4;

/// The contents of one input file and the name to report errors against.
#[derive(Clone, Copy)]
pub struct Source<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

/// Reads the default mappings and applies the unconditional special cases on top.
pub fn read_case_maps(unicode_data: Source<'_>, special_casing: Source<'_>) -> Result<CaseMaps> {
    let mut maps = parse_unicode_data(unicode_data)?;
    apply_special_casing(&mut maps, special_casing)?;
    debug!(lower = maps.lower.len(), upper = maps.upper.len(), "read case mappings");
    Ok(maps)
}

/// Collects the simple one-to-one mappings of `UnicodeData.txt`.
pub fn parse_unicode_data(source: Source<'_>) -> Result<CaseMaps> {
    let mut lower = CaseMap::new();
    let mut upper = CaseMap::new();

    for (idx, line) in source.text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() <= UNICODE_DATA_LOWER {
            return Err(Error::malformed(
                source.name,
                line_no,
                format!("expected at least {} fields, found {}", UNICODE_DATA_LOWER + 1, fields.len()),
            ));
        }

        let cp = parse_codepoint(source.name, line_no, fields[0])?;
        if !in_table_range(cp) {
            continue;
        }

        let mapped = parse_mapping(source.name, line_no, fields[UNICODE_DATA_UPPER])?;
        if !mapped.is_empty() {
            upper.insert(cp, mapped);
        }

        let mapped = parse_mapping(source.name, line_no, fields[UNICODE_DATA_LOWER])?;
        if !mapped.is_empty() {
            lower.insert(cp, mapped);
        }
    }

    Ok(CaseMaps::new(lower, upper))
}

/// Overrides `maps` with the unconditional entries of `SpecialCasing.txt`.
///
/// Entries with a language or context condition are skipped entirely.
pub fn apply_special_casing(maps: &mut CaseMaps, source: Source<'_>) -> Result<()> {
    let mut applied = 0usize;

    for (idx, line) in source.text.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() <= SPECIAL_CASING_UPPER {
            return Err(Error::malformed(
                source.name,
                line_no,
                format!("expected at least {} fields, found {}", SPECIAL_CASING_UPPER + 1, fields.len()),
            ));
        }

        let cp = parse_codepoint(source.name, line_no, fields[0])?;
        let conditions = fields.get(SPECIAL_CASING_CONDITIONS).copied().unwrap_or_default();
        if !in_table_range(cp) || !conditions.is_empty() {
            continue;
        }

        let lower = parse_mapping(source.name, line_no, fields[SPECIAL_CASING_LOWER])?;
        let upper = parse_mapping(source.name, line_no, fields[SPECIAL_CASING_UPPER])?;
        if lower.is_empty() || upper.is_empty() {
            return Err(Error::malformed(source.name, line_no, "empty case mapping"));
        }

        maps.lower.insert(cp, lower);
        maps.upper.insert(cp, upper);
        applied += 1;
    }

    debug!(applied, "applied special casing");
    Ok(())
}

fn in_table_range(cp: Codepoint) -> bool {
    (MIN_CODEPOINT..MAX_CODEPOINT).contains(&cp)
}

fn parse_codepoint(source_name: &str, line_no: usize, field: &str) -> Result<Codepoint> {
    let field = field.trim();
    u32::from_str_radix(field, 16)
        .map_err(|_| Error::malformed(source_name, line_no, format!("invalid codepoint {field:?}")))
}

/// Parses a space-separated list of hex codepoints. An empty list is fine.
fn parse_mapping(source_name: &str, line_no: usize, field: &str) -> Result<Vec<Codepoint>> {
    let mapped = field
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(|s| parse_codepoint(source_name, line_no, s))
        .collect::<Result<Vec<_>>>()?;

    if mapped.len() > MAX_MAPPING_LEN {
        return Err(Error::malformed(
            source_name,
            line_no,
            format!("mapping {field:?} is longer than {MAX_MAPPING_LEN} codepoints"),
        ));
    }
    Ok(mapped)
}
