// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for the case table generator.

use thiserror::Error;

use crate::casemap::Codepoint;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A record in one of the UCD source files could not be parsed.
    #[error("{source_name}:{line}: {message}")]
    Malformed { source_name: String, line: usize, message: String },

    /// The extraction pipeline finished, but some mappings were never claimed by a tier.
    #[error(
        "not all mappings were extracted: {} lowercase ({}), {} uppercase ({})",
        .lower.len(),
        format_codepoints(.lower),
        .upper.len(),
        format_codepoints(.upper)
    )]
    Incomplete { lower: Vec<Codepoint>, upper: Vec<Codepoint> },

    /// A value does not fit the fixed-width field of its output table.
    #[error("{table}: value {value:#x} does not fit into {bits} bits")]
    FieldOverflow { table: &'static str, value: u32, bits: u32 },
}

impl Error {
    pub fn malformed(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        Error::Malformed { source_name: source_name.to_string(), line, message: message.into() }
    }
}

fn format_codepoints(cps: &[Codepoint]) -> String {
    const LIMIT: usize = 8;

    let mut buf = String::new();
    for (i, cp) in cps.iter().take(LIMIT).enumerate() {
        if i != 0 {
            buf.push_str(", ");
        }
        buf.push_str(&format!("U+{cp:04X}"));
    }
    if cps.len() > LIMIT {
        buf.push_str(", ...");
    }
    buf
}
