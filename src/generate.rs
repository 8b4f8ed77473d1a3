// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Emits the flattened tables as C or Rust source.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use indoc::writedoc;

use crate::tables::{Table, TableData};

const VALUES_PER_LINE: usize = 8;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum Language {
    #[default]
    C,
    Rust,
}

/// Everything that ends up in the generated file.
pub struct Output<'a> {
    pub lang: Language,
    /// Basename of the UnicodeData.txt input, for the banner.
    pub unicode_data: &'a str,
    /// Basename of the SpecialCasing.txt input, for the banner.
    pub special_casing: &'a str,
    /// Only stamped into the banner if set, to keep the output reproducible otherwise.
    pub timestamp: Option<DateTime<Utc>>,
    pub tables: &'a [Table],
}

impl Output<'_> {
    pub fn total_size(&self) -> usize {
        self.tables.iter().map(|t| t.data.size_in_bytes()).sum()
    }

    fn timestamp(&self) -> Option<String> {
        self.timestamp.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

pub fn generate(out: &Output) -> String {
    match out.lang {
        Language::C => generate_c(out),
        Language::Rust => generate_rust(out),
    }
}

fn generate_c(out: &Output) -> String {
    let mut buf = String::new();

    _ = writedoc!(
        buf,
        "
        /* This file is automatically generated by the ucd-case-table-gen tool
         * from {} and {} files. Do not edit! */
        ",
        out.unicode_data,
        out.special_casing,
    );
    if let Some(timestamp) = out.timestamp() {
        _ = writeln!(buf, "/* Generated on {timestamp}. */");
    }
    _ = writedoc!(
        buf,
        "
        /* Total table size: {} bytes. */

        // clang-format off
        ",
        out.total_size(),
    );

    for table in out.tables {
        buf.push('\n');
        write_c_comment(&mut buf, table.description);

        let (ty, len) = match &table.data {
            TableData::U16(v) => ("uint16_t", v.len()),
            TableData::U8(v) => ("uint8_t", v.len()),
        };
        _ = writeln!(buf, "#define {}_LENGTH {}", table.name.to_ascii_uppercase(), len);
        _ = write!(buf, "static const {} {}[] = {{", ty, table.name);
        if table.data.is_empty() {
            // Zero-sized arrays aren't valid C; readers go by the length macro instead.
            buf.push_str("\n    0");
        } else {
            write_values(&mut buf, &table.data);
        }
        buf.push_str("\n};\n");
    }

    buf.push_str("\n// clang-format on\n");
    buf
}

fn generate_rust(out: &Output) -> String {
    let mut buf = String::new();

    _ = writedoc!(
        buf,
        "
        // This file is automatically generated by the ucd-case-table-gen tool
        // from {} and {} files. Do not edit!
        ",
        out.unicode_data,
        out.special_casing,
    );
    if let Some(timestamp) = out.timestamp() {
        _ = writeln!(buf, "// Generated on {timestamp}.");
    }
    _ = writeln!(buf, "// Total table size: {} bytes.", out.total_size());

    for table in out.tables {
        buf.push('\n');
        for line in table.description.lines() {
            _ = writeln!(buf, "/// {line}");
        }

        _ = write!(
            buf,
            "#[rustfmt::skip]\npub const {}: [u{}; {}] = [",
            table.name.to_ascii_uppercase(),
            table.data.bits(),
            table.data.len(),
        );
        write_values(&mut buf, &table.data);
        if !table.data.is_empty() {
            buf.push('\n');
        }
        buf.push_str("];\n");
    }

    buf
}

fn write_c_comment(buf: &mut String, text: &str) {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    if rest.is_empty() {
        _ = writeln!(buf, "/* {first} */");
    } else {
        _ = writeln!(buf, "/* {first}");
        for line in rest {
            _ = writeln!(buf, " * {line}");
        }
        buf.push_str(" */\n");
    }
}

/// 16-bit values are written as hex (they're codepoints), 8-bit ones in decimal.
fn write_values(buf: &mut String, data: &TableData) {
    for (i, value) in data.values().into_iter().enumerate() {
        if i % VALUES_PER_LINE == 0 {
            buf.push_str("\n   ");
        }
        match data {
            TableData::U16(_) => _ = write!(buf, " 0x{value:04x},"),
            TableData::U8(_) => _ = write!(buf, " {value},"),
        }
    }
}
