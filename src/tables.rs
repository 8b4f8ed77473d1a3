// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Runs the extraction pipeline and flattens its tiers into the named output tables.

use tracing::{debug, info};

use crate::casemap::{CaseMap, CaseMaps, Codepoint};
use crate::error::{Error, Result};
use crate::extract::{self, PairRange, ResidualBuckets, SingletonPair, SpecialRange, UniformRange};

/// Every tier the two case maps were partitioned into.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CaseTables {
    /// Bidirectional uniform-offset ranges (uppercase start, lowercase start).
    pub character_case_ranges: Vec<UniformRange>,
    /// Bidirectional chains of adjacent swap pairs.
    pub character_pair_ranges: Vec<PairRange>,
    /// Bidirectional pairs that did not fit any range.
    pub character_pairs: Vec<SingletonPair>,
    /// Uppercase one-to-two mappings with a shared second codepoint.
    pub upper_case_special_ranges: Vec<SpecialRange>,
    /// One-directional lowercase uniform-offset ranges.
    pub lower_case_ranges: Vec<UniformRange>,
    pub lower_case_conversions: ResidualBuckets,
    pub upper_case_conversions: ResidualBuckets,
}

impl CaseTables {
    /// Partitions both maps into tiers.
    ///
    /// The stages share the two maps and each one only sees what its predecessors left
    /// behind, so this is the only entry point into the extractors. Fails with
    /// [`Error::Incomplete`] if any mapping survives the last stage.
    pub fn build(maps: CaseMaps) -> Result<Self> {
        let CaseMaps { mut lower, mut upper } = maps;
        info!(lower = lower.len(), upper = upper.len(), "extracting case conversion tables");

        let character_case_ranges = extract::extract_uniform_ranges(&mut lower, Some(&mut upper));
        stage_done("character_case_ranges", character_case_ranges.len(), &lower, &upper);

        let character_pair_ranges = extract::extract_pair_ranges(&mut lower, &mut upper);
        stage_done("character_pair_ranges", character_pair_ranges.len(), &lower, &upper);

        let character_pairs = extract::extract_singleton_pairs(&mut lower, &mut upper);
        stage_done("character_pairs", character_pairs.len(), &lower, &upper);

        let upper_case_special_ranges = extract::extract_special_ranges(&mut upper);
        stage_done("upper_case_special_ranges", upper_case_special_ranges.len(), &lower, &upper);

        let lower_case_ranges = extract::extract_uniform_ranges(&mut lower, None);
        stage_done("lower_case_ranges", lower_case_ranges.len(), &lower, &upper);

        let lower_case_conversions = extract::bucketize_residuals(&mut lower);
        stage_done("lower_case_conversions", lower_case_conversions.len(), &lower, &upper);

        let upper_case_conversions = extract::bucketize_residuals(&mut upper);
        stage_done("upper_case_conversions", upper_case_conversions.len(), &lower, &upper);

        if !lower.is_empty() || !upper.is_empty() {
            return Err(Error::Incomplete { lower: lower.keys(), upper: upper.keys() });
        }

        Ok(Self {
            character_case_ranges,
            character_pair_ranges,
            character_pairs,
            upper_case_special_ranges,
            lower_case_ranges,
            lower_case_conversions,
            upper_case_conversions,
        })
    }

    /// Flattens the tiers into the fixed-width tables, in output order.
    pub fn to_tables(&self) -> Result<Vec<Table>> {
        let mut tables = Vec::with_capacity(13);

        tables.push(Table::wide(
            "character_case_ranges",
            "Contains start points of character case ranges (these are bidirectional conversions).",
            self.character_case_ranges.iter().flat_map(|r| [r.start, r.mapped_start]),
        )?);
        tables.push(Table::narrow(
            "character_case_range_lengths",
            "Interval lengths of start points in `character_case_ranges` table.",
            self.character_case_ranges.iter().map(|r| r.length),
        )?);

        tables.push(Table::wide(
            "character_pair_ranges",
            "Contains the start points of bidirectional conversion ranges.",
            self.character_pair_ranges.iter().map(|r| r.start),
        )?);
        tables.push(Table::narrow(
            "character_pair_range_lengths",
            "Interval lengths of start points in `character_pair_ranges` table.",
            self.character_pair_ranges.iter().map(|r| r.length),
        )?);

        tables.push(Table::wide(
            "character_pairs",
            "Contains lower/upper case bidirectional conversion pairs.",
            self.character_pairs.iter().flat_map(|p| [p.from, p.to]),
        )?);

        tables.push(Table::wide(
            "upper_case_special_ranges",
            "Contains start points of one-to-two uppercase ranges where the second character\n\
             is always the same.",
            self.upper_case_special_ranges
                .iter()
                .flat_map(|r| [r.start, r.first_out_start, r.second_out]),
        )?);
        tables.push(Table::narrow(
            "upper_case_special_range_lengths",
            "Interval lengths for start points in `upper_case_special_ranges` table.",
            self.upper_case_special_ranges.iter().map(|r| r.length),
        )?);

        tables.push(Table::wide(
            "lower_case_ranges",
            "Contains start points of lowercase ranges.",
            self.lower_case_ranges.iter().flat_map(|r| [r.start, r.mapped_start]),
        )?);
        tables.push(Table::narrow(
            "lower_case_range_lengths",
            "Interval lengths for start points in `lower_case_ranges` table.",
            self.lower_case_ranges.iter().map(|r| r.length),
        )?);

        tables.push(Table::wide(
            "lower_case_conversions",
            "The remaining lowercase conversions. The lowercase variant can be one-to-three character long.",
            flatten_residuals(&self.lower_case_conversions),
        )?);
        tables.push(Table::narrow(
            "lower_case_conversion_counters",
            "Number of one-to-one, one-to-two, and one-to-three lowercase conversions.",
            self.lower_case_conversions.counts().map(saturate),
        )?);

        tables.push(Table::wide(
            "upper_case_conversions",
            "The remaining uppercase conversions. The uppercase variant can be one-to-three character long.",
            flatten_residuals(&self.upper_case_conversions),
        )?);
        tables.push(Table::narrow(
            "upper_case_conversion_counters",
            "Number of one-to-one, one-to-two, and one-to-three uppercase conversions.",
            self.upper_case_conversions.counts().map(saturate),
        )?);

        Ok(tables)
    }
}

fn stage_done(stage: &str, claimed: usize, lower: &CaseMap, upper: &CaseMap) {
    debug!(
        stage,
        claimed,
        lower_left = lower.len(),
        upper_left = upper.len(),
        "extraction stage finished"
    );
}

fn flatten_residuals(residuals: &ResidualBuckets) -> impl Iterator<Item = Codepoint> + '_ {
    residuals.iter().flat_map(|e| std::iter::once(e.codepoint).chain(e.mapped.iter().copied()))
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableData {
    U16(Vec<u16>),
    U8(Vec<u8>),
}

impl TableData {
    pub fn len(&self) -> usize {
        match self {
            TableData::U16(v) => v.len(),
            TableData::U8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bits(&self) -> usize {
        match self {
            TableData::U16(_) => 16,
            TableData::U8(_) => 8,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.len() * self.bits() / 8
    }

    /// The values widened back to `u32`, mostly for inspection.
    pub fn values(&self) -> Vec<u32> {
        match self {
            TableData::U16(v) => v.iter().map(|&x| x as u32).collect(),
            TableData::U8(v) => v.iter().map(|&x| x as u32).collect(),
        }
    }
}

/// One named, flat output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub description: &'static str,
    pub data: TableData,
}

impl Table {
    /// A table of 16-bit codepoint fields.
    fn wide(
        name: &'static str,
        description: &'static str,
        values: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let values: Vec<u16> = values
            .into_iter()
            .map(|value| {
                u16::try_from(value).map_err(|_| Error::FieldOverflow { table: name, value, bits: 16 })
            })
            .collect::<Result<_>>()?;
        Ok(Self { name, description, data: TableData::U16(values) })
    }

    /// A table of 8-bit length or counter fields.
    fn narrow(
        name: &'static str,
        description: &'static str,
        values: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let values: Vec<u8> = values
            .into_iter()
            .map(|value| {
                u8::try_from(value).map_err(|_| Error::FieldOverflow { table: name, value, bits: 8 })
            })
            .collect::<Result<_>>()?;
        Ok(Self { name, description, data: TableData::U8(values) })
    }
}
