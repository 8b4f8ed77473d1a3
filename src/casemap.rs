// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The mutable codepoint to case mapping relation the extractors consume.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A Unicode scalar value. Only `[MIN_CODEPOINT, MAX_CODEPOINT)` is ever used as a key.
pub type Codepoint = u32;

/// ASCII is handled by the runtime directly and never enters the tables.
pub const MIN_CODEPOINT: Codepoint = 0x80;
/// Supplementary planes are out of reach for the 16-bit tables.
pub const MAX_CODEPOINT: Codepoint = 0x10000;

/// Codepoint to mapped sequence (1 to 3 codepoints), always iterated in ascending order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CaseMap {
    entries: BTreeMap<Codepoint, Vec<Codepoint>>,
}

impl CaseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, cp: Codepoint) -> bool {
        self.entries.contains_key(&cp)
    }

    pub fn get(&self, cp: Codepoint) -> Option<&[Codepoint]> {
        self.entries.get(&cp).map(Vec::as_slice)
    }

    /// Inserts or replaces the mapping of `cp`.
    pub fn insert(&mut self, cp: Codepoint, mapped: Vec<Codepoint>) {
        self.entries.insert(cp, mapped);
    }

    pub fn remove(&mut self, cp: Codepoint) -> Option<Vec<Codepoint>> {
        self.entries.remove(&cp)
    }

    /// Returns the current keys in ascending order.
    ///
    /// The snapshot is detached from the map, so an extractor can walk it
    /// while deleting the very entries it visits.
    pub fn keys(&self) -> Vec<Codepoint> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Codepoint, Vec<Codepoint>> {
        self.entries.iter()
    }

    /// The mapped codepoint, if `cp` maps to exactly one codepoint.
    pub fn single(&self, cp: Codepoint) -> Option<Codepoint> {
        match self.get(cp)? {
            &[mapped] => Some(mapped),
            _ => None,
        }
    }

    /// The signed distance between `cp` and its mapped value.
    /// Only defined for one-to-one mappings.
    pub fn offset(&self, cp: Codepoint) -> Option<i32> {
        self.single(cp).map(|mapped| mapped as i32 - cp as i32)
    }

    /// Whether `cp` maps to a single `m` in `self` and `m` maps back to exactly `cp` in `other`.
    pub fn is_bidirectional(&self, cp: Codepoint, other: &CaseMap) -> bool {
        self.single(cp).is_some_and(|mapped| other.single(mapped) == Some(cp))
    }
}

impl FromIterator<(Codepoint, Vec<Codepoint>)> for CaseMap {
    fn from_iter<I: IntoIterator<Item = (Codepoint, Vec<Codepoint>)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CaseMap {
    type Item = (&'a Codepoint, &'a Vec<Codepoint>);
    type IntoIter = btree_map::Iter<'a, Codepoint, Vec<Codepoint>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The lowercase and uppercase relations, as produced by the UCD reader.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CaseMaps {
    pub lower: CaseMap,
    pub upper: CaseMap,
}

impl CaseMaps {
    pub fn new(lower: CaseMap, upper: CaseMap) -> Self {
        Self { lower, upper }
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }
}
