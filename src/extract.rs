// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The greedy extraction passes.
//!
//! Each pass walks a snapshot of the keys in ascending order, records the entries it
//! can encode, and then deletes every claimed codepoint from the map(s), so that later
//! passes only ever see the leftovers. The passes are only meaningful in the order
//! [`crate::tables::CaseTables::build`] runs them, which is why they are crate-private.

use tracing::trace;

use crate::casemap::{CaseMap, Codepoint};

/// Pair ranges need at least two adjacent pairs, i.e. four codepoints.
pub const MIN_PAIR_RANGE_LENGTH: u32 = 4;

/// `start + i` maps to `mapped_start + i` for every `i` in `0..length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformRange {
    pub start: Codepoint,
    pub mapped_start: Codepoint,
    /// Number of codepoints covered. At least 2.
    pub length: u32,
}

/// A chain of swap pairs `(start, start + 1), (start + 2, start + 3), ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRange {
    pub start: Codepoint,
    /// Twice the number of pairs, i.e. the number of codepoints the chain spans.
    pub length: u32,
}

/// `from` maps to `to` and `to` maps back to `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingletonPair {
    pub from: Codepoint,
    pub to: Codepoint,
}

/// `start + i` maps to `(first_out_start + i, second_out)` for every `i` in `0..length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRange {
    pub start: Codepoint,
    pub first_out_start: Codepoint,
    pub second_out: Codepoint,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualEntry {
    pub codepoint: Codepoint,
    pub mapped: Vec<Codepoint>,
}

/// Leftover mappings, grouped by the number of codepoints they map to (1, 2, 3).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ResidualBuckets {
    buckets: [Vec<ResidualEntry>; 3],
}

impl ResidualBuckets {
    /// The entries mapping to exactly `arity` codepoints, in ascending order.
    pub fn bucket(&self, arity: usize) -> &[ResidualEntry] {
        match arity {
            1..=3 => &self.buckets[arity - 1],
            _ => &[],
        }
    }

    pub fn counts(&self) -> [usize; 3] {
        self.buckets.each_ref().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, arity 1 first, then arity 2, then arity 3.
    pub fn iter(&self) -> impl Iterator<Item = &ResidualEntry> {
        self.buckets.iter().flatten()
    }
}

/// Finds maximal runs of adjacent codepoints sharing the same one-to-one offset.
///
/// With `reverse`, only round-tripping conversions qualify and the mapped values are
/// deleted from `reverse` as well. Without it, any one-to-one mapping qualifies.
pub(crate) fn extract_uniform_ranges(
    map: &mut CaseMap,
    mut reverse: Option<&mut CaseMap>,
) -> Vec<UniformRange> {
    let mut ranges: Vec<UniformRange> = Vec::new();
    let mut open = false;

    for cp in map.keys() {
        let Some((prev, prev_mapped)) = uniform_link(map, reverse.as_deref(), cp) else {
            open = false;
            continue;
        };

        match ranges.last_mut() {
            Some(range) if open => range.length += 1,
            _ => {
                // The first confirmed adjacency is `prev -> cp`, so the range starts at `prev`.
                ranges.push(UniformRange { start: prev, mapped_start: prev_mapped, length: 2 });
                open = true;
            }
        }
    }

    for range in &ranges {
        trace!(start = range.start, mapped_start = range.mapped_start, length = range.length);
        for i in 0..range.length {
            map.remove(range.start + i);
            if let Some(reverse) = reverse.as_deref_mut() {
                reverse.remove(range.mapped_start + i);
            }
        }
    }

    ranges
}

/// Returns `cp - 1` and its mapped value if `cp` continues a uniform run from its predecessor.
fn uniform_link(
    map: &CaseMap,
    reverse: Option<&CaseMap>,
    cp: Codepoint,
) -> Option<(Codepoint, Codepoint)> {
    let eligible = |cp| match reverse {
        Some(reverse) => map.is_bidirectional(cp, reverse),
        None => map.single(cp).is_some(),
    };

    let prev = cp.checked_sub(1)?;
    if !eligible(cp) || !eligible(prev) || map.offset(prev) != map.offset(cp) {
        return None;
    }
    Some((prev, map.single(prev)?))
}

/// Finds chains of at least two adjacent swap pairs, where `c` and `c + 1` convert into each other.
pub(crate) fn extract_pair_ranges(map: &mut CaseMap, reverse: &mut CaseMap) -> Vec<PairRange> {
    let mut chains: Vec<PairRange> = Vec::new();
    let mut last_member: Option<Codepoint> = None;

    for cp in map.keys() {
        let member = map.is_bidirectional(cp, reverse) && map.single(cp) == Some(cp + 1);
        if !member {
            last_member = None;
            continue;
        }

        match chains.last_mut() {
            Some(chain) if last_member.is_some_and(|last| last + 2 == cp) => chain.length += 2,
            _ => chains.push(PairRange { start: cp, length: 2 }),
        }
        last_member = Some(cp);
    }

    // A lone pair is cheaper as a singleton pair.
    chains.retain(|chain| chain.length >= MIN_PAIR_RANGE_LENGTH);

    for chain in &chains {
        trace!(start = chain.start, length = chain.length);
        for i in (0..chain.length).step_by(2) {
            map.remove(chain.start + i);
            reverse.remove(chain.start + i + 1);
        }
    }

    chains
}

/// Claims every remaining round-tripping one-to-one conversion as an explicit pair.
pub(crate) fn extract_singleton_pairs(
    map: &mut CaseMap,
    reverse: &mut CaseMap,
) -> Vec<SingletonPair> {
    let mut pairs = Vec::new();

    for cp in map.keys() {
        if !map.is_bidirectional(cp, reverse) {
            continue;
        }
        let Some(mapped) = map.single(cp) else {
            continue;
        };

        map.remove(cp);
        reverse.remove(mapped);
        pairs.push(SingletonPair { from: cp, to: mapped });
    }

    pairs
}

/// Finds runs of one-to-two mappings that share the second codepoint and
/// whose first codepoint keeps a constant offset.
pub(crate) fn extract_special_ranges(map: &mut CaseMap) -> Vec<SpecialRange> {
    let mut ranges: Vec<SpecialRange> = Vec::new();
    let mut open = false;

    for cp in map.keys() {
        let Some((prev, prev_first, second)) = special_link(map, cp) else {
            open = false;
            continue;
        };

        match ranges.last_mut() {
            Some(range) if open => range.length += 1,
            _ => {
                ranges.push(SpecialRange {
                    start: prev,
                    first_out_start: prev_first,
                    second_out: second,
                    length: 1,
                });
                open = true;
            }
        }
    }

    // The length counts confirmed adjacencies, so the final codepoint
    // of each run stays behind for the residual tables.
    for range in &ranges {
        trace!(
            start = range.start,
            first_out_start = range.first_out_start,
            second_out = range.second_out,
            length = range.length
        );
        for i in 0..range.length {
            map.remove(range.start + i);
        }
    }

    ranges
}

/// Returns `cp - 1`, its first mapped codepoint and the shared second one,
/// if `cp` continues a special run from its predecessor.
fn special_link(map: &CaseMap, cp: Codepoint) -> Option<(Codepoint, Codepoint, Codepoint)> {
    let &[first, second] = map.get(cp)? else {
        return None;
    };
    let prev = cp.checked_sub(1)?;
    let &[prev_first, prev_second] = map.get(prev)? else {
        return None;
    };

    let offset = first as i32 - cp as i32;
    let prev_offset = prev_first as i32 - prev as i32;
    (prev_second == second && prev_offset == offset).then_some((prev, prev_first, second))
}

/// Moves everything that is left into the dense fallback buckets.
/// Mappings with an arity outside 1 to 3 are left in the map.
pub(crate) fn bucketize_residuals(map: &mut CaseMap) -> ResidualBuckets {
    let mut residuals = ResidualBuckets::default();

    for cp in map.keys() {
        let arity = map.get(cp).map_or(0, <[Codepoint]>::len);
        if !(1..=3).contains(&arity) {
            continue;
        }
        if let Some(mapped) = map.remove(cp) {
            residuals.buckets[arity - 1].push(ResidualEntry { codepoint: cp, mapped });
        }
    }

    residuals
}
