//! Compresses the Unicode case mappings into a handful of tiered lookup tables
//! small enough to embed into a runtime.
//!
//! The pipeline is [`ucd::read_case_maps`], then [`tables::CaseTables::build`], then
//! [`tables::CaseTables::to_tables`], and finally [`generate::generate`].

pub mod casemap;
pub mod error;
mod extract;
pub mod generate;
pub mod tables;
pub mod ucd;


pub use casemap::{CaseMap, CaseMaps, Codepoint};
pub use error::{Error, Result};
pub use extract::{PairRange, ResidualBuckets, ResidualEntry, SingletonPair, SpecialRange, UniformRange};
pub use tables::{CaseTables, Table, TableData};
