//! Base (primitive) types: leaves of the dependency graph, aliased directly
//! to a ctypes name (spec §3 "Base type").

use crate::constants::primitive_alias;
use crate::entry::Entry;

#[derive(Debug, Clone)]
pub struct BaseType {
    pub die_offset: u64,
    pub alias: &'static str,
    pub bit_size: u64,
    pub bit_offset: Option<u64>,
}

impl BaseType {
    /// Builds a base type from a `DW_TAG_base_type` entry. Returns `None`
    /// (logged at WARN, not fatal) when the entry's name isn't one of the
    /// recognized primitive names; well-formed input shouldn't hit this.
    pub fn from_entry(entry: &Entry, byte_size: Option<u64>, bit_size_attr: Option<u64>) -> Option<Self> {
        let name = entry.name()?;
        let alias = match primitive_alias(&name) {
            Some(a) => a,
            None => {
                log::warn!("base type at offset {:#x} has unrecognized name {name:?}", entry.offset);
                return None;
            }
        };
        let bit_size = bit_size_attr.unwrap_or_else(|| byte_size.unwrap_or(0) * crate::constants::BITS_IN_BYTE);
        Some(Self {
            die_offset: entry.offset,
            alias,
            bit_size,
            bit_offset: None,
        })
    }
}
