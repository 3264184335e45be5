//! Enumeration types: a flat name/value list with no inter-type dependencies
//! (spec §3 "Enumeration").

use crate::entry::Entry;

#[derive(Debug, Clone)]
pub struct Enumeration {
    pub die_offset: u64,
    pub alias: String,
    pub byte_size: u64,
    pub enumerators: Vec<(String, i64)>,
}

impl Enumeration {
    pub fn from_entry(entry: &Entry, alias: String, byte_size: u64) -> Self {
        let enumerators = entry
            .children
            .iter()
            .filter(|child| child.tag == gimli::DW_TAG_enumerator)
            .filter_map(|child| {
                let name = child.name()?;
                let value = child.signed(gimli::DW_AT_const_value)?;
                Some((name, value))
            })
            .collect();
        Self { die_offset: entry.offset, alias, byte_size, enumerators }
    }
}
