//! The `Entry` data model: the boundary the translator consumes from a
//! debug-info decoder (spec §3, §6a). Both the real `gimli`/`object` backed
//! decoder and unit tests build these directly; the translator never reaches
//! back into `gimli` or `object` types itself.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::constants::normalize_name;

/// A normalized attribute value. The decoder is responsible for converting
/// whatever encoding the underlying format uses into one of these; the
/// translator only ever sees this shape.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Unsigned(u64),
    Signed(i64),
    /// A reference to another entry. `unit_relative` records whether the
    /// underlying form carried a unit-relative offset (spec §4.1 rule 4); the
    /// translator adds the owning entry's `unit_offset` in that case.
    Reference { value: u64, unit_relative: bool },
    Text(String),
    Flag(bool),
    Exprloc(Vec<u8>),
    Address(u64),
}

/// A single debug-info node. Carries its own absolute offset, the base
/// offset of its enclosing compilation unit (needed to normalize
/// unit-relative references), its attributes, and its children in source
/// order.
#[derive(Debug)]
pub struct Entry {
    pub tag: gimli::DwTag,
    pub offset: u64,
    pub unit_offset: u64,
    pub attributes: HashMap<gimli::DwAt, AttributeValue>,
    pub children: Vec<Entry>,
    synthesized_name: RefCell<Option<String>>,
}

impl Entry {
    pub fn new(
        tag: gimli::DwTag,
        offset: u64,
        unit_offset: u64,
        attributes: HashMap<gimli::DwAt, AttributeValue>,
        children: Vec<Entry>,
    ) -> Self {
        Self {
            tag,
            offset,
            unit_offset,
            attributes,
            children,
            synthesized_name: RefCell::new(None),
        }
    }

    pub fn attr(&self, at: gimli::DwAt) -> Option<&AttributeValue> {
        self.attributes.get(&at)
    }

    /// The raw `DW_AT_name` string, normalized for reserved/dunder
    /// collisions, with no synthesis when absent.
    pub fn name(&self) -> Option<String> {
        match self.attr(gimli::DW_AT_name) {
            Some(AttributeValue::Text(s)) => Some(normalize_name(s)),
            _ => None,
        }
    }

    /// `DW_AT_name`, synthesizing and memoizing `Unnamed_type_<n>` when
    /// absent (spec §4.1 rule 1). `counter` is threaded through construction
    /// rather than held in a process-wide static (spec §9).
    pub fn name_or_synthesize(&self, counter: &mut UnnamedCounter) -> String {
        if let Some(name) = self.name() {
            return name;
        }
        if let Some(existing) = self.synthesized_name.borrow().as_ref() {
            return existing.clone();
        }
        let synthesized = format!("Unnamed_type_{}", counter.next());
        *self.synthesized_name.borrow_mut() = Some(synthesized.clone());
        synthesized
    }

    /// `DW_AT_type`, normalized to an absolute offset (spec §4.1 rule 4).
    pub fn type_ref(&self) -> Option<u64> {
        match self.attr(gimli::DW_AT_type)? {
            AttributeValue::Reference { value, unit_relative } => {
                Some(if *unit_relative { value + self.unit_offset } else { *value })
            }
            _ => None,
        }
    }

    pub fn unsigned(&self, at: gimli::DwAt) -> Option<u64> {
        match self.attr(at)? {
            AttributeValue::Unsigned(v) => Some(*v),
            AttributeValue::Signed(v) if *v >= 0 => Some(*v as u64),
            AttributeValue::Address(v) => Some(*v),
            _ => None,
        }
    }

    pub fn signed(&self, at: gimli::DwAt) -> Option<i64> {
        match self.attr(at)? {
            AttributeValue::Signed(v) => Some(*v),
            AttributeValue::Unsigned(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn flag(&self, at: gimli::DwAt) -> bool {
        matches!(self.attr(at), Some(AttributeValue::Flag(true)))
    }

    pub fn exprloc(&self, at: gimli::DwAt) -> Option<&[u8]> {
        match self.attr(at)? {
            AttributeValue::Exprloc(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn address(&self, at: gimli::DwAt) -> Option<u64> {
        match self.attr(at)? {
            AttributeValue::Address(v) => Some(*v),
            AttributeValue::Unsigned(v) => Some(*v),
            _ => None,
        }
    }
}

/// The process-wide `Unnamed_count` from the original implementation,
/// reshaped as an explicit counter threaded through a single run (spec §9
/// redesign note) instead of global mutable state.
#[derive(Debug, Default)]
pub struct UnnamedCounter(u32);

impl UnnamedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u32 {
        let n = self.0;
        self.0 += 1;
        n
    }
}
