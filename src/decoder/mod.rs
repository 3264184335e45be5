//! Concrete `Entry` builder over `gimli` + `object` (spec §6a). The
//! translator never imports either crate directly; this module is the only
//! place that does, converting DWARF's own attribute encoding into this
//! crate's `AttributeValue` at the boundary.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use gimli::{EndianSlice, Reader as _, RunTimeEndian};
use object::{Object, ObjectSection, ObjectSymbol};

use crate::constants::SYMBOL_TABLE_SECTION_NAME;
use crate::entry::{AttributeValue, Entry};
use crate::error::TranslateError;
use crate::location::Endianness;

type Reader<'a> = EndianSlice<'a, RunTimeEndian>;

/// The decoded input: one `Entry` tree per compilation unit, the object
/// file's endianness (needed by the location evaluator), and every global
/// symbol name (needed by the driver's symbol-table correlation pass).
pub struct DecodedBinary {
    pub units: Vec<Entry>,
    pub endianness: Endianness,
    pub symbol_names: Vec<String>,
}

pub fn load(path: &Path) -> anyhow::Result<DecodedBinary> {
    let data = std::fs::read(path)?;
    let object_file = object::File::parse(&*data)?;

    if object_file.section_by_name(SYMBOL_TABLE_SECTION_NAME).is_none() && object_file.symbols().next().is_none() {
        return Err(TranslateError::MissingSymbolTable.into());
    }

    let symbol_names = object_file
        .symbols()
        .filter_map(|sym| sym.name().ok().map(str::to_string))
        .collect();

    let endianness = if object_file.is_little_endian() { Endianness::Little } else { Endianness::Big };
    let gimli_endian = if object_file.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

    let load_section = |id: gimli::SectionId| -> Result<Cow<[u8]>, gimli::Error> {
        match object_file.section_by_name(id.name()) {
            Some(section) => Ok(section.uncompressed_data().unwrap_or_default()),
            None => Ok(Cow::Borrowed(&[][..])),
        }
    };

    let dwarf_cow = gimli::Dwarf::load(load_section)?;
    let dwarf = dwarf_cow.borrow(|section| EndianSlice::new(section, gimli_endian));

    let mut units = Vec::new();
    let mut unit_headers = dwarf.units();
    while let Some(header) = unit_headers.next()? {
        let unit = dwarf.unit(header)?;
        if let Some(root_entry) = build_unit(&dwarf, &unit)? {
            units.push(root_entry);
        }
    }

    if units.is_empty() {
        return Err(TranslateError::MissingDwarfInfo.into());
    }

    Ok(DecodedBinary { units, endianness, symbol_names })
}

fn build_unit(dwarf: &gimli::Dwarf<Reader>, unit: &gimli::Unit<Reader>) -> anyhow::Result<Option<Entry>> {
    let unit_offset = unit.header.offset().as_debug_info_offset().map(|o| o.0 as u64).unwrap_or(0);
    let mut tree = unit.entries_tree(None)?;
    let root = tree.root()?;
    Ok(Some(build_entry(dwarf, unit, root, unit_offset)?))
}

fn build_entry(
    dwarf: &gimli::Dwarf<Reader>,
    unit: &gimli::Unit<Reader>,
    mut node: gimli::EntriesTreeNode<Reader>,
    unit_offset: u64,
) -> anyhow::Result<Entry> {
    let die = node.entry();
    let tag = die.tag();
    let offset = die.offset().to_debug_info_offset(&unit.header).map(|o| o.0 as u64).unwrap_or(0);

    let mut attributes = HashMap::new();
    let mut die_attrs = die.attrs();
    while let Some(attr) = die_attrs.next()? {
        if let Some(value) = convert_attribute(dwarf, unit, &attr) {
            attributes.insert(attr.name(), value);
        }
    }

    let mut children = Vec::new();
    let mut node_children = node.children();
    while let Some(child) = node_children.next()? {
        children.push(build_entry(dwarf, unit, child, unit_offset)?);
    }

    Ok(Entry::new(tag, offset, unit_offset, attributes, children))
}

fn convert_attribute(dwarf: &gimli::Dwarf<Reader>, unit: &gimli::Unit<Reader>, attr: &gimli::Attribute<Reader>) -> Option<AttributeValue> {
    use gimli::AttributeValue as V;

    Some(match attr.value() {
        V::Addr(a) => AttributeValue::Address(a),
        V::Udata(v) => AttributeValue::Unsigned(v),
        V::Data1(v) => AttributeValue::Unsigned(v as u64),
        V::Data2(v) => AttributeValue::Unsigned(v as u64),
        V::Data4(v) => AttributeValue::Unsigned(v as u64),
        V::Data8(v) => AttributeValue::Unsigned(v),
        V::Sdata(v) => AttributeValue::Signed(v),
        V::Flag(v) => AttributeValue::Flag(v),
        V::Exprloc(expr) => AttributeValue::Exprloc(expr.0.to_slice().ok()?.to_vec()),
        V::UnitRef(offset) => AttributeValue::Reference { value: offset.0 as u64, unit_relative: true },
        V::DebugInfoRef(offset) => AttributeValue::Reference { value: offset.0 as u64, unit_relative: false },
        V::String(s) => AttributeValue::Text(s.to_string_lossy().into_owned()),
        V::DebugStrRef(offset) => {
            let s = dwarf.string(offset).ok()?;
            AttributeValue::Text(s.to_string_lossy().into_owned())
        }
        _ => {
            let _ = unit;
            return None;
        }
    })
}
