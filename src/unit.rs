//! Compilation-unit assembler (spec §4.5): classifies a unit's entries,
//! constructs objects, drives resolution, and packages the result.

use crate::entry::{Entry, UnnamedCounter};
use crate::error::TranslateError;
use crate::location::Endianness;
use crate::object_model::aggregate::{Aggregate, AggregateKind, RawMember};
use crate::object_model::array::ArrayType;
use crate::object_model::base::BaseType;
use crate::object_model::enumeration::Enumeration;
use crate::object_model::function::Function;
use crate::object_model::function_type::FunctionType;
use crate::object_model::modifier::{Modifier, ModifierKind};
use crate::object_model::typedef::Typedef;
use crate::object_model::variable::Variable;
use crate::object_model::{ObjectId, ProgramObject, ProgramObjectKind};
use crate::resolve::Registry;

/// One compilation unit's assembled, resolved object set, ready for
/// emission (spec §4.5 step 4).
pub struct ProgramFile {
    pub source_name: String,
    pub registry: Registry,
    pub types: Vec<ObjectId>,
    pub variables: Vec<ObjectId>,
    pub functions: Vec<ObjectId>,
}

/// Walks `root` (a `DW_TAG_compile_unit` entry) and produces a fully
/// resolved `ProgramFile`. `counter` is threaded in from the caller so the
/// `Unnamed_type_<n>` sequence is consistent across every unit in the run
/// (spec §9 redesign note).
pub fn assemble_unit(root: &Entry, counter: &mut UnnamedCounter, endianness: Endianness) -> Result<ProgramFile, TranslateError> {
    let source_name = root.name().unwrap_or_else(|| "unknown".to_string());
    let mut registry = Registry::new();
    let mut types = Vec::new();
    let mut variables = Vec::new();
    let mut functions = Vec::new();

    for entry in &root.children {
        match construct(entry, counter, endianness) {
            Ok(Some(Constructed::Type(obj))) => {
                let id = registry.insert(entry.offset, obj)?;
                types.push(id);
            }
            Ok(Some(Constructed::Variable(obj))) => {
                let id = registry.insert(entry.offset, obj)?;
                variables.push(id);
            }
            Ok(Some(Constructed::Function(obj))) => {
                let id = registry.insert(entry.offset, obj)?;
                functions.push(id);
            }
            Ok(None) => {
                log::warn!("entry at offset {:#x} with tag {:?} did not classify; skipped", entry.offset, entry.tag);
            }
            Err(err) if err.is_recoverable() => {
                log::debug!("skipping entry at offset {:#x}: {err}", entry.offset);
            }
            Err(err) => return Err(err),
        }
    }

    registry.resolve_all()?;

    Ok(ProgramFile { source_name, registry, types, variables, functions })
}

enum Constructed {
    Type(ProgramObject),
    Variable(ProgramObject),
    Function(ProgramObject),
}

fn construct(entry: &Entry, counter: &mut UnnamedCounter, endianness: Endianness) -> Result<Option<Constructed>, TranslateError> {
    use gimli::*;

    let obj = match entry.tag {
        DW_TAG_base_type => {
            let byte_size = entry.unsigned(DW_AT_byte_size);
            let bit_size = entry.unsigned(DW_AT_bit_size);
            match BaseType::from_entry(entry, byte_size, bit_size) {
                Some(base) => ProgramObjectKind::Base(base),
                None => return Ok(None),
            }
        }
        DW_TAG_typedef => {
            let alias = entry.name_or_synthesize(counter);
            ProgramObjectKind::Typedef(Typedef::new(entry.offset, alias, entry.type_ref()))
        }
        DW_TAG_pointer_type => {
            match Modifier::new(entry.offset, ModifierKind::Pointer, entry.type_ref(), entry.unsigned(DW_AT_byte_size)) {
                Some(m) => ProgramObjectKind::Modifier(m),
                None => return Err(TranslateError::ModifierTypeWithNoReference(entry.offset)),
            }
        }
        DW_TAG_const_type => {
            match Modifier::new(entry.offset, ModifierKind::Const, entry.type_ref(), entry.unsigned(DW_AT_byte_size)) {
                Some(m) => ProgramObjectKind::Modifier(m),
                None => return Err(TranslateError::ModifierTypeWithNoReference(entry.offset)),
            }
        }
        DW_TAG_volatile_type => {
            match Modifier::new(entry.offset, ModifierKind::Volatile, entry.type_ref(), entry.unsigned(DW_AT_byte_size)) {
                Some(m) => ProgramObjectKind::Modifier(m),
                None => return Err(TranslateError::ModifierTypeWithNoReference(entry.offset)),
            }
        }
        DW_TAG_enumeration_type => {
            let alias = entry.name_or_synthesize(counter);
            let byte_size = entry.unsigned(DW_AT_byte_size).unwrap_or(4);
            ProgramObjectKind::Enumeration(Enumeration::from_entry(entry, alias, byte_size))
        }
        DW_TAG_structure_type | DW_TAG_union_type => {
            let kind = if entry.tag == DW_TAG_structure_type { AggregateKind::Structure } else { AggregateKind::Union };
            let alias = entry.name_or_synthesize(counter);
            let byte_size = entry.unsigned(DW_AT_byte_size).unwrap_or(0);
            let members = aggregate_members(entry)?;
            ProgramObjectKind::Aggregate(Aggregate::new(entry.offset, kind, alias, byte_size, members))
        }
        DW_TAG_array_type => {
            let element = entry.type_ref().ok_or(TranslateError::UnexpectedChild(entry.offset, entry.tag))?;
            let count = array_count(entry);
            ProgramObjectKind::Array(ArrayType::new(entry.offset, element, count))
        }
        DW_TAG_subroutine_type => {
            let params = entry
                .children
                .iter()
                .filter(|c| c.tag == DW_TAG_formal_parameter)
                .filter_map(|c| c.type_ref())
                .collect();
            ProgramObjectKind::FunctionType(FunctionType::new(entry.offset, entry.type_ref(), params))
        }
        DW_TAG_variable => ProgramObjectKind::Variable(Variable::from_entry(entry, endianness)?),
        DW_TAG_subprogram => ProgramObjectKind::Function(Function::from_entry(entry)?),
        _ => return Ok(None),
    };

    let wrapped = match &obj {
        ProgramObjectKind::Variable(_) => Constructed::Variable(ProgramObject::new(obj)),
        ProgramObjectKind::Function(_) => Constructed::Function(ProgramObject::new(obj)),
        _ => Constructed::Type(ProgramObject::new(obj)),
    };
    Ok(Some(wrapped))
}

fn aggregate_members(entry: &Entry) -> Result<Vec<RawMember>, TranslateError> {
    let mut members = Vec::new();
    for child in &entry.children {
        if child.tag != gimli::DW_TAG_member {
            return Err(TranslateError::UnexpectedChild(entry.offset, child.tag));
        }
        let name = child.name().unwrap_or_default();
        let type_offset = child.type_ref().ok_or(TranslateError::UnexpectedChild(entry.offset, child.tag))?;
        let byte_offset = child.unsigned(gimli::DW_AT_data_member_location).unwrap_or(0);
        let bitfield = child.unsigned(gimli::DW_AT_bit_size).map(|bit_size| {
            let bit_offset = child.unsigned(gimli::DW_AT_data_bit_offset).unwrap_or(0);
            (bit_size, bit_offset)
        });
        members.push(RawMember { name, type_offset, byte_offset, bitfield });
    }
    Ok(members)
}

fn array_count(entry: &Entry) -> u64 {
    entry
        .children
        .iter()
        .find(|c| c.tag == gimli::DW_TAG_subrange_type)
        .and_then(|sub| {
            sub.unsigned(gimli::DW_AT_count)
                .or_else(|| sub.unsigned(gimli::DW_AT_upper_bound).map(|ub| ub + 1))
        })
        .unwrap_or(0)
}

/// Seeds a unit-name -> present-in-symtab map the way the top-level driver
/// does (spec §4.5): every global symbol ending in the recognized source
/// suffix becomes a candidate, then each unit's own filename is checked
/// against it. This is purely diagnostic — units and symbols that don't
/// cross-reference are still emitted/ignored respectively, never dropped.
pub fn correlate_symbols<'a>(units: &[ProgramFile], symbol_names: impl Iterator<Item = &'a str>) {
    use std::collections::HashSet;
    let candidates: HashSet<&str> = symbol_names.filter(|s| s.ends_with(crate::constants::SOURCE_FILE_SUFFIX)).collect();
    for unit in units {
        if candidates.contains(unit.source_name.as_str()) {
            log::debug!("unit {} correlated with a symbol table entry", unit.source_name);
        } else {
            log::debug!("unit {} has no matching symbol table entry", unit.source_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AttributeValue;
    use std::collections::HashMap;

    fn named(tag: gimli::DwTag, offset: u64, name: &str, attrs: Vec<(gimli::DwAt, AttributeValue)>, children: Vec<Entry>) -> Entry {
        let mut map: HashMap<gimli::DwAt, AttributeValue> = attrs.into_iter().collect();
        map.insert(gimli::DW_AT_name, AttributeValue::Text(name.to_string()));
        Entry::new(tag, offset, 0, map, children)
    }

    #[test]
    fn assembles_base_type_and_typedef() {
        let base = named(gimli::DW_TAG_base_type, 0x10, "int", vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(4))], vec![]);
        let typedef = named(
            gimli::DW_TAG_typedef,
            0x20,
            "myint",
            vec![(gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false })],
            vec![],
        );
        let root = Entry::new(gimli::DW_TAG_compile_unit, 0, 0, HashMap::new(), vec![base, typedef]);
        let mut counter = UnnamedCounter::new();
        let file = assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
        assert_eq!(file.types.len(), 2);
        let typedef_id = file.registry.lookup(0x20).unwrap();
        assert_eq!(file.registry.alias_of(typedef_id).as_deref(), Some("myint"));
    }

    #[test]
    fn skips_local_variable_without_failing_unit() {
        let local = Entry::new(gimli::DW_TAG_variable, 0x30, 0, HashMap::new(), vec![]);
        let root = Entry::new(gimli::DW_TAG_compile_unit, 0, 0, HashMap::new(), vec![local]);
        let mut counter = UnnamedCounter::new();
        let file = assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
        assert!(file.variables.is_empty());
    }
}
