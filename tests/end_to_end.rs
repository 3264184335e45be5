//! End-to-end scenario 1 (single-unit minimal): a unit declaring
//! `int buffer[32];` and `int main(void);` emits one file whose `Code`
//! class wires up both handles at their DWARF addresses.

use std::collections::HashMap;

use dwarfbind::entry::{AttributeValue, Entry, UnnamedCounter};
use dwarfbind::location::Endianness;
use dwarfbind::{emit, unit};

fn attrs(pairs: Vec<(gimli::DwAt, AttributeValue)>) -> HashMap<gimli::DwAt, AttributeValue> {
    pairs.into_iter().collect()
}

fn build_root() -> Entry {
    let int_type = Entry::new(
        gimli::DW_TAG_base_type,
        0x10,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("int".into())),
            (gimli::DW_AT_byte_size, AttributeValue::Unsigned(4)),
        ]),
        vec![],
    );

    let subrange = Entry::new(
        gimli::DW_TAG_subrange_type,
        0x31,
        0,
        attrs(vec![(gimli::DW_AT_upper_bound, AttributeValue::Unsigned(31))]),
        vec![],
    );
    let array_type = Entry::new(
        gimli::DW_TAG_array_type,
        0x30,
        0,
        attrs(vec![(gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false })]),
        vec![subrange],
    );

    let buffer = Entry::new(
        gimli::DW_TAG_variable,
        0x40,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("buffer".into())),
            (gimli::DW_AT_external, AttributeValue::Flag(true)),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x30, unit_relative: false }),
            (gimli::DW_AT_location, AttributeValue::Exprloc(vec![0x03, 0xe0, 0x40, 0, 0, 0, 0, 0, 0])),
        ]),
        vec![],
    );

    let main_fn = Entry::new(
        gimli::DW_TAG_subprogram,
        0x50,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("main".into())),
            (gimli::DW_AT_low_pc, AttributeValue::Address(0x16b6)),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false }),
        ]),
        vec![],
    );

    Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("test_code.c".into()))]),
        vec![int_type, array_type, buffer, main_fn],
    )
}

#[test]
fn single_unit_minimal_matches_expected_code_class() {
    let root = build_root();
    let mut counter = UnnamedCounter::new();
    let file = unit::assemble_unit(&root, &mut counter, Endianness::Little).unwrap();

    assert_eq!(emit::output_filename(&file.source_name), "test_code_c.py");

    let text = emit::emit_file(&file).unwrap();
    assert!(text.contains("c_int_array = c_int * 32"));
    assert!(text.contains("self.buffer = Variable(0x40e0, c_int_array)"));
    assert!(text.contains("self.main = Function(0x16b6, [], c_int)"));
}

#[test]
fn anonymous_enums_get_distinct_synthesized_aliases() {
    let first = Entry::new(gimli::DW_TAG_enumeration_type, 0x10, 0, attrs(vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(4))]), vec![]);
    let second = Entry::new(gimli::DW_TAG_enumeration_type, 0x20, 0, attrs(vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(4))]), vec![]);
    let root = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("anon.c".into()))]),
        vec![first, second],
    );
    let mut counter = UnnamedCounter::new();
    let file = unit::assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
    let text = emit::emit_file(&file).unwrap();
    assert!(text.contains("Unnamed_type_0"));
    assert!(text.contains("Unnamed_type_1"));
}

/// Scenario 2: two units in one run share a single `UnnamedCounter`, the
/// way `main.rs::run` threads one counter across every unit it assembles.
/// Each unit gets its own file and its own registry; nothing about one
/// unit's anonymous types leaks into the other's output.
#[test]
fn two_units_share_a_counter_and_emit_independent_files() {
    let anon_a = Entry::new(gimli::DW_TAG_enumeration_type, 0x10, 0, attrs(vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(4))]), vec![]);
    let root_a = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("a.c".into()))]),
        vec![anon_a],
    );

    let anon_b = Entry::new(gimli::DW_TAG_enumeration_type, 0x10, 0, attrs(vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(4))]), vec![]);
    let root_b = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("b.c".into()))]),
        vec![anon_b],
    );

    let mut counter = UnnamedCounter::new();
    let file_a = unit::assemble_unit(&root_a, &mut counter, Endianness::Little).unwrap();
    let file_b = unit::assemble_unit(&root_b, &mut counter, Endianness::Little).unwrap();

    assert_eq!(emit::output_filename(&file_a.source_name), "a_c.py");
    assert_eq!(emit::output_filename(&file_b.source_name), "b_c.py");

    let text_a = emit::emit_file(&file_a).unwrap();
    let text_b = emit::emit_file(&file_b).unwrap();
    assert!(text_a.contains("Unnamed_type_0"));
    assert!(text_b.contains("Unnamed_type_1"), "counter must keep advancing across units, got: {text_b}");
}

/// Scenario 4: a struct containing a pointer to its own type. This is the
/// direct regression case for the resolver's fixed-point loop: the pointer
/// and the struct are both unresolved at the start of the same round, and
/// the pointer's `PointerClass(...)` alias must never be read back as an
/// empty string.
#[test]
fn struct_with_self_referential_pointer_member_emits_pointer_class() {
    let node_ptr = Entry::new(
        gimli::DW_TAG_pointer_type,
        0x20,
        0,
        attrs(vec![(gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false })]),
        vec![],
    );

    let next_member = Entry::new(
        gimli::DW_TAG_member,
        0x11,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("next".into())),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x20, unit_relative: false }),
            (gimli::DW_AT_data_member_location, AttributeValue::Unsigned(8)),
        ]),
        vec![],
    );
    let node_struct = Entry::new(
        gimli::DW_TAG_structure_type,
        0x10,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("node".into())),
            (gimli::DW_AT_byte_size, AttributeValue::Unsigned(16)),
        ]),
        vec![next_member],
    );

    let root = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("node.c".into()))]),
        vec![node_ptr, node_struct],
    );

    let mut counter = UnnamedCounter::new();
    let file = unit::assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
    let text = emit::emit_file(&file).unwrap();

    assert!(text.contains("class node(Structure):"));
    assert!(text.contains("(\"next\", PointerClass(16)),"), "got: {text}");
    assert!(!text.contains("(\"next\", ),"), "member type alias must never be empty, got: {text}");
}

/// Scenario 5: a pointer with no `DW_AT_type` (a `void *`) reaches a global
/// variable through the full emit pipeline and uses the machine pointer
/// size, not whatever `DW_AT_byte_size` the entry itself happens to carry.
#[test]
fn void_pointer_variable_emits_machine_pointer_size() {
    let void_ptr = Entry::new(
        gimli::DW_TAG_pointer_type,
        0x10,
        0,
        attrs(vec![(gimli::DW_AT_byte_size, AttributeValue::Unsigned(8))]),
        vec![],
    );
    let global = Entry::new(
        gimli::DW_TAG_variable,
        0x20,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("ptr_global".into())),
            (gimli::DW_AT_external, AttributeValue::Flag(true)),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false }),
            (gimli::DW_AT_location, AttributeValue::Exprloc(vec![0x03, 0, 0x20, 0, 0, 0, 0, 0, 0])),
        ]),
        vec![],
    );
    let root = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("voidptr.c".into()))]),
        vec![void_ptr, global],
    );

    let mut counter = UnnamedCounter::new();
    let file = unit::assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
    let text = emit::emit_file(&file).unwrap();
    assert!(text.contains("self.ptr_global = Variable(0x2000, PointerClass(8))"), "got: {text}");
}

/// Scenario 6: a bitfield member in a struct, alongside a plain member, goes
/// through the full emit pipeline and keeps its 3-tuple `(name, type, bits)`
/// form without disturbing declaration order.
#[test]
fn bitfield_aggregate_emits_three_tuple_member() {
    let uint_type = Entry::new(
        gimli::DW_TAG_base_type,
        0x10,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("unsigned int".into())),
            (gimli::DW_AT_byte_size, AttributeValue::Unsigned(4)),
        ]),
        vec![],
    );

    let flags_member = Entry::new(
        gimli::DW_TAG_member,
        0x21,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("flags".into())),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false }),
            (gimli::DW_AT_bit_size, AttributeValue::Unsigned(3)),
            (gimli::DW_AT_data_bit_offset, AttributeValue::Unsigned(0)),
        ]),
        vec![],
    );
    let count_member = Entry::new(
        gimli::DW_TAG_member,
        0x22,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("count".into())),
            (gimli::DW_AT_type, AttributeValue::Reference { value: 0x10, unit_relative: false }),
            (gimli::DW_AT_data_member_location, AttributeValue::Unsigned(4)),
        ]),
        vec![],
    );
    let flags_struct = Entry::new(
        gimli::DW_TAG_structure_type,
        0x20,
        0,
        attrs(vec![
            (gimli::DW_AT_name, AttributeValue::Text("flags_t".into())),
            (gimli::DW_AT_byte_size, AttributeValue::Unsigned(8)),
        ]),
        vec![flags_member, count_member],
    );

    let root = Entry::new(
        gimli::DW_TAG_compile_unit,
        0,
        0,
        attrs(vec![(gimli::DW_AT_name, AttributeValue::Text("bitfield.c".into()))]),
        vec![uint_type, flags_struct],
    );

    let mut counter = UnnamedCounter::new();
    let file = unit::assemble_unit(&root, &mut counter, Endianness::Little).unwrap();
    let text = emit::emit_file(&file).unwrap();

    assert!(text.contains("(\"flags\", c_uint, 3),"), "got: {text}");
    let flags_pos = text.find("\"flags\"").unwrap();
    let count_pos = text.find("\"count\"").unwrap();
    assert!(flags_pos < count_pos, "declaration order must be preserved");
}
