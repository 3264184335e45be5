//! Classification tables and fixed name maps used throughout the translator.
//!
//! Tag classification reuses `gimli`'s `DwTag`/`DwForm`/`DwAt` constants directly
//! rather than re-encoding the DWARF constant tables ourselves.

/// Prefix applied to identifiers that would otherwise collide with a reserved
/// word in the generated source, or that already begin with a double
/// underscore.
pub const NORMALIZE_TOKEN: &str = "_normalize_";

/// Suffix used to recognize compilation-unit source filenames in the symbol
/// table correlation pass.
pub const SOURCE_FILE_SUFFIX: &str = ".c";

/// Canonical name of the symbol table section in the input binary.
pub const SYMBOL_TABLE_SECTION_NAME: &str = ".symtab";

/// File extension used for every emitted compilation-unit source file.
pub const OUTPUT_EXTENSION: &str = "py";

/// Fallback pointer size used when a pointer has no reference (`void *`) or
/// when its pointee has no computable size of its own.
pub const MACHINE_POINTER_SIZE: u64 = 8;

pub const BITS_IN_BYTE: u64 = 8;

/// Identifiers reserved by the target scripting language; colliding names are
/// run through [`normalize_name`].
pub const RESERVED_IDENTIFIERS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "True",
    "False", "None",
];

pub fn is_type_modifier_tag(tag: gimli::DwTag) -> bool {
    matches!(
        tag,
        gimli::DW_TAG_pointer_type | gimli::DW_TAG_const_type | gimli::DW_TAG_volatile_type
    )
}

pub fn is_collection_tag(tag: gimli::DwTag) -> bool {
    matches!(tag, gimli::DW_TAG_structure_type | gimli::DW_TAG_union_type)
}

pub fn is_type_tag(tag: gimli::DwTag) -> bool {
    is_type_modifier_tag(tag)
        || is_collection_tag(tag)
        || matches!(
            tag,
            gimli::DW_TAG_base_type
                | gimli::DW_TAG_typedef
                | gimli::DW_TAG_array_type
                | gimli::DW_TAG_enumeration_type
                | gimli::DW_TAG_subroutine_type
        )
}

pub fn is_function_tag(tag: gimli::DwTag) -> bool {
    tag == gimli::DW_TAG_subprogram
}

pub fn is_variable_tag(tag: gimli::DwTag) -> bool {
    tag == gimli::DW_TAG_variable
}

/// Reference-encoding forms whose value is relative to the enclosing
/// compilation unit's base offset, per spec §4.1 rule 4.
pub fn is_reference_form_with_offset(form: gimli::DwForm) -> bool {
    matches!(
        form,
        gimli::DW_FORM_ref1 | gimli::DW_FORM_ref2 | gimli::DW_FORM_ref4 | gimli::DW_FORM_ref8
    )
}

/// Maps a `DW_AT_name` base-type name to the ctypes alias used in generated
/// source. Returns `None` for names the translator doesn't recognize as a
/// primitive (those should not occur on a `DW_TAG_base_type` entry in
/// well-formed input).
pub fn primitive_alias(name: &str) -> Option<&'static str> {
    Some(match name {
        "_Bool" => "c_bool",
        "char" => "c_char",
        "signed char" => "c_char",
        "wchar_t" => "c_wchar",
        "unsigned char" => "c_ubyte",
        "short" => "c_short",
        "short int" => "c_short",
        "unsigned short" => "c_ushort",
        "short unsigned int" => "c_ushort",
        "int" => "c_int",
        "unsigned int" => "c_uint",
        "long" => "c_long",
        "long int" => "c_long",
        "unsigned long" => "c_ulong",
        "long unsigned int" => "c_ulong",
        "long long" => "c_longlong",
        "long long int" => "c_longlong",
        "long long unsigned int" => "c_ulonglong",
        "__int64" => "c_longlong",
        "unsigned long long" => "c_ulonglong",
        "unsigned long long int" => "c_ulonglong",
        "unsigned __int64" => "c_ulonglong",
        "size_t" => "c_size_t",
        "ssize_t" => "c_ssize_t",
        "float" => "c_float",
        "double" => "c_double",
        "long double" => "c_longdouble",
        _ => return None,
    })
}

/// Maps an enumeration's underlying byte size to its ctypes storage alias.
pub fn size_class_alias(byte_size: u64) -> Option<&'static str> {
    Some(match byte_size {
        1 => "c_ubyte",
        2 => "c_ushort",
        4 => "c_uint",
        8 => "c_ulonglong",
        _ => return None,
    })
}

/// Distinct ctypes names referenced by the fixed import preamble, in the
/// order the primitive map above lists them (duplicates included, matching
/// the single fixed import line every emitted file carries).
pub const GENERATED_FILE_CTYPES_IMPORTS: &[&str] = &[
    "c_bool",
    "c_char",
    "c_char",
    "c_wchar",
    "c_ubyte",
    "c_short",
    "c_short",
    "c_ushort",
    "c_ushort",
    "c_int",
    "c_uint",
    "c_long",
    "c_long",
    "c_ulong",
    "c_ulong",
    "c_longlong",
    "c_longlong",
    "c_ulonglong",
    "c_longlong",
    "c_ulonglong",
    "c_ulonglong",
    "c_ulonglong",
    "c_size_t",
    "c_ssize_t",
    "c_float",
    "c_double",
    "c_longdouble",
];

/// Applies the name-collision rule (spec §4.1 rule 3 / §3 invariant): a name
/// that starts with `__` or with the normalization token already, or that
/// collides with a reserved identifier, is prefixed with the normalization
/// token exactly once.
pub fn normalize_name(name: &str) -> String {
    if name.starts_with("__") || name.starts_with(NORMALIZE_TOKEN) || RESERVED_IDENTIFIERS.contains(&name) {
        format!("{NORMALIZE_TOKEN}{name}")
    } else {
        name.to_string()
    }
}
