//! The `ProgramObject` graph: one tagged enum in place of the six-level
//! inheritance chain the original modelled this with (spec §9 "Deep variant
//! hierarchy"). Cross-references are `ObjectId` handles into a registry
//! arena, not owning references, so the cyclic parts of the graph (pointers)
//! never have to fight the borrow checker (spec §9 "Cycles via pointers").

pub mod aggregate;
pub mod array;
pub mod base;
pub mod enumeration;
pub mod function;
pub mod function_type;
pub mod modifier;
pub mod typedef;
pub mod variable;

use crate::error::TranslateError;

use aggregate::Aggregate;
use array::ArrayType;
use base::BaseType;
use function::Function;
use function_type::FunctionType;
use modifier::Modifier;
use typedef::Typedef;
use variable::Variable;

/// An index into a `Registry`'s object arena. Cheap to copy, stable for the
/// lifetime of one compilation unit's resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Constructed,
    Resolved,
    Emitted,
}

/// One node in the dependency graph. `kind` carries the variant-specific
/// data; `dependencies` and `state` are common to every kind (spec §4.7).
#[derive(Debug, Clone)]
pub struct ProgramObject {
    pub kind: ProgramObjectKind,
    dependencies: Vec<ObjectId>,
    state: Lifecycle,
}

#[derive(Debug, Clone)]
pub enum ProgramObjectKind {
    Base(BaseType),
    Typedef(Typedef),
    Modifier(Modifier),
    Enumeration(enumeration::Enumeration),
    Aggregate(Aggregate),
    Array(ArrayType),
    FunctionType(FunctionType),
    Variable(Variable),
    Function(Function),
}

impl ProgramObject {
    pub fn new(kind: ProgramObjectKind) -> Self {
        Self { kind, dependencies: Vec::new(), state: Lifecycle::Constructed }
    }

    pub fn die_offset(&self) -> u64 {
        match &self.kind {
            ProgramObjectKind::Base(b) => b.die_offset,
            ProgramObjectKind::Typedef(t) => t.die_offset,
            ProgramObjectKind::Modifier(m) => m.die_offset,
            ProgramObjectKind::Enumeration(e) => e.die_offset,
            ProgramObjectKind::Aggregate(a) => a.die_offset,
            ProgramObjectKind::Array(a) => a.die_offset,
            ProgramObjectKind::FunctionType(f) => f.die_offset,
            ProgramObjectKind::Variable(v) => v.die_offset,
            ProgramObjectKind::Function(f) => f.die_offset,
        }
    }

    /// The identifier other generated code refers to this object by. `None`
    /// for `Variable`/`Function`, which are consumed by the unit assembler's
    /// `Code` class construction rather than referenced as a type.
    pub fn alias(&self) -> Option<&str> {
        match &self.kind {
            ProgramObjectKind::Base(b) => Some(b.alias),
            ProgramObjectKind::Typedef(t) => Some(&t.alias),
            ProgramObjectKind::Modifier(m) => m.alias.as_deref(),
            ProgramObjectKind::Enumeration(e) => Some(&e.alias),
            ProgramObjectKind::Aggregate(a) => Some(&a.alias),
            ProgramObjectKind::Array(a) => a.alias.as_deref(),
            ProgramObjectKind::FunctionType(f) => Some(&f.alias),
            ProgramObjectKind::Variable(_) | ProgramObjectKind::Function(_) => None,
        }
    }

    pub fn dependencies(&self) -> &[ObjectId] {
        &self.dependencies
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, Lifecycle::Resolved | Lifecycle::Emitted)
    }

    pub fn mark_emitted(&mut self) -> Result<(), TranslateError> {
        if self.state != Lifecycle::Resolved {
            return Err(TranslateError::Internal(format!(
                "object at offset {:#x} emitted before resolution",
                self.die_offset()
            )));
        }
        self.state = Lifecycle::Emitted;
        Ok(())
    }

    /// Runs the variant's own resolve routine and records the resulting
    /// dependency list. `lookup` maps an absolute offset to an `ObjectId`;
    /// `size_of` and `alias_of` read another object's size/alias regardless
    /// of whether that object has itself finished resolving (see
    /// `Registry::size_of`).
    pub fn resolve(
        &mut self,
        lookup: impl Fn(u64) -> Option<ObjectId>,
        size_of: impl Fn(ObjectId) -> Option<u64>,
        alias_of: impl Fn(ObjectId) -> Option<String>,
    ) -> Result<(), TranslateError> {
        if self.state == Lifecycle::Emitted {
            return Err(TranslateError::Internal("resolve called on an emitted object".into()));
        }
        let deps = match &mut self.kind {
            ProgramObjectKind::Base(_) | ProgramObjectKind::Enumeration(_) => Vec::new(),
            ProgramObjectKind::Typedef(t) => t.resolve(lookup)?,
            ProgramObjectKind::Modifier(m) => m.resolve(lookup, size_of, alias_of)?,
            ProgramObjectKind::Aggregate(a) => a.resolve(lookup, alias_of)?,
            ProgramObjectKind::Array(a) => a.resolve(lookup, alias_of)?,
            ProgramObjectKind::FunctionType(f) => f.resolve(lookup)?,
            ProgramObjectKind::Variable(v) => v.resolve(lookup)?,
            ProgramObjectKind::Function(f) => f.resolve(lookup)?,
        };
        self.dependencies = deps;
        self.state = Lifecycle::Resolved;
        Ok(())
    }

    /// The object's own byte size, read from already-available construction
    /// data — never from a dependency's *resolved* state, so pointee sizing
    /// works regardless of resolution order (spec §4.4 pointer rule).
    pub fn own_byte_size(&self, size_of: impl Fn(ObjectId) -> Option<u64>) -> Option<u64> {
        match &self.kind {
            ProgramObjectKind::Base(b) => Some(b.bit_size / crate::constants::BITS_IN_BYTE),
            ProgramObjectKind::Enumeration(e) => Some(e.byte_size),
            ProgramObjectKind::Aggregate(a) => Some(a.byte_size),
            ProgramObjectKind::Modifier(m) if m.kind == modifier::ModifierKind::Pointer => {
                Some(crate::constants::MACHINE_POINTER_SIZE)
            }
            ProgramObjectKind::Modifier(m) => m.target.and_then(&size_of),
            ProgramObjectKind::Typedef(t) => t.target.and_then(&size_of),
            ProgramObjectKind::Array(a) => a.element.and_then(|e| size_of(e)).map(|elem| elem * a.count),
            _ => None,
        }
    }
}
