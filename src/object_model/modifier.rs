//! Pointer, const and volatile modifiers (spec §3 "Modifier").
//!
//! Pointers deliberately carry an empty dependency list: their alias is the
//! `PointerClass(<size>)` factory expression, which only needs the pointee's
//! *size*, not its emitted declaration, so pointers can never contribute an
//! edge to a cycle (spec §9, §4.4).

use crate::constants::MACHINE_POINTER_SIZE;
use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Pointer,
    Const,
    Volatile,
}

#[derive(Debug, Clone)]
pub struct Modifier {
    pub die_offset: u64,
    pub kind: ModifierKind,
    raw_ref: Option<u64>,
    pub target: Option<ObjectId>,
    /// `None` until resolved. Distinct from "resolved to an empty alias",
    /// which never happens — this is what lets the registry's fixed-point
    /// loop tell "not yet resolved" apart from a real value (spec §4.4).
    pub alias: Option<String>,
}

impl Modifier {
    /// `byte_size` is the modifier entry's own `DW_AT_byte_size`. It plays no
    /// role in computing a pointer's emitted size (that's always the
    /// pointee's size or the machine pointer size, spec §4.4) — it only
    /// keeps the no-reference-no-size drop rule (spec §4.3) uniform across
    /// all three kinds, matching the original's shared base constructor.
    pub fn new(die_offset: u64, kind: ModifierKind, raw_ref: Option<u64>, byte_size: Option<u64>) -> Option<Self> {
        if raw_ref.is_none() && byte_size.is_none() {
            // modifier with no reference and no size (spec §4.3), dropped
            // rather than failing the unit.
            return None;
        }
        Some(Self { die_offset, kind, raw_ref, target: None, alias: None })
    }

    /// `size_of` resolves the pointee's byte size independent of whether the
    /// pointee itself has finished resolving (see `Registry::size_of`).
    pub fn resolve(
        &mut self,
        lookup: impl Fn(u64) -> Option<ObjectId>,
        size_of: impl Fn(ObjectId) -> Option<u64>,
        alias_of: impl Fn(ObjectId) -> Option<String>,
    ) -> Result<Vec<ObjectId>, TranslateError> {
        match self.kind {
            ModifierKind::Pointer => {
                let size = match self.raw_ref {
                    None => MACHINE_POINTER_SIZE,
                    Some(offset) => {
                        let id = lookup(offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
                        self.target = Some(id);
                        size_of(id).unwrap_or(MACHINE_POINTER_SIZE)
                    }
                };
                self.alias = Some(format!("PointerClass({size})"));
                Ok(vec![])
            }
            ModifierKind::Const | ModifierKind::Volatile => {
                let offset = self.raw_ref.ok_or(TranslateError::ModifierTypeWithNoReference(self.die_offset))?;
                let id = lookup(offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
                self.target = Some(id);
                self.alias = Some(alias_of(id).ok_or(TranslateError::NonResolvedReference(self.die_offset))?);
                Ok(vec![id])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_pointer_uses_machine_pointer_size() {
        let mut m = Modifier::new(0x10, ModifierKind::Pointer, None, None).unwrap();
        let deps = m.resolve(|_| None, |_| None, |_| None).unwrap();
        assert!(deps.is_empty());
        assert_eq!(m.alias.as_deref(), Some("PointerClass(8)"));
    }

    #[test]
    fn pointer_to_sized_type_uses_pointee_size() {
        let target = ObjectId::new(3);
        let mut m = Modifier::new(0x10, ModifierKind::Pointer, Some(0x20), None).unwrap();
        let deps = m.resolve(|off| if off == 0x20 { Some(target) } else { None }, |_| Some(4), |_| None).unwrap();
        assert!(deps.is_empty(), "pointers never declare dependencies");
        assert_eq!(m.alias.as_deref(), Some("PointerClass(4)"));
    }

    #[test]
    fn const_without_reference_is_dropped() {
        assert!(Modifier::new(0x10, ModifierKind::Const, None, None).is_none());
    }

    #[test]
    fn pointer_without_reference_or_size_is_dropped() {
        assert!(Modifier::new(0x10, ModifierKind::Pointer, None, None).is_none());
    }

    #[test]
    fn pointer_without_reference_is_kept_when_its_own_size_is_present() {
        let m = Modifier::new(0x10, ModifierKind::Pointer, None, Some(8)).unwrap();
        assert_eq!(m.raw_ref, None);
    }
}
