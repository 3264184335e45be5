//! Per-compilation-unit registry and two-phase resolver (spec §4.4).
//!
//! Resolution runs as a small fixed-point loop rather than a single pass:
//! an object's alias is only available once *its own* dependencies are
//! resolved (e.g. an array's alias needs its element's alias), so a few
//! objects may need more than one attempt. The absence of pointer edges from
//! the dependency graph (spec §9) guarantees this terminates within a number
//! of passes bounded by the DAG's depth.

use std::collections::HashMap;

use crate::error::TranslateError;
use crate::object_model::{ObjectId, ProgramObject};

pub struct Registry {
    objects: Vec<ProgramObject>,
    offset_to_id: HashMap<u64, ObjectId>,
}

impl Registry {
    pub fn new() -> Self {
        Self { objects: Vec::new(), offset_to_id: HashMap::new() }
    }

    /// Inserts a freshly constructed object, keyed by its originating
    /// entry's absolute offset. A duplicate offset is an internal invariant
    /// violation (spec §4.4 phase 1).
    pub fn insert(&mut self, offset: u64, object: ProgramObject) -> Result<ObjectId, TranslateError> {
        if self.offset_to_id.contains_key(&offset) {
            return Err(TranslateError::Internal(format!("duplicate object offset {offset:#x}")));
        }
        let id = ObjectId::new(self.objects.len() as u32);
        self.objects.push(object);
        self.offset_to_id.insert(offset, id);
        Ok(id)
    }

    pub fn lookup(&self, offset: u64) -> Option<ObjectId> {
        self.offset_to_id.get(&offset).copied()
    }

    pub fn get(&self, id: ObjectId) -> &ProgramObject {
        &self.objects[id.index()]
    }

    fn get_mut(&mut self, id: ObjectId) -> &mut ProgramObject {
        &mut self.objects[id.index()]
    }

    pub fn alias_of(&self, id: ObjectId) -> Option<String> {
        self.get(id).alias().map(str::to_string)
    }

    /// Recursively computes an object's own byte size from already-available
    /// construction data, independent of whether its dependencies have
    /// finished resolving (the pointee-sizing helper spec §4.4 needs).
    pub fn size_of(&self, id: ObjectId) -> Option<u64> {
        self.get(id).own_byte_size(|other| self.size_of(other))
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0..self.objects.len()).map(|i| ObjectId::new(i as u32))
    }

    /// Runs phase two for every object currently in the registry, retrying
    /// objects whose dependency alias wasn't available yet until the set
    /// stabilizes. Each round resolves against a snapshot of the previous
    /// round's aliases/sizes, so objects only need as many rounds as their
    /// dependency chain is deep.
    pub fn resolve_all(&mut self) -> Result<(), TranslateError> {
        let mut pending: Vec<ObjectId> = self.ids().filter(|id| !self.get(*id).is_resolved()).collect();
        let total = self.objects.len();
        for _ in 0..=total {
            if pending.is_empty() {
                return Ok(());
            }
            let offsets = self.offset_to_id.clone();
            let sizes: Vec<Option<u64>> = self.ids().map(|id| self.size_of(id)).collect();
            let aliases: Vec<Option<String>> = self.ids().map(|id| self.alias_of(id)).collect();

            let mut next_pending = Vec::new();
            for id in pending {
                let lookup = |offset: u64| offsets.get(&offset).copied();
                let size_of = |other: ObjectId| sizes[other.index()];
                let alias_of = |other: ObjectId| aliases[other.index()].clone();
                match self.get_mut(id).resolve(lookup, size_of, alias_of) {
                    Ok(()) => {}
                    Err(TranslateError::NonResolvedReference(_)) => next_pending.push(id),
                    Err(other) => return Err(other),
                }
            }
            pending = next_pending;
        }
        if let Some(id) = pending.into_iter().next() {
            return Err(TranslateError::NonResolvedReference(self.get(id).die_offset()));
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
