//! Array types: one bounded subrange over an element type (spec §3 "Array
//! type"). Alias is finalized at resolve time once the element's alias is
//! known.

use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub die_offset: u64,
    raw_element_ref: u64,
    pub count: u64,
    pub element: Option<ObjectId>,
    /// `None` until resolved — see `Modifier::alias` for why this can't
    /// default to an empty string.
    pub alias: Option<String>,
}

impl ArrayType {
    pub fn new(die_offset: u64, raw_element_ref: u64, count: u64) -> Self {
        Self { die_offset, raw_element_ref, count, element: None, alias: None }
    }

    pub fn resolve(
        &mut self,
        lookup: impl Fn(u64) -> Option<ObjectId>,
        alias_of: impl Fn(ObjectId) -> Option<String>,
    ) -> Result<Vec<ObjectId>, TranslateError> {
        let id = lookup(self.raw_element_ref).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
        let element_alias = alias_of(id).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
        self.element = Some(id);
        self.alias = Some(format!("{element_alias}_array"));
        Ok(vec![id])
    }
}
