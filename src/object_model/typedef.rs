//! Typedef objects: a single reference, aliased to the declared name
//! (spec §3 "Typedef").

use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone)]
pub struct Typedef {
    pub die_offset: u64,
    pub alias: String,
    raw_ref: Option<u64>,
    pub target: Option<ObjectId>,
}

impl Typedef {
    pub fn new(die_offset: u64, alias: String, raw_ref: Option<u64>) -> Self {
        Self { die_offset, alias, raw_ref, target: None }
    }

    /// Resolves the reference against `lookup`. `None` means `void`, which
    /// is a legal typedef target (spec §3: "dependency = one element, or
    /// empty, meaning void").
    pub fn resolve(&mut self, lookup: impl Fn(u64) -> Option<ObjectId>) -> Result<Vec<ObjectId>, TranslateError> {
        match self.raw_ref {
            None => {
                self.target = None;
                Ok(vec![])
            }
            Some(offset) => {
                let id = lookup(offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
                self.target = Some(id);
                Ok(vec![id])
            }
        }
    }
}
