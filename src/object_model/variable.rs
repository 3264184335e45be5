//! Global variables (spec §3 "Variable"). Construction rejects variables
//! that aren't externally visible or whose location isn't a plain absolute
//! address; the unit assembler treats that rejection as recoverable.

use crate::entry::Entry;
use crate::error::TranslateError;
use crate::location::{eval_address, Endianness};
use crate::object_model::ObjectId;

#[derive(Debug, Clone)]
pub struct Variable {
    pub die_offset: u64,
    pub name: String,
    raw_type_ref: u64,
    pub type_id: Option<ObjectId>,
    pub address: u64,
}

impl Variable {
    pub fn from_entry(entry: &Entry, endianness: Endianness) -> Result<Self, TranslateError> {
        if !entry.flag(gimli::DW_AT_external) {
            return Err(TranslateError::LocalVariable(entry.offset));
        }
        let raw_type_ref = entry.type_ref().ok_or(TranslateError::LocalVariable(entry.offset))?;
        let location = entry
            .exprloc(gimli::DW_AT_location)
            .ok_or(TranslateError::IncorrectLocationEncoding)?;
        let address = eval_address(location, endianness)?;
        let name = entry.name().ok_or(TranslateError::LocalVariable(entry.offset))?;
        Ok(Self { die_offset: entry.offset, name, raw_type_ref, type_id: None, address })
    }

    pub fn resolve(&mut self, lookup: impl Fn(u64) -> Option<ObjectId>) -> Result<Vec<ObjectId>, TranslateError> {
        let id = lookup(self.raw_type_ref).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
        self.type_id = Some(id);
        Ok(vec![id])
    }
}
