//! Function signature types (`DW_TAG_subroutine_type`): spec §3 "Function
//! signature type". Alias is fixed at construction (`FunctionType_<offset>`);
//! only the dependency list is built at resolve time.

use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone)]
pub struct FunctionType {
    pub die_offset: u64,
    pub alias: String,
    raw_return_ref: Option<u64>,
    raw_param_refs: Vec<u64>,
    pub return_type: Option<ObjectId>,
    pub params: Vec<ObjectId>,
}

impl FunctionType {
    pub fn new(die_offset: u64, raw_return_ref: Option<u64>, raw_param_refs: Vec<u64>) -> Self {
        Self {
            die_offset,
            alias: format!("FunctionType_{die_offset:#x}"),
            raw_return_ref,
            raw_param_refs,
            return_type: None,
            params: Vec::new(),
        }
    }

    /// Dependencies are return type first, then arguments in declaration
    /// order (spec §4.4).
    pub fn resolve(&mut self, lookup: impl Fn(u64) -> Option<ObjectId>) -> Result<Vec<ObjectId>, TranslateError> {
        let mut dependencies = Vec::new();
        if let Some(offset) = self.raw_return_ref {
            let id = lookup(offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
            self.return_type = Some(id);
            dependencies.push(id);
        }
        for offset in &self.raw_param_refs {
            let id = lookup(*offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
            self.params.push(id);
            dependencies.push(id);
        }
        Ok(dependencies)
    }
}
