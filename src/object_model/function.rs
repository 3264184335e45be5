//! Subprograms (spec §3 "Function"). Nested `DW_TAG_variable` children
//! (locals) are ignored; `DW_TAG_unspecified_parameters` becomes a single
//! variadic sentinel argument.

use crate::entry::Entry;
use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone)]
pub enum RawParam {
    Named { name: String, type_offset: u64 },
    Variadic,
}

#[derive(Debug, Clone)]
pub enum Param {
    Named { name: String, type_id: ObjectId },
    Variadic,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub die_offset: u64,
    pub name: String,
    raw_return_ref: Option<u64>,
    raw_params: Vec<RawParam>,
    pub return_type: Option<ObjectId>,
    pub params: Vec<Param>,
    pub low_pc: u64,
}

impl Function {
    pub fn from_entry(entry: &Entry) -> Result<Self, TranslateError> {
        let low_pc = entry.address(gimli::DW_AT_low_pc).ok_or(TranslateError::FunctionAddressMissing(entry.offset))?;
        let name = entry.name().unwrap_or_else(|| format!("FunctionType_{:#x}", entry.offset));
        let raw_return_ref = entry.type_ref();
        let raw_params = entry
            .children
            .iter()
            .filter_map(|child| match child.tag {
                gimli::DW_TAG_formal_parameter => {
                    let name = child.name().unwrap_or_default();
                    let type_offset = child.type_ref()?;
                    Some(RawParam::Named { name, type_offset })
                }
                gimli::DW_TAG_unspecified_parameters => Some(RawParam::Variadic),
                _ => None,
            })
            .collect();
        Ok(Self { die_offset: entry.offset, name, raw_return_ref, raw_params, return_type: None, params: Vec::new(), low_pc })
    }

    pub fn resolve(&mut self, lookup: impl Fn(u64) -> Option<ObjectId>) -> Result<Vec<ObjectId>, TranslateError> {
        let mut dependencies = Vec::new();
        if let Some(offset) = self.raw_return_ref {
            let id = lookup(offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
            self.return_type = Some(id);
            dependencies.push(id);
        }
        for raw in &self.raw_params {
            match raw {
                RawParam::Named { name, type_offset } => {
                    let id = lookup(*type_offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
                    dependencies.push(id);
                    self.params.push(Param::Named { name: name.clone(), type_id: id });
                }
                RawParam::Variadic => self.params.push(Param::Variadic),
            }
        }
        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AttributeValue;
    use std::collections::HashMap;

    #[test]
    fn function_without_low_pc_is_rejected() {
        let entry = Entry::new(gimli::DW_TAG_subprogram, 0x10, 0, HashMap::new(), vec![]);
        assert!(matches!(Function::from_entry(&entry), Err(TranslateError::FunctionAddressMissing(_))));
    }

    #[test]
    fn variadic_sentinel_is_preserved_as_single_param() {
        let mut attrs = HashMap::new();
        attrs.insert(gimli::DW_AT_low_pc, AttributeValue::Address(0x16b6));
        attrs.insert(gimli::DW_AT_name, AttributeValue::Text("printf".into()));
        let sentinel = Entry::new(gimli::DW_TAG_unspecified_parameters, 0x20, 0, HashMap::new(), vec![]);
        let entry = Entry::new(gimli::DW_TAG_subprogram, 0x10, 0, attrs, vec![sentinel]);
        let f = Function::from_entry(&entry).unwrap();
        assert_eq!(f.raw_params.len(), 1);
        assert!(matches!(f.raw_params[0], RawParam::Variadic));
    }
}
