//! Topological code emitter (spec §4.6). Produces the text of one generated
//! source file per compilation unit: a fixed import preamble, a types
//! section ordered to satisfy the dependency DAG, and a `Code` class that
//! instantiates one handle per global variable and function.

use crate::constants::{size_class_alias, GENERATED_FILE_CTYPES_IMPORTS, OUTPUT_EXTENSION};
use crate::error::TranslateError;
use crate::object_model::{ObjectId, ProgramObjectKind};
use crate::unit::ProgramFile;

/// Derives the output filename for a unit: dots replaced with underscores,
/// the target extension appended (spec §4.6, §8 property 1).
pub fn output_filename(source_name: &str) -> String {
    format!("{}.{OUTPUT_EXTENSION}", source_name.replace('.', "_"))
}

pub fn emit_file(file: &ProgramFile) -> Result<String, TranslateError> {
    let mut out = String::new();
    emit_preamble(&mut out);
    emit_types(&mut out, file)?;
    emit_code_class(&mut out, file)?;
    Ok(out)
}

fn emit_preamble(out: &mut String) {
    let mut seen = std::collections::HashSet::new();
    let names: Vec<&str> = GENERATED_FILE_CTYPES_IMPORTS.iter().copied().filter(|n| seen.insert(*n)).collect();
    out.push_str(&format!("from ctypes import {}\n", names.join(", ")));
    out.push_str("from backend import Enum, PointerClass, Variable, Function, FunctionType, Void\n\n");
}

fn emit_types(out: &mut String, file: &ProgramFile) -> Result<(), TranslateError> {
    let mut emitted: std::collections::HashSet<ObjectId> = std::collections::HashSet::new();
    let mut remaining = Vec::new();

    for &id in &file.types {
        match &file.registry.get(id).kind {
            ProgramObjectKind::Base(_) => {
                emitted.insert(id);
            }
            ProgramObjectKind::Enumeration(e) => {
                emit_enumeration(out, e);
                emitted.insert(id);
            }
            _ => remaining.push(id),
        }
    }

    while !remaining.is_empty() {
        let mut progressed = false;
        let mut still_remaining = Vec::new();
        for id in remaining {
            let deps = file.registry.get(id).dependencies();
            if deps.iter().all(|d| emitted.contains(d)) {
                emit_one(out, file, id)?;
                emitted.insert(id);
                progressed = true;
            } else {
                still_remaining.push(id);
            }
        }
        if !progressed {
            let offset = still_remaining.first().map(|id| file.registry.get(*id).die_offset()).unwrap_or(0);
            return Err(TranslateError::NonResolvedReference(offset));
        }
        remaining = still_remaining;
    }

    Ok(())
}

fn emit_enumeration(out: &mut String, e: &crate::object_model::enumeration::Enumeration) {
    let storage = size_class_alias(e.byte_size).unwrap_or("c_int");
    let pairs: Vec<String> = e.enumerators.iter().map(|(name, value)| format!("(\"{name}\", {value})")).collect();
    out.push_str(&format!("{} = Enum(\"{}\", [{}], {storage})\n", e.alias, e.alias, pairs.join(", ")));
}

fn emit_one(out: &mut String, file: &ProgramFile, id: ObjectId) -> Result<(), TranslateError> {
    let alias_of = |dep: ObjectId| -> Result<String, TranslateError> {
        file.registry.alias_of(dep).ok_or(TranslateError::NonResolvedReference(file.registry.get(dep).die_offset()))
    };

    match &file.registry.get(id).kind {
        ProgramObjectKind::Typedef(t) => {
            let target = match t.target {
                Some(dep) => alias_of(dep)?,
                None => "Void".to_string(),
            };
            out.push_str(&format!("{} = {target}\n", t.alias));
        }
        ProgramObjectKind::Modifier(m) if m.kind != crate::object_model::modifier::ModifierKind::Pointer => {
            // const/volatile emit nothing themselves; every other object
            // already refers to them via their forwarded alias (spec §3).
            let _ = m;
        }
        ProgramObjectKind::Modifier(_) => {
            // pointers have no declaration either; their alias is the
            // `PointerClass(<size>)` expression computed at resolve time,
            // inlined wherever it's referenced.
        }
        ProgramObjectKind::Aggregate(a) => {
            let base_class = match a.kind {
                crate::object_model::aggregate::AggregateKind::Structure => "Structure",
                crate::object_model::aggregate::AggregateKind::Union => "Union",
            };
            out.push_str(&format!("class {}({base_class}):\n    _fields_ = [\n", a.alias));
            for member in &a.members {
                match member.bitfield {
                    Some((bit_size, _)) => {
                        out.push_str(&format!("        (\"{}\", {}, {bit_size}),\n", member.name, member.type_alias));
                    }
                    None => {
                        out.push_str(&format!("        (\"{}\", {}),\n", member.name, member.type_alias));
                    }
                }
            }
            out.push_str("    ]\n");
        }
        ProgramObjectKind::Array(a) => {
            let element_alias = match a.element {
                Some(dep) => alias_of(dep)?,
                None => "Void".to_string(),
            };
            let alias = a.alias.clone().ok_or(TranslateError::NonResolvedReference(a.die_offset))?;
            out.push_str(&format!("{alias} = {element_alias} * {}\n", a.count));
        }
        ProgramObjectKind::FunctionType(f) => {
            let return_alias = match f.return_type {
                Some(dep) => alias_of(dep)?,
                None => "Void".to_string(),
            };
            let mut param_aliases = Vec::with_capacity(f.params.len());
            for &p in &f.params {
                param_aliases.push(alias_of(p)?);
            }
            out.push_str(&format!("{} = FunctionType({return_alias}, [{}])\n", f.alias, param_aliases.join(", ")));
        }
        ProgramObjectKind::Base(_) | ProgramObjectKind::Enumeration(_) | ProgramObjectKind::Variable(_) | ProgramObjectKind::Function(_) => {
            unreachable!("base types, enums, variables and functions are handled outside the topological sweep")
        }
    }
    Ok(())
}

fn emit_code_class(out: &mut String, file: &ProgramFile) -> Result<(), TranslateError> {
    out.push_str("\n\nclass Code:\n    def __init__(self):\n");
    if file.variables.is_empty() && file.functions.is_empty() {
        out.push_str("        pass\n");
        return Ok(());
    }
    for &id in &file.variables {
        if let ProgramObjectKind::Variable(v) = &file.registry.get(id).kind {
            let type_id = v.type_id.ok_or(TranslateError::NonResolvedReference(v.die_offset))?;
            let type_alias = file.registry.alias_of(type_id).ok_or(TranslateError::NonResolvedReference(v.die_offset))?;
            out.push_str(&format!("        self.{} = Variable({:#x}, {type_alias})\n", v.name, v.address));
        }
    }
    for &id in &file.functions {
        if let ProgramObjectKind::Function(f) = &file.registry.get(id).kind {
            let return_alias = match f.return_type {
                Some(dep) => file.registry.alias_of(dep).ok_or(TranslateError::NonResolvedReference(f.die_offset))?,
                None => "Void".to_string(),
            };
            let mut arg_aliases = Vec::with_capacity(f.params.len());
            for param in &f.params {
                match param {
                    crate::object_model::function::Param::Named { type_id, .. } => {
                        arg_aliases.push(file.registry.alias_of(*type_id).ok_or(TranslateError::NonResolvedReference(f.die_offset))?);
                    }
                    crate::object_model::function::Param::Variadic => arg_aliases.push("\"...\"".to_string()),
                }
            }
            out.push_str(&format!(
                "        self.{} = Function({:#x}, [{}], {return_alias})\n",
                f.name,
                f.low_pc,
                arg_aliases.join(", ")
            ));
        }
    }
    Ok(())
}
