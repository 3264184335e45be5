//! Structure and union types (spec §3 "Aggregate").

use crate::error::TranslateError;
use crate::object_model::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Structure,
    Union,
}

#[derive(Debug, Clone)]
pub struct RawMember {
    pub name: String,
    pub type_offset: u64,
    pub byte_offset: u64,
    pub bitfield: Option<(u64, u64)>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub type_alias: String,
    pub type_id: ObjectId,
    pub byte_offset: u64,
    pub bitfield: Option<(u64, u64)>,
}

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub die_offset: u64,
    pub kind: AggregateKind,
    pub alias: String,
    pub byte_size: u64,
    raw_members: Vec<RawMember>,
    pub members: Vec<Member>,
}

impl Aggregate {
    pub fn new(die_offset: u64, kind: AggregateKind, alias: String, byte_size: u64, raw_members: Vec<RawMember>) -> Self {
        Self { die_offset, kind, alias, byte_size, raw_members, members: Vec::new() }
    }

    /// Resolves every member's type reference in declaration order (spec §8
    /// property 3: member order must be preserved exactly).
    pub fn resolve(
        &mut self,
        lookup: impl Fn(u64) -> Option<ObjectId>,
        alias_of: impl Fn(ObjectId) -> Option<String>,
    ) -> Result<Vec<ObjectId>, TranslateError> {
        let mut dependencies = Vec::with_capacity(self.raw_members.len());
        for raw in &self.raw_members {
            let id = lookup(raw.type_offset).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
            let type_alias = alias_of(id).ok_or(TranslateError::NonResolvedReference(self.die_offset))?;
            dependencies.push(id);
            self.members.push(Member {
                name: raw.name.clone(),
                type_alias,
                type_id: id,
                byte_offset: raw.byte_offset,
                bitfield: raw.bitfield,
            });
        }
        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_resolve_in_declaration_order() {
        let raw = vec![
            RawMember { name: "a".into(), type_offset: 0x10, byte_offset: 0, bitfield: None },
            RawMember { name: "b".into(), type_offset: 0x20, byte_offset: 4, bitfield: Some((3, 0)) },
        ];
        let mut agg = Aggregate::new(0x1, AggregateKind::Structure, "S".into(), 8, raw);
        let int_id = ObjectId::new(0);
        let uint_id = ObjectId::new(1);
        agg.resolve(
            |off| match off {
                0x10 => Some(int_id),
                0x20 => Some(uint_id),
                _ => None,
            },
            |id| if id == int_id { Some("c_int".into()) } else { Some("c_uint".into()) },
        )
        .unwrap();
        assert_eq!(agg.members[0].name, "a");
        assert_eq!(agg.members[1].bitfield, Some((3, 0)));
    }
}
