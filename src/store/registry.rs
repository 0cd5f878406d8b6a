//! registry.rs
//! Hierarchical station names. Each prefix is one dotted component hanging off
//! its parent; the root has no name and is never printed.

use super::types::{PosId, PrefixId, StationId};
use serde::{Deserialize, Serialize};

const NO_LINK: u32 = u32::MAX;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    pub up: Option<PrefixId>,
    pub ident: String,
    pub pos: Option<PosId>,
    /// First graph station created for this name. Later stations produced by
    /// splitting share the name but are not recorded here.
    pub stn: Option<StationId>,
    /// Degree bookkeeping, bumped for every leg end at this name.
    pub shape: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixRegistry {
    pub prefixes: Vec<Prefix>,

    // Child lists (linked through siblings)
    first_child: Vec<u32>,
    next_sibling: Vec<u32>,
}

impl Default for PrefixRegistry {
    fn default() -> Self { Self::new() }
}

impl PrefixRegistry {
    pub fn new() -> Self {
        Self {
            prefixes: vec![Prefix::default()],
            first_child: vec![NO_LINK],
            next_sibling: vec![NO_LINK],
        }
    }

    pub fn root(&self) -> PrefixId { PrefixId(0) }
    pub fn count(&self) -> usize { self.prefixes.len() }

    #[inline(always)]
    pub fn get(&self, id: PrefixId) -> &Prefix { &self.prefixes[id.index()] }

    #[inline(always)]
    pub fn get_mut(&mut self, id: PrefixId) -> &mut Prefix { &mut self.prefixes[id.index()] }

    pub fn find_child(&self, parent: PrefixId, ident: &str) -> Option<PrefixId> {
        let mut link = self.first_child[parent.index()];
        while link != NO_LINK {
            if self.prefixes[link as usize].ident == ident {
                return Some(PrefixId(link));
            }
            link = self.next_sibling[link as usize];
        }
        None
    }

    pub fn find_or_insert_child(&mut self, parent: PrefixId, ident: &str) -> PrefixId {
        if let Some(found) = self.find_child(parent, ident) {
            return found;
        }
        let id = PrefixId::new(self.prefixes.len());
        self.prefixes.push(Prefix {
            up: Some(parent),
            ident: ident.to_string(),
            ..Default::default()
        });
        self.first_child.push(NO_LINK);
        self.next_sibling.push(self.first_child[parent.index()]);
        self.first_child[parent.index()] = id.0;
        id
    }

    /// Resolves a dotted name such as `"cave.entrance.1"` without creating it.
    pub fn lookup(&self, name: &str) -> Option<PrefixId> {
        components(name).try_fold(self.root(), |at, ident| self.find_child(at, ident))
    }

    pub fn find_or_insert(&mut self, name: &str) -> PrefixId {
        let mut at = self.root();
        for ident in components(name) {
            at = self.find_or_insert_child(at, ident);
        }
        at
    }

    /// Renders the dotted name by walking the parent chain.
    pub fn format_name(&self, id: PrefixId) -> String {
        let mut out = String::new();
        self.format_into(id, &mut out);
        out
    }

    fn format_into(&self, id: PrefixId, out: &mut String) {
        let pfx = self.get(id);
        if let Some(up) = pfx.up {
            self.format_into(up, out);
            if self.get(up).up.is_some() {
                out.push('.');
            }
            out.push_str(&pfx.ident);
        }
    }

    /// Every prefix currently holding `pos`.
    pub fn holders_of(&self, pos: PosId) -> impl Iterator<Item = PrefixId> + '_ {
        self.prefixes
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.pos == Some(pos))
            .map(|(i, _)| PrefixId::new(i))
    }
}

fn components(name: &str) -> impl Iterator<Item = &str> + '_ {
    name.split('.').filter(|s| !s.is_empty())
}
