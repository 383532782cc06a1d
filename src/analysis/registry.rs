use crate::models::SymbolKind;
use std::collections::{BTreeSet, HashSet};

/// Which declarations a run will emit, known before emission starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    /// Records emitted under their native name
    pub records: BTreeSet<String>,
    /// Enums emitted under their native name
    pub enums: BTreeSet<String>,
    /// Typedefs emitted as wrapper structs or delegates
    pub aliases: BTreeSet<String>,
    /// Records and wrapper structs whose managed form holds no object
    /// reference, so they may overlap other union members
    pub blittable: BTreeSet<String>,
}

/// Names declared in the same C# scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The namespace: structs, enums, aliases and their delegates
    Types,
    /// The function container: imports and their parameter delegates
    Container,
}

/// Run-scoped record of emitted names.
///
/// Lookups used by the type mapper go to the index built by the dry run;
/// claims made while emitting are tracked separately, so the first
/// occurrence of a name wins no matter which file it comes from.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    index: SymbolIndex,
    discovered: SymbolIndex,
    types: HashSet<String>,
    container: HashSet<String>,
    emitted: HashSet<(SymbolKind, String)>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: SymbolIndex) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// What this run actually emitted, in index form
    pub fn into_discovered(self) -> SymbolIndex {
        self.discovered
    }

    pub fn has_record(&self, name: &str) -> bool {
        self.index.records.contains(name)
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.index.enums.contains(name)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.index.aliases.contains(name)
    }

    pub fn is_blittable(&self, name: &str) -> bool {
        self.index.blittable.contains(name)
    }

    /// Whether the native declaration `native` of `kind` was already emitted
    pub fn is_emitted(&self, kind: SymbolKind, native: &str) -> bool {
        self.emitted.contains(&(kind, native.to_string()))
    }

    pub fn mark_emitted(&mut self, kind: SymbolKind, native: &str) {
        self.emitted.insert((kind, native.to_string()));
    }

    pub fn is_claimed(&self, scope: Scope, name: &str) -> bool {
        match scope {
            Scope::Types => self.types.contains(name),
            Scope::Container => self.container.contains(name),
        }
    }

    /// First name in `names` that is already taken in `scope`
    pub fn first_conflict<'a>(&self, scope: Scope, names: &[&'a str]) -> Option<&'a str> {
        let mut seen = HashSet::new();
        names
            .iter()
            .copied()
            .find(|name| self.is_claimed(scope, name) || !seen.insert(*name))
    }

    /// Record an emitted name. Callers check [`Self::first_conflict`] first.
    pub fn claim(&mut self, scope: Scope, name: &str) {
        match scope {
            Scope::Types => self.types.insert(name.to_string()),
            Scope::Container => self.container.insert(name.to_string()),
        };
    }

    pub fn mark_record(&mut self, name: &str) {
        self.discovered.records.insert(name.to_string());
    }

    pub fn mark_enum(&mut self, name: &str) {
        self.discovered.enums.insert(name.to_string());
    }

    pub fn mark_alias(&mut self, name: &str) {
        self.discovered.aliases.insert(name.to_string());
    }

    pub fn mark_blittable(&mut self, name: &str) {
        self.discovered.blittable.insert(name.to_string());
    }
}
