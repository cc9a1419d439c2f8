use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::errors::{GenerationError, GenerationResult};
use crate::{swagger::schema::Schema, utils::refs};

/// The mutable set of named definitions for one generation run.
///
/// Starts as a copy of the document's definitions. Hoisting anonymous schemas only ever
/// inserts new names; nothing is removed or replaced.
#[derive(Debug, Clone, Default)]
pub struct DefinitionArena {
  definitions: IndexMap<String, Schema>,
  reserved: BTreeSet<String>,
  hoisted: Vec<String>,
}

impl DefinitionArena {
  pub fn new(definitions: IndexMap<String, Schema>) -> Self {
    Self {
      definitions,
      reserved: BTreeSet::new(),
      hoisted: vec![],
    }
  }

  /// Keeps `names` unavailable to [`Self::allocate_name`], e.g. names hoisted earlier in the run.
  pub fn with_reserved(mut self, names: impl IntoIterator<Item = String>) -> Self {
    self.reserved.extend(names);
    self
  }

  pub fn get(&self, name: &str) -> Option<&Schema> {
    self.definitions.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.definitions.contains_key(name) || self.reserved.contains(name)
  }

  /// True for names minted by [`Self::hoist`] during this run.
  pub fn is_hoisted(&self, name: &str) -> bool {
    self.hoisted.iter().any(|h| h == name)
  }

  pub fn hoisted(&self) -> &[String] {
    &self.hoisted
  }

  /// Reserves a name derived from `base` that no definition uses yet.
  ///
  /// `base` itself is returned when free, otherwise the first of `base1`, `base2`, ...
  pub fn allocate_name(&mut self, base: &str) -> String {
    let name = if self.contains(base) {
      (1..)
        .map(|i| format!("{base}{i}"))
        .find(|candidate| !self.contains(candidate))
        .unwrap_or_else(|| base.to_string())
    } else {
      base.to_string()
    };
    self.reserved.insert(name.clone());
    name
  }

  /// Adds a definition under a name obtained from [`Self::allocate_name`].
  pub fn insert(&mut self, name: String, schema: Schema) {
    debug_assert!(
      !self.definitions.contains_key(&name),
      "definition '{name}' inserted twice"
    );
    self.reserved.remove(&name);
    self.definitions.insert(name, schema);
  }

  /// Allocates a unique name for an anonymous schema and inserts it.
  pub fn hoist(&mut self, base: &str, schema: Schema) -> String {
    let name = self.allocate_name(base);
    self.insert(name.clone(), schema);
    self.hoisted.push(name.clone());
    name
  }

  /// Follows a chain of local references until a schema that is not itself a reference.
  pub fn resolve_ref(&self, reference: &str) -> GenerationResult<&Schema> {
    let mut visited = BTreeSet::new();
    let mut current = reference;
    loop {
      if !visited.insert(current) {
        return Err(GenerationError::CyclicReference {
          reference: reference.to_string(),
        });
      }
      let schema = self.lookup(current)?;
      match schema.reference.as_deref() {
        Some(next) => current = next,
        None => return Ok(schema),
      }
    }
  }

  /// The definition a reference points at directly, without following further references.
  pub fn lookup(&self, reference: &str) -> GenerationResult<&Schema> {
    if !refs::is_local_ref(reference) {
      return Err(GenerationError::RemoteReference {
        reference: reference.to_string(),
      });
    }
    refs::parse_definition_ref(reference)
      .and_then(|name| self.definitions.get(name))
      .ok_or_else(|| GenerationError::UnresolvedReference {
        reference: reference.to_string(),
      })
  }
}
