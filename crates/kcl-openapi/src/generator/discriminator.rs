use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::naming::identifiers::mangle_model_name;
use crate::{swagger::schema::Schema, utils::refs};

/// A polymorphic base: a definition with a discriminator field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discriminator {
  pub field_name: String,
  pub kcl_type: String,
  pub json_name: String,
  pub children: Vec<Discriminated>,
}

/// A subtype that composes a polymorphic base through `allOf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discriminated {
  pub field_name: String,
  pub field_value: String,
  pub kcl_type: String,
  pub json_name: String,
  pub reference: String,
  pub parent_reference: String,
}

/// Bases and subtypes of a document, keyed by their `#/definitions/` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscriminatorInfo {
  pub discriminators: BTreeMap<String, Discriminator>,
  pub discriminated: BTreeMap<String, Discriminated>,
}

impl DiscriminatorInfo {
  /// Scans the definitions once. Candidates are visited by name, so the registered
  /// children and any discriminator value collisions resolve the same way on every run.
  pub fn analyze(definitions: &IndexMap<String, Schema>) -> Self {
    let mut names = definitions.keys().collect::<Vec<_>>();
    names.sort();

    let mut info = Self::default();
    for name in &names {
      let schema = &definitions[name.as_str()];
      let Some(field_name) = &schema.discriminator else {
        continue;
      };
      info.discriminators.insert(
        refs::definition_ref(name),
        Discriminator {
          field_name: field_name.clone(),
          kcl_type: type_name(name, schema),
          json_name: (*name).clone(),
          children: vec![],
        },
      );
    }

    for name in &names {
      let schema = &definitions[name.as_str()];
      for branch in &schema.all_of {
        let Some(parent_reference) = &branch.reference else {
          continue;
        };
        let Some(parent) = info.discriminators.get_mut(parent_reference) else {
          continue;
        };

        let child = Discriminated {
          field_name: parent.field_name.clone(),
          field_value: schema
            .hints
            .discriminator_value
            .clone()
            .unwrap_or_else(|| (*name).clone()),
          kcl_type: type_name(name, schema),
          json_name: (*name).clone(),
          reference: refs::definition_ref(name),
          parent_reference: parent_reference.clone(),
        };
        parent.children.push(child.clone());
        info.discriminated.insert(child.reference.clone(), child);
      }
    }

    info
  }

  pub fn is_base(&self, reference: &str) -> bool {
    self.discriminators.contains_key(reference)
  }

  pub fn is_subtype(&self, reference: &str) -> bool {
    self.discriminated.contains_key(reference)
  }
}

fn type_name(name: &str, schema: &Schema) -> String {
  mangle_model_name(&schema.kcl_name_or(name))
}
