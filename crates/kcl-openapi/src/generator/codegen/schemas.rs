use std::collections::BTreeSet;

use super::{
  checks::CheckBlock,
  documentation::{summary, write_schema_docstring},
  types::{alias_target, attribute_type, is_type_alias, type_expression},
  values::{quote_string, to_kcl_value},
  writer::KclWriter,
};
use crate::generator::{
  formats::ANY_TYPE,
  model::{GenSchema, ResolvedType, parent_branch},
  naming::identifiers::mangle_property_name,
};

const REST_FIELD: &str = "rest";

/// Renders one generated definition, either a `type` alias or a `schema` block.
///
/// Returns true when the output calls into the `regex` module.
pub(crate) fn write_definition(w: &mut KclWriter, schema: &GenSchema) -> bool {
  let name = schema.escaped_name.as_str();
  if is_type_alias(schema, name) {
    write_type_alias(w, schema, name);
    return false;
  }
  write_schema(w, schema, name)
}

fn write_type_alias(w: &mut KclWriter, schema: &GenSchema, name: &str) {
  for line in summary(schema) {
    w.line(format!("# {line}").trim_end());
  }
  w.line(format!("type {name} = {}", alias_target(schema)));
}

fn write_schema(w: &mut KclWriter, schema: &GenSchema, name: &str) -> bool {
  let parent = parent_branch(schema);
  let header = match parent.map(|index| type_expression(&schema.all_of[index])) {
    Some(parent) => format!("schema {name}({parent}):"),
    None => format!("schema {name}:"),
  };
  let rest = rest_slot(schema);
  let mut attributes = collect_attributes(schema, parent);
  attributes.extend(rest.as_ref());

  w.line(header);
  let mut uses_regex = false;
  w.indented(|w| {
    write_schema_docstring(w, schema, name, &attributes);
    w.line("");

    if let (Some(field), Some(value)) = (&schema.discriminator_field, &schema.discriminator_value)
      && schema.is_sub_type
      && !attributes.iter().any(|a| &a.name == field)
    {
      w.line(format!("{}: str = {}", mangle_property_name(field), quote_string(value)));
    }

    if let Some(value_type) = index_signature(schema) {
      w.line(format!("[...str]: {value_type}"));
    }

    for attribute in &attributes {
      w.line(attribute_line(attribute));
    }

    let checks = CheckBlock::for_attributes(&attributes);
    if !checks.lines.is_empty() {
      w.line("");
      w.line("check:");
      w.indented(|w| {
        for line in &checks.lines {
          w.line(line);
        }
      });
    }
    uses_regex = checks.uses_regex;
  });
  uses_regex
}

/// Own properties, then properties of every composition branch except the inherited parent.
/// The first declaration of a name wins.
fn collect_attributes(schema: &GenSchema, parent: Option<usize>) -> Vec<&GenSchema> {
  let mut seen = BTreeSet::new();
  let branches = schema
    .all_of
    .iter()
    .enumerate()
    .filter(|(index, _)| Some(*index) != parent)
    .flat_map(|(_, branch)| branch.properties.iter());
  schema
    .properties
    .iter()
    .chain(branches)
    .filter(|p| seen.insert(p.name.as_str()))
    .collect()
}

/// Tuples that accept more items than they list get a trailing `rest` list holding them.
fn rest_slot(schema: &GenSchema) -> Option<GenSchema> {
  if !schema.resolved.is_tuple || !schema.has_additional_items {
    return None;
  }
  let items = schema.additional_items.as_deref().cloned().unwrap_or_default();
  let kcl_type = format!("[{}]", type_expression(&items));
  Some(GenSchema {
    name: REST_FIELD.to_string(),
    escaped_name: REST_FIELD.to_string(),
    description: Some("Items past the positional fields.".to_string()),
    position: schema.properties.len(),
    resolved: ResolvedType {
      is_array: true,
      kcl_type,
      ..Default::default()
    },
    items: Some(Box::new(items)),
    ..Default::default()
  })
}

fn index_signature(schema: &GenSchema) -> Option<String> {
  if schema.is_additional_properties {
    let value_type = schema
      .additional_properties
      .as_deref()
      .map_or_else(|| ANY_TYPE.to_string(), type_expression);
    return Some(value_type);
  }
  if schema.additional_properties_denied {
    return (!schema.strict_additional_properties).then(|| ANY_TYPE.to_string());
  }
  (schema.properties.is_empty() && schema.all_of.is_empty() && !schema.resolved.is_tuple).then(|| ANY_TYPE.to_string())
}

/// `name?: type = default`
fn attribute_line(attribute: &GenSchema) -> String {
  let marker = if attribute.required { "" } else { "?" };
  let mut line = format!(
    "{}{marker}: {}",
    mangle_property_name(&attribute.name),
    attribute_type(attribute)
  );
  if let Some(default) = &attribute.default {
    line.push_str(" = ");
    line.push_str(&to_kcl_value(default));
  }
  line
}
