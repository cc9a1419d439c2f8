use super::{types::attribute_type, values::to_kcl_value, writer::KclWriter};
use crate::generator::{model::GenSchema, naming::identifiers::mangle_property_name};

const DOCSTRING_OPEN: &str = "r\"\"\"";
const DOCSTRING_CLOSE: &str = "\"\"\"";

/// Free text of a schema: the description, else the title.
pub(crate) fn summary(schema: &GenSchema) -> Vec<String> {
  let text = schema
    .description
    .as_deref()
    .or(schema.title.as_deref())
    .map(str::trim)
    .filter(|t| !t.is_empty());
  match text {
    Some(text) => text.lines().map(|l| sanitize(l.trim_end())).collect(),
    None => vec![],
  }
}

/// Writes the schema docstring with its `Attributes` section.
pub(crate) fn write_schema_docstring(w: &mut KclWriter, schema: &GenSchema, name: &str, attributes: &[&GenSchema]) {
  w.line(DOCSTRING_OPEN);
  let lines = summary(schema);
  if lines.is_empty() {
    w.line(name);
  } else {
    for line in lines {
      w.line(line);
    }
  }

  if !attributes.is_empty() {
    w.line("");
    w.line("Attributes");
    w.line("----------");
    for attribute in attributes {
      w.line(attribute_summary(attribute));
      let description = summary(attribute);
      if !description.is_empty() {
        w.indented(|w| {
          for line in description {
            w.line(line);
          }
        });
      }
    }
  }
  w.line(DOCSTRING_CLOSE);
}

/// `name : type, default is value, required`
fn attribute_summary(attribute: &GenSchema) -> String {
  let mut parts = vec![format!(
    "{} : {}",
    mangle_property_name(&attribute.name),
    attribute_type(attribute)
  )];
  if let Some(default) = &attribute.default {
    parts.push(format!("default is {}", to_kcl_value(default)));
  }
  if attribute.read_only {
    parts.push("readOnly".to_string());
  }
  parts.push(if attribute.required { "required" } else { "optional" }.to_string());
  parts.join(", ")
}

fn sanitize(line: &str) -> String {
  line.replace(DOCSTRING_CLOSE, "'''")
}
