use std::path::PathBuf;

use super::{
  model::{GenDefinition, ImportStmt},
  naming::identifiers::{sanitize_identifier, split_definition_name, to_file_name},
};

pub(crate) mod checks;
pub(crate) mod documentation;
pub(crate) mod schemas;
pub(crate) mod types;
pub(crate) mod values;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

use writer::KclWriter;

pub(crate) const GENERATED_HEADER: &str = r#""""
This file was generated by the KCL auto-gen tool. DO NOT EDIT.
Editing this file might prove futile when you re-run the KCL auto-gen generate command.
""""#;

const KCL_FILE_EXTENSION: &str = "k";

/// One KCL source file, with a path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
  pub path: PathBuf,
  pub content: String,
}

/// Renders a definition and the schemas hoisted out of it into a single file.
pub fn render_definition(definition: &GenDefinition) -> RenderedFile {
  let mut body = KclWriter::new();
  let mut uses_regex = schemas::write_definition(&mut body, &definition.schema);
  for extra in &definition.extra_schemas {
    body.blank();
    body.line("");
    uses_regex |= schemas::write_definition(&mut body, extra);
  }

  let mut file = KclWriter::new();
  file.line(GENERATED_HEADER);
  if uses_regex {
    file.line("import regex");
  }
  for import in &definition.imports {
    file.line(import_line(import));
  }

  let mut content = file.finish();
  content.push('\n');
  content.push_str(&body.finish());

  RenderedFile {
    path: output_path(definition),
    content,
  }
}

fn import_line(import: &ImportStmt) -> String {
  if import.must_as_name {
    format!("import {} as {}", import.import_path, import.as_name)
  } else {
    format!("import {}", import.import_path)
  }
}

/// `models.stable.example.com.v1` + `stable.example.com.v1.CronTab` -> `models/stable/example/com/v1/cron_tab.k`
pub fn output_path(definition: &GenDefinition) -> PathBuf {
  let mut path = definition
    .pkg
    .split('.')
    .filter(|segment| !segment.is_empty())
    .map(sanitize_identifier)
    .collect::<PathBuf>();
  let (_, short) = split_definition_name(&definition.schema.original_name);
  path.push(to_file_name(short));
  path.set_extension(KCL_FILE_EXTENSION);
  path
}
