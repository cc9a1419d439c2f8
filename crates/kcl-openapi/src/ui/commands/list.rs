use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use super::load_document;
use crate::{
  generator::{
    options::GenerateOptions,
    orchestrator::{DefinitionSummary, Orchestrator},
  },
  ui::{Colors, colors::IntoComfyColor, term_width},
};

pub async fn list_definitions(input: &Path, crd: bool, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(input, crd).await?;
  let orchestrator = Orchestrator::new(document, GenerateOptions::default())?;
  let summaries = orchestrator.summaries()?;
  println!("{}", definitions_table(&summaries, colors));
  Ok(())
}

pub(crate) fn definitions_table(summaries: &[DefinitionSummary], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["DEFINITION", "KCL TYPE", "CATEGORY", "ROLE", "FIELDS"] {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);

  for summary in summaries {
    let kcl_type = if summary.external {
      format!("{} (external)", summary.kcl_type)
    } else {
      summary.kcl_type.clone()
    };
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&summary.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(kcl_type).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(summary.category.to_string()).fg(IntoComfyColor::into(colors.accent())));
    row.add_cell(Cell::new(summary.role.to_string()).fg(IntoComfyColor::into(colors.info())));
    row.add_cell(
      Cell::new(summary.fields)
        .fg(IntoComfyColor::into(colors.value()))
        .set_alignment(CellAlignment::Right),
    );
    table.add_row(row);
  }
  table
}
