use crate::{
  generator::{
    model::TypeCategory,
    orchestrator::{DefinitionSummary, PolymorphicRole},
  },
  ui::{Colors, colors::Theme, commands::list::definitions_table},
};

#[test]
fn test_definitions_table() {
  let summaries = [
    DefinitionSummary {
      name: "Pet".to_string(),
      kcl_type: "Pet".to_string(),
      category: TypeCategory::ComplexObject,
      role: PolymorphicRole::Base,
      fields: 3,
      external: false,
    },
    DefinitionSummary {
      name: "Quantity".to_string(),
      kcl_type: "Quantity".to_string(),
      category: TypeCategory::Primitive,
      role: PolymorphicRole::None,
      fields: 0,
      external: true,
    },
  ];

  let rendered = definitions_table(&summaries, &Colors::new(false, Theme::Dark)).to_string();
  for expected in ["DEFINITION", "KCL TYPE", "CATEGORY", "ROLE", "FIELDS", "object", "base", "Quantity (external)"] {
    assert!(rendered.contains(expected), "missing {expected:?} in\n{rendered}");
  }
}
