use crate::generator::codegen::writer::KclWriter;

#[test]
fn test_indentation_and_blank_lines() {
  let mut w = KclWriter::new();
  w.blank();
  w.line("schema A:");
  w.indented(|w| {
    w.line("a: int");
    w.line("");
    w.indented(|w| w.line("nested"));
  });
  w.blank();
  w.blank();
  w.line("schema B:");
  w.blank();

  assert_eq!(w.finish(), "schema A:\n    a: int\n\n        nested\n\nschema B:\n");
}
