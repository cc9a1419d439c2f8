use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap, visit::Dfs};

use crate::swagger::schema::{Schema, SchemaItems, SchemaOrBool};

/// Which definitions reference which, taken straight from the document's `$ref`s.
#[derive(Debug, Default)]
pub(crate) struct ReferenceGraph {
  dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl ReferenceGraph {
  pub(crate) fn new(definitions: &IndexMap<String, Schema>) -> Self {
    let dependencies = definitions
      .iter()
      .map(|(name, schema)| {
        let mut refs = BTreeSet::new();
        collect_refs(schema, &mut refs);
        refs.retain(|dep| definitions.contains_key(dep));
        (name.clone(), refs)
      })
      .collect();
    Self { dependencies }
  }

  fn graph(&self) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::<&str, ()>::new();
    for (node, deps) in &self.dependencies {
      graph.add_node(node.as_str());
      for dep in deps {
        graph.add_edge(node.as_str(), dep.as_str(), ());
      }
    }
    graph
  }

  /// Strongly connected groups of definitions that reference each other, including
  /// definitions that reference themselves. Each group is sorted by name.
  pub(crate) fn detect_cycles(&self) -> Vec<Vec<String>> {
    let graph = self.graph();
    let mut cycles = kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut names = scc.into_iter().map(String::from).collect::<Vec<_>>();
        names.sort();
        names
      })
      .collect::<Vec<_>>();
    cycles.sort();
    cycles
  }

  /// `roots` plus every definition reachable from them.
  pub(crate) fn closure<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let graph = self.graph();
    let mut expanded = BTreeSet::new();
    for root in roots {
      if !graph.contains_node(root) {
        continue;
      }
      let mut dfs = Dfs::new(&graph, root);
      while let Some(node) = dfs.next(&graph) {
        expanded.insert(node.to_string());
      }
    }
    expanded
  }
}

fn collect_refs(schema: &Schema, refs: &mut BTreeSet<String>) {
  if let Some(name) = schema.reference_name() {
    refs.insert(name.to_string());
  }
  for property in schema.properties.values() {
    collect_refs(property, refs);
  }
  for branch in &schema.all_of {
    collect_refs(branch, refs);
  }
  match &schema.items {
    Some(SchemaItems::Single(item)) => collect_refs(item, refs),
    Some(SchemaItems::Tuple(items)) => items.iter().for_each(|item| collect_refs(item, refs)),
    None => {}
  }
  for extra in [&schema.additional_properties, &schema.additional_items] {
    if let Some(SchemaOrBool::Schema(nested)) = extra {
      collect_refs(nested, refs);
    }
  }
}
