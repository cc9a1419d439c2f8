use std::collections::{BTreeMap, BTreeSet};

use super::{
  metrics::GenerationWarning,
  model::{GenSchema, ImportStmt, ResolvedType, parent_branch},
  naming::identifiers::{KCL_RESERVED_WORDS, capitalize, last_segment, sanitize_identifier},
};

const MANGLED_ALIAS_PREFIX: &str = "kclMangled";

/// Gathers the packages a generated file refers to and qualifies foreign type names
/// with their import alias.
pub(crate) struct ImportCollector<'a> {
  to_pkg: &'a str,
  /// Package path to import statement.
  imports: BTreeMap<String, ImportStmt>,
  /// Alias to the package path it was handed out for.
  aliases: BTreeMap<String, String>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> ImportCollector<'a> {
  pub(crate) fn new(to_pkg: &'a str) -> Self {
    Self {
      to_pkg,
      imports: BTreeMap::new(),
      aliases: BTreeMap::new(),
      warnings: vec![],
    }
  }

  /// Walks a schema tree, rewriting foreign type names to `alias.Type` and rebuilding
  /// container type expressions from their rewritten children.
  pub(crate) fn collect(&mut self, schema: &mut GenSchema) {
    if let Some(items) = schema.items.as_deref_mut() {
      self.collect(items);
      if schema.resolved.is_array && schema.resolved.pkg.is_empty() {
        schema.resolved.kcl_type = format!("[{}]", items.resolved.kcl_type);
      }
    }
    if let Some(items) = schema.additional_items.as_deref_mut() {
      self.collect(items);
    }
    for property in &mut schema.properties {
      self.collect(property);
    }
    if let Some(value) = schema.additional_properties.as_deref_mut() {
      self.collect(value);
      if schema.resolved.pkg.is_empty() && schema.resolved.kcl_type.starts_with("{str:") {
        schema.resolved.kcl_type = format!("{{str:{}}}", value.resolved.kcl_type);
      }
    }
    for branch in &mut schema.all_of {
      self.collect(branch);
    }
    self.qualify(&mut schema.resolved);
  }

  /// [`Self::collect`] limited to what a rendered schema spells out: of its composition
  /// branches only the parent's name and the properties of the others that are not
  /// already declared.
  pub(crate) fn collect_rendered(&mut self, schema: &mut GenSchema) {
    let parent = parent_branch(schema);
    let branches = std::mem::take(&mut schema.all_of);
    self.collect(schema);
    schema.all_of = branches;

    let mut seen = schema.properties.iter().map(|p| p.name.clone()).collect::<BTreeSet<_>>();
    for (index, branch) in schema.all_of.iter_mut().enumerate() {
      if Some(index) == parent {
        self.qualify(&mut branch.resolved);
        continue;
      }
      for property in &mut branch.properties {
        if seen.insert(property.name.clone()) {
          self.collect(property);
        }
      }
    }
  }

  fn qualify(&mut self, resolved: &mut ResolvedType) {
    if resolved.pkg.is_empty() || resolved.pkg == self.to_pkg {
      return;
    }
    let alias = self.alias_for(&resolved.pkg);
    resolved.pkg_alias.clone_from(&alias);
    resolved.kcl_type = format!("{alias}.{}", resolved.kcl_type);
  }

  fn alias_for(&mut self, pkg: &str) -> String {
    let import_path = inner_pkg(pkg, self.to_pkg);
    if let Some(stmt) = self.imports.get(&import_path) {
      return stmt.as_name.clone();
    }

    let alias = self.pick_alias(&import_path);
    self.aliases.insert(alias.clone(), import_path.clone());
    self.imports.insert(
      import_path.clone(),
      ImportStmt {
        must_as_name: alias != last_segment(&import_path),
        import_path,
        as_name: alias.clone(),
      },
    );
    alias
  }

  /// Tries `v1`, then `coreV1`, then `apiCoreV1`, ... and finally a numbered mangled name.
  fn pick_alias(&mut self, import_path: &str) -> String {
    let segments = import_path.split('.').map(sanitize_identifier).collect::<Vec<_>>();
    let mut candidate = String::new();
    for segment in segments.iter().rev() {
      candidate = if candidate.is_empty() {
        segment.clone()
      } else {
        format!("{segment}{}", capitalize(&candidate))
      };
      if self.is_free(&candidate) {
        return candidate;
      }
    }

    let base = format!(
      "{MANGLED_ALIAS_PREFIX}{}",
      capitalize(segments.last().map_or("", String::as_str))
    );
    let alias = (0..)
      .map(|i| if i == 0 { base.clone() } else { format!("{base}{i}") })
      .find(|candidate| self.is_free(candidate))
      .unwrap_or(base);
    self.warnings.push(GenerationWarning::ImportAliasMangled {
      package: import_path.to_string(),
      alias: alias.clone(),
    });
    alias
  }

  fn is_free(&self, alias: &str) -> bool {
    !alias.is_empty() && !KCL_RESERVED_WORDS.contains(alias) && !self.aliases.contains_key(alias)
  }

  /// Imports sorted by path, plus any alias warnings raised along the way.
  pub(crate) fn finish(self) -> (Vec<ImportStmt>, Vec<GenerationWarning>) {
    (self.imports.into_values().collect(), self.warnings)
  }
}

/// Import path of `pkg` as seen from `to_pkg`; a shared root package is implied.
pub(crate) fn inner_pkg(pkg: &str, to_pkg: &str) -> String {
  match (pkg.split_once('.'), to_pkg.split_once('.')) {
    (Some((root, rest)), Some((to_root, _))) if root == to_root => rest.to_string(),
    _ => pkg.to_string(),
  }
}
