use std::collections::BTreeSet;

use super::{
  builder::SchemaBuilder,
  context::SchemaGenContext,
  discriminator::{Discriminated, Discriminator},
  errors::{GenerationError, GenerationResult},
  imports::ImportCollector,
  model::{GenDefinition, GenSchema, parent_branch},
  naming::identifiers::mangle_package_name,
  options::DEFAULT_MODEL_PACKAGE,
  type_resolver::TypeResolver,
};
use crate::{swagger::schema::Schema, utils::refs};

/// Builds the generation model of one top-level definition: its schema, the definitions
/// hoisted out of it, what it depends on and the imports its file needs.
pub(crate) fn make_gen_definition(builder: &mut SchemaBuilder<'_>, name: &str) -> GenerationResult<GenDefinition> {
  let schema = builder
    .arena()
    .get(name)
    .cloned()
    .ok_or_else(|| GenerationError::UnknownDefinition(name.to_string()))?;

  let mut ctx = SchemaGenContext::root(name, schema.clone(), name);
  builder.build(&mut ctx)?;

  let reference = refs::definition_ref(name);
  let discrimination = builder.discrimination();
  if let Some(base) = discrimination.discriminators.get(&reference) {
    mark_base(&mut ctx.gen_schema, name, base);
  }
  if let Some(subtype) = discrimination.discriminated.get(&reference) {
    expand_subtype(builder, &mut ctx.gen_schema, &schema, subtype)?;
  }
  inline_secondary_branches(builder, &mut ctx)?;

  let pkg = builder.options().package_of(name);
  let hoisted = builder.arena().hoisted();
  let depends_on = ctx
    .dependencies
    .iter()
    .filter(|dep| *dep != name && !hoisted.contains(*dep) && !ctx.extra_schemas.contains_key(*dep))
    .cloned()
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();

  let mut gen_schema = ctx.gen_schema;
  gen_schema.escaped_name = TypeResolver::new(builder.arena(), builder.options(), name).model_type_name();
  let mut extra_schemas = ctx.extra_schemas.into_values().collect::<Vec<_>>();
  let mut collector = ImportCollector::new(&pkg);
  collector.collect_rendered(&mut gen_schema);
  for extra in &mut extra_schemas {
    collector.collect_rendered(extra);
  }
  let (imports, warnings) = collector.finish();
  for warning in warnings {
    builder.warn(warning);
  }

  Ok(GenDefinition {
    package: mangle_package_name(&pkg, DEFAULT_MODEL_PACKAGE),
    pkg,
    schema: gen_schema,
    extra_schemas,
    depends_on,
    imports,
  })
}

fn mark_base(schema: &mut GenSchema, name: &str, base: &Discriminator) {
  schema.is_base_type = true;
  schema.is_exported = true;
  schema.discriminator_field = Some(base.field_name.clone());
  schema.discriminator_value = Some(name.to_string());
  schema.discriminates.insert(name.to_string(), base.kcl_type.clone());
  for child in &base.children {
    schema
      .discriminates
      .insert(child.field_value.clone(), child.kcl_type.clone());
  }
}

/// Replaces each polymorphic base branch with the base's full model and drops the
/// properties the subtype repeats from it.
fn expand_subtype(
  builder: &mut SchemaBuilder<'_>,
  gen_schema: &mut GenSchema,
  schema: &Schema,
  subtype: &Discriminated,
) -> GenerationResult<()> {
  gen_schema.discriminator_field = Some(subtype.field_name.clone());
  gen_schema.discriminator_value = Some(subtype.field_value.clone());
  gen_schema.is_sub_type = true;

  let mut known_properties = BTreeSet::new();
  for (index, branch) in schema.all_of.iter().enumerate() {
    let Some(reference) = &branch.reference else {
      continue;
    };
    let target = builder.arena().resolve_ref(reference)?.clone();
    if target.discriminator.is_none() {
      continue;
    }
    let Some(base_name) = refs::parse_definition_ref(reference) else {
      continue;
    };

    let mut base = build_hierarchy(builder, base_name, target, &gen_schema.name)?.gen_schema;
    if let Some(info) = builder.discrimination().discriminators.get(reference) {
      mark_base(&mut base, base_name, info);
    }
    base.is_base_type = true;
    base.reference = Some(base_name.to_string());
    if let Some(items) = base.additional_items.as_deref_mut() {
      items.is_base_type = true;
    }
    if let Some(value) = base.additional_properties.as_deref_mut() {
      value.is_base_type = true;
    }
    for property in &mut base.properties {
      property.is_base_type = true;
      known_properties.insert(property.name.clone());
    }
    if let Some(slot) = gen_schema.all_of.get_mut(index) {
      *slot = base;
    }
  }

  let mut seen = BTreeSet::new();
  for branch in &mut gen_schema.all_of {
    let from_base = branch.is_base_type;
    branch
      .properties
      .retain(|p| (from_base || !known_properties.contains(&p.name)) && seen.insert(p.name.clone()));
  }
  Ok(())
}

/// KCL schemas inherit from one parent only. Every other referenced composition branch
/// gets the target's properties so they can be declared inline, and the schemas hoisted
/// out of those properties are emitted alongside this definition.
fn inline_secondary_branches(builder: &mut SchemaBuilder<'_>, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
  let parent = parent_branch(&ctx.gen_schema);
  for index in 0..ctx.gen_schema.all_of.len() {
    let branch = &ctx.gen_schema.all_of[index];
    if Some(index) == parent || !branch.properties.is_empty() || !branch.resolved.is_complex_object {
      continue;
    }
    let Some(name) = branch.reference.clone() else {
      continue;
    };

    let target = builder.arena().resolve_ref(&refs::definition_ref(&name))?.clone();
    let expanded = build_hierarchy(builder, &name, target, &ctx.gen_schema.name)?;
    ctx.dependencies.extend(expanded.dependencies);
    ctx.extra_schemas.extend(expanded.extra_schemas);

    let mut properties = expanded.gen_schema.properties;
    properties.extend(expanded.gen_schema.all_of.into_iter().flat_map(|b| b.properties));
    ctx.gen_schema.all_of[index].properties = properties;
  }
  Ok(())
}

fn build_hierarchy(
  builder: &mut SchemaBuilder<'_>,
  name: &str,
  schema: Schema,
  container: &str,
) -> GenerationResult<SchemaGenContext> {
  let mut ctx = SchemaGenContext::root(name, schema, container);
  builder.build(&mut ctx)?;
  Ok(ctx)
}
