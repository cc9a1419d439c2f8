use super::{
  arena::DefinitionArena,
  context::SchemaGenContext,
  discriminator::DiscriminatorInfo,
  errors::{GenerationError, GenerationResult},
  metrics::GenerationWarning,
  model::{
    GenSchema, ResolvedType, SharedValidations, has_slice_validations, has_validations, order_value, prune_enum,
    sort_properties,
  },
  naming::identifiers::{mangle_model_name, pascalize},
  options::GenerateOptions,
  type_resolver::{SchemaAnalysis, TypeResolver},
};
use crate::{
  swagger::schema::{Schema, SchemaItems, SchemaOrBool},
  utils::refs,
};

/// Builds generation schemas for one run.
///
/// Holds what every context shares: the definitions arena, discriminator info and options.
/// Per-node state lives in [`SchemaGenContext`].
pub(crate) struct SchemaBuilder<'a> {
  arena: &'a mut DefinitionArena,
  discrimination: &'a DiscriminatorInfo,
  options: &'a GenerateOptions,
  warnings: Vec<GenerationWarning>,
}

impl<'a> SchemaBuilder<'a> {
  pub(crate) fn new(
    arena: &'a mut DefinitionArena,
    discrimination: &'a DiscriminatorInfo,
    options: &'a GenerateOptions,
  ) -> Self {
    Self {
      arena,
      discrimination,
      options,
      warnings: vec![],
    }
  }

  pub(crate) fn arena(&self) -> &DefinitionArena {
    &*self.arena
  }

  pub(crate) fn options(&self) -> &'a GenerateOptions {
    self.options
  }

  pub(crate) fn discrimination(&self) -> &'a DiscriminatorInfo {
    self.discrimination
  }

  pub(crate) fn warn(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub(crate) fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }

  fn resolver<'r>(&'r self, ctx: &'r SchemaGenContext) -> TypeResolver<'r> {
    TypeResolver::new(&*self.arena, self.options, &ctx.model_name).at(&ctx.path)
  }

  /// Builds `ctx.gen_schema` from `ctx.schema`, hoisting anonymous structures into the arena.
  pub(crate) fn build(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    self.populate(ctx)?;
    if let Some(name) = ctx.schema.reference_name() {
      ctx.dependencies.push(name.to_string());
    }

    if self.short_circuit_named_ref(ctx)? {
      return Ok(());
    }

    self.lift_special_all_of(ctx)?;
    if ctx.container.is_empty() {
      ctx.container.clone_from(&ctx.gen_schema.name);
    }
    self.build_all_of(ctx)?;

    let required = ctx.is_tuple || ctx.required || ctx.gen_schema.required;
    let resolved = self.resolver(ctx).resolve_schema(&ctx.schema, !ctx.named, required)?;
    ctx.gen_schema.is_base_type = resolved.is_base_type;
    ctx.gen_schema.resolved = resolved;

    self.build_additional_properties(ctx)?;
    if ctx.gen_schema.resolved.is_map && ctx.gen_schema.has_additional_properties {
      rewrite_value_expressions(&mut ctx.gen_schema);
    }

    // The additional properties pass may have rewritten the schema; resolve again for the
    // final type name but keep the structural flags it settled on.
    let settled = (
      ctx.gen_schema.resolved.is_complex_object,
      ctx.gen_schema.resolved.is_map,
    );
    let resolved = self
      .resolver(ctx)
      .resolve_schema(&ctx.schema, !ctx.named, ctx.named || ctx.is_tuple)?;
    ctx.gen_schema.is_base_type = resolved.has_discriminator;
    ctx.gen_schema.resolved = resolved;
    (
      ctx.gen_schema.resolved.is_complex_object,
      ctx.gen_schema.resolved.is_map,
    ) = settled;

    self.build_properties(ctx)?;
    self.build_additional_items(ctx)?;
    self.build_items(ctx)?;
    Ok(())
  }

  fn populate(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    let validations = self.schema_validations(ctx)?;
    let keep_order = self.options.keep_order;
    let schema = &ctx.schema;
    let gs = &mut ctx.gen_schema;

    gs.is_exported = true;
    gs.path.clone_from(&ctx.path);
    gs.index_var.clone_from(&ctx.index_var);
    gs.key_var.clone_from(&ctx.key_var);
    gs.value_expression.clone_from(&ctx.value_expr);
    gs.receiver_name.clone_from(&ctx.receiver);
    gs.reference = schema.reference_name().map(str::to_string);
    gs.original_name.clone_from(&ctx.name);
    gs.name.clone_from(&ctx.name);
    gs.escaped_name = mangle_model_name(&ctx.name);
    gs.title = schema.title.as_deref().map(trim_bom);
    gs.description = schema.description.as_deref().map(trim_bom);
    gs.validations = validations;
    gs.read_only = schema.read_only;
    gs.required = ctx.required;
    gs.is_virtual = ctx.is_virtual;
    gs.strict_additional_properties = self.options.strict_additional_properties;
    gs.default = schema.default.as_ref().map(|v| order_value(v, keep_order));
    gs.example = schema.example.as_ref().map(|v| order_value(v, keep_order));
    gs.extensions.clone_from(&schema.extensions);
    gs.order = schema.hints.order;
    Ok(())
  }

  fn schema_validations(&mut self, ctx: &SchemaGenContext) -> GenerationResult<SharedValidations> {
    let mut validations = SharedValidations::from_schema(&ctx.schema);
    if !validations.enum_values.is_empty() {
      let (kept, dropped_null) = prune_enum(&validations.enum_values, &ctx.path)?;
      if dropped_null {
        self.warn(GenerationWarning::NullEnumValue {
          path: ctx.path.clone(),
        });
      }
      validations.enum_values = kept;
      validations.refresh_flags();
    }
    Ok(validations)
  }

  /// Mints a named definition for an anonymous schema found under `ctx`.
  fn make_new_schema(&mut self, ctx: &SchemaGenContext, base: &str, schema: Schema) -> SchemaGenContext {
    let mut name = pascalize(base);
    if ctx.model_name != ctx.name {
      name = pascalize(&format!("{} {name}", ctx.model_name));
    }
    let name = self.arena.hoist(&name, schema.clone());
    ctx.hoisted(&name, schema)
  }

  /// A named definition that is nothing but a `$ref` becomes either an alias of the
  /// target or a single-branch composition. Returns true when it handled the context.
  fn short_circuit_named_ref(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<bool> {
    if !ctx.named || ctx.schema.reference.is_none() {
      return Ok(false);
    }

    let analysis = SchemaAnalysis::analyze(&ctx.schema, &*self.arena)?;
    if analysis.is_array || analysis.is_map || analysis.is_known_type || analysis.is_base_type {
      let target = self.resolver(ctx).resolve_schema(&ctx.schema, false, true)?;
      let mut alias = ctx.alias_of();
      self.build(&mut alias)?;
      ctx.merge_result(&alias, true);

      let mut gen_schema = alias.gen_schema;
      gen_schema.is_base_type = target.is_base_type;
      gen_schema.resolved = ResolvedType {
        is_array: analysis.is_array,
        is_map: analysis.is_map,
        is_primitive: analysis.is_known_type && !analysis.is_array && !analysis.is_map,
        is_complex_object: !(analysis.is_array || analysis.is_map || analysis.is_known_type),
        is_base_type: target.is_base_type,
        has_discriminator: target.has_discriminator,
        kcl_type: target.kcl_type,
        pkg: target.pkg,
        pkg_alias: target.pkg_alias,
        module: target.module,
        swagger_type: target.swagger_type,
        swagger_format: target.swagger_format,
        elem_type: target.elem_type,
        ..Default::default()
      };
      ctx.gen_schema = gen_schema;
      return Ok(true);
    }

    let kcl_type = self.resolver(ctx).model_type_name();
    let mut branch = ctx.new_composition_branch(ctx.schema.clone(), 0);
    self.build(&mut branch)?;
    ctx.gen_schema.resolved = ResolvedType {
      is_complex_object: true,
      kcl_type,
      swagger_type: "object".to_string(),
      ..Default::default()
    };
    ctx.merge_result(&branch, true);
    ctx.gen_schema.all_of.push(branch.gen_schema);
    Ok(true)
  }

  /// Collapses an `allOf` whose only substantive entry is a named object or a primitive
  /// into that entry.
  fn lift_special_all_of(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    if ctx.schema.all_of.len() < 2 {
      return Ok(());
    }

    let mut substantive = 0;
    let mut liftable = None;
    for branch in &ctx.schema.all_of {
      let is_substantive = !branch.schema_type.is_empty()
        || !branch.properties.is_empty()
        || branch.reference.is_some()
        || !branch.all_of.is_empty();
      if !is_substantive {
        continue;
      }
      substantive += 1;
      if substantive > 1 {
        return Ok(());
      }
      let resolved = self.resolver(ctx).resolve_schema(branch, true, true)?;
      if (!resolved.is_anonymous && resolved.is_complex_object) || resolved.is_primitive {
        liftable = Some(branch.clone());
      }
    }

    if let Some(schema) = liftable {
      if let Some(name) = schema.reference_name() {
        ctx.dependencies.push(name.to_string());
      }
      ctx.schema = schema;
    }
    Ok(())
  }

  fn build_all_of(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    if ctx.schema.all_of.is_empty() {
      return Ok(());
    }

    let (mut arrays, mut non_arrays) = (0_usize, 0_usize);
    let branches = ctx.schema.all_of.clone();
    for (index, branch) in branches.into_iter().enumerate() {
      let resolved = self
        .resolver(ctx)
        .resolve_schema(&branch, branch.reference.is_none(), false)?;
      if resolved.is_array {
        arrays += 1;
      } else {
        non_arrays += 1;
      }

      let nested_anonymous = resolved.is_anonymous && !branch.all_of.is_empty();
      let bare_scalar = branch.reference.is_none()
        && !resolved.is_complex_object
        && (resolved.is_array || resolved.is_primitive);

      if nested_anonymous || bare_scalar {
        let base = branch.kcl_name_or(format!("{}AllOf{index}", ctx.name));
        let mut hoisted = self.make_new_schema(ctx, &base, branch);
        self.build(&mut hoisted)?;

        let reference = Schema::reference_to(&hoisted.name);
        ctx.schema.all_of[index] = reference.clone();
        let mut composed = ctx.new_composition_branch(reference, index);
        self.build(&mut composed)?;
        composed.add_extra_schema(&hoisted);
        ctx.merge_result(&composed, true);
        ctx.gen_schema.all_of.push(composed.gen_schema);
        continue;
      }

      let mut composed = ctx.new_composition_branch(branch, index);
      self.build(&mut composed)?;
      if composed.gen_schema.resolved.is_map && composed.gen_schema.has_additional_properties {
        rewrite_value_expressions(&mut composed.gen_schema);
      }
      ctx.merge_result(&composed, true);
      ctx.gen_schema.all_of.push(composed.gen_schema);
    }

    if arrays > 1 || (arrays > 0 && non_arrays > 0) {
      self.warn(GenerationWarning::ConflictingArrayComposition {
        container: ctx.container.clone(),
      });
    }
    Ok(())
  }

  fn build_additional_properties(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    let Some(additional) = ctx.schema.additional_properties.clone() else {
      return Ok(());
    };
    ctx.gen_schema.additional_properties_denied = additional.is_denied();
    if !additional.is_enabled() {
      return Ok(());
    }
    ctx.gen_schema.has_additional_properties = true;

    let has_fields = ctx.gen_schema.resolved.is_complex_object;
    if has_fields {
      ctx.gen_schema.is_additional_properties = true;
      ctx.gen_schema.resolved.is_map = false;
    }

    let Some(value_schema) = additional.as_schema().cloned() else {
      if !has_fields {
        ctx.gen_schema.resolved.is_map = true;
      }
      let mut value = ctx.new_additional_property(Schema::typed("object"));
      self.build(&mut value)?;
      ctx.merge_result(&value, false);
      ctx.gen_schema.additional_properties = Some(Box::new(value.gen_schema));
      return Ok(());
    };

    if !has_fields {
      return self.build_map_stack(ctx, value_schema);
    }

    if !ctx.named {
      return self.hoist_extended_object(ctx);
    }

    // Declared properties plus an additional properties schema: the extras are a sibling
    // field store, not a map.
    let mut value_schema = value_schema;
    let resolved = self
      .resolver(ctx)
      .resolve_schema(&value_schema, value_schema.reference.is_none(), false)?;
    let mut hoisted_value = None;
    if resolved.is_complex_object && resolved.is_anonymous {
      let mut hoisted = self.make_new_schema(ctx, &format!("{} Anon", ctx.name), value_schema);
      self.build(&mut hoisted)?;
      value_schema = Schema::reference_to(&hoisted.name);
      ctx.schema.additional_properties = Some(SchemaOrBool::Schema(Box::new(value_schema.clone())));
      ctx.is_virtual = true;
      hoisted_value = Some(hoisted);
    }

    let analysis = SchemaAnalysis::analyze(&value_schema, &*self.arena)?;
    let mut value = ctx.new_additional_property(value_schema);
    value.required = !analysis.is_simple_schema && !analysis.is_map;
    self.build(&mut value)?;
    if let Some(hoisted) = &hoisted_value {
      value.add_extra_schema(hoisted);
    }
    value.gen_schema.value_expression = format!(
      "{}.{}[{}]",
      ctx.gen_schema.value_expression,
      pascalize(&ctx.gen_schema.name),
      value.key_var
    );
    ctx.gen_schema.value_expression = format!("{}.{}", ctx.gen_schema.value_expression, pascalize(&ctx.gen_schema.name));
    ctx.merge_result(&value, false);
    ctx.gen_schema.additional_properties = Some(Box::new(value.gen_schema));
    Ok(())
  }

  /// Builds `map of map of ... of T` without re-entering [`Self::build`] for every level:
  /// descend to the innermost value, build it, then assemble the levels on the way back up.
  fn build_map_stack(&mut self, ctx: &mut SchemaGenContext, value_schema: Schema) -> GenerationResult<()> {
    let mut levels: Vec<SchemaGenContext> = vec![];
    let mut value_schema = value_schema;

    let mut leaf = loop {
      let level = levels.last().unwrap_or(&*ctx).new_additional_property(value_schema);
      let resolved = self
        .resolver(&level)
        .resolve_schema(&level.schema, level.schema.reference.is_none(), false)?;

      let nested = match &level.schema.additional_properties {
        Some(SchemaOrBool::Schema(next)) if resolved.is_map && level.schema.reference.is_none() => Some((**next).clone()),
        _ => None,
      };
      match nested {
        Some(next) => {
          levels.push(level);
          value_schema = next;
        }
        None if resolved.is_complex_object && resolved.is_anonymous => {
          let mut level = level;
          let parent = levels.last().unwrap_or(&*ctx);
          let base = format!("{} Anon", parent.name);
          let mut hoisted = self.make_new_schema(parent, &base, level.schema.clone());
          self.build(&mut hoisted)?;
          level.schema = Schema::reference_to(&hoisted.name);
          level.add_extra_schema(&hoisted);
          break level;
        }
        None => break level,
      }
    };

    let analysis = SchemaAnalysis::analyze(&leaf.schema, &*self.arena)?;
    leaf.required = !analysis.is_simple_schema && !analysis.is_map;
    self.build(&mut leaf)?;

    let mut child = leaf;
    while let Some(mut level) = levels.pop() {
      level.schema.additional_properties = Some(SchemaOrBool::Schema(Box::new(child.schema.clone())));
      self.build_map_level(&mut level)?;
      level.merge_result(&child, false);
      level.gen_schema.additional_properties = Some(Box::new(child.gen_schema));
      child = level;
    }

    ctx.schema.additional_properties = Some(SchemaOrBool::Schema(Box::new(child.schema.clone())));
    ctx.merge_result(&child, false);
    ctx.gen_schema.additional_properties = Some(Box::new(child.gen_schema));
    Ok(())
  }

  /// An intermediate map level: it has no properties, items or composition of its own.
  fn build_map_level(&mut self, level: &mut SchemaGenContext) -> GenerationResult<()> {
    self.populate(level)?;
    let resolved = self.resolver(level).resolve_schema(&level.schema, true, level.required)?;
    level.gen_schema.resolved = resolved;
    level.gen_schema.has_additional_properties = true;
    Ok(())
  }

  /// An anonymous object with both properties and additional properties becomes a named
  /// definition; this context then refers to it.
  fn hoist_extended_object(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    let base = format!("{} P{}", ctx.gen_schema.name, ctx.index);
    let mut hoisted = self.make_new_schema(ctx, &base, ctx.schema.clone());
    self.build(&mut hoisted)?;

    ctx.schema = Schema::reference_to(&hoisted.name);
    ctx.gen_schema = GenSchema::default();
    self.build(ctx)?;
    ctx.add_extra_schema(&hoisted);
    Ok(())
  }

  fn build_properties(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    let properties = ctx.schema.properties.clone();
    for (position, (name, property)) in properties.into_iter().enumerate() {
      let required = ctx.is_tuple || ctx.schema.required.contains(&name);
      let resolved = self.resolver(ctx).resolve_schema(&property, true, required)?;

      let mut schema = property.clone();
      let hoistable = !property.properties.is_empty() || !property.all_of.is_empty();
      if resolved.is_complex_object && resolved.is_anonymous && hoistable {
        let base = property.kcl_name_or(format!("{}{}", ctx.name, pascalize(&name)));
        let mut hoisted = self.make_new_schema(ctx, &base, property.clone());
        hoisted.is_tuple = ctx.is_tuple;
        hoisted.path = format!("{}.\"{name}\"", ctx.path);
        self.build(&mut hoisted)?;
        if property.discriminator.is_some() {
          hoisted.gen_schema.is_base_type = true;
          hoisted.gen_schema.has_base_type = true;
        }
        schema = Schema::reference_to(&hoisted.name);
        ctx.add_extra_schema(&hoisted);
      }

      let mut prop = ctx.new_schema_branch(&name, schema);
      prop.required |= required;
      prop.is_tuple = ctx.is_tuple;
      self.build(&mut prop)?;

      if let Some(reference) = prop.schema.reference.clone() {
        self.decorate_reference_property(&mut prop, &reference)?;
      }
      if prop.gen_schema.is_base_type {
        ctx.gen_schema.has_base_type = true;
      }

      ctx.merge_result(&prop, false);
      prop.gen_schema.position = position;
      ctx.gen_schema.properties.push(prop.gen_schema);
    }

    sort_properties(&mut ctx.gen_schema.properties, self.options.keep_order);
    Ok(())
  }

  /// Carries polymorphism flags and validations of a referenced definition onto the property.
  fn decorate_reference_property(&mut self, prop: &mut SchemaGenContext, reference: &str) -> GenerationResult<()> {
    if self.discrimination.is_base(reference) {
      prop.gen_schema.is_base_type = true;
      prop.gen_schema.has_base_type = true;
    }
    if self.discrimination.is_subtype(reference) {
      prop.gen_schema.is_sub_type = true;
    }

    let target = self.arena.resolve_ref(reference)?;
    let model_name = refs::parse_definition_ref(reference).unwrap_or_default();
    TypeResolver::new(&*self.arena, self.options, model_name)
      .at(&prop.path)
      .resolve_schema(target, false, true)?;

    if has_validations(target) {
      let mut inherited = SharedValidations::from_schema(target);
      let (kept, _) = prune_enum(&inherited.enum_values, &prop.path)?;
      inherited.enum_values = kept;
      inherited.refresh_flags();
      prop.gen_schema.validations.inherit_from(&inherited);
    }
    Ok(())
  }

  fn build_items(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    match ctx.schema.items.clone() {
      None => Ok(()),
      Some(SchemaItems::Single(item)) => self.build_array(ctx, *item),
      Some(SchemaItems::Tuple(elements)) if ctx.named => self.build_tuple(ctx, elements),
      Some(SchemaItems::Tuple(elements)) => self.escape_anonymous_tuple(ctx, elements),
    }
  }

  fn build_array(&mut self, ctx: &mut SchemaGenContext, item: Schema) -> GenerationResult<()> {
    let resolved = self.resolver(ctx).resolve_schema(&item, true, false)?;
    if resolved.is_complex_object && resolved.is_anonymous {
      let base = item.kcl_name_or(format!("{} items{}", ctx.name, ctx.index));
      let mut hoisted = self.make_new_schema(ctx, &base, item);
      self.build(&mut hoisted)?;

      ctx.schema.items = Some(SchemaItems::Single(Box::new(Schema::reference_to(&hoisted.name))));
      ctx.is_virtual = true;
      ctx.gen_schema = GenSchema::default();
      self.build(ctx)?;
      ctx.add_extra_schema(&hoisted);
      return Ok(());
    }

    let mut element = ctx.new_array_branch(item, self.discrimination);
    self.build(&mut element)?;
    ctx.merge_result(&element, false);

    let element_has_validations = has_validations(&element.schema);
    let mut items = element.gen_schema;
    items.suffix = "Items".to_string();
    items.required = false;
    items.validations.has_validations |= element_has_validations;

    let gs = &mut ctx.gen_schema;
    gs.is_base_type = items.is_base_type;
    gs.items_enum.clone_from(&items.validations.enum_values);
    gs.resolved.kcl_type = format!("[{}]", items.resolved.kcl_type);
    gs.resolved.is_array = true;
    gs.validations.has_validations |= items.validations.has_validations;
    gs.validations.has_slice_validations = has_slice_validations(&ctx.schema);
    gs.items = Some(Box::new(items));
    Ok(())
  }

  fn build_tuple(&mut self, ctx: &mut SchemaGenContext, elements: Vec<Schema>) -> GenerationResult<()> {
    ctx.gen_schema.name.clone_from(&ctx.name);
    ctx.gen_schema.escaped_name = mangle_model_name(&ctx.name);
    ctx.gen_schema.resolved.kcl_type = self.resolver(ctx).model_type_name();
    ctx.gen_schema.resolved.is_tuple = true;

    for (index, element_schema) in elements.into_iter().enumerate() {
      let mut element = ctx.new_tuple_element(element_schema.clone(), index);
      if element_schema.reference.is_none() {
        let resolved = self.resolver(ctx).resolve_schema(&element_schema, true, true)?;
        if resolved.is_complex_object && resolved.is_anonymous {
          let base = element_schema.kcl_name_or(format!("{} Items{index}", ctx.name));
          let mut hoisted = self.make_new_schema(ctx, &base, element_schema);
          self.build(&mut hoisted)?;
          element.schema = Schema::reference_to(&hoisted.name);
          element.add_extra_schema(&hoisted);
        }
      }

      self.build(&mut element)?;
      ctx.merge_result(&element, false);
      element.gen_schema.name = format!("p{index}");
      element.gen_schema.escaped_name = format!("p{index}");
      element.gen_schema.position = index;
      ctx.gen_schema.properties.push(element.gen_schema);
    }
    Ok(())
  }

  /// Anonymous tuples never stay inline: they become a record with `p0`, `p1`, ... fields.
  fn escape_anonymous_tuple(&mut self, ctx: &mut SchemaGenContext, elements: Vec<Schema>) -> GenerationResult<()> {
    let mut record = Schema::typed("object");
    for (index, element) in elements.into_iter().enumerate() {
      let field = format!("p{index}");
      record.required.push(field.clone());
      record.properties.insert(field, element);
    }
    record.additional_items = ctx.schema.additional_items.clone();

    let base = format!("{}Tuple{}", ctx.gen_schema.name, ctx.index);
    let mut tuple = self.make_new_schema(ctx, &base, record);
    tuple.is_tuple = true;
    self.build(&mut tuple)?;
    tuple.gen_schema.resolved.is_tuple = true;
    tuple.gen_schema.resolved.is_complex_object = false;
    tuple.gen_schema.title = Some(format!("{} a representation of an anonymous Tuple type", tuple.name));
    tuple.gen_schema.description = None;

    ctx.schema = Schema::reference_to(&tuple.name);
    ctx.gen_schema = GenSchema::default();
    self.build(ctx)?;
    ctx.add_extra_schema(&tuple);
    Ok(())
  }

  fn build_additional_items(&mut self, ctx: &mut SchemaGenContext) -> GenerationResult<()> {
    let Some(additional) = ctx.schema.additional_items.clone() else {
      return Ok(());
    };
    if ctx.schema.single_items().is_some() && additional.is_enabled() {
      return Err(GenerationError::MixedItems { path: ctx.path.clone() });
    }

    ctx.gen_schema.has_additional_items = additional.is_enabled();
    if !additional.is_enabled() {
      return Ok(());
    }

    let mut value_schema = additional.as_schema().cloned();
    let resolved = self.resolver(ctx).resolve_optional(value_schema.as_ref(), true, true)?;

    let mut hoisted_items = None;
    if resolved.is_complex_object
      && resolved.is_anonymous
      && let Some(schema) = value_schema.take()
    {
      let base = schema.kcl_name_or(format!("{} Items", ctx.name));
      let mut hoisted = self.make_new_schema(ctx, &base, schema);
      self.build(&mut hoisted)?;
      let reference = Schema::reference_to(&hoisted.name);
      ctx.schema.additional_items = Some(SchemaOrBool::Schema(Box::new(reference.clone())));
      value_schema = Some(reference);
      hoisted_items = Some(hoisted);
    }

    let mut items = ctx.new_additional_items(value_schema.unwrap_or_default());
    if resolved.is_array {
      items.index_var.push('i');
    }
    self.build(&mut items)?;
    if let Some(hoisted) = &hoisted_items {
      items.add_extra_schema(hoisted);
    }
    ctx.merge_result(&items, true);
    ctx.gen_schema.additional_items = Some(Box::new(items.gen_schema));
    Ok(())
  }
}

/// Points each nested map value at its parent's value expression.
fn rewrite_value_expressions(schema: &mut GenSchema) {
  let parent = schema.value_expression.clone();
  if let Some(value) = schema.additional_properties.as_deref_mut() {
    value.value_expression = format!("{parent}[{}]", value.key_var);
    rewrite_value_expressions(value);
  }
}

fn trim_bom(text: &str) -> String {
  text.trim_start_matches('\u{feff}').to_string()
}
