use super::values::{number_literal, regex_literal};
use crate::generator::{
  model::{GenSchema, SharedValidations},
  naming::identifiers::mangle_property_name,
};

/// Lines of a schema `check:` block.
#[derive(Debug, Default)]
pub(crate) struct CheckBlock {
  pub lines: Vec<String>,
  pub uses_regex: bool,
}

impl CheckBlock {
  pub(crate) fn for_attributes(attributes: &[&GenSchema]) -> Self {
    let mut block = Self::default();
    for attribute in attributes {
      block.add_attribute(attribute);
    }
    block
  }

  fn add_attribute(&mut self, attribute: &GenSchema) {
    let name = mangle_property_name(&attribute.name);
    if name.starts_with('"') {
      return;
    }
    let guard = if attribute.required {
      String::new()
    } else {
      format!(" if {name} is not None")
    };

    for check in self.value_checks(&name, &attribute.validations) {
      self.lines.push(format!("{check}{guard}"));
    }

    if let Some(items) = attribute.items.as_deref() {
      let element = self.value_checks("item", &items.validations);
      if !element.is_empty() {
        self
          .lines
          .push(format!("all item in {name} {{ {} }}{guard}", element.join(" and ")));
      }
    }
    if let Some(value) = attribute.additional_properties.as_deref() {
      let element = self.value_checks("value", &value.validations);
      if !element.is_empty() {
        self
          .lines
          .push(format!("all _, value in {name} {{ {} }}{guard}", element.join(" and ")));
      }
    }
  }

  /// Conditions on a single value. Enum values are carried by the type instead.
  fn value_checks(&mut self, subject: &str, v: &SharedValidations) -> Vec<String> {
    let mut checks = vec![];
    if let Some(max) = v.max_length {
      checks.push(format!("len({subject}) <= {max}"));
    }
    if let Some(min) = v.min_length {
      checks.push(format!("len({subject}) >= {min}"));
    }
    if let Some(pattern) = &v.pattern {
      self.uses_regex = true;
      checks.push(format!("regex.match({subject}, {})", regex_literal(pattern)));
    }
    if let Some(max) = v.maximum {
      let op = if v.exclusive_maximum { "<" } else { "<=" };
      checks.push(format!("{subject} {op} {}", number_literal(max)));
    }
    if let Some(min) = v.minimum {
      let op = if v.exclusive_minimum { ">" } else { ">=" };
      checks.push(format!("{subject} {op} {}", number_literal(min)));
    }
    if let Some(factor) = v.multiple_of
      && factor.fract() == 0.0
    {
      checks.push(format!("multiplyof(int({subject}), {})", number_literal(factor)));
    }
    if let Some(max) = v.max_items {
      checks.push(format!("len({subject}) <= {max}"));
    }
    if let Some(min) = v.min_items {
      checks.push(format!("len({subject}) >= {min}"));
    }
    if v.unique_items {
      checks.push(format!("isunique({subject})"));
    }
    checks
  }
}
