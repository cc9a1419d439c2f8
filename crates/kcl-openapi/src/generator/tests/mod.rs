mod arena;
mod type_resolver;

use serde_json::Value;

use super::arena::DefinitionArena;
use crate::tests::common::create_definitions;

pub(super) fn create_arena(definitions: Value) -> DefinitionArena {
  DefinitionArena::new(create_definitions(definitions))
}
