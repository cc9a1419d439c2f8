pub(crate) mod arena;
pub(crate) mod builder;
pub mod codegen;
pub(crate) mod context;
pub(crate) mod definition;
pub mod discriminator;
pub mod errors;
pub(crate) mod formats;
pub(crate) mod graph;
pub(crate) mod imports;
pub mod metrics;
pub mod model;
pub(crate) mod naming;
pub mod options;
pub mod orchestrator;
pub(crate) mod type_resolver;

#[cfg(test)]
mod tests;
