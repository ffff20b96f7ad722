//! Builders to construct loaders from configuration.

pub mod loader_builder;

pub use loader_builder::LoaderBuilder;
