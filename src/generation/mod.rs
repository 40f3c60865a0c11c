//! Generation domain module - turns a schema into a rendered client tree
//!
//! The pipeline is: [`ContextBuilder`] flattens the schema into a [`Context`], an
//! optional [`ContextPreprocessor`] replaces it, and the [`TemplateTreeRenderer`]
//! writes the output directory. [`Generator`] wires the steps together.

pub mod builder;
pub mod context;
pub mod filters;
pub mod generator;
pub mod placeholder;
pub mod preprocessor;
pub mod renderer;

pub use builder::*;
pub use context::*;
pub use generator::*;
pub use placeholder::*;
pub use preprocessor::*;
pub use renderer::*;
