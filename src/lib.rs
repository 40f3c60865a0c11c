//! clientgen
//!
//! Generates HTTP API client libraries and documentation from JSON hyper-schemas.
//! A schema is flattened into a template [`Context`](generation::Context), an
//! optional preprocessor may rewrite it, and a directory of Tera templates is
//! rendered into an output tree whose file names may contain `{key}` placeholders.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;
pub mod schema;

pub use crate::core::error::{Error, Result};
pub use generation::{Context, ContextPreprocessor, Generator, generate_client};
pub use schema::{Schema, load_schema};
