//! Core building blocks shared by the schema and generation modules:
//! errors, configuration, template directory resolution and naming helpers.

pub mod config;
pub mod error;
pub mod templates;
pub mod utils;

pub use error::Error;
