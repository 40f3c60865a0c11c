//! Schema model consumed by the context builder.
//!
//! A [`Schema`] is an ordered list of [`Resource`]s, each with an ordered list of
//! [`Link`]s (API operations) whose [`Parameter`]s come from the references embedded
//! in the link's path template. The model is read-only once parsed; the generator
//! never mutates it.

pub mod loader;
pub mod parser;

pub use loader::load_schema;
pub use parser::SchemaParser;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Matches an embedded reference such as `{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fidentity)}`.
pub(crate) static HREF_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\([^)]+\)\}").expect("valid href reference pattern")
});

/// A parsed API schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Schema-level description
    pub description: String,
    /// Resources in document order
    pub resources: Vec<Resource>,
    /// The raw document the schema was parsed from
    pub document: JsonValue,
}

impl Schema {
    /// Serialize the raw schema document to a compact JSON string.
    pub fn to_json_string(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }
}

/// A resource (one `definitions` entry) of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub description: String,
    pub links: Vec<Link>,
}

/// One operation of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub name: String,
    /// Lowercased HTTP method, e.g. `get`
    pub method: String,
    /// Path template with embedded `{(...)}` references
    pub href: String,
    pub description: String,
    /// Path parameters, one per embedded reference, in href order
    pub parameters: Vec<Parameter>,
    /// Whether the link takes a request body
    pub needs_request_body: bool,
}

impl Link {
    /// Substitute each embedded reference in `href`, in order, with the matching
    /// entry of `params`. References beyond the end of `params` are left as-is.
    pub fn format_path<S: AsRef<str>>(&self, params: &[S]) -> String {
        let mut values = params.iter();
        HREF_REFERENCE
            .replace_all(&self.href, |caps: &regex::Captures<'_>| match values.next() {
                Some(value) => value.as_ref().to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// A path parameter of a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
