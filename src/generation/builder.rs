//! Builds the render context from a schema and caller options.

use serde_json::{Value as JsonValue, json};
use tracing::debug;

use super::context::{Context, GeneratorLink, GeneratorResource};
use crate::core::error::Result;
use crate::schema::{Link, Resource, Schema};

/// Context keys the builder always sets, overriding caller options.
pub const RESERVED_KEYS: [&str; 3] = ["description", "schema", "resources"];

/// Turns a [`Schema`] into a [`Context`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the context: caller `options` first, then `description`, `schema`
    /// (the document as a JSON string) and `resources`, which win on collision.
    pub fn build(&self, schema: &Schema, options: &Context) -> Result<Context> {
        let resources = self.build_resources(schema);

        for key in RESERVED_KEYS.iter().filter(|key| options.contains_key(key)) {
            debug!(key, "Caller option replaced by generated value");
        }

        let mut context = options.clone();
        context.insert("description", json!(schema.description));
        context.insert("schema", JsonValue::String(schema.to_json_string()?));
        context.insert("resources", serde_json::to_value(&resources)?);

        debug!(
            resources = resources.len(),
            keys = ?context.keys().collect::<Vec<_>>(),
            "Built generation context"
        );
        Ok(context)
    }

    /// Map every schema resource to its template-facing form, in schema order.
    pub fn build_resources(&self, schema: &Schema) -> Vec<GeneratorResource> {
        schema
            .resources
            .iter()
            .map(|resource| self.build_resource(resource))
            .collect()
    }

    fn build_resource(&self, resource: &Resource) -> GeneratorResource {
        let links = resource
            .links
            .iter()
            .map(|link| self.build_link(link))
            .collect();
        GeneratorResource::new(
            resource.name.replace('-', "_"),
            resource.description.as_str(),
            links,
        )
    }

    fn build_link(&self, link: &Link) -> GeneratorLink {
        let tokens: Vec<String> = link
            .parameters
            .iter()
            .map(|p| format!("{{{}}}", p.name))
            .collect();
        let path = link.format_path(&tokens);

        GeneratorLink::new(
            &link.name.replace('-', "_"),
            link.method.as_str(),
            path,
            link.description.as_str(),
            &link.parameters,
            link.needs_request_body,
        )
    }
}
