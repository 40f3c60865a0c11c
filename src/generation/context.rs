//! Render context and the value objects templates see for resources and links.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::core::utils::camel_case;
use crate::schema::Parameter;

/// The flat key/value data templates are rendered against.
///
/// Keys are kept in insertion order. Values are plain JSON, so anything a template
/// can reach is also reachable by path placeholders and preprocessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context(Map<String, JsonValue>);

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Check if a top-level key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, replacing any previous value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) {
        self.0.insert(key.into(), value);
    }

    /// Top-level keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a Tera context with the same top-level variables
    pub fn to_tera(&self) -> tera::Context {
        let mut tera_context = tera::Context::new();
        for (key, value) in &self.0 {
            tera_context.insert(key.as_str(), value);
        }
        tera_context
    }
}

impl From<Map<String, JsonValue>> for Context {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

/// Placeholder parameter appended to links that take a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyParameter;

impl BodyParameter {
    pub const NAME: &'static str = "body";
    pub const DESCRIPTION: &'static str = "the object to pass as the request payload";
}

impl From<BodyParameter> for Parameter {
    fn from(_: BodyParameter) -> Self {
        Parameter::new(BodyParameter::NAME, BodyParameter::DESCRIPTION)
    }
}

/// A resource as seen by templates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorResource {
    name: String,
    description: String,
    links: Vec<GeneratorLink>,
}

impl GeneratorResource {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        links: Vec<GeneratorLink>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            links,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn links(&self) -> &[GeneratorLink] {
        &self.links
    }

    /// The name of the resource class in generated code.
    pub fn class_name(&self) -> String {
        camel_case(&self.name)
    }
}

impl Serialize for GeneratorResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeneratorResource", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("class_name", &self.class_name())?;
        state.serialize_field("links", &self.links)?;
        state.end()
    }
}

/// A link (API operation) as seen by templates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorLink {
    name: String,
    method: String,
    path: String,
    description: String,
    parameters: Vec<Parameter>,
    takes_body: bool,
}

impl GeneratorLink {
    /// Build a link. The parameter list is copied from `parameters`; when
    /// `takes_body` is set the body parameter is appended as the last entry.
    pub fn new(
        name: &str,
        method: impl Into<String>,
        path: impl Into<String>,
        description: impl Into<String>,
        parameters: &[Parameter],
        takes_body: bool,
    ) -> Self {
        let mut parameters = parameters.to_vec();
        if takes_body {
            parameters.push(BodyParameter.into());
        }

        Self {
            name: name.replace(['(', ')'], ""),
            method: method.into(),
            path: path.into(),
            description: description.into(),
            parameters,
            takes_body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn takes_body(&self) -> bool {
        self.takes_body
    }

    /// Parameter names for a generated method signature, e.g. `"app_identity, body"`.
    pub fn parameter_names_string(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for GeneratorLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeneratorLink", 7)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("parameters", &self.parameters)?;
        state.serialize_field("takes_body", &self.takes_body)?;
        state.serialize_field("parameter_names_string", &self.parameter_names_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_appends_body_parameter_last() {
        let params = vec![Parameter::new("id", "identifier")];
        let link = GeneratorLink::new("update", "patch", "/apps/{id}", "", &params, true);

        let names: Vec<_> = link.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id", "body"]);
        assert_eq!(link.parameter_names_string(), "id, body");
        assert_eq!(
            link.parameters()[1].description,
            "the object to pass as the request payload"
        );
        // The caller's list is untouched
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_link_without_body_or_parameters() {
        let link = GeneratorLink::new("list", "get", "/apps", "List apps.", &[], false);
        assert!(link.parameters().is_empty());
        assert_eq!(link.parameter_names_string(), "");
    }

    #[test]
    fn test_link_strips_parentheses_from_name() {
        let link = GeneratorLink::new("info(deprecated)", "get", "/", "", &[], false);
        assert_eq!(link.name(), "infodeprecated");
    }

    #[test]
    fn test_resource_serializes_derived_fields() {
        let link = GeneratorLink::new(
            "create",
            "post",
            "/ssl-endpoints",
            "Create an endpoint.",
            &[],
            true,
        );
        let resource = GeneratorResource::new("ssl_endpoint", "An SSL endpoint.", vec![link]);

        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "name": "ssl_endpoint",
                "description": "An SSL endpoint.",
                "class_name": "SSLEndpoint",
                "links": [{
                    "name": "create",
                    "method": "post",
                    "path": "/ssl-endpoints",
                    "description": "Create an endpoint.",
                    "parameters": [{
                        "name": "body",
                        "description": "the object to pass as the request payload"
                    }],
                    "takes_body": true,
                    "parameter_names_string": "body"
                }]
            })
        );
    }

    #[test]
    fn test_context_serializes_as_plain_object_in_insertion_order() {
        let mut context = Context::new();
        context.insert("url", json!("https://api.example.com"));
        context.insert("description", json!("from options"));
        context.insert("description", json!("from schema"));

        assert_eq!(context.len(), 2);
        assert_eq!(
            serde_json::to_string(&context).unwrap(),
            r#"{"url":"https://api.example.com","description":"from schema"}"#
        );
    }

    #[test]
    fn test_context_to_tera_exposes_top_level_keys() {
        let mut context = Context::new();
        context.insert("name", json!("World"));
        let rendered = tera::Tera::one_off("Hello {{ name }}!", &context.to_tera(), false).unwrap();
        assert_eq!(rendered, "Hello World!");
    }
}
