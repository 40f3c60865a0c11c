//! JSON hyper-schema parser
//!
//! Turns a schema document into the [`Schema`] model:
//! - every entry of the top-level `definitions` object becomes a [`Resource`]
//! - every entry of a definition's `links` array becomes a [`Link`]
//! - every `{(<ref>)}` reference in a link's `href` becomes a [`Parameter`],
//!   named after the referenced resource and the dereferenced identity key
//!
//! Only `#/...` references inside the same document are resolved.

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use super::{HREF_REFERENCE, Link, Parameter, Resource, Schema};
use crate::core::error::{Error, Result};

/// Maximum number of `$ref` hops followed while dereferencing.
const MAX_REF_DEPTH: usize = 32;

/// Parser over a raw schema document
pub struct SchemaParser {
    /// The raw JSON value of the schema document
    pub json: JsonValue,
}

impl SchemaParser {
    /// Create a new parser from JSON content
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Parse the document into the schema model
    pub fn parse(&self) -> Result<Schema> {
        let root = self
            .json
            .as_object()
            .ok_or_else(|| Error::schema("schema document must be a JSON object"))?;

        let description = string_field(root, "description");

        let resources = match root.get("definitions") {
            Some(JsonValue::Object(definitions)) => definitions
                .iter()
                .map(|(name, definition)| self.parse_resource(name, definition))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::schema("'definitions' must be an object")),
            None => {
                warn!("Schema has no 'definitions'; no resources will be generated");
                Vec::new()
            }
        };

        debug!(resources = resources.len(), "Parsed schema");

        Ok(Schema {
            description,
            resources,
            document: self.json.clone(),
        })
    }

    fn parse_resource(&self, name: &str, definition: &JsonValue) -> Result<Resource> {
        let definition = definition
            .as_object()
            .ok_or_else(|| Error::schema(format!("definition '{name}' must be an object")))?;

        let links = match definition.get("links") {
            Some(JsonValue::Array(links)) => links
                .iter()
                .enumerate()
                .map(|(index, link)| self.parse_link(name, index, link))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(Error::schema(format!(
                    "'links' of definition '{name}' must be an array"
                )));
            }
            None => Vec::new(),
        };

        Ok(Resource {
            name: name.to_string(),
            description: string_field(definition, "description"),
            links,
        })
    }

    fn parse_link(&self, resource: &str, index: usize, link: &JsonValue) -> Result<Link> {
        let link = link.as_object().ok_or_else(|| {
            Error::schema(format!("link {index} of '{resource}' must be an object"))
        })?;

        let required = |key: &str| {
            link.get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::schema(format!("link {index} of '{resource}' has no '{key}'"))
                })
        };

        let title = required("title")?;
        let method = required("method")?;
        let href = required("href")?;
        let parameters = self.parameters_from_href(&href)?;

        Ok(Link {
            name: title.to_lowercase().replace(' ', "_"),
            method: method.to_lowercase(),
            href,
            description: string_field(link, "description"),
            parameters,
            needs_request_body: link.contains_key("schema"),
        })
    }

    /// Build one parameter per embedded reference in `href`, in order.
    fn parameters_from_href(&self, href: &str) -> Result<Vec<Parameter>> {
        HREF_REFERENCE
            .find_iter(href)
            .map(|found| self.parameter_for_reference(found.as_str()))
            .collect()
    }

    fn parameter_for_reference(&self, raw: &str) -> Result<Parameter> {
        let reference: String = raw
            .replace("%2F", "/")
            .replace("%23", "#")
            .chars()
            .filter(|c| !matches!(c, '{' | '(' | ')' | '}'))
            .collect();

        let resource_name = reference
            .rsplit("#/definitions/")
            .next()
            .and_then(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::schema(format!("reference '{reference}' names no resource")))?
            .replace('-', "_");

        let (key, value) = self.dereference(&reference)?;

        if let Some(choices) = value.get("anyOf").and_then(JsonValue::as_array) {
            let mut names = Vec::with_capacity(choices.len());
            let mut descriptions = Vec::with_capacity(choices.len());
            for choice in choices {
                let choice_ref = choice.get("$ref").and_then(JsonValue::as_str).ok_or_else(|| {
                    Error::schema(format!("anyOf entry of '{key}' has no '$ref'"))
                })?;
                names.push(last_segment(choice_ref).to_string());
                let (_, target) = self.dereference(choice_ref)?;
                descriptions.push(description_of(target));
            }
            return Ok(Parameter::new(
                format!("{resource_name}_{}", names.join("_or_")),
                descriptions.join(" or "),
            ));
        }

        Ok(Parameter::new(
            format!("{resource_name}_{}", last_segment(&key)),
            description_of(value),
        ))
    }

    /// Resolve a `#/...` reference, following `$ref` chains. Returns the final
    /// reference together with the value it points at.
    fn dereference<'a>(&'a self, reference: &str) -> Result<(String, &'a JsonValue)> {
        let mut current = reference.to_string();
        for _ in 0..MAX_REF_DEPTH {
            let pointer = current.strip_prefix('#').ok_or_else(|| {
                Error::schema(format!("only local references are supported: '{current}'"))
            })?;
            let value = self
                .json
                .pointer(pointer)
                .ok_or_else(|| Error::schema(format!("unresolvable reference '{current}'")))?;
            match value.get("$ref").and_then(JsonValue::as_str) {
                Some(next) => current = next.to_string(),
                None => return Ok((current, value)),
            }
        }
        Err(Error::schema(format!(
            "reference chain starting at '{reference}' is too deep"
        )))
    }
}

fn string_field(object: &Map<String, JsonValue>, key: &str) -> String {
    object
        .get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn description_of(value: &JsonValue) -> String {
    value
        .get("description")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
