//! Optional context rewriting before rendering.
//!
//! A preprocessor receives the built [`Context`] and returns a replacement. Callers
//! can inject any [`ContextPreprocessor`] (closures included). Template authors can
//! instead ship a `view_preprocessor.tera` file at the template root that defines
//! the macro `transform_context(context)`; the macro renders the new context as a
//! JSON object:
//!
//! ```text
//! {% macro transform_context(context) %}
//! {{ context | insert(key="generator", value="clientgen") | json_encode }}
//! {% endmacro transform_context %}
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tera::Tera;
use tracing::{debug, info};

use super::context::Context;
use super::filters::register_filters;
use crate::core::error::{Error, Result};

/// File name of the preprocessor within a template root
pub const PREPROCESSOR_FILENAME: &str = "view_preprocessor.tera";

/// Name of the template that invokes the preprocessor macro
const ENTRY_TEMPLATE: &str = "__transform_context__";

const ENTRY_SOURCE: &str = concat!(
    r#"{% import "view_preprocessor.tera" as preprocessor %}"#,
    "{{ preprocessor::transform_context(context=context) }}"
);

/// Macro the preprocessor file must define
const MACRO_NAME: &str = "transform_context";

/// Argument the context is passed through
const MACRO_ARGUMENT: &str = "context";

/// Rewrites a context before any file is rendered.
pub trait ContextPreprocessor {
    /// Consume the built context and return the one templates are rendered against.
    fn transform(&self, context: Context) -> Result<Context>;
}

impl<F> ContextPreprocessor for F
where
    F: Fn(Context) -> Result<Context>,
{
    fn transform(&self, context: Context) -> Result<Context> {
        self(context)
    }
}

/// Preprocessor backed by a `view_preprocessor.tera` macro file.
#[derive(Debug)]
pub struct TemplatePreprocessor {
    path: PathBuf,
    tera: Tera,
}

impl TemplatePreprocessor {
    /// Load the preprocessor file from `template_root`, if there is one.
    pub fn load(template_root: &Path) -> Result<Option<Self>> {
        let path = template_root.join(PREPROCESSOR_FILENAME);
        if !path.is_file() {
            debug!(path = %path.display(), "No preprocessor file");
            return Ok(None);
        }

        let source = std::fs::read_to_string(&path).map_err(|e| Error::io_at(&path, e))?;
        info!(path = %path.display(), "Loaded context preprocessor");
        Self::from_source(path, &source).map(Some)
    }

    /// Compile a preprocessor from its source text. `path` is used in errors.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();

        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_templates(vec![
            (PREPROCESSOR_FILENAME, source),
            (ENTRY_TEMPLATE, ENTRY_SOURCE),
        ])
        .map_err(|source| Error::Template {
            path: path.clone(),
            source,
        })?;

        if !defines_entry_macro(&tera) {
            return Err(contract_error(&path));
        }

        Ok(Self { path, tera })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContextPreprocessor for TemplatePreprocessor {
    fn transform(&self, context: Context) -> Result<Context> {
        let mut tera_context = tera::Context::new();
        tera_context.insert("context", &context);

        let rendered = self
            .tera
            .render(ENTRY_TEMPLATE, &tera_context)
            .map_err(|source| Error::Template {
                path: self.path.clone(),
                source,
            })?;

        match serde_json::from_str::<JsonValue>(rendered.trim()) {
            Ok(JsonValue::Object(map)) => Ok(Context::from(map)),
            _ => Err(contract_error(&self.path)),
        }
    }
}

/// The parsed file has `transform_context` taking `context`, and every other
/// argument has a default.
fn defines_entry_macro(tera: &Tera) -> bool {
    tera.get_template(PREPROCESSOR_FILENAME)
        .ok()
        .and_then(|template| template.macros.get(MACRO_NAME))
        .is_some_and(|definition| {
            definition.args.contains_key(MACRO_ARGUMENT)
                && definition
                    .args
                    .iter()
                    .all(|(name, default)| name == MACRO_ARGUMENT || default.is_some())
        })
}

fn contract_error(path: &Path) -> Error {
    Error::config(format!(
        "{} must define macro 'transform_context(context)' that renders the modified context as a JSON object",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const ADD_EXTRA: &str = r#"{% macro transform_context(context) %}
{{ context | insert(key="extra", value=1) | json_encode }}
{% endmacro transform_context %}"#;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("description", json!("Test API"));
        context
    }

    #[test]
    fn test_closure_preprocessor() {
        let preprocessor = |mut context: Context| -> Result<Context> {
            context.insert("extra", json!(1));
            Ok(context)
        };
        let context = preprocessor.transform(base_context()).unwrap();
        assert_eq!(context.get("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_template_preprocessor_adds_key() {
        let preprocessor = TemplatePreprocessor::from_source("view_preprocessor.tera", ADD_EXTRA)
            .unwrap();
        let context = preprocessor.transform(base_context()).unwrap();
        assert_eq!(context.get("extra"), Some(&json!(1)));
        assert_eq!(context.get("description"), Some(&json!("Test API")));
    }

    #[test]
    fn test_template_preprocessor_can_drop_keys() {
        let source = r#"{% macro transform_context(context) -%}
{{ context | remove(key="description") | json_encode }}
{%- endmacro transform_context %}"#;
        let preprocessor = TemplatePreprocessor::from_source("p.tera", source).unwrap();
        let context = preprocessor.transform(base_context()).unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn test_missing_macro_is_a_configuration_error() {
        let source = "{% macro something_else(context) %}{{ context | json_encode }}{% endmacro something_else %}";
        let err = TemplatePreprocessor::from_source("view_preprocessor.tera", source).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("transform_context(context)"));
    }

    #[test]
    fn test_commented_out_macro_is_a_configuration_error() {
        let source = "{# {% macro transform_context(context) %}{% endmacro transform_context %} #}";
        let err = TemplatePreprocessor::from_source("view_preprocessor.tera", source).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("transform_context(context)"));
    }

    #[test]
    fn test_macro_with_defaulted_arguments_is_accepted() {
        let source = r#"{% macro transform_context(context, extra=1) %}
{{ context | insert(key="extra", value=extra) | json_encode }}
{% endmacro transform_context %}"#;
        let preprocessor =
            TemplatePreprocessor::from_source("view_preprocessor.tera", source).unwrap();
        let context = preprocessor.transform(base_context()).unwrap();
        assert_eq!(context.get("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_macro_without_context_argument_is_a_configuration_error() {
        let source = "{% macro transform_context(data) %}{{ data | json_encode }}{% endmacro transform_context %}";
        let err = TemplatePreprocessor::from_source("view_preprocessor.tera", source).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_non_object_output_is_a_configuration_error() {
        let source = r#"{% macro transform_context(context) %}not json{% endmacro transform_context %}"#;
        let preprocessor = TemplatePreprocessor::from_source("p.tera", source).unwrap();
        let err = preprocessor.transform(base_context()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_returns_none_without_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(
            TemplatePreprocessor::load(temp_dir.path())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_load_reads_file_from_template_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(PREPROCESSOR_FILENAME), ADD_EXTRA).unwrap();

        let preprocessor = TemplatePreprocessor::load(temp_dir.path())
            .unwrap()
            .expect("preprocessor file present");
        assert_eq!(
            preprocessor.path(),
            temp_dir.path().join(PREPROCESSOR_FILENAME)
        );
    }
}
