//! Placeholder resolution for output file and directory names.
//!
//! A name such as `{package_name}/{resource_name}.py` is resolved against the
//! top-level keys of a [`Context`]. `{{` and `}}` stand for literal braces.

use serde_json::Value as JsonValue;

use super::context::Context;
use crate::core::error::{Error, Result};

/// Resolve every `{key}` in `template` against `context`.
///
/// # Examples
/// ```
/// use clientgen::generation::{Context, resolve_placeholders};
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context.insert("resource_name", json!("pets"));
/// assert_eq!(
///     resolve_placeholders("{resource_name}/{{id}}.rb", &context).unwrap(),
///     "pets/{id}.rb"
/// );
/// ```
pub fn resolve_placeholders(template: &str, context: &Context) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|&(_, c)| c == '{').is_some() => output.push('{'),
            '}' if chars.next_if(|&(_, c)| c == '}').is_some() => output.push('}'),
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    key.push(c);
                }
                if !closed {
                    return Err(Error::placeholder(format!(
                        "unterminated placeholder at byte {start} in '{template}'"
                    )));
                }
                output.push_str(&lookup(&key, template, context)?);
            }
            '}' => {
                return Err(Error::placeholder(format!(
                    "unmatched '}}' at byte {start} in '{template}'"
                )));
            }
            c => output.push(c),
        }
    }

    Ok(output)
}

fn lookup(key: &str, template: &str, context: &Context) -> Result<String> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::placeholder(format!(
            "invalid placeholder key '{key}' in '{template}'"
        )));
    }

    match context.get(key) {
        None => Err(Error::UnresolvedPlaceholder {
            key: key.to_string(),
            path: template.to_string(),
        }),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(value @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Ok(value.to_string()),
        Some(other) => Err(Error::placeholder(format!(
            "context value '{key}' used in '{template}' is not a string, number or boolean: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Context {
        let mut context = Context::new();
        context.insert("resource_name", json!("pets"));
        context.insert("package_name", json!("petstore"));
        context.insert("version", json!(2));
        context.insert("beta", json!(true));
        context.insert("resources", json!([]));
        context
    }

    #[test]
    fn test_resolves_directory_placeholder() {
        assert_eq!(
            resolve_placeholders("{resource_name}", &context()).unwrap(),
            "pets"
        );
        assert_eq!(
            resolve_placeholders("lib/{package_name}/{resource_name}.py", &context()).unwrap(),
            "lib/petstore/pets.py"
        );
    }

    #[test]
    fn test_paths_without_placeholders_are_unchanged() {
        assert_eq!(
            resolve_placeholders("src/lib/client.rb", &context()).unwrap(),
            "src/lib/client.rb"
        );
        assert_eq!(resolve_placeholders("", &context()).unwrap(), "");
    }

    #[test]
    fn test_numbers_and_booleans_use_json_text() {
        assert_eq!(
            resolve_placeholders("v{version}-{beta}", &context()).unwrap(),
            "v2-true"
        );
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        assert_eq!(
            resolve_placeholders("{{resource_name}}", &context()).unwrap(),
            "{resource_name}"
        );
        assert_eq!(
            resolve_placeholders("a{{{package_name}}}b", &context()).unwrap(),
            "a{petstore}b"
        );
    }

    #[test]
    fn test_missing_key_is_unresolved() {
        let err = resolve_placeholders("{missing}/x", &context()).unwrap_err();
        match err {
            Error::UnresolvedPlaceholder { key, path } => {
                assert_eq!(key, "missing");
                assert_eq!(path, "{missing}/x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_placeholders_are_rejected() {
        for bad in ["{package_name", "oops}", "{}", "{bad key}"] {
            let err = resolve_placeholders(bad, &context()).unwrap_err();
            assert!(matches!(err, Error::Placeholder(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_structured_values_are_rejected() {
        let err = resolve_placeholders("{resources}", &context()).unwrap_err();
        assert!(matches!(err, Error::Placeholder(_)));
    }
}
