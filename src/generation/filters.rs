//! Tera filters available to every template and to the preprocessor file.

use std::collections::HashMap;

use tera::{Tera, Value};

use crate::core::utils::camel_case;

/// Register the generator's filters on a Tera instance.
///
/// - `camel_case`: `{{ resource.name | camel_case }}`
/// - `insert`: `{{ context | insert(key="extra", value=1) }}` returns a copy of an
///   object with one key set
/// - `remove`: `{{ context | remove(key="schema") }}` returns a copy without a key
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("camel_case", camel_case_filter);
    tera.register_filter("insert", insert_filter);
    tera.register_filter("remove", remove_filter);
}

fn camel_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("camel_case filter expects a string"))?;
    Ok(Value::String(camel_case(text)))
}

fn insert_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let mut object = value
        .as_object()
        .cloned()
        .ok_or_else(|| tera::Error::msg("insert filter expects an object"))?;
    let key = string_arg(args, "insert", "key")?;
    let inserted = args
        .get("value")
        .cloned()
        .ok_or_else(|| tera::Error::msg("insert filter requires a `value` argument"))?;
    object.insert(key, inserted);
    Ok(Value::Object(object))
}

fn remove_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let mut object = value
        .as_object()
        .cloned()
        .ok_or_else(|| tera::Error::msg("remove filter expects an object"))?;
    let key = string_arg(args, "remove", "key")?;
    object.shift_remove(&key);
    Ok(Value::Object(object))
}

fn string_arg(args: &HashMap<String, Value>, filter: &str, name: &str) -> tera::Result<String> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            tera::Error::msg(format!("{filter} filter requires a string `{name}` argument"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, context: &tera::Context) -> String {
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template("test", template).unwrap();
        tera.render("test", context).unwrap()
    }

    #[test]
    fn test_camel_case_filter() {
        let mut context = tera::Context::new();
        context.insert("name", "http_client");
        assert_eq!(render("{{ name | camel_case }}", &context), "HTTPClient");
    }

    #[test]
    fn test_insert_and_remove_filters() {
        let mut context = tera::Context::new();
        context.insert("ctx", &json!({"a": 1, "b": 2}));
        assert_eq!(
            render(
                r#"{{ ctx | insert(key="c", value=3) | remove(key="a") | json_encode }}"#,
                &context
            ),
            r#"{"b":2,"c":3}"#
        );
    }

    #[test]
    fn test_insert_filter_rejects_non_objects() {
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template("test", r#"{{ n | insert(key="a", value=1) }}"#)
            .unwrap();
        let mut context = tera::Context::new();
        context.insert("n", &1);
        assert!(tera.render("test", &context).is_err());
    }
}
