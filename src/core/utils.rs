//! String transformation utilities for code generation

/// Class-name prefixes that are written fully uppercased.
const ACRONYM_PREFIXES: [&str; 3] = ["Ssl", "Http", "Xml"];

/// Converts a lower_case_name to CamelCase for use as a class name.
///
/// Names without underscores that already start with an uppercase letter are
/// returned unchanged. Otherwise each underscore-separated segment is capitalized
/// and the segments are joined. A leading `Ssl`, `Http` or `Xml` is uppercased.
///
/// # Examples
/// ```
/// use clientgen::core::utils::camel_case;
///
/// assert_eq!(camel_case("foo_bar"), "FooBar");
/// assert_eq!(camel_case("ssl_cert"), "SSLCert");
/// assert_eq!(camel_case("http_client"), "HTTPClient");
/// assert_eq!(camel_case("AppSetup"), "AppSetup");
/// ```
pub fn camel_case(text: &str) -> String {
    if is_already_camel(text) {
        return text.to_string();
    }

    let mut result: String = text.split('_').map(capitalize).collect();

    if let Some(prefix) = ACRONYM_PREFIXES
        .iter()
        .find(|prefix| result.starts_with(*prefix))
    {
        result.replace_range(..prefix.len(), &prefix.to_uppercase());
    }

    result
}

fn is_already_camel(text: &str) -> bool {
    let mut chars = text.chars();
    !text.contains('_')
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.next().is_some()
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}
