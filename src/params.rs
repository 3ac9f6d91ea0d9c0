//! Path-parameter extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Parameter name → captured segment text.
pub type PathParams = HashMap<String, String>;

/// A `{name}` placeholder inside a single segment.
pub(crate) static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^/]*?\}").expect("placeholder pattern compiles"));

// Names the regex crate would misread or reject are refused up front.
static PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name pattern compiles"));

/// Why a parameterised path could not be turned into an extraction pattern.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("invalid path parameter name `{0}`")]
    InvalidName(String),

    #[error("error building path params regex: {0}")]
    Regex(#[from] regex::Error),
}

/// Splits on `/`, dropping empty segments.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Extracts named parameters from `path` using the shape in
/// `parameterised_path`.
///
/// ```rust
/// let params = ramus::extract_path_params("/abc/123/def", "/abc/{myVar}/def").unwrap();
/// assert_eq!(params["myVar"], "123");
/// ```
///
/// Both paths are compared with empty segments removed and the pattern is
/// anchored at both ends. A `path` that does not fit the shape yields an
/// empty map. Placeholder names must be identifiers (`[A-Za-z_][A-Za-z0-9_]*`)
/// and unique; `{my-var}`, `{}` or the same name twice is an error.
pub fn extract_path_params(path: &str, parameterised_path: &str) -> Result<PathParams, ParamsError> {
    let pattern = Regex::new(&params_pattern(parameterised_path)?)?;
    let path = normalise(path);

    let Some(captures) = pattern.captures(&path) else {
        return Ok(PathParams::new());
    };

    Ok(pattern
        .capture_names()
        .flatten()
        .filter_map(|name| captures.name(name).map(|m| (name.to_owned(), m.as_str().to_owned())))
        .collect())
}

// `/abc/{myVar}/def` → `^/abc/(?P<myVar>[^/]*?)/def$`
fn params_pattern(parameterised_path: &str) -> Result<String, ParamsError> {
    let mut pattern = String::from("^");
    let mut last = 0;
    for placeholder in PLACEHOLDER.find_iter(parameterised_path) {
        pattern.push_str(&regex::escape(&parameterised_path[last..placeholder.start()]));
        let braced = placeholder.as_str();
        let name = &braced[1..braced.len() - 1];
        if !PARAM_NAME.is_match(name) {
            return Err(ParamsError::InvalidName(name.to_owned()));
        }
        pattern.push_str("(?P<");
        pattern.push_str(name);
        pattern.push_str(">[^/]*?)");
        last = placeholder.end();
    }
    pattern.push_str(&regex::escape(&normalise_tail(&parameterised_path[last..])));
    pattern.push('$');
    Ok(pattern)
}

// A trailing slash on the shape must not defeat the match against a
// normalised request path.
fn normalise_tail(tail: &str) -> &str {
    if tail.len() > 1 { tail.trim_end_matches('/') } else { tail }
}

fn normalise(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in split_path(path) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
