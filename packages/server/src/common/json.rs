//! Best-effort JSON recovery from model responses.
//!
//! Models asked for "ONLY a JSON object" still return markdown fences
//! or surrounding prose often enough that every JSON-consuming stage
//! funnels through this module: strip fence markers, else scan for the
//! first balanced brace group, then hand the candidate to serde.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from JSON recovery and parsing of model output.
#[derive(Debug, Error)]
pub enum JsonExtractError {
    /// No `{...}` object could be located in the response text
    #[error("no JSON object found in model response: {preview}")]
    NoObject { preview: String },

    /// A candidate object was found but did not parse
    #[error("unparseable model response: {source}; candidate: {preview}")]
    Unparseable {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

/// Truncate text for error messages and logs.
fn preview(text: &str) -> String {
    let mut p: String = text.chars().take(200).collect();
    if text.len() > p.len() {
        p.push_str("...");
    }
    p
}

/// Strip markdown code fences from the start/end of a response.
fn strip_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Locate the first balanced `{...}` group in a string.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract the JSON object portion of a model response as a string.
///
/// Fenced responses have their fences stripped; responses with
/// surrounding prose are scanned for the first balanced brace group.
pub fn extract_json_object(text: &str) -> Result<&str, JsonExtractError> {
    let stripped = strip_fences(text);
    if stripped.starts_with('{') {
        if let Some(object) = first_balanced_object(stripped) {
            return Ok(object);
        }
    }
    first_balanced_object(stripped).ok_or_else(|| JsonExtractError::NoObject {
        preview: preview(text),
    })
}

/// Recover and deserialize a JSON object from a model response.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, JsonExtractError> {
    let object = extract_json_object(text)?;
    serde_json::from_str(object).map_err(|source| JsonExtractError::Unparseable {
        source,
        preview: preview(object),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        count: i64,
    }

    #[test]
    fn parses_clean_json() {
        let sample: Sample = parse_model_json(r#"{"name": "acme", "count": 3}"#).unwrap();
        assert_eq!(sample.name, "acme");
        assert_eq!(sample.count, 3);
    }

    #[test]
    fn strips_json_fences() {
        let text = "```json\n{\"name\": \"acme\", \"count\": 1}\n```";
        let sample: Sample = parse_model_json(text).unwrap();
        assert_eq!(sample.name, "acme");
    }

    #[test]
    fn strips_bare_fences() {
        let text = "```\n{\"name\": \"acme\", \"count\": 1}\n```";
        assert!(parse_model_json::<Sample>(text).is_ok());
    }

    #[test]
    fn recovers_object_from_surrounding_prose() {
        let text = "Sure, here is the data: {\"name\": \"acme\", \"count\": 2} hope that helps";
        let sample: Sample = parse_model_json(text).unwrap();
        assert_eq!(sample.count, 2);
    }

    #[test]
    fn handles_nested_braces() {
        let text = "prefix {\"outer\": {\"inner\": 1}} suffix";
        assert_eq!(
            extract_json_object(text).unwrap(),
            "{\"outer\": {\"inner\": 1}}"
        );
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scanner() {
        let text = r#"{"name": "has } brace", "count": 5}"#;
        let sample: Sample = parse_model_json(text).unwrap();
        assert_eq!(sample.name, "has } brace");
    }

    #[test]
    fn missing_object_is_a_typed_error() {
        let err = parse_model_json::<Sample>("no json here at all").unwrap_err();
        assert!(matches!(err, JsonExtractError::NoObject { .. }));
    }

    #[test]
    fn invalid_object_is_a_typed_error() {
        let err = parse_model_json::<Sample>(r#"{"name": 42}"#).unwrap_err();
        assert!(matches!(err, JsonExtractError::Unparseable { .. }));
    }
}
