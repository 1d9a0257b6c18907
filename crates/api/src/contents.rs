//! Repository contents endpoint helpers.

use base64::{Engine, engine::general_purpose::STANDARD};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;

use crate::ApiError;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// API-relative path of the contents endpoint for `path` in `owner/repo`.
///
/// Each segment is percent-encoded while the `/` separators of `path` are kept.
///
/// ```rust
/// use dispatch_api::contents_path;
///
/// assert_eq!(
///     contents_path("octo", "app", ".github/workflows/my flow.yml"),
///     "/repos/octo/app/contents/.github/workflows/my%20flow.yml"
/// );
/// ```
pub fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    let encoded_path = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "/repos/{}/{}/contents/{}",
        utf8_percent_encode(owner, PATH_SEGMENT),
        utf8_percent_encode(repo, PATH_SEGMENT),
        encoded_path
    )
}

/// Extracts and decodes the `content` field of a contents response.
///
/// GitHub wraps the base64 payload at 60 columns, so whitespace is removed
/// before decoding.
pub fn decode_content_payload(payload: &Value) -> Result<String, ApiError> {
    let encoded = payload
        .as_object()
        .and_then(|object| object.get("content"))
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingContent)?;

    let compact: String = encoded.chars().filter(|character| !character.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|error| ApiError::Decode(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| ApiError::Decode(error.to_string()))
}
