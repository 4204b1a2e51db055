//! Cover art encoded as `data:` URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type assumed for pictures that do not declare one.
const DEFAULT_MIME: &str = "image/jpeg";

pub fn data_uri(mime: Option<&str>, data: &[u8]) -> String {
    let mime = mime.map(str::trim).filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MIME);
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// Split a base64 `data:` URI back into its MIME type and bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}
