use url::Url;

use crate::error::{ClientError, Result};

/// Validate and normalize a backend base URL.
///
/// Trims whitespace, prepends `https://` when no scheme is given, rejects any
/// explicit non-http(s) scheme, and strips trailing slashes. Runs before any
/// request is dispatched so a malformed URL never reaches the network.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("Backend URL is required".into()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(ClientError::InvalidUrl(
            "Backend URL must start with http:// or https://".into(),
        ));
    } else {
        format!("https://{}", trimmed)
    };

    let normalized = with_scheme.trim_end_matches('/').to_string();

    Url::parse(&normalized)
        .map_err(|_| ClientError::InvalidUrl("Invalid backend URL format".into()))?;

    Ok(normalized)
}
