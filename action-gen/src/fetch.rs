//! NetBox schema client.
//!
//! Downloads the OpenAPI document that NetBox serves at
//! `/api/schema?format=json`. A single request is made; there is no retry.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::schema::OpenApiSchema;

/// Path (and query) NetBox serves its OpenAPI document from.
pub const SCHEMA_PATH: &str = "/api/schema?format=json";

/// Default timeout for the schema request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for schema retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned error status: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse OpenAPI document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Builds the schema URL for a NetBox host, ignoring trailing slashes.
///
/// ## Examples
///
/// ```
/// use netbox_action_gen::fetch::schema_url;
///
/// assert_eq!(
///     schema_url("https://demo.netbox.dev/"),
///     "https://demo.netbox.dev/api/schema?format=json"
/// );
/// ```
pub fn schema_url(host: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), SCHEMA_PATH)
}

/// Fetches and decodes the OpenAPI schema from `host`.
///
/// `verify_tls = false` accepts invalid certificates, which is what
/// self-signed lab instances usually need.
///
/// ## Errors
///
/// Returns `FetchError` on transport failures and timeouts, on any non-2xx
/// status, and when the body is not an OpenAPI document.
pub async fn fetch_schema(
    host: &str,
    verify_tls: bool,
    timeout: Duration,
) -> Result<OpenApiSchema, FetchError> {
    let url = schema_url(host);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify_tls)
        .build()?;

    info!("Connecting to {url}...");
    let response = client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!("Received {} bytes of schema", body.len());

    let schema: OpenApiSchema = serde_json::from_str(&body)?;
    info!(
        "Fetched NetBox {} schema with {} paths",
        schema.info.version,
        schema.paths.len()
    );

    Ok(schema)
}
