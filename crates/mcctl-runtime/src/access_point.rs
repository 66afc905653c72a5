//! Public access point resolution.
//!
//! With `access_point = "auto"` the public IPv4 address is looked up once
//! and joined with the server's query port. Any other value is used as-is.

use std::net::Ipv4Addr;
use std::time::Duration;

use mcctl_core::domain::ServerProperties;
use mcctl_core::settings::AccessPointSetting;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Service returning the caller's public IPv4 address as plain text.
pub const PUBLIC_IP_ENDPOINT: &str = "https://v4.ident.me";

/// Port used when `server.properties` has no `query.port`.
pub const DEFAULT_QUERY_PORT: u16 = 25565;

/// Shown when detection fails.
pub const UNKNOWN_ACCESS_POINT: &str = "unknown";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AccessPointError {
    #[error("Public IP lookup failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Public IP lookup returned an invalid address: {0:?}")]
    InvalidAddress(String),
}

/// Resolve the access point shown to players.
///
/// Detection failures are logged and produce [`UNKNOWN_ACCESS_POINT`].
pub async fn resolve_access_point(
    setting: &AccessPointSetting,
    properties: Option<&ServerProperties>,
) -> String {
    match setting {
        AccessPointSetting::Fixed(value) => value.clone(),
        AccessPointSetting::Auto => {
            let port = properties
                .and_then(ServerProperties::query_port)
                .unwrap_or(DEFAULT_QUERY_PORT);
            match detect_public_ip(PUBLIC_IP_ENDPOINT).await {
                Ok(ip) => {
                    debug!(%ip, port, "Detected public address");
                    format_access_point(ip, port)
                }
                Err(e) => {
                    warn!(error = %e, "Could not detect public address");
                    UNKNOWN_ACCESS_POINT.to_string()
                }
            }
        }
    }
}

/// Fetch `endpoint` and parse the body as an IPv4 address.
pub async fn detect_public_ip(endpoint: &str) -> Result<Ipv4Addr, AccessPointError> {
    let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
    let body = client
        .get(endpoint)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_public_ip(&body)
}

/// Parse a plain-text IPv4 response body.
pub fn parse_public_ip(body: &str) -> Result<Ipv4Addr, AccessPointError> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| AccessPointError::InvalidAddress(trimmed.to_string()))
}

pub fn format_access_point(ip: Ipv4Addr, port: u16) -> String {
    format!("{ip}:{port}")
}
