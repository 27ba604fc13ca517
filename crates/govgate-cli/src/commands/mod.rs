pub mod authenticate;
pub mod credential;
pub mod fetch;
pub mod info;
pub mod keygen;
pub mod store;

use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Turn a non-success node response into an error carrying its message.
pub async fn ensure_success(
    resp: reqwest::Response,
    what: &str,
) -> anyhow::Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{} failed (HTTP {}): {}", what, status, err.error),
        Err(_) => anyhow::bail!("{} failed (HTTP {})", what, status),
    }
}

/// URL of the resource at `path` on the node.
pub fn resource_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
