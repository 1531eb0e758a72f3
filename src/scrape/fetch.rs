//! Page fetcher for the scrape target.

use crate::error::FetchError;
use std::time::Duration;

/// Builds the HTTP client shared by every poll.
///
/// The timeout covers the whole request, so a hung fetch cannot stall the
/// scrape loop past one cycle.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("votewatch/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Performs a single GET against the results page. No retries.
///
/// Any non-success status is an error distinct from transport failure, with
/// the status code attached.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response.text().await?)
}
