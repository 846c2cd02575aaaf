//! Page download: a single GET, no retries, library-default redirects.

use crate::error::Substack2PdfError;
use reqwest::StatusCode;
use tracing::{debug, info};

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Download `url` and return the response body as text.
///
/// Anything other than `200 OK` is an [`Substack2PdfError::HttpStatus`];
/// the body of such a response is never looked at.
pub async fn fetch_page(url: &str, user_agent: &str) -> Result<String, Substack2PdfError> {
    if !is_url(url) || reqwest::Url::parse(url).is_err() {
        return Err(Substack2PdfError::InvalidUrl {
            input: url.to_string(),
        });
    }

    info!("Fetching post: {}", url);

    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| Substack2PdfError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Substack2PdfError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(Substack2PdfError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| Substack2PdfError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://someone.substack.com/p/a-post"));
        assert!(is_url("http://medium.com/@me/a-post"));
        assert!(!is_url("someone.substack.com/p/a-post"));
        assert!(!is_url("/tmp/post.html"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn rejects_non_http_input() {
        let err = fetch_page("ftp://example.com/post", "Mozilla/5.0")
            .await
            .unwrap_err();
        assert!(matches!(err, Substack2PdfError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn rejects_unparseable_url() {
        let err = fetch_page("https://", "Mozilla/5.0").await.unwrap_err();
        assert!(matches!(err, Substack2PdfError::InvalidUrl { .. }));
    }
}
