//! Page fetch seam for link previews.

use super::OgpError;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);
const USER_AGENT: &str = concat!("todomind/", env!("CARGO_PKG_VERSION"));

/// Fetches the HTML body of one page.
///
/// Implemented over HTTP in production and by in-memory stubs in tests.
pub trait PageFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, OgpError>;
}

/// Blocking HTTP fetcher.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, OgpError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, OgpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, OgpError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(OgpError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);
        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(OgpError::NotHtml(content_type));
            }
        }

        let body = response.text()?;
        debug!(
            "event=ogp_fetch module=ogp status=ok bytes={}",
            body.len()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpPageFetcher, PageFetcher};
    use crate::ogp::OgpError;
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn transport_errors_do_not_echo_the_link() {
        let fetcher = HttpPageFetcher::with_timeout(Duration::from_millis(500)).unwrap();
        let err = fetcher
            .fetch_html("http://127.0.0.1:1/private/diary?token=secret")
            .unwrap_err();

        assert!(matches!(err, OgpError::Http(_)));
        assert_eq!(err.code(), "http_error");
        let mut messages = vec![err.to_string()];
        let mut source = err.source();
        while let Some(inner) = source {
            messages.push(inner.to_string());
            source = inner.source();
        }
        for message in messages {
            assert!(!message.contains("private"), "{message}");
            assert!(!message.contains("secret"), "{message}");
        }
    }
}
