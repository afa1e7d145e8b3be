//! Open Graph link previews for mind map descriptions.
//!
//! # Responsibility
//! - Find the first URL in free text.
//! - Fetch the page and read its `og:*` metadata.
//!
//! # Invariants
//! - Previews are display-only; nothing here touches storage.
//! - Failures degrade to "no preview", they never reach the caller as panics.

mod fetch;
mod parse;

pub use fetch::{HttpPageFetcher, PageFetcher, DEFAULT_FETCH_TIMEOUT};
pub use parse::{extract_first_url, parse_ogp};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lightweight page metadata used to render a link card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgpPreview {
    /// Page the metadata was read from.
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute image URL.
    pub image: Option<String>,
    pub site_name: Option<String>,
}

#[derive(Debug)]
pub enum OgpError {
    Http(reqwest::Error),
    /// Non-2xx response.
    Status(u16),
    /// Response is not an HTML document.
    NotHtml(String),
}

impl OgpError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_error",
            Self::Status(_) => "bad_status",
            Self::NotHtml(_) => "not_html",
        }
    }
}

impl Display for OgpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::Status(code) => write!(f, "unexpected http status {code}"),
            Self::NotHtml(content_type) => write!(f, "not an html page: {content_type}"),
        }
    }
}

impl Error for OgpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status(_) | Self::NotHtml(_) => None,
        }
    }
}

/// The request URL is stripped so messages never carry user links.
impl From<reqwest::Error> for OgpError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.without_url())
    }
}
