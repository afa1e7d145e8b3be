//! Cached OGP lookups for free text.
//!
//! # Invariants
//! - Each URL is fetched at most once per service lifetime; failures are
//!   cached as "no preview" and never retried.
//! - Nothing is fetched while previews are disabled in settings.

use crate::ogp::{extract_first_url, parse_ogp, OgpPreview, PageFetcher};
use log::{debug, warn};
use std::collections::HashMap;

pub struct LinkPreviewService<F: PageFetcher> {
    fetcher: F,
    cache: HashMap<String, Option<OgpPreview>>,
}

impl<F: PageFetcher> LinkPreviewService<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
        }
    }

    /// Preview for the first URL in `text`, or `None` when disabled, when
    /// the text has no URL, or when the page yields no metadata.
    pub fn preview_for_text(&mut self, text: &str, enabled: bool) -> Option<OgpPreview> {
        if !enabled {
            return None;
        }
        let url = extract_first_url(text)?;
        self.preview_for_url(&url)
    }

    pub fn preview_for_url(&mut self, url: &str) -> Option<OgpPreview> {
        if let Some(cached) = self.cache.get(url) {
            debug!("event=ogp_lookup module=ogp status=cache_hit");
            return cached.clone();
        }

        let preview = match self.fetcher.fetch_html(url) {
            Ok(html) => parse_ogp(url, &html),
            Err(err) => {
                warn!(
                    "event=ogp_lookup module=ogp status=error error_code={}",
                    err.code()
                );
                None
            }
        };
        self.cache.insert(url.to_string(), preview.clone());
        preview
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
