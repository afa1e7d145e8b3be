use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use todomind_core::{LinkPreviewService, OgpError, PageFetcher};

const ARTICLE_HTML: &str = r#"<html><head>
<meta content="Rust Blog" property="og:site_name">
<meta property="og:title" content="Announcing Rust &amp; friends">
<meta property="og:image" content="/images/cover.png">
</head><body></body></html>"#;

/// In-memory pages keyed by URL; counts every fetch.
struct StubFetcher {
    pages: HashMap<&'static str, Result<&'static str, u16>>,
    calls: Rc<Cell<usize>>,
}

impl PageFetcher for StubFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, OgpError> {
        self.calls.set(self.calls.get() + 1);
        match self.pages.get(url) {
            Some(Ok(html)) => Ok((*html).to_string()),
            Some(Err(status)) => Err(OgpError::Status(*status)),
            None => Err(OgpError::Status(404)),
        }
    }
}

fn service() -> (LinkPreviewService<StubFetcher>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let fetcher = StubFetcher {
        pages: HashMap::from([
            ("https://blog.example.com/post", Ok(ARTICLE_HTML)),
            ("https://plain.example.com", Ok("<html><body>hi</body></html>")),
            ("https://down.example.com", Err(503)),
        ]),
        calls: Rc::clone(&calls),
    };
    (LinkPreviewService::new(fetcher), calls)
}

#[test]
fn preview_reads_first_url_in_text() {
    let (mut previews, calls) = service();

    let preview = previews
        .preview_for_text(
            "notes: see https://blog.example.com/post. and https://plain.example.com",
            true,
        )
        .unwrap();
    assert_eq!(preview.url, "https://blog.example.com/post");
    assert_eq!(preview.title.as_deref(), Some("Announcing Rust & friends"));
    assert_eq!(preview.site_name.as_deref(), Some("Rust Blog"));
    assert_eq!(
        preview.image.as_deref(),
        Some("https://blog.example.com/images/cover.png")
    );
    assert_eq!(calls.get(), 1);
}

#[test]
fn disabled_or_url_less_text_never_fetches() {
    let (mut previews, calls) = service();

    assert_eq!(
        previews.preview_for_text("https://blog.example.com/post", false),
        None
    );
    assert_eq!(previews.preview_for_text("no links here", true), None);
    assert_eq!(calls.get(), 0);
    assert_eq!(previews.cached_len(), 0);
}

#[test]
fn each_url_is_fetched_once() {
    let (mut previews, calls) = service();

    let first = previews.preview_for_url("https://blog.example.com/post");
    let second = previews.preview_for_url("https://blog.example.com/post");
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
}

#[test]
fn failures_are_cached_and_not_retried() {
    let (mut previews, calls) = service();

    assert_eq!(previews.preview_for_url("https://down.example.com"), None);
    assert_eq!(previews.preview_for_url("https://down.example.com"), None);
    assert_eq!(previews.preview_for_url("https://plain.example.com"), None);
    assert_eq!(previews.preview_for_url("https://plain.example.com"), None);
    assert_eq!(calls.get(), 2);
    assert_eq!(previews.cached_len(), 2);

    previews.clear_cache();
    assert_eq!(previews.preview_for_url("https://down.example.com"), None);
    assert_eq!(calls.get(), 3);
}
