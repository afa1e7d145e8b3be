//! URL extraction and Open Graph metadata parsing.
//!
//! Regex-based. Previews only need a handful of `<meta>` tags
//! from the page head, not a DOM.

use super::OgpPreview;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s<>"'`]+"#).expect("valid url regex"));
static META_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag regex"));
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static ORIGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?)://[^/?#]+").expect("valid origin regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Returns the first `http(s)://` URL found in free text.
///
/// Sentence punctuation glued to the end of the URL is dropped.
pub fn extract_first_url(text: &str) -> Option<String> {
    let found = URL_RE.find(text)?.as_str();
    let trimmed = found.trim_end_matches(TRAILING_PUNCTUATION);
    if ORIGIN_RE.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Parses Open Graph tags out of an HTML document.
///
/// Returns `None` when the page carries neither a title nor an image, so
/// callers have nothing to render.
pub fn parse_ogp(url: &str, html: &str) -> Option<OgpPreview> {
    let mut preview = OgpPreview {
        url: url.to_string(),
        ..OgpPreview::default()
    };

    for tag in META_TAG_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for caps in ATTR_RE.captures_iter(tag.as_str()) {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            match name.as_str() {
                "property" | "name" => key = Some(value.trim().to_ascii_lowercase()),
                "content" => content = Some(decode_entities(value.trim())),
                _ => {}
            }
        }

        let (Some(key), Some(content)) = (key, content) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        let slot = match key.as_str() {
            "og:title" => &mut preview.title,
            "og:description" => &mut preview.description,
            "og:image" | "og:image:url" => &mut preview.image,
            "og:site_name" => &mut preview.site_name,
            _ => continue,
        };
        // First tag wins; pages often repeat og:image for alternates.
        if slot.is_none() {
            *slot = Some(content);
        }
    }

    if preview.title.is_none() {
        preview.title = TITLE_RE
            .captures(html)
            .map(|caps| normalize_text(&decode_entities(&caps[1])))
            .filter(|title| !title.is_empty());
    }
    preview.image = preview.image.map(|image| resolve_url(url, &image));

    if preview.title.is_none() && preview.image.is_none() {
        return None;
    }
    Some(preview)
}

/// Resolves protocol-relative and root-relative image paths against `base`.
fn resolve_url(base: &str, target: &str) -> String {
    if ORIGIN_RE.is_match(target) {
        return target.to_string();
    }
    let Some(origin) = ORIGIN_RE.captures(base) else {
        return target.to_string();
    };
    if let Some(rest) = target.strip_prefix("//") {
        return format!("{}://{rest}", &origin[1]);
    }
    if target.starts_with('/') {
        return format!("{}{target}", &origin[0]);
    }
    target.to_string()
}

fn normalize_text(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
