//! Input sanitizers applied at the HTTP boundary before values reach the
//! stores. They mirror what a CMS does to untrusted form fields: plain text
//! loses markup, slugs are reduced to `[a-z0-9_-]`, URLs must be http(s),
//! and rich HTML keeps its formatting but loses active content.

use std::sync::LazyLock;

use regex::Regex;

static ACTIVE_BLOCK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "iframe", "object", "embed"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("valid regex")
        })
        .collect()
});
static ACTIVE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)</?(?:script|style|iframe|object|embed)\b[^>]*>").expect("valid regex")
});
static EVENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});
static JS_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static OCTET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Reduce untrusted input to a single line of plain text.
///
/// Removes script/style blocks and all remaining tags, percent-encoded octets
/// and control characters, then collapses whitespace runs and trims.
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = input.to_string();
    for re in ACTIVE_BLOCK_RES.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    let text = TAG_RE.replace_all(&text, "");
    let text = OCTET_RE.replace_all(&text, "");
    let text: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Build a URL-safe slug: lowercase ASCII alphanumerics, `_` and `-`, with
/// whitespace turned into dashes and dash runs collapsed.
#[must_use]
pub fn sanitize_title(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input, "");
    stripped
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalize an http(s) URL. Anything else sanitizes to the empty string.
#[must_use]
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    match reqwest::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => String::new(),
    }
}

/// Keep post HTML but strip active content: script-like elements, inline
/// event handlers and `javascript:` URLs.
#[must_use]
pub fn kses_post(input: &str) -> String {
    let mut html = input.to_string();
    for re in ACTIVE_BLOCK_RES.iter() {
        html = re.replace_all(&html, "").into_owned();
    }
    let html = ACTIVE_TAG_RE.replace_all(&html, "");
    let html = EVENT_ATTR_RE.replace_all(&html, "");
    JS_SCHEME_RE.replace_all(&html, "").into_owned()
}

/// A SKU is accepted only when sanitizing it as text leaves it unchanged.
#[must_use]
pub fn is_valid_sku(sku: &str) -> bool {
    !sku.is_empty() && sanitize_text_field(sku) == sku
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
