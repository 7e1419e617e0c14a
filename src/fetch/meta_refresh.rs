//! Client-side redirect detection in HTML bodies.
//!
//! Best-effort only: recognizes `<meta http-equiv="refresh">` with a URL and
//! the common `location` assignments inside inline scripts. Anything more
//! elaborate (computed URLs, timers, form auto-submits) is treated as a
//! terminal page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::utils::{compile_regex_unsafe, parse_selector_unsafe};

const META_SELECTOR_STR: &str = "meta[http-equiv][content]";
const SCRIPT_SELECTOR_STR: &str = "script:not([src])";
const LOCATION_ASSIGN_PATTERN: &str =
    r#"(?:(?:window|document|top|self)\.)?location(?:\.href)?\s*=\s*["']([^"']+)["']"#;
const LOCATION_CALL_PATTERN: &str =
    r#"(?:(?:window|document|top|self)\.)?location\.(?:replace|assign)\(\s*["']([^"']+)["']\s*\)"#;

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(META_SELECTOR_STR, "META_SELECTOR"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(SCRIPT_SELECTOR_STR, "SCRIPT_SELECTOR"));
static LOCATION_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(LOCATION_ASSIGN_PATTERN, "LOCATION_ASSIGN_RE"));
static LOCATION_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(LOCATION_CALL_PATTERN, "LOCATION_CALL_RE"));

/// Looks for a client-side redirect in `body`, resolving the target against
/// `base`. Returns `None` for self-refreshes and non-http(s) targets.
pub(crate) fn find_client_redirect(body: &str, base: &Url) -> Option<Url> {
    let document = Html::parse_document(body);

    let meta_target = document
        .select(&META_SELECTOR)
        .filter(|element| {
            element
                .value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .find_map(|element| element.value().attr("content").and_then(parse_refresh_content));

    let target = meta_target.or_else(|| {
        document.select(&SCRIPT_SELECTOR).find_map(|element| {
            let script = element.text().collect::<String>();
            LOCATION_CALL_RE
                .captures(&script)
                .or_else(|| LOCATION_ASSIGN_RE.captures(&script))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    })?;

    let resolved = base.join(target.trim()).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") || &resolved == base {
        return None;
    }
    Some(resolved)
}

/// Extracts the URL from a refresh `content` value such as
/// `0; url='https://x.test/'`. A bare delay means "reload" and yields `None`.
fn parse_refresh_content(content: &str) -> Option<String> {
    let (_, rest) = content.split_once([';', ','])?;
    let rest = rest.trim();
    let rest = match rest.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("url") => rest[3..].trim_start(),
        _ => rest,
    };
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    let target = rest.trim_matches(|c| c == '\'' || c == '"').trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://trk.test/c/abc").expect("valid base")
    }

    #[test]
    fn test_meta_refresh_absolute() {
        let body = r#"<html><head>
            <meta http-equiv="Refresh" content="0; URL='https://dest.test/donate?ref=1'">
            </head><body></body></html>"#;
        let target = find_client_redirect(body, &base()).expect("should detect refresh");
        assert_eq!(target.as_str(), "https://dest.test/donate?ref=1");
    }

    #[test]
    fn test_meta_refresh_relative() {
        let body = r#"<meta http-equiv="refresh" content="1;url=/landing">"#;
        let target = find_client_redirect(body, &base()).expect("should detect refresh");
        assert_eq!(target.as_str(), "https://trk.test/landing");
    }

    #[test]
    fn test_meta_refresh_without_url_is_reload() {
        let body = r#"<meta http-equiv="refresh" content="30">"#;
        assert!(find_client_redirect(body, &base()).is_none());
    }

    #[test]
    fn test_script_location_replace() {
        let body = r#"<html><body><script>
            window.location.replace("https://dest.test/petition");
        </script></body></html>"#;
        let target = find_client_redirect(body, &base()).expect("should detect script redirect");
        assert_eq!(target.as_str(), "https://dest.test/petition");
    }

    #[test]
    fn test_script_location_href_assignment() {
        let body = r#"<script>var x = 1; window.location.href = 'https://dest.test/e';</script>"#;
        let target = find_client_redirect(body, &base()).expect("should detect script redirect");
        assert_eq!(target.as_str(), "https://dest.test/e");
    }

    #[test]
    fn test_plain_page_is_terminal() {
        let body = r#"<html><head><title>Donate</title></head>
            <body><p>window.location = "https://not-a-script.test/"</p></body></html>"#;
        assert!(find_client_redirect(body, &base()).is_none());
    }

    #[test]
    fn test_self_refresh_and_bad_scheme_ignored() {
        let body = r#"<meta http-equiv="refresh" content="0; url=https://trk.test/c/abc">"#;
        assert!(find_client_redirect(body, &base()).is_none());

        let body = r#"<script>location.assign("javascript:void(0)")</script>"#;
        assert!(find_client_redirect(body, &base()).is_none());
    }

    #[test]
    fn test_parse_refresh_content_variants() {
        assert_eq!(
            parse_refresh_content("0;url=https://a.test/"),
            Some("https://a.test/".to_string())
        );
        assert_eq!(
            parse_refresh_content("5 ; URL = \"https://a.test/x\""),
            Some("https://a.test/x".to_string())
        );
        assert_eq!(parse_refresh_content("0"), None);
        assert_eq!(parse_refresh_content("0; url="), None);
    }
}
