//! Call-to-action link extraction and classification.
//!
//! Email bodies are parsed as HTML and every `<a href>` pointing at http(s)
//! is taken; SMS bodies are scanned with a URL pattern. Each link is tagged
//! with a coarse [`LinkType`] from keywords in its host and path.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::models::{Link, LinkType};
use crate::utils::{compile_regex_unsafe, parse_selector_unsafe};

const ANCHOR_SELECTOR_STR: &str = "a[href]";
const SMS_URL_PATTERN: &str = r#"(?i)\bhttps?://[^\s<>"']+"#;

/// Hosts that only ever serve contribution forms.
const DONATION_HOSTS: &[&str] = &[
    "actblue.com",
    "winred.com",
    "anedot.com",
    "ngpvan.com",
    "donorbox.org",
    "givegreen.com",
];
const DONATION_KEYWORDS: &[&str] = &["donate", "contribute", "chip-in", "chipin", "give"];
const PETITION_KEYWORDS: &[&str] = &["petition", "pledge", "survey", "poll"];
const EVENT_KEYWORDS: &[&str] = &["event", "rsvp", "rally", "town-hall", "townhall"];
const EVENT_HOSTS: &[&str] = &["mobilize.us", "eventbrite.com"];
const VOLUNTEER_KEYWORDS: &[&str] = &["volunteer", "canvass", "phonebank", "textbank"];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(ANCHOR_SELECTOR_STR, "ANCHOR_SELECTOR"));
static SMS_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(SMS_URL_PATTERN, "SMS_URL_RE"));

/// Extracts CTA links from an email's HTML body, in document order,
/// without duplicates.
pub fn extract_email_links(html: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    let hrefs = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_http_url(href))
        .map(str::to_string);
    into_links(hrefs)
}

/// Extracts CTA links from an SMS body, in order, without duplicates.
pub fn extract_sms_links(message: &str) -> Vec<Link> {
    let urls = SMS_URL_RE
        .find_iter(message)
        .map(|m| trim_trailing_punctuation(m.as_str()).to_string());
    into_links(urls)
}

fn into_links(urls: impl Iterator<Item = String>) -> Vec<Link> {
    let mut seen = HashSet::new();
    urls.filter(|url| seen.insert(url.clone()))
        .map(|url| {
            let link_type = classify_link(&url);
            Link::new(url, link_type)
        })
        .collect()
}

fn is_http_url(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// Sentences end with punctuation that the URL pattern swallows.
fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']'])
}

/// Assigns a coarse type from the URL's host and path.
///
/// Donation wins over the other categories because fundraising links often
/// mention events or petitions in their slugs.
pub fn classify_link(url: &str) -> LinkType {
    let Ok(parsed) = url::Url::parse(url) else {
        return LinkType::Other;
    };
    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let path = parsed.path().to_ascii_lowercase();

    let host_matches = |hosts: &[&str]| {
        hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    };
    let mentions = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| host.contains(k) || path.contains(k))
    };

    if host_matches(DONATION_HOSTS) || mentions(DONATION_KEYWORDS) {
        LinkType::Donation
    } else if mentions(PETITION_KEYWORDS) {
        LinkType::Petition
    } else if host_matches(EVENT_HOSTS) || mentions(EVENT_KEYWORDS) {
        LinkType::Event
    } else if mentions(VOLUNTEER_KEYWORDS) {
        LinkType::Volunteer
    } else {
        LinkType::Other
    }
}
