//! HTTP redirect chain resolution.
//!
//! Redirects are followed manually, one request per hop, so every hop can be
//! recorded, loops can be caught, and the chain can be capped. The client
//! handed in must have redirect following disabled.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::{StatusCode, Url};
use serde::Serialize;

use crate::config::{Config, MAX_META_REFRESH_BODY_SIZE};
use crate::error_handling::{categorize_reqwest_error, InitializationError, ResolveError};
use crate::fetch::meta_refresh::find_client_redirect;
use crate::fetch::request::RequestHeaders;
use crate::initialization::init_redirect_client;
use crate::links::strip_query;
use crate::models::{RedirectKind, RedirectStep};

/// Outcome of resolving one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Candidate as supplied (trimmed)
    pub original: String,
    /// Candidate without its query string, for comparison
    pub stripped_original: String,
    /// Last URL reached, query string intact
    pub terminal_url: String,
    /// `terminal_url` without its query string
    pub final_url: String,
    pub steps: Vec<RedirectStep>,
    /// `final_url != stripped_original`
    pub changed: bool,
    /// Why the chain was cut short, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolveError>,
    pub total_elapsed_millis: u64,
}

impl Resolution {
    /// True when the chain ended at a terminal response.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Resolves candidate URLs to their final destinations.
///
/// The batch orchestrator is generic over this trait so resolution can be
/// replaced in tests.
pub trait ResolveLink {
    /// Resolves `candidate`. Only malformed input is an `Err`; network
    /// failures are reported inside the returned [`Resolution`].
    fn resolve(
        &self,
        candidate: &str,
    ) -> impl Future<Output = Result<Resolution, ResolveError>> + Send;
}

/// [`ResolveLink`] implementation that talks HTTP.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: Arc<reqwest::Client>,
    max_redirects: usize,
    per_hop_timeout: Duration,
}

impl HttpResolver {
    /// Wraps a client that must have redirect following disabled.
    pub fn new(client: Arc<reqwest::Client>, max_redirects: usize, per_hop_timeout: Duration) -> Self {
        Self {
            client,
            max_redirects,
            per_hop_timeout,
        }
    }

    /// Builds the redirect-less client and limits from `config`.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let client = init_redirect_client(config)?;
        Ok(Self::new(
            client,
            config.max_redirects,
            Duration::from_secs(config.timeout_seconds),
        ))
    }
}

impl ResolveLink for HttpResolver {
    async fn resolve(&self, candidate: &str) -> Result<Resolution, ResolveError> {
        resolve_link(
            &self.client,
            candidate,
            self.max_redirects,
            self.per_hop_timeout,
        )
        .await
    }
}

/// Parses a candidate, accepting only absolute http(s) URLs with a host.
pub fn parse_candidate(candidate: &str) -> Result<Url, ResolveError> {
    let trimmed = candidate.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ResolveError::MalformedUrl(format!("{trimmed} ({e})")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ResolveError::MalformedUrl(format!(
            "{trimmed} (unsupported scheme '{}')",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ResolveError::MalformedUrl(format!("{trimmed} (missing host)")));
    }
    Ok(url)
}

/// Follows the redirect chain of `candidate` for at most `max_redirects`
/// requests, each bounded by `per_hop_timeout`.
///
/// The unstripped candidate is requested because tracking parameters are
/// often what the redirector keys on; only the terminal URL is stripped.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedUrl`] without touching the network when
/// the candidate is not an absolute http(s) URL. Every other failure is
/// reported in [`Resolution::error`], with the last URL reached as the
/// result.
pub async fn resolve_link(
    client: &reqwest::Client,
    candidate: &str,
    max_redirects: usize,
    per_hop_timeout: Duration,
) -> Result<Resolution, ResolveError> {
    let start_url = parse_candidate(candidate)?;
    let started = Instant::now();
    let original = candidate.trim();
    let stripped_original = strip_query(original).to_string();

    let mut steps: Vec<RedirectStep> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = start_url;
    let mut previous: Option<Url> = None;
    let mut error = None;
    let mut redirected = false;

    loop {
        if steps.len() >= max_redirects {
            warn!(
                "Gave up on {} after {} hops (next: {})",
                candidate.trim(),
                steps.len(),
                current
            );
            let cap_error = ResolveError::TooManyRedirects(steps.len());
            if let Some(last) = steps.last_mut() {
                last.error = Some(cap_error.to_string());
            }
            error = Some(cap_error);
            break;
        }
        if !visited.insert(current.as_str().to_string()) {
            let revisited = current.to_string();
            warn!("Redirect loop for {}: {} revisited", candidate.trim(), revisited);
            if let Some(last_distinct) = previous.take() {
                current = last_distinct;
            }
            let loop_error = ResolveError::RedirectLoop(revisited);
            if let Some(last) = steps.last_mut() {
                last.error = Some(loop_error.to_string());
            }
            error = Some(loop_error);
            break;
        }

        let hop_started = Instant::now();
        let hop = fetch_hop(client, &current, per_hop_timeout).await;
        let elapsed_millis = hop_started.elapsed().as_millis() as u64;
        let step_index = steps.len() + 1;

        match hop {
            Hop::Redirect { status, kind, next } => {
                debug!("Hop {step_index}: {current} -> {next} ({status}, {kind:?})");
                steps.push(RedirectStep {
                    step_index,
                    requested_url: current.to_string(),
                    status_code: Some(status),
                    elapsed_millis,
                    redirect_kind: kind,
                    location: Some(next.to_string()),
                    error: None,
                });
                previous = Some(std::mem::replace(&mut current, next));
                redirected = true;
            }
            Hop::Terminal { status } => {
                debug!("Hop {step_index}: {current} is terminal ({status})");
                steps.push(RedirectStep {
                    step_index,
                    requested_url: current.to_string(),
                    status_code: Some(status),
                    elapsed_millis,
                    redirect_kind: RedirectKind::Terminal,
                    location: None,
                    error: None,
                });
                break;
            }
            Hop::Failed { status, error: hop_error } => {
                warn!("Hop {step_index} failed for {}: {hop_error}", candidate.trim());
                steps.push(RedirectStep {
                    step_index,
                    requested_url: current.to_string(),
                    status_code: status,
                    elapsed_millis,
                    redirect_kind: RedirectKind::Error,
                    location: None,
                    error: Some(hop_error.to_string()),
                });
                error = Some(hop_error);
                break;
            }
        }
    }

    // Without a redirect the result is the input itself, not its normalised form.
    let terminal_url = if redirected {
        current.to_string()
    } else {
        original.to_string()
    };
    let final_url = strip_query(&terminal_url).to_string();
    let changed = final_url != stripped_original;

    Ok(Resolution {
        original: original.to_string(),
        stripped_original,
        terminal_url,
        final_url,
        steps,
        changed,
        error,
        total_elapsed_millis: started.elapsed().as_millis() as u64,
    })
}

enum Hop {
    Redirect {
        status: u16,
        kind: RedirectKind,
        next: Url,
    },
    Terminal {
        status: u16,
    },
    Failed {
        status: Option<u16>,
        error: ResolveError,
    },
}

async fn fetch_hop(client: &reqwest::Client, url: &Url, per_hop_timeout: Duration) -> Hop {
    let request =
        RequestHeaders::apply_to_request_builder(client.get(url.clone())).timeout(per_hop_timeout);
    let mut response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return Hop::Failed {
                status: None,
                error: categorize_reqwest_error(&e, url.as_str(), per_hop_timeout),
            }
        }
    };

    let status = response.status();
    let status_code = status.as_u16();

    if let Some(kind) = redirect_kind_for(status) {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let Some(location) = location else {
            warn!("Redirect status {status_code} for {url} but no Location header");
            return Hop::Terminal {
                status: status_code,
            };
        };
        return match url.join(location) {
            Ok(next) if matches!(next.scheme(), "http" | "https") => Hop::Redirect {
                status: status_code,
                kind,
                next,
            },
            Ok(next) => {
                warn!("Not following {url} to non-http target {next}");
                Hop::Terminal {
                    status: status_code,
                }
            }
            Err(e) => {
                warn!("Unparseable Location '{location}' from {url}: {e}");
                Hop::Terminal {
                    status: status_code,
                }
            }
        };
    }

    if status.is_success() && is_html(&response) {
        match read_capped_body(&mut response, url, per_hop_timeout).await {
            Ok(Some(body)) => {
                if let Some(next) = find_client_redirect(&body, url) {
                    return Hop::Redirect {
                        status: status_code,
                        kind: RedirectKind::MetaRefresh,
                        next,
                    };
                }
            }
            Ok(None) => {}
            Err(error) => {
                return Hop::Failed {
                    status: Some(status_code),
                    error,
                }
            }
        }
    }

    Hop::Terminal {
        status: status_code,
    }
}

fn redirect_kind_for(status: StatusCode) -> Option<RedirectKind> {
    match status.as_u16() {
        301 | 308 => Some(RedirectKind::Permanent),
        302 | 303 | 307 => Some(RedirectKind::Temporary),
        _ => None,
    }
}

fn is_html(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml")
        })
}

/// Reads the body if it fits in `MAX_META_REFRESH_BODY_SIZE`.
///
/// Oversized or unreadable bodies yield `Ok(None)` and the hop is treated as
/// terminal. A body that does not arrive within the hop timeout is a
/// [`ResolveError::Timeout`].
async fn read_capped_body(
    response: &mut reqwest::Response,
    url: &Url,
    per_hop_timeout: Duration,
) -> Result<Option<String>, ResolveError> {
    if response
        .content_length()
        .is_some_and(|len| len as usize > MAX_META_REFRESH_BODY_SIZE)
    {
        debug!("Skipping client-redirect scan for {url}: body too large");
        return Ok(None);
    }

    let mut body: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() + chunk.len() > MAX_META_REFRESH_BODY_SIZE {
                    debug!("Skipping client-redirect scan for {url}: body too large");
                    return Ok(None);
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) if e.is_timeout() => {
                return Err(categorize_reqwest_error(&e, url.as_str(), per_hop_timeout));
            }
            Err(e) => {
                debug!("Failed to read body of {url}: {e}");
                return Ok(None);
            }
        }
    }
    Ok(Some(String::from_utf8_lossy(&body).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_accepts_http_and_https() {
        assert!(parse_candidate("https://example.com/x?y=1").is_ok());
        assert!(parse_candidate("  http://example.com  ").is_ok());
    }

    #[test]
    fn test_parse_candidate_rejects_malformed() {
        for bad in [
            "",
            "example.com/page",
            "not a url",
            "ftp://example.com/file",
            "mailto:someone@example.com",
            "javascript:alert(1)",
        ] {
            match parse_candidate(bad) {
                Err(ResolveError::MalformedUrl(_)) => {}
                other => panic!("{bad:?} should be malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_redirect_kind_for() {
        assert_eq!(
            redirect_kind_for(StatusCode::MOVED_PERMANENTLY),
            Some(RedirectKind::Permanent)
        );
        assert_eq!(
            redirect_kind_for(StatusCode::PERMANENT_REDIRECT),
            Some(RedirectKind::Permanent)
        );
        assert_eq!(
            redirect_kind_for(StatusCode::FOUND),
            Some(RedirectKind::Temporary)
        );
        assert_eq!(
            redirect_kind_for(StatusCode::SEE_OTHER),
            Some(RedirectKind::Temporary)
        );
        assert_eq!(
            redirect_kind_for(StatusCode::TEMPORARY_REDIRECT),
            Some(RedirectKind::Temporary)
        );
        assert_eq!(redirect_kind_for(StatusCode::NOT_MODIFIED), None);
        assert_eq!(redirect_kind_for(StatusCode::OK), None);
    }

    #[tokio::test]
    async fn test_resolve_link_malformed_makes_no_request() {
        let client = reqwest::Client::new();
        let result = resolve_link(&client, "www.example.com/donate", 10, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ResolveError::MalformedUrl(_))));
    }
}
