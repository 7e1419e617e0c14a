//! Browser-like request headers.

/// Request headers applied to every hop.
///
/// Tracking redirectors often answer bare HTTP clients with a 403 or a
/// landing page instead of the redirect a mail client would receive, so each
/// hop looks like a Chrome navigation. `Accept-Encoding` is left to reqwest.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-dest"),
                "document",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-mode"),
                "navigate",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-site"),
                "none",
            )
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_request_builder_sets_headers() {
        let client = reqwest::Client::new();
        let request = RequestHeaders::apply_to_request_builder(client.get("https://a.test/"))
            .build()
            .expect("request should build");
        let headers = request.headers();
        assert!(headers
            .get(reqwest::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html")));
        assert_eq!(
            headers
                .get("sec-fetch-mode")
                .and_then(|v| v.to_str().ok()),
            Some("navigate")
        );
        assert_eq!(
            headers
                .get(reqwest::header::UPGRADE_INSECURE_REQUESTS)
                .and_then(|v| v.to_str().ok()),
            Some("1")
        );
    }
}
