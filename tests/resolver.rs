//! Redirect resolution against local mock servers.

mod helpers;

use std::time::Duration;

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use helpers::{closed_port_url, start_mock_server, test_resolver};
use rip_unwrap::{test_url, ProcessingStats, RedirectKind, ResolveError, ResolveLink};

fn redirect(status: StatusCode, location: &str) -> axum::response::Response {
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

async fn start_redirect_fixture() -> String {
    let app = Router::new()
        .route("/", get(|| async { "home" }))
        .route("/landing", get(|| async { "landing page" }))
        .route(
            "/moved",
            get(|| async { redirect(StatusCode::MOVED_PERMANENTLY, "/landing?utm_source=email") }),
        )
        .route(
            "/found",
            get(|| async { redirect(StatusCode::FOUND, "/moved") }),
        )
        .route(
            "/chain/{hop}",
            get(|Path(hop): Path<usize>| async move {
                if hop > 0 {
                    redirect(StatusCode::FOUND, &format!("/chain/{}", hop - 1))
                } else {
                    "end of chain".into_response()
                }
            }),
        )
        .route("/loop/a", get(|| async { redirect(StatusCode::FOUND, "/loop/b?from=a") }))
        .route("/loop/b", get(|| async { redirect(StatusCode::FOUND, "/loop/a") }))
        .route(
            "/no-location",
            get(|| async { StatusCode::FOUND.into_response() }),
        )
        .route(
            "/meta",
            get(|| async {
                Html(
                    r#"<html><head><meta http-equiv="refresh" content="0; url=/landing?ref=meta"></head><body></body></html>"#,
                )
            }),
        )
        .route(
            "/script",
            get(|| async {
                Html(r#"<html><body><script>window.location.replace("/landing");</script></body></html>"#)
            }),
        )
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "too late"
            }),
        );
    start_mock_server(app).await
}

#[tokio::test]
async fn no_redirect_is_terminal_and_unchanged() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/landing"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert!(!resolution.changed);
    assert_eq!(resolution.final_url, format!("{base}/landing"));
    assert_eq!(resolution.steps.len(), 1);
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::Terminal);
    assert_eq!(resolution.steps[0].status_code, Some(200));
}

#[tokio::test]
async fn query_parameters_are_stripped_from_the_destination() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/found?tracking=abc"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.terminal_url, format!("{base}/landing?utm_source=email"));
    assert_eq!(resolution.final_url, format!("{base}/landing"));
    assert_eq!(resolution.stripped_original, format!("{base}/found"));
    assert!(resolution.changed);
    assert!(!resolution.final_url.contains('?'));

    let kinds: Vec<RedirectKind> = resolution.steps.iter().map(|s| s.redirect_kind).collect();
    assert_eq!(
        kinds,
        vec![RedirectKind::Temporary, RedirectKind::Permanent, RedirectKind::Terminal]
    );
    let indexes: Vec<usize> = resolution.steps.iter().map(|s| s.step_index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
}

#[tokio::test]
async fn query_only_difference_counts_as_unchanged() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/landing?utm_campaign=x"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.final_url, format!("{base}/landing"));
    assert!(!resolution.changed);
}

#[tokio::test]
async fn chain_is_bounded_by_max_redirects() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(3, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/chain/10"))
        .await
        .expect("resolve");

    assert_eq!(resolution.error, Some(ResolveError::TooManyRedirects(3)));
    assert_eq!(resolution.steps.len(), 3);
    assert_eq!(resolution.final_url, format!("{base}/chain/7"));
    assert!(resolution.steps[2].error.is_some());
}

#[tokio::test]
async fn chain_within_limit_completes() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/chain/4"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.steps.len(), 5);
    assert_eq!(resolution.final_url, format!("{base}/chain/0"));
}

#[tokio::test]
async fn loop_is_detected_and_ends_at_last_distinct_url() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/loop/a"))
        .await
        .expect("resolve");

    assert!(matches!(resolution.error, Some(ResolveError::RedirectLoop(_))));
    assert_eq!(resolution.steps.len(), 2);
    assert_eq!(resolution.terminal_url, format!("{base}/loop/b?from=a"));
    assert_eq!(resolution.final_url, format!("{base}/loop/b"));
    assert!(resolution.steps[1].error.is_some());
}

#[tokio::test]
async fn redirect_without_location_is_terminal() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/no-location"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.steps.len(), 1);
    assert_eq!(resolution.steps[0].status_code, Some(302));
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::Terminal);
}

#[tokio::test]
async fn error_status_is_terminal_not_a_failure() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/missing"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.steps[0].status_code, Some(404));
}

#[tokio::test]
async fn meta_refresh_is_followed() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/meta"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::MetaRefresh);
    assert_eq!(resolution.final_url, format!("{base}/landing"));
}

#[tokio::test]
async fn script_location_redirect_is_followed() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver
        .resolve(&format!("{base}/script"))
        .await
        .expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::MetaRefresh);
    assert_eq!(resolution.final_url, format!("{base}/landing"));
}

#[tokio::test]
async fn hop_timeout_is_reported_in_the_resolution() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_millis(300));

    let resolution = resolver
        .resolve(&format!("{base}/slow"))
        .await
        .expect("timeouts are not Err");

    assert!(matches!(resolution.error, Some(ResolveError::Timeout { .. })));
    assert_eq!(resolution.steps.len(), 1);
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::Error);
    assert_eq!(resolution.steps[0].status_code, None);
    assert_eq!(resolution.final_url, format!("{base}/slow"));
}

#[tokio::test]
async fn host_only_url_keeps_its_form_when_nothing_redirects() {
    let base = start_redirect_fixture().await;
    let resolver = test_resolver(10, Duration::from_secs(5));
    let candidate = format!("{base}?utm_source=x&email=a@b.com");

    let resolution = resolver.resolve(&candidate).await.expect("resolve");

    assert!(resolution.is_complete());
    assert_eq!(resolution.terminal_url, candidate);
    assert_eq!(resolution.final_url, base);
    assert_eq!(resolution.final_url, resolution.stripped_original);
    assert!(!resolution.changed);

    let report = test_url(&resolver, &ProcessingStats::new(), &candidate)
        .await
        .expect("report");
    assert_eq!(report.original.stripped, base);
    assert_eq!(report.final_url.stripped, report.original.stripped);
    assert!(!report.final_url.changed);
}

/// Serves one HTML response whose body never finishes arriving.
async fn start_stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stalled server");
    let addr = listener.local_addr().expect("Failed to read stalled server address");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 4096\r\n\r\n<html><head>";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(5)).await;
            });
        }
    });
    format!("http://{}/stalled", addr)
}

#[tokio::test]
async fn stalled_html_body_is_a_timeout() {
    let url = start_stalled_body_server().await;
    let resolver = test_resolver(10, Duration::from_millis(500));

    let resolution = resolver.resolve(&url).await.expect("timeouts are not Err");

    assert!(matches!(resolution.error, Some(ResolveError::Timeout { .. })));
    assert_eq!(resolution.steps.len(), 1);
    assert_eq!(resolution.steps[0].redirect_kind, RedirectKind::Error);
    assert_eq!(resolution.steps[0].status_code, Some(200));
    assert_eq!(resolution.final_url, url);
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    let url = closed_port_url().await;
    let resolver = test_resolver(10, Duration::from_secs(5));

    let resolution = resolver.resolve(&url).await.expect("network errors are not Err");

    assert!(matches!(resolution.error, Some(ResolveError::NetworkError { .. })));
    assert!(!resolution.changed);
}

#[tokio::test]
async fn malformed_candidates_fail_fast() {
    let resolver = test_resolver(10, Duration::from_secs(5));
    for bad in ["", "www.example.com/donate", "mailto:a@b.test", "http://"] {
        let result = resolver.resolve(bad).await;
        assert!(
            matches!(result, Err(ResolveError::MalformedUrl(_))),
            "{bad:?} should be malformed"
        );
    }
}
