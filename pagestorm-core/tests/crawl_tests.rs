// Tests for crawl orchestration

use pagestorm_core::crawl::{
    CrawlOptions, CrawlProgressCallback, DEFAULT_BASE_URL, DEFAULT_START_PATH, execute_crawl,
    extract_url_path, format_request_count,
};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_default_options_match_hardcoded_target() {
    let options = CrawlOptions::default();

    assert_eq!(options.base_url, "http://localhost:8080");
    assert_eq!(options.start_path, "/r/politics");
    assert_eq!(options.threads, 10);
    assert_eq!(options.timeout_secs, None);
    assert_eq!(options.max_pages, None);
    assert_eq!(options.comment_class, "post_comments");
    assert_eq!(options.next_accesskey, "N");
}

#[test]
fn test_start_url_is_concatenated() {
    let options = CrawlOptions::default();
    assert_eq!(options.start_url(), format!("{}{}", DEFAULT_BASE_URL, DEFAULT_START_PATH));
    assert_eq!(options.start_url(), "http://localhost:8080/r/politics");
}

#[test]
fn test_format_request_count() {
    assert_eq!(format_request_count(1), "Request count: 1");
    assert_eq!(format_request_count(1234), "Request count: 1234");
}

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://localhost:8080/"), "/");
    assert_eq!(extract_url_path("http://localhost:8080"), "/");
}

#[test]
fn test_extract_url_path_listing() {
    assert_eq!(extract_url_path("http://localhost:8080/r/politics"), "/r/politics");
}

#[test]
fn test_extract_url_path_drops_query_and_fragment() {
    assert_eq!(
        extract_url_path("http://localhost:8080/r/politics?after=t3_abc#top"),
        "/r/politics"
    );
}

#[test]
fn test_extract_url_path_invalid_url_passthrough() {
    assert_eq!(extract_url_path("not a url"), "not a url");
}

// ============================================================================
// execute_crawl Tests
// ============================================================================

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

fn collecting_callback() -> (CrawlProgressCallback, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let lines_clone = lines.clone();
    let callback: CrawlProgressCallback = Arc::new(move |msg: String| {
        lines_clone.lock().unwrap().push(msg);
    });
    (callback, lines)
}

#[tokio::test]
async fn test_execute_crawl_reports_every_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/politics"))
        .and(query_param("after", "2"))
        .respond_with(html("<p>end</p>"))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/politics"))
        .respond_with(html(
            r#"<a class="post_comments" href="/comments/1">c</a>
               <a class="post_comments" href="/comments/2">c</a>
               <a accesskey="N" href="/r/politics?after=2">NEXT</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/1"))
        .respond_with(html("thread"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/2"))
        .respond_with(html("thread"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = CrawlOptions {
        base_url: mock_server.uri(),
        ..CrawlOptions::default()
    };
    let (callback, lines) = collecting_callback();

    let summary = execute_crawl(options, Some(callback)).await.unwrap();

    assert_eq!(summary.start_url, format!("{}/r/politics", mock_server.uri()));
    assert_eq!(summary.pages_visited(), 2);
    assert_eq!(summary.comments_fetched(), 2);
    assert_eq!(summary.comments_failed(), 0);
    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.threads, 10);

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            "Request count: 1",
            "Request count: 2",
            "Request count: 3",
            "Request count: 4",
        ]
    );
}

#[tokio::test]
async fn test_execute_crawl_custom_markers_and_page_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forum"))
        .respond_with(html(
            r#"<a class="thread-link" href="/t/1">t</a>
               <a accesskey="J" href="/forum">more</a>"#,
        ))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/t/1"))
        .respond_with(html("thread"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let options = CrawlOptions {
        base_url: mock_server.uri(),
        start_path: "/forum".to_string(),
        threads: 3,
        max_pages: Some(2),
        comment_class: "thread-link".to_string(),
        next_accesskey: "J".to_string(),
        ..CrawlOptions::default()
    };

    let summary = execute_crawl(options, None).await.unwrap();

    assert_eq!(summary.pages_visited(), 2);
    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.threads, 3);
}

#[tokio::test]
async fn test_execute_crawl_invalid_base_url() {
    let options = CrawlOptions {
        base_url: "localhost".to_string(),
        ..CrawlOptions::default()
    };

    let result = execute_crawl(options, None).await;
    let err = result.unwrap_err();
    assert!(err.contains("Invalid URL"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_execute_crawl_unreachable_server_fails() {
    let options = CrawlOptions {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: Some(5),
        ..CrawlOptions::default()
    };
    let (callback, lines) = collecting_callback();

    let result = execute_crawl(options, Some(callback)).await;

    assert!(result.is_err());
    assert!(lines.lock().unwrap().is_empty());
}
