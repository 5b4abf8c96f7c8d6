//! Integration tests for the window pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run complete
//! windows end-to-end into a real CSV file and audit log.

use paged_extract::config::{Config, ExtractionConfig, FetcherConfig, InputConfig, OutputConfig};
use paged_extract::crawler::{run_window, CONTENT_NOT_FOUND, FLAG_SET, META_NOT_FOUND};
use paged_extract::input::{load_urls, PageWindow};
use paged_extract::output::{FETCH_ERROR_STATUS, HEADER};
use paged_extract::ScrapeError;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html>
<head>
    <meta name="title" content="Quarterly &quot;Results&quot;">
    <meta name="description" content="Line one
line two">
    <meta name="assetid" content="1001">
    <link rel="stylesheet" href="/assets/swe-styles.css">
</head>
<body class="article wide">
    <div id="main-content">
        <nav class="breadcrumb">Home / News</nav>
        <h1>Quarterly   Results</h1>
        <p>Revenue was "up",
        as expected.</p>
        <footer>Last reviewed</footer>
    </div>
</body>
</html>"#;

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &Path, delay_ms: u64) -> Config {
    Config {
        input: InputConfig {
            urls_path: dir.join("urls.txt").display().to_string(),
        },
        fetcher: FetcherConfig {
            request_delay_ms: delay_ms,
            timeout_secs: 2,
            max_redirects: 5,
            user_agent: "TestBot/1.0".to_string(),
        },
        extraction: ExtractionConfig::default(),
        output: OutputConfig {
            csv_path: dir.join("results.csv").display().to_string(),
            log_path: dir.join("extraction.log").display().to_string(),
            page_size: 50,
        },
    }
}

fn write_urls(config: &Config, urls: &[String]) -> Vec<String> {
    std::fs::write(&config.input.urls_path, urls.join("\n\n")).expect("write url list");
    load_urls(Path::new(&config.input.urls_path)).expect("load url list")
}

fn read_rows(path: &str) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open results");
    reader
        .records()
        .map(|r| r.expect("well-formed row"))
        .collect()
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_html_and_not_found_window() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/article", ARTICLE).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html>missing</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 10);
    let urls = write_urls(
        &config,
        &[
            format!("{}/article", base),
            format!("{}/gone", base),
            format!("{}/never-fetched", base),
        ],
    );
    assert_eq!(urls.len(), 3);

    let report = run_window(&config, &urls, PageWindow::new(0, 2).unwrap(), "batch-a".to_string())
        .await
        .expect("window should succeed");
    assert_eq!(report.processed(), 2);
    assert_eq!(report.stats.extracted, 1);
    assert_eq!(report.stats.http_errors, 1);

    let rows = read_rows(&config.output.csv_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].iter().collect::<Vec<_>>(), HEADER.to_vec());

    let article = &rows[1];
    assert_eq!(article.len(), HEADER.len());
    assert_eq!(&article[0], "1");
    assert_eq!(&article[1], "batch-a");
    assert_eq!(&article[2], format!("{}/article", base));
    assert_eq!(&article[3], format!("{}/article", base));
    assert_eq!(&article[4], "200");
    assert_eq!(&article[5], "false");
    assert_eq!(&article[7], FLAG_SET);
    assert_eq!(
        &article[8],
        "Quarterly Results Revenue was \"up\", as expected."
    );
    assert_eq!(&article[9], "article wide");
    assert_eq!(&article[10], "Quarterly \"Results\"");
    assert_eq!(&article[11], "Line one line two");
    assert_eq!(&article[12], META_NOT_FOUND);
    assert_eq!(&article[13], META_NOT_FOUND);
    assert_eq!(&article[14], "1001");
    assert_eq!(&article[15], "");

    let gone = &rows[2];
    assert_eq!(&gone[0], "2");
    assert_eq!(&gone[4], "404");
    for column in 7..=14 {
        assert_eq!(&gone[column], "", "column {} should be empty", HEADER[column]);
    }
    assert_eq!(&gone[15], "");

    let log = std::fs::read_to_string(&config.output.log_path).unwrap();
    assert!(log.trim_end().ends_with("Processed URLs 1 to 2 (2 URLs), batch batch-a"));
}

#[tokio::test]
async fn test_consecutive_windows_append_without_second_header() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/page", "<html><body><p>no main</p></body></html>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let list: Vec<String> = (0..5).map(|i| format!("{}/page?n={}", base, i)).collect();
    let urls = write_urls(&config, &list);

    run_window(&config, &urls, PageWindow::new(0, 3).unwrap(), "run-1".to_string())
        .await
        .unwrap();
    run_window(&config, &urls, PageWindow::new(3, 3).unwrap(), "run-2".to_string())
        .await
        .unwrap();

    let rows = read_rows(&config.output.csv_path);
    assert_eq!(rows.len(), 1 + 5);
    assert_eq!(rows.iter().filter(|r| &r[0] == "row").count(), 1);

    let numbers: Vec<&str> = rows[1..].iter().map(|r| r.get(0).unwrap()).collect();
    assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
    let batches: Vec<&str> = rows[1..].iter().map(|r| r.get(1).unwrap()).collect();
    assert_eq!(batches, vec!["run-1", "run-1", "run-1", "run-2", "run-2"]);
    assert!(rows[1..].iter().all(|r| &r[8] == CONTENT_NOT_FOUND));

    let log = std::fs::read_to_string(&config.output.log_path).unwrap();
    assert_eq!(log.lines().count(), 2);
}

#[tokio::test]
async fn test_window_past_end_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let urls = write_urls(&config, &["http://127.0.0.1:1/".to_string()]);

    let report = run_window(&config, &urls, PageWindow::new(5, 10).unwrap(), "noop".to_string())
        .await
        .unwrap();

    assert_eq!(report.processed(), 0);
    assert!(!Path::new(&config.output.csv_path).exists());
    assert!(!Path::new(&config.output.log_path).exists());
}

#[tokio::test]
async fn test_fetch_errors_are_recorded_not_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/ok", "<html><body><div id=\"main-content\">fine</div></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let urls = write_urls(
        &config,
        &[
            format!("{}/slow", base),
            format!("http://127.0.0.1:{}/", closed_port),
            format!("{}/ok", base),
        ],
    );

    let report = run_window(&config, &urls, PageWindow::new(0, 3).unwrap(), "b".to_string())
        .await
        .unwrap();
    assert_eq!(report.stats.failed(), 2);

    let rows = read_rows(&config.output.csv_path);
    assert_eq!(rows.len(), 4);

    assert_eq!(&rows[1][4], FETCH_ERROR_STATUS);
    assert!(rows[1][15].starts_with("Timeout: "));
    assert_eq!(&rows[1][3], "");
    assert_eq!(&rows[1][8], "");

    assert_eq!(&rows[2][4], FETCH_ERROR_STATUS);
    assert!(!rows[2][15].is_empty());

    assert_eq!(&rows[3][4], "200");
    assert_eq!(&rows[3][8], "fine");
    assert_eq!(&rows[3][15], "");
}

#[tokio::test]
async fn test_non_html_is_not_extracted() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.7 swe-styles.css".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 0);
    let urls = write_urls(&config, &[format!("{}/report.pdf", base)]);

    run_window(&config, &urls, PageWindow::new(0, 1).unwrap(), "b".to_string())
        .await
        .unwrap();

    let rows = read_rows(&config.output.csv_path);
    assert_eq!(&rows[1][4], "200");
    assert_eq!(&rows[1][6], "application/pdf");
    assert_eq!(&rows[1][7], "");
    assert_eq!(&rows[1][8], "");
    assert_eq!(&rows[1][15], "");
}

#[tokio::test]
async fn test_requests_are_spaced_by_configured_delay() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), 100);
    let list: Vec<String> = (0..3).map(|i| format!("{}/p{}", base, i)).collect();
    let urls = write_urls(&config, &list);

    let start = Instant::now();
    run_window(&config, &urls, PageWindow::new(0, 3).unwrap(), "b".to_string())
        .await
        .unwrap();

    // Two gaps between three requests
    assert!(start.elapsed() >= Duration::from_millis(190));
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html></html>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), 0);
    config.output.csv_path = dir
        .path()
        .join("no-such-dir")
        .join("results.csv")
        .display()
        .to_string();
    let urls = write_urls(&config, &[format!("{}/", server.uri())]);

    let result = run_window(&config, &urls, PageWindow::new(0, 1).unwrap(), "b".to_string()).await;

    assert!(matches!(result, Err(ScrapeError::Persistence(_))));
}
