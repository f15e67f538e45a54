//! End-to-end crawl tests against mock HTTP servers.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use webminer::url::safe_filename;
use webminer::{CrawlOptions, Crawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs a crawl on a blocking-friendly thread and returns its stats.
async fn run_crawl(seed: String, options: CrawlOptions) -> webminer::CrawlStats {
    tokio::task::spawn_blocking(move || {
        Crawler::new(seed, options)
            .expect("failed to build crawler")
            .crawl()
            .expect("crawl failed")
    })
    .await
    .expect("crawl task panicked")
}

fn html_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = fs::read_dir(dir)
        .expect("failed to read output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_seed_only_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><a href="/b"></a></html>"#),
        )
        .mount(&server)
        .await;

    let seed = format!("{}/a", server.uri());
    let output = tempfile::tempdir().unwrap();
    let stats = run_crawl(
        seed.clone(),
        CrawlOptions {
            max_pages: 1,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: 1,
        },
    )
    .await;

    assert_eq!(stats.downloaded, 1);

    let files = html_files(output.path());
    assert_eq!(files, vec![format!("{}.html", safe_filename(&seed))]);

    // The linked page was admitted to the frontier even though the budget
    // stopped the crawl before fetching it.
    assert!(stats.visited.contains(&seed));
    assert!(stats.visited.contains(&format!("{}/b", server.uri())));
}

#[tokio::test]
async fn test_same_host_scope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html>
                <a href="http://other.test/x">away</a>
                <a href="/local">here</a>
            </html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/local"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>local</p></html>"))
        .mount(&server)
        .await;

    let seed = format!("{}/start", server.uri());
    let output = tempfile::tempdir().unwrap();
    let stats = run_crawl(
        seed,
        CrawlOptions {
            max_pages: -1,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: 2,
        },
    )
    .await;

    assert_eq!(stats.downloaded, 2);
    assert!(!stats.visited.iter().any(|url| url.contains("other.test")));
    assert!(!html_files(output.path())
        .iter()
        .any(|name| name.contains("other.test")));
}

#[tokio::test]
async fn test_budget_enforcement() {
    let server = MockServer::start().await;

    let fanout: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html>{}</html>", fanout)),
        )
        .mount(&server)
        .await;

    for i in 0..20 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html><a href="/">home</a></html>"#),
            )
            .mount(&server)
            .await;
    }

    let max_pages = 5;
    let threads = 4;
    let seed = format!("{}/", server.uri());
    let output = tempfile::tempdir().unwrap();
    let stats = run_crawl(
        seed,
        CrawlOptions {
            max_pages,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: threads,
        },
    )
    .await;

    // Workers may race past the budget by at most threads - 1 pages.
    let limit = (max_pages as usize) + threads - 1;
    assert!(stats.downloaded >= max_pages as usize);
    assert!(
        stats.downloaded <= limit,
        "downloaded {} pages, limit {}",
        stats.downloaded,
        limit
    );
    assert!(html_files(output.path()).len() <= limit);

    // Everything downloaded stayed on the seed origin.
    let origin_stem = safe_filename(&server.uri());
    for name in html_files(output.path()) {
        assert!(
            name.starts_with(&origin_stem),
            "unexpected file {}",
            name
        );
    }
}

#[tokio::test]
async fn test_filenames_are_safe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/b/c"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>x</p></html>"))
        .mount(&server)
        .await;

    let seed = format!("{}/a/b/c", server.uri());
    let output = tempfile::tempdir().unwrap();
    run_crawl(
        seed,
        CrawlOptions {
            max_pages: 1,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: 1,
        },
    )
    .await;

    for name in html_files(output.path()) {
        assert!(!name.contains(':'), "colon in {}", name);
        assert!(!name.contains('/'), "slash in {}", name);
    }
}

#[tokio::test]
async fn test_failed_fetch_does_not_consume_budget() {
    let server = MockServer::start().await;
    // /dead returns an empty body; /alive is a real page.
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><a href="/dead"></a><a href="/alive"></a></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>ok</p></html>"))
        .mount(&server)
        .await;

    let seed = format!("{}/start", server.uri());
    let output = tempfile::tempdir().unwrap();
    let stats = run_crawl(
        seed,
        CrawlOptions {
            max_pages: 2,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: 1,
        },
    )
    .await;

    // The empty /dead response is skipped; /start and /alive fill the
    // budget of two.
    assert_eq!(stats.downloaded, 2);
    let files = html_files(output.path());
    assert_eq!(files.len(), 2);
    assert!(!files.iter().any(|name| name.ends_with("_dead.html")));
}

#[tokio::test]
async fn test_crawl_terminates_when_frontier_drains() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/only"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>done</p></html>"))
        .mount(&server)
        .await;

    let seed = format!("{}/only", server.uri());
    let output = tempfile::tempdir().unwrap();

    // Unbounded budget: termination must come from the drained frontier.
    let stats = run_crawl(
        seed,
        CrawlOptions {
            max_pages: -1,
            output_dir: output.path().to_path_buf(),
            concurrent_threads: 3,
        },
    )
    .await;

    assert_eq!(stats.downloaded, 1);
    let visited: HashSet<String> = stats.visited;
    assert_eq!(visited.len(), 1);
}
