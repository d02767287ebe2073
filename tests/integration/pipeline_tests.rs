//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the comics site and run the
//! full walk, resolve and download cycle against a temporary directory.

use comic_harvester::config::{
    AuditConfig, CategoryEntry, Config, CrawlerConfig, InventoryConfig, OutputConfig, SiteConfig,
    UserAgentConfig,
};
use comic_harvester::harvest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY_PATH: &str = "/category/dc-comics";

/// Creates a test configuration with one category on the mock server
fn create_test_config(base_url: &str, download_dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_downloads: 2,
            page_timeout_secs: 5,
            asset_timeout_secs: 5,
            max_pages: None,
            show_progress: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        site: SiteConfig::default(),
        output: OutputConfig {
            download_dir: download_dir.to_string_lossy().into_owned(),
        },
        inventory: InventoryConfig {
            enabled: false,
            roots: vec![],
            subfolders: vec![],
        },
        audit: AuditConfig::default(),
        categories: vec![CategoryEntry {
            name: "DC".to_string(),
            url: format!("{}{}", base_url, CATEGORY_PATH),
        }],
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn mount_asset(server: &MockServer, asset_path: &str, bytes: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read download dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_harvest_downloads_single_category() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        CATEGORY_PATH,
        r#"<a href="/dc/item-a/">Item A</a>
           <a href="/marvel/item-b/">Item B</a>
           <a href="/about/">About</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/dc/item-a/",
        r#"<h1>Item A</h1><a href="/dlds/item-a">Download Now</a>"#,
    )
    .await;
    mount_page(&mock_server, "/marvel/item-b/", "<h1>Item B</h1><p>No link</p>").await;
    mount_asset(&mock_server, "/dlds/item-a", b"archive bytes of item a", 1).await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path());
    let summary = harvest(config).await.expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.items_found, 2);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.missing_asset_link, 1);
    assert!(summary.finished_at.is_some());

    assert_eq!(file_names(temp_dir.path()), vec!["item-a.cbz".to_string()]);
    let content = fs::read(temp_dir.path().join("item-a.cbz")).unwrap();
    assert_eq!(content, b"archive bytes of item a");
}

#[tokio::test]
async fn test_second_run_writes_nothing() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_page(&mock_server, CATEGORY_PATH, r#"<a href="/dc/item-a/">Item A</a>"#).await;
    mount_page(
        &mock_server,
        "/dc/item-a/",
        r#"<a href="/dlds/item-a">Download Now</a>"#,
    )
    .await;
    // Asset must be transferred exactly once across both runs
    mount_asset(&mock_server, "/dlds/item-a", b"first and only copy", 1).await;

    let first = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("First harvest failed");
    assert_eq!(first.downloaded, 1);

    let modified = fs::metadata(temp_dir.path().join("item-a.cbz"))
        .unwrap()
        .modified()
        .unwrap();

    let second = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Second harvest failed");
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.already_present, 1);

    let modified_after = fs::metadata(temp_dir.path().join("item-a.cbz"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(modified, modified_after);
}

#[tokio::test]
async fn test_item_on_several_pages_is_downloaded_once() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    let listing = format!(
        r#"<a href="/dc/item-a/">Item A</a>
           <div class="wp-pagenavi">
             <a href="{0}/page/2/">2</a>
           </div>"#,
        CATEGORY_PATH
    );
    mount_page(&mock_server, CATEGORY_PATH, &listing).await;
    mount_page(&mock_server, &format!("{}/page/2/", CATEGORY_PATH), &listing).await;

    Mock::given(method("GET"))
        .and(path("/dc/item-a/"))
        .respond_with(html_page(r#"<a href="/dlds/item-a">Download Now</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_asset(&mock_server, "/dlds/item-a", b"deduplicated", 1).await;

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.items_found, 1);
    assert_eq!(summary.downloaded, 1);
}

#[tokio::test]
async fn test_comment_anchor_is_never_written() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        CATEGORY_PATH,
        r#"<a href="/dc/item-a/">Item A</a>
           <a href="/dc/item-a/#comments">12 Comments</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/dc/item-a/",
        r#"<a href="/dlds/item-a">Download Now</a>"#,
    )
    .await;
    mount_asset(&mock_server, "/dlds/item-a", b"real comic", 1).await;

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.items_found, 2);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.navigation_artifacts, 1);
    assert_eq!(file_names(temp_dir.path()), vec!["item-a.cbz".to_string()]);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_the_walk() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    let pagination = format!(
        r#"<div class="wp-pagenavi">
             <a href="{0}/page/2/">2</a>
             <a href="{0}/page/3/">3</a>
           </div>"#,
        CATEGORY_PATH
    );
    mount_page(
        &mock_server,
        CATEGORY_PATH,
        &format!(r#"<a href="/dc/item-a/">A</a>{}"#, pagination),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/page/2/", CATEGORY_PATH)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        &format!("{}/page/3/", CATEGORY_PATH),
        &format!(r#"<a href="/dc/item-c/">C</a>{}"#, pagination),
    )
    .await;

    for item in ["item-a", "item-c"] {
        mount_page(
            &mock_server,
            &format!("/dc/{}/", item),
            &format!(r#"<a href="/dlds/{}">Download Now</a>"#, item),
        )
        .await;
        mount_asset(&mock_server, &format!("/dlds/{}", item), item.as_bytes(), 1).await;
    }

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.downloaded, 2);
    assert_eq!(
        file_names(temp_dir.path()),
        vec!["item-a.cbz".to_string(), "item-c.cbz".to_string()]
    );
}

#[tokio::test]
async fn test_failed_asset_leaves_no_file_behind() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_page(&mock_server, CATEGORY_PATH, r#"<a href="/dc/item-a/">Item A</a>"#).await;
    mount_page(
        &mock_server,
        "/dc/item-a/",
        r#"<a href="/dlds/item-a">Download Now</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/dlds/item-a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.downloaded, 0);
    assert_eq!(summary.fetch_failed, 1);
    assert!(file_names(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_stale_partial_files_are_swept() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("item-a.cbz.part"), b"interrupted").unwrap();
    fs::write(temp_dir.path().join("movie.mkv.part"), b"someone else's").unwrap();

    mount_page(&mock_server, CATEGORY_PATH, r#"<a href="/dc/item-a/">Item A</a>"#).await;
    mount_page(
        &mock_server,
        "/dc/item-a/",
        r#"<a href="/dlds/item-a">Download Now</a>"#,
    )
    .await;
    mount_asset(&mock_server, "/dlds/item-a", b"complete copy", 1).await;

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.partials_swept, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(
        file_names(temp_dir.path()),
        vec!["item-a.cbz".to_string(), "movie.mkv.part".to_string()]
    );
}

#[tokio::test]
async fn test_inventory_skips_known_items() {
    let mock_server = MockServer::start().await;
    let download_dir = TempDir::new().unwrap();
    let storage_root = TempDir::new().unwrap();
    fs::create_dir_all(storage_root.path().join("Books/DC")).unwrap();
    fs::write(storage_root.path().join("Books/DC/item-a.cbr"), b"old copy").unwrap();

    mount_page(
        &mock_server,
        CATEGORY_PATH,
        r#"<a href="/dc/item-a/">A</a><a href="/dc/item-b/">B</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/dc/item-a/"))
        .respond_with(html_page(r#"<a href="/dlds/item-a">Download Now</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/dc/item-b/",
        r#"<a href="/dlds/item-b">Download Now</a>"#,
    )
    .await;
    mount_asset(&mock_server, "/dlds/item-b", b"new comic", 1).await;

    let mut config = create_test_config(&mock_server.uri(), download_dir.path());
    config.inventory = InventoryConfig {
        enabled: true,
        roots: vec![storage_root.path().to_string_lossy().into_owned()],
        subfolders: vec!["Books".to_string()],
    };

    let summary = harvest(config).await.expect("Harvest failed");

    assert_eq!(summary.items_found, 2);
    assert_eq!(summary.known_in_inventory, 1);
    assert_eq!(summary.downloaded, 1);
    assert_eq!(file_names(download_dir.path()), vec!["item-b.cbz".to_string()]);
}

#[tokio::test]
async fn test_cbr_extension_follows_asset_url() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_page(&mock_server, CATEGORY_PATH, r#"<a href="/dc/item-r/">Item R</a>"#).await;
    mount_page(
        &mock_server,
        "/dc/item-r/",
        r#"<a href="/dlds/files/item-r.cbr">Download Now</a>"#,
    )
    .await;
    mount_asset(&mock_server, "/dlds/files/item-r.cbr", b"rar bytes", 1).await;

    let summary = harvest(create_test_config(&mock_server.uri(), temp_dir.path()))
        .await
        .expect("Harvest failed");

    assert_eq!(summary.downloaded, 1);
    assert_eq!(file_names(temp_dir.path()), vec!["item-r.cbr".to_string()]);
}
