//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! full collect, fetch and export cycle over the plain HTTP page source.

use job_harvest::config::Config;
use job_harvest::crawler::{Coordinator, CrawlSettings};
use job_harvest::output::{ExportFormat, FileExporter, TermOutcome};
use job_harvest::record::{DetailLevel, SearchTerm};
use job_harvest::source::HttpPageSource;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/id/opportunities/jobs/explore";

/// Creates a configuration pointing the site at the mock server
fn create_test_config(base_url: &str, results_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.output.results_dir = results_dir.path().join("results").display().to_string();
    config.output.fallback_dir = results_dir.path().join("fallback").display().to_string();
    config
}

fn settings(config: &Config, level: DetailLevel) -> CrawlSettings {
    CrawlSettings::from_config(config)
        .expect("Failed to build settings")
        .with_level(level)
        .without_delays()
}

fn listing_page(cards: &[(&str, &str)]) -> String {
    let cards: String = cards
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<div class="JobCardsc__JobcardContainer-sc-hmqj50-0">
                    <a class="CompactOpportunityCardsc__JobCardTitleNoStyleAnchor-sc-dkg8my-12" href="{}">{}</a>
                    <a class="CompactOpportunityCardsc__CompanyLink-sc-dkg8my-14">Acme</a>
                    <div class="CompactOpportunityCardsc__OpportunityInfo-sc-dkg8my-16"><span>Jakarta</span></div>
                </div>"#,
                href, title
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn detail_page(title: &str, skills: &[&str]) -> String {
    let skills: String = skills
        .iter()
        .map(|s| format!(r#"<label class="TagStyle__TagContent-sc-66xi2f-0">{}</label>"#, s))
        .collect();
    format!(
        r#"<html><body>
            <h1 class="TopFoldsc__JobOverViewTitle-sc-1fbktg5-3">{}</h1>
            <span class="TopFoldsc__BasicSalary-sc-1fbktg5-13">IDR 10.000.000</span>
            <div class="Opportunitysc__SkillsContainer-sc-gb4ubh-10">{}</div>
            <div class="DraftjsReadersc__ContentContainer-sc-zm0o3p-0"><p>Build things.</p><p>Ship them.</p></div>
        </body></html>"#,
        title, skills
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts a two-page listing for "engineer": one page of cards, then an empty page
async fn mount_engineer_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("keyword", "engineer"))
        .and(query_param("page", "1"))
        .respond_with(html(listing_page(&[
            ("Backend Engineer", "/id/opportunities/jobs/backend-engineer/1"),
            ("Office Manager", "/id/opportunities/jobs/office-manager/2"),
            ("Data Engineer", "/id/opportunities/jobs/data-engineer/3"),
        ])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("keyword", "engineer"))
        .and(query_param("page", "2"))
        .respond_with(html(listing_page(&[])))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_exports_relevant_jobs_in_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), &dir);

    mount_engineer_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/backend-engineer/1"))
        .respond_with(html(detail_page("Backend Engineer", &["Rust", "SQL"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/data-engineer/3"))
        .respond_with(html(detail_page("Data Engineer", &["Python"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/office-manager/2"))
        .respond_with(html(detail_page("Office Manager", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut source = HttpPageSource::new(&config.browser).expect("Failed to build source");
    let mut exporter = FileExporter::from_config(&config.output);
    let terms = SearchTerm::parse_list("engineer");

    let summary = Coordinator::new(
        &mut source,
        &mut exporter,
        settings(&config, DetailLevel::Structured),
    )
    .run(&terms)
    .await;

    assert_eq!(summary.reports.len(), 1);
    let report = &summary.reports[0];
    // the empty second page ends pagination before counting
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.candidates_found, 2);
    assert_eq!(report.records, 2);

    let exported = report.exported_path().expect("term should be exported");
    assert!(exported.starts_with(dir.path().join("results").join("engineer")));

    let json = std::fs::read_to_string(exported).expect("Failed to read export");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    let rows = value.as_array().expect("export is an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["title"], "Backend Engineer");
    assert_eq!(rows[0]["skills"], serde_json::json!(["Rust", "SQL"]));
    assert_eq!(rows[0]["salary"], "IDR 10.000.000");
    assert_eq!(rows[1]["title"], "Data Engineer");
    assert_eq!(
        rows[0]["url"],
        format!("{}/id/opportunities/jobs/backend-engineer/1", server.uri())
    );
}

#[tokio::test]
async fn test_summary_level_makes_no_detail_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), &dir);

    mount_engineer_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/backend-engineer/1"))
        .respond_with(html(detail_page("Backend Engineer", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut source = HttpPageSource::new(&config.browser).expect("Failed to build source");
    let mut exporter =
        FileExporter::from_config(&config.output).with_format(ExportFormat::Csv);
    let terms = SearchTerm::parse_list("engineer");

    let summary = Coordinator::new(
        &mut source,
        &mut exporter,
        settings(&config, DetailLevel::Summary),
    )
    .run(&terms)
    .await;

    let exported = summary.reports[0]
        .exported_path()
        .expect("term should be exported");
    let mut reader = csv::Reader::from_path(exported).expect("Failed to open CSV");
    let headers = reader.headers().expect("CSV header").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["title", "company", "salary", "location", "freshness", "url", "timestamp"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("CSV row")).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Backend Engineer");
    assert_eq!(&rows[0][1], "Acme");
    assert_eq!(&rows[0][2], "Undisclosed");
    assert_eq!(&rows[0][3], "Jakarta");
    assert_eq!(&rows[0][4], "No Data");
}

#[tokio::test]
async fn test_failing_detail_page_is_retried_then_dropped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), &dir);

    mount_engineer_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/backend-engineer/1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/opportunities/jobs/data-engineer/3"))
        .respond_with(html(detail_page("Data Engineer", &["Python"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = HttpPageSource::new(&config.browser).expect("Failed to build source");
    let mut exporter = FileExporter::from_config(&config.output);
    let terms = SearchTerm::parse_list("engineer");

    let summary = Coordinator::new(
        &mut source,
        &mut exporter,
        settings(&config, DetailLevel::Full),
    )
    .run(&terms)
    .await;

    let report = &summary.reports[0];
    assert_eq!(report.details_failed, 1);
    assert_eq!(report.records, 1);

    let json = std::fs::read_to_string(report.exported_path().expect("exported"))
        .expect("Failed to read export");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    assert_eq!(value[0]["title"], "Data Engineer");
    assert_eq!(value[0]["description"], "Build things.\nShip them.");
}

#[tokio::test]
async fn test_term_without_results_writes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("keyword", "astronaut"))
        .respond_with(html(listing_page(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = HttpPageSource::new(&config.browser).expect("Failed to build source");
    let mut exporter = FileExporter::from_config(&config.output);
    let terms = SearchTerm::parse_list("astronaut");

    let summary = Coordinator::new(
        &mut source,
        &mut exporter,
        settings(&config, DetailLevel::Structured),
    )
    .run(&terms)
    .await;

    assert_eq!(summary.reports[0].outcome, TermOutcome::NoCandidates);
    assert!(!dir.path().join("results").join("astronaut").exists());
    assert_eq!(summary.total_records(), 0);
}

#[tokio::test]
async fn test_listing_server_error_ends_pagination() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&server.uri(), &dir);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .respond_with(html(listing_page(&[("Rust Developer", "/jobs/rust")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = HttpPageSource::new(&config.browser).expect("Failed to build source");
    let mut exporter = FileExporter::from_config(&config.output);
    let terms = SearchTerm::parse_list("rust");

    let summary = Coordinator::new(
        &mut source,
        &mut exporter,
        settings(&config, DetailLevel::Summary),
    )
    .run(&terms)
    .await;

    let report = &summary.reports[0];
    assert_eq!(report.records, 1);
    assert_eq!(report.pages_fetched, 1);
    assert!(matches!(report.outcome, TermOutcome::Exported(_)));
}
