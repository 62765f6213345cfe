//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and test the full
//! fetch -> extract -> paginate cycle end-to-end over HTTP.

use listing_crawler::config::{parse_config, UserAgentConfig};
use listing_crawler::crawler::{
    crawl, fetch_url, AbsentReason, CrawlSettings, Crawler, FetchResult, HttpFetcher, Termination,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_item(net_id: &str, year: &str) -> String {
    format!(
        r#"<div class="listing-item standard" data-webm-make="SsangYong" data-webm-model="Tivoli"
                data-webm-networkid="{net_id}" data-webm-price="10990000" data-webm-state="Metropolitana">
            <h3><a data-webm-clickvalue="sv-title" href="/detalle/{net_id}">{year} SsangYong Tivoli</a></h3>
            <span class="seller-type"><i class="icon"></i>Automotora</span>
            <div class="key-detail-value" data-type="Odometer">30.000 km</div>
            <div class="key-detail-value" data-type="Fuel Type">Bencina</div>
        </div>"#
    )
}

fn results_page(items: &[String], pagination: &str) -> String {
    format!(
        r#"<html><head><title>Resultados</title></head><body>
        <div class="listing-item showcase" data-webm-networkid="promo"></div>
        {}
        <ul class="pagination"><li>{}</li></ul>
        </body></html>"#,
        items.concat(),
        pagination
    )
}

const DISABLED_NEXT: &str = r#"<a class="page-link next disabled">Siguiente</a>"#;

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/vehiculos/ssangyong/tivoli/"))
        .and(query_param("page", "2"))
        .respond_with(html_response(results_page(
            &[listing_item("333", "2021")],
            DISABLED_NEXT,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vehiculos/ssangyong/tivoli/"))
        .respond_with(html_response(results_page(
            &[listing_item("111", "2019"), listing_item("222", "2020")],
            r#"<a class="page-link next" href="/vehiculos/ssangyong/tivoli/?page=2">Siguiente</a>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default()).expect("Failed to build client");
    let settings = CrawlSettings::new(format!("{}/vehiculos/ssangyong/tivoli/", base_url), 5)
        .with_base_origin(base_url.clone());

    let outcome = Crawler::new(fetcher, settings).run().await;

    let ids: Vec<_> = outcome.records.iter().map(|r| r.net_id.as_str()).collect();
    assert_eq!(ids, vec!["111", "222", "333"]);
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(
        outcome.last_url,
        format!("{}/vehiculos/ssangyong/tivoli/?page=2", base_url)
    );

    let first = &outcome.records[0];
    assert_eq!(first.year, "2019");
    assert_eq!(first.seller_type, "Automotora");
    assert_eq!(first.get("odometer"), Some("30.000 km"));
    assert_eq!(first.get("fuel_type"), Some("Bencina"));
}

#[tokio::test]
async fn test_limit_reached_with_endless_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/vehiculos/"))
        .respond_with(html_response(results_page(
            &[listing_item("111", "2019")],
            r#"<a class="page-link next" href="/vehiculos/?page=next">Siguiente</a>"#,
        )))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default()).expect("Failed to build client");
    let settings =
        CrawlSettings::new(format!("{}/vehiculos/", base_url), 3).with_base_origin(base_url);

    let outcome = Crawler::new(fetcher, settings).run().await;

    assert_eq!(outcome.termination, Termination::LimitReached);
    assert_eq!(outcome.pages_visited, 3);
    assert_eq!(outcome.records.len(), 3);
}

#[tokio::test]
async fn test_fetch_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vehiculos/"))
        .and(header("user-agent", "Mozilla/5.0 (TestBrowser)"))
        .respond_with(html_response("<html></html>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig {
        value: "Mozilla/5.0 (TestBrowser)".to_string(),
    })
    .expect("Failed to build client");
    let settings = CrawlSettings::new(format!("{}/vehiculos/", mock_server.uri()), 1);

    let outcome = Crawler::new(fetcher, settings).run().await;
    assert_eq!(outcome.pages_visited, 1);
}

#[tokio::test]
async fn test_non_200_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = listing_crawler::crawler::build_http_client(&UserAgentConfig::default())
        .expect("Failed to build client");
    let result = fetch_url(&client, &format!("{}/blocked", mock_server.uri())).await;

    assert_eq!(
        result,
        FetchResult::Absent {
            reason: AbsentReason::Status(403)
        }
    );
}

#[tokio::test]
async fn test_absent_first_page_halts_without_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default()).expect("Failed to build client");
    let settings = CrawlSettings::new(format!("{}/vehiculos/", mock_server.uri()), 5);

    let outcome = Crawler::new(fetcher, settings).run().await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.termination, Termination::PaginationMissing);
}

#[tokio::test]
async fn test_crawl_from_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/vehiculos/kia/"))
        .respond_with(html_response(results_page(
            &[listing_item("555", "2015")],
            DISABLED_NEXT,
        )))
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        r#"
[crawler]
start-url = "{base}/vehiculos/kia/"
pagination-limit = 2
base-origin = "{base}"
"#,
        base = base_url
    ))
    .expect("Failed to parse config");

    let outcome = crawl(&config).await.expect("Crawl failed to start");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].net_id, "555");
    assert_eq!(outcome.termination, Termination::Exhausted);
}
