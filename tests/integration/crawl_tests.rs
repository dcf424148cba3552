//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from the organisation page to the two
//! TSV files.

use chrono::NaiveDate;
use fight_finder::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use fight_finder::crawler::{Coordinator, HttpFetcher};
use fight_finder::output::{MemorySink, TsvSink};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server's organisation page
fn create_test_config(base_url: &str, max_depth: u32, prefix: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            root_url: format!("{}/organizations/Test-Org-1", base_url),
            event_path_prefix: "/events/".to_string(),
            max_depth,
            max_concurrent_fetches: 4,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            prefix: prefix.to_string(),
        },
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn organization_page(events: &[&str]) -> String {
    let links: String = events
        .iter()
        .map(|e| format!(r#"<li><a href="{}">Event</a></li>"#, e))
        .collect();
    format!(
        r#"<html><head><title>Org</title></head><body>
        <a href="/">Home</a><a href="/news/latest">News</a>
        <ul>{}</ul></body></html>"#,
        links
    )
}

fn event_page(pairs: &[(&str, &str)]) -> String {
    let rows: String = pairs
        .iter()
        .map(|(left, right)| {
            format!(
                r#"<tr>
                <td class="text_right"><div><a href="{}">L</a></div></td>
                <td class="vs">vs</td>
                <td class="text_left"><div><a href="{}">R</a></div></td>
                </tr>"#,
                left, right
            )
        })
        .collect();
    format!(
        "<html><head><title>Event</title></head><body><table>{}</table></body></html>",
        rows
    )
}

/// Bouts are (result, opponent href, date, method, round, time)
fn fighter_page(
    name: &str,
    weight_class: &str,
    birth_date: &str,
    bouts: &[(&str, &str, &str, &str, &str, &str)],
) -> String {
    let rows: String = bouts
        .iter()
        .map(|(result, opponent, date, how, round, time)| {
            format!(
                r#"<tr>
                <td><span class="final_result {0}">{0}</span></td>
                <td><a href="{1}">Opponent</a></td>
                <td><a href="/events/Somewhere">Event</a><br><span class="sub_line">{2}</span></td>
                <td>{3}<br><span class="sub_line">Referee</span></td>
                <td>{4}</td>
                <td>{5}</td>
                </tr>"#,
                result, opponent, date, how, round, time
            )
        })
        .collect();
    format!(
        r#"<html><head><title>{0}</title></head><body>
        <h1 itemprop="name"><span class="fn">{0}</span></h1>
        <span itemprop="birthDate">{1}</span>
        <h6><strong>{2}</strong></h6>
        <table><tr class="table_head"><td>Result</td><td>Fighter</td></tr>{3}</table>
        </body></html>"#,
        name, birth_date, weight_class, rows
    )
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    let mut lines: Vec<String> = std::fs::read_to_string(path)
        .expect("Failed to read output file")
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn test_full_crawl_writes_both_files() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/organizations/Test-Org-1",
        organization_page(&["/events/Test-Org-1-Event-1"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/events/Test-Org-1-Event-1",
        event_page(&[("/fighter/Alpha-1", "/fighter/Bravo-2")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Alpha-1",
        fighter_page(
            "Alpha",
            "Lightweight",
            "1990-05-05",
            &[("win", "/fighter/Bravo-2", "2020-01-01", "Decision (Unanimous)", "3", "5:00")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Bravo-2",
        fighter_page(
            "Bravo",
            "Lightweight",
            "1991-06-06",
            &[("loss", "/fighter/Alpha-1", "2020-01-01", "Decision (Unanimous)", "3", "5:00")],
        ),
    )
    .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let prefix = format!("{}/out/ufc_", temp_dir.path().display());
    let config = create_test_config(&base_url, 20, &prefix);

    let run_date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let sink = TsvSink::create(&prefix, run_date).expect("Failed to create output files");
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();

    let report = Coordinator::new(&config, fetcher, sink)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert!(report
        .sink
        .fighters_path()
        .ends_with("out/ufc_fighters_2020-01-02.tsv"));
    assert!(report
        .sink
        .fights_path()
        .ends_with("out/ufc_fights_2020-01-02.tsv"));

    assert_eq!(
        read_lines(report.sink.fighters_path()),
        vec![
            "/fighter/Alpha-1\tLightweight\t1990-05-05",
            "/fighter/Bravo-2\tLightweight\t1991-06-06",
        ]
    );
    assert_eq!(
        read_lines(report.sink.fights_path()),
        vec!["/fighter/Alpha-1\t/fighter/Bravo-2\twin\tDecision (Unanimous)\t3\t5:00\t2020-01-01"]
    );

    assert_eq!(report.statistics.listing_pages, 2);
    assert_eq!(report.statistics.fighter_pages, 2);
    assert_eq!(report.statistics.fetch_failures, 0);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/organizations/Test-Org-1",
        organization_page(&["/events/E-1"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/events/E-1",
        event_page(&[("/fighter/Alpha-1", "/fighter/Bravo-2")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Alpha-1",
        fighter_page(
            "Alpha",
            "Welterweight",
            "1990-01-01",
            &[
                ("win", "/fighter/Bravo-2", "2020-01-01", "KO (Punch)", "1", "0:45"),
                ("loss", "/fighter/Charlie-3", "2019-01-01", "Submission", "2", "3:10"),
            ],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Bravo-2",
        fighter_page(
            "Bravo",
            "Welterweight",
            "1992-02-02",
            &[("loss", "/fighter/Alpha-1", "2020-01-01", "KO (Punch)", "1", "0:45")],
        ),
    )
    .await;

    // Charlie is only reachable at depth 1
    Mock::given(method("GET"))
        .and(path("/fighter/Charlie-3"))
        .respond_with(html(fighter_page("Charlie", "", "", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 0, "");
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();

    let report = Coordinator::new(&config, fetcher, MemorySink::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    let mut ids: Vec<&str> = report.sink.fighters.iter().map(|f| f.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["/fighter/Alpha-1", "/fighter/Bravo-2"]);

    // Both fights on Alpha's page are emitted, Charlie's profile is not
    assert_eq!(report.sink.fights.len(), 2);
    let charlie_fight = report
        .sink
        .fights
        .iter()
        .find(|f| f.fighter_b.as_str() == "/fighter/Charlie-3")
        .expect("Fight against Charlie should be emitted");
    assert_eq!(charlie_fight.fighter_a.as_str(), "/fighter/Alpha-1");
    assert_eq!(charlie_fight.result, "loss");

    assert_eq!(report.statistics.depth_limited, 1);
    assert_eq!(report.statistics.max_depth_reached, 0);
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_the_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/organizations/Test-Org-1",
        organization_page(&["/events/E-1", "/events/E-2"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/events/E-1",
        event_page(&[("/fighter/Alpha-1", "/fighter/Gone-404")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Alpha-1",
        fighter_page(
            "Alpha",
            "Middleweight",
            "1988-08-08",
            &[("win", "/fighter/Json-5", "2018-01-01", "TKO", "2", "1:11")],
        ),
    )
    .await;

    // The second event is down
    Mock::given(method("GET"))
        .and(path("/events/E-2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fighter/Gone-404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Not HTML
    Mock::given(method("GET"))
        .and(path("/fighter/Json-5"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 3, "");
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();

    let report = Coordinator::new(&config, fetcher, MemorySink::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.sink.fighters.len(), 1);
    assert_eq!(report.sink.fighters[0].id.as_str(), "/fighter/Alpha-1");
    assert_eq!(report.sink.fights.len(), 1);
    assert_eq!(report.statistics.fetch_failures, 3);
    assert!(report.sink.finalized);
}

#[tokio::test]
async fn test_shared_fighters_are_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Both events feature Alpha; Bravo also appears as Alpha's opponent.
    mount_page(
        &mock_server,
        "/organizations/Test-Org-1",
        organization_page(&["/events/E-1", "/events/E-2", "/events/E-1"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/events/E-1",
        event_page(&[("/fighter/Alpha-1", "/fighter/Bravo-2")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/events/E-2",
        event_page(&[("/fighter/Charlie-3", "/fighter/Alpha-1")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Alpha-1",
        fighter_page(
            "Alpha",
            "Featherweight",
            "1990-01-01",
            &[
                ("win", "/fighter/Bravo-2", "2020-01-01", "Decision", "3", "5:00"),
                ("draw", "/fighter/Charlie-3", "2021-01-01", "Decision", "3", "5:00"),
            ],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Bravo-2",
        fighter_page(
            "Bravo",
            "Featherweight",
            "",
            &[
                ("loss", "/fighter/Alpha-1", "2020-01-01", "Decision", "3", "5:00"),
                // Rematch on another date is a distinct fight
                ("win", "/fighter/Alpha-1", "2022-01-01", "KO", "1", "0:10"),
            ],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/fighter/Charlie-3",
        fighter_page(
            "Charlie",
            "Featherweight",
            "",
            &[("draw", "/fighter/Alpha-1", "2021-01-01", "Decision", "3", "5:00")],
        ),
    )
    .await;

    let config = create_test_config(&base_url, 5, "");
    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent).unwrap();

    let report = Coordinator::new(&config, fetcher, MemorySink::new())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.sink.fighters.len(), 3);
    assert_eq!(report.sink.fights.len(), 3);
    assert_eq!(report.state.fight_count(), 3);

    let rematch = report
        .sink
        .fights
        .iter()
        .find(|f| f.date == "2022-01-01")
        .expect("Rematch should be emitted");
    assert_eq!(rematch.fighter_a.as_str(), "/fighter/Alpha-1");
    assert_eq!(rematch.result, "loss");

    // Each mount expects exactly one request; verified when the server drops.
}
