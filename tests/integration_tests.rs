//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: client facade → transport → pagination → typed records

use bgg_xmlapi::decode::XmlElement;
use bgg_xmlapi::http::{HttpClient, HttpClientConfig};
use bgg_xmlapi::pagination::FnConsumer;
use bgg_xmlapi::{
    Aggregator, BoardGameGeek, ChooseStrategy, ClientConfig, Error, GameLookup, HotItemType,
    Termination,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_endpoint: server.uri(),
        cache: None,
        retry_delay_seconds: 0,
        requests_per_minute: 1000,
        ..Default::default()
    }
}

fn guild_page(page: u32, first: u32, count: u32, total: u32) -> String {
    let members: String = (first..first + count)
        .map(|n| format!(r#"<member name="member{n}" date="2010-01-01"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<guild id="1229" name="Big Guild" created="2007-06-06">
  <category>interest</category>
  <members count="{total}" page="{page}">{members}</members>
</guild>"#
    )
}

// ============================================================================
// Paginated Aggregation
// ============================================================================

#[tokio::test]
async fn test_guild_of_250_members_takes_three_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guild"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(guild_page(1, 0, 100, 250)))
        .expect(1)
        .mount(&server)
        .await;
    for (page, first, count) in [(2, 100, 100), (3, 200, 50)] {
        Mock::given(method("GET"))
            .and(path("/guild"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(guild_page(page, first, count, 250)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let progress = move |current: u64, total: u64| sink.lock().unwrap().push((current, total));

    let bgg = BoardGameGeek::with_config(&config(&server)).unwrap();
    let guild = bgg.guild(1229, Some(&progress)).await.unwrap().unwrap();

    assert_eq!(guild.name, "Big Guild");
    assert_eq!(guild.member_count(), 250);
    assert_eq!(guild.members[249], "member249");
    assert_eq!(
        *calls.lock().unwrap(),
        vec![(100, 250), (200, 250), (250, 250)]
    );
}

#[tokio::test]
async fn test_timeout_on_second_page_truncates_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<items total="4"><item id="1"/><item id="2"/></items>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<items total="4"><item id="3"/></items>"#)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let http = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(100))
            .retries(1)
            .no_rate_limit()
            .no_cache()
            .build(),
    )
    .unwrap();

    let mut ids: Vec<u64> = Vec::new();
    let mut consumer = FnConsumer::new(
        |page: &XmlElement| page.attr_parse("total"),
        |page: &XmlElement| {
            let before = ids.len();
            ids.extend(page.children_named("item").filter_map(|i| i.attr_parse::<u64>("id")));
            Ok((ids.len() - before) as u64)
        },
    );

    let summary = Aggregator::new(&http)
        .aggregate(&http.request("things"), &mut consumer)
        .await
        .unwrap();
    drop(consumer);

    assert_eq!(ids, vec![1, 2]);
    assert_eq!(summary.accumulated, 2);
    assert_eq!(summary.expected_total, 4);
    assert!(summary.is_truncated());
    assert!(matches!(summary.termination, Termination::Truncated { page: 2, .. }));
}

#[tokio::test]
async fn test_first_page_timeout_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(guild_page(1, 0, 1, 1))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let http = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(100))
            .retries(2)
            .retry_delay(Duration::from_millis(10))
            .no_rate_limit()
            .no_cache()
            .build(),
    )
    .unwrap();

    let err = BoardGameGeek::with_http_client(http)
        .guild(1229, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { attempts: 2, .. }));
}

// ============================================================================
// Transport Behaviour
// ============================================================================

#[tokio::test]
async fn test_processing_answer_is_retried_until_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hot"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<items><item id="5" rank="1"><name value="Ready"/></item></items>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let bgg = BoardGameGeek::with_config(&config(&server)).unwrap();
    let hot = bgg.hot_items(HotItemType::BoardGame).await.unwrap().unwrap();
    assert_eq!(hot.items[0].id, 5);
}

#[tokio::test]
async fn test_every_request_counts_against_shared_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<items total="2"><item type="boardgame" id="1"><name value="Go"/></item><item type="boardgame" id="2"><name value="Go"/></item></items>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/thing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<items><item type="boardgame" id="1"><name type="primary" value="Go"/></item></items>"#,
        ))
        .mount(&server)
        .await;

    let bgg = BoardGameGeek::with_config(&config(&server)).unwrap();
    let id = bgg.game_id("Go", ChooseStrategy::BestRank).await.unwrap();
    assert_eq!(id, Some(1));

    let limiter = bgg.http().rate_limiter().unwrap();
    assert_eq!(limiter.recent_requests(), 3);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_file_cache_survives_client_restart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thing"))
        .and(query_param("id", "13"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<items><item type="boardgame" id="13"><name type="primary" value="Catan"/><yearpublished value="1995"/></item></items>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        cache: Some(format!("file://{}?ttl=60", dir.path().display())),
        ..config(&server)
    };

    let first = BoardGameGeek::with_config(&config).unwrap();
    let game = first
        .game(GameLookup::Id(13), ChooseStrategy::First)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.year_published, Some(1995));
    drop(first);

    let second = BoardGameGeek::with_config(&config).unwrap();
    let cached = second
        .game(GameLookup::Id(13), ChooseStrategy::First)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached, game);
}

#[tokio::test]
async fn test_missing_resource_is_none_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let bgg = BoardGameGeek::with_config(&config(&server)).unwrap();
    assert!(bgg.guild(1, None).await.unwrap().is_none());
    assert!(bgg.user("nobody", None).await.unwrap().is_none());
    assert!(bgg.hot_items(HotItemType::Rpg).await.unwrap().is_none());
    assert!(bgg.search("nothing", &[], false).await.unwrap().is_empty());
}
