use std::sync::Arc;

use chitas_core::{
    AppState, Category, ContentError, DetailAction, DetailKey, DetailState, Language,
    SefariaClient, TextCache, TextSource, ViewController, ViewNode,
};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SefariaClient {
    SefariaClient::new(&server.uri(), &format!("{}/converter", server.uri()))
}

fn calendar_body() -> serde_json::Value {
    json!({
        "date": "2024-01-15",
        "timezone": "America/New_York",
        "calendar_items": [
            {
                "title": {"en": "Parashat Hashavua", "he": "פרשת השבוע"},
                "displayValue": {"en": "Genesis 1", "he": "בראשית א"},
                "url": "Genesis.1",
                "ref": "Genesis.1",
                "order": 1,
                "category": "Tanakh"
            }
        ]
    })
}

async fn mount_calendar(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(calendar_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn calendar_is_fetched_with_hebrew_date() {
    let server = MockServer::start().await;
    mount_calendar(&server).await;
    Mock::given(method("GET"))
        .and(path("/converter"))
        .and(query_param("cfg", "json"))
        .and(query_param("date", "2024-01-15"))
        .and(query_param("g2h", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gy": 2024, "gm": 1, "gd": 15,
            "hebrew": "ה׳ בִּשְׁבָט תשפ״ד"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server).fetch_today_calendar().await.unwrap();

    assert_eq!(snapshot.date, "2024-01-15");
    assert_eq!(snapshot.localized_date, "ה׳ בִּשְׁבָט תשפ״ד");
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].reference(), Some("Genesis.1"));
}

#[tokio::test]
async fn failed_date_conversion_falls_back_to_raw_date() {
    let server = MockServer::start().await;
    mount_calendar(&server).await;
    Mock::given(method("GET"))
        .and(path("/converter"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.fetch_today_calendar().await.unwrap();
    assert_eq!(snapshot.localized_date, "2024-01-15");

    let err = client.localize_date("2024-01-15").await.unwrap_err();
    assert!(matches!(err, ContentError::DateConversion { .. }));
}

#[tokio::test]
async fn converter_without_hebrew_field_falls_back() {
    let server = MockServer::start().await;
    mount_calendar(&server).await;
    Mock::given(method("GET"))
        .and(path("/converter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "bad date"})))
        .mount(&server)
        .await;

    let snapshot = client_for(&server).fetch_today_calendar().await.unwrap();
    assert_eq!(snapshot.localized_date, "2024-01-15");
}

#[tokio::test]
async fn calendar_http_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendars"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_today_calendar().await.unwrap_err();
    assert!(matches!(
        err,
        ContentError::Network {
            status: Some(503),
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_calendar_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_today_calendar().await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn text_reference_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/texts/Psalms%20119%3A1-88"))
        .and(query_param("context", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": [["Happy are those whose way is blameless"]],
            "he": [["אַשְׁרֵי תְמִימֵי דָרֶךְ"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .fetch_text("Psalms 119:1-88")
        .await
        .unwrap();
    assert!(response.has_content());
    assert!(response.he.is_some());
}

#[tokio::test]
async fn text_http_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/texts/Genesis.1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_text("Genesis.1").await.unwrap_err();
    assert!(matches!(
        err,
        ContentError::Network {
            status: Some(404),
            ..
        }
    ));
}

#[tokio::test]
async fn cache_hits_the_network_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/texts/Genesis.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello"})))
        .expect(1)
        .mount(&server)
        .await;

    let cache = TextCache::new(Arc::new(client_for(&server)));
    let first = cache.get_or_fetch("Genesis.1").await.unwrap();
    let second = cache.get_or_fetch("Genesis.1").await.unwrap();
    assert_eq!(first, second);
    // The `expect(1)` above is verified when the server drops.
}

#[tokio::test]
async fn torah_portion_detail_end_to_end() {
    let server = MockServer::start().await;
    mount_calendar(&server).await;
    Mock::given(method("GET"))
        .and(path("/converter"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/texts/Genesis.1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"text": ["In the beginning..."]})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cache = TextCache::new(Arc::new(client.clone()));
    let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut controller = ViewController::new(AppState::new(today), client.library_url());

    controller.on_calendar_loaded(client.fetch_today_calendar().await);
    assert_eq!(controller.view().localized_date.as_deref(), Some("2024-01-15"));

    let action = controller
        .on_detail_request(DetailKey::Category(Category::TorahPortion))
        .unwrap();
    let DetailAction::Fetch {
        token, reference, ..
    } = action
    else {
        panic!("expected a fetch");
    };
    assert_eq!(reference, "Genesis.1");

    assert!(controller.on_detail_loaded(token, cache.get_or_fetch(&reference).await));

    let DetailState::Loaded { tree, .. } = controller.detail() else {
        panic!("expected loaded detail, got {:?}", controller.detail());
    };
    assert_eq!(
        tree.nodes(Language::En),
        &[ViewNode::TextBlock("In the beginning...".to_string())]
    );
    assert!(tree.section(Language::He).is_none());
}

#[tokio::test]
async fn feed_without_date_keeps_items_and_skips_conversion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "calendar_items": [
                {
                    "title": {"en": "Tanya Yomi", "he": "תניא יומי"},
                    "displayValue": {"en": "Tanya, Part I 3"},
                    "ref": "Tanya, Part I 3"
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/converter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hebrew": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.fetch_today_calendar().await.unwrap();
    assert_eq!(snapshot.date, "");
    assert_eq!(snapshot.localized_date, "");
    assert_eq!(snapshot.items.len(), 1);

    let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let mut controller = ViewController::new(AppState::new(today), client.library_url());
    controller.on_calendar_loaded(Ok(snapshot));
    assert_eq!(controller.view().localized_date, None);
    assert_eq!(controller.view().summaries.len(), 2);
}
