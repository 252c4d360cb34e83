use axum::http::{Request, StatusCode};
use http_body_util::BodyExt as _;
use mockito::{Matcher, Server};
use std::sync::Arc;
use std::time::Duration;
use tempo_rates::retry::BackoffPolicy;
use tempo_rates::tempo::client::{CALENDAR_PATH, TOKEN_PATH};
use tempo_rates::tempo::{PriceEntry, PriceTable, RateInterval, RateService, UpstreamClient};
use tempo_rates::web::{AppState, build_router};
use tower::ServiceExt;

fn table() -> PriceTable {
    PriceTable::new(
        PriceEntry {
            peak: 0.1609,
            off_peak: 0.1296,
        },
        PriceEntry {
            peak: 0.1894,
            off_peak: 0.1486,
        },
        PriceEntry {
            peak: 0.7562,
            off_peak: 0.1369,
        },
    )
}

fn router(base_url: String) -> axum::Router {
    let backoff = BackoffPolicy {
        initial_interval: Duration::from_millis(10),
        multiplier: 2.0,
        max_interval: Duration::from_millis(40),
        max_elapsed: Duration::from_millis(150),
    };
    let client =
        UpstreamClient::new(base_url, "client", "secret", Duration::from_secs(2), backoff).unwrap();
    let service = RateService::new(Arc::new(client), table(), chrono_tz::Europe::Paris);
    build_router(AppState::new(service))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn prices_end_to_end() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"abc","token_type":"Bearer","expires_in":7200}"#)
        .expect(1)
        .create_async()
        .await;
    // The window depends on today's date, so only the day records are fixed here
    let calendar = server
        .mock("GET", Matcher::Regex(format!("^{}", CALENDAR_PATH)))
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"tempo_like_calendars":{"values":[
                {"start_date":"2024-01-16T00:00:00+01:00","end_date":"2024-01-17T00:00:00+01:00","value":"NON_DEFINI"},
                {"start_date":"2024-01-15T00:00:00+01:00","end_date":"2024-01-16T00:00:00+01:00","value":"RED"},
                {"start_date":"2024-01-14T00:00:00+01:00","end_date":"2024-01-15T00:00:00+01:00","value":"BLUE"}
            ]}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (status, body) = get(router(server.url()), "/prices").await;
    assert_eq!(status, StatusCode::OK);

    let rates: Vec<RateInterval> = serde_json::from_slice(&body).unwrap();
    let expected = [
        ("2024-01-14T05:00:00Z", "2024-01-14T21:00:00Z", 0.1609),
        ("2024-01-14T21:00:00Z", "2024-01-15T05:00:00Z", 0.1296),
        ("2024-01-15T05:00:00Z", "2024-01-15T21:00:00Z", 0.7562),
        ("2024-01-15T21:00:00Z", "2024-01-16T05:00:00Z", 0.1369),
    ];
    assert_eq!(rates.len(), expected.len());
    for (rate, (start, end, value)) in rates.iter().zip(expected) {
        assert_eq!(rate.start, start.parse::<chrono::DateTime<chrono::Utc>>().unwrap());
        assert_eq!(rate.end, end.parse::<chrono::DateTime<chrono::Utc>>().unwrap());
        assert_eq!(rate.value, value);
    }

    token.assert_async().await;
    calendar.assert_async().await;
}

#[tokio::test]
async fn token_failure_returns_empty_array_without_calendar_call() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let calendar = server
        .mock("GET", Matcher::Regex(format!("^{}", CALENDAR_PATH)))
        .expect(0)
        .create_async()
        .await;

    let (status, body) = get(router(server.url()), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
    token.assert_async().await;
    calendar.assert_async().await;
}

#[tokio::test]
async fn calendar_outage_returns_empty_array() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"access_token":"abc"}"#)
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex(format!("^{}", CALENDAR_PATH)))
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let (status, body) = get(router(server.url()), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn unreachable_upstream_still_serves() {
    // Nothing listens on port 9 of the loopback interface
    let app = router("http://127.0.0.1:9".to_string());

    let (status, body) = get(app.clone(), "/prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");

    let (status, body) = get(app, "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"message":"pong"}"#);
}
