//! Control API end-to-end tests.

use reqwest::StatusCode;
use serde_json::Value;

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn reserve_limit_and_grace_over_http() {
    let server = common::start_server(2).await;
    let http = client();

    for path in ["/v1/streams/A/1", "/v1/streams/B/2"] {
        let res = http.post(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let res = http.post(server.url("/v1/streams/C/3")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["active"], 2);
    assert_eq!(body["limit"], 2);

    let res = http.post(server.url("/v1/streams/A/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.tracker.active_count(), 3);

    let res = http.post(server.url("/v1/streams/A/5")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn heartbeat_release_and_listing() {
    let server = common::start_server(0).await;
    let http = client();

    let res = http
        .post(server.url("/v1/streams/10.0.0.1/token-abc/heartbeat"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    http.post(server.url("/v1/streams/10.0.0.2/100"))
        .send()
        .await
        .unwrap();

    let streams: Value = http
        .get(server.url("/v1/streams"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let streams = streams.as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["kind"], "polled");
    assert_eq!(streams[1]["kind"], "persistent");

    for _ in 0..2 {
        let res = http
            .delete(server.url("/v1/streams/10.0.0.2/100"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let status: Value = http
        .get(server.url("/v1/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["active"], 1);
    assert_eq!(status["max_connections"], 0);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = common::start_server(1).await;
    let res = client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "ok");
}
