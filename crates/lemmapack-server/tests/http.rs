use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use lemmapack_db::{Dictionary, LoadMode};
use lemmapack_server::handlers::{AppState, router};

fn make_state(disable_cache: bool) -> AppState {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::write(
        tempdir.path().join("words.txt"),
        "kala\t0\t3\ntalo\t1\t2\nkoira\t0\t3\nkuu\t2\t3\nkuus\t3\t3\n",
    )
    .unwrap();
    std::fs::write(
        tempdir.path().join("inflections.txt"),
        "\ta\tn\n\tn\nsi\tden\ttta\ni\ten\tta\n",
    )
    .unwrap();
    let dict = Dictionary::load_with_mode(tempdir.path(), LoadMode::Owned).unwrap();
    AppState {
        dict: Arc::new(dict),
        disable_cache,
    }
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state(false));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inflections_endpoint_returns_forms() {
    let (status, body) = get_json(make_state(false), "/v1/inflections?lemma=kala").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lemma"], "kala");
    let paradigms = body["paradigms"].as_array().unwrap();
    assert_eq!(paradigms.len(), 1);
    assert_eq!(paradigms[0]["stem"], "kala");
    assert_eq!(paradigms[0]["pattern_id"], 0);
    assert_eq!(
        paradigms[0]["forms"],
        serde_json::json!(["kala", "kalaa", "kalan"])
    );
}

#[tokio::test]
async fn inflections_endpoint_lists_every_paradigm() {
    let (status, body) = get_json(make_state(false), "/v1/inflections?lemma=kuusi").await;
    assert_eq!(status, StatusCode::OK);
    let paradigms = body["paradigms"].as_array().unwrap();
    assert_eq!(paradigms.len(), 2);
    assert_eq!(paradigms[1]["forms"][2], "kuusta");
}

#[tokio::test]
async fn inflections_endpoint_reports_unknown_lemma() {
    let (status, body) = get_json(make_state(false), "/v1/inflections?lemma=puu").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("unknown lemma")
    );
}

#[tokio::test]
async fn inflections_endpoint_rejects_blank_lemma() {
    let (status, body) = get_json(make_state(false), "/v1/inflections?lemma=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("required")
    );
}

#[tokio::test]
async fn lemmas_endpoint_maps_form_back() {
    let (status, body) = get_json(make_state(false), "/v1/lemmas?form=koiran").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"], "koiran");
    assert_eq!(body["lemmas"], serde_json::json!(["koira"]));

    let (_, body) = get_json(make_state(false), "/v1/lemmas?form=kalassa").await;
    assert_eq!(body["lemmas"], serde_json::json!([]));
}

#[tokio::test]
async fn stats_endpoint_counts_tables() {
    let (status, body) = get_json(make_state(false), "/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"], 5);
    assert_eq!(body["patterns"], 4);
    assert_eq!(body["lemmas"], 4);
}

#[tokio::test]
async fn cache_header_follows_state() {
    let cached = router(make_state(false))
        .oneshot(
            Request::builder()
                .uri("/v1/lemmas?form=talon")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(cached.headers().contains_key(header::CACHE_CONTROL));

    let uncached = router(make_state(true))
        .oneshot(
            Request::builder()
                .uri("/v1/lemmas?form=talon")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!uncached.headers().contains_key(header::CACHE_CONTROL));
}
