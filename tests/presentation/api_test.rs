use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use nativity::presentation::handlers::USER_ID_HEADER;
use nativity::presentation::{AppState, create_router};

use crate::helpers::{
    MockAnalyzer, MockMediaEngine, MockSpeechSynthesizer, MockVideoStore, PipelineHarness,
    sample_analysis,
};

fn router(harness: &PipelineHarness) -> Router {
    create_router(AppState::new(harness.orchestrator.clone()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn wait_for_terminal(router: &Router, job_id: &str, user: Option<&str>) -> Value {
    for _ in 0..200 {
        let (status, body) = send(router, get(&format!("/api/video/job/{}", job_id), user)).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] == "complete" || body["status"] == "failed" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job_id);
}

async fn start_draft(router: &Router, harness: &PipelineHarness, user: Option<&str>) -> String {
    let file_key = harness.uploaded_video();
    let (status, body) = send(
        router,
        post_json(
            "/api/video/draft",
            user,
            json!({ "file_key": file_key.as_str(), "target_language": "hindi" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "pending");
    body["job_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn given_running_service_when_checking_health_then_capabilities_are_reported() {
    let harness = PipelineHarness::with(
        MockVideoStore::new(),
        MockAnalyzer::unconfigured(),
        MockSpeechSynthesizer::new(),
        MockMediaEngine::new(),
    );

    let (status, body) = send(&router(&harness), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["capabilities"]["analyzer"], false);
    assert_eq!(body["capabilities"]["storage"], true);
    assert_eq!(body["media_version"], "ffmpeg version 6.1-test");
}

#[tokio::test]
async fn given_file_name_when_requesting_upload_url_then_key_and_expiry_are_returned() {
    let harness = PipelineHarness::new();

    let (status, body) = send(
        &router(&harness),
        post_json("/api/video/upload-url", None, json!({ "file_name": "talk.mp4" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_key"], "uploads/talk.mp4");
    assert_eq!(body["expires_in"], 3600);
}

#[tokio::test]
async fn given_traversal_file_name_when_requesting_upload_url_then_bad_request() {
    let harness = PipelineHarness::new();

    let (status, body) = send(
        &router(&harness),
        post_json("/api/video/upload-url", None, json!({ "file_name": "../etc/passwd" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid file name"));
}

#[tokio::test]
async fn given_unconfigured_storage_when_requesting_upload_url_then_service_unavailable() {
    let harness = PipelineHarness::with(
        MockVideoStore::unconfigured(),
        MockAnalyzer::returning(sample_analysis()),
        MockSpeechSynthesizer::new(),
        MockMediaEngine::new(),
    );

    let (status, _) = send(
        &router(&harness),
        post_json("/api/video/upload-url", None, json!({ "file_name": "talk.mp4" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn given_draft_request_when_polling_then_draft_segments_are_returned() {
    let harness = PipelineHarness::new();
    let router = router(&harness);

    let job_id = start_draft(&router, &harness, None).await;
    let job = wait_for_terminal(&router, &job_id, None).await;

    assert_eq!(job["status"], "complete");
    assert_eq!(job["progress"], 100);
    assert_eq!(job["result"]["phase"], "draft");
    assert_eq!(job["result"]["recommended_voice_gender"], "male");
    assert_eq!(job["result"]["ready_for_review"], true);
    assert_eq!(job["result"]["segments"].as_array().unwrap().len(), 2);
    assert_eq!(job["result"]["segments"][0]["approved"], false);
}

#[tokio::test]
async fn given_malformed_job_id_when_polling_then_bad_request() {
    let harness = PipelineHarness::new();

    let (status, _) = send(&router(&harness), get("/api/video/job/not-a-uuid", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_job_when_polling_then_not_found() {
    let harness = PipelineHarness::new();

    let (status, _) = send(
        &router(&harness),
        get(&format!("/api/video/job/{}", uuid::Uuid::new_v4()), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_missing_job_id_when_finalizing_then_bad_request() {
    let harness = PipelineHarness::new();

    let (status, body) = send(
        &router(&harness),
        post_json("/api/video/finalize", None, json!({ "segments": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "job_id is required");
}

#[tokio::test]
async fn given_empty_segments_when_finalizing_then_bad_request() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, None).await;
    wait_for_terminal(&router, &job_id, None).await;

    let (status, _) = send(
        &router,
        post_json("/api/video/finalize", None, json!({ "job_id": job_id, "segments": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_short_field_names_when_finalizing_then_job_completes_with_outputs() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let user = Some("user-42");
    let job_id = start_draft(&router, &harness, user).await;
    wait_for_terminal(&router, &job_id, user).await;

    let (status, body) = send(
        &router,
        post_json(
            "/api/video/finalize",
            user,
            json!({
                "job_id": job_id,
                "segments": [
                    { "start": 3.2, "end": 6.0, "text": "Namaste doston" },
                    { "start_time": 6.0, "end_time": 9.5, "translated_text": "Chaliye shuru karte hain" }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["job_id"], job_id.as_str());

    let job = wait_for_terminal(&router, &job_id, user).await;
    assert_eq!(job["status"], "complete");
    assert_eq!(job["result"]["phase"], "finalized");
    assert_eq!(job["result"]["words_localized"], 6);
    assert!(job["result"]["output_url"].as_str().unwrap().contains("localized_hindi.mp4"));
    assert!(job["result"]["compact_url"].is_null());
}

#[tokio::test]
async fn given_foreign_job_when_finalizing_then_not_found() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, Some("user-42")).await;
    wait_for_terminal(&router, &job_id, Some("user-42")).await;

    let (status, _) = send(
        &router,
        post_json(
            "/api/video/finalize",
            Some("user-7"),
            json!({ "job_id": job_id, "segments": [{ "start": 0, "end": 1, "text": "hi" }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_no_caller_when_reading_history_then_unauthorized() {
    let harness = PipelineHarness::new();

    let (status, _) = send(&router(&harness), get("/api/video/history", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_drafted_job_when_reading_history_then_entry_and_stats_are_returned() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, Some("user-42")).await;
    wait_for_terminal(&router, &job_id, Some("user-42")).await;

    let (status, body) = send(&router, get("/api/video/history?limit=5", Some("user-42"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"][0]["job_id"], job_id.as_str());
    assert_eq!(body["history"][0]["status"], "needs_review");
    assert_eq!(body["history"][0]["segments_count"], 2);
    assert!(body["history"][0]["input_url"].is_string());
    assert_eq!(body["stats"]["total_projects"], 1);
    assert_eq!(body["stats"]["words_localized"], 0);
}

#[tokio::test]
async fn given_foreign_job_when_deleting_then_not_found() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, Some("user-42")).await;
    wait_for_terminal(&router, &job_id, Some("user-42")).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/video/{}", job_id))
        .header(USER_ID_HEADER, "user-7")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_own_job_when_deleting_then_no_content() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, Some("user-42")).await;
    wait_for_terminal(&router, &job_id, Some("user-42")).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/video/{}", job_id))
        .header(USER_ID_HEADER, "user-42")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn given_no_caller_when_deleting_then_unauthorized() {
    let harness = PipelineHarness::new();
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/video/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&router(&harness), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_approved_segments_field_when_finalizing_then_job_completes() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let job_id = start_draft(&router, &harness, None).await;
    wait_for_terminal(&router, &job_id, None).await;

    let (status, _) = send(
        &router,
        post_json(
            "/api/video/finalize",
            None,
            json!({
                "job_id": job_id,
                "approved_segments": [{ "start": 3.2, "end": 6.0, "text": "Namaste doston" }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let job = wait_for_terminal(&router, &job_id, None).await;
    assert_eq!(job["status"], "complete");
    assert_eq!(job["result"]["words_localized"], 2);
    assert_eq!(job["result"]["duration_seconds"], 60.0);
}

#[tokio::test]
async fn given_unsupported_language_when_drafting_then_bad_request() {
    let harness = PipelineHarness::new();
    let file_key = harness.uploaded_video();

    let (status, body) = send(
        &router(&harness),
        post_json(
            "/api/video/draft",
            None,
            json!({ "file_key": file_key.as_str(), "target_language": "../../escaped" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unsupported target language"));
    assert_eq!(harness.registry.job_count().await, 0);
}

#[tokio::test]
async fn given_service_when_listing_languages_then_all_targets_are_returned() {
    let harness = PipelineHarness::new();

    let (status, body) = send(&router(&harness), get("/api/video/languages", None)).await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body["languages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["hindi", "tamil", "bengali", "telugu", "marathi"]);
    assert_eq!(body["languages"][0]["name"], "Hindi");
    assert_eq!(body["languages"][0]["native"], "हिंदी");
}

#[tokio::test]
async fn given_completed_job_when_requesting_metadata_then_title_description_and_tags_are_returned() {
    let harness = PipelineHarness::new();
    let router = router(&harness);
    let user = Some("user-42");
    let job_id = start_draft(&router, &harness, user).await;
    wait_for_terminal(&router, &job_id, user).await;

    let (status, body) = send(
        &router,
        post_json("/api/video/metadata", user, json!({ "job_id": job_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chai (hindi)");
    assert_eq!(body["language"], "hindi");
    assert_eq!(body["tags"][0], "hindi");
    assert!(body["description"].is_string());
}

#[tokio::test]
async fn given_missing_job_id_when_requesting_metadata_then_bad_request() {
    let harness = PipelineHarness::new();

    let (status, _) = send(
        &router(&harness),
        post_json("/api/video/metadata", None, json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
