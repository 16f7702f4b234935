use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fit_client::{AnalysisSession, ApiClient, ApiStatus, SubmitError};

const JOB_DESCRIPTION: &str = "Looking for a senior Rust engineer with async experience";

fn session_for(server: &MockServer) -> AnalysisSession {
    let api = ApiClient::new(server.uri(), 5).expect("Failed to build client");
    AnalysisSession::new(api)
}

async fn write_resume(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("resume.pdf");
    tokio::fs::write(&path, b"%PDF-1.4 integration fixture")
        .await
        .expect("Failed to write fixture");
    path
}

async fn mount_health_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_up_sets_connected() {
    let server = MockServer::start().await;
    mount_health_ok(&server).await;

    let mut session = session_for(&server);
    assert_eq!(session.api_status(), ApiStatus::Checking);
    assert_eq!(session.refresh_health().await, ApiStatus::Connected);
}

#[tokio::test]
async fn health_error_status_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    assert_eq!(session.refresh_health().await, ApiStatus::Error);
}

#[tokio::test]
async fn health_unreachable_sets_error() {
    // nothing listens here
    let api = ApiClient::new("http://127.0.0.1:1".to_string(), 1).unwrap();
    let mut session = AnalysisSession::new(api);
    assert_eq!(session.refresh_health().await, ApiStatus::Error);
}

#[tokio::test]
async fn analyze_flow_prefers_server_score() {
    let server = MockServer::start().await;
    mount_health_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "<h2>Skills</h2>Good skills<h2>Experience</h2>5 years",
            "matchScore": 92,
            "analyzedAt": "2026-08-25T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.refresh_health().await;
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let result = session.submit().await.expect("submit failed");

    // the heuristic would score this text 75; the server's value must win
    assert_eq!(result.match_score, 92);
    assert!(result.analysis.skills.contains("Good skills"));
    assert!(result.analysis.experience.contains("5 years"));
    assert_eq!(
        result.analyzed_at,
        Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap()
    );
    assert!(!session.is_loading());
    assert!(session.result().is_some());
}

#[tokio::test]
async fn analyze_flow_extracts_score_when_server_omits_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "Match Percentage: 78% - Strong candidate"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let result = session.submit().await.expect("submit failed");
    assert_eq!(result.match_score, 78);
}

#[tokio::test]
async fn out_of_range_server_score_falls_back_to_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "Match Percentage: 78% - Strong candidate",
            "matchScore": 150
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let result = session.submit().await.expect("submit failed");
    assert_eq!(result.match_score, 78);
}

#[tokio::test]
async fn server_score_of_zero_is_honored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "An excellent candidate on paper, but the role requires a security clearance",
            "matchScore": 0
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let result = session.submit().await.expect("submit failed");
    // zero is a real score, not an absent one; the keyword bucket (85) must not apply
    assert_eq!(result.match_score, 0);
}

#[tokio::test]
async fn multipart_fields_are_shaped_for_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_string_contains("name=\"resume\""))
        .and(body_string_contains("filename=\"resume.pdf\""))
        .and(body_string_contains("application/pdf"))
        .and(body_string_contains("name=\"jobDescription\""))
        .and(body_string_contains(JOB_DESCRIPTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "Good overlap"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    session.submit().await.expect("submit failed");
}

#[tokio::test]
async fn short_description_aborts_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description("too short");

    let err = session.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::DescriptionTooShort);
    assert!(session
        .active_error(Utc::now())
        .unwrap()
        .contains("at least 20 characters"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn server_reported_failure_keeps_connection_status() {
    let server = MockServer::start().await;
    mount_health_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "Could not parse resume"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.refresh_health().await;
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let err = session.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::Analysis("Could not parse resume".to_string()));
    assert_eq!(session.api_status(), ApiStatus::Connected);
    assert_eq!(session.active_error(Utc::now()), Some("Could not parse resume"));
    assert!(session.result().is_none());
}

#[tokio::test]
async fn http_error_surfaces_server_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "success": false,
            "error": "Unsupported resume format"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let err = session.submit().await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Analysis("Unsupported resume format".to_string())
    );
}

#[tokio::test]
async fn unreadable_success_body_is_a_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Analysis(_)));
    assert_eq!(session.api_status(), ApiStatus::Checking);
}

#[tokio::test]
async fn transport_failure_flips_status_and_blocks_resubmission() {
    // A dedicated (non-pooled) server: its listener closes when dropped,
    // which the pooled `MockServer::start()` servers do not guarantee.
    let server = MockServer::builder().start().await;
    mount_health_ok(&server).await;

    let mut session = session_for(&server);
    assert_eq!(session.refresh_health().await, ApiStatus::Connected);

    let dir = TempDir::new().unwrap();
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    // server goes away between the health check and the submission
    drop(server);

    let err = session.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::ConnectionFailed);
    assert_eq!(session.api_status(), ApiStatus::Error);

    // with the status on Error the next submit is rejected locally
    let err = session.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::ServerUnavailable);
}

#[tokio::test]
async fn new_submission_replaces_previous_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "result": "Match Percentage: 40%",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.accept_file(&write_resume(&dir).await).await.unwrap();
    session.set_description(JOB_DESCRIPTION);

    let first = session.submit().await.expect("first submit failed");
    let first_at = first.analyzed_at;

    let second = session.submit().await.expect("second submit failed");
    assert_eq!(second.match_score, 40);
    // no server timestamp, so each result is stamped at storage time
    assert!(second.analyzed_at >= first_at);
}

#[tokio::test]
async fn accepted_resume_clears_prior_banner() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);
    session.set_description(JOB_DESCRIPTION);

    let err = session.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::MissingResume);
    assert!(session.active_error(Utc::now()).is_some());

    session.accept_file(&write_resume(&dir).await).await.unwrap();
    assert!(session.active_error(Utc::now()).is_none());
}

#[tokio::test]
async fn rejected_resume_keeps_previous_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut session = session_for(&server);

    session.accept_file(&write_resume(&dir).await).await.unwrap();
    assert_eq!(session.resume().unwrap().file_name, "resume.pdf");

    let bogus = dir.path().join("notes.txt");
    tokio::fs::write(&bogus, b"plain text").await.unwrap();
    let rejected = session.accept_file(&bogus).await;

    assert!(rejected.is_err());
    assert_eq!(session.resume().unwrap().file_name, "resume.pdf");
    assert!(session.active_error(Utc::now()).is_some());
}
