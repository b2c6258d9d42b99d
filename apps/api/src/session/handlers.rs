//! Axum route handlers for the Session API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DEFAULT_JOB_DESCRIPTION;
use crate::errors::AppError;
use crate::session::models::{SessionState, Stage};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub stage: Stage,
    pub job_description: String,
    pub questions: Vec<QuestionView>,
    pub answers: BTreeMap<usize, String>,
    pub report: Option<String>,
    pub credential_loaded: bool,
    pub message: String,
}

impl SessionView {
    fn new(state: &SessionState, credential_loaded: bool) -> Self {
        let message = match state.stage {
            Stage::Idle => "Please upload a resume to begin.",
            Stage::Analyzed => "Resume Analyzed! Answer these questions:",
            Stage::Reported => "Interview Report ready. Download the PDF for a copy.",
        };
        Self {
            stage: state.stage,
            job_description: state.job_description.clone(),
            questions: state
                .questions
                .iter()
                .enumerate()
                .map(|(index, text)| QuestionView {
                    index,
                    label: format!("Question {}", index + 1),
                    text: text.clone(),
                })
                .collect(),
            answers: state.answers.clone(),
            report: state.report.clone(),
            credential_loaded,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report: String,
    pub download_url: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnswerRequest {
    pub answer: String,
}

/// Fields of the start form, parsed out of the multipart body.
#[derive(Default)]
struct StartForm {
    resume: Option<Bytes>,
    job_description: Option<String>,
    api_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::new(session.state(), state.config.has_credential()))
}

/// POST /api/v1/session/start
///
/// Multipart form: `resume` (PDF file), `job_description`, `api_key`.
/// Runs extraction, screening and question generation before responding.
pub async fn handle_start(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let form = read_start_form(multipart).await?;
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Please upload a resume PDF to begin.".to_string()))?;
    let job_description = form
        .job_description
        .unwrap_or_else(|| DEFAULT_JOB_DESCRIPTION.to_string());
    let credential = state.config.resolve_credential(form.api_key.as_deref());

    info!("Starting interview ({} byte resume)", resume.len());

    let mut session = state.session.lock().await;
    session.start(&credential, &resume, &job_description).await?;

    Ok(Json(SessionView::new(
        session.state(),
        state.config.has_credential(),
    )))
}

/// PUT /api/v1/session/answers/:index
///
/// Saves one answer while the user is still typing; nothing is graded.
pub async fn handle_record_answer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<RecordAnswerRequest>,
) -> Result<StatusCode, AppError> {
    let mut session = state.session.lock().await;
    session.record_answer(index, request.answer)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/session/answers
///
/// Grades all answers and returns the report text.
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswersRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let credential = state.config.resolve_credential(request.api_key.as_deref());

    let mut session = state.session.lock().await;
    let report = session.submit(&credential, request.answers).await?;

    Ok(Json(ReportResponse {
        report: report.to_string(),
        download_url: "/api/v1/session/report",
    }))
}

/// GET /api/v1/session/report
///
/// Downloads the rendered report PDF.
pub async fn handle_download_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session.lock().await;
    let document = session.report_document()?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes.clone(),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_start_form(mut multipart: Multipart) -> Result<StartForm, AppError> {
    let mut form = StartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let is_pdf = field.content_type() == Some("application/pdf")
                    || field
                        .file_name()
                        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
                if !is_pdf {
                    return Err(AppError::Validation(
                        "Only PDF files are allowed".to_string(),
                    ));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Invalid file".to_string()))?;
                form.resume = Some(data);
            }
            Some("job_description") => {
                form.job_description = Some(read_text(field).await?);
            }
            Some("api_key") => {
                form.api_key = Some(read_text(field).await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedClient;
    use crate::routes::build_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "hawk-boundary";

    fn test_config() -> Config {
        Config {
            google_api_key: Some("env-key".to_string()),
            gemini_api_url: "http://127.0.0.1:1".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            max_upload_mb: 5,
        }
    }

    fn app(replies: &[&str]) -> Router {
        let state = AppState::new(test_config(), ScriptedClient::replying(replies));
        build_router(state)
    }

    fn multipart_body(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((filename, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn start_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/session/start")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn resume_pdf() -> Vec<u8> {
        crate::render::render("Jane Doe\nData engineer")
            .unwrap()
            .bytes
            .to_vec()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = app(&[])
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_session_view_is_idle() {
        let response = app(&[])
            .oneshot(Request::get("/api/v1/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let view = body_json(response).await;
        assert_eq!(view["stage"], "idle");
        assert_eq!(view["job_description"], "Software Engineer - Python");
        assert_eq!(view["credential_loaded"], true);
        assert_eq!(view["message"], "Please upload a resume to begin.");
    }

    #[tokio::test]
    async fn test_start_without_resume_is_bad_request() {
        let body = multipart_body(&[("job_description", None, &b"Rust dev"[..])]);
        let response = app(&[]).oneshot(start_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_rejects_non_pdf_upload() {
        let body = multipart_body(&[("resume", Some(("cv.docx", "application/msword")), &b"doc"[..])]);
        let response = app(&[]).oneshot(start_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_with_unreadable_pdf_is_unprocessable() {
        let body = multipart_body(&[(
            "resume",
            Some(("cv.pdf", "application/pdf")),
            &b"not really a pdf"[..],
        )]);
        let response = app(&[]).oneshot(start_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error = body_json(response).await;
        assert_eq!(error["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_empty_job_description_field_is_kept() {
        let app = app(&["weak", "A?\nB?\nC?"]);
        let pdf = resume_pdf();
        let body = multipart_body(&[
            ("resume", Some(("cv.pdf", "application/pdf")), &pdf[..]),
            ("job_description", None, &b""[..]),
        ]);

        let response = app.oneshot(start_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["job_description"], "");
    }

    #[tokio::test]
    async fn test_start_without_job_description_field_uses_default() {
        let app = app(&["weak", "A?\nB?\nC?"]);
        let pdf = resume_pdf();
        let body = multipart_body(&[("resume", Some(("cv.pdf", "application/pdf")), &pdf[..])]);

        let response = app.oneshot(start_request(body)).await.unwrap();

        assert_eq!(
            body_json(response).await["job_description"],
            "Software Engineer - Python"
        );
    }

    #[tokio::test]
    async fn test_record_answer_after_report_conflicts() {
        let app = app(&["weak", "A?\nB?\nC?", "PASS"]);
        let pdf = resume_pdf();
        let body = multipart_body(&[("resume", Some(("cv.pdf", "application/pdf")), &pdf[..])]);
        app.clone().oneshot(start_request(body)).await.unwrap();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/session/answers",
                serde_json::json!({"answers": {"0": "x"}}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/session/answers/0",
                serde_json::json!({"answer": "changed"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_answers_before_analysis_conflict() {
        let response = app(&[])
            .oneshot(json_request(
                "POST",
                "/api/v1/session/answers",
                serde_json::json!({"answers": {"0": "hi"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_report_download_before_grading_is_not_found() {
        let response = app(&[])
            .oneshot(
                Request::get("/api/v1/session/report")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let app = app(&[
            "['no Spark', 'no Airflow', 'no Scala']",
            "1. What is a shuffle?\n2. How do DAGs retry?\n3. Why use Scala?",
            "Decision: Pass\nScore: 77\nFeedback: good depth.",
        ]);

        let pdf = resume_pdf();
        let body = multipart_body(&[
            ("resume", Some(("cv.pdf", "application/pdf")), &pdf[..]),
            ("job_description", None, &b"Data Engineer"[..]),
        ]);
        let response = app.clone().oneshot(start_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view = body_json(response).await;
        assert_eq!(view["stage"], "analyzed");
        assert_eq!(view["questions"][0]["label"], "Question 1");
        assert_eq!(view["questions"][2]["text"], "3. Why use Scala?");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/session/answers/1",
                serde_json::json!({"answer": "Per-task retries"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/session/answers",
                serde_json::json!({"answers": {"0": "Data redistribution"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(
            report["report"],
            "Decision: Pass\nScore: 77\nFeedback: good depth."
        );

        let response = app
            .oneshot(
                Request::get("/api/v1/session/report")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"InterviewHawk_Report.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
