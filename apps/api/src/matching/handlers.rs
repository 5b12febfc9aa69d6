//! Axum route handlers for the analysis API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::matching::{MatchEngine, MatchResult};
use crate::openai::OpenAiClient;
use crate::state::AppState;

/// Parsed and validated analysis input: extracted resume text plus the
/// pasted job description. Both are guaranteed non-empty — the engine is
/// never invoked otherwise.
struct AnalysisInput {
    resume_text: String,
    job_text: String,
}

/// POST /api/v1/analyze
///
/// Multipart form: `resume` file part (PDF or plain text) and
/// `job_description` text part. Returns the match result as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let input = read_analysis_input(multipart).await?;
    let engine = build_engine(&state).await?;
    let result = engine.analyze(&input.resume_text, &input.job_text).await?;
    Ok(Json(result))
}

/// POST /api/v1/analyze/report
///
/// Same input as `/analyze`, but returns the plain-text report as a
/// downloadable attachment.
pub async fn handle_analyze_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = read_analysis_input(multipart).await?;
    let engine = build_engine(&state).await?;
    let result = engine.analyze(&input.resume_text, &input.job_text).await?;

    let report = crate::report::render_report(&result);
    let headers = [
        (
            header::CONTENT_TYPE,
            crate::report::REPORT_CONTENT_TYPE.to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", crate::report::REPORT_FILENAME),
        ),
    ];
    Ok((headers, report).into_response())
}

/// Constructs a per-request engine. The API key is resolved here, once,
/// before any network call — a missing credential fails fast. Resolution
/// runs on the blocking pool: the secrets-file provider touches the
/// filesystem, which stays off the async worker threads.
async fn build_engine(state: &AppState) -> Result<MatchEngine, AppError> {
    let credentials = state.credentials.clone();
    let api_key = tokio::task::spawn_blocking(move || credentials.resolve())
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("credential resolution task failed: {e}"))
        })??;
    let client = Arc::new(OpenAiClient::new(
        state.http.clone(),
        api_key,
        &state.config,
    ));
    Ok(MatchEngine::new(
        client.clone(),
        client,
        Duration::from_secs(state.config.analysis_timeout_secs),
    ))
}

/// Pulls the resume file and job text out of the multipart form and enforces
/// the non-empty preconditions. Job text passes through unchanged.
async fn read_analysis_input(mut multipart: Multipart) -> Result<AnalysisInput, AppError> {
    let mut resume: Option<(Bytes, String)> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("resume") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("text/plain")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume upload: {e}")))?;
                resume = Some((data, content_type));
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                job_text = Some(text);
            }
            _ => {} // unknown parts ignored
        }
    }

    let (resume_bytes, content_type) = resume.ok_or_else(|| {
        AppError::Validation("Missing 'resume' file part — upload a resume to continue".to_string())
    })?;
    let job_text = job_text.ok_or_else(|| {
        AppError::Validation(
            "Missing 'job_description' part — paste a job description to continue".to_string(),
        )
    })?;

    let resume_text = extract_text(&resume_bytes, &content_type)?;

    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "The uploaded resume contains no extractable text".to_string(),
        ));
    }
    if job_text.trim().is_empty() {
        return Err(AppError::Validation(
            "The job description cannot be empty".to_string(),
        ));
    }

    Ok(AnalysisInput {
        resume_text,
        job_text,
    })
}
