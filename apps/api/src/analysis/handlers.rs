//! Axum route handler for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::pipeline::{advance, run_analysis, AnalysisState};
use crate::errors::AppError;
use crate::models::MatchResult;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";
const PARSED_RESUME_KEY: &str = "parsed_resume";
const PARSED_JOB_DESCRIPTION_KEY: &str = "parsed_job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    /// Also return the intermediate LLM summaries of the resume and job description.
    #[serde(default)]
    pub include_parsed: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_job_description: Option<String>,
}

struct ResumeUpload {
    filename: Option<String>,
    data: Bytes,
}

struct AnalyzeForm {
    resume: Option<ResumeUpload>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Multipart form: `resume` (PDF file) and `job_description` (text).
/// Returns the match report. LLM failures degrade into the fallback report rather than
/// an error status.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    advance(AnalysisState::ReceivedUpload);

    let multipart = multipart
        .map_err(|e| AppError::Validation(format!("Expected a multipart form upload: {e}")))?;
    let form = read_form(multipart).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Resume PDF is required".to_string()))?;
    let job_description = form
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    let saved = state
        .uploads
        .save(resume.filename.as_deref(), &resume.data)
        .await?;
    advance(AnalysisState::Saved);

    let resume_text = state.extractor.extract(saved.path()).await;
    if let Err(e) = saved.discard().await {
        warn!("Failed to remove upload after extraction: {e}");
    }
    advance(AnalysisState::TextExtracted);

    if resume_text.trim().is_empty() {
        return Err(AppError::Validation("Empty or unreadable PDF".to_string()));
    }
    info!(
        resume_chars = resume_text.len(),
        jd_chars = job_description.len(),
        "Starting analysis"
    );

    let report = run_analysis(
        state.llm.as_ref(),
        &state.config.gemini_model,
        &resume_text,
        &job_description,
    )
    .await;

    let response = if params.include_parsed {
        let mut result = report.result;
        // Flattened model keys must not shadow the real intermediate texts.
        result.extra.remove(PARSED_RESUME_KEY);
        result.extra.remove(PARSED_JOB_DESCRIPTION_KEY);
        AnalyzeResponse {
            result,
            parsed_resume: Some(report.parsed_resume),
            parsed_job_description: Some(report.parsed_job_description),
        }
    } else {
        AnalyzeResponse {
            result: report.result,
            parsed_resume: None,
            parsed_job_description: None,
        }
    };

    advance(AnalysisState::Responded);
    Ok(Json(response))
}

/// Collects the known fields in whatever order they arrive. Unknown fields are skipped.
async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm {
        resume: None,
        job_description: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let filename = field.file_name().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                form.resume = Some(ResumeUpload { filename, data });
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job description: {e}"))
                })?;
                form.job_description = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}
