//! Analysis pipeline: three sequential LLM stages.
//!
//! Flow: format_resume → format_job_description → match_profiles.
//!
//! No stage can fail the request. Each one reports a `StageOutcome`: either the model
//! produced what was asked for, or the stage substituted a fallback value and says why.

use tracing::{debug, info, warn};

use crate::analysis::match_parser::parse_match_response;
use crate::analysis::prompts::{build_match_prompt, build_prompt, SummaryKind, TaskKind};
use crate::llm_client::LlmClient;
use crate::models::MatchResult;

/// Request progression for `POST /analyze`. Strictly sequential; any step may end the
/// request early with an error response instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    ReceivedUpload,
    Saved,
    TextExtracted,
    ResumeFormatted,
    JdFormatted,
    Matched,
    Responded,
}

impl AnalysisState {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisState::ReceivedUpload => "received_upload",
            AnalysisState::Saved => "saved",
            AnalysisState::TextExtracted => "text_extracted",
            AnalysisState::ResumeFormatted => "resume_formatted",
            AnalysisState::JdFormatted => "jd_formatted",
            AnalysisState::Matched => "matched",
            AnalysisState::Responded => "responded",
        }
    }
}

pub fn advance(state: AnalysisState) {
    debug!(state = state.as_str(), "Analysis state");
}

/// Result of one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Completed(T),
    Degraded { value: T, cause: String },
}

impl<T> StageOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutcome::Degraded { .. })
    }

    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Completed(value) | StageOutcome::Degraded { value, .. } => value,
        }
    }
}

/// Everything one analysis produced. Only `result` is part of the default response.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub result: MatchResult,
    pub parsed_resume: String,
    pub parsed_job_description: String,
    pub degraded_stages: Vec<TaskKind>,
}

/// Summarises the resume. Falls back to the raw resume text.
pub async fn format_resume(
    llm: &dyn LlmClient,
    model: &str,
    resume_text: &str,
) -> StageOutcome<String> {
    format_text(llm, model, SummaryKind::Resume, resume_text).await
}

/// Summarises the job description. Falls back to the raw job description.
pub async fn format_job_description(
    llm: &dyn LlmClient,
    model: &str,
    jd_text: &str,
) -> StageOutcome<String> {
    format_text(llm, model, SummaryKind::JobDescription, jd_text).await
}

async fn format_text(
    llm: &dyn LlmClient,
    model: &str,
    kind: SummaryKind,
    text: &str,
) -> StageOutcome<String> {
    let prompt = build_prompt(kind, text);
    match llm.generate(model, &prompt).await {
        Ok(reply) => StageOutcome::Completed(reply),
        Err(e) => {
            warn!("LLM {} stage failed, echoing input: {e}", kind.task().label());
            StageOutcome::Degraded {
                value: text.to_string(),
                cause: e.to_string(),
            }
        }
    }
}

/// Scores the formatted resume against the formatted job description.
pub async fn match_profiles(
    llm: &dyn LlmClient,
    model: &str,
    parsed_resume: &str,
    parsed_jd: &str,
) -> StageOutcome<MatchResult> {
    let prompt = build_match_prompt(parsed_resume, parsed_jd);
    let reply = match llm.generate(model, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("LLM match stage failed: {e}");
            return StageOutcome::Degraded {
                value: MatchResult::fallback(),
                cause: e.to_string(),
            };
        }
    };

    match parse_match_response(&reply) {
        Ok(result) => StageOutcome::Completed(result),
        Err(e) => {
            warn!(reply_len = reply.len(), "Unparseable match reply: {e}");
            StageOutcome::Degraded {
                value: MatchResult::fallback(),
                cause: e.to_string(),
            }
        }
    }
}

/// Runs the three stages in order. Each LLM call is made exactly once.
pub async fn run_analysis(
    llm: &dyn LlmClient,
    model: &str,
    resume_text: &str,
    jd_text: &str,
) -> AnalysisReport {
    let mut degraded_stages = Vec::new();

    let resume = format_resume(llm, model, resume_text).await;
    if resume.is_degraded() {
        degraded_stages.push(TaskKind::Resume);
    }
    let parsed_resume = resume.into_value();
    advance(AnalysisState::ResumeFormatted);

    let jd = format_job_description(llm, model, jd_text).await;
    if jd.is_degraded() {
        degraded_stages.push(TaskKind::JobDescription);
    }
    let parsed_job_description = jd.into_value();
    advance(AnalysisState::JdFormatted);

    let matched = match_profiles(llm, model, &parsed_resume, &parsed_job_description).await;
    if matched.is_degraded() {
        degraded_stages.push(TaskKind::Match);
    }
    let result = matched.into_value();
    advance(AnalysisState::Matched);

    info!(
        score = result.score,
        degraded = degraded_stages.len(),
        "Analysis complete"
    );

    AnalysisReport {
        result,
        parsed_resume,
        parsed_job_description,
        degraded_stages,
    }
}
