// Prompt templates for the analysis pipeline.
// Placeholders are replaced verbatim; no other branching happens here.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// The three kinds of request the pipeline sends to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Resume,
    JobDescription,
    Match,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Resume => "resume",
            TaskKind::JobDescription => "job_description",
            TaskKind::Match => "match",
        }
    }
}

/// The tasks that summarise a single text. Matching takes two inputs and goes through
/// `build_match_prompt` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Resume,
    JobDescription,
}

impl SummaryKind {
    pub fn task(self) -> TaskKind {
        match self {
            SummaryKind::Resume => TaskKind::Resume,
            SummaryKind::JobDescription => TaskKind::JobDescription,
        }
    }
}

/// Resume extraction template. Replace `{resume_text}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are a resume parser.

Extract:
- Skills
- Experience summary
- Education
- Tools & technologies

Resume:
{resume_text}

Return in bullet points."#;

/// Job description extraction template. Replace `{jd_text}` before sending.
pub const JOB_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Extract:
- Required skills
- Responsibilities
- Preferred qualifications

Job Description:
{jd_text}

Return in bullet points."#;

/// ATS matching template.
/// Replace: {parsed_resume}, {parsed_jd}, {json_only}
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an Applicant Tracking System.

Compare the resume and job description.

Resume:
{parsed_resume}

Job Description:
{parsed_jd}

Respond with a JSON object with this EXACT shape:
{
  "score": 0,
  "summary": "One or two sentences on overall fit",
  "pros": ["Matching skill or strength"],
  "cons": ["Missing skill or gap"],
  "improvements": ["Concrete suggestion to improve the resume for this role"]
}

Rules:
- "score" is an integer match percentage from 0 to 100
- "pros" lists matching skills and strengths
- "cons" lists missing skills and weaknesses
- "improvements" lists actionable suggestions

{json_only}"#;

/// Builds the extraction prompt for a single text blob.
pub fn build_prompt(kind: SummaryKind, text: &str) -> String {
    match kind {
        SummaryKind::Resume => RESUME_PROMPT_TEMPLATE.replace("{resume_text}", text),
        SummaryKind::JobDescription => JOB_DESCRIPTION_PROMPT_TEMPLATE.replace("{jd_text}", text),
    }
}

pub fn build_match_prompt(parsed_resume: &str, parsed_jd: &str) -> String {
    let template = MATCH_PROMPT_TEMPLATE.replace("{json_only}", JSON_ONLY_INSTRUCTION);
    fill_in_order(
        &template,
        &[("{parsed_resume}", parsed_resume), ("{parsed_jd}", parsed_jd)],
    )
}

/// Substitutes each placeholder once, left to right, so inserted text is never rescanned.
fn fill_in_order(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + slots.iter().map(|(_, value)| value.len()).sum::<usize>(),
    );
    let mut rest = template;
    for &(placeholder, value) in slots {
        if let Some((before, after)) = rest.split_once(placeholder) {
            out.push_str(before);
            out.push_str(value);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
