// Resume / job description analysis.
// Implements: PDF text extraction, prompt building, the three LLM stages, reply parsing.
// All LLM calls go through llm_client, never to Gemini directly.

pub mod extractor;
pub mod handlers;
pub mod match_parser;
pub mod pipeline;
pub mod prompts;
pub mod uploads;
