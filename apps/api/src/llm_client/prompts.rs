// Shared prompt fragments.
// Task-specific templates live next to the code that sends them (analysis/prompts.rs).

/// Instruction appended to prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY the JSON object. \
Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences. \
Do NOT include explanations or apologies.";
