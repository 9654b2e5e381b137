//! Shared prompt fragments used for every model call.
//! Task-specific templates live next to the analysis pipeline.

/// System prompt that asks for JSON-only output.
/// The extractor still tolerates prose around the payload; this just makes it rarer.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career-coaching assistant. \
    You MUST respond with valid JSON only. \
    Respond with exactly one JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
