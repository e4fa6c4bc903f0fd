#![allow(dead_code)]

// Shared prompt fragments. Each workflow module defines its own prompts
// alongside it; this file holds only the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every evidence-conditioned generation prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every claim strictly on the retrieved content provided. \
    Do NOT infer, interpolate, or invent details. \
    If the provided information is insufficient, say so explicitly instead \
    of speculating.";
