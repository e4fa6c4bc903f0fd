// All LLM prompt constants for the answering workflow.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for query expansion.
pub const EXPAND_SYSTEM: &str = "You rephrase questions to widen retrieval recall. \
    Respond with a numbered list only — no preamble, no commentary.";

/// Query expansion prompt template. Replace `{num_variations}` and `{question}`.
pub const EXPAND_PROMPT_TEMPLATE: &str = r#"Rephrase the following query into {num_variations} different ways.
Each variation should ask the question from a slightly different perspective
(synonyms, structural rephrasing, angle of inquiry).

Query: "{question}"

Return as a numbered list."#;

/// System prompt for routing classification.
pub const ROUTING_SYSTEM: &str = "You are a routing assistant that decides which subsystem \
    should handle a user's message. \
    You MUST respond with exactly one uppercase word: VECTORSTORE, WEBSEARCH, or LLM. \
    No other output.";

/// Routing prompt template.
/// Replace: {resume_summary}, {jd_summary}, {conversation_history}, {question}
pub const ROUTING_PROMPT_TEMPLATE: &str = r#"Decide which subsystem should handle the user's message.

Resume summary (most important signal):
{resume_summary}

Job description summary:
{jd_summary}

Conversation history (for continuity):
{conversation_history}

Routing rules (apply in order):

1. VECTORSTORE — the question involves details found in the resume: experience,
   projects, education, certifications, skills, achievements, job alignment or
   gaps; or it references earlier resume-related turns; or it uses first-person
   terms (my, me, I) about professional background.
2. WEBSEARCH — the question needs fresh, external, or time-sensitive knowledge:
   current trends, market data, salaries, company news, or anything not covered
   by the resume or job description.
3. LLM — the question is general, conversational, or a greeting; or it needs
   reasoning and discussion rather than factual retrieval.

Use the conversation history to resolve ambiguous follow-ups ("these", "it",
"that one"). If none of the rules clearly applies, respond with LLM.

Respond ONLY with one of: VECTORSTORE, WEBSEARCH, or LLM.

User question: {question}"#;

/// System prompt for grounded answer generation.
pub const RAG_SYSTEM: &str = "You are an executive career advisor answering questions about \
    a candidate's resume. You provide accurate, professional insights strictly based on the \
    retrieved information you are given.";

/// Grounded generation prompt template.
/// Replace: {grounding_instruction}, {context}, {job_description},
///          {conversation_history}, {question}
pub const RAG_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Retrieved resume content (primary source of truth):
{context}

Job description (use only for fit, gap, or alignment questions):
{job_description}

Ongoing conversation (for tone and continuity only — never as factual evidence):
{conversation_history}

Response style:
- Structured, concise, and to the point.
- No speculation beyond the provided data.
- If the data is insufficient, say exactly:
  "The provided information is insufficient to assess this aspect accurately."

User question: {question}"#;

/// System prompt for the conversational fallback path.
pub const FALLBACK_SYSTEM: &str = "You are a friendly, versatile assistant. You handle greetings, \
    small talk, and brief general career guidance. You never invent facts about the user's \
    resume — you have not seen it.";

/// Fallback prompt template. Replace: {conversation_history}, {question}
pub const FALLBACK_PROMPT_TEMPLATE: &str = r#"Previous conversation (for tone and flow only, not a factual source):
{conversation_history}

Answer the question, greeting, or small talk concisely — one to three short
paragraphs. If it cannot be answered factually, say so briefly.

User question: {question}"#;

/// System prompt for answer grading — enforces JSON-only output.
pub const GRADE_SYSTEM: &str = "You are a grader assessing an AI answer. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Grading prompt template. Replace: {question}, {generation}, {context}
pub const GRADE_PROMPT_TEMPLATE: &str = r#"Assess the AI answer below.

1. Does the answer address/resolve the user's question?
2. Does the answer contain hallucinations — claims not present in the provided context?

Return a JSON object with this EXACT schema (both values must be "yes" or "no"):
{
  "answers_question": "yes",
  "hallucination": "no"
}

User question: {question}
AI answer: {generation}
Context (resume/docs): {context}"#;

/// System prompt for web-search answer synthesis.
pub const WEB_SYNTH_SYSTEM: &str =
    "You answer questions concisely using the provided web search results.";

/// Web synthesis prompt template. Replace: {question}, {web_results}
pub const WEB_SYNTH_PROMPT_TEMPLATE: &str = r#"Question: {question}

Context (from web search results):
{web_results}

Provide a concise and informative answer."#;

/// System prompt for job-description summarization.
pub const SUMMARIZE_JD_SYSTEM: &str = "You are a job description analyst specializing in \
    talent matching and role alignment. You produce concise, high-fidelity summaries.";

/// JD summarization prompt template. Replace `{job_description}`.
pub const SUMMARIZE_JD_PROMPT_TEMPLATE: &str = r#"Summarize the job description below, retaining every element relevant to
resume-job fit analysis:

- Core responsibilities and deliverables
- Key required and preferred skills (technical + soft)
- Education or certification requirements
- Tools, technologies, or frameworks
- Seniority level or leadership expectations

Do NOT include generic HR phrasing, benefits, or company fluff.

Job description:
{job_description}

Return the summary as short bullet points."#;
