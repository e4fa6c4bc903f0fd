//! Answer Grading — classifies a generated answer as useful, not useful, or
//! not supported (hallucinated) relative to the evidence it was generated
//! against.
//!
//! Parsing is strict: output that does not decode into the two expected
//! yes/no fields is a hard failure of the grading step, surfaced to the
//! controller — silently defaulting a grade would mask hallucinations.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{strip_json_fences, CompletionBackend, LlmError};
use crate::workflow::prompts::{GRADE_PROMPT_TEMPLATE, GRADE_SYSTEM};
use crate::workflow::state::{GenerationResult, GradeVerdict};

#[derive(Debug, Error)]
pub enum GradeError {
    #[error("Grading backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("Grade output failed strict parsing: {0}")]
    Parse(String),
}

/// Raw structured output of the grading call. Both fields must be the
/// literal strings "yes" or "no" (case-insensitive).
#[derive(Debug, Deserialize)]
struct GradeAnswer {
    answers_question: String,
    hallucination: String,
}

/// Grades `result.answer` against the question and the evidence snapshot
/// carried by the result.
pub async fn grade_generation(
    backend: &dyn CompletionBackend,
    question: &str,
    result: &GenerationResult,
) -> Result<GradeVerdict, GradeError> {
    let context = result
        .evidence
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = GRADE_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{generation}", &result.answer)
        .replace("{context}", &context);

    let output = backend.complete(&prompt, GRADE_SYSTEM).await?;
    let verdict = parse_grade(&output)?;
    debug!("Grade verdict: {verdict:?}");
    Ok(verdict)
}

/// Decodes the grading output and maps the field pair to a verdict:
///
/// | answers question | hallucinated | verdict      |
/// |------------------|--------------|--------------|
/// | yes              | no           | Useful       |
/// | yes              | yes          | NotSupported |
/// | no               | (either)     | NotUseful    |
fn parse_grade(output: &str) -> Result<GradeVerdict, GradeError> {
    let graded: GradeAnswer = serde_json::from_str(strip_json_fences(output))
        .map_err(|e| GradeError::Parse(e.to_string()))?;

    let answers = parse_yes_no(&graded.answers_question)
        .ok_or_else(|| GradeError::Parse(format!("answers_question: {:?}", graded.answers_question)))?;
    let hallucinated = parse_yes_no(&graded.hallucination)
        .ok_or_else(|| GradeError::Parse(format!("hallucination: {:?}", graded.hallucination)))?;

    Ok(match (answers, hallucinated) {
        (true, false) => GradeVerdict::Useful,
        (true, true) => GradeVerdict::NotSupported,
        (false, _) => GradeVerdict::NotUseful,
    })
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn grade_json(answers: &str, hallucination: &str) -> String {
        format!(r#"{{"answers_question": "{answers}", "hallucination": "{hallucination}"}}"#)
    }

    #[test]
    fn test_mapping_covers_all_four_combinations() {
        // The full table from the grading contract.
        let cases = [
            ("yes", "no", GradeVerdict::Useful),
            ("yes", "yes", GradeVerdict::NotSupported),
            ("no", "no", GradeVerdict::NotUseful),
            ("no", "yes", GradeVerdict::NotUseful),
        ];
        for (answers, hallucination, expected) in cases {
            let verdict = parse_grade(&grade_json(answers, hallucination)).unwrap();
            assert_eq!(verdict, expected, "case ({answers}, {hallucination})");
        }
    }

    #[test]
    fn test_mapping_is_case_insensitive() {
        let verdict = parse_grade(&grade_json("Yes", "NO")).unwrap();
        assert_eq!(verdict, GradeVerdict::Useful);
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let output = format!("```json\n{}\n```", grade_json("yes", "no"));
        assert_eq!(parse_grade(&output).unwrap(), GradeVerdict::Useful);
    }

    #[test]
    fn test_missing_field_is_hard_parse_failure() {
        let result = parse_grade(r#"{"answers_question": "yes"}"#);
        assert!(matches!(result, Err(GradeError::Parse(_))));
    }

    #[test]
    fn test_non_yes_no_value_is_hard_parse_failure() {
        let result = parse_grade(&grade_json("maybe", "no"));
        assert!(matches!(result, Err(GradeError::Parse(_))));
    }

    #[test]
    fn test_prose_output_is_hard_parse_failure() {
        let result = parse_grade("The answer looks fine to me.");
        assert!(matches!(result, Err(GradeError::Parse(_))));
    }

    #[tokio::test]
    async fn test_grade_generation_end_to_end() {
        let backend = CannedBackend(r#"{"answers_question": "yes", "hallucination": "yes"}"#);
        let result = GenerationResult::grounded(
            "You worked at three companies.",
            vec![crate::workflow::state::EvidenceDoc::resume("One company listed")],
        );
        let verdict = grade_generation(&backend, "Where did I work?", &result)
            .await
            .unwrap();
        assert_eq!(verdict, GradeVerdict::NotSupported);
    }
}
