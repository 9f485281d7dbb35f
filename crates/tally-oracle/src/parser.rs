//! Parse oracle replies into typed responses

use crate::error::OracleError;
use serde::de::DeserializeOwned;

/// Parse an oracle's raw text reply into a typed response
///
/// Vision models routinely wrap their JSON in markdown code fences; this
/// strips them before deserializing. A reply that still fails to parse is
/// an [`OracleError::InvalidResponse`], which callers treat as "no
/// correction available".
pub fn parse_oracle_response<T: DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    let json = extract_json(raw)?;
    serde_json::from_str(&json)
        .map_err(|e| OracleError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Extract JSON from a reply, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, OracleError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(OracleError::InvalidResponse("Empty code block".to_string()));
        }

        // Skip the opening fence (``` or ```json) and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageVerification, ReviewDecision, ReviewVerdict};

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"page": 5, "review_status": "CONFIRMED", "corrections": []}"#;
        let pv: PageVerification = parse_oracle_response(raw).unwrap();
        assert_eq!(pv.page, 5);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"page\": 5, \"corrections\": []}\n```";
        let pv: PageVerification = parse_oracle_response(raw).unwrap();
        assert_eq!(pv.page, 5);
    }

    #[test]
    fn test_parse_fence_without_language() {
        let raw = "```\n{\"decision\": \"CORRECT\", \"review_confidence\": 0.95, \"reasoning\": \"matches\"}\n```";
        let verdict: ReviewVerdict = parse_oracle_response(raw).unwrap();
        assert_eq!(verdict.decision, ReviewDecision::Correct);
    }

    #[test]
    fn test_parse_garbage_is_invalid_response() {
        let result: Result<PageVerification, _> = parse_oracle_response("I could not decide.");
        assert!(matches!(result, Err(OracleError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_schema_violation_is_invalid_response() {
        // Valid JSON, wrong shape
        let result: Result<PageVerification, _> = parse_oracle_response(r#"{"pages": [1, 2]}"#);
        assert!(matches!(result, Err(OracleError::InvalidResponse(_))));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let raw = "\n\n  {\"page\": 3, \"corrections\": []}  \n";
        let pv: PageVerification = parse_oracle_response(raw).unwrap();
        assert_eq!(pv.page, 3);
    }
}
