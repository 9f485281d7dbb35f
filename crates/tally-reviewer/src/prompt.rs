//! Prompt construction for escalation review

use tally_domain::Claim;

/// Build the review prompt for a single escalated claim
pub fn build_review_prompt(claim: &Claim) -> String {
    let issue = claim
        .notes
        .last()
        .cloned()
        .unwrap_or_else(|| "Low confidence".to_string());

    format!(
        r#"You are a financial analyst reviewing AI-extracted data.

CONTEXT:
An AI extracted this KPI but flagged it for review due to uncertainty.

EXTRACTION:
{{
  "kpi_name": "{kpi_name}",
  "value": {value},
  "unit": "{unit}",
  "fiscal_year": {fiscal_year},
  "confidence": {confidence},
  "issue": "{issue}"
}}

PAGE IMAGE:
[Image attached]

TASK:
1. Review the page image
2. Determine if the extraction is:
   - CORRECT (confirm value + reasoning)
   - INCORRECT (provide corrected value + reasoning)
   - AMBIGUOUS (explain why it cannot be determined)
3. If ambiguous, state what additional context would help

{output_format}"#,
        kpi_name = claim.kpi_name,
        value = claim.display_value(),
        unit = claim.unit,
        fiscal_year = claim.fiscal_year,
        confidence = claim.confidence,
        issue = issue,
        output_format = OUTPUT_FORMAT,
    )
}

const OUTPUT_FORMAT: &str = r#"OUTPUT JSON ONLY:
{
  "decision": "CORRECT" | "INCORRECT" | "AMBIGUOUS",
  "corrected_value": null | <number>,
  "review_confidence": 0.0-1.0,
  "reasoning": "...",
  "additional_context": "..." (only if ambiguous)
}"#;
