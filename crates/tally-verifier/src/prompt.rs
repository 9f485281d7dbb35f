//! Prompt construction for page verification

use tally_oracle::ClaimDigest;

/// Build the verification prompt for one page batch
///
/// The oracle gets the page image alongside this text; the claim list is
/// embedded as JSON so ids can be echoed back verbatim.
pub fn build_verification_prompt(page: u32, claims: &[ClaimDigest]) -> String {
    let claim_list = serde_json::to_string_pretty(claims)
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You previously extracted these KPIs from page {page}.

PREVIOUS EXTRACTIONS:
{claim_list}

IMAGE (same page, for reference):
[Image attached]

TASK: Review your own extractions and check for errors.

{checklist}

{output_format}"#,
        page = page,
        claim_list = claim_list,
        checklist = COMMON_ERRORS_CHECKLIST,
        output_format = OUTPUT_FORMAT,
    )
}

const COMMON_ERRORS_CHECKLIST: &str = r#"Common errors to check:
1. Wrong fiscal year column selected
2. Wrong row (extracted wrong metric)
3. Misread number (OCR error)
4. Wrong units (thousands vs millions vs crores)
5. Missed footnote that changes interpretation
6. Extracted financial statement item by mistake"#;

const OUTPUT_FORMAT: &str = r#"OUTPUT JSON ONLY:
{
  "page": <page number>,
  "review_status": "CONFIRMED" | "CORRECTED" | "FLAGGED",
  "corrections": [
    {
      "id": "<claim id>",
      "corrected_value": <number> | null,
      "status": "CONFIRMED" | "CORRECTED" | "FLAGGED",
      "verification_confidence": 0.0-1.0,
      "reasoning": "..."
    }
  ]
}

Only list claims that need a judgment other than plain confirmation.
Return ONLY valid JSON, no markdown code blocks, no explanations."#;
