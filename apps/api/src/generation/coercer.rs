//! Response Coercer: recovers typed values from free-form model output.
//!
//! Job listings: scan for the outermost `[ ... ]` span (first `[`, last `]`),
//! parse it as a JSON array of `JobPosting`, and on any failure substitute a
//! single placeholder posting derived from the request. This path never errors.
//!
//! Single strings (cover letter, subject line): whitespace trim, plus quote
//! stripping and length capping for subject lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Subject lines longer than this are truncated.
pub const MAX_SUBJECT_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

const FALLBACK_COMPANY: &str = "Tech Solutions Ltd";
const FALLBACK_EMAIL: &str = "hr@techsolutions.com";
const FALLBACK_PHONE: &str = "+91-80-1234-5678";

/// A single mock job posting. All fields are required strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub company: String,
    pub title: String,
    pub description: String,
    pub emails: String,
    pub phone: String,
}

/// Outcome of coercion. Both variants are successes; the tag says whether the
/// value came from the model or from the deterministic fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced<T> {
    Recovered(T),
    Fallback(T),
}

impl<T> Coerced<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Coerced::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Coerced::Recovered(v) | Coerced::Fallback(v) => v,
        }
    }
}

/// Why raw output could not be read as a job-posting list.
#[derive(Debug, Error)]
pub enum CoercionFailure {
    #[error("No JSON array found in response")]
    NoArray,

    #[error("Malformed job posting array: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Returns the inclusive span from the first `[` to the last `]`, if both exist
/// in that order.
pub fn outermost_array_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Strict parse of the outermost array span. Elements missing any field, or
/// carrying a non-string value, reject the whole list.
pub fn parse_job_postings(raw: &str) -> Result<Vec<JobPosting>, CoercionFailure> {
    let span = outermost_array_span(raw).ok_or(CoercionFailure::NoArray)?;
    Ok(serde_json::from_str(span)?)
}

/// Placeholder posting used when the model output cannot be parsed.
pub fn fallback_job_posting(title: &str, location: &str) -> JobPosting {
    JobPosting {
        company: FALLBACK_COMPANY.to_string(),
        title: title.to_string(),
        description: format!(
            "We are looking for a skilled {title} to join our team in {location}. \
             Competitive salary package offered."
        ),
        emails: FALLBACK_EMAIL.to_string(),
        phone: FALLBACK_PHONE.to_string(),
    }
}

/// Coerces raw model output into job postings. Never fails: unparseable output
/// yields exactly one fallback posting built from `title` and `location`.
pub fn coerce_job_postings(raw: &str, title: &str, location: &str) -> Coerced<Vec<JobPosting>> {
    match parse_job_postings(raw) {
        Ok(postings) => Coerced::Recovered(postings),
        Err(e) => {
            warn!("Failed to parse model job listings, using fallback: {e}");
            Coerced::Fallback(vec![fallback_job_posting(title, location)])
        }
    }
}

/// Single-string clean-up shared by every free-text result.
pub fn clean_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Subject clean-up: trim, drop one layer of surrounding quotes, trim again,
/// then cap at `MAX_SUBJECT_CHARS` characters.
pub fn clean_subject(raw: &str) -> String {
    let unquoted = strip_quote_layer(raw.trim()).trim();
    truncate_subject(unquoted)
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn strip_quote_layer(s: &str) -> &str {
    let s = s.strip_prefix(is_quote).unwrap_or(s);
    s.strip_suffix(is_quote).unwrap_or(s)
}

/// Caps `s` at `MAX_SUBJECT_CHARS`, replacing the tail with `...`.
pub(crate) fn truncate_subject(s: &str) -> String {
    if s.chars().count() <= MAX_SUBJECT_CHARS {
        return s.to_string();
    }
    let keep = MAX_SUBJECT_CHARS - ELLIPSIS.len();
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME_OUTPUT: &str = r#"Here you go: [{"company":"Acme","title":"PM","description":"Great role","emails":"hr@acme.com","phone":"+91-80-1111-2222"}] Hope that helps!"#;

    fn assert_fallback_for(raw: &str) {
        let result = coerce_job_postings(raw, "PM", "Pune");
        assert!(result.is_fallback(), "expected fallback for {raw:?}");
        let postings = result.into_inner();
        assert_eq!(postings.len(), 1);
        assert!(postings[0].description.contains("PM"));
        assert!(postings[0].description.contains("Pune"));
    }

    #[test]
    fn test_recovers_array_embedded_in_prose() {
        let result = coerce_job_postings(ACME_OUTPUT, "PM", "Pune");
        assert_eq!(
            result,
            Coerced::Recovered(vec![JobPosting {
                company: "Acme".to_string(),
                title: "PM".to_string(),
                description: "Great role".to_string(),
                emails: "hr@acme.com".to_string(),
                phone: "+91-80-1111-2222".to_string(),
            }])
        );
    }

    #[test]
    fn test_preserves_order_of_multiple_postings() {
        let raw = r#"```json
[
  {"company": "B Corp", "title": "PM", "description": "b", "emails": "b@b.com", "phone": "2"},
  {"company": "A Corp", "title": "PM", "description": "a", "emails": "a@a.com", "phone": "1"},
  {"company": "C Corp", "title": "PM", "description": "c", "emails": "c@c.com", "phone": "3", "extra": true}
]
```"#;
        let postings = coerce_job_postings(raw, "PM", "Pune").into_inner();
        let companies: Vec<&str> = postings.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(companies, vec!["B Corp", "A Corp", "C Corp"]);
    }

    #[test]
    fn test_empty_array_is_recovered_not_fallback() {
        let result = coerce_job_postings("No matches: []", "PM", "Pune");
        assert_eq!(result, Coerced::Recovered(vec![]));
    }

    #[test]
    fn test_prose_without_brackets_falls_back() {
        assert_fallback_for("I cannot generate this.");
    }

    #[test]
    fn test_fallback_posting_matches_template() {
        let posting = coerce_job_postings("I cannot generate this.", "PM", "Pune").into_inner();
        assert_eq!(
            posting[0],
            JobPosting {
                company: "Tech Solutions Ltd".to_string(),
                title: "PM".to_string(),
                description: "We are looking for a skilled PM to join our team in Pune. \
                              Competitive salary package offered."
                    .to_string(),
                emails: "hr@techsolutions.com".to_string(),
                phone: "+91-80-1234-5678".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_and_whitespace_input_fall_back() {
        assert_fallback_for("");
        assert_fallback_for("   \n\t");
    }

    #[test]
    fn test_truncated_json_falls_back() {
        assert_fallback_for(r#"[{"company":"Acme","title":"PM","description":"Great"#);
        assert_fallback_for(r#"[{"company":"Acme","title":"PM""#);
    }

    #[test]
    fn test_missing_required_key_falls_back() {
        assert_fallback_for(
            r#"[{"company":"Acme","title":"PM","description":"Great role","emails":"hr@acme.com"}]"#,
        );
    }

    #[test]
    fn test_non_string_field_falls_back() {
        assert_fallback_for(
            r#"[{"company":"Acme","title":"PM","description":"d","emails":"e","phone":9180111122}]"#,
        );
    }

    #[test]
    fn test_closing_bracket_before_opening_falls_back() {
        assert_fallback_for("oops ] then [");
        assert!(outermost_array_span("oops ] then [").is_none());
    }

    #[test]
    fn test_two_arrays_in_prose_span_the_gap_and_fall_back() {
        let raw = r#"First [{"company":"A","title":"t","description":"d","emails":"e","phone":"p"}] and [] done"#;
        assert_eq!(
            outermost_array_span(raw).map(|s| s.ends_with("and []")),
            Some(true)
        );
        assert_fallback_for(raw);
    }

    #[test]
    fn test_array_of_non_objects_falls_back() {
        assert_fallback_for("[1, 2, 3]");
    }

    #[test]
    fn test_parse_failure_reasons() {
        assert!(matches!(
            parse_job_postings("nothing here"),
            Err(CoercionFailure::NoArray)
        ));
        assert!(matches!(
            parse_job_postings("[not json]"),
            Err(CoercionFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_clean_text_trims() {
        assert_eq!(clean_text("\n  Dear Hiring Manager,\n\nThanks.  \n"), "Dear Hiring Manager,\n\nThanks.");
    }

    #[test]
    fn test_subject_quotes_removed() {
        assert_eq!(
            clean_subject("\"Experienced PM Interested in Acme Opportunity\""),
            "Experienced PM Interested in Acme Opportunity"
        );
        assert_eq!(clean_subject("  'Application: PM at Acme'\n"), "Application: PM at Acme");
        assert_eq!(clean_subject("\" Padded inside \""), "Padded inside");
    }

    #[test]
    fn test_subject_strips_only_one_quote_layer() {
        assert_eq!(clean_subject("\"\"Double\"\""), "\"Double\"");
    }

    #[test]
    fn test_subject_cleanup_is_idempotent_on_clean_input() {
        let clean = "Product Manager Application";
        assert_eq!(clean_subject(clean), clean);
        assert_eq!(clean_subject(&clean_subject(clean)), clean);
    }

    #[test]
    fn test_long_subject_truncated_to_exactly_100_chars() {
        let long = "A".repeat(150);
        let subject = clean_subject(&long);
        assert_eq!(subject.chars().count(), MAX_SUBJECT_CHARS);
        assert!(subject.ends_with("..."));
        assert_eq!(&subject[..97], &long[..97]);
    }

    #[test]
    fn test_subject_of_exactly_100_chars_is_untouched() {
        let exact = "B".repeat(100);
        assert_eq!(clean_subject(&exact), exact);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let long = "é".repeat(120);
        let subject = clean_subject(&long);
        assert_eq!(subject.chars().count(), MAX_SUBJECT_CHARS);
        assert!(subject.starts_with("ééé"));
    }

    #[test]
    fn test_coerced_accessors() {
        let recovered = Coerced::Recovered(1);
        let fallback = Coerced::Fallback(2);
        assert!(!recovered.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(recovered.into_inner(), 1);
        assert_eq!(fallback.into_inner(), 2);
    }
}
