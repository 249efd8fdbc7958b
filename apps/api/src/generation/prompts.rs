//! Prompt Builder: turns typed request fields into a single prompt string.
//!
//! Templates are constants with `{name}` placeholders. `fill_template` substitutes
//! them in one pass, so a field value that happens to contain `{title}` is
//! inserted as-is and never expanded again.

/// Which prompt to build, carrying the fields it interpolates.
#[derive(Debug, Clone, Copy)]
pub enum PromptRequest<'a> {
    JobSearch {
        title: &'a str,
        location: &'a str,
        ctc: Option<&'a str>,
    },
    CoverLetter {
        job_title: &'a str,
        company: &'a str,
        resume_text: &'a str,
    },
    SubjectLine {
        job_title: &'a str,
        company: &'a str,
        cover_letter_content: &'a str,
        job_description: Option<&'a str>,
    },
}

/// Job search prompt. Replace: {title}, {location}, {ctc_text}
pub const JOB_SEARCH_PROMPT_TEMPLATE: &str = r#"Generate 3 realistic job postings for {title} position in {location}{ctc_text}.
Each job should include:
- Company name (realistic tech/IT company)
- Exact job title
- Brief description snippet (2-3 sentences)
- HR contact email (if none exists, suggest hr@company.com format)
- Phone number (Indian format, e.g. +91-80-XXXX-XXXX)

Output as a JSON array of objects with keys company, title, description, emails, phone.
Use this exact structure:
[
    {
        "company": "Company Name",
        "title": "Job Title",
        "description": "Brief description snippet",
        "emails": "hr@company.com",
        "phone": "+91-80-1234-5678"
    }
]

Make the jobs realistic for the Indian market and {location} specifically."#;

/// Cover letter prompt. Replace: {job_title}, {company}, {resume_text}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a 150-word professional cover letter for {job_title} position at {company}.
Highlight relevant skills and experiences from this resume: {resume_text}.

The cover letter should:
- Be professional and concise (around 150 words)
- Show enthusiasm for the role and company
- Connect resume skills to job requirements
- Include a strong opening and closing
- Be ready to copy-paste into an email

Format it as a proper business letter with:
- Greeting (Dear Hiring Manager,)
- 3-4 paragraphs
- Professional closing (Best regards, [Name])"#;

/// Subject line prompt.
/// Replace: {job_title}, {company}, {job_description}, {cover_letter_content}
pub const SUBJECT_LINE_PROMPT_TEMPLATE: &str = r#"Write one professional email subject line for a job application for the {job_title} position at {company}.

Job description:
{job_description}

Cover letter:
{cover_letter_content}

Rules:
- Return plain text only: the subject line and nothing else
- Do NOT wrap it in quotes
- Keep it under 100 characters
- Mention the role and the company"#;

/// Builds the prompt for `request`. Pure; absent optional fields become empty strings.
pub fn build_prompt(request: &PromptRequest<'_>) -> String {
    match *request {
        PromptRequest::JobSearch {
            title,
            location,
            ctc,
        } => {
            let ctc_text = match ctc.map(str::trim) {
                Some(ctc) if !ctc.is_empty() => format!(" at {ctc} salary range"),
                _ => String::new(),
            };
            fill_template(
                JOB_SEARCH_PROMPT_TEMPLATE,
                &[
                    ("title", title),
                    ("location", location),
                    ("ctc_text", ctc_text.as_str()),
                ],
            )
        }
        PromptRequest::CoverLetter {
            job_title,
            company,
            resume_text,
        } => fill_template(
            COVER_LETTER_PROMPT_TEMPLATE,
            &[
                ("job_title", job_title),
                ("company", company),
                ("resume_text", resume_text),
            ],
        ),
        PromptRequest::SubjectLine {
            job_title,
            company,
            cover_letter_content,
            job_description,
        } => fill_template(
            SUBJECT_LINE_PROMPT_TEMPLATE,
            &[
                ("job_title", job_title),
                ("company", company),
                ("job_description", job_description.unwrap_or_default()),
                ("cover_letter_content", cover_letter_content),
            ],
        ),
    }
}

/// Replaces each known `{key}` in `template` with its value. Braces that do not
/// enclose a known key (the JSON example, for instance) are kept verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_search_prompt_embeds_fields_and_ctc() {
        let prompt = build_prompt(&PromptRequest::JobSearch {
            title: "Product Manager",
            location: "Bangalore",
            ctc: Some("15-25 LPA"),
        });
        assert!(prompt.starts_with(
            "Generate 3 realistic job postings for Product Manager position in Bangalore at 15-25 LPA salary range."
        ));
        assert!(prompt.contains("keys company, title, description, emails, phone"));
        assert!(prompt.contains("Bangalore specifically"));
        assert!(prompt.contains("\"emails\": \"hr@company.com\""));
    }

    #[test]
    fn test_job_search_prompt_without_ctc() {
        for ctc in [None, Some(""), Some("   ")] {
            let prompt = build_prompt(&PromptRequest::JobSearch {
                title: "PM",
                location: "Pune",
                ctc,
            });
            assert!(prompt.starts_with("Generate 3 realistic job postings for PM position in Pune.\n"));
            assert!(!prompt.contains("salary range"));
        }
    }

    #[test]
    fn test_cover_letter_prompt_embeds_resume_verbatim() {
        let resume = "5+ years in SaaS; led 3 launches & grew MAU 40%";
        let prompt = build_prompt(&PromptRequest::CoverLetter {
            job_title: "Product Manager",
            company: "Acme",
            resume_text: resume,
        });
        assert!(prompt.contains("for Product Manager position at Acme."));
        assert!(prompt.contains(resume));
        assert!(prompt.contains("Dear Hiring Manager,"));
    }

    #[test]
    fn test_subject_prompt_missing_description_is_empty() {
        let prompt = build_prompt(&PromptRequest::SubjectLine {
            job_title: "PM",
            company: "Acme",
            cover_letter_content: "Dear Hiring Manager, ...",
            job_description: None,
        });
        assert!(prompt.contains("Job description:\n\n\nCover letter:\nDear Hiring Manager, ..."));
        assert!(prompt.contains("under 100 characters"));
    }

    #[test]
    fn test_placeholder_lookalikes_in_values_are_not_expanded() {
        let prompt = build_prompt(&PromptRequest::JobSearch {
            title: "{location}",
            location: "Pune",
            ctc: None,
        });
        assert!(prompt.contains("for {location} position in Pune"));
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("{a} {\n \"k\": 1 } {b} {", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x {\n \"k\": 1 } y {");
    }
}
