//! DOCX text extraction.
//!
//! A .docx file is a zip container; the body lives in `word/document.xml`.
//! Text runs (`<w:t>`) are concatenated, `<w:tab/>` becomes a tab, and
//! `<w:br/>`, `<w:cr/>`, paragraph ends and empty paragraphs become newlines.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:t(?:\s[^>]*)?/>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>|</w:p>|<w:p(?:\s[^>]*)?/>")
        .expect("valid docx token regex")
});

/// True when the bytes start with a zip local-file header.
pub fn is_zip_container(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("not a valid .docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART} missing: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    Ok(document_xml_to_text(&xml))
}

/// Converts WordprocessingML body XML to plain text.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    for caps in TOKEN_REGEX.captures_iter(xml) {
        if let Some(text) = caps.get(1) {
            out.push_str(&unescape_xml(text.as_str()));
            continue;
        }
        let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        if token.starts_with("<w:tab") {
            out.push('\t');
        } else if token.starts_with("<w:br")
            || token.starts_with("<w:cr")
            || token.starts_with("<w:p")
            || token == "</w:p>"
        {
            out.push('\n');
        }
    }
    out
}

/// Decodes the five predefined XML entities and numeric character references.
/// Unknown entities are left as written.
fn unescape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
