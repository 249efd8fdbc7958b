// Plain-text decoding: BOM sniff, declared charset, UTF-8, then charset detection.

use crate::extraction::ExtractionError;

/// `content_type` is the upload's declared type; a `charset=` parameter in it
/// is trusted over detection.
pub fn decode(bytes: &[u8], content_type: Option<&str>) -> Result<String, ExtractionError> {
    if let Some((enc, offset)) = encoding_rs::Encoding::for_bom(bytes) {
        let (cow, _used, had_errors) = enc.decode(&bytes[offset..]);
        if had_errors {
            return Err(ExtractionError::Encoding(format!(
                "invalid {} after byte order mark",
                enc.name()
            )));
        }
        return Ok(cow.into_owned());
    }

    if let Some(label) = charset_label(content_type) {
        if let Some(enc) = encoding_rs::Encoding::for_label_no_replacement(label.as_bytes()) {
            let (cow, had_errors) = enc.decode_without_bom_handling(bytes);
            if had_errors {
                return Err(ExtractionError::Encoding(format!(
                    "decoding with declared charset '{label}' produced errors"
                )));
            }
            return Ok(cow.into_owned());
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    let (cow, _used, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(ExtractionError::Encoding(format!(
            "decoding with detected charset '{}' produced errors",
            enc.name()
        )));
    }
    Ok(cow.into_owned())
}

/// Pulls the `charset` parameter out of a Content-Type value.
fn charset_label(content_type: Option<&str>) -> Option<String> {
    content_type?
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|label| !label.is_empty())
}
