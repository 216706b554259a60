//! MIME multipart boundary extraction for the mail-parsing layer.

use crate::error::{constants, PacketError, Result};

const BOUNDARY_PARAM: &str = "boundary=\"";

/// Find the multipart boundary among message headers.
///
/// Header names are matched case-insensitively against `content-type`.
/// No such header yields `Ok(None)`. A `content-type` without a quoted
/// `boundary="..."` parameter, or with an unterminated one, is a
/// `MalformedHeader` error.
pub fn extract_boundary<I, K, V>(headers: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let Some(value) = headers
        .into_iter()
        .find(|(name, _)| name.as_ref().trim().eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value)
    else {
        return Ok(None);
    };
    let value = value.as_ref();

    // ASCII lowercasing keeps byte offsets aligned with `value`
    let lower = value.to_ascii_lowercase();
    let start = lower
        .match_indices(BOUNDARY_PARAM)
        .map(|(i, _)| i)
        .find(|&i| starts_parameter(&lower, i))
        .map(|i| i + BOUNDARY_PARAM.len())
        .ok_or_else(|| PacketError::MalformedHeader(constants::ERR_BOUNDARY_MISSING.into()))?;

    let rest = &value[start..];
    let end = rest
        .find('"')
        .ok_or_else(|| PacketError::MalformedHeader(constants::ERR_BOUNDARY_UNTERMINATED.into()))?;

    Ok(Some(rest[..end].to_string()))
}

/// A parameter name begins the value or follows `;` or whitespace, so
/// `x-boundary=` is not `boundary=`.
fn starts_parameter(value: &str, at: usize) -> bool {
    match value.as_bytes()[..at].last() {
        None => true,
        Some(&prev) => prev == b';' || prev.is_ascii_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_boundary_found() {
        let headers = [
            ("From", "joe@example.com"),
            ("Content-Type", "multipart/mixed; boundary=\"XYZ\""),
        ];
        assert_eq!(extract_boundary(headers).unwrap(), Some("XYZ".to_string()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_header_name_case_insensitive() {
        let headers = vec![(
            "CONTENT-TYPE".to_string(),
            "multipart/encrypted; protocol=\"application/pgp-encrypted\"; Boundary=\"a b\"".to_string(),
        )];
        assert_eq!(extract_boundary(headers).unwrap(), Some("a b".to_string()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_no_content_type() {
        let headers = [("Subject", "hi")];
        assert_eq!(extract_boundary(headers).unwrap(), None);
        assert_eq!(extract_boundary(Vec::<(&str, &str)>::new()).unwrap(), None);
    }

    #[test]
    fn test_missing_or_unterminated_boundary() {
        let missing = [("content-type", "text/plain; charset=utf-8")];
        assert!(matches!(
            extract_boundary(missing),
            Err(PacketError::MalformedHeader(_))
        ));

        let open = [("content-type", "multipart/mixed; boundary=\"XYZ")];
        assert!(matches!(
            extract_boundary(open),
            Err(PacketError::MalformedHeader(_))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_boundary_suffix_of_other_parameter_is_skipped() {
        let headers = [(
            "Content-Type",
            "multipart/mixed; x-boundary=\"A\"; boundary=\"B\"",
        )];
        assert_eq!(extract_boundary(headers).unwrap(), Some("B".to_string()));

        let only_prefixed = [("Content-Type", "multipart/mixed; x-boundary=\"A\"")];
        assert!(matches!(
            extract_boundary(only_prefixed),
            Err(PacketError::MalformedHeader(_))
        ));

        let tab = [("Content-Type", "multipart/mixed;\tboundary=\"C\"")];
        assert_eq!(extract_boundary(tab).unwrap(), Some("C".to_string()));
    }
}
