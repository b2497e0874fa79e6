//! Serial Normalizer
//!
//! Canonicalizes raw device identifiers so that the same physical device
//! always produces the same fingerprint, regardless of how its identifier
//! was copied out of Device Manager or a PnP path.

/// Separator between the serial-bearing prefix and the device-instance suffix
pub const INSTANCE_SEPARATOR: char = '&';

/// Serial normalizer for consistent fingerprinting
pub struct SerialNormalizer;

impl SerialNormalizer {
    /// Normalize a raw identifier
    ///
    /// - Trim surrounding whitespace
    /// - Keep only the part before the first `&`
    /// - Trim again and convert to uppercase
    ///
    /// Never fails; an empty or whitespace-only input yields an empty string.
    pub fn normalize(raw: &str) -> String {
        let trimmed = Self::trim(raw);

        let prefix = match trimmed.split_once(INSTANCE_SEPARATOR) {
            Some((head, _)) => head,
            None => trimmed,
        };

        Self::trim(prefix).to_uppercase()
    }

    /// Normalize an identifier that may be absent
    pub fn normalize_opt(raw: Option<&str>) -> String {
        Self::normalize(raw.unwrap_or_default())
    }

    /// Check whether an identifier is already in normalized form
    pub fn is_normalized(identifier: &str) -> bool {
        Self::normalize(identifier) == identifier
    }

    /// Trim whitespace from both ends
    ///
    /// The separator controls U+001C..U+001F count as whitespace too.
    pub(crate) fn trim(s: &str) -> &str {
        s.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(SerialNormalizer::normalize("ab12"), "AB12");
        assert_eq!(SerialNormalizer::normalize("AB12"), "AB12");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(SerialNormalizer::normalize("  ab12  "), "AB12");
        assert_eq!(SerialNormalizer::normalize("\tab12\r\n"), "AB12");
    }

    #[test]
    fn test_normalize_strips_instance_suffix() {
        assert_eq!(
            SerialNormalizer::normalize("1234&abcd"),
            SerialNormalizer::normalize("1234")
        );
        assert_eq!(SerialNormalizer::normalize("4C530001&0&1"), "4C530001");
    }

    #[test]
    fn test_normalize_only_first_separator_counts() {
        assert_eq!(SerialNormalizer::normalize("a&b&c"), "A");
    }

    #[test]
    fn test_normalize_trims_around_separator() {
        assert_eq!(SerialNormalizer::normalize("  xyz  & 99"), "XYZ");
    }

    #[test]
    fn test_normalize_leading_separator() {
        assert_eq!(SerialNormalizer::normalize("&0&1"), "");
        assert_eq!(SerialNormalizer::normalize("  &abc"), "");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(SerialNormalizer::normalize(""), "");
        assert_eq!(SerialNormalizer::normalize("   "), "");
        assert_eq!(SerialNormalizer::normalize_opt(None), "");
        assert_eq!(SerialNormalizer::normalize_opt(Some(" q ")), "Q");
    }

    #[test]
    fn test_normalize_separator_controls() {
        assert_eq!(SerialNormalizer::normalize("\u{1c}ab\u{1f}"), "AB");
    }

    #[test]
    fn test_normalize_unicode_uppercase() {
        assert_eq!(SerialNormalizer::normalize("straße"), "STRASSE");
        assert_eq!(SerialNormalizer::normalize("éa"), "ÉA");
    }

    #[test]
    fn test_case_whitespace_insensitivity() {
        let a = SerialNormalizer::normalize("  ab12  ");
        let b = SerialNormalizer::normalize("AB12");
        let c = SerialNormalizer::normalize("ab12");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "",
            " ",
            "abc",
            "  Ab C  ",
            "1234&abcd",
            "&",
            "&&",
            " x & y ",
            "USB\\VID_0781&PID_5567\\4C530001",
            "straße",
            "\u{1c}\u{1d} serial \u{1e}",
            "ǆ",
            "ﬀ",
            "日本語&tail",
        ];

        for s in samples {
            let once = SerialNormalizer::normalize(s);
            let twice = SerialNormalizer::normalize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", s);
            assert!(SerialNormalizer::is_normalized(&once));
        }
    }

    #[test]
    fn test_is_normalized() {
        assert!(SerialNormalizer::is_normalized("ABC"));
        assert!(SerialNormalizer::is_normalized(""));
        assert!(!SerialNormalizer::is_normalized("abc"));
        assert!(!SerialNormalizer::is_normalized("ABC&1"));
        assert!(!SerialNormalizer::is_normalized(" ABC"));
    }
}
