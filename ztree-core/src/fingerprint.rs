//! Content fingerprints: normalization, comparison, hashing.
//!
//! Source stores report fingerprints with provider quoting (S3 ETags are
//! `"\"<md5>\""`), and content read back from the tree store can pick up
//! incidental trailing newlines. Both artifacts are stripped before any
//! comparison, from whichever side carries them.

use md5::{Digest, Md5};

/// Strip surrounding quote characters from a raw store fingerprint.
///
/// Permissive trim: any number of leading/trailing `"` characters, from
/// either end independently.
pub fn normalize(raw: &str) -> String {
    raw.trim_matches('"').to_string()
}

/// Compare two fingerprints, ignoring trailing line endings on both sides.
pub fn equal(a: &str, b: &str) -> bool {
    let a = a.trim_end_matches(['\r', '\n']);
    let b = b.trim_end_matches(['\r', '\n']);
    log::debug!("comparing fingerprints [{a}] and [{b}]");
    a == b
}

/// 128-bit content digest, rendered as lowercase hex.
pub fn hash(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("\"5d41402abc4b2a76b9719d911017c592\"", "5d41402abc4b2a76b9719d911017c592")]
    #[case("\"\"quoted\"\"", "quoted")]
    #[case("\"left-only", "left-only")]
    #[case("right-only\"", "right-only")]
    #[case("bare", "bare")]
    fn normalize_strips_quotes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["\"abc\"", "abc", "\"\"abc\"\"", ""] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn equal_trims_trailing_newlines_symmetrically() {
        assert!(equal("abc\n", "abc"));
        assert!(equal("abc", "abc\r\n"));
        assert!(equal("abc\r\n", "abc\n"));
        assert!(!equal("abc", "abd"));
    }

    #[test]
    fn equal_only_trims_trailing() {
        assert!(!equal("\nabc", "abc"));
    }

    #[test]
    fn md5_hex_lowercase() {
        assert_eq!(hash(b"hello"), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
