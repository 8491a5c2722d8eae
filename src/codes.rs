//! Typed classification of administrative identifiers.
//!
//! Code shapes:
//!   Region:   macro prefix + 1 character (e.g. ITC3 under ITC)
//!   Province: region code + 1 character (e.g. ITC31)
//!   Commune:  exactly 6 ASCII digits (e.g. 010025)
//!
//! Matching is exact and case-sensitive throughout; no trimming or
//! normalization is performed, so any input variance is a missed match,
//! never an error.

use std::fmt;

/// Digits of a commune code that identify its province.
pub const PROVINCE_PREFIX_LEN: usize = 3;

/// Length of a valid all-numeric commune code.
pub const COMMUNE_CODE_LEN: usize = 6;

/// What an identifier's shape says about its administrative level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    Region,
    Province,
    Commune,
    /// Shape matches no level (including the macro prefix itself).
    Other,
}

impl fmt::Display for CodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::Province => write!(f, "province"),
            Self::Commune => write!(f, "commune"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Classify an identifier relative to a macro-region prefix.
pub fn classify(id: &str, macro_prefix: &str) -> CodeClass {
    if is_all_digits(id) {
        if id.len() == COMMUNE_CODE_LEN {
            return CodeClass::Commune;
        }
        return CodeClass::Other;
    }
    if id.starts_with(macro_prefix) {
        match id.len().checked_sub(macro_prefix.len()) {
            Some(1) => return CodeClass::Region,
            Some(2) => return CodeClass::Province,
            _ => {}
        }
    }
    CodeClass::Other
}

/// True for non-empty strings made entirely of ASCII digits.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Extract the three-digit province prefix from a commune code.
///
/// The donor id must be all-digit and at least [`COMMUNE_CODE_LEN`]
/// characters long; anything else is rejected so that an alphabetic
/// name twin can never supply a prefix.
pub fn province_prefix(id: &str) -> Option<&str> {
    if is_all_digits(id) && id.len() >= COMMUNE_CODE_LEN {
        Some(&id[..PROVINCE_PREFIX_LEN])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_region() {
        assert_eq!(classify("ITC3", "ITC"), CodeClass::Region);
        assert_eq!(classify("ITC4", "ITC"), CodeClass::Region);
    }

    #[test]
    fn test_classify_province() {
        assert_eq!(classify("ITC31", "ITC"), CodeClass::Province);
    }

    #[test]
    fn test_classify_commune() {
        assert_eq!(classify("010025", "ITC"), CodeClass::Commune);
    }

    #[test]
    fn test_classify_macro_prefix_itself() {
        // The macro prefix is not a region of itself.
        assert_eq!(classify("ITC", "ITC"), CodeClass::Other);
    }

    #[test]
    fn test_classify_wrong_prefix() {
        assert_eq!(classify("ITF3", "ITC"), CodeClass::Other);
    }

    #[test]
    fn test_classify_too_deep() {
        assert_eq!(classify("ITC311", "ITC"), CodeClass::Other);
    }

    #[test]
    fn test_classify_numeric_wrong_length() {
        assert_eq!(classify("01002", "ITC"), CodeClass::Other);
        assert_eq!(classify("0100250", "ITC"), CodeClass::Other);
    }

    #[test]
    fn test_classify_case_sensitive() {
        assert_eq!(classify("itc3", "ITC"), CodeClass::Other);
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("010025"));
        assert!(!is_all_digits("ITC31"));
        assert!(!is_all_digits("01002X"));
        assert!(!is_all_digits(""));
    }

    #[test]
    fn test_province_prefix() {
        assert_eq!(province_prefix("010025"), Some("010"));
        assert_eq!(province_prefix("0100257"), Some("010"));
    }

    #[test]
    fn test_province_prefix_rejects_short_or_alpha() {
        assert_eq!(province_prefix("01002"), None);
        assert_eq!(province_prefix("ITC31X"), None);
        assert_eq!(province_prefix("01002X"), None);
    }
}
