use subtle::ConstantTimeEq;

/// Header carrying the caller's key for the HTTP binding.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison for secrets.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Whether a request presenting `provided` may proceed.
///
/// With no key configured every request is allowed.
pub fn is_authorized(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (None, _) => true,
        (Some(expected), Some(provided)) => constant_time_compare(expected, provided.trim()),
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("portal-key", "portal-key"));
        assert!(!constant_time_compare("portal-key", "portal-kez"));
        assert!(!constant_time_compare("portal-key", "portal"));
        assert!(!constant_time_compare("", "portal-key"));
    }

    #[test]
    fn test_is_authorized_without_configured_key() {
        assert!(is_authorized(None, None));
        assert!(is_authorized(None, Some("anything")));
    }

    #[test]
    fn test_is_authorized_with_configured_key() {
        assert!(is_authorized(Some("portal-key"), Some("portal-key")));
        assert!(is_authorized(Some("portal-key"), Some(" portal-key ")));
        assert!(!is_authorized(Some("portal-key"), Some("wrong")));
        assert!(!is_authorized(Some("portal-key"), None));
    }
}
