pub fn validate_email(email: &str) -> bool {
    use regex::Regex;

    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    email_regex.is_match(email)
}

/// Rejects path components that escape an upload directory (spec.md §7
/// `SecurityError`: path traversal is fatal, never retried).
pub fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains("..")
        && !std::path::Path::new(path).is_absolute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_plausible_emails() {
        assert!(validate_email("buyer@supplier.example"));
        assert!(!validate_email("not-an-email"));
    }

    #[test]
    fn rejects_traversal_paths() {
        assert!(is_safe_relative_path("uploads/acme/list.csv"));
        assert!(!is_safe_relative_path("../../etc/passwd"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path(""));
    }
}
