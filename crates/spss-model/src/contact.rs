//! Contact detail rules shared by the entry form and the identity provider

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Whether `value` looks like an email address; surrounding spaces fail
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_email("asha@spss.in"));
        assert!(!is_email(" asha@spss.in"));
        assert!(!is_email("asha@spss"));
        assert!(!is_email("as ha@spss.in"));
        assert!(!is_email("@spss.in"));
        assert!(!is_email("a@@spss.in"));
    }
}
