//! Credential validators applied before any network call.

/// Outcome of password validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordValidation {
    pub errors: Vec<String>,
    /// 0..=5, one point per satisfied rule.
    pub score: u8,
}

impl PasswordValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Coarse strength bucket for the password meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    None,
    Weak,
    Fair,
    Good,
    Strong,
    VeryStrong,
}

/// Minimal structural email check: one `@`, non-empty local and domain
/// parts, a dot in the domain, no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate password strength, collecting every unmet rule.
pub fn validate_password(password: &str) -> PasswordValidation {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        errors.push("Password must contain at least one special character".to_string());
    }

    let score = 5u8.saturating_sub(errors.len() as u8);
    PasswordValidation { errors, score }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength::None;
    }

    match validate_password(password).score {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Fair,
        3 => PasswordStrength::Good,
        4 => PasswordStrength::Strong,
        _ => PasswordStrength::VeryStrong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ada@example.com"));
        assert!(validate_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!validate_email(""));
        assert!(!validate_email("ada"));
        assert!(!validate_email("ada@"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("ada@example"));
        assert!(!validate_email("ada @example.com"));
        assert!(!validate_email("ada@ex@ample.com"));
    }

    #[test]
    fn strong_password_passes() {
        let v = validate_password("Str0ng!pass");
        assert!(v.is_valid());
        assert_eq!(v.score, 5);
        assert_eq!(password_strength("Str0ng!pass"), PasswordStrength::VeryStrong);
    }

    #[test]
    fn weak_password_collects_all_failures() {
        let v = validate_password("abc");
        assert!(!v.is_valid());
        // short, no uppercase, no digit, no special char
        assert_eq!(v.errors.len(), 4);
        assert_eq!(v.score, 1);
    }

    #[test]
    fn strength_buckets() {
        assert_eq!(password_strength(""), PasswordStrength::None);
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh1"), PasswordStrength::Good);
    }
}
