//! Login form validation
//!
//! Field rules for the credential form and the submit-enablement guard.
//! Errors are advisory: they only decide which messages are shown and
//! whether the submit button is enabled.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const EMPTY_PASSWORD_MESSAGE: &str = "Please enter the password";
pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";

/// Fields of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    /// Name of the input as posted to the login endpoint
    pub fn form_name(self) -> &'static str {
        match self {
            LoginField::Email => "username",
            LoginField::Password => "password",
        }
    }
}

/// Current values of the login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFormValues {
    pub email: String,
    pub password: String,
}

/// Result of validating the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Error message per field. A missing key means the field is valid.
    pub errors: BTreeMap<LoginField, String>,

    /// Fields that should be shown as touched so their error is displayed
    pub touched: BTreeSet<LoginField>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: LoginField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

/// True for empty and whitespace-only strings
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Standard email shape check (local part, `@`, dotted domain or IPv4 literal)
pub fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
        )
        .expect("email pattern is valid")
    });
    re.is_match(value)
}

/// Validate the login form.
///
/// Both rules run independently:
/// - a blank password is an error, and the password field is marked
///   touched once it is dirty
/// - a non-blank email that is not email-shaped is an error and marks the
///   email field touched
///
/// A blank email is not an error here; [`can_submit`] covers it.
pub fn validate_login(values: &LoginFormValues, password_dirty: bool) -> Validation {
    let mut outcome = Validation::default();

    if is_blank(&values.password) {
        if password_dirty {
            outcome.touched.insert(LoginField::Password);
        }
        outcome
            .errors
            .insert(LoginField::Password, EMPTY_PASSWORD_MESSAGE.to_string());
    }

    if !is_blank(&values.email) && !is_email(&values.email) {
        outcome.touched.insert(LoginField::Email);
        outcome
            .errors
            .insert(LoginField::Email, INVALID_EMAIL_MESSAGE.to_string());
    }

    outcome
}

/// Submit is enabled only for a valid form with a non-blank email
pub fn can_submit(valid: bool, email: Option<&str>) -> bool {
    valid && email.is_some_and(|e| !is_blank(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(email: &str, password: &str) -> LoginFormValues {
        LoginFormValues {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_credentials() {
        let outcome = validate_login(&values("jane@example.com", "hunter2"), true);
        assert!(outcome.is_valid());
        assert!(outcome.touched.is_empty());
    }

    #[test]
    fn test_both_rules_reported_together() {
        let outcome = validate_login(&values("not-an-email", ""), true);
        assert_eq!(outcome.error(LoginField::Password), Some(EMPTY_PASSWORD_MESSAGE));
        assert_eq!(outcome.error(LoginField::Email), Some(INVALID_EMAIL_MESSAGE));
        assert!(outcome.touched.contains(&LoginField::Password));
        assert!(outcome.touched.contains(&LoginField::Email));
    }

    #[test]
    fn test_pristine_password_not_touched() {
        let outcome = validate_login(&values("", ""), false);
        assert_eq!(outcome.error(LoginField::Password), Some(EMPTY_PASSWORD_MESSAGE));
        assert!(outcome.touched.is_empty());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.io"));
        assert!(is_email("first.last@sub.example.org"));
        assert!(is_email("ops@[10.0.0.1]"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("a b@example.com"));
        assert!(!is_email("a@@example.com"));
    }

    #[test]
    fn test_form_names() {
        assert_eq!(LoginField::Email.form_name(), "username");
        assert_eq!(LoginField::Password.form_name(), "password");
    }

    proptest! {
        #[test]
        fn blank_password_always_reported(
            password in "[ \t\n]{0,8}",
            email in ".{0,24}",
            dirty in any::<bool>(),
        ) {
            let outcome = validate_login(&values(&email, &password), dirty);
            prop_assert_eq!(outcome.error(LoginField::Password), Some(EMPTY_PASSWORD_MESSAGE));
        }

        #[test]
        fn non_email_strings_rejected(email in "[a-z0-9]{1,16}") {
            // No `@`, so never email-shaped
            let outcome = validate_login(&values(&email, "secret"), false);
            prop_assert_eq!(outcome.error(LoginField::Email), Some(INVALID_EMAIL_MESSAGE));
        }

        #[test]
        fn blank_email_never_reported(email in "[ \t]{0,8}", password in ".{0,12}") {
            let outcome = validate_login(&values(&email, &password), true);
            prop_assert!(outcome.error(LoginField::Email).is_none());
        }

        #[test]
        fn submit_disabled_without_email(valid in any::<bool>(), email in "[ \t]{0,4}") {
            prop_assert!(!can_submit(valid, Some(&email)));
            prop_assert!(!can_submit(valid, None));
        }
    }

    #[test]
    fn test_submit_enabled() {
        assert!(can_submit(true, Some("jane@example.com")));
        assert!(!can_submit(false, Some("jane@example.com")));
    }
}
