//! Authentication and profile forms.

use crate::schema::ValidationErrors;
use serde::{Deserialize, Serialize};

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 8;

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if !is_valid_email(email) {
        errors.push("email", "Email must be valid");
    }
}

fn check_names(errors: &mut ValidationErrors, first_name: &str, last_name: &str) {
    if first_name.chars().count() < MIN_NAME_CHARS {
        errors.push("first_name", "First name must be at least 2 characters");
    }
    if last_name.chars().count() < MIN_NAME_CHARS {
        errors.push("last_name", "Last name must be at least 2 characters");
    }
}

/// Sign-in credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "Must not be empty");
        }
        errors.into_result()
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Not sent to the backend.
    #[serde(skip_serializing)]
    pub repeat_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_names(&mut errors, &self.first_name, &self.last_name);
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push("password", "Password must be at least 8 characters");
        }
        if self.password != self.repeat_password {
            errors.push("repeat_password", "Passwords must match");
        }
        errors.into_result()
    }

    /// Credentials for the sign-in that follows a successful registration.
    pub fn credentials(&self) -> SignInForm {
        SignInForm::new(self.email.clone(), self.password.clone())
    }
}

/// Profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEditForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileEditForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_names(&mut errors, &self.first_name, &self.last_name);
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("reader@lectern.dev"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("reader"));
        assert!(!is_valid_email("@lectern.dev"));
        assert!(!is_valid_email("reader@lectern"));
        assert!(!is_valid_email("re ader@lectern.dev"));
        assert!(!is_valid_email("a@b@c.dev"));
    }

    #[test]
    fn test_sign_in() {
        assert!(SignInForm::new("reader@lectern.dev", "x").validate().is_ok());

        let errors = SignInForm::new("nope", "").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email must be valid"));
        assert_eq!(errors.get("password"), Some("Must not be empty"));
    }

    #[test]
    fn test_sign_up() {
        let mut form = SignUpForm {
            email: "reader@lectern.dev".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password: "hunter22".to_string(),
            repeat_password: "hunter22".to_string(),
        };
        assert!(form.validate().is_ok());
        assert_eq!(
            form.credentials(),
            SignInForm::new("reader@lectern.dev", "hunter22")
        );

        form.first_name = "A".to_string();
        form.password = "short".to_string();
        form.repeat_password = "other".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("first_name"), Some("First name must be at least 2 characters"));
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("repeat_password"), Some("Passwords must match"));
    }

    #[test]
    fn test_sign_up_payload_omits_repeat() {
        let form = SignUpForm {
            repeat_password: "secret".to_string(),
            ..SignUpForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get("repeat_password").is_none());
        assert!(value.get("first_name").is_some());
    }

    #[test]
    fn test_profile_edit() {
        let form = ProfileEditForm {
            first_name: "Ann".to_string(),
            last_name: "L".to_string(),
            email: "ann@lectern.dev".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("last_name"), Some("Last name must be at least 2 characters"));
    }
}
