//! Step-gating field validation — pure functions over the form state.

use std::sync::LazyLock;

use regex::Regex;

use crate::flow::Step;

use super::model::{Field, FormState, ValidationErrors};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate the form for leaving `step`.
///
/// Returns the fresh error map; an empty map means the step may advance.
/// Password strength is deliberately not checked here — it is advisory.
pub fn validate_step(step: Step, form: &FormState) -> ValidationErrors {
    match step {
        Step::Role => validate_role(form),
        Step::Account => validate_account(form),
        // Verification gates through the challenge, Complete is terminal.
        Step::Verification | Step::Complete => ValidationErrors::new(),
    }
}

fn validate_role(form: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.role.is_none() {
        errors.insert(Field::Role, "Please select a role to continue".to_string());
    }
    errors
}

fn validate_account(form: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required".to_string());
    }
    if form.last_name.trim().is_empty() {
        errors.insert(Field::LastName, "Last name is required".to_string());
    }

    if form.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required".to_string());
    } else if !EMAIL_RE.is_match(form.email.trim()) {
        errors.insert(Field::Email, "Enter a valid email address".to_string());
    }

    if form.password.is_empty() {
        errors.insert(Field::Password, "Password is required".to_string());
    }
    if form.confirm_password.is_empty() {
        errors.insert(
            Field::ConfirmPassword,
            "Please confirm your password".to_string(),
        );
    } else if form.password != form.confirm_password {
        errors.insert(
            Field::ConfirmPassword,
            "Passwords do not match".to_string(),
        );
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone number is required".to_string());
    }
    if form.company_name.trim().is_empty() {
        errors.insert(Field::CompanyName, "Company name is required".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::model::RoleId;

    fn complete_account_form() -> FormState {
        FormState {
            role: Some(RoleId::Analyst),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: "Harvard1!".to_string(),
            confirm_password: "Harvard1!".to_string(),
            phone: "555-0100".to_string(),
            company_name: "Eckert-Mauchly".to_string(),
        }
    }

    #[test]
    fn role_step_requires_a_role() {
        let form = FormState::default();
        let errors = validate_step(Step::Role, &form);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&Field::Role));
    }

    #[test]
    fn role_step_passes_with_any_role() {
        for role in RoleId::ALL {
            let form = FormState {
                role: Some(role),
                ..Default::default()
            };
            assert!(validate_step(Step::Role, &form).is_empty());
        }
    }

    #[test]
    fn account_step_passes_when_complete() {
        let form = complete_account_form();
        assert!(validate_step(Step::Account, &form).is_empty());
    }

    #[test]
    fn account_step_flags_every_empty_field() {
        let errors = validate_step(Step::Account, &FormState::default());
        for field in [
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Password,
            Field::ConfirmPassword,
            Field::Phone,
            Field::CompanyName,
        ] {
            assert!(errors.contains_key(&field), "expected error for {field}");
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["plainaddress", "missing@tld", "two words@example.com", "@example.com"] {
            let form = FormState {
                email: bad.to_string(),
                ..complete_account_form()
            };
            let errors = validate_step(Step::Account, &form);
            assert!(errors.contains_key(&Field::Email), "{bad} should be rejected");
        }
    }

    #[test]
    fn mismatched_passwords_fail_even_when_fields_are_valid() {
        let form = FormState {
            confirm_password: "Different1!".to_string(),
            ..complete_account_form()
        };
        let errors = validate_step(Step::Account, &form);
        assert_eq!(
            errors.get(&Field::ConfirmPassword).map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn weak_password_alone_does_not_block() {
        let form = FormState {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..complete_account_form()
        };
        assert!(validate_step(Step::Account, &form).is_empty());
    }

    #[test]
    fn verification_and_complete_have_no_field_rules() {
        let form = FormState::default();
        assert!(validate_step(Step::Verification, &form).is_empty());
        assert!(validate_step(Step::Complete, &form).is_empty());
    }
}
