// Typed request validation. Each route has one function that checks the
// deserialized body and returns every failing field at once, so malformed
// requests never reach the service layer.

use validator::ValidateEmail;

use crate::models::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest};
use crate::utils::error::{FieldError, UserError};

pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 32;

/// Password policy: length inclusive between 6 and 32 characters.
pub fn password_length_ok(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
}

fn check_name(errors: &mut Vec<FieldError>, name: &str) {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        errors.push(FieldError::new(
            "name",
            "Name must be between 1 and 100 characters",
        ));
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if !email.validate_email() {
        errors.push(FieldError::new("email", "Email must be a valid email address"));
    }
}

fn check_password(errors: &mut Vec<FieldError>, field: &str, label: &str, password: &str) {
    if !password_length_ok(password) {
        errors.push(FieldError::new(
            field,
            &format!("{} must be between 6 and 32 characters", label),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), UserError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(UserError::Validation(errors))
    }
}

pub fn validate_create_user(request: &CreateUserRequest) -> Result<(), UserError> {
    let mut errors = Vec::new();
    check_name(&mut errors, &request.name);
    check_email(&mut errors, &request.email);
    check_password(&mut errors, "password", "Password", &request.password);
    check_password(
        &mut errors,
        "password_confirm",
        "Password confirmation",
        &request.password_confirm,
    );
    finish(errors)
}

pub fn validate_update_user(request: &UpdateUserRequest) -> Result<(), UserError> {
    let mut errors = Vec::new();
    check_name(&mut errors, &request.name);
    check_email(&mut errors, &request.email);
    finish(errors)
}

pub fn validate_change_password(request: &ChangePasswordRequest) -> Result<(), UserError> {
    let mut errors = Vec::new();
    check_password(&mut errors, "oldPassword", "Old password", &request.old_password);
    check_password(&mut errors, "newPassword", "New password", &request.new_password);
    check_password(
        &mut errors,
        "confirmPassword",
        "Password confirmation",
        &request.confirm_password,
    );
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: password.to_string(),
        }
    }

    #[test]
    fn test_password_length_bounds_are_inclusive() {
        assert!(!password_length_ok("12345")); // 5
        assert!(password_length_ok("123456")); // 6
        assert!(password_length_ok(&"x".repeat(32)));
        assert!(!password_length_ok(&"x".repeat(33)));
    }

    #[test]
    fn test_valid_create_request_passes() {
        let request = create_request("Ann", "a@x.com", "secret1");
        assert!(validate_create_user(&request).is_ok());
    }

    #[test]
    fn test_name_bounds() {
        let request = create_request("", "a@x.com", "secret1");
        match validate_create_user(&request) {
            Err(UserError::Validation(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "name");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // 100 chars is the inclusive upper bound
        let request = create_request(&"n".repeat(100), "a@x.com", "secret1");
        assert!(validate_create_user(&request).is_ok());

        let request = create_request(&"n".repeat(101), "a@x.com", "secret1");
        assert!(validate_create_user(&request).is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let request = create_request("Ann", "not-an-email", "secret1");
        match validate_create_user(&request) {
            Err(UserError::Validation(fields)) => {
                assert_eq!(fields[0].field, "email");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_failing_fields_reported() {
        let request = CreateUserRequest {
            name: String::new(),
            email: "nope".to_string(),
            password: "ab".to_string(),
            password_confirm: "ab".to_string(),
        };
        match validate_create_user(&request) {
            Err(UserError::Validation(fields)) => assert_eq!(fields.len(), 4),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_change_password_short_new_password() {
        let request = ChangePasswordRequest {
            old_password: "secret1".to_string(),
            new_password: "ab".to_string(),
            confirm_password: "ab".to_string(),
        };
        match validate_change_password(&request) {
            Err(UserError::Validation(fields)) => {
                assert!(fields.iter().any(|f| f.field == "newPassword"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
