//! Field-level validation for user records
//!
//! Each check is independent so that patches can validate only the
//! fields they carry.

use crate::error::{Field, FieldError, FieldErrors, Result};
use crate::user::{User, UserPatch};

const BLANK: &str = "must not be empty";
const NOT_POSITIVE: &str = "must be greater than 0";

/// Check that a name is non-blank after trimming
pub fn check_name(name: &str) -> std::result::Result<(), FieldError> {
    non_blank(Field::Name, name)
}

/// Check that an email is non-blank after trimming
pub fn check_email(email: &str) -> std::result::Result<(), FieldError> {
    non_blank(Field::Email, email)
}

/// Check that an age is strictly positive
pub fn check_age(age: i64) -> std::result::Result<(), FieldError> {
    if age > 0 {
        Ok(())
    } else {
        Err(FieldError {
            field: Field::Age,
            reason: NOT_POSITIVE,
        })
    }
}

fn non_blank(field: Field, value: &str) -> std::result::Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError {
            field,
            reason: BLANK,
        })
    } else {
        Ok(())
    }
}

/// Validate every field of a user, reporting all failures at once
pub fn validate_user(user: &User) -> Result<()> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, check_name(&user.name));
    collect(&mut errors, check_email(&user.email));
    collect(&mut errors, check_age(user.age));
    errors.into_result()
}

/// Validate only the fields present in a patch
pub fn validate_patch(patch: &UserPatch) -> Result<()> {
    let mut errors = FieldErrors::new();
    if let Some(name) = &patch.name {
        collect(&mut errors, check_name(name));
    }
    if let Some(email) = &patch.email {
        collect(&mut errors, check_email(email));
    }
    if let Some(age) = patch.age {
        collect(&mut errors, check_age(age));
    }
    errors.into_result()
}

fn collect(errors: &mut FieldErrors, check: std::result::Result<(), FieldError>) {
    if let Err(e) = check {
        errors.push(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_valid_user() {
        assert!(validate_user(&User::new("Ann", "ann@example.com", 30)).is_ok());
    }

    #[test]
    fn test_blank_after_trim() {
        assert!(check_name("   ").is_err());
        assert!(check_email("\t\n").is_err());
        assert!(check_name(" Ann ").is_ok());
    }

    #[test]
    fn test_age_must_be_positive() {
        assert!(check_age(1).is_ok());
        assert!(check_age(0).is_err());
        assert!(check_age(-5).is_err());
    }

    #[test]
    fn test_reports_every_failing_field() {
        let err = validate_user(&User::new("", "", 0)).unwrap_err();
        let fields = err.field_errors().unwrap().fields();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Age]);

        let message = err.to_string();
        assert!(message.contains("name"));
        assert!(message.contains("email"));
        assert!(message.contains("age"));
    }

    #[test]
    fn test_reports_single_failing_field() {
        let err = validate_user(&User::new("Ann", " ", 30)).unwrap_err();
        match err {
            Error::InvalidField(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains(Field::Email));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        assert!(validate_patch(&UserPatch::new("id")).is_ok());
        assert!(validate_patch(&UserPatch::new("id").age(40)).is_ok());

        let err = validate_patch(&UserPatch::new("id").name("").age(0)).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::Age));
        assert!(!errors.contains(Field::Email));
    }
}
