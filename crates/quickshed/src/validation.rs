/// Form checks applied before anything is sent to the backend
use crate::gateway::{SubjectDraft, TeacherDraft};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter a valid name and a 10-digit phone number")]
    InvalidTeacher,

    #[error("Please fill all fields correctly")]
    InvalidSubject,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Signup form: email, then password, then confirmation.
pub fn validate_signup(email: &str, password: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)?;
    validate_confirm_password(password, confirm)
}

/// Exactly ten ASCII digits.
pub fn is_valid_phone_number(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// A new teacher needs a name and a phone number.
pub fn validate_new_teacher(draft: &TeacherDraft) -> Result<(), ValidationError> {
    let name_ok = draft.name.as_deref().is_some_and(|n| !n.trim().is_empty());
    let phone_ok = draft.phone_number.as_deref().is_some_and(is_valid_phone_number);
    if name_ok && phone_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidTeacher)
    }
}

/// Edits may omit fields, but what is given must be valid.
pub fn validate_teacher_edit(draft: &TeacherDraft) -> Result<(), ValidationError> {
    if draft.name.as_deref().is_some_and(|n| n.trim().is_empty())
        || draft
            .phone_number
            .as_deref()
            .is_some_and(|p| !is_valid_phone_number(p))
    {
        return Err(ValidationError::InvalidTeacher);
    }
    Ok(())
}

pub fn validate_new_subject(draft: &SubjectDraft) -> Result<(), ValidationError> {
    let complete = draft.name.as_deref().is_some_and(|n| !n.trim().is_empty())
        && draft
            .subject_code
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
        && draft.semester.is_some_and(|s| s > 0);
    if complete {
        Ok(())
    } else {
        Err(ValidationError::InvalidSubject)
    }
}

pub fn validate_subject_edit(draft: &SubjectDraft) -> Result<(), ValidationError> {
    if draft.name.as_deref().is_some_and(|n| n.trim().is_empty())
        || draft
            .subject_code
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        || draft.semester == Some(0)
    {
        return Err(ValidationError::InvalidSubject);
    }
    Ok(())
}
