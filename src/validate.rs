//! Form rules applied before any gateway call.
//!
//! These mirror the console's sign-in, sign-up and reset forms so a store
//! driven from a non-browser caller enforces the same input contract.

use crate::error::ValidationError;
use crate::types::{RegisterRequest, UserPatch};

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 10;
const MIN_PASSWORD_LEN: usize = 6;

/// Trim and lowercase an email, returning `None` unless it looks like
/// `local@domain.tld` with no whitespace.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
        return None;
    }
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }
    let (host, tld) = domain.rsplit_once('.')?;
    if host.is_empty() || tld.is_empty() {
        return None;
    }
    Some(normalized)
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed)
}

fn min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::TooShort { field, min });
    }
    Ok(())
}

fn email(value: &str) -> Result<String, ValidationError> {
    let raw = required("email", value)?;
    normalize_email(raw).ok_or(ValidationError::InvalidEmail)
}

/// Validate sign-in input. Returns the normalized email.
///
/// Password length is left to the gateway so a short wrong password reads
/// as bad credentials rather than a form error.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an empty or malformed email or an
/// empty password.
pub fn login(email_raw: &str, password: &str) -> Result<String, ValidationError> {
    let email = email(email_raw)?;
    if password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    Ok(email)
}

/// Validate a password reset request. Returns the normalized email.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an empty or malformed email.
pub fn forgot_password(email_raw: &str) -> Result<String, ValidationError> {
    email(email_raw)
}

/// Validate a sign-up form and return it with a normalized email.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, in form field order.
pub fn register(request: &RegisterRequest) -> Result<RegisterRequest, ValidationError> {
    let name = required("name", &request.name)?;
    min_len("name", name, MIN_NAME_LEN)?;
    let email = email(&request.email)?;
    let phone = required("phone", &request.phone)?;
    min_len("phone", phone, MIN_PHONE_LEN)?;
    if request.password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    min_len("password", &request.password, MIN_PASSWORD_LEN)?;
    if request.confirm_password.is_empty() {
        return Err(ValidationError::Required { field: "password confirmation" });
    }
    if request.confirm_password != request.password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(RegisterRequest {
        name: name.to_owned(),
        email,
        phone: phone.to_owned(),
        password: request.password.clone(),
        confirm_password: request.confirm_password.clone(),
        role: request.role,
    })
}

/// Validate the fields present in a profile patch.
///
/// # Errors
///
/// Returns a [`ValidationError`] if a present field breaks the sign-up rules.
pub fn profile_patch(patch: &UserPatch) -> Result<UserPatch, ValidationError> {
    let mut out = patch.clone();
    if let Some(name) = &patch.name {
        let name = required("name", name)?;
        min_len("name", name, MIN_NAME_LEN)?;
        out.name = Some(name.to_owned());
    }
    if let Some(raw) = &patch.email {
        out.email = Some(email(raw)?);
    }
    if let Some(phone) = &patch.phone {
        let phone = required("phone", phone)?;
        min_len("phone", phone, MIN_PHONE_LEN)?;
        out.phone = Some(phone.to_owned());
    }
    Ok(out)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
