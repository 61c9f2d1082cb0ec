//! Checks run before a registration or profile update leaves the process.

use crate::client::ClientError;
use crate::models::{NewUser, UserUpdate};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password policy: length, upper, lower, digit and special character.
pub fn validate_password(password: &str) -> Result<(), ClientError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ClientError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ClientError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ClientError::Validation(
            "Password must contain at least one number".into(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(ClientError::Validation(
            "Password must contain at least one special character".into(),
        ));
    }
    Ok(())
}

/// A cheap shape check; the backend does the real validation.
pub fn validate_email(email: &str) -> Result<(), ClientError> {
    let invalid = || ClientError::Validation(format!("Invalid email address '{}'", email));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_registration(new_user: &NewUser, minimum_age: u32) -> Result<(), ClientError> {
    if new_user.name.trim().is_empty() {
        return Err(ClientError::Validation("Name must not be empty".into()));
    }
    validate_email(&new_user.email)?;
    if new_user.password != new_user.confirm_password {
        return Err(ClientError::Validation("Passwords do not match".into()));
    }
    validate_password(&new_user.password)?;
    if let Some(age) = new_user.age {
        if age < minimum_age {
            return Err(ClientError::Validation(format!(
                "You must be at least {} years old to register",
                minimum_age
            )));
        }
    }
    Ok(())
}

pub fn validate_update(update: &UserUpdate) -> Result<(), ClientError> {
    if update.is_empty() {
        return Err(ClientError::Validation("Nothing to update".into()));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(ClientError::Validation("Name must not be empty".into()));
        }
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
    }
    if let Some(new_password) = &update.new_password {
        if update.current_password.as_deref().unwrap_or("").is_empty() {
            return Err(ClientError::Validation(
                "Current password is required to set a new password".into(),
            ));
        }
        validate_password(new_password)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(password: &str, confirm: &str, age: Option<u32>) -> NewUser {
        NewUser {
            name: "Misato".to_string(),
            email: "misato@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            age,
        }
    }

    fn message(res: Result<(), ClientError>) -> String {
        match res {
            Err(ClientError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Str0ng!pass").is_ok());
        assert!(message(validate_password("S0!a")).contains("at least 8"));
        assert!(message(validate_password("weak0!pass")).contains("uppercase"));
        assert!(message(validate_password("WEAK0!PASS")).contains("lowercase"));
        assert!(message(validate_password("Weak!pass")).contains("number"));
        assert!(message(validate_password("Weak0pass")).contains("special"));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("a.b@sub.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn test_registration_checks() {
        assert!(validate_registration(&new_user("Str0ng!pass", "Str0ng!pass", Some(20)), 13).is_ok());
        assert!(validate_registration(&new_user("Str0ng!pass", "Str0ng!pass", None), 13).is_ok());
        assert_eq!(
            message(validate_registration(
                &new_user("Str0ng!pass", "Other0!pass", None),
                13
            )),
            "Passwords do not match"
        );
        assert!(message(validate_registration(
            &new_user("Str0ng!pass", "Str0ng!pass", Some(12)),
            13
        ))
        .contains("at least 13"));
    }

    #[test]
    fn test_update_checks() {
        assert!(validate_update(&UserUpdate::default()).is_err());
        assert!(validate_update(&UserUpdate {
            name: Some("Ritsuko".into()),
            ..Default::default()
        })
        .is_ok());
        assert!(message(validate_update(&UserUpdate {
            new_password: Some("Str0ng!pass".into()),
            ..Default::default()
        }))
        .contains("Current password"));
        assert!(validate_update(&UserUpdate {
            current_password: Some("Old0!password".into()),
            new_password: Some("Str0ng!pass".into()),
            ..Default::default()
        })
        .is_ok());
    }
}
