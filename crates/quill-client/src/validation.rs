// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Input validation for the login, registration and password reset forms.
//!
//! Each validator returns `Ok(())` or a [`ClientError::Validation`] naming the
//! field and carrying the message shown next to it.

use crate::error::{ClientError, ClientResult};

/// Minimum username length.
pub const USERNAME_MIN_LEN: usize = 4;

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 20;

/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validates a username: 4 to 20 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> ClientResult<()> {
    if username.is_empty() {
        return Err(ClientError::validation("username", "Username is required"));
    }

    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ClientError::validation(
            "username",
            format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            ),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ClientError::validation(
            "username",
            "Username may only contain letters, digits and underscores",
        ));
    }

    Ok(())
}

/// Validates an email address of the form `local@domain.tld`.
///
/// The check is structural only: no whitespace, exactly one `@`, and a dot
/// inside the domain with text on both sides.
pub fn validate_email(email: &str) -> ClientResult<()> {
    if email.is_empty() {
        return Err(ClientError::validation("email", "Email is required"));
    }

    if !is_plausible_email(email) {
        return Err(ClientError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }

    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Some dot with text on both sides.
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// Validates a password: at least 6 characters with a letter and a digit.
pub fn validate_password(password: &str) -> ClientResult<()> {
    if password.is_empty() {
        return Err(ClientError::validation("password", "Password is required"));
    }

    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ClientError::validation(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN_LEN),
        ));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ClientError::validation(
            "password",
            "Password must contain both letters and digits",
        ));
    }

    Ok(())
}
