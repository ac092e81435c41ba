use crate::error::ChatError;

/// Maximum message text length (bytes).
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Maximum club name length.
pub const MAX_CLUB_NAME_LENGTH: usize = 80;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Maximum display name length.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate message text. Must be non-empty after trimming and under the
/// length limit. Runs before any store access.
pub fn validate_message(text: &str) -> Result<(), ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::validation("message text cannot be empty"));
    }
    if text.len() > MAX_MESSAGE_LENGTH {
        return Err(ChatError::validation(format!(
            "message too long (max {} characters)",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// Validate a club name. 1-80 chars, non-blank.
pub fn validate_club_name(name: &str) -> Result<(), ChatError> {
    if name.trim().is_empty() {
        return Err(ChatError::validation("club name cannot be empty"));
    }
    if name.len() > MAX_CLUB_NAME_LENGTH {
        return Err(ChatError::validation(format!(
            "club name too long (max {} characters)",
            MAX_CLUB_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate a username. Must be 1-32 chars, alphanumeric + underscore/hyphen.
pub fn validate_username(username: &str) -> Result<(), ChatError> {
    if username.is_empty() {
        return Err(ChatError::validation("username cannot be empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ChatError::validation(format!(
            "username too long (max {} characters)",
            MAX_USERNAME_LENGTH
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ChatError::validation(
            "username can only contain letters, numbers, underscores, and hyphens",
        ));
    }
    Ok(())
}

/// Validate a display name. Non-blank, length-capped.
pub fn validate_display_name(name: &str) -> Result<(), ChatError> {
    if name.trim().is_empty() {
        return Err(ChatError::validation("display name cannot be empty"));
    }
    if name.len() > MAX_DISPLAY_NAME_LENGTH {
        return Err(ChatError::validation(format!(
            "display name too long (max {} characters)",
            MAX_DISPLAY_NAME_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ChatError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ChatError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
