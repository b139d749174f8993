use thiserror::Error;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Exclusive upper bound on age.
pub const MAX_AGE: i64 = 200;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is empty")]
    NameEmpty,

    #[error("name is too long")]
    NameTooLong,

    #[error("age must be between 0 and 200")]
    AgeOutOfRange,
}

/// Checks the rules in order and reports the first one broken.
pub fn validate_user(name: &str, age: i64) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    if !(0..MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange);
    }
    Ok(())
}
