use crate::models::VoteFields;

pub const MAX_VOTER_NAME_LENGTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Voter name cannot be empty")]
    EmptyVoterName,
    #[error("Voter name exceeds maximum length of {MAX_VOTER_NAME_LENGTH}")]
    VoterNameTooLong,
}

/// Rejected before any persistence call is attempted, so a bad payload never
/// produces a partial write.
pub fn validate_voter_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyVoterName);
    }
    if trimmed.chars().count() > MAX_VOTER_NAME_LENGTH {
        return Err(ValidationError::VoterNameTooLong);
    }
    Ok(())
}

/// Department and candidate arrive as closed enums; the free-text voter name
/// is the only field that needs checking.
pub fn validate_vote_fields(fields: &VoteFields) -> Result<(), ValidationError> {
    validate_voter_name(&fields.voter_name)
}
