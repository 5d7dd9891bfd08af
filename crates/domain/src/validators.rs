//! Input validation for team self-service updates.

use crate::errors::StoreError;

/// Characters allowed in a team name besides ASCII alphanumerics.
const NAME_EXTRA: &str = " /\\~!@#$%&*()-_+={}[];:',.?";

pub fn validate_team_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.chars().count() > 30 {
        return Err(StoreError::InvalidInput("Bad team name".to_string()));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || NAME_EXTRA.contains(c))
    {
        return Err(StoreError::InvalidInput("Bad team name".to_string()));
    }

    Ok(())
}

pub fn validate_team_country(country: &str) -> Result<(), StoreError> {
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(StoreError::InvalidInput("Bad team country code".to_string()));
    }

    Ok(())
}

/// Validate a team website and return its normalized form. Empty stays empty.
pub fn validate_team_website(website: &str) -> Result<String, StoreError> {
    if website.is_empty() {
        return Ok(String::new());
    }

    let parsed = url::Url::parse(website)
        .map_err(|_| StoreError::InvalidInput("Bad team URL".to_string()))?;

    Ok(parsed.to_string())
}

pub fn validate_notes(notes: &str) -> Result<(), StoreError> {
    if notes.chars().count() > 1000 {
        return Err(StoreError::InvalidInput("Note is too long".to_string()));
    }

    Ok(())
}
