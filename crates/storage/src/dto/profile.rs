use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for registering a player profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProfileRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username must be between 1 and 50 characters"
    ))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(url)]
    pub avatar_url: Option<String>,
}

fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if username.trim() == username && !username.chars().any(char::is_control) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_username"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        let ok = CreateProfileRequest {
            username: "telespectateur75".to_string(),
            avatar_url: Some("https://example.com/a.png".to_string()),
        };
        assert!(ok.validate().is_ok());

        let padded = CreateProfileRequest {
            username: " padded".to_string(),
            avatar_url: None,
        };
        assert!(padded.validate().is_err());

        let bad_url = CreateProfileRequest {
            username: "ok".to_string(),
            avatar_url: Some("not a url".to_string()),
        };
        assert!(bad_url.validate().is_err());
    }
}
