//! Shared business logic: framework-agnostic pure functions.
//!
//! The store calls these before any write, keeping route handlers thin.

use crate::ServiceError;

fn validate_name(kind: &str, name: &str) -> Result<String, ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::BadRequest(format!(
            "{kind} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize a team name. Returns the trimmed name.
pub fn validate_team_name(name: &str) -> Result<String, ServiceError> {
    validate_name("team", name)
}

/// Validate and normalize a member name. Returns the trimmed name.
pub fn validate_member_name(name: &str) -> Result<String, ServiceError> {
    validate_name("member", name)
}

/// Normalize an optional role. Blank roles are stored as `NULL`.
pub fn normalize_role(role: Option<&str>) -> Option<String> {
    role.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name() {
        assert_eq!(validate_team_name("Alpha").unwrap(), "Alpha");
        assert_eq!(validate_team_name("  Beta  ").unwrap(), "Beta");
        assert!(validate_team_name("").is_err());
        assert!(validate_team_name("   ").is_err());
        let long = "x".repeat(300);
        assert_eq!(validate_team_name(&long).unwrap(), long);
    }

    #[test]
    fn test_validate_member_name_message() {
        let err = validate_member_name("\t").unwrap_err();
        assert_eq!(err.message(), "member name must not be empty");
    }

    #[test]
    fn test_normalize_role() {
        assert_eq!(normalize_role(None), None);
        assert_eq!(normalize_role(Some("")), None);
        assert_eq!(normalize_role(Some("  ")), None);
        assert_eq!(normalize_role(Some(" Lead ")).as_deref(), Some("Lead"));
        let long = "r".repeat(300);
        assert_eq!(normalize_role(Some(&long)), Some(long));
    }
}
