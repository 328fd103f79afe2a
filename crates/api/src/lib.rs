//! Shared view types, validation, and SQL builders for teamroster.
//!
//! This crate is the single source of truth for the shapes that cross the
//! store/server boundary. The same structs back both the HTML fragments and
//! the `Accept: application/json` representation.

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod db;
pub mod service;

// ─── Entities ────────────────────────────────────────────────────────────────

/// A named grouping of members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// A person belonging to exactly one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub role: Option<String>,
    pub created_at: String,
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Form body of `POST /teams`.
///
/// `team_name` is accepted as an alias so older form markup keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamForm {
    #[serde(alias = "team_name")]
    pub name: String,
}

/// Form body of `POST /teams/{id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberForm {
    #[serde(alias = "member_name")]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// Returned by `GET /teams`, `POST /teams` and `DELETE /teams/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListTeamsResponse {
    pub teams: Vec<Team>,
}

/// A team together with its members, sorted by name.
///
/// Returned by the detail endpoint and by every endpoint that mutates a
/// team's member list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamDetailResponse {
    pub team: Team,
    pub members: Vec<TeamMember>,
}

/// Returned by `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Service Error ───────────────────────────────────────────────────────────

/// Framework-agnostic service error.
///
/// Each variant maps to an HTTP status code; the server converts it into a
/// plain-text response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Conflict(m) | Self::Internal(m) => m,
        }
    }

    /// Build a closure that wraps a DB/IO error into `Internal` with context.
    pub fn from_db<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> Self + '_ {
        move |e| Self::Internal(format!("{context}: {e}"))
    }

    pub fn team_not_found() -> Self {
        Self::NotFound("Team not found".into())
    }

    pub fn member_not_found() -> Self {
        Self::NotFound("Member not found".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(ServiceError::team_not_found().status_code(), 404);
        assert_eq!(ServiceError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(ServiceError::BadRequest("bad".into()).status_code(), 400);
        assert_eq!(ServiceError::Internal("boom".into()).status_code(), 500);
        assert_eq!(ServiceError::member_not_found().to_string(), "Member not found");
    }

    #[test]
    fn test_from_db_keeps_context() {
        let err = ServiceError::from_db("list teams")("disk I/O error");
        assert_eq!(err.message(), "list teams: disk I/O error");
    }

    #[test]
    fn test_member_form_role_is_optional() {
        let form: AddMemberForm = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(form.name, "Bob");
        assert_eq!(form.role, None);
    }

    #[test]
    fn test_form_aliases() {
        let team: CreateTeamForm = serde_json::from_str(r#"{"team_name":"Alpha"}"#).unwrap();
        assert_eq!(team.name, "Alpha");
        let member: AddMemberForm =
            serde_json::from_str(r#"{"member_name":"Bob","role":"Lead"}"#).unwrap();
        assert_eq!(member.name, "Bob");
        assert_eq!(member.role.as_deref(), Some("Lead"));
    }
}
