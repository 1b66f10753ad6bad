//! User record types and argument validation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Set of role names held by one user.
///
/// Ordered so that a saved file lists roles deterministically.
pub type RoleSet = BTreeSet<String>;

/// User map type: `user_name` -> `UserRecord`
pub type UsersMap = BTreeMap<String, UserRecord>;

/// One user's password and role memberships.
///
/// The user name is the key of the owning `UsersMap` and is not repeated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Stored verbatim; no hashing is applied.
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: RoleSet,
}

impl UserRecord {
    #[must_use]
    pub fn new(password: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            password: password.into(),
            roles,
        }
    }
}

fn check_token(field: &str, value: &str) -> CoreResult<()> {
    if value.is_empty() {
        return Err(CoreError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    if value.trim() != value {
        return Err(CoreError::InvalidArgument(format!(
            "{field} must not start or end with whitespace"
        )));
    }
    if let Some(c) = value.chars().find(|c| matches!(c, '=' | ',' | '\r' | '\n')) {
        return Err(CoreError::InvalidArgument(format!(
            "{field} contains unsupported character {c:?}"
        )));
    }
    Ok(())
}

/// Validate a user name so it can be written as the key of a line.
pub fn validate_user_name(user_name: &str) -> CoreResult<()> {
    check_token("user_name", user_name)?;
    if user_name.starts_with(['#', '!']) {
        return Err(CoreError::InvalidArgument(
            "user_name must not start with a comment marker".to_string(),
        ));
    }
    Ok(())
}

/// Validate a role name.
pub fn validate_role(role: &str) -> CoreResult<()> {
    check_token("role", role)
}

/// Validate a password. Empty passwords are allowed.
pub fn validate_password(password: &str) -> CoreResult<()> {
    if let Some(c) = password.chars().find(|c| matches!(c, ',' | '\r' | '\n')) {
        return Err(CoreError::InvalidArgument(format!(
            "password contains unsupported character {c:?}"
        )));
    }
    if password.trim() != password {
        return Err(CoreError::InvalidArgument(
            "password must not start or end with whitespace".to_string(),
        ));
    }
    Ok(())
}
