//! User management storage trait

use std::collections::BTreeSet;

use crate::error::CoreResult;
use crate::types::{RoleSet, UserRecord};

/// User management trait
///
/// Implementations:
/// - `PropertiesFileUserStore` (userfile-app): single flat file, loaded once and cached
///
/// All operations are synchronous and block for the duration of any file I/O.
/// Write operations persist before returning; a returned error means the new
/// state may not have reached the backing storage.
pub trait UserManager: Send + Sync {
    /// Whether `add_user` can currently succeed.
    ///
    /// Callers can use the capability flags to detect a disabled store
    /// without triggering an error.
    fn supports_add(&self) -> bool;

    /// Whether the update operations can currently succeed.
    fn supports_update(&self) -> bool;

    /// Whether `delete_user` can currently succeed.
    fn supports_delete(&self) -> bool;

    /// All known user names.
    fn list_user_names(&self) -> CoreResult<BTreeSet<String>>;

    /// Roles of a user.
    ///
    /// Returns an empty set both for an unknown user and for a user without roles.
    fn get_roles(&self, user_name: &str) -> CoreResult<RoleSet>;

    /// Full record of a user
    ///
    /// # Returns
    /// * `Ok(Some(record))` - user exists
    /// * `Ok(None)` - no such user
    fn get_user(&self, user_name: &str) -> CoreResult<Option<UserRecord>>;

    /// Insert a user or overwrite an existing one.
    fn add_user(&self, user_name: &str, password: &str, roles: &RoleSet) -> CoreResult<()>;

    /// Replace the password, keeping the roles. Creates the user if absent.
    fn update_user_password(&self, user_name: &str, password: &str) -> CoreResult<()>;

    /// Replace the roles, keeping the password. Creates the user if absent.
    fn update_user_roles(&self, user_name: &str, roles: &RoleSet) -> CoreResult<()>;

    /// Grant a single role.
    fn add_user_role(&self, user_name: &str, role: &str) -> CoreResult<()>;

    /// Revoke a single role. Revoking a role the user lacks is not an error.
    fn remove_user_role(&self, user_name: &str, role: &str) -> CoreResult<()>;

    /// Remove a user. Deleting an unknown user is not an error.
    fn delete_user(&self, user_name: &str) -> CoreResult<()>;
}
