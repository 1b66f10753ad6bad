//! Application bootstrap for userfile.
//!
//! Provides `AppState` (adapter container) and `AppStateBuilder` (adapter
//! injection), plus the file-backed adapters and the configuration types.

pub mod adapters;
pub mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use userfile_core::error::{CoreError, CoreResult};
use userfile_core::traits::{GroupsAdapter, NoGroupsAdapter, UserManager};

use adapters::{PropertiesFileUserStore, PropertiesGroupsAdapter};
use config::UserManagementConfig;

/// Application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// User/role store
    pub user_manager: Arc<dyn UserManager>,
    /// Read-only principal -> groups lookup
    pub groups: Arc<dyn GroupsAdapter>,
}

impl AppState {
    /// Groups of a principal, from the configured groups source.
    pub fn principal_groups(&self, principal_name: &str) -> Vec<String> {
        self.groups.get_groups(principal_name)
    }
}

/// Builder for constructing `AppState` with concrete adapters.
///
/// # Required adapters
/// - `user_manager` — how users are stored
///
/// # Optional
/// - `groups` — defaults to `NoGroupsAdapter`
pub struct AppStateBuilder {
    user_manager: Option<Arc<dyn UserManager>>,
    groups: Option<Arc<dyn GroupsAdapter>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_manager: None,
            groups: None,
        }
    }

    /// Builder preloaded with the file adapters named by `config`.
    ///
    /// A config without a users file still yields a store; it reports itself
    /// as unsupported through the capability flags.
    #[must_use]
    pub fn from_config(config: &UserManagementConfig) -> Self {
        Self::from_files(config.users_file(), config.groups_property_file.as_deref())
    }

    /// Builder preloaded with file adapters for already-resolved paths.
    #[must_use]
    pub fn from_files(users_file: Option<PathBuf>, groups_file: Option<&Path>) -> Self {
        let builder = Self::new().user_manager(Arc::new(PropertiesFileUserStore::new(users_file)));
        match groups_file {
            Some(path) => builder.groups(Arc::new(PropertiesGroupsAdapter::load(path))),
            None => builder,
        }
    }

    #[must_use]
    pub fn user_manager(mut self, user_manager: Arc<dyn UserManager>) -> Self {
        self.user_manager = Some(user_manager);
        self
    }

    #[must_use]
    pub fn groups(mut self, groups: Arc<dyn GroupsAdapter>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` if the user manager is missing.
    pub fn build(self) -> CoreResult<AppState> {
        let user_manager = self
            .user_manager
            .ok_or_else(|| CoreError::ConfigError("user_manager is required".to_string()))?;
        let groups = self
            .groups
            .unwrap_or_else(|| Arc::new(NoGroupsAdapter));

        Ok(AppState {
            user_manager,
            groups,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
