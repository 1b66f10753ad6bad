//! User management configuration.
//!
//! The configuration lists the authentication sources the host application
//! uses. User management is backed by the first `properties` source; its
//! `usersPropertyFile` option names the users file. Any other source kind is
//! ignored here.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use userfile_core::{CoreError, CoreResult};

/// Source kind whose options carry the users file path.
pub const PROPERTIES_SOURCE_KIND: &str = "properties";

/// Option key holding the absolute path of the users file.
pub const USERS_FILE_OPTION: &str = "usersPropertyFile";

/// One configured authentication source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationSource {
    pub kind: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserManagementConfig {
    #[serde(default)]
    pub sources: Vec<AuthenticationSource>,
    /// Optional read-only `principal=group1,group2` file.
    #[serde(default)]
    pub groups_property_file: Option<PathBuf>,
}

impl UserManagementConfig {
    /// Parse configuration from JSON text.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Configuration with a single properties source pointing at `users_file`.
    #[must_use]
    pub fn with_users_file(users_file: impl Into<PathBuf>) -> Self {
        let users_file: PathBuf = users_file.into();
        Self {
            sources: vec![AuthenticationSource {
                kind: PROPERTIES_SOURCE_KIND.to_string(),
                options: HashMap::from([(
                    USERS_FILE_OPTION.to_string(),
                    users_file.to_string_lossy().into_owned(),
                )]),
            }],
            groups_property_file: None,
        }
    }

    /// Resolve the users file path.
    ///
    /// Returns `None`, after logging why, when user management is disabled.
    #[must_use]
    pub fn users_file(&self) -> Option<PathBuf> {
        let Some(source) = self
            .sources
            .iter()
            .find(|s| s.kind == PROPERTIES_SOURCE_KIND)
        else {
            log::info!(
                "No '{PROPERTIES_SOURCE_KIND}' authentication source configured. User management will be disabled."
            );
            return None;
        };

        match source.options.get(USERS_FILE_OPTION) {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
            _ => {
                log::info!(
                    "The '{USERS_FILE_OPTION}' option has not been set. User management will be disabled."
                );
                None
            }
        }
    }
}
