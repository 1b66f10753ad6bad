//! Flat-file user store.
//!
//! Persists users as `user_name=password,role1,role2` lines in a single file.
//! The file is read once, on the first operation, and kept in memory; every
//! mutation rewrites the whole file. The store assumes it is the only writer
//! of its file for the lifetime of the process.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{SecondsFormat, Utc};
use userfile_core::codec;
use userfile_core::error::{CoreError, CoreResult};
use userfile_core::traits::UserManager;
use userfile_core::types::{
    validate_password, validate_role, validate_user_name, RoleSet, UserRecord, UsersMap,
};

/// Cache lifecycle: `Unloaded` until the first successful read, then `Loaded` for good.
#[derive(Debug, Default)]
enum CacheState {
    #[default]
    Unloaded,
    Loaded(UsersMap),
}

impl CacheState {
    /// Load the file on first use and hand out the cached map.
    ///
    /// A failed read leaves the state `Unloaded`.
    fn ensure_loaded(&mut self, path: &Path) -> CoreResult<&mut UsersMap> {
        if let Self::Unloaded = self {
            let users = PropertiesFileUserStore::read_users(path)?;
            log::info!("Loaded {} users from '{}'", users.len(), path.display());
            *self = Self::Loaded(users);
        }

        match self {
            Self::Loaded(users) => Ok(users),
            Self::Unloaded => Err(CoreError::StorageUnavailable(
                "users cache is not loaded".to_string(),
            )),
        }
    }
}

/// `UserManager` backed by a single line-oriented file.
///
/// If no path is configured the store stays usable but reports every
/// capability as unsupported, and every operation fails with
/// `CoreError::NotConfigured`.
pub struct PropertiesFileUserStore {
    path: Option<PathBuf>,
    /// Guards the cache and all access to the file.
    state: Mutex<CacheState>,
}

impl PropertiesFileUserStore {
    /// Create a store for `path`. Nothing is read until the first operation.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            state: Mutex::new(CacheState::Unloaded),
        }
    }

    /// Configured backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the backing file has been read into memory.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock(), CacheState::Loaded(_))
    }

    fn is_configured(&self) -> bool {
        self.path.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // The guarded state is only ever replaced whole, so it stays usable after a panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn configured_path(&self) -> CoreResult<&Path> {
        self.path.as_deref().ok_or(CoreError::NotConfigured)
    }

    fn read_users(path: &Path) -> CoreResult<UsersMap> {
        log::info!("Loading user information from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("Failed to read users file '{}': {e}", path.display());
            CoreError::StorageUnavailable(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(codec::parse_users(&content))
    }

    fn write_users(path: &Path, users: &UsersMap) -> CoreResult<()> {
        log::info!("Saving user information to '{}'", path.display());
        let to_storage_error = |e: std::io::Error| {
            log::error!("Failed to write users file '{}': {e}", path.display());
            CoreError::StorageUnavailable(format!("Failed to write {}: {e}", path.display()))
        };

        let file = File::create(path).map_err(to_storage_error)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "#Updated {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        )
        .map_err(to_storage_error)?;
        writer
            .write_all(codec::render_users(users).as_bytes())
            .map_err(to_storage_error)?;
        writer.flush().map_err(to_storage_error)
    }

    /// Run `f` against the loaded map.
    fn read<T>(&self, f: impl FnOnce(&UsersMap) -> T) -> CoreResult<T> {
        let path = self.configured_path()?;
        let mut state = self.lock();
        let users = state.ensure_loaded(path)?;
        Ok(f(users))
    }

    /// Apply `f` to the loaded map, then rewrite the file.
    ///
    /// On a write failure the cache keeps the mutation.
    fn mutate(&self, f: impl FnOnce(&mut UsersMap)) -> CoreResult<()> {
        let path = self.configured_path()?;
        let mut state = self.lock();
        let users = state.ensure_loaded(path)?;
        f(users);
        Self::write_users(path, users)
    }
}

fn dump_roles(roles: &RoleSet) -> String {
    roles.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn validate_roles(roles: &RoleSet) -> CoreResult<()> {
    roles.iter().try_for_each(|role| validate_role(role))
}

impl UserManager for PropertiesFileUserStore {
    fn supports_add(&self) -> bool {
        self.is_configured()
    }

    fn supports_update(&self) -> bool {
        self.is_configured()
    }

    fn supports_delete(&self) -> bool {
        self.is_configured()
    }

    fn list_user_names(&self) -> CoreResult<BTreeSet<String>> {
        log::info!("Retrieving user names...");
        self.read(|users| users.keys().cloned().collect())
    }

    fn get_roles(&self, user_name: &str) -> CoreResult<RoleSet> {
        validate_user_name(user_name)?;
        log::info!("Retrieving roles for user '{user_name}'...");
        self.read(|users| {
            users
                .get(user_name)
                .map(|record| record.roles.clone())
                .unwrap_or_default()
        })
    }

    fn get_user(&self, user_name: &str) -> CoreResult<Option<UserRecord>> {
        validate_user_name(user_name)?;
        self.read(|users| users.get(user_name).cloned())
    }

    fn add_user(&self, user_name: &str, password: &str, roles: &RoleSet) -> CoreResult<()> {
        validate_user_name(user_name)?;
        validate_password(password)?;
        validate_roles(roles)?;

        log::info!(
            "Adding user '{user_name}' with roles [{}]",
            dump_roles(roles)
        );
        self.mutate(|users| {
            users.insert(
                user_name.to_string(),
                UserRecord::new(password, roles.clone()),
            );
        })
    }

    fn update_user_password(&self, user_name: &str, password: &str) -> CoreResult<()> {
        validate_user_name(user_name)?;
        validate_password(password)?;

        log::info!("Updating password for user '{user_name}'");
        self.mutate(|users| {
            users.entry(user_name.to_string()).or_default().password = password.to_string();
        })
    }

    fn update_user_roles(&self, user_name: &str, roles: &RoleSet) -> CoreResult<()> {
        validate_user_name(user_name)?;
        validate_roles(roles)?;

        log::info!(
            "Updating roles for user '{user_name}': [{}]",
            dump_roles(roles)
        );
        self.mutate(|users| {
            users.entry(user_name.to_string()).or_default().roles = roles.clone();
        })
    }

    fn add_user_role(&self, user_name: &str, role: &str) -> CoreResult<()> {
        validate_user_name(user_name)?;
        validate_role(role)?;

        log::info!("Adding role '{role}' to user '{user_name}'");
        self.mutate(|users| {
            users
                .entry(user_name.to_string())
                .or_default()
                .roles
                .insert(role.to_string());
        })
    }

    fn remove_user_role(&self, user_name: &str, role: &str) -> CoreResult<()> {
        validate_user_name(user_name)?;
        validate_role(role)?;

        log::info!("Removing role '{role}' from user '{user_name}'");
        self.mutate(|users| {
            users
                .entry(user_name.to_string())
                .or_default()
                .roles
                .remove(role);
        })
    }

    fn delete_user(&self, user_name: &str) -> CoreResult<()> {
        validate_user_name(user_name)?;

        log::info!("Deleting user '{user_name}'");
        self.mutate(|users| {
            users.remove(user_name);
        })
    }
}
