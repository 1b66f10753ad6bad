//! Command handlers.

use std::collections::BTreeSet;

use anyhow::{bail, Context};
use serde::Serialize;
use userfile_app::AppState;
use userfile_core::traits::UserManager;
use userfile_core::types::RoleSet;

use crate::cli::Commands;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    users_file: Option<String>,
    supports_add: bool,
    supports_update: bool,
    supports_delete: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserOutput<'a> {
    user_name: &'a str,
    has_password: bool,
    roles: &'a RoleSet,
}

#[derive(Clone, Copy)]
enum Capability {
    Add,
    Update,
    Delete,
}

fn require(manager: &dyn UserManager, capability: Capability) -> anyhow::Result<()> {
    let supported = match capability {
        Capability::Add => manager.supports_add(),
        Capability::Update => manager.supports_update(),
        Capability::Delete => manager.supports_delete(),
    };
    if !supported {
        bail!("User management is disabled: no users file is configured");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn print_names(names: &BTreeSet<String>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(names);
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn print_list(items: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&items);
    }
    for item in items {
        println!("{item}");
    }
    Ok(())
}

/// Execute one command against the application state.
pub fn run(
    state: &AppState,
    users_file: Option<String>,
    command: Commands,
    json: bool,
) -> anyhow::Result<()> {
    let manager = state.user_manager.as_ref();

    match command {
        Commands::Status => {
            let status = StatusOutput {
                users_file,
                supports_add: manager.supports_add(),
                supports_update: manager.supports_update(),
                supports_delete: manager.supports_delete(),
            };
            if json {
                return print_json(&status);
            }
            match &status.users_file {
                Some(path) => println!("Users file: {path}"),
                None => println!("Users file: (not configured)"),
            }
            println!("Add supported:    {}", status.supports_add);
            println!("Update supported: {}", status.supports_update);
            println!("Delete supported: {}", status.supports_delete);
        }

        Commands::List => {
            let names = manager.list_user_names()?;
            print_names(&names, json)?;
        }

        Commands::Roles { user } => {
            let roles = manager.get_roles(&user)?;
            let roles: Vec<String> = roles.into_iter().collect();
            print_list(&roles, json)?;
        }

        Commands::Show { user } => {
            let Some(record) = manager.get_user(&user)? else {
                bail!("User '{user}' not found");
            };
            let output = UserOutput {
                user_name: &user,
                has_password: !record.password.is_empty(),
                roles: &record.roles,
            };
            if json {
                return print_json(&output);
            }
            println!("User:     {}", output.user_name);
            println!("Password: {}", if output.has_password { "set" } else { "empty" });
            let roles: Vec<&str> = output.roles.iter().map(String::as_str).collect();
            println!("Roles:    {}", roles.join(", "));
        }

        Commands::Add {
            user,
            password,
            roles,
        } => {
            require(manager, Capability::Add)?;
            let roles: RoleSet = roles.into_iter().collect();
            manager.add_user(&user, &password, &roles)?;
            tracing::info!("User '{user}' added");
        }

        Commands::Passwd { user, password } => {
            require(manager, Capability::Update)?;
            manager.update_user_password(&user, &password)?;
            tracing::info!("Password updated for '{user}'");
        }

        Commands::SetRoles { user, roles } => {
            require(manager, Capability::Update)?;
            let roles: RoleSet = roles.into_iter().collect();
            manager.update_user_roles(&user, &roles)?;
            tracing::info!("Roles replaced for '{user}'");
        }

        Commands::Grant { user, role } => {
            require(manager, Capability::Update)?;
            manager.add_user_role(&user, &role)?;
            tracing::info!("Role '{role}' granted to '{user}'");
        }

        Commands::Revoke { user, role } => {
            require(manager, Capability::Update)?;
            manager.remove_user_role(&user, &role)?;
            tracing::info!("Role '{role}' revoked from '{user}'");
        }

        Commands::Delete { user } => {
            require(manager, Capability::Delete)?;
            manager.delete_user(&user)?;
            tracing::info!("User '{user}' deleted");
        }

        Commands::Groups { principal } => {
            let groups = state.principal_groups(&principal);
            print_list(&groups, json)?;
        }
    }

    Ok(())
}
