//! CLI command definitions for the `userfile` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage users and roles stored in a flat users file.
#[derive(Parser, Debug)]
#[command(name = "userfile", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to `<config dir>/userfile/config.json`).
    #[arg(long, global = true, env = "USERFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Users file to manage, overriding the configured one.
    #[arg(long, global = true, env = "USERFILE_USERS_FILE")]
    pub users_file: Option<PathBuf>,

    /// Output machine-readable JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show whether the store is configured and writable.
    Status,

    /// List all user names.
    #[command(alias = "ls")]
    List,

    /// Show the roles of a user.
    Roles {
        user: String,
    },

    /// Show a user's record (password is never printed).
    Show {
        user: String,
    },

    /// Add a user, replacing any existing entry.
    Add {
        user: String,
        password: String,
        /// Role to grant (repeatable).
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },

    /// Change a user's password, keeping their roles.
    Passwd {
        user: String,
        password: String,
    },

    /// Replace a user's roles, keeping their password.
    SetRoles {
        user: String,
        /// Role to grant (repeatable). None clears all roles.
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },

    /// Grant a single role.
    Grant {
        user: String,
        role: String,
    },

    /// Revoke a single role.
    Revoke {
        user: String,
        role: String,
    },

    /// Delete a user.
    #[command(alias = "rm")]
    Delete {
        user: String,
    },

    /// Show the groups of a principal from the groups file.
    Groups {
        principal: String,
    },
}
