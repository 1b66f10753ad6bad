//! Storage layer abstraction trait definition

mod groups_adapter;
mod user_manager;

pub use groups_adapter::{GroupsAdapter, NoGroupsAdapter};
pub use user_manager::UserManager;
