//! userfile Core Library
//!
//! Platform-independent pieces of the flat-file user store:
//! - `UserRecord` / `RoleSet` domain types
//! - the `name=password,role1,role2` line codec
//! - the `UserManager` and `GroupsAdapter` storage traits
//!
//! Concrete file-backed adapters live in `userfile-app`.

pub mod codec;
pub mod error;
pub mod traits;
pub mod types;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use traits::{GroupsAdapter, UserManager};
pub use types::{RoleSet, UserRecord, UsersMap};
