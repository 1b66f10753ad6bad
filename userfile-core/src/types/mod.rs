//! Type definition module

mod user;

pub use user::{
    validate_password, validate_role, validate_user_name, RoleSet, UserRecord, UsersMap,
};
