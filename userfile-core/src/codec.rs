//! Line codec for the users file.
//!
//! Each record is one line `user_name=password,role1,role2,...`. Blank lines
//! and lines starting with `#` or `!` are comments. Nothing is escaped, so
//! names, roles and passwords must not contain the separators (see
//! `types::validate_*`).

use crate::types::{RoleSet, UserRecord, UsersMap};

const KEY_SEPARATOR: char = '=';
const VALUE_SEPARATOR: char = ',';

/// Encode a password and its roles as the value part of a line.
///
/// An empty role set still produces the trailing separator: `pw,`.
#[must_use]
pub fn encode_value(password: &str, roles: &RoleSet) -> String {
    let mut value = String::from(password);
    value.push(VALUE_SEPARATOR);
    let joined: Vec<&str> = roles.iter().map(String::as_str).collect();
    value.push_str(&joined.join(","));
    value
}

/// Extract the roles from a stored value. Index 0 is the password and is skipped.
#[must_use]
pub fn decode_roles(value: &str) -> RoleSet {
    if value.is_empty() {
        return RoleSet::new();
    }
    value
        .split(VALUE_SEPARATOR)
        .skip(1)
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(String::from)
        .collect()
}

/// Extract the password from a stored value.
///
/// Trimmed like the roles, since surrounding whitespace can never be written back.
#[must_use]
pub fn decode_password(value: &str) -> String {
    value
        .split(VALUE_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Decode a full record from a stored value.
#[must_use]
pub fn decode_record(value: &str) -> UserRecord {
    UserRecord::new(decode_password(value), decode_roles(value))
}

fn is_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with(['#', '!'])
}

/// Split a non-comment line into `(user_name, value)`.
///
/// Returns `None` when the line has no `=` or an empty key.
#[must_use]
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once(KEY_SEPARATOR)?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Render one record as a line, without the trailing newline.
#[must_use]
pub fn format_line(user_name: &str, record: &UserRecord) -> String {
    format!(
        "{user_name}{KEY_SEPARATOR}{}",
        encode_value(&record.password, &record.roles)
    )
}

/// Split file content into `(key, value)` entries in file order.
///
/// Comments are dropped and malformed lines are skipped with a warning.
/// Used for both the users file and the groups file.
#[must_use]
pub fn parse_entries(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if is_comment(line) {
            continue;
        }
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => log::warn!("Skipping malformed line {}", index + 1),
        }
    }
    entries
}

/// Parse the whole users file content.
///
/// A repeated user name keeps the last occurrence.
#[must_use]
pub fn parse_users(content: &str) -> UsersMap {
    let mut users = UsersMap::new();
    for (user_name, value) in parse_entries(content) {
        if users.insert(user_name.clone(), decode_record(&value)).is_some() {
            log::debug!("Duplicate entry for user '{user_name}', keeping the later one");
        }
    }
    users
}

/// Render every record, one line each.
#[must_use]
pub fn render_users(users: &UsersMap) -> String {
    let mut out = String::new();
    for (user_name, record) in users {
        out.push_str(&format_line(user_name, record));
        out.push('\n');
    }
    out
}
