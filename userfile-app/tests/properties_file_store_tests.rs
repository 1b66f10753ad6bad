#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `PropertiesFileUserStore` — covers the `UserManager`
//! operations against a real file in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use userfile_app::adapters::PropertiesFileUserStore;
use userfile_core::error::CoreError;
use userfile_core::traits::UserManager;
use userfile_core::types::RoleSet;

// ===== Helpers =====

fn create_test_store(content: &str) -> (PropertiesFileUserStore, PathBuf, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("users.properties");
    fs::write(&path, content).expect("failed to seed users file");
    let store = PropertiesFileUserStore::new(Some(path.clone()));
    (store, path, tmp)
}

fn roles(names: &[&str]) -> RoleSet {
    names.iter().map(|s| (*s).to_string()).collect()
}

fn file_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

// ===== Read Tests =====

#[test]
fn list_user_names_empty_file() {
    let (store, _path, _tmp) = create_test_store("");
    assert!(store.list_user_names().unwrap().is_empty());
}

#[test]
fn get_roles_unknown_user_is_empty() {
    let (store, _path, _tmp) = create_test_store("");
    assert!(store.get_roles("nobody").unwrap().is_empty());
}

#[test]
fn reads_existing_file() {
    let (store, _path, _tmp) =
        create_test_store("#Updated earlier\nalice=secret,admin,user\nbob=pw,\n");

    let names = store.list_user_names().unwrap();
    assert_eq!(names.len(), 2);
    assert!(names.contains("alice"));
    assert!(names.contains("bob"));
    assert_eq!(store.get_roles("alice").unwrap(), roles(&["admin", "user"]));
    assert!(store.get_roles("bob").unwrap().is_empty());
}

#[test]
fn malformed_lines_are_skipped() {
    let (store, _path, _tmp) = create_test_store("this line is broken\nalice=secret,admin\n");
    let names = store.list_user_names().unwrap();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["alice"]);
}

#[test]
fn get_roles_empty_name_is_invalid() {
    let (store, _path, _tmp) = create_test_store("");
    assert!(matches!(
        store.get_roles(""),
        Err(CoreError::InvalidArgument(_))
    ));
}

// ===== Write Tests =====

#[test]
fn add_user_persists_line() {
    let (store, path, _tmp) = create_test_store("");
    store
        .add_user("alice", "secret", &roles(&["admin"]))
        .unwrap();

    let names = store.list_user_names().unwrap();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["alice"]);
    assert_eq!(store.get_roles("alice").unwrap(), roles(&["admin"]));
    assert!(file_lines(&path).contains(&"alice=secret,admin".to_string()));
}

#[test]
fn add_user_overwrites_existing() {
    let (store, path, _tmp) = create_test_store("alice=old,user\n");
    store
        .add_user("alice", "new", &roles(&["admin"]))
        .unwrap();

    let record = store.get_user("alice").unwrap().unwrap();
    assert_eq!(record.password, "new");
    assert_eq!(record.roles, roles(&["admin"]));
    let lines = file_lines(&path);
    assert!(lines.contains(&"alice=new,admin".to_string()));
    assert!(!lines.contains(&"alice=old,user".to_string()));
}

#[test]
fn add_user_without_roles_writes_trailing_separator() {
    let (store, path, _tmp) = create_test_store("");
    store.add_user("bob", "pw1", &RoleSet::new()).unwrap();
    assert!(file_lines(&path).contains(&"bob=pw1,".to_string()));
}

#[test]
fn saved_file_starts_with_header_comment() {
    let (store, path, _tmp) = create_test_store("");
    store.add_user("alice", "secret", &RoleSet::new()).unwrap();
    assert!(file_lines(&path)[0].starts_with("#Updated "));
}

#[test]
fn update_password_keeps_roles() {
    let (store, _path, _tmp) = create_test_store("");
    store.add_user("bob", "pw1", &RoleSet::new()).unwrap();
    store.update_user_password("bob", "pw2").unwrap();

    assert!(store.get_roles("bob").unwrap().is_empty());
    assert_eq!(store.get_user("bob").unwrap().unwrap().password, "pw2");

    store.update_user_roles("bob", &roles(&["ops"])).unwrap();
    store.update_user_password("bob", "pw3").unwrap();
    assert_eq!(store.get_roles("bob").unwrap(), roles(&["ops"]));
}

#[test]
fn update_password_creates_absent_user() {
    let (store, _path, _tmp) = create_test_store("");
    store.update_user_password("carol", "pw").unwrap();

    let record = store.get_user("carol").unwrap().unwrap();
    assert_eq!(record.password, "pw");
    assert!(record.roles.is_empty());
}

#[test]
fn update_roles_keeps_password() {
    let (store, path, _tmp) = create_test_store("alice=secret,admin\n");
    store
        .update_user_roles("alice", &roles(&["auditor", "user"]))
        .unwrap();

    let record = store.get_user("alice").unwrap().unwrap();
    assert_eq!(record.password, "secret");
    assert_eq!(record.roles, roles(&["auditor", "user"]));
    assert!(file_lines(&path).contains(&"alice=secret,auditor,user".to_string()));
}

#[test]
fn update_roles_creates_absent_user_with_empty_password() {
    let (store, _path, _tmp) = create_test_store("");
    store.update_user_roles("dave", &roles(&["user"])).unwrap();

    let record = store.get_user("dave").unwrap().unwrap();
    assert_eq!(record.password, "");
    assert_eq!(record.roles, roles(&["user"]));
}

#[test]
fn add_then_remove_role_restores_roles() {
    let (store, _path, _tmp) = create_test_store("alice=secret,admin,user\n");
    let before = store.get_roles("alice").unwrap();

    store.add_user_role("alice", "auditor").unwrap();
    assert!(store.get_roles("alice").unwrap().contains("auditor"));

    store.remove_user_role("alice", "auditor").unwrap();
    assert_eq!(store.get_roles("alice").unwrap(), before);
}

#[test]
fn add_existing_role_is_noop() {
    let (store, _path, _tmp) = create_test_store("alice=secret,admin\n");
    store.add_user_role("alice", "admin").unwrap();
    assert_eq!(store.get_roles("alice").unwrap(), roles(&["admin"]));
}

#[test]
fn remove_missing_role_still_rewrites_file() {
    let (store, path, _tmp) = create_test_store("alice=secret,admin\n");
    store.remove_user_role("alice", "ops").unwrap();

    assert_eq!(store.get_roles("alice").unwrap(), roles(&["admin"]));
    // The seeded file had no header; a rewrite adds one.
    assert!(file_lines(&path)[0].starts_with("#Updated "));
}

#[test]
fn remove_role_from_absent_user_creates_empty_record() {
    let (store, path, _tmp) = create_test_store("");
    store.remove_user_role("ghost", "admin").unwrap();
    store.add_user_role("ghost2", "admin").unwrap();

    let record = store.get_user("ghost").unwrap().unwrap();
    assert_eq!(record.password, "");
    assert!(record.roles.is_empty());
    assert_eq!(store.list_user_names().unwrap().len(), 2);

    let lines = file_lines(&path);
    assert!(lines.contains(&"ghost=,".to_string()));
    assert!(lines.contains(&"ghost2=,admin".to_string()));
}

#[test]
fn delete_user_is_idempotent() {
    let (store, path, _tmp) = create_test_store("alice=secret,admin\nbob=pw,\n");

    store.delete_user("alice").unwrap();
    let once = store.list_user_names().unwrap();
    let file_once: Vec<String> = file_lines(&path).into_iter().skip(1).collect();

    store.delete_user("alice").unwrap();
    let twice = store.list_user_names().unwrap();
    let file_twice: Vec<String> = file_lines(&path).into_iter().skip(1).collect();

    assert_eq!(once, twice);
    assert_eq!(file_once, file_twice);
    assert_eq!(file_twice, vec!["bob=pw,".to_string()]);
}

#[test]
fn write_rejects_unrepresentable_arguments() {
    let (store, path, _tmp) = create_test_store("");

    assert!(matches!(
        store.add_user("", "pw", &RoleSet::new()),
        Err(CoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.add_user("a=b", "pw", &RoleSet::new()),
        Err(CoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.add_user("alice", "p,w", &RoleSet::new()),
        Err(CoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.add_user("alice", "pw", &roles(&["admin,root"])),
        Err(CoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.delete_user(""),
        Err(CoreError::InvalidArgument(_))
    ));

    // Nothing was written
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn padded_password_in_file_is_trimmed() {
    let (store, _path, _tmp) = create_test_store("alice=pw ,admin\n");
    let record = store.get_user("alice").unwrap().unwrap();
    assert_eq!(record.password, "pw");

    // The loaded password is one the store itself would accept
    store.update_user_password("alice", &record.password).unwrap();
    assert_eq!(store.get_roles("alice").unwrap(), roles(&["admin"]));
}

#[test]
fn empty_password_round_trips() {
    let (store, path, _tmp) = create_test_store("");
    store.add_user("eve", "", &roles(&["user"])).unwrap();

    let reopened = PropertiesFileUserStore::new(Some(path));
    let record = reopened.get_user("eve").unwrap().unwrap();
    assert_eq!(record.password, "");
    assert_eq!(record.roles, roles(&["user"]));
}

// ===== Lifecycle Tests =====

#[test]
fn load_is_lazy() {
    let (store, _path, _tmp) = create_test_store("alice=secret,admin\n");
    assert!(!store.is_loaded());
    store.list_user_names().unwrap();
    assert!(store.is_loaded());
}

#[test]
fn external_edits_after_load_are_not_observed() {
    let (store, path, _tmp) = create_test_store("alice=secret,admin\n");
    assert_eq!(store.list_user_names().unwrap().len(), 1);

    fs::write(&path, "alice=secret,admin\nmallory=pw,root\n").unwrap();
    assert_eq!(store.list_user_names().unwrap().len(), 1);
    assert!(store.get_user("mallory").unwrap().is_none());

    // A fresh store sees the edit
    let fresh = PropertiesFileUserStore::new(Some(path));
    assert_eq!(fresh.list_user_names().unwrap().len(), 2);
}

#[test]
fn changes_survive_reopen() {
    let (store, path, _tmp) = create_test_store("");
    store
        .add_user("alice", "secret", &roles(&["admin"]))
        .unwrap();
    store.add_user_role("alice", "user").unwrap();
    store.add_user("bob", "pw", &RoleSet::new()).unwrap();
    store.delete_user("bob").unwrap();
    drop(store);

    let reopened = PropertiesFileUserStore::new(Some(path));
    let names = reopened.list_user_names().unwrap();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["alice"]);
    assert_eq!(
        reopened.get_roles("alice").unwrap(),
        roles(&["admin", "user"])
    );
}

// ===== Error Tests =====

#[test]
fn unconfigured_store_fails_not_configured() {
    let store = PropertiesFileUserStore::new(None);
    assert!(!store.supports_add());
    assert!(matches!(
        store.add_user("alice", "secret", &roles(&["admin"])),
        Err(CoreError::NotConfigured)
    ));
    assert!(matches!(
        store.get_roles("alice"),
        Err(CoreError::NotConfigured)
    ));
}

#[test]
fn configured_store_reports_capabilities() {
    let (store, _path, _tmp) = create_test_store("");
    assert!(store.supports_add());
    assert!(store.supports_update());
    assert!(store.supports_delete());
}

#[test]
fn missing_file_is_storage_unavailable_and_retried_later() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("users.properties");
    let store = PropertiesFileUserStore::new(Some(path.clone()));

    assert!(matches!(
        store.list_user_names(),
        Err(CoreError::StorageUnavailable(_))
    ));
    assert!(!store.is_loaded());

    fs::write(&path, "alice=secret,admin\n").unwrap();
    assert_eq!(store.list_user_names().unwrap().len(), 1);
}

#[test]
fn save_failure_keeps_mutation_in_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("conf");
    fs::create_dir(&dir).unwrap();
    let path = dir.join("users.properties");
    fs::write(&path, "alice=secret,admin\n").unwrap();

    let store = PropertiesFileUserStore::new(Some(path));
    store.list_user_names().unwrap();

    fs::remove_dir_all(&dir).unwrap();
    let result = store.add_user("bob", "pw", &RoleSet::new());
    assert!(matches!(result, Err(CoreError::StorageUnavailable(_))));

    // Persistence unknown, but the cache holds the attempted change
    assert!(store.get_user("bob").unwrap().is_some());
}

// ===== Concurrency Tests =====

#[test]
fn concurrent_writers_do_not_lose_updates() {
    let (store, path, _tmp) = create_test_store("");
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user = format!("user{i}");
                store.add_user(&user, "pw", &RoleSet::new()).unwrap();
                store.add_user_role(&user, "member").unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list_user_names().unwrap().len(), 8);

    let reopened = PropertiesFileUserStore::new(Some(path));
    let names = reopened.list_user_names().unwrap();
    assert_eq!(names.len(), 8);
    for name in &names {
        assert_eq!(reopened.get_roles(name).unwrap(), roles(&["member"]));
    }
}
