//! Read-only principal -> groups lookup

/// Group lookup trait
///
/// Resolves the groups a principal belongs to. Lookups never fail: an
/// unknown principal or an unavailable source yields an empty list.
pub trait GroupsAdapter: Send + Sync {
    fn get_groups(&self, principal_name: &str) -> Vec<String>;
}

/// Groups adapter used when no groups source is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGroupsAdapter;

impl GroupsAdapter for NoGroupsAdapter {
    fn get_groups(&self, _principal_name: &str) -> Vec<String> {
        Vec::new()
    }
}
