//! Read-only groups lookup from a `principal=group1,group2` file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use userfile_core::codec;
use userfile_core::traits::GroupsAdapter;

/// Groups adapter loaded once from a flat file.
///
/// Unlike the users file, every token of the value is a group; there is no
/// password column. A missing or unreadable file degrades to an empty mapping.
#[derive(Debug, Default)]
pub struct PropertiesGroupsAdapter {
    groups_by_principal: HashMap<String, Vec<String>>,
}

impl PropertiesGroupsAdapter {
    /// Load the mapping from `path`.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let adapter = Self::from_content(&content);
                log::info!(
                    "Loaded groups for {} principals from '{}'",
                    adapter.groups_by_principal.len(),
                    path.display()
                );
                adapter
            }
            Err(e) => {
                log::warn!("Unable to load groups file '{}': {e}", path.display());
                Self::default()
            }
        }
    }

    /// Build the mapping from file content.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        let groups_by_principal = codec::parse_entries(content)
            .into_iter()
            .map(|(principal, value)| {
                let groups = value
                    .split(',')
                    .map(str::trim)
                    .filter(|group| !group.is_empty())
                    .map(String::from)
                    .collect();
                (principal, groups)
            })
            .collect();

        Self {
            groups_by_principal,
        }
    }
}

impl GroupsAdapter for PropertiesGroupsAdapter {
    fn get_groups(&self, principal_name: &str) -> Vec<String> {
        self.groups_by_principal
            .get(principal_name)
            .cloned()
            .unwrap_or_default()
    }
}
