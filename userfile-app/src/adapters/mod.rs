//! File-backed storage adapters.

mod properties_file_store;
mod properties_groups;

pub use properties_file_store::PropertiesFileUserStore;
pub use properties_groups::PropertiesGroupsAdapter;
