//! Group Registry
//!
//! A process-wide map from group name to `Group`. The HTTP handler uses it to
//! find the group a peer is asking about. Groups are never removed.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::group::Group;
use super::types::Getter;

static GROUPS: Lazy<GroupRegistry> = Lazy::new(GroupRegistry::default);

/// Registry holding every group created in this process.
#[derive(Default)]
pub(crate) struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// The registry shared by the whole process.
    pub(crate) fn global() -> &'static GroupRegistry {
        &GROUPS
    }

    /// Stores `group` under its name, replacing any group previously
    /// registered with the same name.
    pub(crate) fn insert(&self, group: Arc<Group>) {
        let previous = self
            .groups
            .write()
            .insert(group.name().to_string(), group.clone());

        if previous.is_some() {
            tracing::warn!("Replaced existing cache group: {}", group.name());
        } else {
            tracing::info!("Registered cache group: {}", group.name());
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }
}

/// Creates a group and registers it in the global registry.
///
/// `cache_bytes` bounds the local store; `0` means unlimited.
pub fn new_group<G>(name: &str, cache_bytes: usize, getter: G) -> Arc<Group>
where
    G: Getter + 'static,
{
    let group = Arc::new(Group::new(name, cache_bytes, Arc::new(getter)));
    GroupRegistry::global().insert(group.clone());
    group
}

/// Looks up a group created with [`new_group`]. `None` if it does not exist.
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GroupRegistry::global().get(name)
}
