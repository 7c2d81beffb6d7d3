//! Named, colored window groups with bulk minimize/restore/close.
//!
//! The manager only tracks membership. Per-window actions are injected by the caller, so the
//! window manager stays the single owner of window lifecycle.

use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    model::{WindowGroup, GROUP_COLOR_PALETTE},
    persistence::{load_json_list, unique_time_id, warn_on_failure, write_json},
};

/// Owns the window group list, writing every change through to the store.
///
/// A window belongs to at most one group: adding it to a group removes it from every other group.
pub struct WindowGroupManager {
    store: SharedKeyValueStore,
    groups_key: String,
    groups: Vec<WindowGroup>,
}

impl WindowGroupManager {
    pub fn new(store: SharedKeyValueStore, config: &StateLayerConfig) -> Self {
        let mut manager = Self {
            store,
            groups_key: config.window_groups_key.clone(),
            groups: Vec::new(),
        };
        manager.reload();
        manager
    }

    /// Re-reads groups from the store; absent or malformed data yields no groups.
    pub fn reload(&mut self) {
        self.groups = load_json_list(&*self.store, &self.groups_key);
    }

    pub fn groups(&self) -> &[WindowGroup] {
        &self.groups
    }

    pub fn palette(&self) -> &'static [&'static str] {
        &GROUP_COLOR_PALETTE
    }

    pub fn find(&self, group_id: &str) -> Option<&WindowGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Creates a group and returns its id.
    ///
    /// The color is `palette[count % 8]` at creation time. Initial windows are deduplicated and
    /// taken out of any group they were already in.
    pub fn create(&mut self, name: &str, initial_window_ids: &[String]) -> String {
        let id = unique_time_id("group", |candidate| self.find(candidate).is_some());
        let color = GROUP_COLOR_PALETTE[self.groups.len() % GROUP_COLOR_PALETTE.len()];

        let mut window_ids: Vec<String> = Vec::with_capacity(initial_window_ids.len());
        for window_id in initial_window_ids {
            if !window_ids.contains(window_id) {
                window_ids.push(window_id.clone());
            }
        }
        for group in &mut self.groups {
            group.window_ids.retain(|w| !window_ids.contains(w));
        }

        self.groups.push(WindowGroup {
            id: id.clone(),
            name: name.to_string(),
            window_ids,
            color: color.to_string(),
            created_at: platform_host::iso8601_now(),
        });
        self.persist();
        id
    }

    /// Deletes a group. Its windows become groupless.
    pub fn delete(&mut self, group_id: &str) {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != group_id);
        if self.groups.len() != before {
            self.persist();
        }
    }

    pub fn rename(&mut self, group_id: &str, name: &str) {
        self.update(group_id, |group| group.name = name.to_string());
    }

    pub fn set_color(&mut self, group_id: &str, color: &str) {
        self.update(group_id, |group| group.color = color.to_string());
    }

    /// Adds `window_id` to `group_id`, removing it from any other group first.
    ///
    /// Unknown groups are ignored and existing membership is left untouched.
    pub fn add_window_to_group(&mut self, window_id: &str, group_id: &str) {
        if self.find(group_id).is_none() {
            return;
        }
        for group in &mut self.groups {
            if group.id == group_id {
                if !group.contains(window_id) {
                    group.window_ids.push(window_id.to_string());
                }
            } else {
                group.window_ids.retain(|w| w != window_id);
            }
        }
        self.persist();
    }

    pub fn remove_window_from_group(&mut self, window_id: &str, group_id: &str) {
        self.update(group_id, |group| group.window_ids.retain(|w| w != window_id));
    }

    /// Drops `window_id` from every group, typically when the window closes.
    pub fn remove_window_from_all_groups(&mut self, window_id: &str) {
        if !self.groups.iter().any(|g| g.contains(window_id)) {
            return;
        }
        for group in &mut self.groups {
            group.window_ids.retain(|w| w != window_id);
        }
        self.persist();
    }

    /// First group, in list order, that contains `window_id`.
    pub fn window_group(&self, window_id: &str) -> Option<&WindowGroup> {
        self.groups.iter().find(|g| g.contains(window_id))
    }

    /// Member windows of `group_id`; empty for unknown groups.
    pub fn group_windows(&self, group_id: &str) -> &[String] {
        self.find(group_id)
            .map(|g| g.window_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Invokes `minimize` once per member window, in list order.
    pub fn minimize_group(&self, group_id: &str, minimize: impl FnMut(&str)) {
        self.for_each_member(group_id, minimize);
    }

    /// Invokes `restore` once per member window, in list order.
    pub fn restore_group(&self, group_id: &str, restore: impl FnMut(&str)) {
        self.for_each_member(group_id, restore);
    }

    /// Invokes `close` once per member window, then deletes the group.
    pub fn close_group(&mut self, group_id: &str, close: impl FnMut(&str)) {
        if self.find(group_id).is_none() {
            return;
        }
        self.for_each_member(group_id, close);
        self.delete(group_id);
    }

    fn for_each_member(&self, group_id: &str, mut action: impl FnMut(&str)) {
        for window_id in self.group_windows(group_id) {
            action(window_id);
        }
    }

    fn update(&mut self, group_id: &str, apply: impl FnOnce(&mut WindowGroup)) {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return;
        };
        apply(group);
        self.persist();
    }

    fn persist(&self) {
        warn_on_failure(
            "window groups",
            write_json(&*self.store, &self.groups_key, &self.groups),
        );
    }
}
