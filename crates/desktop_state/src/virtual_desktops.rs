//! Virtual desktop partitioning and the active-desktop pointer.
//!
//! Windows are tracked by opaque id. A window listed on no desktop is visible on every desktop, so
//! windows opened before any assignment logic runs are never hidden.

use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    model::{VirtualDesktop, DEFAULT_DESKTOP_ID},
    persistence::{load_json_list, read_raw, unique_time_id, warn_on_failure, write_json, write_raw},
};

fn default_desktop() -> VirtualDesktop {
    VirtualDesktop {
        id: DEFAULT_DESKTOP_ID.to_string(),
        name: "Desktop 1".to_string(),
        window_ids: Vec::new(),
        created_at: platform_host::iso8601_now(),
    }
}

/// Owns the desktop list and active pointer, writing every change through to the store.
pub struct DesktopManager {
    store: SharedKeyValueStore,
    desktops_key: String,
    active_key: String,
    max_desktops: usize,
    desktops: Vec<VirtualDesktop>,
    active_id: String,
}

impl DesktopManager {
    /// Loads persisted desktops, falling back to a single default desktop.
    pub fn new(store: SharedKeyValueStore, config: &StateLayerConfig) -> Self {
        let mut manager = Self {
            store,
            desktops_key: config.desktops_key.clone(),
            active_key: config.active_desktop_key.clone(),
            max_desktops: config.max_desktops,
            desktops: Vec::new(),
            active_id: String::new(),
        };
        manager.reload();
        manager
    }

    /// Re-reads desktops and the active pointer from the store.
    ///
    /// An empty or malformed list becomes one default desktop; an absent or dangling active id
    /// resolves to the first desktop.
    pub fn reload(&mut self) {
        let mut desktops: Vec<VirtualDesktop> = load_json_list(&*self.store, &self.desktops_key);
        if desktops.is_empty() {
            desktops.push(default_desktop());
        }

        let stored_active = match read_raw(&*self.store, &self.active_key) {
            Ok(raw) => raw,
            Err(err) => {
                leptos::logging::warn!("{err}");
                None
            }
        };
        self.active_id = stored_active
            .filter(|id| desktops.iter().any(|d| d.id == *id))
            .or_else(|| desktops.first().map(|d| d.id.clone()))
            .unwrap_or_else(|| DEFAULT_DESKTOP_ID.to_string());
        self.desktops = desktops;
    }

    pub fn desktops(&self) -> &[VirtualDesktop] {
        &self.desktops
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Returns the active desktop record.
    pub fn active(&self) -> Option<&VirtualDesktop> {
        self.find(&self.active_id)
    }

    pub fn find(&self, desktop_id: &str) -> Option<&VirtualDesktop> {
        self.desktops.iter().find(|d| d.id == desktop_id)
    }

    /// Whether the switcher may offer another desktop. [`Self::create`] itself never refuses.
    pub fn can_create(&self) -> bool {
        self.desktops.len() < self.max_desktops
    }

    /// Appends an empty desktop and returns its id. A blank name becomes `Desktop {n+1}`.
    pub fn create(&mut self, name: Option<&str>) -> String {
        let id = unique_time_id("desktop", |candidate| self.find(candidate).is_some());
        let name = name
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Desktop {}", self.desktops.len() + 1));
        self.desktops.push(VirtualDesktop {
            id: id.clone(),
            name,
            window_ids: Vec::new(),
            created_at: platform_host::iso8601_now(),
        });
        self.persist_desktops();
        id
    }

    /// Deletes a desktop. Refuses to delete the last one or an unknown id.
    pub fn delete(&mut self, desktop_id: &str) -> bool {
        if self.desktops.len() <= 1 {
            return false;
        }
        let Some(index) = self.desktops.iter().position(|d| d.id == desktop_id) else {
            return false;
        };

        self.desktops.remove(index);
        self.persist_desktops();
        if self.active_id == desktop_id {
            if let Some(first) = self.desktops.first() {
                self.active_id = first.id.clone();
                self.persist_active();
            }
        }
        true
    }

    /// Activates `desktop_id`. Returns `false` without changes when it does not exist.
    pub fn switch(&mut self, desktop_id: &str) -> bool {
        if self.find(desktop_id).is_none() {
            return false;
        }
        self.active_id = desktop_id.to_string();
        self.persist_active();
        true
    }

    pub fn rename(&mut self, desktop_id: &str, new_name: &str) {
        let Some(desktop) = self.desktops.iter_mut().find(|d| d.id == desktop_id) else {
            return;
        };
        desktop.name = new_name.to_string();
        self.persist_desktops();
    }

    /// Removes `window_id` from every desktop, then appends it to `target_id` if that exists.
    pub fn move_window_to_desktop(&mut self, window_id: &str, target_id: &str) {
        for desktop in &mut self.desktops {
            desktop.window_ids.retain(|id| id != window_id);
            if desktop.id == target_id {
                desktop.window_ids.push(window_id.to_string());
            }
        }
        self.persist_desktops();
    }

    /// Assigns `window_id` to `desktop_id` (the active desktop when `None`).
    ///
    /// Repeated calls never duplicate the entry. A window already listed on another desktop is
    /// moved, keeping single-desktop membership. Unknown desktops are ignored.
    pub fn add_window_to_desktop(&mut self, window_id: &str, desktop_id: Option<&str>) {
        let target_id = desktop_id.unwrap_or(self.active_id.as_str()).to_string();
        let Some(target) = self.find(&target_id) else {
            return;
        };
        if target.contains(window_id) {
            return;
        }
        self.move_window_to_desktop(window_id, &target_id);
    }

    /// Removes `window_id` from whichever desktop lists it, leaving it visible everywhere.
    pub fn remove_window_from_desktop(&mut self, window_id: &str) {
        if !self.desktops.iter().any(|d| d.contains(window_id)) {
            return;
        }
        for desktop in &mut self.desktops {
            desktop.window_ids.retain(|id| id != window_id);
        }
        self.persist_desktops();
    }

    /// Desktop that lists `window_id`, if any.
    pub fn window_desktop(&self, window_id: &str) -> Option<&VirtualDesktop> {
        self.desktops.iter().find(|d| d.contains(window_id))
    }

    /// Whether `window_id` should render while the active desktop is shown.
    ///
    /// True when the active desktop lists the window, and also when no desktop lists it at all:
    /// unassigned windows are visible on every desktop.
    pub fn is_visible_on_active(&self, window_id: &str) -> bool {
        let on_active = self.active().is_some_and(|d| d.contains(window_id));
        on_active || self.window_desktop(window_id).is_none()
    }

    /// Switches to the desktop after the active one, wrapping to the first.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Switches to the desktop before the active one, wrapping to the last.
    pub fn previous(&mut self) {
        self.step(self.desktops.len().saturating_sub(1));
    }

    fn step(&mut self, forward: usize) {
        let count = self.desktops.len();
        if count == 0 {
            return;
        }
        let current = self
            .desktops
            .iter()
            .position(|d| d.id == self.active_id)
            .unwrap_or(0);
        let target = (current + forward) % count;
        if let Some(desktop) = self.desktops.get(target) {
            self.active_id = desktop.id.clone();
            self.persist_active();
        }
    }

    fn persist_desktops(&self) {
        warn_on_failure(
            "virtual desktops",
            write_json(&*self.store, &self.desktops_key, &self.desktops),
        );
    }

    fn persist_active(&self) {
        warn_on_failure(
            "active desktop",
            write_raw(&*self.store, &self.active_key, &self.active_id),
        );
    }
}
