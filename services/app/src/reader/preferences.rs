//! services/app/src/reader/preferences.rs
//!
//! Reading preferences with write-through persistence. Values are loaded once
//! when the reader opens, defaulted when absent or malformed, and written back
//! to the local store on every change.

use novelink_core::domain::ReadingPreferences;
use novelink_core::ports::KeyValueStore;
use std::sync::Arc;
use uuid::Uuid;

pub const FONT_SIZE_MIN: u32 = 16;
pub const FONT_SIZE_MAX: u32 = 28;
pub const FONT_SIZE_DEFAULT: u32 = 18;
pub const FONT_SIZE_STEP: u32 = 2;

const DARK_MODE_KEY: &str = "darkMode";
const FONT_SIZE_KEY: &str = "novel_fontSize";

fn page_key(novel_id: Uuid) -> String {
    format!("novel_page_{}", novel_id)
}

/// Loaded preferences bound to one novel and one backing store.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    page_key: String,
    prefs: ReadingPreferences,
}

impl PreferenceStore {
    /// Reads the stored preferences, falling back to defaults: font size 18,
    /// dark mode from the system preference, page index 0.
    pub fn load(store: Arc<dyn KeyValueStore>, novel_id: Uuid, system_prefers_dark: bool) -> Self {
        let dark_mode = match store.get(DARK_MODE_KEY).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => system_prefers_dark,
        };

        let font_size = store
            .get(FONT_SIZE_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| (FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(v))
            .unwrap_or(FONT_SIZE_DEFAULT);

        let page_key = page_key(novel_id);
        let page_index = store
            .get(&page_key)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        Self {
            store,
            page_key,
            prefs: ReadingPreferences {
                font_size,
                dark_mode,
                page_index,
            },
        }
    }

    pub fn font_size(&self) -> u32 {
        self.prefs.font_size
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode
    }

    pub fn page_index(&self) -> usize {
        self.prefs.page_index
    }

    /// Pulls a stored page index back into range after pagination. A stale
    /// index past the end lands on the last page; zero pages pins it to 0.
    pub fn clamp_page_index(&mut self, page_count: usize) {
        let max = page_count.saturating_sub(1);
        if self.prefs.page_index > max {
            self.set_page_index(max);
        }
    }

    pub fn set_page_index(&mut self, index: usize) {
        self.prefs.page_index = index;
        self.store.set(&self.page_key, &index.to_string());
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.prefs.dark_mode = dark;
        self.store.set(DARK_MODE_KEY, &dark.to_string());
    }

    pub fn toggle_dark_mode(&mut self) {
        self.set_dark_mode(!self.prefs.dark_mode);
    }

    fn set_font_size(&mut self, size: u32) {
        self.prefs.font_size = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        self.store.set(FONT_SIZE_KEY, &self.prefs.font_size.to_string());
    }

    pub fn increase_font_size(&mut self) {
        self.set_font_size(self.prefs.font_size.saturating_add(FONT_SIZE_STEP));
    }

    pub fn decrease_font_size(&mut self) {
        self.set_font_size(self.prefs.font_size.saturating_sub(FONT_SIZE_STEP));
    }

    /// The toolbar shortcut: step up by two, wrapping back to the minimum
    /// once the maximum is reached.
    pub fn cycle_font_size(&mut self) {
        if self.prefs.font_size >= FONT_SIZE_MAX {
            self.set_font_size(FONT_SIZE_MIN);
        } else {
            self.set_font_size(self.prefs.font_size + FONT_SIZE_STEP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn defaults_apply_when_storage_is_empty() {
        let prefs = PreferenceStore::load(store(), Uuid::new_v4(), false);
        assert_eq!(prefs.font_size(), 18);
        assert!(!prefs.dark_mode());
        assert_eq!(prefs.page_index(), 0);
    }

    #[test]
    fn dark_mode_unset_falls_back_to_system_preference() {
        let prefs = PreferenceStore::load(store(), Uuid::new_v4(), true);
        assert!(prefs.dark_mode());
    }

    #[test]
    fn stored_dark_mode_wins_over_system_preference() {
        let s = store();
        s.set("darkMode", "false");
        let prefs = PreferenceStore::load(s, Uuid::new_v4(), true);
        assert!(!prefs.dark_mode());
    }

    #[test]
    fn font_size_round_trips_for_every_legal_value() {
        let s = store();
        for size in (FONT_SIZE_MIN..=FONT_SIZE_MAX).step_by(2) {
            s.set("novel_fontSize", &size.to_string());
            let prefs = PreferenceStore::load(s.clone(), Uuid::new_v4(), false);
            assert_eq!(prefs.font_size(), size);
        }
    }

    #[test]
    fn corrupt_values_fall_back_to_defaults() {
        let s = store();
        s.set("darkMode", "maybe");
        s.set("novel_fontSize", "huge");
        let id = Uuid::new_v4();
        s.set(&format!("novel_page_{}", id), "-3");

        let prefs = PreferenceStore::load(s, id, false);
        assert!(!prefs.dark_mode());
        assert_eq!(prefs.font_size(), 18);
        assert_eq!(prefs.page_index(), 0);
    }

    #[test]
    fn out_of_range_stored_font_size_is_defaulted() {
        let s = store();
        s.set("novel_fontSize", "64");
        let prefs = PreferenceStore::load(s, Uuid::new_v4(), false);
        assert_eq!(prefs.font_size(), 18);
    }

    #[test]
    fn page_index_is_namespaced_per_novel() {
        let s = store();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut prefs = PreferenceStore::load(s.clone(), first, false);
        prefs.set_page_index(4);

        let other = PreferenceStore::load(s.clone(), second, false);
        assert_eq!(other.page_index(), 0);

        let reloaded = PreferenceStore::load(s, first, false);
        assert_eq!(reloaded.page_index(), 4);
    }

    #[test]
    fn every_change_is_written_through_immediately() {
        let s = store();
        let id = Uuid::new_v4();
        let mut prefs = PreferenceStore::load(s.clone(), id, false);

        prefs.toggle_dark_mode();
        assert_eq!(s.get("darkMode").as_deref(), Some("true"));

        prefs.increase_font_size();
        assert_eq!(s.get("novel_fontSize").as_deref(), Some("20"));

        prefs.set_page_index(2);
        assert_eq!(s.get(&format!("novel_page_{}", id)).as_deref(), Some("2"));
    }

    #[test]
    fn font_size_stepping_clamps_at_both_ends() {
        let mut prefs = PreferenceStore::load(store(), Uuid::new_v4(), false);
        for _ in 0..10 {
            prefs.increase_font_size();
        }
        assert_eq!(prefs.font_size(), FONT_SIZE_MAX);
        for _ in 0..10 {
            prefs.decrease_font_size();
        }
        assert_eq!(prefs.font_size(), FONT_SIZE_MIN);
    }

    #[test]
    fn cycle_wraps_from_max_to_min() {
        let s = store();
        s.set("novel_fontSize", "28");
        let mut prefs = PreferenceStore::load(s, Uuid::new_v4(), false);
        prefs.cycle_font_size();
        assert_eq!(prefs.font_size(), FONT_SIZE_MIN);
    }

    #[test]
    fn stale_page_index_clamps_to_last_page() {
        let s = store();
        let id = Uuid::new_v4();
        s.set(&format!("novel_page_{}", id), "12");
        let mut prefs = PreferenceStore::load(s, id, false);
        prefs.clamp_page_index(3);
        assert_eq!(prefs.page_index(), 2);
    }
}
