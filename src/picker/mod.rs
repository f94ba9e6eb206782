//! Slash-command prompt picker.
//!
//! The picker owns a filtered view of the catalog, the search query and the
//! dropdown's visibility and placement. It never owns the message buffer:
//! selecting an entry hands back an [`Insertion`] for the buffer's owner to
//! apply.
//!
//! ```text
//! Closed --open--> Open(query = "", view = catalog)
//! Open --type--> Open(query = q, view = filter(catalog, q))
//! Open --select--> Closed  (+ Insertion)
//! Open --Esc / click outside--> Closed
//! ```

pub mod dismiss;

use crate::prompt::{filter_prompts, CatalogSubscription, Insertion, Prompt};
use dismiss::{DismissGuard, DismissRegistry};

/// Where the dropdown renders relative to its trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    Above,
    #[default]
    Below,
}

impl Placement {
    /// Measured once at open: a trigger in the lower half of the viewport
    /// opens upward. Later resizes do not re-measure.
    pub fn measure(top: u16, viewport_height: u16) -> Self {
        if u32::from(top) * 2 > u32::from(viewport_height) {
            Placement::Above
        } else {
            Placement::Below
        }
    }
}

pub struct PromptPicker {
    catalog: CatalogSubscription,
    dismiss: DismissRegistry,
    /// Held exactly while the dropdown is open
    listener: Option<DismissGuard>,
    query: String,
    filtered: Vec<Prompt>,
    selected: usize,
    scroll: usize,
    placement: Placement,
    max_visible: usize,
}

impl PromptPicker {
    pub fn new(catalog: CatalogSubscription, dismiss: DismissRegistry, max_visible: usize) -> Self {
        let filtered = catalog.snapshot().as_ref().clone();
        Self {
            catalog,
            dismiss,
            listener: None,
            query: String::new(),
            filtered,
            selected: 0,
            scroll: 0,
            placement: Placement::default(),
            max_visible: max_visible.max(1),
        }
    }

    pub fn is_open(&self) -> bool {
        self.listener.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> &[Prompt] {
        &self.filtered
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn highlighted(&self) -> Option<&Prompt> {
        self.filtered.get(self.selected)
    }

    /// Rows of the filtered view currently on screen, as (index, prompt)
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Prompt)> {
        self.filtered
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.max_visible)
    }

    pub fn visible_len(&self) -> usize {
        self.filtered.len().saturating_sub(self.scroll).min(self.max_visible)
    }

    /// Open with an empty query, measuring placement from the trigger's top
    /// row. A no-op when already open.
    pub fn open(&mut self, trigger_top: u16, viewport_height: u16) {
        if self.is_open() {
            return;
        }
        self.catalog.changed();
        self.query.clear();
        self.refilter();
        self.placement = Placement::measure(trigger_top, viewport_height);
        self.listener = Some(self.dismiss.acquire());
        tracing::debug!(
            "Prompt picker opened ({:?}, {} prompts)",
            self.placement,
            self.filtered.len()
        );
    }

    pub fn toggle(&mut self, trigger_top: u16, viewport_height: u16) {
        if self.is_open() {
            self.close();
        } else {
            self.open(trigger_top, viewport_height);
        }
    }

    /// Close without touching the buffer (Esc or a click outside)
    pub fn close(&mut self) {
        if self.listener.take().is_some() {
            tracing::debug!("Prompt picker closed");
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    /// Pick up catalog changes. On change the query resets and the view
    /// shows the full new catalog.
    pub fn sync_catalog(&mut self) -> bool {
        if !self.catalog.changed() {
            return false;
        }
        self.query.clear();
        self.refilter();
        tracing::debug!("Prompt picker reset to {} prompts", self.filtered.len());
        true
    }

    pub fn move_down(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
            self.ensure_visible();
        }
    }

    pub fn move_up(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.filtered.len() - 1);
            self.ensure_visible();
        }
    }

    /// Commit the highlighted entry at `cursor` and close.
    pub fn select(&mut self, cursor: usize) -> Option<Insertion> {
        self.select_index(self.selected, cursor)
    }

    /// Commit the entry at `index` of the filtered view and close.
    pub fn select_index(&mut self, index: usize, cursor: usize) -> Option<Insertion> {
        if !self.is_open() {
            return None;
        }
        let prompt = self.filtered.get(index)?;
        tracing::info!("Inserting prompt '{}' at {}", prompt.name, cursor);
        let insertion = Insertion::new(cursor, prompt.prompt.clone());
        self.close();
        Some(insertion)
    }

    fn refilter(&mut self) {
        let catalog = self.catalog.snapshot();
        self.filtered = filter_prompts(&catalog, &self.query);
        self.selected = 0;
        self.scroll = 0;
    }

    fn ensure_visible(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.max_visible {
            self.scroll = self.selected + 1 - self.max_visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::CatalogStore;

    fn setup() -> (CatalogStore, DismissRegistry, PromptPicker) {
        let store = CatalogStore::new(vec![
            Prompt::new("1", "Alpha", "ALPHA"),
            Prompt::new("2", "Beta", "BETA"),
            Prompt::new("3", "Alba", "ALBA"),
        ]);
        let registry = DismissRegistry::new();
        let picker = PromptPicker::new(store.subscribe(), registry.clone(), 2);
        (store, registry, picker)
    }

    #[test]
    fn test_placement_measure() {
        assert_eq!(Placement::measure(30, 40), Placement::Above);
        assert_eq!(Placement::measure(21, 40), Placement::Above);
        assert_eq!(Placement::measure(20, 40), Placement::Below);
        assert_eq!(Placement::measure(0, 40), Placement::Below);
        // odd heights: 11 > 21 / 2
        assert_eq!(Placement::measure(11, 21), Placement::Above);
        assert_eq!(Placement::measure(10, 21), Placement::Below);
    }

    #[test]
    fn test_open_resets_query_and_holds_listener() {
        let (_store, registry, mut picker) = setup();
        picker.open(35, 40);
        assert!(picker.is_open());
        assert!(registry.is_listening());
        assert_eq!(picker.placement(), Placement::Above);

        picker.set_query("al");
        picker.close();
        assert!(!registry.is_listening());

        picker.open(2, 40);
        assert_eq!(picker.query(), "");
        assert_eq!(picker.filtered().len(), 3);
        assert_eq!(picker.placement(), Placement::Below);
    }

    #[test]
    fn test_open_while_open_keeps_placement() {
        let (_store, _registry, mut picker) = setup();
        picker.open(35, 40);
        picker.set_query("al");
        picker.open(2, 40);
        assert_eq!(picker.placement(), Placement::Above);
        assert_eq!(picker.query(), "al");
    }

    #[test]
    fn test_typing_refilters() {
        let (_store, _registry, mut picker) = setup();
        picker.open(0, 40);
        picker.push_char('a');
        picker.push_char('l');
        let names: Vec<_> = picker.filtered().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alba", "Alpha"]);

        picker.pop_char();
        picker.pop_char();
        assert_eq!(picker.filtered().len(), 3);

        picker.set_query("zzz");
        assert!(picker.filtered().is_empty());
        assert!(picker.select(0).is_none());
        assert!(picker.is_open());
    }

    #[test]
    fn test_select_returns_insertion_and_closes() {
        let (_store, registry, mut picker) = setup();
        picker.open(0, 40);
        picker.move_down();
        let insertion = picker.select(5).unwrap();
        assert_eq!(insertion, Insertion::new(5, "BETA"));
        assert!(!picker.is_open());
        assert!(!registry.is_listening());
        assert_eq!(insertion.apply("hello"), "hello\nBETA");
    }

    #[test]
    fn test_select_when_closed_does_nothing() {
        let (_store, _registry, mut picker) = setup();
        assert!(picker.select(0).is_none());
        assert!(picker.select_index(1, 0).is_none());
    }

    #[test]
    fn test_catalog_change_resets_view() {
        let (store, _registry, mut picker) = setup();
        picker.open(0, 40);
        picker.set_query("beta");
        assert_eq!(picker.filtered().len(), 1);

        store.add(Prompt::new("4", "Gamma", "GAMMA")).unwrap();
        assert!(picker.sync_catalog());
        assert_eq!(picker.query(), "");
        assert_eq!(picker.filtered().len(), 4);
        assert!(!picker.sync_catalog());
    }

    #[test]
    fn test_navigation_wraps_and_scrolls() {
        let (_store, _registry, mut picker) = setup();
        picker.open(0, 40);
        assert_eq!(picker.visible_len(), 2);

        picker.move_down();
        picker.move_down();
        assert_eq!(picker.selected(), 2);
        let rows: Vec<usize> = picker.visible().map(|(i, _)| i).collect();
        assert_eq!(rows, vec![1, 2]);

        picker.move_down();
        assert_eq!(picker.selected(), 0);
        let rows: Vec<usize> = picker.visible().map(|(i, _)| i).collect();
        assert_eq!(rows, vec![0, 1]);

        picker.move_up();
        assert_eq!(picker.highlighted().map(|p| p.name.as_str()), Some("Alba"));
    }

    #[test]
    fn test_drop_releases_listener() {
        let (_store, registry, mut picker) = setup();
        picker.open(0, 40);
        assert!(registry.is_listening());
        drop(picker);
        assert!(!registry.is_listening());
    }
}
