//! Shared prompt catalog with explicit change notification.
//!
//! Readers hold a [`CatalogSubscription`]; dropping it unsubscribes. Every
//! mutation publishes a new snapshot, so subscribers see a catalog change as
//! a new `Arc` rather than in-place edits.

use std::sync::Arc;

use tokio::sync::watch;

use super::Prompt;
use crate::error::{Error, Result};

pub type Snapshot = Arc<Vec<Prompt>>;

pub struct CatalogStore {
    tx: watch::Sender<Snapshot>,
}

impl CatalogStore {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        let (tx, _) = watch::channel(Arc::new(prompts));
        Self { tx }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Start observing the catalog. The current value counts as seen.
    pub fn subscribe(&self) -> CatalogSubscription {
        CatalogSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Swap in a whole new catalog (config reload)
    pub fn replace(&self, prompts: Vec<Prompt>) {
        tracing::debug!("Catalog replaced with {} prompts", prompts.len());
        self.tx.send_replace(Arc::new(prompts));
    }

    pub fn add(&self, prompt: Prompt) -> Result<()> {
        if prompt.name.trim().is_empty() {
            return Err(Error::EmptyName);
        }
        let current = self.snapshot();
        if current.iter().any(|p| p.id == prompt.id) {
            return Err(Error::DuplicateId(prompt.id));
        }

        tracing::info!("Adding prompt '{}' ({})", prompt.name, prompt.id);
        let mut next = current.as_ref().clone();
        next.push(prompt);
        self.tx.send_replace(Arc::new(next));
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<Prompt> {
        let current = self.snapshot();
        let idx = current
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::UnknownPrompt(id.to_string()))?;

        let mut next = current.as_ref().clone();
        let removed = next.remove(idx);
        tracing::info!("Removed prompt '{}' ({})", removed.name, removed.id);
        self.tx.send_replace(Arc::new(next));
        Ok(removed)
    }

    /// Look a prompt up by id, falling back to a case-insensitive name match
    pub fn get(&self, key: &str) -> Option<Prompt> {
        let current = self.snapshot();
        current
            .iter()
            .find(|p| p.id == key)
            .or_else(|| current.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
            .cloned()
    }
}

/// A live view of the catalog
pub struct CatalogSubscription {
    rx: watch::Receiver<Snapshot>,
}

impl CatalogSubscription {
    /// Latest published catalog
    pub fn snapshot(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Whether the catalog changed since the last call; marks it seen.
    pub fn changed(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.rx.borrow_and_update();
                true
            }
            // Store dropped: nothing will change again
            Ok(false) | Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CatalogStore {
        CatalogStore::new(vec![
            Prompt::new("a", "Alpha", "alpha template"),
            Prompt::new("b", "Beta", "beta template"),
        ])
    }

    #[test]
    fn test_subscription_sees_changes_once() {
        let store = store();
        let mut sub = store.subscribe();
        assert!(!sub.changed());

        store.add(Prompt::new("c", "Gamma", "gamma")).unwrap();
        assert!(sub.changed());
        assert!(!sub.changed());
        assert_eq!(sub.snapshot().len(), 3);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = store();
        let sub = store.subscribe();
        let other = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);
        drop(sub);
        assert_eq!(store.subscriber_count(), 1);
        drop(other);
        assert_eq!(store.subscriber_count(), 0);

        // Mutations still land with nobody listening
        store.replace(vec![]);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_add_rejects_duplicates_and_empty_names() {
        let store = store();
        assert!(matches!(
            store.add(Prompt::new("a", "Again", "x")),
            Err(Error::DuplicateId(id)) if id == "a"
        ));
        assert!(matches!(store.add(Prompt::new("z", "   ", "x")), Err(Error::EmptyName)));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_remove_and_get() {
        let store = store();
        assert_eq!(store.get("beta").map(|p| p.id), Some("b".to_string()));
        assert_eq!(store.get("a").map(|p| p.name), Some("Alpha".to_string()));

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.name, "Alpha");
        assert!(store.get("a").is_none());
        assert!(matches!(store.remove("a"), Err(Error::UnknownPrompt(_))));
    }

    #[test]
    fn test_snapshot_is_stable_across_mutation() {
        let store = store();
        let before = store.snapshot();
        store.replace(vec![Prompt::new("x", "Only", "only")]);
        assert_eq!(before.len(), 2);
        assert_eq!(store.snapshot().len(), 1);
    }
}
