//! Live chart instances keyed by `"{dashboard_id}-{chart_id}"`

use indexmap::IndexMap;

use crate::state::ChartKey;

/// A live chart that owns resources which must be released explicitly
pub trait ChartHandle {
    fn destroy(&mut self);
}

impl<T: ChartHandle + ?Sized> ChartHandle for Box<T> {
    fn destroy(&mut self) {
        (**self).destroy()
    }
}

/// Holds at most one live handle per key.
///
/// Replacing or removing an entry always destroys the previous handle first.
pub struct ChartInstanceRegistry<H: ChartHandle> {
    handles: IndexMap<String, H>,
}

impl<H: ChartHandle> Default for ChartInstanceRegistry<H> {
    fn default() -> Self {
        Self { handles: IndexMap::new() }
    }
}

impl<H: ChartHandle> ChartInstanceRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, destroying whatever was registered under the same key
    pub fn register(&mut self, key: &ChartKey, handle: H) {
        if let Some(mut previous) = self.handles.insert(key.to_string(), handle) {
            tracing::debug!("Replacing live chart {}", key);
            previous.destroy();
        }
    }

    /// Destroy and remove a single handle
    pub fn destroy(&mut self, key: &ChartKey) -> bool {
        match self.handles.shift_remove(&key.to_string()) {
            Some(mut handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    /// Destroy every handle belonging to a dashboard, returning how many were removed
    pub fn destroy_dashboard(&mut self, dashboard_id: &str) -> usize {
        let prefix = ChartKey::dashboard_prefix(dashboard_id);
        let stale: Vec<String> = self
            .handles
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();

        for key in &stale {
            if let Some(mut handle) = self.handles.shift_remove(key) {
                handle.destroy();
            }
        }

        if !stale.is_empty() {
            tracing::debug!("Destroyed {} chart(s) of dashboard {}", stale.len(), dashboard_id);
        }
        stale.len()
    }

    /// Destroy everything
    pub fn clear(&mut self) {
        for (_, mut handle) in self.handles.drain(..) {
            handle.destroy();
        }
    }

    pub fn get(&self, key: &ChartKey) -> Option<&H> {
        self.handles.get(&key.to_string())
    }

    pub fn get_mut(&mut self, key: &ChartKey) -> Option<&mut H> {
        self.handles.get_mut(&key.to_string())
    }

    pub fn contains(&self, key: &ChartKey) -> bool {
        self.handles.contains_key(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.handles.iter().map(|(k, h)| (k.as_str(), h))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut H)> {
        self.handles.iter_mut().map(|(k, h)| (k.as_str(), h))
    }
}

impl<H: ChartHandle> Drop for ChartInstanceRegistry<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ChartHandle for Tracked {
        fn destroy(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn tracked(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Tracked {
        Tracked { name, log: log.clone() }
    }

    #[test]
    fn test_register_replaces_and_destroys() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartInstanceRegistry::new();
        let key = ChartKey::new("d1", "c1");

        registry.register(&key, tracked("first", &log));
        registry.register(&key, tracked("second", &log));
        registry.register(&key, tracked("third", &log));

        assert_eq!(registry.len(), 1);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(registry.get(&key).map(|p| p.name), Some("third"));
    }

    #[test]
    fn test_destroy_dashboard_matches_prefix_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartInstanceRegistry::new();
        registry.register(&ChartKey::new("sys", "a"), tracked("sys-a", &log));
        registry.register(&ChartKey::new("sys", "b"), tracked("sys-b", &log));
        registry.register(&ChartKey::new("system", "a"), tracked("system-a", &log));

        assert_eq!(registry.destroy_dashboard("sys"), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&ChartKey::new("system", "a")));
        assert_eq!(*log.borrow(), vec!["sys-a", "sys-b"]);
        assert_eq!(registry.destroy_dashboard("sys"), 0);
    }

    #[test]
    fn test_drop_destroys_remaining() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut registry: ChartInstanceRegistry<Box<dyn ChartHandle>> = ChartInstanceRegistry::new();
            registry.register(&ChartKey::new("d", "x"), Box::new(tracked("x", &log)));
            assert!(registry.destroy(&ChartKey::new("d", "x")));
            registry.register(&ChartKey::new("d", "y"), Box::new(tracked("y", &log)));
        }
        assert_eq!(*log.borrow(), vec!["x", "y"]);
    }
}
