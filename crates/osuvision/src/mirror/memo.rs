//! Memoized view over a mirror property.
//!
//! Mirror properties are re-read on every call. Some values (the selected
//! map's metadata, say) only change when something else changes first; a
//! [`Memo`] keeps the last value until the caller-supplied key differs.

/// Cached value tagged with the key it was computed under
#[derive(Debug, Clone)]
pub struct Memo<K, T> {
    entry: Option<(K, T)>,
}

impl<K, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<K: PartialEq, T> Memo<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value if `key` matches, otherwise recompute it
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> T) -> &T {
        let entry = match self.entry.take() {
            Some((cached, value)) if cached == key => (cached, value),
            _ => (key, compute()),
        };
        &self.entry.insert(entry).1
    }

    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_recomputes_only_on_key_change() {
        let calls = Cell::new(0);
        let mut memo = Memo::new();
        let compute = |v: i32| {
            calls.set(calls.get() + 1);
            v
        };

        assert_eq!(*memo.get_or_compute("menu", || compute(1)), 1);
        assert_eq!(*memo.get_or_compute("menu", || compute(2)), 1);
        assert_eq!(calls.get(), 1);

        assert_eq!(*memo.get_or_compute("play", || compute(3)), 3);
        assert_eq!(calls.get(), 2);
        assert_eq!(memo.key(), Some(&"play"));
    }

    #[test]
    fn test_invalidate() {
        let mut memo: Memo<u8, String> = Memo::new();
        assert!(memo.get().is_none());

        memo.get_or_compute(1, || "a".to_string());
        assert_eq!(memo.get().map(String::as_str), Some("a"));

        memo.invalidate();
        assert!(memo.get().is_none());
        assert_eq!(memo.get_or_compute(1, || "b".to_string()), "b");
    }
}
