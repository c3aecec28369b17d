//! In-memory backend.
//!
//! Keeps variables in insertion order. Useful for embedding defaults and for
//! tests that need several layers without touching the filesystem.

use std::ops::ControlFlow;

use indexmap::IndexMap;

use super::{Backend, Visitor};
use crate::error::ConfigError;

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: IndexMap<String, Option<String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with `entries`.
    pub fn with_entries(
        entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    /// Record `name` as present without a value.
    pub fn insert_valueless(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), None);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Backend for MemoryBackend {
    fn open(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        self.entries
            .get(name)
            .map(Option::as_deref)
            .ok_or_else(|| ConfigError::not_found(name))
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.entries.insert(name.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn foreach(&self, visitor: &mut Visitor<'_>) -> ControlFlow<()> {
        for (name, value) in &self.entries {
            visitor(name, value.as_deref())?;
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_present_and_absent() {
        let backend = MemoryBackend::with_entries([("core.editor", "vim")]);
        assert_eq!(backend.get("core.editor").unwrap(), Some("vim"));
        assert!(matches!(
            backend.get("core.pager"),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn valueless_key_reads_as_none() {
        let mut backend = MemoryBackend::new();
        backend.insert_valueless("core.bare");
        assert_eq!(backend.get("core.bare").unwrap(), None);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut backend = MemoryBackend::with_entries([("a.x", "1"), ("a.y", "2")]);
        backend.set("a.x", "3").unwrap();
        assert_eq!(backend.get("a.x").unwrap(), Some("3"));
        assert_eq!(backend.len(), 2);
    }

    #[test]
    fn foreach_visits_in_insertion_order() {
        let backend = MemoryBackend::with_entries([("b.k", "1"), ("a.k", "2"), ("c.k", "3")]);
        let mut seen = Vec::new();
        let flow = backend.foreach(&mut |name, _| {
            seen.push(name.to_string());
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, vec!["b.k", "a.k", "c.k"]);
    }

    #[test]
    fn foreach_stops_on_break() {
        let backend = MemoryBackend::with_entries([("a.k", "1"), ("b.k", "2"), ("c.k", "3")]);
        let mut count = 0;
        let flow = backend.foreach(&mut |_, _| {
            count += 1;
            if count == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 2);
    }
}
