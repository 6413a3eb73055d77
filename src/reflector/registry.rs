//! Definition Registry and Cycle Detector
//!
//! Definitions live in an insertion-ordered arena of slots keyed by type
//! identity. A slot is allocated when a named type starts expanding, so a
//! recursive occurrence can already refer to it, and is finalized once the
//! expansion unwinds. The active set holds the identities on the current
//! recursion path.

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

use crate::schema::Schema;
use crate::types::TypeKey;

/// A definition slot
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub name: String,
    /// Completed schema, `None` while the type is still expanding
    pub schema: Option<Schema>,
    /// A cycle placeholder points at this slot, so it must be registered
    pub referenced: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    slots: IndexMap<TypeKey, Slot>,
    names: HashMap<String, TypeKey>,
    active: HashSet<TypeKey>,
    anonymous_counter: usize,
}

impl Registry {
    /// Name of a completed definition
    pub fn completed(&self, key: TypeKey) -> Option<&str> {
        self.slots
            .get(&key)
            .filter(|slot| slot.schema.is_some())
            .map(|slot| slot.name.as_str())
    }

    pub fn slot(&self, key: TypeKey) -> Option<&Slot> {
        self.slots.get(&key)
    }

    pub fn is_active(&self, key: TypeKey) -> bool {
        self.active.contains(&key)
    }

    pub fn enter(&mut self, key: TypeKey) {
        self.active.insert(key);
    }

    pub fn leave(&mut self, key: TypeKey) {
        self.active.remove(&key);
    }

    /// Allocate a slot under a unique name derived from `base`.
    ///
    /// An existing slot for the same identity is reused.
    pub fn allocate(&mut self, key: TypeKey, base: &str) -> &str {
        if !self.slots.contains_key(&key) {
            let name = self.unique_name(key, base);
            self.names.insert(name.clone(), key);
            trace!(name = %name, "allocated definition slot");
            self.slots.insert(
                key,
                Slot {
                    name,
                    schema: None,
                    referenced: false,
                },
            );
        }
        self.slots[&key].name.as_str()
    }

    /// Next `Anonymous{n}` name for a type that must be registered without a name
    pub fn next_anonymous_name(&mut self) -> String {
        self.anonymous_counter += 1;
        format!("Anonymous{}", self.anonymous_counter)
    }

    /// Flag a slot as the target of a cycle placeholder
    pub fn mark_referenced(&mut self, key: TypeKey) {
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.referenced = true;
        }
    }

    pub fn is_referenced(&self, key: TypeKey) -> bool {
        self.slots.get(&key).is_some_and(|slot| slot.referenced)
    }

    /// Store the completed schema
    pub fn finalize(&mut self, key: TypeKey, schema: Schema) {
        if let Some(slot) = self.slots.get_mut(&key) {
            debug!(name = %slot.name, "registered definition");
            slot.schema = Some(schema);
        }
    }

    /// Drop an unfinished slot whose type ended up inlined or failed
    pub fn release(&mut self, key: TypeKey) {
        if let Some(slot) = self.slots.get(&key) {
            if slot.schema.is_some() {
                return;
            }
        }
        if let Some(slot) = self.slots.shift_remove(&key) {
            self.names.remove(&slot.name);
            trace!(name = %slot.name, "released definition slot");
        }
    }

    /// Position to roll back to if the expansion started now fails
    pub fn mark(&self) -> usize {
        self.slots.len()
    }

    /// Drop every slot allocated since `mark`, finished or not.
    ///
    /// A failed expansion must not leave behind definitions that point into it.
    pub fn rollback(&mut self, mark: usize) {
        if mark >= self.slots.len() {
            return;
        }
        for (_, slot) in self.slots.drain(mark..) {
            self.names.remove(&slot.name);
            trace!(name = %slot.name, "rolled back definition slot");
        }
    }

    /// Completed schema behind a definition name
    pub fn schema_by_name(&self, name: &str) -> Option<&Schema> {
        let key = self.names.get(name)?;
        self.slots.get(key)?.schema.as_ref()
    }

    /// Completed definitions ordered by name
    pub fn into_definitions(self) -> BTreeMap<String, Schema> {
        self.slots
            .into_values()
            .filter_map(|slot| slot.schema.map(|schema| (slot.name, schema)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.values().filter(|s| s.schema.is_some()).count()
    }

    fn unique_name(&self, key: TypeKey, base: &str) -> String {
        let is_free = |name: &str| self.names.get(name).map_or(true, |owner| *owner == key);
        if is_free(base) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{}{}", base, counter);
            if is_free(&candidate) {
                debug!(base = %base, name = %candidate, "definition name conflict resolved");
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SimpleType;

    struct First;
    struct Second;
    struct Third;

    #[test]
    fn test_name_conflicts_get_suffixes() {
        let mut registry = Registry::default();
        assert_eq!(registry.allocate(TypeKey::of::<First>(), "User"), "User");
        assert_eq!(registry.allocate(TypeKey::of::<Second>(), "User"), "User2");
        assert_eq!(registry.allocate(TypeKey::of::<Third>(), "User"), "User3");
        // same identity keeps its slot
        assert_eq!(registry.allocate(TypeKey::of::<First>(), "Other"), "User");
    }

    #[test]
    fn test_finalize_and_release() {
        let mut registry = Registry::default();
        let first = TypeKey::of::<First>();
        let second = TypeKey::of::<Second>();

        registry.allocate(first, "First");
        registry.allocate(second, "Second");
        assert_eq!(registry.completed(first), None);

        registry.finalize(first, Schema::with_type(SimpleType::Object));
        registry.release(second);
        // finalized slots survive release
        registry.release(first);

        assert_eq!(registry.completed(first), Some("First"));
        assert!(registry.slot(second).is_none());
        assert!(registry.schema_by_name("First").is_some());

        let definitions = registry.into_definitions();
        assert_eq!(definitions.keys().collect::<Vec<_>>(), vec!["First"]);
    }

    #[test]
    fn test_released_name_is_reusable() {
        let mut registry = Registry::default();
        registry.allocate(TypeKey::of::<First>(), "Shared");
        registry.release(TypeKey::of::<First>());
        assert_eq!(registry.allocate(TypeKey::of::<Second>(), "Shared"), "Shared");
    }

    #[test]
    fn test_rollback_drops_finalized_descendants() {
        let mut registry = Registry::default();
        let first = TypeKey::of::<First>();
        let second = TypeKey::of::<Second>();
        let third = TypeKey::of::<Third>();

        registry.allocate(first, "First");
        registry.finalize(first, Schema::with_type(SimpleType::Object));

        let mark = registry.mark();
        registry.allocate(second, "Second");
        registry.allocate(third, "Third");
        registry.finalize(third, Schema::with_type(SimpleType::Object));
        registry.rollback(mark);

        assert_eq!(registry.completed(first), Some("First"));
        assert!(registry.slot(second).is_none());
        assert!(registry.slot(third).is_none());
        assert!(registry.schema_by_name("Third").is_none());
        // nothing allocated since the mark
        let mark = registry.mark();
        registry.rollback(mark);
        assert_eq!(registry.allocate(TypeKey::of::<Second>(), "Third"), "Third");
    }

    #[test]
    fn test_active_set_and_anonymous_counter() {
        let mut registry = Registry::default();
        let key = TypeKey::of::<First>();
        registry.enter(key);
        assert!(registry.is_active(key));
        registry.leave(key);
        assert!(!registry.is_active(key));

        assert_eq!(registry.next_anonymous_name(), "Anonymous1");
        assert_eq!(registry.next_anonymous_name(), "Anonymous2");
    }
}
