//! Child bookkeeping for a single parent.
//!
//! [`ChildSet`] stores child ids with their optional names, a
//! case-insensitive name index, and a cached flat list of child ids. It is
//! pure data: it never reaches into the world. The two-sided parent/child
//! protocol is driven by the hierarchy operations on
//! [`World`](crate::World).

use std::cell::OnceCell;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use engine_component::Entity;
use tracing::error;

/// Normalise a child name for the by-name index.
fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// The children of one entity.
///
/// Both maps are allocated on first insert and released when the last child
/// is removed. The id snapshot is rebuilt lazily on the first read after
/// any insert or removal.
#[derive(Debug, Default)]
pub struct ChildSet {
    /// Child id → name given at insertion.
    children: Option<BTreeMap<Entity, Option<String>>>,
    /// Lower-cased name → child id. Mirrors the named entries of `children`.
    by_name: Option<HashMap<String, Entity>>,
    /// Cached key set of `children`, in ascending id order.
    snapshot: OnceCell<Vec<Entity>>,
}

impl ChildSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `child`, optionally under `name`.
    ///
    /// Returns `false` (and changes nothing) if `child` is already present.
    /// An empty name counts as no name.
    ///
    /// # Panics
    ///
    /// In debug builds, if a sibling already uses `name` (compared
    /// case-insensitively). Release builds log the conflict and store the
    /// child unnamed.
    pub fn insert(&mut self, child: Entity, name: Option<&str>) -> bool {
        let children = self.children.get_or_insert_with(BTreeMap::new);
        if children.contains_key(&child) {
            return false;
        }

        let mut name = name.filter(|name| !name.is_empty());
        if let Some(given) = name {
            match self.by_name.get_or_insert_with(HashMap::new).entry(name_key(given)) {
                Entry::Vacant(slot) => {
                    slot.insert(child);
                }
                Entry::Occupied(taken) => {
                    let existing = *taken.get();
                    if cfg!(debug_assertions) {
                        panic!("sibling name `{given}` is already used by {existing}");
                    }
                    error!(%child, %existing, name = given, "duplicate sibling name, child stored unnamed");
                    name = None;
                }
            }
        }

        children.insert(child, name.map(str::to_owned));
        self.snapshot.take();
        true
    }

    /// Remove `child`.
    ///
    /// Returns the name it was stored under (`Some(None)` for an unnamed
    /// child), or `None` if it was not present.
    pub fn remove(&mut self, child: Entity) -> Option<Option<String>> {
        let children = self.children.as_mut()?;
        let name = children.remove(&child)?;
        if children.is_empty() {
            self.children = None;
        }

        if let Some(name) = &name {
            let key = name_key(name);
            if let Some(by_name) = self.by_name.as_mut() {
                if by_name.get(&key) == Some(&child) {
                    by_name.remove(&key);
                }
                if by_name.is_empty() {
                    self.by_name = None;
                }
            }
        }

        self.snapshot.take();
        Some(name)
    }

    /// Remove every child. Returns the removed ids.
    pub fn clear(&mut self) -> Vec<Entity> {
        let removed = self
            .children
            .take()
            .map(|children| children.into_keys().collect())
            .unwrap_or_default();
        self.by_name = None;
        self.snapshot.take();
        removed
    }

    /// Returns `true` if `child` is present.
    #[must_use]
    pub fn contains(&self, child: Entity) -> bool {
        self.children
            .as_ref()
            .is_some_and(|children| children.contains_key(&child))
    }

    /// Resolve a child name, case-insensitively.
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<Entity> {
        self.by_name.as_ref()?.get(&name_key(name)).copied()
    }

    /// The name `child` was inserted under, as given.
    #[must_use]
    pub fn name_of(&self, child: Entity) -> Option<&str> {
        self.children.as_ref()?.get(&child)?.as_deref()
    }

    /// All child ids, in ascending order.
    ///
    /// Served from the cache; rebuilt only after a mutation.
    #[must_use]
    pub fn ids(&self) -> &[Entity] {
        self.snapshot.get_or_init(|| {
            self.children
                .as_ref()
                .map(|children| children.keys().copied().collect())
                .unwrap_or_default()
        })
    }

    /// Returns `true` if the id snapshot is currently cached.
    #[must_use]
    pub fn is_snapshot_cached(&self) -> bool {
        self.snapshot.get().is_some()
    }

    /// Returns `true` if either backing map is allocated.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.children.is_some() || self.by_name.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.as_ref().map_or(0, BTreeMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


#[cfg(test)]
mod proptests {
    use std::collections::BTreeSet;

    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64, bool),
        Remove(u64),
        Read,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u64..16, any::<bool>()).prop_map(|(id, named)| Op::Add(id, named)),
            (1u64..16).prop_map(Op::Remove),
            Just(Op::Read),
        ]
    }

    proptest! {
        #[test]
        fn snapshot_always_matches_children(ops in prop::collection::vec(op(), 0..64)) {
            let mut set = ChildSet::new();
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    // Names derive from ids so siblings never collide.
                    Op::Add(id, named) => {
                        let name = format!("child-{id}");
                        set.insert(Entity::from_raw(id), named.then_some(name.as_str()));
                        model.insert(id);
                    }
                    Op::Remove(id) => {
                        set.remove(Entity::from_raw(id));
                        model.remove(&id);
                    }
                    Op::Read => {}
                }
                let ids: Vec<u64> = set.ids().iter().map(|e| e.id()).collect();
                let expected: Vec<u64> = model.iter().copied().collect();
                prop_assert_eq!(ids, expected);
            }

            prop_assert_eq!(set.is_allocated(), !model.is_empty());
        }

        #[test]
        fn name_index_mirrors_children(ids in prop::collection::btree_set(1u64..32, 0..16), drop in prop::collection::vec(1u64..32, 0..16)) {
            let mut set = ChildSet::new();
            for &id in &ids {
                set.insert(Entity::from_raw(id), Some(format!("Node{id}").as_str()));
            }
            for id in drop {
                set.remove(Entity::from_raw(id));
            }
            for &child in set.ids() {
                let name = set.name_of(child).map(str::to_owned);
                prop_assert!(name.is_some());
                let name = name.unwrap_or_default();
                prop_assert_eq!(set.id_by_name(&name.to_uppercase()), Some(child));
            }
        }
    }
}
