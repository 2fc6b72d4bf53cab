//! ChainTable: slot array, node arena and the resize policy.

use crate::chain::{Chain, Node, NodeKey};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::BuildOneAtATime;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use slotmap::SlotMap;

/// Separate-chaining hash table from byte-string keys to borrowed values.
///
/// Keys are copied into the table on insert; values are held as `&'a T`
/// and never dropped or moved by the table. Removing an entry or dropping
/// the table releases the key copy and the node only.
pub struct ChainTable<'a, T: ?Sized, S = BuildOneAtATime> {
    slots: Vec<Chain>,
    nodes: SlotMap<NodeKey, Node<'a, T>>,
    config: TableConfig,
    hasher: S,
}

fn alloc_slots(capacity: usize) -> Result<Vec<Chain>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize(capacity, Chain::default());
    Ok(slots)
}

fn copy_key(key: &[u8]) -> Result<Box<[u8]>, TableError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(key.len())?;
    buf.extend_from_slice(key);
    Ok(buf.into_boxed_slice())
}

impl<'a, T: ?Sized> ChainTable<'a, T> {
    /// Create a table with exactly `initial_capacity` empty slots and the
    /// default resize policy.
    pub fn new(initial_capacity: usize) -> Result<Self, TableError> {
        Self::with_config(initial_capacity, TableConfig::default())
    }

    pub fn with_config(initial_capacity: usize, config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(initial_capacity, config, BuildOneAtATime)
    }
}

impl<'a, T: ?Sized, S: BuildHasher> ChainTable<'a, T, S> {
    /// Create a table with a custom hasher. The initial capacity is used as
    /// given, even below `config.min_size`; the floor only bounds shrinking.
    pub fn with_config_and_hasher(
        initial_capacity: usize,
        config: TableConfig,
        hasher: S,
    ) -> Result<Self, TableError> {
        if initial_capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        config.validate()?;
        Ok(Self {
            slots: alloc_slots(initial_capacity)?,
            nodes: SlotMap::with_key(),
            config,
            hasher,
        })
    }

    fn make_hash(&self, key: &[u8]) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key);
        h.finish()
    }

    fn slot_index(hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }

    fn locate(&self, key: &[u8]) -> (u64, usize, Option<NodeKey>) {
        let hash = self.make_hash(key);
        let idx = Self::slot_index(hash, self.slots.len());
        (hash, idx, self.slots[idx].find(&self.nodes, key))
    }

    /// Number of live entries.
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn get<K>(&self, key: &K) -> Option<&'a T>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let (_, _, found) = self.locate(key.as_ref());
        found.map(|k| self.nodes[k].value)
    }

    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.locate(key.as_ref()).2.is_some()
    }

    /// Map `key` to `value`.
    ///
    /// An existing entry keeps its node and has its value replaced; the old
    /// reference is returned and the length does not change. Otherwise the
    /// key bytes are copied, the entry is appended to its chain and the
    /// resize policy runs. On `Err` the table is unchanged.
    pub fn put<K>(&mut self, key: &K, value: &'a T) -> Result<Option<&'a T>, TableError>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let (hash, idx, found) = self.locate(key);
        if let Some(k) = found {
            tracing::trace!(slot = idx, "put: updating existing entry");
            let node = &mut self.nodes[k];
            return Ok(Some(core::mem::replace(&mut node.value, value)));
        }

        let owned = copy_key(key)?;
        let k = self.nodes.insert(Node::new(owned, value, hash));
        self.slots[idx].append(&mut self.nodes, k);
        tracing::trace!(slot = idx, len = self.len(), "put: inserted entry");
        self.rebalance();
        Ok(None)
    }

    /// Remove the entry for `key`. Returns `false`, leaving the table
    /// untouched, when there is none.
    pub fn remove<K>(&mut self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let (_, idx, found) = self.locate(key.as_ref());
        let Some(k) = found else {
            return false;
        };
        self.slots[idx].splice_out(&mut self.nodes, k);
        self.nodes.remove(k);
        self.rebalance();
        true
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, 'a, T> {
        Iter {
            it: self.nodes.values(),
        }
    }

    fn rebalance(&mut self) {
        let from = self.capacity();
        let Some(to) = self.config.resize_target(self.len(), from) else {
            return;
        };
        if to == from {
            return;
        }
        match self.rebuild(to) {
            Ok(()) => tracing::debug!(from, to, len = self.len(), "rebuilt slot array"),
            Err(err) => tracing::warn!(from, to, %err, "rebuild skipped; keeping current capacity"),
        }
    }

    /// Relink every node into a fresh slot array of `capacity` slots.
    ///
    /// Only the allocation can fail, and it happens before any node is
    /// touched. Relinking uses the plain chain append, so it never re-enters
    /// the resize policy.
    fn rebuild(&mut self, capacity: usize) -> Result<(), TableError> {
        let fresh = alloc_slots(capacity)?;
        let old = core::mem::replace(&mut self.slots, fresh);
        for chain in old {
            let mut cur = chain.head();
            while let Some(k) = cur {
                // Read the successor before append clears the links.
                cur = self.nodes[k].next();
                let idx = Self::slot_index(self.nodes[k].hash, capacity);
                self.slots[idx].append(&mut self.nodes, k);
            }
        }
        Ok(())
    }

    /// Assert every structural invariant; returns the number of nodes
    /// reachable from the slots.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> usize {
        let mut reachable = 0;
        for (idx, chain) in self.slots.iter().enumerate() {
            reachable += chain.check_links(&self.nodes);
            for k in chain.keys(&self.nodes) {
                let node = &self.nodes[k];
                assert_eq!(node.hash, self.make_hash(&node.key), "stale stored hash");
                assert_eq!(Self::slot_index(node.hash, self.capacity()), idx, "node in wrong slot");
                assert_eq!(chain.find(&self.nodes, &node.key), Some(k), "duplicate key in chain");
            }
        }
        assert_eq!(reachable, self.len(), "len disagrees with reachable nodes");
        reachable
    }
}

impl<'a, T: ?Sized, S> fmt::Debug for ChainTable<'a, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainTable")
            .field("len", &self.nodes.len())
            .field("capacity", &self.slots.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Iterator over `(key bytes, value)` pairs of a [`ChainTable`].
pub struct Iter<'t, 'a, T: ?Sized> {
    it: slotmap::basic::Values<'t, NodeKey, Node<'a, T>>,
}

impl<'t, 'a, T: ?Sized> Iterator for Iter<'t, 'a, T> {
    type Item = (&'t [u8], &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|n| (&*n.key, n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'t, 'a, T: ?Sized, S: BuildHasher> IntoIterator for &'t ChainTable<'a, T, S> {
    type Item = (&'t [u8], &'a T);
    type IntoIter = Iter<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
