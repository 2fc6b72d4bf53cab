//! Bucket chains: doubly linked lists of entries sharing one slot.
//!
//! Nodes live in the table's `SlotMap` arena and link to each other by
//! `NodeKey`, so splicing a node out needs only its handle. A `Chain` is
//! just the head handle stored in a slot; every operation takes the arena
//! explicitly.
//!
//! Invariants maintained between operations:
//! - the head has no `prev`;
//! - `a.next == Some(b)` iff `b.prev == Some(a)`;
//! - chains are acyclic and each node is reachable from exactly one head.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena handle of a chain node.
    pub(crate) struct NodeKey;
}

/// One entry: an owned key copy and a borrowed value.
#[derive(Debug)]
pub(crate) struct Node<'a, T: ?Sized> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: &'a T,
    // Full hash of `key`; rebuilds only reduce it modulo the new capacity.
    pub(crate) hash: u64,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

impl<'a, T: ?Sized> Node<'a, T> {
    /// An unlinked node, ready for [`Chain::append`].
    pub(crate) fn new(key: Box<[u8]>, value: &'a T, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            prev: None,
            next: None,
        }
    }

    pub(crate) fn next(&self) -> Option<NodeKey> {
        self.next
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Chain {
    head: Option<NodeKey>,
}

impl Chain {
    pub(crate) fn head(&self) -> Option<NodeKey> {
        self.head
    }

    /// Handles from head to tail.
    pub(crate) fn keys<'c, 'a, T: ?Sized>(
        &self,
        nodes: &'c SlotMap<NodeKey, Node<'a, T>>,
    ) -> Keys<'c, 'a, T> {
        Keys {
            nodes,
            cur: self.head,
        }
    }

    /// First node whose key equals `key` byte for byte.
    pub(crate) fn find<T: ?Sized>(
        &self,
        nodes: &SlotMap<NodeKey, Node<'_, T>>,
        key: &[u8],
    ) -> Option<NodeKey> {
        self.keys(nodes).find(|&k| *nodes[k].key == *key)
    }

    /// Link the unlinked node `k` after the current tail.
    pub(crate) fn append<T: ?Sized>(
        &mut self,
        nodes: &mut SlotMap<NodeKey, Node<'_, T>>,
        k: NodeKey,
    ) {
        let tail = self.keys(nodes).last();
        match tail {
            Some(t) => nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        let node = &mut nodes[k];
        node.prev = tail;
        node.next = None;
    }

    /// Unlink `k` from this chain without touching any other node than its
    /// neighbours. The node stays in the arena with cleared links.
    pub(crate) fn splice_out<T: ?Sized>(
        &mut self,
        nodes: &mut SlotMap<NodeKey, Node<'_, T>>,
        k: NodeKey,
    ) {
        let node = &mut nodes[k];
        let (prev, next) = (node.prev.take(), node.next.take());
        match prev {
            Some(p) => nodes[p].next = next,
            None => {
                debug_assert_eq!(self.head, Some(k), "node without prev must be the head");
                self.head = next;
            }
        }
        if let Some(n) = next {
            nodes[n].prev = prev;
        }
    }

    /// Walk the chain asserting double consistency and acyclicity; returns
    /// the number of nodes.
    #[cfg(test)]
    pub(crate) fn check_links<T: ?Sized>(
        &self,
        nodes: &SlotMap<NodeKey, Node<'_, T>>,
    ) -> usize {
        let mut prev = None;
        let mut cur = self.head;
        let mut len = 0;
        while let Some(k) = cur {
            let node = nodes.get(k).expect("chain links to a live node");
            assert_eq!(node.prev, prev, "prev link disagrees with predecessor");
            len += 1;
            assert!(len <= nodes.len(), "cycle in chain");
            prev = Some(k);
            cur = node.next;
        }
        len
    }
}

pub(crate) struct Keys<'c, 'a, T: ?Sized> {
    nodes: &'c SlotMap<NodeKey, Node<'a, T>>,
    cur: Option<NodeKey>,
}

impl<'c, 'a, T: ?Sized> Iterator for Keys<'c, 'a, T> {
    type Item = NodeKey;

    #[inline]
    fn next(&mut self) -> Option<NodeKey> {
        let k = self.cur?;
        self.cur = self.nodes[k].next;
        Some(k)
    }
}
