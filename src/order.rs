//! Order list: a doubly linked chain through arena nodes.
//!
//! Nodes live in a `SlotMap`, so links are generational handles rather than
//! pointers. A handle held by the slot array or a cursor either resolves to
//! the node it was minted for or to nothing; it can never alias a node
//! inserted later in the same arena slot.

use core::cmp::Ordering;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle of one entry in the order list arena.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Cell of the slot array currently holding this node's handle.
    pub(crate) slot: usize,
    pub(crate) prev: Option<EntryKey>,
    pub(crate) next: Option<EntryKey>,
}

#[derive(Debug)]
pub(crate) struct OrderList<K, V> {
    nodes: SlotMap<EntryKey, Node<K, V>>,
    head: Option<EntryKey>,
    tail: Option<EntryKey>,
}

impl<K, V> Default for OrderList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderList<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<EntryKey> {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<EntryKey> {
        self.tail
    }

    /// Node for a handle known to be live (stored in the slot array or
    /// reached through a link).
    #[inline]
    pub(crate) fn node(&self, k: EntryKey) -> &Node<K, V> {
        &self.nodes[k]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, k: EntryKey) -> &mut Node<K, V> {
        &mut self.nodes[k]
    }

    #[inline]
    pub(crate) fn next_of(&self, k: EntryKey) -> Option<EntryKey> {
        self.nodes.get(k).and_then(|n| n.next)
    }

    #[inline]
    pub(crate) fn prev_of(&self, k: EntryKey) -> Option<EntryKey> {
        self.nodes.get(k).and_then(|n| n.prev)
    }

    /// Appends a node at the tail.
    pub(crate) fn push_back(&mut self, key: K, value: V, slot: usize) -> EntryKey {
        let prev = self.tail;
        let k = self.nodes.insert(Node {
            key,
            value,
            slot,
            prev,
            next: None,
        });
        match prev {
            Some(p) => self.nodes[p].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        k
    }

    /// Splices a node immediately before `at`.
    pub(crate) fn insert_before(&mut self, at: EntryKey, key: K, value: V, slot: usize) -> EntryKey {
        let prev = self.nodes[at].prev;
        let k = self.nodes.insert(Node {
            key,
            value,
            slot,
            prev,
            next: Some(at),
        });
        self.nodes[at].prev = Some(k);
        match prev {
            Some(p) => self.nodes[p].next = Some(k),
            None => self.head = Some(k),
        }
        k
    }

    /// Removes a node from the chain and the arena, relinking its
    /// neighbours. Returns `None` for a stale handle.
    pub(crate) fn unlink(&mut self, k: EntryKey) -> Option<Node<K, V>> {
        let node = self.nodes.remove(k)?;
        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }
        if self.nodes.is_empty() {
            self.head = None;
            self.tail = None;
        }
        Some(node)
    }

    /// Where a new key belongs in a list sorted by `compare`: the node to
    /// splice before, or `None` to append. Equal keys keep arrival order, so
    /// the new key goes after every existing key that compares equal.
    pub(crate) fn sorted_position<F>(&self, key: &K, compare: F) -> Option<EntryKey>
    where
        F: Fn(&K, &K) -> Ordering,
    {
        let tail = self.tail?;
        if compare(&self.nodes[tail].key, key) != Ordering::Greater {
            return None;
        }
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if compare(&node.key, key) == Ordering::Greater {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Handles from head to tail.
    pub(crate) fn handles(&self) -> Handles<'_, K, V> {
        Handles {
            list: self,
            cur: self.head,
        }
    }
}

pub(crate) struct Handles<'a, K, V> {
    list: &'a OrderList<K, V>,
    cur: Option<EntryKey>,
}

impl<'a, K, V> Iterator for Handles<'a, K, V> {
    type Item = EntryKey;

    fn next(&mut self) -> Option<EntryKey> {
        let k = self.cur?;
        self.cur = self.list.next_of(k);
        Some(k)
    }
}
