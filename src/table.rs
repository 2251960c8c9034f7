//! LinkedHashTable: slot array for lookup, order list for traversal.

use crate::config::Limits;
use crate::cursor::{Cursor, CursorMut, Direction};
use crate::error::TableError;
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::order::{EntryKey, OrderList};
use crate::probe::{self, DoubleHasher, FnProbe, ProbeHasher};
use crate::report::{Report, TracingReport};
use crate::slots::{Probe, Slot, SlotArray};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;
use core::mem;
use tracing::Level;

/// Caller-supplied ordering for sorted tables.
pub type Comparator<K> = Box<dyn Fn(&K, &K) -> Ordering>;

/// A hash table whose entries are also threaded through a doubly linked
/// order list.
///
/// Lookups go through an open-addressing slot array probed by double
/// hashing. Traversal follows the order list: arrival order by default, or
/// the order of a comparator given at construction. Inserting an existing
/// key replaces its value and keeps its position.
///
/// ```
/// use linked_hash_table::{Direction, LinkedHashTable};
///
/// let mut table = LinkedHashTable::new();
/// table.insert("b", 2).unwrap();
/// table.insert("a", 1).unwrap();
/// table.insert("c", 3).unwrap();
///
/// assert_eq!(table.get("a"), Some(&1));
/// assert_eq!(table.pop(), Some(("c", 3)));
///
/// let mut cursor = table.cursor(Direction::Reverse);
/// assert_eq!(cursor.next(), Some((&"a", &1)));
/// assert_eq!(cursor.next(), Some((&"b", &2)));
/// assert_eq!(cursor.next(), None);
/// ```
pub struct LinkedHashTable<K, V, H = DoubleHasher, R = TracingReport> {
    pub(crate) slots: SlotArray<EntryKey>,
    pub(crate) order: OrderList<K, V>,
    pub(crate) hasher: H,
    pub(crate) compare: Option<Comparator<K>>,
    pub(crate) reporter: R,
    pub(crate) limits: Limits,
    /// Set once a refused growth has been reported; cleared by a shrink.
    pub(crate) growth_refused: bool,
}

impl<K, V> LinkedHashTable<K, V>
where
    K: Eq + Hash,
{
    /// Empty table in arrival order with the default hasher and sink.
    pub fn new() -> Self {
        Self::from_parts(
            SlotArray::with_capacity(Limits::default().initial),
            DoubleHasher::default(),
            None,
            TracingReport,
            Limits::default(),
        )
    }

    /// Empty table kept sorted by `K`'s `Ord`.
    pub fn sorted() -> Self
    where
        K: Ord,
    {
        let mut table = Self::new();
        table.compare = Some(Box::new(|a: &K, b: &K| a.cmp(b)));
        table
    }
}

impl<K, V> Default for LinkedHashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F1, F2> LinkedHashTable<K, V, FnProbe<F1, F2>>
where
    F1: Fn(&K, usize) -> usize,
    F2: Fn(&K, usize) -> usize,
{
    /// Empty table in arrival order probing with `hash1` for the home cell
    /// and `hash2` for the step. Use [`TableBuilder`](crate::TableBuilder) to add a comparator,
    /// a sink or sizing limits.
    pub fn with_hashers(hash1: F1, hash2: F2) -> Self {
        Self::from_parts(
            SlotArray::with_capacity(Limits::default().initial),
            FnProbe::new::<K>(hash1, hash2),
            None,
            TracingReport,
            Limits::default(),
        )
    }
}

impl<K, V, H, R> LinkedHashTable<K, V, H, R> {
    pub(crate) fn from_parts(
        slots: SlotArray<EntryKey>,
        hasher: H,
        compare: Option<Comparator<K>>,
        reporter: R,
        limits: Limits,
    ) -> Self {
        Self {
            slots,
            order: OrderList::new(),
            hasher,
            compare,
            reporter,
            limits,
            growth_refused: false,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    /// Current number of slot array cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Whether the order list is kept sorted by a comparator.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.compare.is_some()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// First entry of the order list.
    pub fn front(&self) -> Option<(&K, &V)> {
        let node = self.order.node(self.order.head()?);
        Some((&node.key, &node.value))
    }

    /// Last entry of the order list.
    pub fn back(&self) -> Option<(&K, &V)> {
        let node = self.order.node(self.order.tail()?);
        Some((&node.key, &node.value))
    }

    /// Entries in order-list order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.order)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Read-only cursor walking the order list in `direction`.
    pub fn cursor(&self, direction: Direction) -> Cursor<'_, K, V> {
        Cursor::new(&self.order, direction)
    }

    /// Cursor that can also remove the entry under it.
    pub fn cursor_mut(&mut self, direction: Direction) -> CursorMut<'_, K, V, H, R> {
        CursorMut::new(self, direction)
    }

    fn locate<Q>(&self, key: &Q) -> Option<(usize, EntryKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        let seq = probe::sequence(&self.hasher, key, self.slots.capacity());
        let order = &self.order;
        self.slots.find(seq, |h| order.node(h).key.borrow() == key)
    }

    /// Value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        let (_, handle) = self.locate(key)?;
        Some(&self.order.node(handle).value)
    }

    /// Same as [`get`](Self::get).
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        self.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        let (_, handle) = self.locate(key)?;
        let node = self.order.node(handle);
        Some((&node.key, &node.value))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        let (_, handle) = self.locate(key)?;
        Some(&mut self.order.node_mut(handle).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        self.locate(key).is_some()
    }
}

impl<K, V, H, R> LinkedHashTable<K, V, H, R>
where
    K: Eq,
    H: ProbeHasher<K>,
    R: Report,
{
    /// Inserts `value` under `key`.
    ///
    /// Returns `Ok(Some(old))` when the key was present: the value is
    /// replaced and the entry keeps its place in the order list. A new key
    /// goes to the tail, or to its sorted position when a comparator is set.
    ///
    /// # Errors
    ///
    /// [`TableError::Full`] when no cell is free for a new key, which can
    /// only happen after growth was refused. The table is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let seq = probe::sequence(&self.hasher, &key, self.slots.capacity());
        let order = &self.order;
        let index = match self.slots.find_or_vacant(seq, |h| order.node(h).key == key) {
            Probe::Found { handle, .. } => {
                let old = mem::replace(&mut self.order.node_mut(handle).value, value);
                return Ok(Some(old));
            }
            Probe::Vacant { index } => index,
            Probe::Exhausted => {
                let err = TableError::Full {
                    capacity: self.slots.capacity(),
                };
                self.reporter.report(Level::ERROR, &err.to_string());
                return Err(err);
            }
        };

        let before = match &self.compare {
            Some(compare) => self.order.sorted_position(&key, &**compare),
            None => None,
        };
        let handle = match before {
            Some(at) => self.order.insert_before(at, key, value, index),
            None => self.order.push_back(key, value, index),
        };
        self.slots.fill(index, handle);

        self.maybe_grow();
        Ok(None)
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        H: ProbeHasher<Q>,
    {
        let (_, handle) = self.locate(key)?;
        self.remove_handle(handle)
    }

    /// Removes the last entry of the order list.
    pub fn pop(&mut self) -> Option<(K, V)> {
        let handle = self.order.tail()?;
        self.remove_handle(handle)
    }

    /// Removes the first entry of the order list.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let handle = self.order.head()?;
        self.remove_handle(handle)
    }

    /// Shared removal path: unlink from the order list, leave a tombstone in
    /// the slot array, then let the resizer shrink.
    pub(crate) fn remove_handle(&mut self, handle: EntryKey) -> Option<(K, V)> {
        let node = self.order.unlink(handle)?;
        let vacated = self.slots.vacate(node.slot);
        debug_assert_eq!(vacated, Some(handle));
        self.maybe_shrink();
        Some((node.key, node.value))
    }

    /// Drops every entry and returns the slot array to its minimum size.
    pub fn clear(&mut self) {
        self.order.clear();
        self.slots.reset();
        self.growth_refused = false;
        if self.slots.capacity() > self.limits.min_capacity {
            self.resize_to(self.limits.min_capacity);
        }
    }

    /// Takes every entry out in order-list order, leaving the table empty.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        let order = mem::take(&mut self.order);
        self.clear();
        IntoIter::new(order)
    }

    /// Consumes an empty table.
    ///
    /// # Panics
    ///
    /// Destroying a table that still holds entries is a caller error: it is
    /// reported at `ERROR` and then panics.
    pub fn destroy(self) {
        if !self.is_empty() {
            let message = format!("destroying a table that still holds {} entries", self.len());
            self.reporter.report(Level::ERROR, &message);
            panic!("{message}");
        }
    }

    /// Checks the structural invariants and panics on the first violation.
    ///
    /// - every entry sits in exactly one cell and records that cell;
    /// - the order list is acyclic, doubly consistent and `len()` long;
    /// - every key is reachable by probing from its home cell;
    /// - the cell counters match the cells.
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let len = self.len();
        assert_eq!(self.order.head().is_none(), len == 0, "head set iff non-empty");
        assert_eq!(self.order.tail().is_none(), len == 0, "tail set iff non-empty");

        let mut walked = 0;
        let mut prev = None;
        let mut cur = self.order.head();
        while let Some(k) = cur {
            walked += 1;
            assert!(walked <= len, "order list is longer than len()");
            let node = self.order.node(k);
            assert_eq!(node.prev, prev, "prev link disagrees with walk");
            assert_eq!(self.slots.get(node.slot), Some(Slot::Full(k)), "slot index stale");
            let found = self.locate(&node.key).map(|(_, h)| h);
            assert_eq!(found, Some(k), "key not reachable by probing");
            prev = Some(k);
            cur = node.next;
        }
        assert_eq!(walked, len, "order list is shorter than len()");
        assert_eq!(self.order.tail(), prev, "tail is not the last node");

        let mut full = 0;
        let mut tombstones = 0;
        for (_, slot) in self.slots.iter() {
            match slot {
                Slot::Full(_) => full += 1,
                Slot::Tombstone => tombstones += 1,
                Slot::Empty => {}
            }
        }
        assert_eq!(full, len, "full cells != len()");
        assert_eq!(self.slots.occupied(), len);
        assert_eq!(self.slots.tombstones(), tombstones);
    }
}

impl<K, V, H, R> fmt::Debug for LinkedHashTable<K, V, H, R>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H, R> IntoIterator for &'a LinkedHashTable<K, V, H, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, H, R> IntoIterator for LinkedHashTable<K, V, H, R> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.order)
    }
}
