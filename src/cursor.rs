//! Cursors over the order list.
//!
//! A cursor starts before the first entry of its direction, moves with
//! `next`, and parks past the last entry once `next` runs off the end.
//! `prev` undoes a `next`: it follows the opposite link from wherever the
//! cursor is, whatever the direction. Undoing from past the end lands on
//! the last entry; undoing from the first entry parks before it again.
//!
//! Both cursors borrow the table, so nothing else can change the order
//! list while one is alive. Only `CursorMut::pop` removes entries, and it
//! repositions the cursor itself.

use crate::order::{EntryKey, OrderList};
use crate::probe::ProbeHasher;
use crate::report::Report;
use crate::table::LinkedHashTable;
use core::fmt;
use core::iter::FusedIterator;

/// Which way `next` walks the order list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Head to tail.
    #[default]
    Forward,
    /// Tail to head.
    Reverse,
}

impl Direction {
    fn start<K, V>(self, order: &OrderList<K, V>) -> Option<EntryKey> {
        match self {
            Direction::Forward => order.head(),
            Direction::Reverse => order.tail(),
        }
    }

    fn end<K, V>(self, order: &OrderList<K, V>) -> Option<EntryKey> {
        match self {
            Direction::Forward => order.tail(),
            Direction::Reverse => order.head(),
        }
    }

    fn advance<K, V>(self, order: &OrderList<K, V>, k: EntryKey) -> Option<EntryKey> {
        match self {
            Direction::Forward => order.next_of(k),
            Direction::Reverse => order.prev_of(k),
        }
    }

    fn retreat<K, V>(self, order: &OrderList<K, V>, k: EntryKey) -> Option<EntryKey> {
        match self {
            Direction::Forward => order.prev_of(k),
            Direction::Reverse => order.next_of(k),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Unstarted,
    At(EntryKey),
    Exhausted,
}

impl Position {
    fn step_next<K, V>(self, order: &OrderList<K, V>, direction: Direction) -> Position {
        let next = match self {
            Position::Unstarted => direction.start(order),
            Position::At(k) => direction.advance(order, k),
            Position::Exhausted => None,
        };
        next.map_or(Position::Exhausted, Position::At)
    }

    fn step_prev<K, V>(self, order: &OrderList<K, V>, direction: Direction) -> Position {
        let prev = match self {
            Position::Unstarted => None,
            Position::At(k) => direction.retreat(order, k),
            Position::Exhausted => direction.end(order),
        };
        prev.map_or(Position::Unstarted, Position::At)
    }
}

/// Read-only cursor. Cheap to copy; every copy moves independently.
pub struct Cursor<'a, K, V> {
    order: &'a OrderList<K, V>,
    position: Position,
    direction: Direction,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(order: &'a OrderList<K, V>, direction: Direction) -> Self {
        Self {
            order,
            position: Position::Unstarted,
            direction,
        }
    }

    fn entry(&self) -> Option<(&'a K, &'a V)> {
        let Position::At(k) = self.position else {
            return None;
        };
        let node = self.order.node(k);
        Some((&node.key, &node.value))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Entry under the cursor, if it is on one.
    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        self.entry()
    }

    /// Undoes the last move. Returns the entry landed on.
    pub fn prev(&mut self) -> Option<(&'a K, &'a V)> {
        self.position = self.position.step_prev(self.order, self.direction);
        self.entry()
    }

    /// True once `next` has run off the end.
    pub fn is_exhausted(&self) -> bool {
        self.position == Position::Exhausted
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.position = self.position.step_next(self.order, self.direction);
        self.entry()
    }
}

impl<'a, K, V> FusedIterator for Cursor<'a, K, V> {}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("direction", &self.direction)
            .field("current", &self.entry())
            .finish()
    }
}

/// Cursor holding the table exclusively; it can also remove the entry
/// under it.
///
/// ```
/// use linked_hash_table::{Direction, LinkedHashTable};
///
/// let mut table = LinkedHashTable::new();
/// for k in 0..6 {
///     table.insert(k, k * k).unwrap();
/// }
///
/// // Drop every even key while walking forward.
/// let mut cursor = table.cursor_mut(Direction::Forward);
/// let mut at = cursor.next().map(|(k, _)| *k);
/// while let Some(k) = at {
///     at = if k % 2 == 0 {
///         cursor.pop();
///         cursor.current().map(|(k, _)| *k)
///     } else {
///         cursor.next().map(|(k, _)| *k)
///     };
/// }
/// assert_eq!(table.keys().copied().collect::<Vec<_>>(), [1, 3, 5]);
/// ```
pub struct CursorMut<'a, K, V, H, R> {
    table: &'a mut LinkedHashTable<K, V, H, R>,
    position: Position,
    direction: Direction,
}

impl<'a, K, V, H, R> CursorMut<'a, K, V, H, R> {
    pub(crate) fn new(table: &'a mut LinkedHashTable<K, V, H, R>, direction: Direction) -> Self {
        Self {
            table,
            position: Position::Unstarted,
            direction,
        }
    }

    fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        let Position::At(k) = self.position else {
            return None;
        };
        let node = self.table.order.node_mut(k);
        Some((&node.key, &mut node.value))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn current(&self) -> Option<(&K, &V)> {
        let Position::At(k) = self.position else {
            return None;
        };
        let node = self.table.order.node(k);
        Some((&node.key, &node.value))
    }

    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        self.entry_mut()
    }

    /// Moves one entry along the cursor's direction.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&K, &mut V)> {
        self.position = self.position.step_next(&self.table.order, self.direction);
        self.entry_mut()
    }

    /// Undoes the last move.
    pub fn prev(&mut self) -> Option<(&K, &mut V)> {
        self.position = self.position.step_prev(&self.table.order, self.direction);
        self.entry_mut()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == Position::Exhausted
    }

    /// Read-only view of the table the cursor holds.
    pub fn table(&self) -> &LinkedHashTable<K, V, H, R> {
        self.table
    }
}

impl<'a, K, V, H, R> CursorMut<'a, K, V, H, R>
where
    K: Eq,
    H: ProbeHasher<K>,
    R: Report,
{
    /// Removes the entry under the cursor through the table's normal
    /// removal path (tombstone, length, shrink check) and moves the cursor
    /// onto the entry that followed it. Returns `None` without effect when
    /// the cursor is not on an entry.
    pub fn pop(&mut self) -> Option<(K, V)> {
        let Position::At(handle) = self.position else {
            return None;
        };
        let successor = self.direction.advance(&self.table.order, handle);
        let removed = self.table.remove_handle(handle)?;
        self.position = successor.map_or(Position::Exhausted, Position::At);
        Some(removed)
    }
}

impl<'a, K: fmt::Debug, V: fmt::Debug, H, R> fmt::Debug for CursorMut<'a, K, V, H, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("direction", &self.direction)
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(keys: &[u32]) -> LinkedHashTable<u32, u32> {
        let mut t = LinkedHashTable::new();
        for &k in keys {
            t.insert(k, k * 10).unwrap();
        }
        t
    }

    fn key<V>(entry: Option<(&u32, V)>) -> Option<u32> {
        entry.map(|(k, _)| *k)
    }

    /// Invariant: forward and reverse cursors visit the order list and its
    /// mirror image, then report exhaustion.
    #[test]
    fn directions_walk_opposite_ends() {
        let t = table(&[4, 2, 9]);
        let forward: Vec<u32> = t.cursor(Direction::Forward).map(|(k, _)| *k).collect();
        let reverse: Vec<u32> = t.cursor(Direction::Reverse).map(|(k, _)| *k).collect();
        assert_eq!(forward, vec![4, 2, 9]);
        assert_eq!(reverse, vec![9, 2, 4]);
    }

    /// Invariant: an empty table's cursor is exhausted on the first next.
    #[test]
    fn empty_table_cursor_is_exhausted_immediately() {
        let t = table(&[]);
        let mut c = t.cursor(Direction::Forward);
        assert_eq!(c.next(), None);
        assert!(c.is_exhausted());
        assert_eq!(c.prev(), None);
        assert_eq!(c.next(), None);
    }

    /// Invariant: prev undoes next, including from past either end, for
    /// both directions.
    #[test]
    fn prev_undoes_next() {
        let t = table(&[1, 2, 3]);

        let mut c = t.cursor(Direction::Forward);
        assert_eq!(c.prev(), None, "nothing to undo yet");
        assert_eq!(key(c.next()), Some(1));
        assert_eq!(key(c.next()), Some(2));
        assert_eq!(key(c.prev()), Some(1));
        assert_eq!(c.prev(), None);
        assert_eq!(key(c.next()), Some(1));

        let mut r = t.cursor(Direction::Reverse);
        assert_eq!(key(r.next()), Some(3));
        assert_eq!(key(r.next()), Some(2));
        assert_eq!(key(r.prev()), Some(3));
        assert_eq!(key(r.next()), Some(2));
        assert_eq!(key(r.next()), Some(1));
        assert_eq!(r.next(), None);
        assert!(r.is_exhausted());
        assert_eq!(r.next(), None, "stays exhausted");
        assert_eq!(key(r.prev()), Some(1), "undo from past the end");
    }

    /// Invariant: copies of a cursor move independently.
    #[test]
    fn cursor_copies_are_independent() {
        let t = table(&[1, 2, 3]);
        let mut a = t.cursor(Direction::Forward);
        a.next();
        let mut b = a;
        assert_eq!(key(b.next()), Some(2));
        assert_eq!(key(a.current()), Some(1));
    }

    /// Invariant: popping every other entry while iterating keeps the rest
    /// in their original relative order and leaves floor(n/2) entries.
    #[test]
    fn pop_every_other_entry() {
        for n in [0u32, 1, 2, 7, 40] {
            let keys: Vec<u32> = (0..n).collect();
            let mut t = table(&keys);
            let mut c = t.cursor_mut(Direction::Forward);
            let mut popped = Vec::new();
            c.next();
            while let Some((k, _)) = c.pop() {
                popped.push(k);
                c.next();
            }
            let rest: Vec<u32> = t.keys().copied().collect();
            assert_eq!(rest, keys.iter().copied().filter(|k| k % 2 == 1).collect::<Vec<_>>());
            assert_eq!(popped.len(), keys.len() - keys.len() / 2);
            assert_eq!(t.len(), (n / 2) as usize);
            t.assert_invariants();
        }
    }

    /// Invariant: popping moves a reverse cursor onto the entry before the
    /// popped one in list order, and the last pop exhausts it.
    #[test]
    fn reverse_pop_moves_toward_head() {
        let mut t = table(&[1, 2, 3]);
        let mut c = t.cursor_mut(Direction::Reverse);
        c.next();
        assert_eq!(c.pop(), Some((3, 30)));
        assert_eq!(key(c.current()), Some(2));
        c.next();
        assert_eq!(c.pop(), Some((1, 10)));
        assert!(c.is_exhausted());
        assert_eq!(key(c.prev()), Some(2));
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    /// Invariant: pop is a no-op before the first next and after
    /// exhaustion.
    #[test]
    fn pop_outside_entries_is_noop() {
        let mut t = table(&[1]);
        let mut c = t.cursor_mut(Direction::Forward);
        assert_eq!(c.pop(), None);
        c.next();
        c.next();
        assert!(c.is_exhausted());
        assert_eq!(c.pop(), None);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: pops that trigger a shrink keep the cursor valid, since
    /// handles survive rebuilding the slot array.
    #[test]
    fn pop_through_shrink_keeps_cursor_valid() {
        let keys: Vec<u32> = (0..100).collect();
        let mut t = table(&keys);
        let start = t.capacity();
        let mut c = t.cursor_mut(Direction::Forward);
        c.next();
        let mut popped = 0;
        while c.current().is_some() {
            if *c.current().unwrap().0 == 99 {
                break;
            }
            c.pop();
            popped += 1;
        }
        assert_eq!(popped, 99);
        assert!(t.capacity() < start);
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![99]);
        t.assert_invariants();
    }

    /// Invariant: values are mutable through the cursor.
    #[test]
    fn values_mutable_through_cursor() {
        let mut t = table(&[1, 2]);
        let mut c = t.cursor_mut(Direction::Forward);
        while let Some((_, v)) = c.next() {
            *v += 1;
        }
        assert_eq!(t.values().copied().collect::<Vec<_>>(), vec![11, 21]);
    }
}
