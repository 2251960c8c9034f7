//! Std iterators over the order list.

use crate::order::{EntryKey, OrderList};
use core::iter::FusedIterator;

/// Entries in order-list order. Double-ended.
pub struct Iter<'a, K, V> {
    order: &'a OrderList<K, V>,
    front: Option<EntryKey>,
    back: Option<EntryKey>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(order: &'a OrderList<K, V>) -> Self {
        Self {
            order,
            front: order.head(),
            back: order.tail(),
            remaining: order.len(),
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.order.node(self.front?);
        self.remaining -= 1;
        self.front = node.next;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.order.node(self.back?);
        self.remaining -= 1;
        self.back = node.prev;
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

/// Owned entries in order-list order, from `into_iter` or `drain`.
pub struct IntoIter<K, V> {
    order: OrderList<K, V>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(order: OrderList<K, V>) -> Self {
        Self { order }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let head = self.order.head()?;
        self.order.unlink(head).map(|node| (node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.order.len(), Some(self.order.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        let tail = self.order.tail()?;
        self.order.unlink(tail).map(|node| (node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use crate::table::LinkedHashTable;

    /// Invariant: both ends of the iterator meet without overlap.
    #[test]
    fn double_ended_meets_in_the_middle() {
        let mut t = LinkedHashTable::new();
        for k in 0..5u32 {
            t.insert(k, ()).unwrap();
        }
        let mut it = t.keys();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&0));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&3));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn into_iter_owns_entries_in_order() {
        let mut t = LinkedHashTable::new();
        for k in ["x", "y", "z"] {
            t.insert(k.to_string(), k.len()).unwrap();
        }
        let mut it = t.into_iter();
        assert_eq!(it.next_back(), Some(("z".to_string(), 1)));
        assert_eq!(it.collect::<Vec<_>>(), vec![("x".to_string(), 1), ("y".to_string(), 1)]);
    }

    #[test]
    fn borrowed_into_iter_matches_iter() {
        let mut t = LinkedHashTable::new();
        t.insert(2u8, 'b').unwrap();
        t.insert(1u8, 'a').unwrap();
        let pairs: Vec<(u8, char)> = (&t).into_iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(2, 'b'), (1, 'a')]);
        assert_eq!(t.values().rev().copied().collect::<String>(), "ab");
    }
}
