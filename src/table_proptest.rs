#![cfg(test)]

// Property tests for LinkedHashTable kept inside the crate so they can
// inspect the slot array directly.

use crate::config::TableBuilder;
use crate::cursor::Direction;
use crate::probe::{FnProbe, ProbeHasher};
use crate::report::Report;
use crate::slots::Slot;
use crate::table::LinkedHashTable;
use proptest::prelude::*;
use tracing::Level;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    Remove(u16),
    Find(u16),
    Pop,
    PopFront,
    // Pop every `n`th entry through a forward cursor.
    CursorPop(usize),
}

fn arb_ops(keys: u16) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0..keys, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..keys).prop_map(Op::Remove),
        2 => (0..keys).prop_map(Op::Find),
        1 => Just(Op::Pop),
        1 => Just(Op::PopFront),
        1 => (2usize..5).prop_map(Op::CursorPop),
    ];
    proptest::collection::vec(op, 1..200)
}

fn quiet(_: Level, _: &str) {}

// Model: entries in order-list order. `sorted` keeps it ordered by key.
fn run<H, R>(
    mut sut: LinkedHashTable<u16, i32, H, R>,
    ops: Vec<Op>,
    sorted: bool,
) -> Result<(), TestCaseError>
where
    H: ProbeHasher<u16>,
    R: Report,
{
    let mut model: Vec<(u16, i32)> = Vec::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let prev = sut.insert(k, v).expect("growth is unbounded");
                match model.iter_mut().find(|(mk, _)| *mk == k) {
                    Some(entry) => {
                        prop_assert_eq!(prev, Some(entry.1));
                        entry.1 = v;
                    }
                    None => {
                        prop_assert_eq!(prev, None);
                        let at = if sorted {
                            model.iter().position(|(mk, _)| *mk > k).unwrap_or(model.len())
                        } else {
                            model.len()
                        };
                        model.insert(at, (k, v));
                    }
                }
            }
            Op::Remove(k) => {
                let expected = model
                    .iter()
                    .position(|(mk, _)| *mk == k)
                    .map(|i| model.remove(i).1);
                prop_assert_eq!(sut.remove(&k), expected);
            }
            Op::Find(k) => {
                let expected = model.iter().find(|(mk, _)| *mk == k).map(|(_, v)| v);
                prop_assert_eq!(sut.get(&k), expected);
            }
            Op::Pop => {
                prop_assert_eq!(sut.pop(), model.pop());
            }
            Op::PopFront => {
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0))
                };
                prop_assert_eq!(sut.pop_front(), expected);
            }
            Op::CursorPop(n) => {
                let mut c = sut.cursor_mut(Direction::Forward);
                let mut i = 0;
                let mut kept = Vec::new();
                let mut at = c.next().map(|(k, v)| (*k, *v));
                while let Some(entry) = at {
                    if i % n == 0 {
                        prop_assert_eq!(c.pop(), Some(entry));
                        at = c.current().map(|(k, v)| (*k, *v));
                    } else {
                        kept.push(entry);
                        at = c.next().map(|(k, v)| (*k, *v));
                    }
                    i += 1;
                }
                model = kept;
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        let live = sut
            .slots
            .iter()
            .filter(|(_, s)| matches!(s, Slot::Full(_)))
            .count();
        prop_assert_eq!(live, model.len());
        let order: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&order, &model);
        let capacity = sut.capacity();
        prop_assert!(capacity.is_power_of_two() && capacity >= 4);
        prop_assert!(sut.len() < capacity);
    }
    Ok(())
}

// Property: state-machine equivalence against an ordered Vec model.
// Invariants exercised across random operation sequences:
// - insert returns the replaced value and never duplicates a key;
// - remove/pop/pop_front return what the model holds at that key or end;
// - cursor pops keep the survivors in their relative order;
// - after every op: len == order-list length == full cells, every key is
//   reachable by probing, capacity stays a power of two above len.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_arrival_order_default_hasher(ops in arb_ops(64)) {
        let sut = TableBuilder::new()
            .initial_capacity(4)
            .reporter(quiet)
            .build()
            .unwrap();
        run(sut, ops, false)?;
    }

    // Few home cells and short steps: long collision chains and many
    // tombstones on them.
    #[test]
    fn prop_arrival_order_colliding_hasher(ops in arb_ops(48)) {
        let probe = FnProbe::new(
            |k: &u16, _: usize| (*k % 3) as usize,
            |k: &u16, _: usize| (*k % 2) as usize,
        );
        let sut = TableBuilder::new()
            .initial_capacity(4)
            .hasher(probe)
            .reporter(quiet)
            .build()
            .unwrap();
        run(sut, ops, false)?;
    }

    #[test]
    fn prop_sorted_order(ops in arb_ops(64)) {
        let sut = TableBuilder::new()
            .initial_capacity(4)
            .comparator(|a: &u16, b: &u16| a.cmp(b))
            .reporter(quiet)
            .build()
            .unwrap();
        run(sut, ops, true)?;
    }
}
