//! Property tests for the generational slot allocator.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use tripwire::{CanBeInvalid, Handle, SlotAllocator, SlotError};

#[derive(Clone, Debug, PartialEq)]
struct Token(i64);

impl CanBeInvalid for Token {
    fn is_invalid(&self) -> bool {
        self.0 < 0
    }
    fn make_invalid() -> Self {
        Token(-1)
    }
}

#[derive(Clone, Debug)]
enum Op {
    /// Negative values are invalid and leave their slot reading empty.
    Add(i64),
    /// Remove the n-th handle ever issued (mod count), live or not.
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i64..1000).prop_map(Op::Add),
        1 => (-1000i64..0).prop_map(Op::Add),
        2 => any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn len_matches_valid_handles_and_removed_stay_stale(ops in prop::collection::vec(op(), 1..200)) {
        let mut slots = SlotAllocator::new();
        let mut issued: Vec<Handle<Token>> = Vec::new();
        let mut seen: HashSet<Handle<Token>> = HashSet::new();
        // Handles that still resolve, with the value stored behind them.
        let mut stored: HashMap<Handle<Token>, i64> = HashMap::new();
        // slot index -> its resolving handle, if any
        let mut current: HashMap<u32, Handle<Token>> = HashMap::new();
        // slot index -> generation of the last removal from that slot
        let mut last_removed: HashMap<u32, u32> = HashMap::new();
        let mut max_slots = 0usize;

        for op in ops {
            match op {
                Op::Add(v) => {
                    let has_free = !last_removed.is_empty() || stored.values().any(|v| *v < 0);
                    let before = slots.slot_count();
                    let h = slots.add(Token(v));
                    prop_assert!(seen.insert(h), "add returned an already issued handle {:?}", h);
                    if has_free {
                        prop_assert_eq!(slots.slot_count(), before);
                    } else {
                        prop_assert_eq!(slots.slot_count(), before + 1);
                    }

                    if let Some(g) = last_removed.remove(&h.index()) {
                        prop_assert_eq!(h.generation(), g + 1);
                    } else if let Some(prev) = current.get(&h.index()).copied() {
                        // Overwrote a value that was added invalid and never removed.
                        prop_assert!(stored[&prev] < 0);
                        prop_assert_eq!(h.generation(), prev.generation() + 1);
                        stored.remove(&prev);
                    } else {
                        prop_assert_eq!(h.generation(), 0);
                    }
                    issued.push(h);
                    current.insert(h.index(), h);
                    stored.insert(h, v);
                }
                Op::Remove(n) => {
                    if issued.is_empty() { continue; }
                    let h = issued[n % issued.len()];
                    let res = slots.remove(h);
                    if let Some(v) = stored.remove(&h) {
                        prop_assert_eq!(res, Ok(Token(v)));
                        current.remove(&h.index());
                        last_removed.insert(h.index(), h.generation());
                        prop_assert!(
                            matches!(slots.get(h), Err(SlotError::StaleHandle { .. })),
                            "removed handle must be stale"
                        );
                    } else {
                        prop_assert!(
                            matches!(res, Err(SlotError::StaleHandle { .. })),
                            "double remove must report a stale handle"
                        );
                    }
                }
            }

            prop_assert!(slots.slot_count() >= max_slots);
            max_slots = slots.slot_count();
            prop_assert_eq!(slots.len(), stored.values().filter(|v| **v >= 0).count());
            for h in &issued {
                match stored.get(h) {
                    Some(v) => prop_assert_eq!(slots.get(*h), Ok(&Token(*v))),
                    None => prop_assert!(slots.get(*h).is_err()),
                }
            }
        }
    }

    #[test]
    fn add_never_grows_while_a_slot_is_free(n in 1usize..32, k in 0usize..32) {
        let mut slots = SlotAllocator::new();
        let hs: Vec<_> = (0..n).map(|i| slots.add(Token(i as i64))).collect();
        let victim = hs[k % n];
        slots.remove(victim).unwrap();
        let h = slots.add(Token(99));
        prop_assert_eq!(h.index(), victim.index());
        prop_assert_eq!(h.generation(), victim.generation() + 1);
        prop_assert_eq!(slots.slot_count(), n);
    }
}
