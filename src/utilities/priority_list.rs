//! # Priority List
//!
//! A value-ordered doubly linked list supporting O(1) retrieval of the current
//! minimum or maximum of a sliding window, with lazy removal of entries that
//! have fallen behind the window's cursor.
//!
//! Entries are `(value, expiry)` pairs kept in non-decreasing value order from
//! `head` to `tail`. The expiry is an index into a caller-owned slot table
//! mapping slot ids to the position at which tagged entries mature; `None`
//! marks an entry that is never evicted by the purge pass. Nodes live in an
//! index-addressed arena with a free list, so splices are O(1) and there is no
//! per-node allocation on the steady-state insert/remove churn.
//!
//! ## Developer Notes / Decision Log
//! - Insert has strict-inequality fast paths for a new head and a new tail,
//!   plus a forward scan for the interior case. The fast paths and the scan
//!   place equal values differently; downstream consumers depend on the
//!   reported order of duplicates, so the asymmetry is kept as-is.
//! - `remove_expired` stops after six removals in a single call. The purge is
//!   meant to run on every cursor advance, so each call stays cheap and the
//!   backlog stays bounded; callers must not assume one call drains the list.

/// Cap on removals performed by a single [`PriorityList::remove_expired`] call.
pub const MAX_REMOVALS_PER_SWEEP: usize = 6;

#[derive(Debug, Clone, Copy)]
struct Node {
    value: f64,
    /// Slot in the caller's expiry table, or `None` for "never evict".
    expiry: Option<usize>,
    smaller: Option<usize>,
    larger: Option<usize>,
}

/// Value-ordered doubly linked list over an index-addressed arena.
#[derive(Debug, Clone)]
pub struct PriorityList {
    nodes: Vec<Node>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    is_max: bool,
}

impl PriorityList {
    /// Create an empty list. `capacity_hint` pre-reserves arena storage and is
    /// otherwise advisory; it is not enforced as a cap. `is_max` fixes which
    /// end [`peek`](Self::peek) reads for the lifetime of the list.
    pub fn new(capacity_hint: usize, is_max: bool) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity_hint),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            is_max,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_max(&self) -> bool {
        self.is_max
    }

    /// Insert `(value, expiry)` keeping the chain ordered by value.
    ///
    /// O(1) for a new head or tail (the common case under rolling input),
    /// O(n) worst case for an interior splice. Equal values entering through
    /// the interior scan land before any equal-valued run the scan stops at;
    /// the head/tail fast paths trigger on strict inequality only.
    pub fn insert(&mut self, value: f64, expiry: Option<usize>) {
        let new = self.alloc(Node {
            value,
            expiry,
            smaller: None,
            larger: None,
        });
        self.len += 1;

        let head = match self.head {
            Some(h) => h,
            None => {
                // First node.
                self.head = Some(new);
                self.tail = Some(new);
                return;
            }
        };

        // New smallest value: becomes the head.
        if value < self.nodes[head].value {
            self.nodes[new].larger = Some(head);
            self.nodes[head].smaller = Some(new);
            self.head = Some(new);
            return;
        }

        // New largest value: becomes the tail.
        let tail = self.tail.expect("non-empty list has a tail");
        if value > self.nodes[tail].value {
            self.splice_after(tail, new);
            self.tail = Some(new);
            return;
        }

        // Scan forward for the last node whose successor is not smaller.
        let mut at = head;
        while let Some(next) = self.nodes[at].larger {
            if value > self.nodes[next].value {
                at = next;
            } else {
                break;
            }
        }
        self.splice_after(at, new);

        // Splicing after the old tail makes the new node the tail.
        if self.tail == Some(at) {
            self.tail = Some(new);
        }
    }

    /// Current extremum: the tail value for a max list, the head value for a
    /// min list. `None` on an empty list is a defined state, not an error.
    #[inline]
    pub fn peek(&self) -> Option<f64> {
        let at = if self.is_max { self.tail } else { self.head };
        at.map(|i| self.nodes[i].value)
    }

    /// Remove matured entries, scanning from the head toward the tail.
    ///
    /// A node tagged with expiry slot `d` matures once
    /// `current_position >= slot_table[d]`; nodes with no expiry slot are
    /// skipped unconditionally. The sweep stops after
    /// [`MAX_REMOVALS_PER_SWEEP`] removals, so one call does not guarantee
    /// that every matured entry is gone; run it on every position advance.
    /// Returns the number of nodes removed by this call.
    ///
    /// Every tagged expiry slot must index into `slot_table`; an out-of-range
    /// slot is a caller bug.
    pub fn remove_expired(&mut self, slot_table: &[usize], current_position: usize) -> usize {
        let mut at = self.head;
        let mut count = 0;

        while let Some(i) = at {
            let matured = match self.nodes[i].expiry {
                Some(d) => {
                    debug_assert!(d < slot_table.len(), "expiry slot {} out of range", d);
                    current_position >= slot_table[d]
                }
                None => false,
            };

            if matured {
                let larger = self.nodes[i].larger;
                let smaller = self.nodes[i].smaller;

                if let Some(l) = larger {
                    self.nodes[l].smaller = smaller;
                }
                if let Some(s) = smaller {
                    self.nodes[s].larger = larger;
                }
                if self.head == Some(i) {
                    self.head = larger;
                }
                if self.tail == Some(i) {
                    self.tail = smaller;
                }

                self.release(i);
                self.len -= 1;
                count += 1;
                at = larger;

                if count == MAX_REMOVALS_PER_SWEEP {
                    break;
                }
            } else {
                at = self.nodes[i].larger;
            }
        }

        count
    }

    /// In-order traversal yielding `(value, expiry)` pairs, smallest first.
    /// Diagnostic helper; does not modify the list.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    #[inline]
    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.nodes[i] = node;
                i
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    #[inline]
    fn release(&mut self, i: usize) {
        self.free.push(i);
    }

    /// Link `new` directly after `at`, fixing up the back link of the old
    /// successor when present.
    fn splice_after(&mut self, at: usize, new: usize) {
        let old_larger = self.nodes[at].larger;
        self.nodes[new].smaller = Some(at);
        self.nodes[new].larger = old_larger;
        self.nodes[at].larger = Some(new);
        if let Some(l) = old_larger {
            self.nodes[l].smaller = Some(new);
        }
    }
}

/// Lazy head→tail traversal over a [`PriorityList`].
#[derive(Debug)]
pub struct Iter<'a> {
    list: &'a PriorityList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (f64, Option<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cursor?;
        let node = &self.list.nodes[i];
        self.cursor = node.larger;
        Some((node.value, node.expiry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &PriorityList) -> Vec<f64> {
        list.iter().map(|(v, _)| v).collect()
    }

    fn tags(list: &PriorityList) -> Vec<Option<usize>> {
        list.iter().map(|(_, d)| d).collect()
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut list = PriorityList::new(8, false);
        let input = [4.0, -2.5, 9.0, 0.0, 4.0, 7.5, -2.5, 1.0];
        for (i, &v) in input.iter().enumerate() {
            list.insert(v, Some(i));
        }

        let got = values(&list);
        let mut expected = input.to_vec();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(got, expected, "traversal must yield the sorted multiset");
        assert_eq!(list.len(), input.len());
    }

    #[test]
    fn test_peek_reads_min_or_max_end() {
        let mut min_list = PriorityList::new(4, false);
        let mut max_list = PriorityList::new(4, true);
        for &v in &[3.0, -1.0, 8.0, 2.0] {
            min_list.insert(v, None);
            max_list.insert(v, None);
        }
        assert_eq!(min_list.peek(), Some(-1.0));
        assert_eq!(max_list.peek(), Some(8.0));
    }

    #[test]
    fn test_empty_list_behavior() {
        let mut list = PriorityList::new(3, false);
        assert_eq!(list.peek(), None, "peek on a fresh list must be empty");
        assert_eq!(list.remove_expired(&[0], 5), 0);
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_min_list_purge_scenario() {
        // Worked example: three entries on one slot, all purged in one call.
        let mut list = PriorityList::new(3, false);
        list.insert(5.0, Some(0));
        list.insert(1.0, Some(0));
        list.insert(3.0, Some(0));

        assert_eq!(values(&list), vec![1.0, 3.0, 5.0]);
        assert_eq!(list.peek(), Some(1.0));

        let slot_table = [10usize];
        let removed = list.remove_expired(&slot_table, 10);
        assert_eq!(removed, 3);
        assert_eq!(list.peek(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_removal_cap_of_six_per_sweep() {
        let mut list = PriorityList::new(8, true);
        for i in 0..8 {
            list.insert(i as f64, Some(0));
        }
        let slot_table = [0usize];

        let first = list.remove_expired(&slot_table, 0);
        assert_eq!(first, MAX_REMOVALS_PER_SWEEP);
        assert_eq!(list.len(), 2, "two matured entries must survive the cap");

        let second = list.remove_expired(&slot_table, 0);
        assert_eq!(second, 2);
        assert!(list.is_empty());
    }

    #[test]
    fn test_untagged_nodes_survive_purge() {
        let mut list = PriorityList::new(4, false);
        list.insert(1.0, None);
        list.insert(2.0, Some(0));
        list.insert(3.0, None);
        list.insert(4.0, Some(0));

        let slot_table = [0usize];
        let removed = list.remove_expired(&slot_table, 0);
        assert_eq!(removed, 2);
        assert_eq!(values(&list), vec![1.0, 3.0]);
        assert_eq!(tags(&list), vec![None, None]);
    }

    #[test]
    fn test_purge_updates_head_and_tail() {
        let mut list = PriorityList::new(4, true);
        list.insert(1.0, Some(0));
        list.insert(2.0, Some(1));
        list.insert(3.0, Some(0));

        // Only slot 0 matures: head and tail both go, the middle stays.
        let slot_table = [5usize, 100];
        assert_eq!(list.remove_expired(&slot_table, 5), 2);
        assert_eq!(values(&list), vec![2.0]);
        assert_eq!(list.peek(), Some(2.0));
    }

    #[test]
    fn test_equal_value_after_single_equal_node() {
        // One node equal to the new value: neither fast path fires, the scan
        // stops at the lone node and the new entry lands after it.
        let mut list = PriorityList::new(2, true);
        list.insert(5.0, Some(7));
        list.insert(5.0, Some(8));
        assert_eq!(tags(&list), vec![Some(7), Some(8)]);
    }

    #[test]
    fn test_equal_value_lands_before_equal_run_in_scan() {
        // Interior scan advances on strict inequality only, so a duplicate
        // entering through it stops short of the existing equal run.
        let mut list = PriorityList::new(3, false);
        list.insert(1.0, Some(0));
        list.insert(5.0, Some(1));
        list.insert(5.0, Some(2));
        assert_eq!(tags(&list), vec![Some(0), Some(2), Some(1)]);
        assert_eq!(values(&list), vec![1.0, 5.0, 5.0]);
    }

    #[test]
    fn test_interior_insert_between_neighbors() {
        let mut list = PriorityList::new(4, false);
        list.insert(1.0, None);
        list.insert(9.0, None);
        list.insert(4.0, None);
        list.insert(6.0, None);
        assert_eq!(values(&list), vec![1.0, 4.0, 6.0, 9.0]);
    }

    #[test]
    fn test_live_count_tracks_inserts_and_removes() {
        let mut list = PriorityList::new(16, false);
        let mut slot_table = vec![usize::MAX; 16];
        let mut inserted = 0usize;
        let mut removed = 0usize;

        for step in 0..16 {
            let v = ((step * 7) % 5) as f64 - 2.0;
            list.insert(v, Some(step));
            slot_table[step] = step + 4;
            inserted += 1;
            removed += list.remove_expired(&slot_table, step);
            assert_eq!(list.len(), inserted - removed);
            assert_eq!(list.iter().count(), list.len());
        }
        assert!(removed > 0, "windowed slots must have matured");
    }

    #[test]
    fn test_repeated_purges_drain_all_matured_entries() {
        let mut list = PriorityList::new(20, false);
        let slot_table: Vec<usize> = (0..20).map(|d| d % 3).collect();
        for d in 0..20 {
            list.insert((20 - d) as f64, Some(d));
        }

        // Slots 0..20 map to deadlines {0, 1, 2}; position 1 matures the
        // entries on deadlines 0 and 1 but needs several capped sweeps.
        let mut total = 0;
        loop {
            let n = list.remove_expired(&slot_table, 1);
            assert!(n <= MAX_REMOVALS_PER_SWEEP);
            total += n;
            if n == 0 {
                break;
            }
        }

        let expected: usize = (0..20).filter(|d| d % 3 <= 1).count();
        assert_eq!(total, expected);
        for (_, expiry) in list.iter() {
            let d = expiry.expect("all entries are tagged");
            assert!(1 < slot_table[d], "matured entry survived the drain");
        }
    }

    #[test]
    fn test_arena_slots_are_reused() {
        let mut list = PriorityList::new(2, false);
        let slot_table = [0usize];
        for round in 0..50 {
            list.insert(round as f64, Some(0));
            list.insert(-(round as f64), Some(0));
            assert_eq!(list.remove_expired(&slot_table, 0), 2);
        }
        assert!(list.is_empty());
        assert!(
            list.nodes.len() <= 2,
            "steady-state churn must not grow the arena, got {}",
            list.nodes.len()
        );
    }

    #[test]
    fn test_zero_capacity_hint_is_advisory() {
        let mut list = PriorityList::new(0, false);
        for i in 0..10 {
            list.insert(i as f64, None);
        }
        assert_eq!(list.len(), 10);
        assert_eq!(list.peek(), Some(0.0));
    }
}
