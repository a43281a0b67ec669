/// Deferred-callback scheduler.
///
/// Every timed thing in the games (the game-loop tick, staggered particle
/// spawns, particle removal, the typing interval, the end of an effect
/// session) is an entry on a `Timeline`. The owner drains due entries with
/// [`Timeline::pop_due`] and runs each to completion before taking the next,
/// so handlers may schedule further entries that become due in the same pass.
///
/// Entries fire in `(fire_time, scheduling order)` order. A periodic entry is
/// re-armed at `previous_fire + period` and gets a fresh place in the
/// scheduling order, so a one-shot scheduled earlier for the same instant
/// runs first.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle returned by [`Timeline::after`] and [`Timeline::every`].
pub type TimerId = u64;

#[derive(Debug)]
struct Entry<E> {
    at: u64,
    seq: u64,
    id: TimerId,
    period: Option<u64>,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap yields the earliest entry.
impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub struct Timeline<E> {
    heap: BinaryHeap<Entry<E>>,
    cancelled: HashSet<TimerId>,
    next_seq: u64,
    next_id: TimerId,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Timeline {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_seq: 0,
            next_id: 0,
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot entry firing `delay_ms` after `now`.
    pub fn after(&mut self, now: u64, delay_ms: u64, event: E) -> TimerId {
        self.push(now + delay_ms, None, event)
    }

    /// Repeating entry, first firing one `period_ms` after `now`.
    pub fn every(&mut self, now: u64, period_ms: u64, event: E) -> TimerId {
        let period = period_ms.max(1);
        self.push(now + period, Some(period), event)
    }

    /// Stop a pending entry. Cancelling one that already fired is a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        if self.heap.iter().any(|e| e.id == id) {
            self.cancelled.insert(id);
        }
    }

    /// Take the earliest entry due at or before `now`, with its fire time.
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, E)> {
        loop {
            if self.heap.peek().map_or(true, |e| e.at > now) {
                return None;
            }
            let entry = self.heap.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            let fired_at = entry.at;
            return Some(match entry.period {
                Some(period) => {
                    let event = entry.event.clone();
                    let seq = self.bump_seq();
                    self.heap.push(Entry {
                        at: fired_at + period,
                        seq,
                        ..entry
                    });
                    (fired_at, event)
                }
                None => (fired_at, entry.event),
            });
        }
    }

    /// Fire time of the earliest live entry.
    pub fn next_due(&self) -> Option<u64> {
        self.heap
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .map(|e| e.at)
            .min()
    }

    /// Number of live (not cancelled) entries.
    pub fn pending(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Drop every entry whose event fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) {
        let entries = std::mem::take(&mut self.heap).into_vec();
        let cancelled = &mut self.cancelled;
        self.heap = entries
            .into_iter()
            .filter(|e| {
                let kept = keep(&e.event);
                if !kept {
                    cancelled.remove(&e.id);
                }
                kept
            })
            .collect();
    }

    fn push(&mut self, at: u64, period: Option<u64>, event: E) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let seq = self.bump_seq();
        self.heap.push(Entry {
            at,
            seq,
            id,
            period,
            event,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_ignores_cancelled_entries() {
        let mut t = Timeline::new();
        let a = t.after(0, 10, 'a');
        t.after(0, 20, 'b');
        t.cancel(a);
        assert_eq!(t.pending(), 1);
        assert_eq!(t.next_due(), Some(20));
    }

    #[test]
    fn retain_forgets_cancellation_of_dropped_entries() {
        let mut t = Timeline::new();
        let a = t.after(0, 10, 'a');
        t.cancel(a);
        t.retain(|&c| c != 'a');
        assert!(t.cancelled.is_empty());
        assert!(t.is_empty());
    }
}
