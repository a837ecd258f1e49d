//! Deterministic timer queue and step sequencer.
//!
//! The host owns real time. It reports the current clock and the scheduler
//! hands back every action whose deadline has passed, oldest first. A timer
//! fires "at" its own deadline, so delays scheduled from inside a fired action
//! are relative to that deadline rather than to the frame that noticed it.

use fnv::{FnvHashMap, FnvHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Handle to a running [`Sequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceId(u64);

struct Pending<A> {
    due_ms: f64,
    seq: u64,
    group: Option<SequenceId>,
    action: A,
}

impl<A> PartialEq for Pending<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A> Eq for Pending<A> {}

impl<A> PartialOrd for Pending<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Pending<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: earliest deadline first, then insertion order
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One step of a [`Sequence`]: wait `delay_ms` after the previous step, then run `action`.
#[derive(Clone, Debug, PartialEq)]
struct Step<A> {
    delay_ms: f64,
    action: A,
}

/// Ordered list of delayed actions. Delays are relative to the previous step,
/// the same shape as nested `setTimeout` calls.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence<A> {
    steps: Vec<Step<A>>,
}

impl<A> Default for Sequence<A> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<A> Sequence<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, delay_ms: f64, action: A) -> Self {
        self.steps.push(Step {
            delay_ms: delay_ms.max(0.0),
            action,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time from start until the last step fires.
    pub fn total_ms(&self) -> f64 {
        self.steps.iter().map(|s| s.delay_ms).sum()
    }
}

pub struct Scheduler<A> {
    now_ms: f64,
    next_seq: u64,
    next_group: u64,
    queue: BinaryHeap<Pending<A>>,
    remaining: FnvHashMap<SequenceId, usize>,
    cancelled: FnvHashSet<SequenceId>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            next_group: 0,
            queue: BinaryHeap::new(),
            remaining: FnvHashMap::default(),
            cancelled: FnvHashSet::default(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of timers still queued, cancelled ones included until they drain.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the earliest queued timer.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.queue.peek().map(|p| p.due_ms)
    }

    pub fn after(&mut self, delay_ms: f64, action: A) {
        let due_ms = self.now_ms + delay_ms.max(0.0);
        self.push(due_ms, None, action);
    }

    /// Queue every step of `sequence` at its cumulative offset from now.
    pub fn run(&mut self, sequence: Sequence<A>) -> SequenceId {
        let id = SequenceId(self.next_group);
        self.next_group += 1;
        let mut due_ms = self.now_ms;
        let count = sequence.steps.len();
        for step in sequence.steps {
            due_ms += step.delay_ms;
            self.push(due_ms, Some(id), step.action);
        }
        if count > 0 {
            self.remaining.insert(id, count);
        }
        id
    }

    /// Whether any step of `id` is still waiting to fire.
    pub fn is_running(&self, id: SequenceId) -> bool {
        self.remaining.contains_key(&id) && !self.cancelled.contains(&id)
    }

    /// Drop the unfired steps of `id`. Returns `false` if it already finished.
    pub fn cancel(&mut self, id: SequenceId) -> bool {
        if self.remaining.contains_key(&id) {
            self.cancelled.insert(id)
        } else {
            false
        }
    }

    /// Pop the next action due at or before `until_ms`, advancing the clock to its deadline.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<A> {
        loop {
            if self.queue.peek()?.due_ms > until_ms {
                return None;
            }
            let pending = self.queue.pop()?;
            self.now_ms = self.now_ms.max(pending.due_ms);
            if let Some(group) = pending.group {
                let skip = self.cancelled.contains(&group);
                self.finish_step(group);
                if skip {
                    continue;
                }
            }
            return Some(pending.action);
        }
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn finish_step(&mut self, group: SequenceId) {
        if let Some(left) = self.remaining.get_mut(&group) {
            *left -= 1;
            if *left == 0 {
                self.remaining.remove(&group);
                self.cancelled.remove(&group);
            }
        }
    }

    fn push(&mut self, due_ms: f64, group: Option<SequenceId>, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Pending {
            due_ms,
            seq,
            group,
            action,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: f64) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(a) = s.pop_due(until) {
            out.push(a);
        }
        s.settle(until);
        out
    }

    #[test]
    fn fires_in_deadline_then_insertion_order() {
        let mut s = Scheduler::new();
        s.after(50.0, "b");
        s.after(10.0, "a");
        s.after(50.0, "c");
        assert_eq!(drain(&mut s, 49.0), vec!["a"]);
        assert_eq!(drain(&mut s, 50.0), vec!["b", "c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn sequence_delays_accumulate() {
        let mut s = Scheduler::new();
        let seq = Sequence::new()
            .then(0.0, "start")
            .then(800.0, "second")
            .then(1200.0, "third");
        assert_eq!(seq.total_ms(), 2000.0);
        let id = s.run(seq);
        assert_eq!(drain(&mut s, 0.0), vec!["start"]);
        assert_eq!(drain(&mut s, 799.0), Vec::<&str>::new());
        assert_eq!(drain(&mut s, 800.0), vec!["second"]);
        assert!(s.is_running(id));
        assert_eq!(drain(&mut s, 2000.0), vec!["third"]);
        assert!(!s.is_running(id));
    }

    #[test]
    fn cancelled_sequence_skips_remaining_steps() {
        let mut s = Scheduler::new();
        let id = s.run(Sequence::new().then(10.0, "one").then(10.0, "two"));
        s.after(15.0, "other");
        assert_eq!(drain(&mut s, 10.0), vec!["one"]);
        assert!(s.cancel(id));
        assert_eq!(drain(&mut s, 100.0), vec!["other"]);
        assert!(!s.cancel(id));
    }

    #[test]
    fn clock_advances_to_fired_deadline() {
        let mut s = Scheduler::new();
        s.after(100.0, "x");
        assert_eq!(s.pop_due(500.0), Some("x"));
        assert_eq!(s.now_ms(), 100.0);
        s.after(10.0, "y");
        assert_eq!(s.next_due_ms(), Some(110.0));
    }
}
