use foundation::time::Millis;

use crate::timer::{TimerHost, TimerKind, TimerSpec};

/// Handle returned by [`VirtualTimers::schedule`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    kind: TimerKind,
    due_at: Millis,
    period: Option<Millis>,
}

/// Deterministic [`TimerHost`] driven by an explicit clock.
///
/// Nothing happens until [`VirtualTimers::advance`] is called. Due timers fire
/// in `(due_at, id)` order, so timers due at the same instant fire in the order
/// they were scheduled. Intervals are re-queued `period` after their due time.
#[derive(Debug, Default)]
pub struct VirtualTimers {
    now: Millis,
    next_id: u64,
    entries: Vec<Entry>,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Number of scheduled (not yet fired or cancelled) timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Due time of the earliest pending timer of `kind`.
    pub fn next_due(&self, kind: TimerKind) -> Option<Millis> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.due_at)
            .min()
    }

    /// Moves the clock forward by `by`, returning every timer that fired along
    /// with the instant it fired at.
    pub fn advance(&mut self, by: Millis) -> Vec<(Millis, TimerKind)> {
        let target = self.now.saturating_add(by);
        let mut fired = Vec::new();

        while let Some(idx) = self.next_due_index(target) {
            let entry = &mut self.entries[idx];
            let at = entry.due_at;
            let kind = entry.kind;
            let period = entry.period;
            match period {
                Some(period) => entry.due_at = at.saturating_add(period),
                None => {
                    self.entries.remove(idx);
                }
            }
            self.now = at;
            fired.push((at, kind));
        }

        self.now = target;
        fired
    }

    fn next_due_index(&self, target: Millis) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_at <= target)
            .min_by(|(_, a), (_, b)| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)
    }
}

impl TimerHost for VirtualTimers {
    type Handle = TimerId;

    fn schedule(&mut self, spec: TimerSpec) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        // Zero-length intervals would never let the clock move; browsers clamp too.
        let delay = spec.delay.max(Millis(1));
        self.entries.push(Entry {
            id,
            kind: spec.kind,
            due_at: self.now.saturating_add(delay),
            period: spec.repeat.then_some(delay),
        });
        id
    }

    fn cancel(&mut self, handle: TimerId) {
        self.entries.retain(|e| e.id != handle);
    }
}
