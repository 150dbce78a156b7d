use std::collections::BTreeMap;

use crate::timer::{TimerHost, TimerKind, TimerSpec};

#[derive(Debug)]
struct Slot<H> {
    handle: H,
    live: bool,
}

/// Single-owner lease on one timer per [`TimerKind`].
///
/// Arming a kind always cancels whatever that kind held before, so there is
/// never more than one pending timer of a kind.
#[derive(Debug)]
pub struct TimerSlots<H> {
    slots: BTreeMap<TimerKind, Slot<H>>,
}

impl<H> Default for TimerSlots<H> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<H> TimerSlots<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm<T>(&mut self, host: &mut T, spec: TimerSpec)
    where
        T: TimerHost<Handle = H>,
    {
        self.disarm(host, spec.kind);
        tracing::trace!(kind = spec.kind.name(), delay = %spec.delay, repeat = spec.repeat, "arming timer");
        let handle = host.schedule(spec);
        self.slots.insert(spec.kind, Slot { handle, live: true });
    }

    /// Cancels and forgets the timer of `kind`, if any.
    pub fn disarm<T>(&mut self, host: &mut T, kind: TimerKind)
    where
        T: TimerHost<Handle = H>,
    {
        if let Some(slot) = self.slots.remove(&kind) {
            host.cancel(slot.handle);
        }
    }

    /// Records that a one-shot of `kind` has fired.
    ///
    /// The handle is kept until the next `arm`/`disarm`: a browser handle owns
    /// the closure that is running right now and cannot be dropped from
    /// inside it.
    pub fn mark_fired(&mut self, kind: TimerKind) {
        if let Some(slot) = self.slots.get_mut(&kind) {
            slot.live = false;
        }
    }

    pub fn is_live(&self, kind: TimerKind) -> bool {
        self.slots.get(&kind).is_some_and(|s| s.live)
    }

    pub fn live_count(&self) -> usize {
        self.slots.values().filter(|s| s.live).count()
    }
}
