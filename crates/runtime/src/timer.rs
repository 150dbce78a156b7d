use foundation::time::Millis;

/// The two kinds of timer the widget ever runs. Each kind has at most one
/// live instance at a time (see [`crate::TimerSlots`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Periodic clock refresh.
    ClockTick,
    /// One-shot "re-enable slider transition" after a resize burst.
    TransitionSettle,
}

impl TimerKind {
    pub fn name(self) -> &'static str {
        match self {
            TimerKind::ClockTick => "clock_tick",
            TimerKind::TransitionSettle => "transition_settle",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimerSpec {
    pub kind: TimerKind,
    pub delay: Millis,
    /// Re-fire every `delay` until cancelled.
    pub repeat: bool,
}

impl TimerSpec {
    pub fn interval(kind: TimerKind, delay: Millis) -> Self {
        Self {
            kind,
            delay,
            repeat: true,
        }
    }

    pub fn timeout(kind: TimerKind, delay: Millis) -> Self {
        Self {
            kind,
            delay,
            repeat: false,
        }
    }
}

/// Something that can deliver a [`TimerKind`] back to its owner once a
/// delay has elapsed.
///
/// Hosts never see callbacks; the owner decides what a fired kind means.
/// Browser hosts wrap `setTimeout`/`setInterval`, tests use
/// [`crate::VirtualTimers`].
pub trait TimerHost {
    type Handle;

    fn schedule(&mut self, spec: TimerSpec) -> Self::Handle;

    /// Cancels a scheduled timer. Cancelling a one-shot that already fired
    /// must be harmless.
    fn cancel(&mut self, handle: Self::Handle);
}
