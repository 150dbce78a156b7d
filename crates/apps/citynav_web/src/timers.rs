use gloo_timers::callback::{Interval, Timeout};
use runtime::{TimerHost, TimerSpec};

/// A live `setInterval`/`setTimeout`. Dropping it cancels the timer.
#[derive(Debug)]
pub enum BrowserTimer {
    Interval(Interval),
    Timeout(Timeout),
}

/// [`TimerHost`] on the browser event loop. Fired kinds are delivered to the
/// page's controller through [`crate::dispatch_timer`].
#[derive(Debug, Default)]
pub struct BrowserTimers;

impl TimerHost for BrowserTimers {
    type Handle = BrowserTimer;

    fn schedule(&mut self, spec: TimerSpec) -> BrowserTimer {
        let kind = spec.kind;
        let millis = u32::try_from(spec.delay.as_u64()).unwrap_or(u32::MAX);
        if spec.repeat {
            BrowserTimer::Interval(Interval::new(millis, move || crate::dispatch_timer(kind)))
        } else {
            BrowserTimer::Timeout(Timeout::new(millis, move || crate::dispatch_timer(kind)))
        }
    }

    fn cancel(&mut self, handle: BrowserTimer) {
        // gloo clears the underlying timer on drop.
        drop(handle);
    }
}
