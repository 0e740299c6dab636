//! Wait policies for the `BUSY` and `DRL` status lines.
//!
//! The converter signals completion only through its status pins, so every wait is a
//! polling loop on the calling thread. A [`PollStrategy`] decides how long such a loop
//! may run: [`Forever`] spins until the device responds, while [`MaxAttempts`] and
//! [`Delayed`] bound the wait so the driver can report [`Error::Timeout`](crate::Error::Timeout).

use embedded_hal::delay::DelayNs;

/// Policy consulted between status checks.
pub trait PollStrategy {
    /// Called once before a new wait starts.
    fn begin(&mut self) {}

    /// Called after each check that did not observe the awaited state.
    ///
    /// Returns `false` to abandon the wait.
    fn retry(&mut self) -> bool;
}

/// Busy-waits without limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forever;

impl PollStrategy for Forever {
    fn retry(&mut self) -> bool {
        core::hint::spin_loop();
        true
    }
}

/// Gives up after a fixed number of failed checks per wait.
#[derive(Debug, Clone, Copy)]
pub struct MaxAttempts {
    limit: u32,
    remaining: u32,
}

impl MaxAttempts {
    /// Allows `limit` retries per wait.
    pub const fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }
}

impl PollStrategy for MaxAttempts {
    fn begin(&mut self) {
        self.remaining = self.limit;
    }

    fn retry(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Sleeps between checks and gives up after `attempts` intervals.
///
/// The effective deadline is `interval_us * attempts` microseconds.
pub struct Delayed<D> {
    delay: D,
    interval_us: u32,
    attempts: MaxAttempts,
}

impl<D> Delayed<D>
where
    D: DelayNs,
{
    /// Creates a policy polling every `interval_us` for at most `attempts` intervals.
    pub const fn new(delay: D, interval_us: u32, attempts: u32) -> Self {
        Self {
            delay,
            interval_us,
            attempts: MaxAttempts::new(attempts),
        }
    }

    /// Consumes the policy and returns the owned delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D> PollStrategy for Delayed<D>
where
    D: DelayNs,
{
    fn begin(&mut self) {
        self.attempts.begin();
    }

    fn retry(&mut self) -> bool {
        if !self.attempts.retry() {
            return false;
        }
        self.delay.delay_us(self.interval_us);
        true
    }
}

/// Polls `check` until it returns `true` or `poll` gives up.
///
/// Returns `Ok(false)` when the strategy abandoned the wait.
pub(crate) fn wait_until<P, F, E>(poll: &mut P, mut check: F) -> core::result::Result<bool, E>
where
    P: PollStrategy + ?Sized,
    F: FnMut() -> core::result::Result<bool, E>,
{
    poll.begin();
    loop {
        if check()? {
            return Ok(true);
        }
        if !poll.retry() {
            return Ok(false);
        }
    }
}
