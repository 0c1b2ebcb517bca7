//! Fixed-interval retry policy driven by an injectable clock.
//!
//! Both waits in the dev-environment flow (instance address, SSH reachability)
//! go through [`RetryPolicy::run`], so their timeout behaviour can be tested
//! with a fake clock instead of real sleeps.

use std::time::Duration;

/// Monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// Finished successfully.
    Done(T),
    /// Not ready yet; try again after the interval.
    Retry,
    /// Fatal failure; stop immediately.
    Abort(E),
}

/// Why [`RetryPolicy::run`] gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The deadline passed before an attempt succeeded.
    Exhausted { elapsed: Duration, attempts: u32 },
    /// An attempt returned [`Attempt::Abort`].
    Aborted(E),
}

/// Retry at a fixed interval until a deadline, no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Waiting for a new instance to report a non-placeholder address.
    pub const ADDRESS_WAIT: Self = Self {
        interval: Duration::from_secs(5),
        timeout: Duration::from_secs(180),
    };

    /// Waiting for the SSH daemon of a booting instance.
    pub const CONNECTION_WAIT: Self = Self {
        interval: Duration::from_secs(10),
        timeout: Duration::from_secs(300),
    };

    /// Runs `attempt` until it returns `Done` or `Abort`, or the deadline passes.
    ///
    /// The deadline is checked before every attempt, never during one: an
    /// attempt already in flight always completes. `attempt` receives the
    /// 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Exhausted`] once `timeout` has elapsed, or
    /// [`RetryError::Aborted`] with the attempt's own error.
    pub fn run<T, E>(
        &self,
        clock: &impl Clock,
        mut attempt: impl FnMut(u32) -> Attempt<T, E>,
    ) -> Result<T, RetryError<E>> {
        let start = clock.now();
        let mut attempts = 0;
        loop {
            let elapsed = clock.now().saturating_sub(start);
            if elapsed >= self.timeout {
                return Err(RetryError::Exhausted { elapsed, attempts });
            }
            attempts += 1;
            match attempt(attempts) {
                Attempt::Done(value) => return Ok(value),
                Attempt::Abort(e) => return Err(RetryError::Aborted(e)),
                Attempt::Retry => clock.sleep(self.interval),
            }
        }
    }
}
