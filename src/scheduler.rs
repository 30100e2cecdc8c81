/// Fixed-interval scheduler loop.
///
/// The loop wakes at a fixed one-second tick, checks whether the interval
/// has elapsed since the last invocation (or process start), and if so
/// runs the job inline on the same thread. The job blocks the loop while
/// it runs, so two invocations can never overlap; a slow cycle simply
/// delays the next wake-up check. There is no terminal state; the loop
/// runs until the process is killed.

use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

/// How often the loop wakes to check the clock. Actual invocation times
/// may drift behind the interval by up to this cadence.
const TICK: Duration = Duration::from_secs(1);

pub struct Scheduler {
    interval: Duration,
    /// Reference point for the first invocation.
    anchor: Instant,
    /// Start time of the most recent invocation.
    last_run: Option<Instant>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self::anchored(interval, Instant::now())
    }

    /// Creates a scheduler whose first interval is measured from `anchor`
    /// rather than from construction time.
    pub fn anchored(interval: Duration, anchor: Instant) -> Self {
        Self {
            interval,
            anchor,
            last_run: None,
        }
    }

    /// True when the interval has elapsed since the last invocation
    /// started, or since the anchor before the first invocation.
    pub fn due(&self, now: Instant) -> bool {
        let since = self.last_run.unwrap_or(self.anchor);
        now.duration_since(since) >= self.interval
    }

    /// Records an invocation as started at `now`. Intervals are measured
    /// start-to-start, so a slow job does not stretch the schedule beyond
    /// the tick drift it already causes.
    pub fn mark_run(&mut self, now: Instant) {
        self.last_run = Some(now);
    }

    /// Runs the job forever on the configured interval. Never returns.
    pub fn run<F: FnMut()>(&mut self, mut job: F) -> ! {
        info!(
            "Scheduler started: interval {}s, tick {}s",
            self.interval.as_secs(),
            TICK.as_secs()
        );

        loop {
            let now = Instant::now();
            if self.due(now) {
                self.mark_run(now);
                job();
            }
            thread::sleep(TICK);
        }
    }
}
