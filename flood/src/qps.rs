//! Request rate accounting.
//!
//! Workers register each attempt with the shared [`Accumulator`], while a
//! single [`Reporter`] periodically drains it and logs the rate.

use core::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use std::sync::Arc;

use parking_lot::Mutex;

/// QPS reporting interval.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Counts {
    /// Attempts folded by all previous drains.
    total: u64,
    /// Attempts registered since the last drain.
    pending: u64,
}

/// Shared request counter.
///
/// Both buckets live under a single lock, so that an attempt registered
/// concurrently with a drain is accounted either in this drain or in the next
/// one, but never in both or neither.
#[derive(Debug, Default)]
pub struct Accumulator {
    counts: Mutex<Counts>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single request attempt.
    #[inline]
    pub fn add(&self) {
        self.counts.lock().pending += 1;
    }

    /// Folds pending attempts into the total and resets them.
    ///
    /// Returns the number of attempts folded and the updated total.
    pub fn drain(&self) -> Drain {
        let mut counts = self.counts.lock();

        let interval = counts.pending;
        counts.total += interval;
        counts.pending = 0;

        Drain { interval, total: counts.total }
    }

    /// Returns the total number of attempts folded so far.
    ///
    /// Attempts registered since the last drain are not included.
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.lock().total
    }
}

/// Result of a single [`Accumulator::drain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drain {
    /// Attempts registered since the previous drain.
    pub interval: u64,
    /// Total attempts, including this interval.
    pub total: u64,
}

impl Drain {
    /// Returns the rate in requests per second, assuming the interval spans
    /// the given period.
    #[inline]
    pub fn rate(&self, period: Duration) -> f64 {
        let secs = period.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }

        self.interval as f64 / secs
    }
}

/// Periodic QPS reporter.
///
/// Ticks are spaced by sleeping for the whole interval, so a delayed tick is
/// not caught up.
#[derive(Debug)]
pub struct Reporter {
    qps: Arc<Accumulator>,
    interval: Duration,
    is_running: Arc<AtomicBool>,
}

impl Reporter {
    pub fn new(qps: Arc<Accumulator>, interval: Duration, is_running: Arc<AtomicBool>) -> Self {
        Self { qps, interval, is_running }
    }

    pub async fn run(self) {
        while self.is_running.load(Ordering::Relaxed) {
            tokio::time::sleep(self.interval).await;
            self.report();
        }
    }

    /// Drains the accumulator and logs the rate.
    fn report(&self) -> Drain {
        let drain = self.qps.drain();
        log::info!("QPS: {:.1} Total: {}", drain.rate(self.interval), drain.total);

        drain
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::*;

    #[test]
    fn test_drain_after_adds() {
        let qps = Accumulator::new();
        for _ in 0..42 {
            qps.add();
        }

        assert_eq!(Drain { interval: 42, total: 42 }, qps.drain());

        for _ in 0..8 {
            qps.add();
        }

        assert_eq!(Drain { interval: 8, total: 50 }, qps.drain());
        assert_eq!(50, qps.total());
    }

    #[test]
    fn test_drain_without_adds() {
        let qps = Accumulator::new();
        qps.add();
        qps.drain();

        assert_eq!(Drain { interval: 0, total: 1 }, qps.drain());
        assert_eq!(Drain { interval: 0, total: 1 }, qps.drain());
    }

    #[test]
    fn test_total_excludes_pending() {
        let qps = Accumulator::new();
        qps.add();
        qps.add();

        assert_eq!(0, qps.total());
        qps.drain();
        assert_eq!(2, qps.total());
    }

    #[test]
    fn test_concurrent_adds() {
        const NUM_THREADS: u64 = 8;
        const NUM_ADDS: u64 = 10_000;

        let qps = Accumulator::new();
        thread::scope(|s| {
            for _ in 0..NUM_THREADS {
                s.spawn(|| {
                    for _ in 0..NUM_ADDS {
                        qps.add();
                    }
                });
            }
        });

        let drain = qps.drain();
        assert_eq!(NUM_THREADS * NUM_ADDS, drain.interval);
        assert_eq!(NUM_THREADS * NUM_ADDS, drain.total);
    }

    #[test]
    fn test_concurrent_adds_and_drains() {
        const NUM_THREADS: u64 = 4;
        const NUM_ADDS: u64 = 10_000;

        let qps = Accumulator::new();
        let drained = thread::scope(|s| {
            for _ in 0..NUM_THREADS {
                s.spawn(|| {
                    for _ in 0..NUM_ADDS {
                        qps.add();
                    }
                });
            }

            let drainer = s.spawn(|| {
                let mut sum = 0;
                let mut prev = 0;
                for _ in 0..1000 {
                    let drain = qps.drain();
                    assert!(drain.total >= prev);
                    prev = drain.total;
                    sum += drain.interval;
                }
                sum
            });

            drainer.join().unwrap()
        });

        let drain = qps.drain();
        assert_eq!(NUM_THREADS * NUM_ADDS, drained + drain.interval);
        assert_eq!(NUM_THREADS * NUM_ADDS, drain.total);
    }

    #[test]
    fn test_rate() {
        let drain = Drain { interval: 50, total: 100 };

        assert_eq!(10.0, drain.rate(Duration::from_secs(5)));
        assert_eq!(0.0, drain.rate(Duration::ZERO));
    }

    #[test]
    fn test_report_drains() {
        let qps = Arc::new(Accumulator::new());
        for _ in 0..10 {
            qps.add();
        }

        let reporter = Reporter::new(qps.clone(), REPORT_INTERVAL, Arc::new(AtomicBool::new(true)));

        assert_eq!(Drain { interval: 10, total: 10 }, reporter.report());
        assert_eq!(Drain { interval: 0, total: 10 }, reporter.report());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_ticks() {
        let qps = Arc::new(Accumulator::new());
        let is_running = Arc::new(AtomicBool::new(true));
        let reporter = Reporter::new(qps.clone(), REPORT_INTERVAL, is_running.clone());
        let reporter = tokio::spawn(reporter.run());

        for _ in 0..7 {
            qps.add();
        }
        tokio::time::sleep(REPORT_INTERVAL + Duration::from_millis(1)).await;
        assert_eq!(7, qps.total());

        qps.add();
        tokio::time::sleep(REPORT_INTERVAL).await;
        assert_eq!(8, qps.total());

        is_running.store(false, Ordering::Relaxed);
        tokio::time::sleep(REPORT_INTERVAL).await;
        assert!(reporter.is_finished());
    }

    #[tokio::test]
    async fn test_reporter_stops_when_not_running() {
        let qps = Arc::new(Accumulator::new());
        qps.add();

        let reporter = Reporter::new(qps.clone(), REPORT_INTERVAL, Arc::new(AtomicBool::new(false)));
        reporter.run().await;

        assert_eq!(0, qps.total());
    }
}
