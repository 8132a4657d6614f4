use core::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use std::sync::Arc;

use super::{
    http::{ErrorKind, IssueError},
    Issue,
};
use crate::qps::Accumulator;

/// Number of consecutive request build failures after which the worker warns
/// that it is spinning without producing any traffic.
pub const BUILD_ERROR_STREAK: u64 = 1000;

/// Unpaced per-task worker.
///
/// Issues requests back to back as fast as the target allows. Failures are
/// logged and retried immediately, unless a retry delay is configured. Every
/// attempt counts toward the QPS, whether it succeeded or not.
#[derive(Debug)]
pub struct Worker<I> {
    /// Request issuer.
    issuer: I,
    /// Shared request counter.
    qps: Arc<Accumulator>,
    /// Whether this worker is still active.
    is_running: Arc<AtomicBool>,
    /// Minimum delay before retrying a failed request.
    retry_delay: Option<Duration>,
    /// Number of consecutive request build failures.
    build_errors: u64,
}

impl<I> Worker<I> {
    pub fn new(issuer: I, qps: Arc<Accumulator>, is_running: Arc<AtomicBool>) -> Self {
        Self {
            issuer,
            qps,
            is_running,
            retry_delay: None,
            build_errors: 0,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Option<Duration>) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl<I> Worker<I>
where
    I: Issue,
{
    pub async fn run(mut self) {
        while self.is_running.load(Ordering::Relaxed) {
            self.execute().await;
        }
    }

    #[inline]
    async fn execute(&mut self) {
        let rc = self.issuer.issue().await;
        self.qps.add();

        match rc {
            Ok(code) => {
                self.build_errors = 0;
                log::trace!("response: {code}");
            }
            Err(err) => self.on_error(err).await,
        }
    }

    async fn on_error(&mut self, err: IssueError) {
        log::error!("{err}");

        if err.kind() == ErrorKind::RequestBuild {
            self.build_errors += 1;
            if self.build_errors == BUILD_ERROR_STREAK {
                log::warn!(
                    "request failed to build {BUILD_ERROR_STREAK} times in a row, the worker is spinning without \
                     sending anything"
                );
            }
        } else {
            self.build_errors = 0;
        }

        if let Some(delay) = self.retry_delay {
            tokio::time::sleep(delay).await;
        }
    }
}
