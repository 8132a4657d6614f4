use core::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Error;
use ::http::StatusCode;

use self::{
    http::{tls_connector, HttpIssuer, IssueError},
    runtime::ThreadPool,
    worker::Worker,
};
use crate::{cfg::Config, qps::Accumulator};

pub mod http;
mod runtime;
mod worker;

/// Single request capability.
pub(crate) trait Issue {
    /// Performs a single request, including draining the response body.
    async fn issue(&mut self) -> Result<StatusCode, IssueError>;
}

/// Runs the configured number of workers, each in its own thread.
#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    qps: Arc<Accumulator>,
}

impl Engine {
    pub fn new(cfg: Config, qps: Arc<Accumulator>) -> Self {
        Self { cfg, qps }
    }

    /// Runs workers until all of them stop.
    ///
    /// Under normal operation this never returns, because workers only stop
    /// when `is_running` is cleared.
    pub fn run(self, is_running: Arc<AtomicBool>) -> Result<(), Error> {
        let Self { cfg, qps } = self;

        let tls = match cfg.request.server_name() {
            Some(..) => Some(tls_connector()?),
            None => None,
        };

        let rt = ThreadPool::new(cfg.threads, |_tid: usize| {
            let spec = cfg.request.clone();
            let timeout = cfg.timeout;
            let tcp_no_delay = cfg.tcp_no_delay;
            let retry_delay = cfg.retry_delay;
            let qps = qps.clone();
            let is_running = is_running.clone();
            let tls = tls.clone();

            move || {
                let issuer = HttpIssuer::new(spec)
                    .with_timeout(timeout)
                    .with_tcp_no_delay(tcp_no_delay)
                    .with_tls(tls);
                let worker = Worker::new(issuer, qps, is_running).with_retry_delay(retry_delay);

                worker.run()
            }
        });

        rt.run()
    }
}
