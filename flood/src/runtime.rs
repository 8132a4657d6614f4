use core::{
    error::Error,
    sync::atomic::{AtomicBool, Ordering},
};
use std::{sync::Arc, thread::Builder};

use crate::{
    cfg::Config,
    engine::Engine,
    qps::{Accumulator, Reporter, REPORT_INTERVAL},
    sysstat::{Sampler, SysinfoProbe, SAMPLE_INTERVAL},
};

#[derive(Debug)]
pub struct Runtime {
    cfg: Config,
    is_running: Arc<AtomicBool>,
}

impl Runtime {
    pub fn new(cfg: Config) -> Self {
        let is_running = Arc::new(AtomicBool::new(true));

        Self { cfg, is_running }
    }

    /// Starts workers, the QPS reporter and the telemetry sampler.
    ///
    /// Blocks until all workers terminate, which never happens unless they
    /// fail to start.
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.log_config();

        let qps = Arc::new(Accumulator::new());

        let engine = {
            let engine = Engine::new(self.cfg.clone(), qps.clone());
            let is_running = self.is_running.clone();

            Builder::new().name("flood:engine".into()).spawn(move || {
                let rc = engine.run(is_running.clone());
                is_running.store(false, Ordering::SeqCst);
                rc
            })?
        };

        let reporter = Reporter::new(qps, REPORT_INTERVAL, self.is_running.clone());
        let sampler = Sampler::new(SysinfoProbe::new(), SAMPLE_INTERVAL, self.is_running.clone());
        tokio::join!(reporter.run(), sampler.run());

        engine.join().map_err(|_| "engine thread panicked")??;

        Ok(())
    }

    fn log_config(&self) {
        let request = &self.cfg.request;

        log::info!("Thread: {} URL: {}", self.cfg.threads, request.url());
        log::info!(
            "Method: {} PostData: {} Referer: {} X-Forwarded-For: {}",
            request.method(),
            String::from_utf8_lossy(request.body()),
            request.referer().to_str().unwrap_or_default(),
            request.forwarded_for(),
        );
        log::debug!(
            "timeout: {:?}, retry delay: {:?}, TCP_NODELAY: {}",
            self.cfg.timeout,
            self.cfg.retry_delay,
            self.cfg.tcp_no_delay,
        );
    }
}
