//! Host resource telemetry.

use core::{
    fmt::{self, Display, Formatter},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use std::sync::Arc;

pub use self::{
    net::{InterfaceCounters, InterfaceDelta, NetworkSnapshot},
    probe::SysinfoProbe,
};

mod net;
mod probe;

/// Telemetry sampling interval.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Source of host resource usage.
pub trait Probe {
    /// Samples CPU, memory, load average and network counters.
    fn sample(&mut self) -> HostSample;
    /// Captures network counters only.
    fn network(&mut self) -> NetworkSnapshot;
}

/// Single telemetry sample.
///
/// Fields the probe failed to read are `None`.
#[derive(Debug, Clone)]
pub struct HostSample {
    /// CPU usage in percent, across all cores.
    pub cpu: f32,
    /// Used memory in percent.
    pub mem: Option<f64>,
    /// 1-minute load average.
    pub load1: Option<f64>,
    pub net: NetworkSnapshot,
}

impl Display for HostSample {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "CPU: {:.2}%", self.cpu)?;
        match self.mem {
            Some(v) => write!(f, " Mem: {v:.2}%")?,
            None => write!(f, " Mem: n/a")?,
        }
        match self.load1 {
            Some(v) => write!(f, " Load: {v:.2}"),
            None => write!(f, " Load: n/a"),
        }
    }
}

/// Periodic telemetry sampler.
///
/// Retains the previous network snapshot as the baseline for computing
/// per-interface throughput.
#[derive(Debug)]
pub struct Sampler<P> {
    probe: P,
    interval: Duration,
    is_running: Arc<AtomicBool>,
    prev: NetworkSnapshot,
}

impl<P> Sampler<P>
where
    P: Probe,
{
    /// Constructs a new [`Sampler`], capturing the initial network snapshot.
    pub fn new(mut probe: P, interval: Duration, is_running: Arc<AtomicBool>) -> Self {
        let prev = probe.network();

        Self {
            probe,
            interval,
            is_running,
            prev,
        }
    }

    pub async fn run(mut self) {
        while self.is_running.load(Ordering::Relaxed) {
            tokio::time::sleep(self.interval).await;
            self.tick();
        }
    }

    /// Takes a single sample, logs it and replaces the baseline.
    ///
    /// Returns traffic of non-idle interfaces since the previous tick.
    fn tick(&mut self) -> Vec<InterfaceDelta> {
        let sample = self.probe.sample();
        log::info!("{sample}");

        let deltas = sample.net.delta(&self.prev);
        for delta in &deltas {
            log::info!("{delta}");
        }

        self.prev = sample.net;

        deltas
    }
}
