use sysinfo::{Networks, System};

use super::{
    net::{InterfaceCounters, NetworkSnapshot},
    HostSample, Probe,
};

/// Host probe backed by the `sysinfo` crate.
///
/// CPU usage is computed over the window between two consecutive samples, so
/// the very first sample may read zero.
pub struct SysinfoProbe {
    system: System,
    networks: Networks,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        // Establish the CPU usage baseline.
        system.refresh_cpu_usage();

        let networks = Networks::new_with_refreshed_list();

        Self { system, networks }
    }

    fn mem_used_percent(&self) -> Option<f64> {
        match self.system.total_memory() {
            0 => None,
            total => Some(self.system.used_memory() as f64 * 100.0 / total as f64),
        }
    }

    #[cfg(not(windows))]
    fn load_avg1() -> Option<f64> {
        Some(System::load_average().one)
    }

    #[cfg(windows)]
    fn load_avg1() -> Option<f64> {
        None
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for SysinfoProbe {
    fn sample(&mut self) -> HostSample {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        HostSample {
            cpu: self.system.global_cpu_usage(),
            mem: self.mem_used_percent(),
            load1: Self::load_avg1(),
            net: self.network(),
        }
    }

    fn network(&mut self) -> NetworkSnapshot {
        self.networks.refresh(true);

        let ifaces = self
            .networks
            .list()
            .iter()
            .map(|(name, data)| InterfaceCounters::new(name.as_str(), data.total_received(), data.total_transmitted()))
            .collect();

        NetworkSnapshot::new(ifaces)
    }
}
