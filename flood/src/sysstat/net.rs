use core::fmt::{self, Display, Formatter};

use crate::human::readable_bytes;

/// Cumulative byte counters of a single network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_rx: u64,
    pub bytes_tx: u64,
}

impl InterfaceCounters {
    pub fn new<N: Into<String>>(name: N, bytes_rx: u64, bytes_tx: u64) -> Self {
        Self {
            name: name.into(),
            bytes_rx,
            bytes_tx,
        }
    }
}

/// Point-in-time capture of per-interface byte counters.
///
/// Interfaces are kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    ifaces: Vec<InterfaceCounters>,
}

impl NetworkSnapshot {
    pub fn new(mut ifaces: Vec<InterfaceCounters>) -> Self {
        ifaces.sort_by(|a, b| a.name.cmp(&b.name));

        Self { ifaces }
    }

    #[inline]
    pub fn ifaces(&self) -> &[InterfaceCounters] {
        &self.ifaces
    }

    #[inline]
    fn get(&self, name: &str) -> Option<&InterfaceCounters> {
        self.ifaces
            .binary_search_by(|v| v.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.ifaces[idx])
    }

    /// Computes per-interface traffic since the given previous snapshot.
    ///
    /// Interfaces missing from the previous snapshot are skipped, as well as
    /// the ones whose counters went backwards, e.g. after a reset. Idle
    /// interfaces are omitted.
    pub fn delta(&self, prev: &NetworkSnapshot) -> Vec<InterfaceDelta> {
        let mut deltas = Vec::new();

        for curr in &self.ifaces {
            let Some(prev) = prev.get(&curr.name) else {
                continue;
            };

            let (Some(rx), Some(tx)) = (
                curr.bytes_rx.checked_sub(prev.bytes_rx),
                curr.bytes_tx.checked_sub(prev.bytes_tx),
            ) else {
                log::debug!("counters of '{}' went backwards, skipping", curr.name);
                continue;
            };

            if rx == 0 && tx == 0 {
                continue;
            }

            deltas.push(InterfaceDelta {
                name: curr.name.clone(),
                bytes_rx: rx,
                bytes_tx: tx,
            });
        }

        deltas
    }
}

/// Traffic of a single interface between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDelta {
    pub name: String,
    pub bytes_rx: u64,
    pub bytes_tx: u64,
}

impl Display for InterfaceDelta {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "Nic: {} ↓ {} | ↑ {}",
            self.name,
            readable_bytes(self.bytes_rx),
            readable_bytes(self.bytes_tx)
        )
    }
}
