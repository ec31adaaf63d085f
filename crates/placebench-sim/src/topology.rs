//! Topology model: servers owning devices sampled from a catalog.
//!
//! The shape of a topology (server count, devices per server, each device's
//! tier) is fixed at construction. Only the load fields (remaining capacity,
//! workload, assignment counters) change during a simulation.
//!
//! Remaining capacity is deliberately not clamped. Sustained overload drives
//! it negative and the selector sees the negative headroom as a penalty.

use placebench_core::{BlockSize, DeviceCatalog, DeviceTier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SimError};

/// A storage device inside a server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    /// Position within the owning server.
    pub index: usize,
    /// Catalog tier this device was sampled from.
    pub tier: usize,
    /// Capacity in bytes.
    pub capacity: f64,
    /// Capacity left in bytes. May go negative.
    pub remaining: f64,
    /// Bandwidth in bytes per second.
    pub bandwidth: f64,
    /// Accumulated workload units.
    pub workload: f64,
    /// Latency in microseconds.
    pub latency_us: f64,
    /// Endurance rating copied from the tier.
    pub endurance: u64,
    /// Number of replicas written to this device.
    pub assignments: u64,
}

impl Device {
    fn from_tier(index: usize, tier: usize, spec: &DeviceTier) -> Self {
        Self {
            index,
            tier,
            capacity: spec.capacity,
            remaining: spec.capacity,
            bandwidth: spec.bandwidth,
            workload: 0.0,
            latency_us: spec.latency_us,
            endurance: spec.endurance,
            assignments: 0,
        }
    }

    /// Seconds needed to stream one block at this device's bandwidth.
    #[must_use]
    pub fn transfer_time(&self, block: BlockSize) -> f64 {
        block.as_f64() / self.bandwidth
    }

    /// Used fraction of capacity as a percentage.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        (self.capacity - self.remaining) / self.capacity * 100.0
    }

    fn record_write(&mut self, block: BlockSize) {
        self.assignments += 1;
        self.remaining -= block.as_f64();
        self.workload += block.workload_units();
    }
}

/// A server (node) owning a fixed set of devices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    /// Server index.
    pub index: usize,
    /// Owned devices.
    pub devices: Vec<Device>,
    /// Sum of device capacities in bytes.
    pub capacity: f64,
    /// Capacity left in bytes. May go negative.
    pub remaining: f64,
    /// Mean device bandwidth in bytes per second.
    pub performance: f64,
    /// Accumulated workload units.
    pub workload: f64,
    /// Number of replicas written to this server.
    pub assignments: u64,
    /// Replica writes per catalog tier, attributed by device latency.
    pub tier_assignments: Vec<u64>,
}

impl Server {
    fn new(index: usize, devices: Vec<Device>, tiers: usize) -> Self {
        let capacity: f64 = devices.iter().map(|d| d.capacity).sum();
        let performance =
            devices.iter().map(|d| d.bandwidth).sum::<f64>() / devices.len() as f64;
        Self {
            index,
            devices,
            capacity,
            remaining: capacity,
            performance,
            workload: 0.0,
            assignments: 0,
            tier_assignments: vec![0; tiers],
        }
    }

    /// Number of owned devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Number of owned devices per catalog tier.
    #[must_use]
    pub fn tier_population(&self) -> Vec<usize> {
        let mut counts = vec![0; self.tier_assignments.len()];
        for device in &self.devices {
            counts[device.tier] += 1;
        }
        counts
    }

    /// Used fraction of capacity as a percentage.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        (self.capacity - self.remaining) / self.capacity * 100.0
    }

    fn record_write(&mut self, block: BlockSize) {
        self.assignments += 1;
        self.remaining -= block.as_f64();
        self.workload += block.workload_units();
    }
}

/// The whole fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    servers: Vec<Server>,
    devices_per_server: usize,
    #[serde(skip)]
    catalog: DeviceCatalog,
}

impl Topology {
    /// Build a topology by sampling every device's tier uniformly from
    /// `catalog` with a generator seeded by `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no servers, no devices per server, or
    /// the catalog is invalid.
    pub fn generate(
        servers: usize,
        devices_per_server: usize,
        catalog: &DeviceCatalog,
        seed: u64,
    ) -> Result<Self> {
        if servers == 0 {
            return Err(SimError::InvalidTopology("at least one server is required".into()));
        }
        if devices_per_server == 0 {
            return Err(SimError::InvalidTopology(
                "at least one device per server is required".into(),
            ));
        }
        catalog.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let servers = (0..servers)
            .map(|index| {
                let devices = (0..devices_per_server)
                    .map(|d| {
                        let tier = rng.gen_range(0..catalog.len());
                        Device::from_tier(d, tier, &catalog.tiers[tier])
                    })
                    .collect();
                Server::new(index, devices, catalog.len())
            })
            .collect::<Vec<_>>();

        debug!(servers = servers.len(), devices_per_server, seed, "Generated topology");
        Ok(Self { servers, devices_per_server, catalog: catalog.clone() })
    }

    /// All servers in index order.
    #[must_use]
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Number of servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns true if there are no servers. Never true for a generated topology.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Devices owned by each server.
    #[must_use]
    pub fn devices_per_server(&self) -> usize {
        self.devices_per_server
    }

    /// The catalog the topology was sampled from.
    #[must_use]
    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    /// Account one replica write against `server`.
    ///
    /// # Panics
    ///
    /// Panics if `server` is out of range.
    pub fn record_server_write(&mut self, server: usize, block: BlockSize) {
        self.servers[server].record_write(block);
    }

    /// Account one replica write against `device` of `server` and return the
    /// time the block takes at that device's bandwidth.
    ///
    /// The write is attributed to a tier by matching the device's latency
    /// against the catalog.
    ///
    /// # Panics
    ///
    /// Panics if `server` or `device` is out of range.
    pub fn record_device_write(&mut self, server: usize, device: usize, block: BlockSize) -> f64 {
        let server = &mut self.servers[server];
        let target = &mut server.devices[device];
        let cost = target.transfer_time(block);
        if let Some(tier) = self.catalog.tier_by_latency(target.latency_us) {
            server.tier_assignments[tier] += 1;
        }
        target.record_write(block);
        cost
    }

    /// Sum over servers of capacity (GB) times performance (MB/s).
    ///
    /// Used to compute each server's ideal share of replicas.
    #[must_use]
    pub fn weighted_capacity_total(&self) -> f64 {
        self.servers.iter().map(|s| s.capacity / 1e9 * s.performance / 1e6).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_capacity_is_device_sum() {
        let topology = Topology::generate(8, 5, &DeviceCatalog::default(), 123).unwrap();
        for server in topology.servers() {
            let sum: f64 = server.devices.iter().map(|d| d.capacity).sum();
            assert_eq!(server.capacity, sum);
            assert_eq!(server.remaining, sum);
            let mean = server.devices.iter().map(|d| d.bandwidth).sum::<f64>() / 5.0;
            assert_eq!(server.performance, mean);
            assert_eq!(server.device_count(), 5);
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let catalog = DeviceCatalog::default();
        let a = Topology::generate(16, 4, &catalog, 9).unwrap();
        let b = Topology::generate(16, 4, &catalog, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_devices_copy_tier_fields() {
        let catalog = DeviceCatalog::default();
        let topology = Topology::generate(4, 6, &catalog, 1).unwrap();
        for device in topology.servers().iter().flat_map(|s| &s.devices) {
            let tier = &catalog.tiers[device.tier];
            assert_eq!(device.capacity, tier.capacity);
            assert_eq!(device.bandwidth, tier.bandwidth);
            assert_eq!(device.latency_us, tier.latency_us);
            assert_eq!(device.endurance, tier.endurance);
            assert_eq!(device.workload, 0.0);
            assert_eq!(device.assignments, 0);
        }
    }

    #[test]
    fn test_all_tiers_sampled() {
        let topology = Topology::generate(32, 8, &DeviceCatalog::default(), 123).unwrap();
        let mut seen = [false; 3];
        for device in topology.servers().iter().flat_map(|s| &s.devices) {
            seen[device.tier] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_empty_shapes_rejected() {
        let catalog = DeviceCatalog::default();
        assert!(Topology::generate(0, 4, &catalog, 0).is_err());
        assert!(Topology::generate(4, 0, &catalog, 0).is_err());
    }

    #[test]
    fn test_record_writes() {
        let mut topology = Topology::generate(2, 2, &DeviceCatalog::default(), 5).unwrap();
        let block = BlockSize::from_kb(4).unwrap();
        let before = topology.servers()[1].clone();

        topology.record_server_write(1, block);
        let cost = topology.record_device_write(1, 0, block);

        let after = &topology.servers()[1];
        assert_eq!(after.assignments, 1);
        assert_eq!(after.remaining, before.remaining - 4000.0);
        assert!((after.workload - 0.4).abs() < 1e-12);
        assert_eq!(after.devices[0].assignments, 1);
        assert_eq!(after.devices[0].remaining, before.devices[0].remaining - 4000.0);
        assert_eq!(after.tier_assignments.iter().sum::<u64>(), 1);
        assert_eq!(after.tier_assignments[after.devices[0].tier], 1);
        assert_eq!(cost, 4000.0 / before.devices[0].bandwidth);
    }

    #[test]
    fn test_remaining_goes_negative_without_clamping() {
        let catalog = DeviceCatalog::new(vec![DeviceTier::new("tiny", 10_000.0, 1e6, 5.0, 1)])
            .unwrap();
        let mut topology = Topology::generate(1, 1, &catalog, 0).unwrap();
        let block = BlockSize::from_kb(4).unwrap();
        for _ in 0..5 {
            topology.record_server_write(0, block);
            topology.record_device_write(0, 0, block);
        }
        let server = &topology.servers()[0];
        assert_eq!(server.remaining, 10_000.0 - 20_000.0);
        assert_eq!(server.devices[0].remaining, -10_000.0);
        assert!(server.utilization() > 100.0);
    }

    #[test]
    fn test_tier_population() {
        let topology = Topology::generate(3, 7, &DeviceCatalog::default(), 77).unwrap();
        for server in topology.servers() {
            assert_eq!(server.tier_population().iter().sum::<usize>(), 7);
        }
    }
}
