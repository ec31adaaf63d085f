//! Benchmark and failure-analysis reports.
//!
//! Reports are plain data built from the final state of a run. They
//! serialize with serde for JSON output and implement [`Display`] for the
//! line-oriented text format.

use std::fmt::{self, Display};

use placebench_core::BlockSize;
use serde::Serialize;

use crate::decluster::FailureHistogram;
use crate::engine::SimulationOutcome;
use crate::topology::{Device, Server, Topology};

const GB: f64 = 1e9;
const MB: f64 = 1e6;

/// Per-device detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    /// Device index within its server.
    pub index: usize,
    /// Catalog tier name.
    pub tier: String,
    /// Capacity in GB.
    pub capacity_gb: f64,
    /// Remaining capacity in GB. May be negative.
    pub remaining_gb: f64,
    /// Bandwidth in MB/s.
    pub bandwidth_mbps: f64,
    /// Raw workload units.
    pub workload: f64,
    /// Latency in microseconds.
    pub latency_us: f64,
    /// Replicas written.
    pub assignments: u64,
}

impl DeviceSummary {
    fn new(device: &Device, tier: String) -> Self {
        Self {
            index: device.index,
            tier,
            capacity_gb: device.capacity / GB,
            remaining_gb: device.remaining / GB,
            bandwidth_mbps: device.bandwidth / MB,
            workload: device.workload,
            latency_us: device.latency_us,
            assignments: device.assignments,
        }
    }
}

/// Per-server summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSummary {
    /// Server index.
    pub index: usize,
    /// Capacity in GB.
    pub capacity_gb: f64,
    /// Remaining capacity in GB. May be negative.
    pub remaining_gb: f64,
    /// Mean device bandwidth in MB/s.
    pub performance_mbps: f64,
    /// Owned devices.
    pub devices: usize,
    /// Workload units scaled by 1e6.
    pub workload_mbps: f64,
    /// Replicas written.
    pub assignments: u64,
    /// Replicas this server would hold if placement followed capacity times
    /// performance exactly.
    pub ideal_share: f64,
    /// Owned devices per catalog tier.
    pub tier_devices: Vec<usize>,
    /// Replicas written per catalog tier.
    pub tier_assignments: Vec<u64>,
    /// Used capacity in percent.
    pub utilization_pct: f64,
    /// Device detail, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_detail: Option<Vec<DeviceSummary>>,
}

/// Run-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Bytes written: objects × replicas × block. Wide enough that the
    /// product never overflows.
    pub bytes: u128,
    /// Objects placed.
    pub objects: u64,
    /// Replicas per object.
    pub replication: usize,
    /// Wall-clock seconds for the whole run.
    pub time_algorithm: f64,
    /// Estimated distribution time in seconds.
    pub time_distribution: f64,
}

/// Result of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    /// Placement algorithm name.
    pub algorithm: String,
    /// One entry per server.
    pub servers: Vec<ServerSummary>,
    /// Run-wide totals.
    pub totals: Totals,
}

impl BenchmarkReport {
    /// Build a report from the final topology of a run.
    #[must_use]
    pub fn new(
        algorithm: impl Into<String>,
        topology: &Topology,
        objects: usize,
        replication: usize,
        block: BlockSize,
        outcome: &SimulationOutcome,
        with_devices: bool,
    ) -> Self {
        let weighted_total = topology.weighted_capacity_total();
        let replicas = objects as f64 * replication as f64;
        let servers = topology
            .servers()
            .iter()
            .map(|server| {
                let weight = server.capacity / GB * server.performance / MB;
                let device_detail = with_devices.then(|| device_detail(topology, server));
                ServerSummary {
                    index: server.index,
                    capacity_gb: server.capacity / GB,
                    remaining_gb: server.remaining / GB,
                    performance_mbps: server.performance / MB,
                    devices: server.device_count(),
                    workload_mbps: server.workload / MB,
                    assignments: server.assignments,
                    ideal_share: weight / weighted_total * replicas,
                    tier_devices: server.tier_population(),
                    tier_assignments: server.tier_assignments.clone(),
                    utilization_pct: server.utilization(),
                    device_detail,
                }
            })
            .collect();

        Self {
            algorithm: algorithm.into(),
            servers,
            totals: Totals {
                bytes: objects as u128 * replication as u128 * u128::from(block.bytes()),
                objects: objects as u64,
                replication,
                time_algorithm: outcome.elapsed.as_secs_f64(),
                time_distribution: outcome.distribution_time,
            },
        }
    }
}

fn device_detail(topology: &Topology, server: &Server) -> Vec<DeviceSummary> {
    server
        .devices
        .iter()
        .map(|device| {
            let tier = topology
                .catalog()
                .tier(device.tier)
                .map_or_else(|| device.tier.to_string(), |t| t.name.clone());
            DeviceSummary::new(device, tier)
        })
        .collect()
}

impl Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Placement algorithm: {}", self.algorithm)?;
        for server in &self.servers {
            writeln!(f, "server_index:{}", server.index)?;
            writeln!(f, " capacity:{:.1} GB", server.capacity_gb)?;
            writeln!(f, " remain:{:.1} GB", server.remaining_gb)?;
            writeln!(f, " perform:{:.0} MBps", server.performance_mbps)?;
            writeln!(f, " num_device:{}", server.devices)?;
            writeln!(f, " workload:{:.1} MBps", server.workload_mbps)?;
            writeln!(f, " datacount:{}", server.assignments)?;
            writeln!(f, " ideal_count:{:.0}", server.ideal_share)?;
            for (tier, (owned, count)) in
                server.tier_devices.iter().zip(&server.tier_assignments).enumerate()
            {
                writeln!(f, " device{}_num:{owned}", tier + 1)?;
                writeln!(f, " device{}_count:{count}", tier + 1)?;
            }
            writeln!(f, " used_rate(%):{:.2}", server.utilization_pct)?;
            for device in server.device_detail.iter().flatten() {
                writeln!(
                    f,
                    "  device_index:{}\ttier:{}\tcapacity:{:.1} GB\tremain:{:.1} GB\t\
                     bandwidth:{:.0} MBps\tworkload:{:.1}\tlatency:{:.0} us\tdatacount:{}",
                    device.index,
                    device.tier,
                    device.capacity_gb,
                    device.remaining_gb,
                    device.bandwidth_mbps,
                    device.workload,
                    device.latency_us,
                    device.assignments,
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f, "total_byte_count:{}", self.totals.bytes)?;
        writeln!(f, "total_obj_count:{}", self.totals.objects)?;
        writeln!(f, "time_algorithm={:.6}", self.totals.time_algorithm)?;
        writeln!(f, "time_distribution={:.6}", self.totals.time_distribution)
    }
}

/// Result of a failure analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclusterReport {
    /// Placement algorithm name.
    pub algorithm: String,
    /// The histogram.
    #[serde(flatten)]
    pub histogram: FailureHistogram,
}

impl DeclusterReport {
    /// Wrap a histogram.
    #[must_use]
    pub fn new(algorithm: impl Into<String>, histogram: FailureHistogram) -> Self {
        Self { algorithm: algorithm.into(), histogram }
    }
}

impl Display for DeclusterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.histogram;
        writeln!(f, "# Simulating failure of server {} out of {}", h.failed_server, h.servers())?;
        writeln!(f, "# Total objects: {}", h.objects)?;
        writeln!(f, "# <svr_idx>\t<num new replicas>")?;
        for (index, count) in h.counts.iter().enumerate() {
            writeln!(f, "{index}\t{count}")?;
        }
        Ok(())
    }
}
