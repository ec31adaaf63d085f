//! Command line interface definitions for both tools.
//!
//! Both tools take single-letter flags. Parsing only checks that every value
//! is a well-formed number; range checks live in `validate` so they can
//! report a domain-specific message.

use std::path::PathBuf;

use clap::Parser;
use placebench_core::{BlockSize, Error, Result, Window};
use placebench_placement::MAX_REPLICATION;

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text.
    #[default]
    Text,
    /// JSON for scripting.
    Json,
}

/// Simulate placing a synthetic object population on a heterogeneous fleet.
#[derive(Debug, Parser)]
#[command(name = "placement-benchmark")]
#[command(author, version, about, long_about = None)]
pub struct BenchmarkArgs {
    /// Number of servers.
    #[arg(short = 's', value_name = "N")]
    pub servers: usize,

    /// Number of devices per server.
    #[arg(short = 'd', value_name = "N")]
    pub devices: usize,

    /// Number of objects.
    #[arg(short = 'o', value_name = "N")]
    pub objects: usize,

    /// Replication factor.
    #[arg(short = 'r', value_name = "N")]
    pub replication: usize,

    /// Placement algorithm (static_modulo, ring, crush).
    #[arg(short = 'p', value_name = "NAME")]
    pub algorithm: String,

    /// Virtual nodes per physical node.
    #[arg(short = 'v', value_name = "N")]
    pub virtual_nodes: usize,

    /// Block size in KB (1 KB = 1000 bytes).
    #[arg(short = 'b', value_name = "KB")]
    pub block_kb: u64,

    /// Selector window size.
    #[arg(short = 'e', value_name = "N")]
    pub window: usize,

    /// Worker threads.
    #[arg(short = 't', value_name = "N")]
    pub threads: usize,

    /// Path to a TOML configuration file.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Include per-device detail in the report.
    #[arg(long = "devices")]
    pub device_detail: bool,
}

impl BenchmarkArgs {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first offending flag.
    pub fn validate(&self) -> Result<()> {
        check_replication(self.replication, self.replication)?;
        check_servers(self.servers, self.replication)?;
        if self.devices == 0 {
            return Err(Error::invalid_argument("-d: at least one device per server is required"));
        }
        if self.objects == 0 {
            return Err(Error::invalid_argument("-o: at least one object is required"));
        }
        check_virtual_nodes(self.virtual_nodes)?;
        BlockSize::from_kb(self.block_kb)
            .map_err(|e| Error::invalid_argument(format!("-b: {e}")))?;
        Window::new(self.window).map_err(|e| Error::invalid_argument(format!("-e: {e}")))?;
        if self.threads == 0 {
            return Err(Error::invalid_argument("-t: at least one thread is required"));
        }
        Ok(())
    }
}

/// Count the replicas that would move if one server failed.
#[derive(Debug, Parser)]
#[command(name = "decluster-check")]
#[command(author, version, about, long_about = None)]
pub struct DeclusterArgs {
    /// Number of servers.
    #[arg(short = 's', value_name = "N")]
    pub servers: usize,

    /// Number of objects.
    #[arg(short = 'o', value_name = "N")]
    pub objects: usize,

    /// Replication factor.
    #[arg(short = 'r', value_name = "N")]
    pub replication: usize,

    /// Placement algorithm (static_modulo, ring, crush).
    #[arg(short = 'p', value_name = "NAME")]
    pub algorithm: String,

    /// Virtual nodes per physical node.
    #[arg(short = 'v', value_name = "N")]
    pub virtual_nodes: usize,

    /// Index of the server to fail.
    #[arg(short = 'k', value_name = "INDEX")]
    pub kill: usize,

    /// Seed for object ids and hash salt. Overrides the configuration.
    ///
    /// Negative seeds are accepted and reinterpreted as their two's
    /// complement bit pattern.
    #[arg(short = 'z', value_name = "SEED", allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Path to a TOML configuration file.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl DeclusterArgs {
    /// The `-z` seed as the unsigned value the generators take.
    #[must_use]
    pub fn seed_bits(&self) -> Option<u64> {
        self.seed.map(|seed| seed as u64)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first offending flag.
    pub fn validate(&self) -> Result<()> {
        // One extra candidate per object is requested for the spillover.
        check_replication(self.replication, self.replication + 1)?;
        check_servers(self.servers, self.replication)?;
        if self.objects == 0 {
            return Err(Error::invalid_argument("-o: at least one object is required"));
        }
        check_virtual_nodes(self.virtual_nodes)?;
        if self.kill >= self.servers {
            return Err(Error::invalid_argument(format!(
                "-k: server {} does not exist, there are {} servers",
                self.kill, self.servers
            )));
        }
        Ok(())
    }
}

fn check_replication(replication: usize, queried: usize) -> Result<()> {
    if replication < 2 {
        return Err(Error::invalid_argument("-r: replication factor must be at least 2"));
    }
    if queried > MAX_REPLICATION {
        return Err(Error::invalid_argument(format!(
            "-r: at most {MAX_REPLICATION} candidates per object are supported"
        )));
    }
    Ok(())
}

fn check_servers(servers: usize, replication: usize) -> Result<()> {
    if servers < replication + 1 {
        return Err(Error::invalid_argument(format!(
            "-s: need at least {} servers for {replication} replicas plus a spare, got {servers}",
            replication + 1
        )));
    }
    Ok(())
}

fn check_virtual_nodes(virtual_nodes: usize) -> Result<()> {
    if virtual_nodes == 0 {
        return Err(Error::invalid_argument("-v: at least one virtual node is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse a valid benchmark command line with some flags replaced.
    fn benchmark(overrides: &[(&str, &str)]) -> BenchmarkArgs {
        let mut flags = vec![
            ("-s", "10"),
            ("-d", "4"),
            ("-o", "1000"),
            ("-r", "3"),
            ("-p", "ring"),
            ("-v", "8"),
            ("-b", "4"),
            ("-e", "5"),
            ("-t", "4"),
        ];
        for &(flag, value) in overrides {
            match flags.iter_mut().find(|(f, _)| *f == flag) {
                Some(entry) => entry.1 = value,
                None => flags.push((flag, value)),
            }
        }
        let argv = std::iter::once("placement-benchmark")
            .chain(flags.into_iter().flat_map(|(f, v)| [f, v]));
        BenchmarkArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_benchmark_defaults() {
        let args = benchmark(&[]);
        assert!(args.validate().is_ok());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.device_detail);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_window_below_minimum() {
        let args = benchmark(&[("-e", "2")]);
        assert_eq!(args.window, 2);
        assert!(args.validate().unwrap_err().to_string().contains("-e"));
    }

    #[test]
    fn test_optional_flags() {
        let args = BenchmarkArgs::try_parse_from([
            "placement-benchmark", "-s", "4", "-d", "1", "-o", "1", "-r", "2", "-p", "crush", "-v",
            "1", "-b", "1", "-e", "3", "-t", "1", "--format", "json", "--devices", "-c", "x.toml",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.device_detail);
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_benchmark_ranges() {
        for (flag, value) in
            [("-r", "1"), ("-s", "3"), ("-d", "0"), ("-o", "0"), ("-v", "0"), ("-b", "0"), ("-t", "0")]
        {
            let err = benchmark(&[(flag, value)]).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
            assert!(err.to_string().contains(flag), "{flag}: {err}");
        }
    }

    #[test]
    fn test_block_size_overflow_is_rejected() {
        let args = benchmark(&[("-b", "18446744073709552")]);
        let err = args.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("-b"), "{err}");
        assert!(benchmark(&[("-b", "18446744073709551")]).validate().is_ok());
    }

    #[test]
    fn test_replication_ceiling() {
        let args = benchmark(&[("-r", "17"), ("-s", "40")]);
        assert!(args.validate().is_err());
        let args = benchmark(&[("-r", "16"), ("-s", "40")]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_negative_seed() {
        let args = DeclusterArgs::try_parse_from([
            "decluster-check", "-s", "4", "-o", "10", "-r", "2", "-p", "ring", "-v", "1", "-k",
            "0", "-z", "-1",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(-1));
        assert_eq!(args.seed_bits(), Some(u64::MAX));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_decluster_replication_ceiling_counts_spillover() {
        let args = DeclusterArgs::try_parse_from([
            "decluster-check", "-s", "40", "-o", "10", "-r", "16", "-p", "ring", "-v", "1", "-k",
            "0",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }
}
