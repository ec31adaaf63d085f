//! End-to-end pipelines behind the two tools.

use std::fmt::Display;
use std::num::NonZeroUsize;
use std::thread;

use anyhow::{Context, Result};
use placebench_core::{BlockSize, Config, Window};
use placebench_placement::PlacementAlgorithm;
use placebench_sim::{
    BenchmarkReport, DeclusterReport, FailureAnalyzer, ObjectPopulation, SimulationConfig,
    SimulationEngine, Topology,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{BenchmarkArgs, DeclusterArgs, OutputFormat};
use crate::{init_logging, load_config};

const MIB: usize = 1024 * 1024;

/// Run the placement benchmark described by `args` and `config`.
///
/// # Errors
///
/// Fails on an unknown placement algorithm or any setup or simulation error.
pub fn benchmark(args: &BenchmarkArgs, config: &Config) -> Result<BenchmarkReport> {
    let algorithm: PlacementAlgorithm = args.algorithm.parse()?;
    let placement = algorithm
        .build(args.virtual_nodes, config.seeds.placement)
        .context("Failed to set up placement")?;

    let mut topology =
        Topology::generate(args.servers, args.devices, &config.catalog, config.seeds.topology)?;

    info!(objects = args.objects, "Generating random object IDs");
    let mut population =
        ObjectPopulation::random(args.objects, args.replication, config.seeds.objects);
    info!(footprint_mib = population.footprint_bytes() / MIB, "Object population ready");

    let block = BlockSize::from_kb(args.block_kb)?;
    let sim_config = SimulationConfig {
        replication: args.replication,
        window: Window::new(args.window)?,
        block,
        threads: NonZeroUsize::new(args.threads).context("At least one thread is required")?,
    };

    info!(%algorithm, servers = args.servers, threads = args.threads, "Calculating placement");
    let outcome = SimulationEngine::new(sim_config, placement).run(&mut topology, &mut population)?;

    Ok(BenchmarkReport::new(
        algorithm.as_str(),
        &topology,
        population.len(),
        args.replication,
        block,
        &outcome,
        args.device_detail,
    ))
}

/// Run the failure impact analysis described by `args` and `config`.
///
/// `-z`, when given, replaces both the object seed and the placement salt.
///
/// # Errors
///
/// Fails on an unknown placement algorithm or any analysis error.
pub fn decluster(args: &DeclusterArgs, config: &Config) -> Result<DeclusterReport> {
    let (object_seed, salt) = match args.seed_bits() {
        Some(seed) => (seed, seed),
        None => (config.seeds.objects, config.seeds.placement),
    };

    let algorithm: PlacementAlgorithm = args.algorithm.parse()?;
    let placement =
        algorithm.build(args.virtual_nodes, salt).context("Failed to set up placement")?;

    info!(objects = args.objects, "Generating random object IDs");
    let mut population = ObjectPopulation::random(args.objects, args.replication + 1, object_seed);
    info!(footprint_mib = population.footprint_bytes() / MIB, "Object population ready");

    let workers = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
    let histogram = FailureAnalyzer::new(placement, args.replication, workers).analyze(
        &mut population,
        args.servers,
        args.kill,
    )?;

    Ok(DeclusterReport::new(algorithm.as_str(), histogram))
}

/// Render a report in the requested format.
///
/// # Errors
///
/// Fails only if JSON serialization fails.
pub fn render<R: Serialize + Display>(report: &R, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            json
        }
    })
}

/// Entry point of `placement-benchmark` after flag validation.
///
/// # Errors
///
/// Propagates configuration, logging and simulation failures.
pub fn run_benchmark(args: &BenchmarkArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging)?;
    let report = benchmark(args, &config)?;
    print!("{}", render(&report, args.format)?);
    Ok(())
}

/// Entry point of `decluster-check` after flag validation.
///
/// # Errors
///
/// Propagates configuration, logging and analysis failures.
pub fn run_decluster(args: &DeclusterArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging)?;
    let report = decluster(args, &config)?;
    print!("{}", render(&report, args.format)?);
    Ok(())
}
