use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use cpi_rs::{
    read_partition_file, CompressionStats, EngineConfig, PredecessorIndex, RankBitVector,
    RunLengthCompression, SortedPositions, DEFAULT_STAGING_CAPACITY,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Benchmark tool for representations of compressed partition indices.
#[derive(Parser)]
#[command(name = "cpi-benchmark")]
#[command(version)]
struct Cli {
    /// Path to the partition file (node count, then one partition id per line)
    input: PathBuf,

    /// How the engine is filled
    #[arg(long, value_enum, default_value_t = Mode::Batch)]
    mode: Mode,

    /// Predecessor index backing the compressed region
    #[arg(long, value_enum, default_value_t = IndexKind::Sorted)]
    index: IndexKind,

    /// Runs buffered between consolidations in streaming mode
    #[arg(long, default_value_t = DEFAULT_STAGING_CAPACITY)]
    staging_capacity: usize,

    /// Number of pseudo-random point queries to time
    #[arg(long, default_value_t = 1_000_000)]
    queries: usize,

    /// Check every position against the input
    #[arg(long)]
    verify: bool,

    /// Print statistics as JSON instead of a RESULT line
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Batch,
    Streaming,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexKind {
    Sorted,
    Bitvector,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Batch => "batch",
            Mode::Streaming => "streaming",
        }
    }
}

impl IndexKind {
    fn name(self) -> &'static str {
        match self {
            IndexKind::Sorted => "sorted",
            IndexKind::Bitvector => "bitvector",
        }
    }
}

struct Timings {
    construction_secs: f64,
    query_nanos: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::new().with_staging_capacity(cli.staging_capacity);
    config.validate()?;

    let partition = read_partition_file::<u16, _>(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!(
        nodes = partition.nodes,
        read = partition.partition_ids.len(),
        "loaded partition file"
    );

    let (stats, timings) = match cli.index {
        IndexKind::Sorted => run::<SortedPositions>(&cli, config, &partition.partition_ids)?,
        IndexKind::Bitvector => run::<RankBitVector>(&cli, config, &partition.partition_ids)?,
    };

    if cli.json {
        let report = serde_json::json!({
            "algorithm": "rlc",
            "input": file_name(&cli),
            "mode": cli.mode.name(),
            "index": cli.index.name(),
            "stats": stats,
            "average_run_length": stats.average_run_length(),
            "relative_percentage": stats.relative_percentage(),
            "construction_secs": timings.construction_secs,
            "query_nanos": timings.query_nanos,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "RESULT algorithm=rlc input={} mode={} index={} {} construction_secs={:.6} query_nanos={:.2}",
            file_name(&cli),
            cli.mode.name(),
            cli.index.name(),
            stats,
            timings.construction_secs,
            timings.query_nanos
        );
    }

    Ok(())
}

fn run<I: PredecessorIndex>(
    cli: &Cli,
    config: EngineConfig,
    input: &[u16],
) -> Result<(CompressionStats, Timings)> {
    let start = Instant::now();
    let rlc = match cli.mode {
        Mode::Batch => RunLengthCompression::<u16, I>::from_slice_with_config(input, config)?,
        Mode::Streaming => {
            let mut rlc = RunLengthCompression::<u16, I>::with_config(config)?;
            rlc.extend(input.iter().copied());
            rlc
        }
    };
    let construction_secs = start.elapsed().as_secs_f64();

    if cli.verify {
        for (i, &expected) in input.iter().enumerate() {
            let actual = *rlc.try_get(i)?;
            if actual != expected {
                bail!("mismatch at position {i}: expected {expected}, got {actual}");
            }
        }
        info!(positions = input.len(), "verified all positions");
    }

    let query_nanos = time_queries(&rlc, cli.queries);
    Ok((
        rlc.stats(),
        Timings {
            construction_secs,
            query_nanos,
        },
    ))
}

/// Average nanoseconds per random access over a fixed pseudo-random sequence.
fn time_queries<I: PredecessorIndex>(rlc: &RunLengthCompression<u16, I>, queries: usize) -> f64 {
    if rlc.is_empty() || queries == 0 {
        return 0.0;
    }
    let mut seed = 12345u64;
    let mut checksum = 0u64;

    let start = Instant::now();
    for _ in 0..queries {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let index = query_index(seed, rlc.len());
        checksum = checksum.wrapping_add(rlc[index] as u64);
    }
    let elapsed = start.elapsed();

    std::hint::black_box(checksum);
    elapsed.as_nanos() as f64 / queries as f64
}

/// Maps the generator state onto `0..len`, folding the high half into the
/// low bits so every position of a large input is reachable.
#[inline]
fn query_index(seed: u64, len: usize) -> usize {
    ((seed ^ (seed >> 32)) % len as u64) as usize
}

fn file_name(cli: &Cli) -> String {
    cli.input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_index_in_range() {
        for seed in [0, 1, 12345, u64::MAX, 1 << 40] {
            assert!(query_index(seed, 7) < 7);
        }
        assert_eq!(query_index(u64::MAX, 1), 0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_query_index_reaches_past_2_pow_31() {
        let len = 1usize << 34;
        let mut seed = 12345u64;
        let mut highest = 0;
        for _ in 0..64 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            highest = highest.max(query_index(seed, len));
        }
        assert!(highest >= 1 << 31, "highest index {highest}");
    }
}
