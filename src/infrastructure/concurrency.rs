/// Concurrency management for shader discovery.
/// Sizes the rayon pool used for parsing and for independent discovery sessions.

use anyhow::Result;
use tracing::info;

/// Worker count for `ratio` of the available cores, at least one.
pub fn worker_count(cores: usize, ratio: f64) -> usize {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 1.0 };
    std::cmp::max(1, (cores as f64 * ratio).floor() as usize)
}

/// Initialize the global rayon thread pool with `ratio` of the CPU cores.
pub fn init_thread_pool(ratio: f64) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = worker_count(cores, ratio);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    info!(workers, cores, "initialized thread pool");

    Ok(workers)
}
