//! Simulated workload
//!
//! Worker threads emit `log` records the way a running program would: unique
//! progress messages, a steady heartbeat that repeats verbatim and an
//! occasional failure with a multi-line context.

use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Shape of the simulated workload
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub workers: usize,
    pub jobs_per_worker: usize,
    pub job_duration: Duration,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            workers: 4,
            jobs_per_worker: 50,
            job_duration: Duration::from_millis(5),
        }
    }
}

/// Start the worker threads
pub fn spawn_workers(workload: Workload) -> Vec<JoinHandle<()>> {
    (0..workload.workers)
        .map(|worker| {
            thread::Builder::new()
                .name(format!("worker-{worker}"))
                .spawn(move || run_worker(worker, workload))
        })
        .filter_map(|spawned| match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to spawn worker: {}", e);
                None
            }
        })
        .collect()
}

fn run_worker(worker: usize, workload: Workload) {
    log::info!("Worker {} started", worker);
    for job in 0..workload.jobs_per_worker {
        thread::sleep(workload.job_duration);

        if job % 10 == 0 {
            log::warn!("Heartbeat late");
        }
        if job % 17 == 16 {
            log::error!(
                "Job {} failed: upstream timeout\nretry scheduled\nworker {}",
                job,
                worker
            );
            continue;
        }
        log::info!("Worker {} finished job {}", worker, job);
        log::debug!("Cache hit ratio nominal");
    }
    log::info!("Worker {} done", worker);
}
