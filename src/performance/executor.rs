//! Time-bounded parallel workload executor.
//!
//! Workers run a fixed-size batch of a [`Workload`] in a loop until the
//! deadline passes, counting locally. Each worker merges its count into the
//! shared total exactly once, after its loop exits, so a run takes one lock
//! acquisition per worker no matter how many batches were executed.
//!
//! Time comes from a [`Clock`]. Tests use [`TickClock`], which advances by a
//! fixed step on every read, making the number of executed batches a pure
//! function of the simulated duration.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Source of monotonic time, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock: every `now()` returns the next multiple of `tick`,
/// starting at zero. Shared by all workers of a run.
#[derive(Debug)]
pub struct TickClock {
    tick: Duration,
    reads: AtomicU64,
}

impl TickClock {
    pub fn new(tick: Duration) -> Self {
        TickClock {
            tick,
            reads: AtomicU64::new(0),
        }
    }

    /// Number of times the clock has been read.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Clock for TickClock {
    fn now(&self) -> Duration {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        self.tick.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// A unit of CPU-bound work executed repeatedly by the workers.
pub trait Workload: Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Execute one batch and return how many units (operations or bytes) it
    /// completed.
    fn run_batch(&self) -> u64;
}

/// Runs workloads across worker threads for a fixed time budget.
pub struct WorkloadExecutor<C: Clock = SystemClock> {
    clock: C,
    cancel: Arc<AtomicBool>,
}

impl WorkloadExecutor<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for WorkloadExecutor<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> WorkloadExecutor<C> {
    pub fn with_clock(clock: C) -> Self {
        WorkloadExecutor {
            clock,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancel flag. Setting it stops every worker
    /// at its next batch boundary.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run `workload` on `workers` threads (0 = one per logical CPU) for
    /// `duration` and return the summed unit count.
    ///
    /// A zero duration returns 0 without spawning. A worker that panics is
    /// logged and contributes nothing.
    pub fn run(&self, workers: usize, duration: Duration, workload: &dyn Workload) -> u64 {
        if duration.is_zero() {
            return 0;
        }
        let workers = resolve_workers(workers);
        let deadline = self.clock.now().saturating_add(duration);
        let total = Mutex::new(0u64);

        log::debug!(
            "[Executor] {}: {} workers for {:?}",
            workload.name(),
            workers,
            duration
        );

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let total = &total;
                let spawned = thread::Builder::new()
                    .name(format!("octane-worker-{}", id))
                    .spawn_scoped(scope, move || {
                        let local = self.worker_loop(deadline, workload);
                        merge(total, local);
                    });
                match spawned {
                    Ok(handle) => handles.push((id, handle)),
                    Err(e) => log::warn!("[Executor] Failed to spawn worker {}: {}", id, e),
                }
            }

            for (id, handle) in handles {
                if handle.join().is_err() {
                    log::error!(
                        "[Executor] Worker {} panicked during {}, its count is discarded",
                        id,
                        workload.name()
                    );
                }
            }
        });

        let total = match total.into_inner() {
            Ok(total) => total,
            Err(poisoned) => poisoned.into_inner(),
        };
        log::debug!("[Executor] {}: total {} units", workload.name(), total);
        total
    }

    fn worker_loop(&self, deadline: Duration, workload: &dyn Workload) -> u64 {
        let mut local = 0u64;
        loop {
            if self.cancel.load(Ordering::Acquire) {
                break;
            }
            if self.clock.now() >= deadline {
                break;
            }
            local = local.saturating_add(workload.run_batch());
        }
        local
    }
}

fn resolve_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

fn merge(total: &Mutex<u64>, local: u64) {
    match total.lock() {
        Ok(mut guard) => *guard = guard.saturating_add(local),
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = guard.saturating_add(local);
        }
    }
}
