//! Periodic escalation scheduling.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between escalation sweeps (default: 5 minutes).
    pub sweep_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Executor trait for the scheduled escalation sweep.
#[async_trait::async_trait]
pub trait SweepExecutor: Send + Sync {
    /// Run one escalation sweep, returning the number of reports it
    /// escalated.
    async fn run_sweep(&self) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;
}

/// Run the scheduler with the given configuration and executor.
///
/// Sweeps run on a fixed interval. A failed sweep is logged and the
/// next tick proceeds normally; the sweep's own claim discipline keeps
/// a delayed tick from double-processing reports.
pub async fn run_scheduler<E: SweepExecutor + 'static>(config: SchedulerConfig, executor: Arc<E>) {
    let sweep_interval = config.sweep_interval;

    tokio::spawn(async move {
        let mut interval = interval(sweep_interval);
        loop {
            interval.tick().await;
            match executor.run_sweep().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Escalation sweep completed");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Escalation sweep failed");
                }
            }
        }
    });
}
