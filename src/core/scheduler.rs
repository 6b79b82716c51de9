//! Cron-based scheduler for periodic signal refresh passes

use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::runtime::SignalRuntime;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler disabled: interval_seconds is 0")]
    Disabled,

    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },
}

/// Cron expression (`sec min hour day month weekday`) firing every
/// `interval_seconds`, rounded down to whole minutes or hours once the
/// interval reaches them.
pub fn cron_expression(interval_seconds: u64) -> Result<String, SchedulerError> {
    match interval_seconds {
        0 => Err(SchedulerError::Disabled),
        1..=59 => Ok(format!("*/{} * * * * *", interval_seconds)),
        60..=3599 => Ok(format!("0 */{} * * * *", interval_seconds / 60)),
        _ => Ok(format!("0 0 */{} * * *", (interval_seconds / 3600).min(23))),
    }
}

/// Periodically triggers a refresh pass on the runtime's default timeframe.
pub struct RefreshScheduler {
    runtime: Arc<SignalRuntime>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl RefreshScheduler {
    pub fn new(runtime: Arc<SignalRuntime>, interval_seconds: u64) -> Result<Self, SchedulerError> {
        let expression = cron_expression(interval_seconds)?;
        let schedule =
            Schedule::from_str(&expression).map_err(|e| SchedulerError::InvalidSchedule {
                expression: expression.clone(),
                reason: e.to_string(),
            })?;

        info!(
            interval = interval_seconds,
            cron = %expression,
            "RefreshScheduler: created with interval {}s",
            interval_seconds
        );

        Ok(Self {
            runtime,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("RefreshScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };
                let now = chrono::Utc::now();
                if next_tick > now {
                    let wait = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(wait).await;
                }

                debug!("RefreshScheduler: cron tick, starting refresh pass");
                // detached: overlapping passes may race
                let runtime = runtime.clone();
                tokio::spawn(async move {
                    let _ = runtime.refresh(None).await;
                });
            }
        });

        *self.handle.write().await = Some(handle);
        info!("RefreshScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        if let Some(handle) = self.handle.write().await.take() {
            handle.abort();
            info!("RefreshScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
