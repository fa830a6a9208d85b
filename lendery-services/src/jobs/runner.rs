//! Retention Background Task
//!
//! Periodic driver for the retention jobs. Runs until the shutdown signal
//! is received:
//!
//! 1. On each sweep tick, runs the listing-based and the reservation-based
//!    conversation retention sweeps.
//! 2. On each purge tick, hard-deletes expired reservation requests.
//!
//! Each sweep failure is counted and logged; the task itself keeps running
//! and retries on its next tick.

use crate::config::RetentionConfig;
use crate::jobs::report::RetentionSweepReport;
use crate::jobs::RetentionJobs;
use lendery_core::LenderyError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

// ============================================================================
// METRICS
// ============================================================================

/// Metrics for retention operations, accumulated across sweep cycles.
#[derive(Debug, Default)]
pub struct RetentionMetrics {
    /// Total conversations visited since startup
    pub conversations_processed: AtomicU64,

    /// Total conversations newly scheduled for deletion since startup
    pub conversations_scheduled: AtomicU64,

    /// Total reservation requests hard-deleted since startup
    pub reservation_requests_purged: AtomicU64,

    /// Total sweep cycles completed
    pub sweep_cycles: AtomicU64,

    /// Total errors encountered (per-item and fatal) during sweeps
    pub sweep_errors: AtomicU64,
}

impl RetentionMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current snapshot of all metrics.
    pub fn snapshot(&self) -> RetentionSnapshot {
        RetentionSnapshot {
            conversations_processed: self.conversations_processed.load(Ordering::Relaxed),
            conversations_scheduled: self.conversations_scheduled.load(Ordering::Relaxed),
            reservation_requests_purged: self.reservation_requests_purged.load(Ordering::Relaxed),
            sweep_cycles: self.sweep_cycles.load(Ordering::Relaxed),
            sweep_errors: self.sweep_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of retention metrics at a point in time.
#[derive(Debug, Clone)]
pub struct RetentionSnapshot {
    pub conversations_processed: u64,
    pub conversations_scheduled: u64,
    pub reservation_requests_purged: u64,
    pub sweep_cycles: u64,
    pub sweep_errors: u64,
}

// ============================================================================
// BACKGROUND TASK
// ============================================================================

/// Background task that periodically runs the retention jobs.
///
/// Runs until the shutdown signal is received, then returns the metrics
/// collected over the task's lifetime.
pub async fn retention_task(
    jobs: RetentionJobs,
    config: RetentionConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Arc<RetentionMetrics> {
    let metrics = Arc::new(RetentionMetrics::new());

    let mut sweep_interval = interval(config.sweep_interval);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut purge_interval = interval(config.purge_interval);
    purge_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        sweep_interval_secs = config.sweep_interval.as_secs(),
        purge_interval_secs = config.purge_interval.as_secs(),
        "Retention task started"
    );

    loop {
        tokio::select! {
            // Check for shutdown signal
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("Retention task shutting down");
                    break;
                }
            }

            // Conversation retention sweeps
            _ = sweep_interval.tick() => {
                run_conversation_sweeps(&jobs, &config, &metrics).await;
            }

            // Expired reservation purge
            _ = purge_interval.tick() => {
                run_purge(&jobs, &metrics).await;
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        conversations_processed = snapshot.conversations_processed,
        conversations_scheduled = snapshot.conversations_scheduled,
        reservation_requests_purged = snapshot.reservation_requests_purged,
        sweep_cycles = snapshot.sweep_cycles,
        sweep_errors = snapshot.sweep_errors,
        "Retention task completed"
    );

    metrics
}

/// Perform one cycle of conversation retention sweeps.
async fn run_conversation_sweeps(
    jobs: &RetentionJobs,
    config: &RetentionConfig,
    metrics: &RetentionMetrics,
) {
    metrics.sweep_cycles.fetch_add(1, Ordering::Relaxed);

    let listing_result = jobs.scheduler.run_listing_sweep().await;
    absorb_sweep_result("listing", listing_result, config, metrics);

    let reservation_result = jobs.scheduler.run_reservation_sweep().await;
    absorb_sweep_result("reservation request", reservation_result, config, metrics);
}

/// Fold one sweep outcome into the metrics.
fn absorb_sweep_result(
    source: &str,
    result: Result<RetentionSweepReport, LenderyError>,
    config: &RetentionConfig,
    metrics: &RetentionMetrics,
) {
    match result {
        Ok(report) => {
            metrics
                .conversations_processed
                .fetch_add(report.processed_count, Ordering::Relaxed);
            metrics
                .conversations_scheduled
                .fetch_add(report.scheduled_count, Ordering::Relaxed);
            metrics
                .sweep_errors
                .fetch_add(report.errors.len() as u64, Ordering::Relaxed);

            if report.has_failures() {
                tracing::warn!(
                    source,
                    errors = ?report.errors,
                    "Retention sweep finished with failures"
                );
            } else if config.log_reports {
                tracing::info!(
                    source,
                    processed = report.processed_count,
                    scheduled = report.scheduled_count,
                    "Retention sweep completed"
                );
            }
        }
        Err(e) => {
            // Fatal sweep error: nothing was reported, retry on next tick
            tracing::error!(source, error = %e, "Retention sweep failed");
            metrics.sweep_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Perform one purge run.
async fn run_purge(jobs: &RetentionJobs, metrics: &RetentionMetrics) {
    match jobs.purger.run().await {
        Ok(deleted) => {
            metrics
                .reservation_requests_purged
                .fetch_add(deleted, Ordering::Relaxed);
        }
        Err(e) => {
            tracing::error!(error = %e, "Reservation purge failed");
            metrics.sweep_errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
