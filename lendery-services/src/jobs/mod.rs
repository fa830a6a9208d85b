//! Background Jobs for Lendery
//!
//! This module contains the retention/cleanup batch jobs:
//!
//! - `conversation_retention`: schedules conversations of archived listings
//!   and reservation requests for deletion
//! - `reservation_purge`: hard-deletes reservation requests closed past the
//!   retention window
//! - `runner`: the periodic background task driving both
//!
//! # Usage
//!
//! Jobs are wired once at startup and spawned as a background task:
//!
//! ```ignore
//! use lendery_services::{retention_task, RetentionConfig, RetentionJobs};
//! use tokio::sync::watch;
//!
//! let jobs = RetentionJobs::builder()
//!     .listings(listing_reads)
//!     .reservation_requests(reservation_reads)
//!     .conversations(conversation_reads)
//!     .conversation_unit_of_work(conversation_uow)
//!     .reservation_unit_of_work(reservation_uow)
//!     .build()?;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! tokio::spawn(retention_task(jobs, RetentionConfig::from_env(), shutdown_rx));
//!
//! // On shutdown
//! let _ = shutdown_tx.send(true);
//! ```

pub mod conversation_retention;
pub mod report;
pub mod reservation_purge;
pub mod runner;

pub use conversation_retention::ConversationRetentionScheduler;
pub use report::RetentionSweepReport;
pub use reservation_purge::ExpiredReservationPurger;
pub use runner::{retention_task, RetentionMetrics, RetentionSnapshot};

use lendery_core::{ConfigError, LenderyResult};
use lendery_storage::{
    ConversationReadRepository, ConversationUnitOfWork, ListingReadRepository,
    ReservationRequestReadRepository, ReservationRequestUnitOfWork,
};
use std::sync::Arc;

// ============================================================================
// JOB WIRING
// ============================================================================

/// The wired retention jobs: both conversation sweeps plus the purger.
pub struct RetentionJobs {
    pub scheduler: ConversationRetentionScheduler,
    pub purger: ExpiredReservationPurger,
}

impl RetentionJobs {
    pub fn builder() -> RetentionJobsBuilder {
        RetentionJobsBuilder::default()
    }
}

/// Builder validating the retention job wiring.
///
/// Every collaborator is required; a missing one is a fatal configuration
/// error raised before any sweep runs.
#[derive(Default)]
pub struct RetentionJobsBuilder {
    listings: Option<Arc<dyn ListingReadRepository>>,
    reservation_requests: Option<Arc<dyn ReservationRequestReadRepository>>,
    conversations: Option<Arc<dyn ConversationReadRepository>>,
    conversation_uow: Option<Arc<dyn ConversationUnitOfWork>>,
    reservation_uow: Option<Arc<dyn ReservationRequestUnitOfWork>>,
}

impl RetentionJobsBuilder {
    pub fn listings(mut self, repository: Arc<dyn ListingReadRepository>) -> Self {
        self.listings = Some(repository);
        self
    }

    pub fn reservation_requests(
        mut self,
        repository: Arc<dyn ReservationRequestReadRepository>,
    ) -> Self {
        self.reservation_requests = Some(repository);
        self
    }

    pub fn conversations(mut self, repository: Arc<dyn ConversationReadRepository>) -> Self {
        self.conversations = Some(repository);
        self
    }

    pub fn conversation_unit_of_work(mut self, uow: Arc<dyn ConversationUnitOfWork>) -> Self {
        self.conversation_uow = Some(uow);
        self
    }

    pub fn reservation_unit_of_work(
        mut self,
        uow: Arc<dyn ReservationRequestUnitOfWork>,
    ) -> Self {
        self.reservation_uow = Some(uow);
        self
    }

    /// Validate the wiring and build the jobs.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingRequired` naming the first absent
    /// collaborator.
    pub fn build(self) -> LenderyResult<RetentionJobs> {
        let listings = self.listings.ok_or_else(|| missing("listings"))?;
        let reservation_requests = self
            .reservation_requests
            .ok_or_else(|| missing("reservation_requests"))?;
        let conversations = self.conversations.ok_or_else(|| missing("conversations"))?;
        let conversation_uow = self
            .conversation_uow
            .ok_or_else(|| missing("conversation_unit_of_work"))?;
        let reservation_uow = self
            .reservation_uow
            .ok_or_else(|| missing("reservation_unit_of_work"))?;

        Ok(RetentionJobs {
            scheduler: ConversationRetentionScheduler::new(
                listings,
                reservation_requests.clone(),
                conversations,
                conversation_uow,
            ),
            purger: ExpiredReservationPurger::new(reservation_requests, reservation_uow),
        })
    }
}

fn missing(field: &str) -> ConfigError {
    ConfigError::MissingRequired {
        field: field.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
