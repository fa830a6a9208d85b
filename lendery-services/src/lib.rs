//! Lendery Services - Reservation Flow and Retention Jobs
//!
//! Business operations of the Lendery reservation core: the
//! reservation-request creation flow and the scheduled retention/cleanup
//! sweeps. Every collaborator is an explicit trait object from
//! `lendery-storage`, injected at construction; nothing in this crate talks
//! to a concrete database.

pub mod config;
pub mod jobs;
pub mod reservation_service;

pub use config::RetentionConfig;
pub use jobs::{
    retention_task, ConversationRetentionScheduler, ExpiredReservationPurger, RetentionJobs,
    RetentionJobsBuilder, RetentionMetrics, RetentionSnapshot, RetentionSweepReport,
};
pub use reservation_service::{CreateReservationRequest, ReservationRequestCreator};
