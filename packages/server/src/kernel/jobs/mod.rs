//! In-memory job registry for background analysis runs.

pub mod job;
pub mod store;

pub use job::{Job, JobStatus, LogEntry};
pub use store::JobStore;
