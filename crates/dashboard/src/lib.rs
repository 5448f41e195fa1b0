//! Session coordinator for the vidboard dashboard.
//!
//! Wires the upload path and the push-event channel onto a single
//! authoritative [`store::JobStatusStore`]: uploads register pending
//! jobs, completion events finalize them, and the rendering layer
//! observes snapshots.  The two asynchronous signals (upload ack,
//! completion event) converge to exactly one job record regardless of
//! arrival order.

pub mod config;
pub mod session;
pub mod store;
pub mod upload;

pub use config::DashboardConfig;
pub use session::DashboardSession;
pub use store::{JobStatusStore, StoreUpdate};
pub use upload::{SubmitOutcome, UploadApi, UploadCoordinator, UploadError};
