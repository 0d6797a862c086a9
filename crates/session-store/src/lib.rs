//! Session cache and lifecycle manager for uploaded STL files.
//!
//! A [`SessionStore`] is built once by the process entry point and passed
//! by reference (usually inside an `Arc`) to whatever handles requests.
//! Each session owns one stored upload and at most one live
//! [`MeshAnalyzer`](mesh_analysis::MeshAnalyzer), created on first use.

pub mod clock;
pub mod config;
pub mod error;
pub mod handle;
pub mod session;
pub mod stats;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use error::StoreError;
pub use handle::MeshHandle;
pub use session::SessionInfo;
pub use stats::StoreStats;
pub use store::SessionStore;
pub use sweeper::{spawn_sweeper, Sweeper};
