//! Request handler module
//!
//! Resolves request paths under the serving root and answers them, honoring
//! single byte-range requests for regular files.

pub mod listing;
pub mod ranged;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use ranged::{respond, RangeOutcome};
pub use resolve::Resolved;
pub use router::handle_request;
pub use static_files::{DirectoryServer, RequestContext, StaticFiles};
