//! Request handler module
//!
//! Responsible for turning an inbound HTTP request into a combo pipeline run.

pub mod router;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
