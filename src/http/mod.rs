//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod conditional;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use conditional::{Conditions, Precondition};
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_412_response, build_416_response, build_content_response,
    build_error_response, build_partial_response,
};
