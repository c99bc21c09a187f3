//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic:
//! range grammar, content types, response bodies and response builders.

pub mod body;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use range::{parse_range_header, ByteRange, RangeSpec};
pub use response::{
    build_400_response, build_403_response, build_404_response, build_405_response,
    build_416_response, build_options_response, build_redirect_response,
};
