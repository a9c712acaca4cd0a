//! Path pattern detection
//!
//! Groups concrete request paths (`/users/123`, `/users/456`) into
//! templates (`/users/{id}`) so observations of the same resource share an
//! endpoint.

mod detector;
mod types;

pub use detector::{path_parameters, PathPatternDetector};
pub use types::{ParamKind, PathPattern, Segment};
