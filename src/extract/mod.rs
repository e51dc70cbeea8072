//! Pattern extractors run over response bodies
//!
//! Both extractors are pure functions over text: no state and no network.
//!
//! - `find_buckets`: S3 bucket references in any body
//! - `find_endpoints`: quoted path and URL literals in JavaScript

mod buckets;
mod endpoints;

pub use buckets::find_buckets;
pub use endpoints::{find_endpoints, strip_quotes};
