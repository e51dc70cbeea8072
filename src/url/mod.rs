//! URL handling module for Sigrawler
//!
//! This module provides seed parsing (`Site`), the heuristic reference
//! normalizer, and the scope predicates that decide which URLs belong to
//! the crawled site.

mod normalize;
mod scope;
mod site;

// Re-export main types and functions
pub use normalize::normalize;
pub use scope::{matches_label_suffix, Scope, ScopeMode};
pub use site::Site;
