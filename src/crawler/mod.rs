//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with proxy rotation and User-Agent selection
//! - HTML parsing and link extraction
//! - Concurrency limiting, pacing and in-flight tracking
//! - The page and script pipelines
//! - Session orchestration and the multi-seed batch driver

mod batch;
mod coordinator;
mod fetcher;
mod parser;
mod pipeline;
mod scheduler;

pub use batch::{run_batch, BatchReport, SeedOutcome};
pub use coordinator::{Crawler, Session};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use parser::{extract_links, resolve_link, Link, LinkKind};
pub use pipeline::{
    is_script_url, is_static_asset_url, unminified_sibling, PageHooks, PipelineHooks,
    PipelineKind, Request, RequestDecision, Response, ScriptHooks,
};
pub use scheduler::{InFlight, InFlightGuard, Scheduler};
