//! Crawler coordinator - crawl session orchestration
//!
//! This module ties the pieces of a crawl together:
//! - Building a session (site, scope, dedup stores, results) per seed
//! - Admitting requests into the page and script pipelines
//! - Running fetches and dispatching responses to the pipeline hooks
//! - Waiting until a session has no work left

use crate::config::{validate, Options};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::pipeline::{
    PageHooks, PipelineHooks, PipelineKind, Request, RequestDecision, Response, ScriptHooks,
};
use crate::crawler::scheduler::{InFlight, Scheduler};
use crate::extract::find_buckets;
use crate::output::{Emitter, Tag};
use crate::state::{DedupStore, Results, ResultsSink};
use crate::url::{Scope, Site};
use crate::SigrawlerError;
use std::sync::Arc;
use url::Url;

/// Entry point of the library: crawls seeds with a fixed set of options
///
/// The crawler itself holds no per-seed state; each call to
/// [`Crawler::crawl`] builds an independent session, so one crawler can run
/// many seeds concurrently.
pub struct Crawler {
    options: Arc<Options>,
    fetcher: Fetcher,
    emitter: Arc<dyn Emitter>,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `options` - The crawl options
    /// * `emitter` - Where discovered items are reported as they are found
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SigrawlerError)` - Invalid options or HTTP client failure
    pub fn new(options: Options, emitter: Arc<dyn Emitter>) -> Result<Self, SigrawlerError> {
        validate(&options)?;
        let fetcher = Fetcher::new(&options)?;

        Ok(Self {
            options: Arc::new(options),
            fetcher,
            emitter,
        })
    }

    /// Returns the options this crawler was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Crawls one seed to completion
    ///
    /// The seed is fetched by the page pipeline at depth 1. The call returns
    /// once neither pipeline has a request in flight or queued.
    ///
    /// # Returns
    ///
    /// * `Ok(Results)` - Everything recorded by the session
    /// * `Err(SigrawlerError)` - The seed is not a valid URL; nothing was
    ///   fetched
    pub async fn crawl(&self, seed: &str) -> Result<Results, SigrawlerError> {
        let site = Site::parse(seed)?;
        let start = site.url().to_string();

        tracing::info!(
            "Starting session for {} (domain {}, depth {})",
            start,
            site.domain(),
            self.options.depth
        );

        let session = Arc::new(Session::new(
            site,
            Arc::clone(&self.options),
            self.fetcher.clone(),
            Arc::clone(&self.emitter),
        ));

        // The seed is already known, so links back to it are not reported.
        session.urls().check_and_mark(start.trim_end_matches('/'));
        session.submit(PipelineKind::Page, Request::new(start.clone(), 1));
        session.in_flight.wait_idle().await;

        let results = session.results().snapshot();
        tracing::info!(
            "Finished session for {}: {} urls, {} buckets",
            start,
            results.urls.len(),
            results.buckets.len()
        );

        Ok(results)
    }
}

/// One pipeline of a session
struct Pipeline {
    hooks: Box<dyn PipelineHooks>,
    scheduler: Scheduler,

    /// URLs already admitted into this pipeline
    visited: DedupStore,
}

impl Pipeline {
    fn new(hooks: Box<dyn PipelineHooks>, options: Arc<Options>) -> Self {
        Self {
            hooks,
            scheduler: Scheduler::new(options),
            visited: DedupStore::new(),
        }
    }
}

/// State of one seed's crawl, shared by all of its tasks
pub struct Session {
    site: Site,
    scope: Scope,
    options: Arc<Options>,
    fetcher: Fetcher,
    emitter: Arc<dyn Emitter>,

    /// Discovered URLs, shared by both pipelines
    urls: DedupStore,

    /// Reported buckets
    buckets: DedupStore,

    results: ResultsSink,
    page: Pipeline,
    script: Pipeline,
    in_flight: InFlight,
}

impl Session {
    fn new(
        site: Site,
        options: Arc<Options>,
        fetcher: Fetcher,
        emitter: Arc<dyn Emitter>,
    ) -> Self {
        let scope = Scope::new(&site, options.include_subdomains);

        Self {
            page: Pipeline::new(Box::new(PageHooks), Arc::clone(&options)),
            script: Pipeline::new(Box::new(ScriptHooks), Arc::clone(&options)),
            site,
            scope,
            options,
            fetcher,
            emitter,
            urls: DedupStore::new(),
            buckets: DedupStore::new(),
            results: ResultsSink::new(),
            in_flight: InFlight::new(),
        }
    }

    /// The seed's site
    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Dedup store for discovered URLs
    pub fn urls(&self) -> &DedupStore {
        &self.urls
    }

    pub fn results(&self) -> &ResultsSink {
        &self.results
    }

    /// Emits `url` under `tag` if it is in scope
    ///
    /// Returns true if the item was emitted.
    pub fn emit_if_in_scope(&self, tag: Tag, url: &str) -> bool {
        if !self.scope.in_scope(url) {
            tracing::trace!("Out of scope: {}", url);
            return false;
        }

        self.emitter.emit(tag, url);
        true
    }

    /// Records every bucket in `body` that this session has not seen yet
    pub fn record_buckets(&self, body: &str) {
        for bucket in find_buckets(body) {
            if self.buckets.check_and_mark(&bucket) {
                self.emitter.emit(Tag::S3, &bucket);
                self.results.push_bucket(bucket);
            }
        }
    }

    /// Submits a request to a pipeline
    ///
    /// The request is dropped when it is past the depth limit, outside the
    /// fetch gate, already admitted to the pipeline, or aborted by the
    /// pipeline's `on_request` hook. Otherwise it is fetched on its own task.
    pub fn submit(self: &Arc<Self>, kind: PipelineKind, request: Request) {
        if !self.options.within_depth(request.depth) {
            tracing::trace!("Depth limit reached for {}", request.url);
            return;
        }

        if !self.scope.permits_fetch(&request.url) {
            tracing::trace!("Fetch gate rejected {}", request.url);
            return;
        }

        // Spellings of the same resource share one key.
        let Ok(canonical) = Url::parse(&request.url) else {
            return;
        };
        let pipeline = self.pipeline(kind);
        if !pipeline.visited.check_and_mark(canonical.as_str()) {
            return;
        }

        if pipeline.hooks.on_request(self, &request) == RequestDecision::Abort {
            return;
        }

        let guard = self.in_flight.enter();
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            session.process(kind, request).await;
        });
    }

    fn pipeline(&self, kind: PipelineKind) -> &Pipeline {
        match kind {
            PipelineKind::Page => &self.page,
            PipelineKind::Script => &self.script,
        }
    }

    /// Fetches a request and dispatches the response to the hooks
    async fn process(self: Arc<Self>, kind: PipelineKind, request: Request) {
        let pipeline = self.pipeline(kind);

        let Some(permit) = pipeline.scheduler.acquire().await else {
            return;
        };

        tracing::debug!("[{}] Fetching {} (depth {})", kind, request.url, request.depth);
        let result = self
            .fetcher
            .fetch(&request.url, request.referer.as_deref())
            .await;

        let paced = Url::parse(&request.url)
            .map(|url| self.scope.under_domain(&url))
            .unwrap_or(false);
        if paced {
            pipeline.scheduler.pace().await;
        }
        drop(permit);

        let is_html = result.is_html();
        match result {
            FetchResult::Success { final_url, body, .. } => {
                let Ok(url) = Url::parse(&final_url) else {
                    tracing::debug!("Unparseable final URL {}", final_url);
                    return;
                };

                let response = Response {
                    url: &url,
                    body: &body,
                };
                pipeline.hooks.on_response(&self, &request, &response);

                if is_html {
                    for link in extract_links(&body, &url) {
                        pipeline.hooks.on_link(&self, &request, &link);
                    }
                }
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("[{}] {} returned HTTP {}", kind, request.url, status_code);
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("[{}] {} failed: {}", kind, request.url, error);
            }
        }
    }
}
