//! Sigrawler main entry point
//!
//! This is the command-line interface for the Sigrawler recon crawler.

use anyhow::{bail, Context};
use clap::Parser;
use sigrawler::config::{load_options, split_proxies, validate, Options};
use sigrawler::input::read_seeds;
use sigrawler::output::{save_results, ConsoleEmitter};
use sigrawler::{run_batch, Crawler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sigrawler: a reconnaissance web crawler
///
/// Crawls each seed URL and prints in-scope URLs, JavaScript files,
/// endpoints found inside JavaScript, and S3 bucket references.
#[derive(Parser, Debug)]
#[command(name = "sigrawler")]
#[command(version)]
#[command(about = "A recon web crawler for URLs, JavaScript endpoints and S3 buckets", long_about = None)]
struct Cli {
    /// Seed URLs, one per line ("-" reads standard input)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: String,

    /// Save the results as JSON to this path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// TOML file with crawl options; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from the seed (0 = unlimited)
    #[arg(long)]
    depth: Option<u32>,

    /// Maximum concurrent fetches per pipeline
    #[arg(long = "threads")]
    threads: Option<usize>,

    /// Delay after each request to the target (seconds)
    #[arg(long)]
    delay: Option<u64>,

    /// Extra random delay after each request (seconds)
    #[arg(long = "random-delay")]
    random_delay: Option<u64>,

    /// Treat subdomains of the seed host as in scope
    #[arg(long = "include-subs")]
    include_subs: bool,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Request timeout (seconds)
    #[arg(long)]
    timeout: Option<u64>,

    /// Fixed User-Agent (default: random mobile User-Agent per request)
    #[arg(long = "user-agent", value_name = "UA")]
    user_agent: Option<String>,

    /// Comma-separated proxy URLs, used round-robin
    #[arg(long, value_name = "URLS")]
    proxies: Option<String>,

    /// Trace every request and response
    #[arg(long)]
    debug: bool,

    /// Maximum number of seeds crawled at the same time
    #[arg(long = "max-sessions")]
    max_sessions: Option<usize>,

    /// Print nothing but errors
    #[arg(short, long, conflicts_with = "verbose")]
    silent: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layers the command-line flags over the base options
    fn apply_to(&self, mut options: Options) -> Options {
        if let Some(depth) = self.depth {
            options.depth = depth;
        }
        if let Some(threads) = self.threads {
            options.concurrency = threads;
        }
        if let Some(delay) = self.delay {
            options.delay = delay;
        }
        if let Some(random_delay) = self.random_delay {
            options.random_delay = random_delay;
        }
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = Some(user_agent.clone());
        }
        if let Some(proxies) = &self.proxies {
            options.proxies = split_proxies(proxies);
        }
        if let Some(max_sessions) = self.max_sessions {
            options.max_sessions = max_sessions;
        }

        options.include_subdomains |= self.include_subs;
        options.insecure |= self.insecure;
        options.debug |= self.debug;
        options
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.silent, cli.debug);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let base = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_options(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Options::default(),
    };
    let options = cli.apply_to(base);
    validate(&options).context("invalid options")?;

    let seeds = read_seeds(&cli.input)
        .with_context(|| format!("failed to read seeds from {}", cli.input))?;
    if seeds.is_empty() {
        bail!("no seeds provided in {}", cli.input);
    }

    tracing::info!(
        "Crawling {} seed(s), {} at a time",
        seeds.len(),
        options.max_sessions
    );

    let max_sessions = options.max_sessions;
    let emitter = Arc::new(ConsoleEmitter::new(!cli.no_color, cli.silent));
    let crawler = Arc::new(Crawler::new(options, emitter)?);

    let report = run_batch(crawler, seeds, max_sessions).await;

    for (seed, error) in report.failures() {
        tracing::warn!("{}: {}", seed, error);
    }

    if let Some(path) = &cli.output {
        let written = save_results(path, &report.merged())
            .with_context(|| format!("failed to save results to {}", path.display()))?;
        tracing::info!("Results written to {}", written.display());
    }

    if report.all_failed() {
        bail!("all {} seed(s) failed", report.outcomes.len());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to standard error; standard output carries only results.
fn setup_logging(verbose: u8, silent: bool, debug: bool) {
    let filter = if silent {
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("sigrawler=trace,warn")
    } else {
        match verbose {
            0 => EnvFilter::new("sigrawler=warn"),
            1 => EnvFilter::new("sigrawler=info,warn"),
            _ => EnvFilter::new("sigrawler=debug,info"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "sigrawler",
            "-i",
            "seeds.txt",
            "--depth",
            "3",
            "--threads",
            "5",
            "--include-subs",
            "--proxies",
            "http://127.0.0.1:8080, socks5://127.0.0.1:1080",
        ]);

        let base = Options {
            depth: 2,
            timeout: 30,
            ..Options::default()
        };
        let options = cli.apply_to(base);

        assert_eq!(options.depth, 3);
        assert_eq!(options.concurrency, 5);
        assert_eq!(options.timeout, 30);
        assert!(options.include_subdomains);
        assert!(!options.insecure);
        assert_eq!(
            options.proxies,
            vec!["http://127.0.0.1:8080", "socks5://127.0.0.1:1080"]
        );
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["sigrawler", "-i", "-"]);
        let options = cli.apply_to(Options::default());

        assert_eq!(options.depth, 1);
        assert_eq!(options.concurrency, 20);
        assert_eq!(options.random_delay, 2);
        assert_eq!(options.max_sessions, 4);
        assert!(options.user_agent.is_none());
    }

    #[test]
    fn test_silent_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sigrawler", "-i", "-", "-s", "-v"]).is_err());
    }
}
