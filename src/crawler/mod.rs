//! Concurrent same-host crawler
//!
//! A crawl starts from one seed URL and fans out across a fixed-size worker
//! pool. Workers share a frontier queue and a visited set behind one lock,
//! an atomic downloaded counter, and a cooperative stop flag. Every fetched
//! page is written to the output directory under a filesystem-safe name and
//! mined for new same-origin URLs.
//!
//! Failure semantics: a failed or empty fetch is logged and skipped without
//! consuming the page budget; a failed file write is logged and the URL is
//! not re-queued.

mod fetcher;
mod frontier;
mod links;

pub use fetcher::{build_client, USER_AGENT};
pub use frontier::Frontier;
pub use links::same_origin_links;

use crate::url::{extract_origin, safe_filename};
use crate::{MinerError, Result};
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// How long an idle worker sleeps before re-checking the frontier.
const IDLE_GRACE: Duration = Duration::from_millis(100);

/// Options controlling a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum number of pages to download; negative means unbounded.
    pub max_pages: i64,

    /// Directory receiving one `.html` file per fetched page.
    pub output_dir: PathBuf,

    /// Number of crawl workers.
    pub concurrent_threads: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: -1,
            output_dir: PathBuf::from("output"),
            concurrent_threads: 5,
        }
    }
}

/// Final numbers from a completed crawl.
#[derive(Debug)]
pub struct CrawlStats {
    /// Pages successfully downloaded and persisted.
    pub downloaded: usize,

    /// Every URL admitted to the frontier, fetched or not.
    pub visited: HashSet<String>,
}

/// Crawls a single host breadth-first from a seed URL.
pub struct Crawler {
    seed: String,
    origin: String,
    options: CrawlOptions,
}

/// State shared by every crawl worker for the duration of one run.
struct CrawlContext {
    origin: String,
    output_dir: PathBuf,
    max_pages: i64,
    client: Client,
    frontier: Mutex<Frontier>,
    downloaded: AtomicI64,
    stop: AtomicBool,
    in_flight: AtomicUsize,
    file_lock: Mutex<()>,
}

/// Outcome of asking the frontier for work.
enum Next {
    Url(String),
    Idle,
    Done,
}

impl Crawler {
    /// Creates a crawler for the given seed URL.
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute HTTP(S) URL the crawl starts from
    /// * `options` - Page budget, output directory, and worker count
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(MinerError::InvalidUrl)` - No origin could be extracted from
    ///   the seed
    ///
    /// # Example
    ///
    /// ```
    /// use webminer::{CrawlOptions, Crawler};
    ///
    /// let crawler = Crawler::new(
    ///     "https://example.com/start",
    ///     CrawlOptions::default(),
    /// ).unwrap();
    /// assert_eq!(crawler.origin(), "https://example.com");
    /// ```
    pub fn new(seed: impl Into<String>, options: CrawlOptions) -> Result<Self> {
        let seed = seed.into();
        let origin =
            extract_origin(&seed).ok_or_else(|| MinerError::InvalidUrl(seed.clone()))?;

        Ok(Self {
            seed,
            origin,
            options,
        })
    }

    /// The same-origin scope prefix derived from the seed.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Runs the crawl to completion.
    ///
    /// Workers repeatedly pop a URL from the frontier, download it, persist
    /// the body under a filesystem-safe name, and admit every new
    /// same-origin link. The run terminates when the frontier is drained
    /// and no worker is mid-fetch, or when the page budget has been
    /// reached.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - Downloaded count and the final visited set
    /// * `Err(MinerError)` - The output directory or HTTP client could not
    ///   be set up; per-page failures are logged instead
    pub fn crawl(&self) -> Result<CrawlStats> {
        fs::create_dir_all(&self.options.output_dir).map_err(|source| MinerError::OutputDir {
            dir: self.options.output_dir.display().to_string(),
            source,
        })?;

        let context = Arc::new(CrawlContext {
            origin: self.origin.clone(),
            output_dir: self.options.output_dir.clone(),
            max_pages: self.options.max_pages,
            client: build_client()?,
            frontier: Mutex::new(Frontier::new(&self.seed)),
            downloaded: AtomicI64::new(0),
            stop: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            file_lock: Mutex::new(()),
        });

        tracing::info!(
            "starting crawl of {} with {} workers (budget: {})",
            self.origin,
            self.options.concurrent_threads.max(1),
            if self.options.max_pages < 0 {
                "unbounded".to_string()
            } else {
                self.options.max_pages.to_string()
            }
        );

        let mut pool = crate::pool::ThreadPool::new(self.options.concurrent_threads);
        let handles: Vec<_> = (0..pool.size())
            .map(|_| {
                let context = Arc::clone(&context);
                pool.submit(move || worker_loop(&context))
            })
            .collect::<std::result::Result<_, _>>()?;

        for handle in handles {
            handle.wait()?;
        }
        pool.shutdown();

        let downloaded = context.downloaded.load(Ordering::SeqCst).max(0) as usize;
        let visited = lock(&context.frontier).visited().clone();
        tracing::info!("crawl finished: {} pages downloaded", downloaded);

        Ok(CrawlStats {
            downloaded,
            visited,
        })
    }
}

/// Locks a mutex, recovering the guard if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Decrements the in-flight counter when a fetch ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn worker_loop(context: &CrawlContext) {
    loop {
        if context.stop.load(Ordering::SeqCst) {
            return;
        }

        if context.max_pages >= 0
            && context.downloaded.load(Ordering::SeqCst) >= context.max_pages
        {
            context.stop.store(true, Ordering::SeqCst);
            return;
        }

        match next_url(context) {
            Next::Done => return,
            Next::Idle => thread::sleep(IDLE_GRACE),
            Next::Url(url) => {
                let _in_flight = InFlightGuard(&context.in_flight);
                crawl_one(context, &url);
            }
        }
    }
}

/// Pops the next URL, marking it in-flight under the frontier lock so idle
/// workers never observe "empty queue, nothing in flight" while a peer is
/// between popping and fetching.
fn next_url(context: &CrawlContext) -> Next {
    let mut frontier = lock(&context.frontier);
    match frontier.pop() {
        Some(url) => {
            context.in_flight.fetch_add(1, Ordering::SeqCst);
            Next::Url(url)
        }
        None if context.in_flight.load(Ordering::SeqCst) == 0 => Next::Done,
        None => Next::Idle,
    }
}

fn crawl_one(context: &CrawlContext, url: &str) {
    tracing::debug!("downloading {}", url);

    let body = match fetcher::fetch(&context.client, url) {
        Ok(body) if !body.is_empty() => body,
        Ok(_) => {
            tracing::warn!("empty response body for {}", url);
            return;
        }
        Err(error) => {
            tracing::warn!("failed to download {}: {}", url, error);
            return;
        }
    };

    let current = context.downloaded.fetch_add(1, Ordering::SeqCst) + 1;

    let path = context
        .output_dir
        .join(format!("{}.html", safe_filename(url)));
    {
        let _guard = lock(&context.file_lock);
        if let Err(error) = fs::write(&path, &body) {
            tracing::warn!("failed to write {}: {}", path.display(), error);
        }
    }

    let candidates = same_origin_links(&body, &context.origin);
    {
        let mut frontier = lock(&context.frontier);
        for link in candidates {
            if frontier.admit(link.clone()) {
                tracing::trace!("queued {}", link);
            }
        }
    }

    if context.max_pages >= 0 && current >= context.max_pages {
        context.stop.store(true, Ordering::SeqCst);
    }
}
