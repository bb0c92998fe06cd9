//! Crawl orchestration.
//!
//! One run starts from a catalog page, follows its candidate links in
//! priority order and appends one record per dataset page. Each link is
//! fetched and fully extracted before the next; a failed link is logged and
//! skipped. The visited set and the collection belong to the caller so
//! several runs can share them.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::assembler::{analyze_page, extract_page, CatalogCollection};
use crate::enrich::EnricherRegistry;
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::links::{CatalogLink, LinkType};
use crate::options::Options;
use crate::page_type::PageType;
use crate::record::DatasetRecord;
use crate::scoring::score_record;
use crate::url_utils;

/// Warning added to the report when a run yields nothing.
pub const NO_RECORDS_WARNING: &str = "no dataset records produced";

/// Where a run is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    /// Not started.
    #[default]
    Idle,
    /// Reading the start page.
    DiscoveringLinks,
    /// Fetching one candidate.
    Fetching,
    /// Extracting a fetched page.
    Extracting,
    /// Scoring the assembled record.
    Scoring,
    /// Adding the record to the collection.
    Appending,
    /// Finished or stopped.
    Done,
}

/// Shared flag that asks a running crawl to stop after the current link.
///
/// A stop requested before [`Crawler::run`] applies to that run. The flag is
/// cleared when a run finishes, so the next run starts fresh.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request a stop.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag for a new run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Links a fetch was attempted for.
    pub attempted: usize,
    /// Successful fetches.
    pub fetched: usize,
    /// Failed fetches.
    pub failed: usize,
    /// Links skipped as visited, over budget, or yielding no usable record.
    pub skipped: usize,
    /// Records appended to the collection.
    pub appended: usize,
    /// Records dropped as duplicates.
    pub duplicates: usize,
    /// The stop flag ended the run early.
    pub stopped: bool,
    /// User-facing warnings.
    pub warnings: Vec<String>,
}

/// Sequential catalog crawler.
#[derive(Debug)]
pub struct Crawler {
    options: Options,
    enrichers: EnricherRegistry,
    stop: StopHandle,
    state: CrawlState,
}

impl Crawler {
    /// Crawler with the default enrichment strategies.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_enrichers(options, EnricherRegistry::with_defaults())
    }

    /// Crawler with a custom strategy registry.
    #[must_use]
    pub fn with_enrichers(options: Options, enrichers: EnricherRegistry) -> Self {
        Self {
            options,
            enrichers,
            stop: StopHandle::default(),
            state: CrawlState::Idle,
        }
    }

    /// Handle for stopping a run from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Run options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn transition(&mut self, next: CrawlState) {
        match next {
            CrawlState::Idle | CrawlState::DiscoveringLinks | CrawlState::Done => {
                tracing::info!(from = ?self.state, to = ?next, "crawl state");
            }
            _ => tracing::debug!(from = ?self.state, to = ?next, "crawl state"),
        }
        self.state = next;
    }

    /// Crawl from `start_url`.
    ///
    /// The start page is always fetched. A dataset page as start is
    /// assembled too. With `follow_links` off nothing else is fetched.
    ///
    /// # Errors
    ///
    /// Returns an error when `start_url` is not an absolute URL or the start
    /// page cannot be fetched; failures on followed links are counted in the
    /// report.
    pub fn run(
        &mut self,
        start_url: &str,
        fetcher: &dyn PageFetcher,
        visited: &mut HashSet<String>,
        collection: &mut CatalogCollection,
    ) -> Result<CrawlReport> {
        url::Url::parse(start_url).map_err(|err| Error::InvalidUrl(format!("{start_url}: {err}")))?;

        let mut report = CrawlReport::default();
        self.transition(CrawlState::DiscoveringLinks);

        let html = match fetcher.fetch(start_url) {
            Ok(html) => html,
            Err(err) => {
                self.finish();
                return Err(err);
            }
        };
        visited.insert(url_utils::normalize_url(start_url));

        let start = analyze_page(&html, start_url, None, &self.options, &self.enrichers);
        tracing::info!(
            url = %start_url,
            page_type = ?start.page_type,
            candidates = start.links.len(),
            "start page"
        );

        if start.page_type == PageType::DatasetDetail {
            self.append(start.record, collection, &mut report);
        }

        if self.options.follow_links {
            self.follow(start.links, fetcher, visited, collection, &mut report);
        }

        if report.appended == 0 && !report.stopped {
            tracing::warn!(url = %start_url, "{NO_RECORDS_WARNING}");
            report.warnings.push(NO_RECORDS_WARNING.to_string());
        }

        self.finish();
        tracing::info!(
            attempted = report.attempted,
            appended = report.appended,
            failed = report.failed,
            "crawl finished"
        );
        Ok(report)
    }

    fn finish(&mut self) {
        self.stop.reset();
        self.transition(CrawlState::Done);
    }

    fn follow(
        &mut self,
        links: Vec<CatalogLink>,
        fetcher: &dyn PageFetcher,
        visited: &mut HashSet<String>,
        collection: &mut CatalogCollection,
        report: &mut CrawlReport,
    ) {
        let mut queue: VecDeque<CatalogLink> = links.into();
        let mut detail_count = 0;

        while let Some(link) = queue.pop_front() {
            if self.stop.is_stop_requested() {
                tracing::info!("stop requested");
                report.stopped = true;
                break;
            }

            if report.attempted >= self.options.max_follow_links {
                tracing::debug!(remaining = queue.len() + 1, "follow budget exhausted");
                break;
            }

            let key = url_utils::normalize_url(&link.href);
            if visited.contains(&key) {
                report.skipped += 1;
                continue;
            }

            let is_detail = link.link_type == LinkType::DatasetDetail;
            if is_detail && detail_count >= self.options.max_detail_links {
                report.skipped += 1;
                continue;
            }

            visited.insert(key);
            if is_detail {
                detail_count += 1;
            }

            if !self.options.request_delay.is_zero() {
                std::thread::sleep(self.options.request_delay);
            }

            report.attempted += 1;
            self.transition(CrawlState::Fetching);
            let html = match fetcher.fetch(&link.href) {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(url = %link.href, %err, "fetch failed, skipping link");
                    report.failed += 1;
                    continue;
                }
            };
            report.fetched += 1;

            self.transition(CrawlState::Extracting);
            let mut analysis = extract_page(&html, &link.href, Some(&link), &self.options, &self.enrichers);
            self.transition(CrawlState::Scoring);
            score_record(&mut analysis.record);

            let is_listing = analysis.page_type == PageType::CatalogMain
                || (link.link_type == LinkType::TagPage && analysis.page_type != PageType::DatasetDetail);
            if is_listing {
                if self.options.follow_nested_catalogs {
                    let nested: Vec<CatalogLink> = analysis
                        .links
                        .into_iter()
                        .filter(|l| !visited.contains(&url_utils::normalize_url(&l.href)))
                        .collect();
                    tracing::debug!(url = %link.href, nested = nested.len(), "queued nested catalog links");
                    queue.extend(nested);
                }
                continue;
            }

            self.append(analysis.record, collection, report);
        }
    }

    fn append(
        &mut self,
        record: DatasetRecord,
        collection: &mut CatalogCollection,
        report: &mut CrawlReport,
    ) {
        self.transition(CrawlState::Appending);

        if record.is_placeholder() || record.layer_name.trim().is_empty() {
            tracing::debug!(url = %record.source_url, "no usable record");
            report.skipped += 1;
            return;
        }

        let name = record.layer_name.clone();
        let url = record.source_url.clone();
        if collection.push(record) {
            report.appended += 1;
            tracing::info!(layer_name = %name, %url, "appended record");
        } else {
            report.duplicates += 1;
            tracing::debug!(layer_name = %name, %url, "duplicate record dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Duration;

    struct MapFetcher {
        pages: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl MapFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages.iter().map(|(u, h)| ((*u).to_string(), (*h).to_string())).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageFetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| Error::fetch(url, "not found"))
        }
    }

    const ROOT: &str = "https://developers.google.com/earth-engine/datasets/catalog";

    fn options() -> Options {
        Options {
            request_delay: Duration::ZERO,
            ..Options::default()
        }
    }

    fn catalog(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="/earth-engine/datasets/catalog/{l}">{l} dataset</a>"#))
            .collect();
        format!("<html><body><h1>Earth Engine Data Catalog</h1>{anchors}</body></html>")
    }

    fn detail(name: &str) -> String {
        format!("<html><body><h1>{name}</h1><p>Dataset Availability 2015-06-23T00:00:00Z - Present</p></body></html>")
    }

    #[test]
    fn test_run_follows_and_dedups() {
        let start = catalog(&["S2_A", "S2_B", "MISSING"]);
        let a = detail("Sentinel-2 MSI");
        let b = detail("Sentinel-2 MSI");
        let fetcher = MapFetcher::new(&[
            (ROOT, &start),
            (&format!("{ROOT}/S2_A"), &a),
            (&format!("{ROOT}/S2_B"), &b),
        ]);

        let mut crawler = Crawler::new(options());
        let mut visited = HashSet::new();
        let mut collection = CatalogCollection::new();
        let report = crawler.run(ROOT, &fetcher, &mut visited, &mut collection).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.records()[0].source_url, format!("{ROOT}/S2_A"));
        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.appended, 1);
        assert_eq!(report.duplicates, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(crawler.state(), CrawlState::Done);
    }

    #[test]
    fn test_no_follow_fetches_start_only() {
        let start = catalog(&["S2_A"]);
        let fetcher = MapFetcher::new(&[(ROOT, &start)]);
        let mut crawler = Crawler::new(Options {
            follow_links: false,
            ..options()
        });

        let mut visited = HashSet::new();
        let mut collection = CatalogCollection::new();
        let report = crawler.run(ROOT, &fetcher, &mut visited, &mut collection).unwrap();

        assert_eq!(fetcher.calls.borrow().len(), 1);
        assert_eq!(report.warnings, vec![NO_RECORDS_WARNING.to_string()]);
    }

    #[test]
    fn test_visited_links_are_skipped() {
        let start = catalog(&["S2_A"]);
        let a = detail("Sentinel-2 MSI");
        let fetcher = MapFetcher::new(&[(ROOT, &start), (&format!("{ROOT}/S2_A"), &a)]);

        let mut visited = HashSet::from([url_utils::normalize_url(&format!("{ROOT}/S2_A"))]);
        let mut collection = CatalogCollection::new();
        let report = Crawler::new(options()).run(ROOT, &fetcher, &mut visited, &mut collection).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.attempted, 0);
    }

    #[test]
    fn test_detail_budget() {
        let start = catalog(&["A", "B", "C"]);
        let pages: Vec<(String, String)> = ["A", "B", "C"]
            .iter()
            .map(|n| (format!("{ROOT}/{n}"), detail(&format!("Dataset {n}"))))
            .collect();
        let mut all: Vec<(&str, &str)> = pages.iter().map(|(u, h)| (u.as_str(), h.as_str())).collect();
        all.push((ROOT, &start));
        let fetcher = MapFetcher::new(&all);

        let mut crawler = Crawler::new(Options {
            max_detail_links: 2,
            ..options()
        });
        let mut collection = CatalogCollection::new();
        let report = crawler.run(ROOT, &fetcher, &mut HashSet::new(), &mut collection).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_stop_before_first_link() {
        let start = catalog(&["A"]);
        let fetcher = MapFetcher::new(&[(ROOT, &start)]);
        let mut crawler = Crawler::new(options());
        crawler.stop_handle().request_stop();

        let report = crawler
            .run(ROOT, &fetcher, &mut HashSet::new(), &mut CatalogCollection::new())
            .unwrap();
        assert!(report.stopped);
        assert_eq!(report.attempted, 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_stop_applies_to_one_run() {
        let start = catalog(&["A"]);
        let a = detail("Dataset A");
        let fetcher = MapFetcher::new(&[(ROOT, &start), (&format!("{ROOT}/A"), &a)]);
        let mut crawler = Crawler::new(options());
        let stop = crawler.stop_handle();
        stop.request_stop();

        let first = crawler
            .run(ROOT, &fetcher, &mut HashSet::new(), &mut CatalogCollection::new())
            .unwrap();
        assert!(first.stopped);
        assert!(!stop.is_stop_requested());

        let second = crawler
            .run(ROOT, &fetcher, &mut HashSet::new(), &mut CatalogCollection::new())
            .unwrap();
        assert!(!second.stopped);
        assert_eq!(second.appended, 1);
    }

    #[test]
    fn test_relative_start_url_is_rejected() {
        let fetcher = MapFetcher::new(&[]);
        let result = Crawler::new(options()).run(
            "earth-engine/datasets/catalog",
            &fetcher,
            &mut HashSet::new(),
            &mut CatalogCollection::new(),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
        assert!(fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_start_fetch_failure_is_error() {
        let fetcher = MapFetcher::new(&[]);
        let mut crawler = Crawler::new(options());
        let result = crawler.run(ROOT, &fetcher, &mut HashSet::new(), &mut CatalogCollection::new());
        assert!(result.is_err());
        assert_eq!(crawler.state(), CrawlState::Done);
    }
}
