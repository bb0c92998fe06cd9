//! Crawl the Earth Engine catalog, or a saved copy of it, and write the
//! extracted dataset records as JSON and/or CSV.
//!
//! ```text
//! ee_catalog_crawl https://developers.google.com/earth-engine/datasets/catalog --max-detail 10 --json out.json
//! ee_catalog_crawl ./saved/catalog.html --site-url https://developers.google.com/earth-engine/datasets/catalog --csv out.csv
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;
use url::Url;

use ee_catalog_crawler::{
    output, url_utils, CatalogCollection, Crawler, FileFetcher, HttpConfig, HttpFetcher, Options, PageFetcher,
};

#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "ee_catalog_crawl", version, about = "Earth Engine dataset catalog crawler")]
struct Cli {
    /// Catalog URL (http/https) or path to a saved HTML page
    start: String,

    /// JSON options file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extract the start page only
    #[arg(long)]
    no_follow: bool,

    /// Title, description, dates and provider only
    #[arg(long)]
    minimal: bool,

    /// Max links fetched per run
    #[arg(long)]
    max_follow: Option<usize>,

    /// Max dataset detail links fetched per run
    #[arg(long)]
    max_detail: Option<usize>,

    /// Pause between fetches in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Skip theme classification and gazetteer lookups
    #[arg(long)]
    no_enrich: bool,

    /// Do not collect thumbnails
    #[arg(long)]
    no_thumbnails: bool,

    /// Site URL a local START stands in for, so absolute and root-relative
    /// links resolve into the saved directory
    #[arg(long)]
    site_url: Option<String>,

    /// Write records as pretty JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write records as flattened CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

impl Cli {
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_json_file(path)?,
            None => Options::default(),
        };

        if self.no_follow {
            options.follow_links = false;
        }
        if self.minimal {
            options.minimal_mode = true;
        }
        if self.no_enrich {
            options.enrich = false;
        }
        if self.no_thumbnails {
            options.include_thumbnails = false;
        }
        if let Some(n) = self.max_follow {
            options.max_follow_links = n;
        }
        if let Some(n) = self.max_detail {
            options.max_detail_links = n;
        }
        if let Some(ms) = self.delay_ms {
            options.request_delay = Duration::from_millis(ms);
        }
        Ok(options)
    }
}

fn is_remote(start: &str) -> bool {
    url_utils::is_absolute_url(start).0
}

/// Start URL and fetcher for a saved page on disk.
fn local_start(path: &Path, site_url: Option<&str>) -> anyhow::Result<(String, FileFetcher)> {
    let path = path
        .canonicalize()
        .with_context(|| format!("cannot open {}", path.display()))?;
    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();

    match site_url {
        Some(site) => {
            if !is_remote(site) {
                bail!("--site-url must be an http(s) URL: {site}");
            }
            let fetcher = FileFetcher::new(root).with_alias(site, &path);
            Ok((site.to_string(), fetcher))
        }
        None => {
            let url = Url::from_file_path(&path)
                .map_err(|()| anyhow::anyhow!("not an absolute path: {}", path.display()))?;
            Ok((url.to_string(), FileFetcher::new(root)))
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let options = cli.options()?;

    let (start_url, fetcher): (String, Box<dyn PageFetcher>) = if is_remote(&cli.start) {
        let config = HttpConfig {
            timeout: Duration::from_secs(cli.timeout),
            insecure: cli.insecure,
            ..HttpConfig::default()
        };
        (cli.start.clone(), Box::new(HttpFetcher::new(&config)?))
    } else {
        let (url, fetcher) = local_start(Path::new(&cli.start), cli.site_url.as_deref())?;
        (url, Box::new(fetcher))
    };

    let mut crawler = Crawler::new(options);
    let mut visited = HashSet::new();
    let mut collection = CatalogCollection::new();
    let report = crawler
        .run(&start_url, fetcher.as_ref(), &mut visited, &mut collection)
        .with_context(|| format!("crawl of {start_url} failed"))?;

    let records = collection.into_records();
    if let Some(path) = &cli.json {
        output::write_json(path, &records).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.csv {
        output::write_csv(path, &records).with_context(|| format!("writing {}", path.display()))?;
    }
    if cli.json.is_none() && cli.csv.is_none() {
        println!("{}", output::to_json_string(&records)?);
    }

    eprintln!(
        "{} records from {} links ({} fetched, {} failed, {} skipped, {} duplicates) in {:.1}s",
        report.appended,
        report.attempted,
        report.fetched,
        report.failed,
        report.skipped,
        report.duplicates,
        t0.elapsed().as_secs_f64()
    );
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    Ok(())
}
