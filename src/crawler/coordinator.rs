//! Crawler coordinator - the traversal engine
//!
//! The coordinator owns the crawl state, the frontier and the output sink,
//! and drives the crawl:
//! - Seeding the frontier from the organisation root page
//! - Expanding event pages into depth-0 fighter fetches
//! - Expanding fighter profiles into fighter/fight rows and opponent fetches
//! - Dropping items whose fetch or extraction fails
//!
//! Fetches run as spawned tasks and may finish in any order. Their results
//! are joined and processed one at a time on the coordinator, which is the
//! only code touching `CrawlState`, so every check-and-insert is atomic with
//! respect to other completions.

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{parse_html, FieldExtractor, SherdogExtractor};
use crate::crawler::scheduler::{FetchTask, ScheduledFetch, Scheduler};
use crate::output::RecordSink;
use crate::records::{Bout, FightRecord, FighterId, FighterRecord, FrontierItem};
use crate::state::{CrawlState, CrawlStatistics};
use crate::url::{is_same_host, matches_path_prefix, resolve_fighter, resolve_link};
use crate::{ExtractionError, FetchError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Progress is logged every this many fighter pages
const PROGRESS_INTERVAL: u64 = 25;

type Completion = (FetchTask, Result<String, FetchError>);

/// Outcome of a finished crawl
#[derive(Debug)]
pub struct CrawlReport<S> {
    /// Final dedup state: every fighter recorded and fight key emitted
    pub state: CrawlState,

    /// Counters for the run
    pub statistics: CrawlStatistics,

    /// The sink, finalized
    pub sink: S,
}

/// Main crawler coordinator structure
pub struct Coordinator<F, S, E = SherdogExtractor> {
    root_url: Url,
    event_path_prefix: String,
    max_depth: u32,
    fetcher: Arc<F>,
    extractor: E,
    sink: S,
    state: CrawlState,
    scheduler: Scheduler,
    statistics: CrawlStatistics,
    tasks: JoinSet<Completion>,
    /// Opponents read from each recorded fighter's page
    opponents: HashMap<FighterId, Vec<(FighterId, Url)>>,
    started: Instant,
}

impl<F, S> Coordinator<F, S, SherdogExtractor>
where
    F: PageFetcher,
    S: RecordSink,
{
    /// Creates a coordinator using the Sherdog page layout
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(FightFinderError)` - The root URL in the config does not parse
    pub fn new(config: &Config, fetcher: F, sink: S) -> crate::Result<Self> {
        Ok(Self {
            root_url: Url::parse(&config.crawler.root_url)?,
            event_path_prefix: config.crawler.event_path_prefix.clone(),
            max_depth: config.crawler.max_depth,
            fetcher: Arc::new(fetcher),
            extractor: SherdogExtractor::new(),
            sink,
            state: CrawlState::new(),
            scheduler: Scheduler::new(config.crawler.max_concurrent_fetches as usize),
            statistics: CrawlStatistics::new(),
            tasks: JoinSet::new(),
            opponents: HashMap::new(),
            started: Instant::now(),
        })
    }
}

impl<F, S, E> Coordinator<F, S, E>
where
    F: PageFetcher,
    S: RecordSink,
    E: FieldExtractor,
{
    /// Replaces the field extractor (for sites with a different layout)
    pub fn with_extractor<E2: FieldExtractor>(self, extractor: E2) -> Coordinator<F, S, E2> {
        Coordinator {
            root_url: self.root_url,
            event_path_prefix: self.event_path_prefix,
            max_depth: self.max_depth,
            fetcher: self.fetcher,
            extractor,
            sink: self.sink,
            state: self.state,
            scheduler: self.scheduler,
            statistics: self.statistics,
            tasks: self.tasks,
            opponents: self.opponents,
            started: self.started,
        }
    }

    /// Runs the crawl until the frontier is empty and every fetch has resolved
    ///
    /// Per-item failures are logged and counted, never returned. The only
    /// errors are sink failures.
    pub async fn run(mut self) -> crate::Result<CrawlReport<S>> {
        tracing::info!(
            "Starting crawl from {} (max depth {})",
            self.root_url,
            self.max_depth
        );
        self.started = Instant::now();

        self.seed();

        loop {
            self.dispatch_ready();

            let Some(joined) = self.tasks.join_next().await else {
                break;
            };

            match joined {
                Ok((task, result)) => self.handle_completion(task, result)?,
                Err(e) => {
                    tracing::warn!("Fetch task did not complete: {}", e);
                    self.statistics.fetch_failures += 1;
                }
            }
        }

        if !self.scheduler.is_empty() {
            tracing::warn!(
                "Crawl stopped with {} tasks still in the frontier",
                self.scheduler.frontier_size()
            );
        }

        self.sink.finalize()?;

        tracing::info!(
            "Crawl completed: {} fighters, {} fights in {:?}",
            self.statistics.fighters_emitted,
            self.statistics.fights_emitted,
            self.started.elapsed()
        );

        Ok(CrawlReport {
            state: self.state,
            statistics: self.statistics,
            sink: self.sink,
        })
    }

    /// Enqueues the organisation root page
    fn seed(&mut self) {
        let root = self.root_url.clone();
        if self.state.claim_page(&root) {
            self.scheduler.push(FetchTask::Organization(root));
        }
    }

    /// Spawns fetches until the frontier is empty or no slot is free
    fn dispatch_ready(&mut self) {
        while let Some(ScheduledFetch { task, permit }) = self.scheduler.try_next() {
            let fetcher = Arc::clone(&self.fetcher);
            let url = task.url().clone();
            tracing::debug!("Fetching {}", url);

            self.tasks.spawn(async move {
                let result = fetcher.fetch(&url).await;
                drop(permit);
                (task, result)
            });
        }
    }

    fn handle_completion(
        &mut self,
        task: FetchTask,
        result: Result<String, FetchError>,
    ) -> crate::Result<()> {
        let body = match result {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", task.url(), e);
                self.statistics.fetch_failures += 1;
                return Ok(());
            }
        };

        match task {
            FetchTask::Organization(url) => {
                self.process_organization(&url, &body);
                Ok(())
            }
            FetchTask::Event(url) => {
                self.process_event(&url, &body);
                Ok(())
            }
            FetchTask::Fighter(item) => self.process_fighter(item, &body),
        }
    }

    /// Enqueues every event page linked from the organisation page
    ///
    /// A root page without event links but with a fight card is treated as
    /// an event page itself.
    fn process_organization(&mut self, url: &Url, body: &str) {
        let document = parse_html(body);
        let listing = self.extractor.extract_listing(&document);
        self.statistics.listing_pages += 1;

        let mut found = 0;
        for href in &listing.links {
            let Ok(event_url) = resolve_link(href, url) else {
                continue;
            };
            if !is_same_host(&event_url, url)
                || !matches_path_prefix(&event_url, &self.event_path_prefix)
            {
                continue;
            }
            found += 1;
            if self.state.claim_page(&event_url) {
                self.scheduler.push(FetchTask::Event(event_url));
            }
        }

        tracing::info!("Organisation page {} lists {} event links", url, found);

        if found == 0 && !listing.fighter_links.is_empty() {
            tracing::info!("No event links on {}, reading it as an event page", url);
            self.seed_fighters(url, &listing.fighter_links);
        }
    }

    /// Enqueues every unseen fighter on an event's card at depth 0
    fn process_event(&mut self, url: &Url, body: &str) {
        let document = parse_html(body);
        let listing = self.extractor.extract_listing(&document);
        self.statistics.listing_pages += 1;

        tracing::debug!(
            "Event {} lists {} fighters",
            url,
            listing.fighter_links.len()
        );
        self.seed_fighters(url, &listing.fighter_links);
    }

    fn seed_fighters(&mut self, page_url: &Url, hrefs: &[String]) {
        let mut on_page = HashSet::new();

        for href in hrefs {
            match resolve_fighter(href, page_url) {
                Ok((id, fighter_url)) => {
                    if on_page.insert(id.clone()) {
                        self.enqueue_fighter(id, fighter_url, 0);
                    }
                }
                Err(e) => tracing::debug!("Ignoring fighter link on {}: {}", page_url, e),
            }
        }
    }

    /// Records the fighter, emits new fights and follows its opponents
    fn process_fighter(&mut self, item: FrontierItem, body: &str) -> crate::Result<()> {
        let document = parse_html(body);
        let profile = match self.extractor.extract_fighter(&document) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Skipping fighter {} ({}): {}", item.fighter, item.url, e);
                self.statistics.extraction_failures += 1;
                return Ok(());
            }
        };
        drop(document);

        self.statistics.fighter_pages += 1;
        // The depth may have been lowered since the task was queued
        let depth = self
            .state
            .fighter_depth(&item.fighter)
            .unwrap_or(item.depth);
        self.statistics.observe_depth(depth);

        // Another path completed this fighter while the fetch was in flight
        if self.state.is_recorded(&item.fighter) {
            tracing::debug!("Discarding duplicate result for {}", item.fighter);
            self.statistics.duplicate_fighters += 1;
            return Ok(());
        }

        let record = FighterRecord::new(
            item.fighter.clone(),
            profile.weight_class,
            profile.birth_date,
        );
        if !self.state.record_fighter(record.clone()) {
            self.statistics.duplicate_fighters += 1;
            return Ok(());
        }
        self.sink.record_fighter(&record)?;
        self.statistics.fighters_emitted += 1;

        let mut opponents = Vec::new();
        for row in profile.bouts {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("Skipping bout row on {}: {}", item.fighter, e);
                    self.statistics.rows_skipped += 1;
                    continue;
                }
            };

            let (opponent, opponent_url) = match resolve_fighter(&row.opponent_href, &item.url) {
                Ok(resolved) => resolved,
                Err(e) => {
                    let e = ExtractionError::InvalidLink {
                        href: row.opponent_href.clone(),
                        reason: e.to_string(),
                    };
                    tracing::debug!("Skipping bout row on {}: {}", item.fighter, e);
                    self.statistics.rows_skipped += 1;
                    continue;
                }
            };

            let bout = Bout::new(
                opponent.clone(),
                &row.result,
                &row.method,
                &row.round,
                &row.time,
                &row.date,
            );
            let fight = FightRecord::from_bout(&item.fighter, &bout);

            if self.state.record_fight(fight.key()) {
                self.sink.record_fight(&fight)?;
                self.statistics.fights_emitted += 1;
            } else {
                self.statistics.duplicate_fights += 1;
            }

            opponents.push((opponent, opponent_url));
        }

        self.opponents.insert(item.fighter.clone(), opponents);
        self.expand_opponents(&item.fighter);

        if self.statistics.fighter_pages % PROGRESS_INTERVAL == 0 {
            let elapsed = self.started.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::info!(
                "Progress: {} fighters, {} fights, {} in frontier, {} in flight ({:.1} pages/s)",
                self.statistics.fighters_emitted,
                self.statistics.fights_emitted,
                self.scheduler.frontier_size(),
                self.scheduler.in_flight(),
                self.statistics.pages_processed() as f64 / elapsed
            );
        }

        Ok(())
    }

    /// Enqueues a recorded fighter's opponents one hop below its best depth
    fn expand_opponents(&mut self, fighter: &FighterId) {
        let Some(depth) = self.state.fighter_depth(fighter) else {
            return;
        };
        let Some(opponents) = self.opponents.get(fighter).cloned() else {
            return;
        };

        for (opponent, url) in opponents {
            self.enqueue_fighter(opponent, url, depth + 1);
        }
    }

    /// Claims and enqueues a fighter fetch if it is within the depth bound
    ///
    /// The depth check comes first so a too-deep discovery does not claim a
    /// fighter that a shorter path may still reach. A shorter path to a
    /// fighter that is already recorded re-expands its opponents from the
    /// new depth, so the reach of the crawl does not depend on which page
    /// arrived first.
    fn enqueue_fighter(&mut self, id: FighterId, url: Url, depth: u32) {
        if depth > self.max_depth {
            if !self.state.has_fighter(&id) {
                tracing::trace!("Not following {} at depth {}", id, depth);
                self.statistics.depth_limited += 1;
            }
            return;
        }

        if self.state.claim_fighter(&id, depth) {
            self.scheduler
                .push(FetchTask::Fighter(FrontierItem::new(id, url, depth)));
            return;
        }

        if self.state.lower_depth(&id, depth) && self.state.is_recorded(&id) {
            tracing::debug!("Shorter path to {} (depth {}), following it again", id, depth);
            self.expand_opponents(&id);
        }
    }
}
