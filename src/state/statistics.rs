/// Counters describing one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Organisation and event pages fetched and parsed
    pub listing_pages: u64,

    /// Fighter profile pages fetched and parsed
    pub fighter_pages: u64,

    /// Fighter rows written to the sink
    pub fighters_emitted: u64,

    /// Fight rows written to the sink
    pub fights_emitted: u64,

    /// Profile results discarded because the fighter was already recorded
    pub duplicate_fighters: u64,

    /// Bouts whose fight key had already been emitted
    pub duplicate_fights: u64,

    /// Fetches that failed (network, HTTP status, content type)
    pub fetch_failures: u64,

    /// Pages that did not have the expected shape
    pub extraction_failures: u64,

    /// Individual bout rows that could not be read
    pub rows_skipped: u64,

    /// Unknown opponents not followed because of the depth bound
    pub depth_limited: u64,

    /// Deepest depth at which a fighter page was processed
    pub max_depth_reached: u32,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pages that were fetched and parsed
    pub fn pages_processed(&self) -> u64 {
        self.listing_pages + self.fighter_pages
    }

    /// Total items skipped because of fetch or extraction failures
    pub fn items_skipped(&self) -> u64 {
        self.fetch_failures + self.extraction_failures
    }

    /// Notes that a fighter page at `depth` was processed
    pub fn observe_depth(&mut self, depth: u32) {
        self.max_depth_reached = self.max_depth_reached.max(depth);
    }
}
