//! End-of-run statistics report

use crate::state::CrawlStatistics;

/// Renders the statistics as a plain-text report
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    format!(
        "=== Crawl Statistics ===\n\n\
         Pages:\n\
         \x20 Organisation/event pages: {}\n\
         \x20 Fighter profiles: {}\n\
         \x20 Deepest depth reached: {}\n\n\
         Emitted:\n\
         \x20 Fighters: {}\n\
         \x20 Fights: {}\n\n\
         Skipped:\n\
         \x20 Fetch failures: {}\n\
         \x20 Unreadable pages: {}\n\
         \x20 Unreadable bout rows: {}\n\
         \x20 Duplicate fighter results: {}\n\
         \x20 Fights already emitted: {}\n\
         \x20 Opponents beyond max depth: {}\n",
        stats.listing_pages,
        stats.fighter_pages,
        stats.max_depth_reached,
        stats.fighters_emitted,
        stats.fights_emitted,
        stats.fetch_failures,
        stats.extraction_failures,
        stats.rows_skipped,
        stats.duplicate_fighters,
        stats.duplicate_fights,
        stats.depth_limited,
    )
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
