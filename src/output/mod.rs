//! Output module: where emitted rows go
//!
//! - `RecordSink`: the trait the crawl writes through
//! - `TsvSink`: the two dated tab-separated files
//! - `MemorySink`: rows kept in memory
//! - statistics report printing

mod memory;
pub mod stats;
mod traits;
mod tsv;

pub use memory::MemorySink;
pub use stats::{format_statistics, print_statistics};
pub use traits::{OutputError, OutputResult, RecordSink};
pub use tsv::{fight_row, fighter_row, output_paths, TsvSink};
