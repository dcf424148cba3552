//! Output sink trait and error type
//!
//! A sink receives every emitted fighter and fight row, in emission order.
//! The crawl guarantees each fighter id and each fight key reaches the sink
//! at most once, so sinks do not deduplicate.

use crate::records::{FightRecord, FighterRecord};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for emitted rows
pub trait RecordSink {
    /// Appends one fighter row
    fn record_fighter(&mut self, record: &FighterRecord) -> OutputResult<()>;

    /// Appends one fight row
    fn record_fight(&mut self, record: &FightRecord) -> OutputResult<()>;

    /// Flushes anything buffered. Called once, after the frontier drains.
    fn finalize(&mut self) -> OutputResult<()>;
}
