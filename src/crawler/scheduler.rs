//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - Priority queue of pending fetches (listing pages first, then fighters by depth)
//! - Capping the number of fetches in flight via a semaphore
//!
//! Deduplication and the depth bound are decided before a task reaches the
//! scheduler; it only orders and releases work.

use crate::records::FrontierItem;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A pending fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTask {
    /// The organisation root page, listing events
    Organization(Url),

    /// An event page, listing the fighters on its card
    Event(Url),

    /// A fighter profile at a given depth
    Fighter(FrontierItem),
}

impl FetchTask {
    pub fn url(&self) -> &Url {
        match self {
            Self::Organization(url) | Self::Event(url) => url,
            Self::Fighter(item) => &item.url,
        }
    }

    /// Lower values are fetched first
    fn priority(&self) -> u32 {
        match self {
            Self::Organization(_) => 0,
            Self::Event(_) => 1,
            Self::Fighter(item) => item.depth.saturating_add(2),
        }
    }
}

/// A task in the priority queue; `sequence` keeps equal priorities FIFO
#[derive(Debug)]
struct QueuedTask {
    task: FetchTask,
    priority: u32,
    sequence: u64,
}

// BinaryHeap is a max-heap: reverse both keys so the lowest priority value,
// then the oldest task, pops first.
impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedTask {}

/// A task released for fetching, holding one in-flight slot
///
/// The slot is freed when this value (or its `permit`) is dropped.
pub struct ScheduledFetch {
    pub task: FetchTask,
    pub permit: OwnedSemaphorePermit,
}

/// Scheduler manages the frontier queue and the in-flight limit
pub struct Scheduler {
    /// Limits concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Pending tasks
    frontier: BinaryHeap<QueuedTask>,

    /// Next insertion sequence number
    next_sequence: u64,

    /// Total in-flight slots
    max_in_flight: usize,
}

impl Scheduler {
    /// Creates a scheduler allowing `max_in_flight` concurrent fetches (at least 1)
    pub fn new(max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
            frontier: BinaryHeap::new(),
            next_sequence: 0,
            max_in_flight,
        }
    }

    /// Adds a task to the frontier
    pub fn push(&mut self, task: FetchTask) {
        let priority = task.priority();
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.frontier.push(QueuedTask {
            task,
            priority,
            sequence,
        });
    }

    /// Releases the next task if one is pending and a slot is free
    pub fn try_next(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        let queued = self.frontier.pop()?;

        tracing::trace!(
            "Releasing {} (priority {}, {} left in frontier)",
            queued.task.url(),
            queued.priority,
            self.frontier.len()
        );

        Some(ScheduledFetch {
            task: queued.task,
            permit,
        })
    }

    /// Returns the number of tasks waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Returns the number of released tasks still holding a slot
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.semaphore.available_permits()
    }
}
