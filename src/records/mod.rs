//! Record types emitted by the crawl
//!
//! - `FighterId`: canonical profile path, the primary key for fighters
//! - `FighterRecord`: one row of the fighter dataset
//! - `FightKey` / `FightRecord`: one row of the fight dataset, keyed by the
//!   unordered participant pair plus the bout date
//! - `FrontierItem`: a pending fighter-profile fetch and the depth it was
//!   discovered at

mod fight;
mod fighter;

pub use fight::{Bout, FightKey, FightRecord};
pub use fighter::{FighterId, FighterRecord};

use url::Url;

/// A fighter profile waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// The fighter this fetch is for
    pub fighter: FighterId,

    /// Absolute URL of the profile page
    pub url: Url,

    /// Opponent hops from an event-seeded fighter (event-seeded = 0)
    pub depth: u32,
}

impl FrontierItem {
    pub fn new(fighter: FighterId, url: Url, depth: u32) -> Self {
        Self {
            fighter,
            url,
            depth,
        }
    }
}
