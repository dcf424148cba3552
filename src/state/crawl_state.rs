use crate::records::{FightKey, FighterId, FighterRecord};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Everything the crawl has already seen.
///
/// The state only grows. All operations are plain in-memory set updates and
/// cannot fail; check-and-insert pairs are single calls (`claim_*`,
/// `record_*`) so callers never split them around an await point.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Fighters whose profile fetch has been enqueued, with the shallowest
    /// depth they have been reached at
    claimed: HashMap<FighterId, u32>,

    /// Fighters whose record has been created
    fighters: HashMap<FighterId, FighterRecord>,

    /// Fights already emitted
    fights: HashSet<FightKey>,

    /// Organisation and event pages already enqueued
    pages: HashSet<Url>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a record exists for `id` or a fetch for it has been enqueued
    pub fn has_fighter(&self, id: &FighterId) -> bool {
        self.claimed.contains_key(id) || self.fighters.contains_key(id)
    }

    /// Marks `id` as claimed for fetching.
    ///
    /// Returns `false` if the fighter was already claimed or recorded, in
    /// which case the caller must not issue a fetch.
    pub fn claim_fighter(&mut self, id: &FighterId, depth: u32) -> bool {
        if self.has_fighter(id) {
            return false;
        }
        self.claimed.insert(id.clone(), depth);
        true
    }

    /// Shallowest depth a claimed fighter has been reached at
    pub fn fighter_depth(&self, id: &FighterId) -> Option<u32> {
        self.claimed.get(id).copied()
    }

    /// Notes a shorter path to a claimed fighter.
    ///
    /// Returns `true` only if `depth` is below the depth known so far.
    pub fn lower_depth(&mut self, id: &FighterId, depth: u32) -> bool {
        match self.claimed.get_mut(id) {
            Some(known) if depth < *known => {
                *known = depth;
                true
            }
            _ => false,
        }
    }

    /// True once a record for `id` has been created
    pub fn is_recorded(&self, id: &FighterId) -> bool {
        self.fighters.contains_key(id)
    }

    /// Inserts the record unless one already exists for its id.
    ///
    /// Returns whether an insertion happened; `false` means a duplicate and
    /// the caller must discard anything derived from it.
    pub fn record_fighter(&mut self, record: FighterRecord) -> bool {
        if self.fighters.contains_key(&record.id) {
            return false;
        }
        self.fighters.insert(record.id.clone(), record);
        true
    }

    pub fn has_fight(&self, key: &FightKey) -> bool {
        self.fights.contains(key)
    }

    /// Inserts the fight key; returns `false` if it was already present
    pub fn record_fight(&mut self, key: FightKey) -> bool {
        self.fights.insert(key)
    }

    /// Claims an organisation or event page; returns `false` if already claimed
    pub fn claim_page(&mut self, url: &Url) -> bool {
        self.pages.insert(url.clone())
    }

    /// Looks up a created fighter record
    pub fn fighter(&self, id: &FighterId) -> Option<&FighterRecord> {
        self.fighters.get(id)
    }

    pub fn fighter_count(&self) -> usize {
        self.fighters.len()
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn fight_count(&self) -> usize {
        self.fights.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> FighterId {
        FighterId::new(s)
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = CrawlState::new();
        assert_eq!(state.fighter_count(), 0);
        assert_eq!(state.fight_count(), 0);
        assert!(!state.has_fighter(&id("/fighter/A-1")));
    }

    #[test]
    fn test_claim_is_exclusive() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");

        assert!(state.claim_fighter(&a, 0));
        assert!(state.has_fighter(&a));
        assert!(!state.is_recorded(&a));
        assert!(!state.claim_fighter(&a, 0));
    }

    #[test]
    fn test_record_first_write_wins() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");

        let first = FighterRecord::new(a.clone(), Some("Lightweight".into()), None);
        let second = FighterRecord::new(a.clone(), Some("Welterweight".into()), None);

        assert!(state.record_fighter(first));
        assert!(!state.record_fighter(second));
        assert_eq!(
            state.fighter(&a).and_then(|r| r.weight_class.as_deref()),
            Some("Lightweight")
        );
        assert_eq!(state.fighter_count(), 1);
    }

    #[test]
    fn test_recorded_fighter_cannot_be_claimed() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");

        assert!(state.record_fighter(FighterRecord::new(a.clone(), None, None)));
        assert!(state.has_fighter(&a));
        assert!(!state.claim_fighter(&a, 0));
    }

    #[test]
    fn test_record_after_claim() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");

        assert!(state.claim_fighter(&a, 0));
        assert!(state.record_fighter(FighterRecord::new(a.clone(), None, None)));
        assert!(state.is_recorded(&a));
        assert_eq!(state.claimed_count(), 1);
    }

    #[test]
    fn test_depth_only_gets_shallower() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");

        assert!(!state.lower_depth(&a, 0));
        assert!(state.claim_fighter(&a, 2));
        assert_eq!(state.fighter_depth(&a), Some(2));

        assert!(!state.lower_depth(&a, 3));
        assert!(!state.lower_depth(&a, 2));
        assert!(state.lower_depth(&a, 1));
        assert_eq!(state.fighter_depth(&a), Some(1));

        // A second claim never overwrites the depth
        assert!(!state.claim_fighter(&a, 0));
        assert_eq!(state.fighter_depth(&a), Some(1));
    }

    #[test]
    fn test_fight_recorded_once_from_either_side() {
        let mut state = CrawlState::new();
        let a = id("/fighter/A-1");
        let b = id("/fighter/B-2");

        assert!(state.record_fight(FightKey::new(&a, &b, "2020-01-01")));
        assert!(state.has_fight(&FightKey::new(&b, &a, "2020-01-01")));
        assert!(!state.record_fight(FightKey::new(&b, &a, "2020-01-01")));
        assert_eq!(state.fight_count(), 1);
    }

    #[test]
    fn test_claim_page() {
        let mut state = CrawlState::new();
        let url = Url::parse("https://example.com/events/Event-1").unwrap();

        assert!(state.claim_page(&url));
        assert!(!state.claim_page(&url));
        assert_eq!(state.page_count(), 1);
    }
}
