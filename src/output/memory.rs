use crate::output::traits::{OutputResult, RecordSink};
use crate::records::{FightRecord, FighterRecord};

/// Sink that keeps every emitted row in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub fighters: Vec<FighterRecord>,
    pub fights: Vec<FightRecord>,
    pub finalized: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn record_fighter(&mut self, record: &FighterRecord) -> OutputResult<()> {
        self.fighters.push(record.clone());
        Ok(())
    }

    fn record_fight(&mut self, record: &FightRecord) -> OutputResult<()> {
        self.fights.push(record.clone());
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.finalized = true;
        Ok(())
    }
}
