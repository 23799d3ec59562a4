use crate::state::Move;

pub const FLAG_NONE: u8 = 0;
pub const FLAG_EXACT: u8 = 1;
pub const FLAG_ALPHA: u8 = 2; // upper bound, fail-low
pub const FLAG_BETA: u8 = 3; // lower bound, fail-high

#[derive(Clone, Copy)]
pub struct TTEntry {
    pub key: u64,
    pub score: i32,
    pub depth: u8,
    pub flag: u8,
    pub age: u8,
    pub best: Move,
}

impl TTEntry {
    fn vacant() -> Self {
        TTEntry { key: 0, score: 0, depth: 0, flag: FLAG_NONE, age: 0, best: Move::default() }
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Largest power-of-two entry count that fits `mb` megabytes; the
    /// index is `hash & (count - 1)` and the full 64-bit key is kept as
    /// the lock. `mb = 0` degenerates to a single entry and still
    /// behaves correctly.
    pub fn new(mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TTEntry>();
        let budget = mb * 1024 * 1024;
        let mut count = 1;
        while count * 2 * entry_size <= budget {
            count *= 2;
        }
        log::info!("TT: {} entries ({} KiB)", count, count * entry_size / 1024);
        Self {
            entries: vec![TTEntry::vacant(); count],
            mask: count - 1,
            generation: 0,
        }
    }

    /// The table is warm across root searches; only the age advances.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = TTEntry::vacant();
        }
        self.generation = 0;
    }

    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let entry = self.entries[(hash as usize) & self.mask];
        if entry.flag != FLAG_NONE && entry.key == hash {
            Some(entry)
        } else {
            None
        }
    }

    pub fn get_move(&self, hash: u64) -> Option<Move> {
        self.probe(hash).map(|e| e.best).filter(|m| !m.is_null())
    }

    pub fn store(&mut self, hash: u64, score: i32, depth: u8, flag: u8, best: Move) {
        let generation = self.generation;
        let entry = &mut self.entries[(hash as usize) & self.mask];
        // Same position or a vacant slot always loses; a colliding entry
        // survives only while it is deeper and from the current search.
        let keep = entry.flag != FLAG_NONE
            && entry.key != hash
            && entry.age == generation
            && entry.depth > depth;
        if keep {
            return;
        }
        *entry = TTEntry { key: hash, score, depth, flag, age: generation, best };
    }

    /// Permille of used slots over a fixed sample, for diagnostics.
    pub fn hashfull(&self) -> usize {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample].iter().filter(|e| e.flag != FLAG_NONE).count();
        used * 1000 / sample
    }
}
