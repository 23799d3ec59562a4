use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Plies the capture-only search may run past the horizon.
    pub qs_depth_cap: usize,

    /// Milliseconds shaved off every time budget for I/O latency.
    pub move_overhead_ms: u64,

    /// Transposition table size handed to a fresh engine.
    pub hash_mb: usize,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            qs_depth_cap: 8,
            move_overhead_ms: 10,
            hash_mb: 64,
        }
    }
}

impl SearchParameters {
    pub fn save_to_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load_from_json(path: &str) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let params = serde_json::from_reader(reader)?;
        Ok(params)
    }
}
