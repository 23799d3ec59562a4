// src/zobrist.rs
use std::sync::OnceLock;

// Safe globals, written once at startup.
pub static PIECE_KEYS: OnceLock<[[u64; 32]; 4]> = OnceLock::new();
pub static BLACK_TO_MOVE: OnceLock<u64> = OnceLock::new();

pub const WHITE_MAN: usize = 0;
pub const WHITE_KING: usize = 1;
pub const BLACK_MAN: usize = 2;
pub const BLACK_KING: usize = 3;

// Fixed seed so hashes are reproducible across runs.
const SEED: u32 = 0xDEAD_BEEF;

// Simple xorshift PRNG local to this module.
struct Prng {
    state: u32,
}

impl Prng {
    fn new(seed: u32) -> Self {
        Prng { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | self.next_u32() as u64
    }
}

pub fn init_zobrist() {
    if PIECE_KEYS.get().is_some() {
        return;
    }

    let mut rng = Prng::new(SEED);

    let mut keys = [[0u64; 32]; 4];
    for kind in keys.iter_mut() {
        for square in kind.iter_mut() {
            *square = rng.next_u64();
        }
    }
    let side = rng.next_u64();

    let _ = PIECE_KEYS.set(keys);
    let _ = BLACK_TO_MOVE.set(side);
}

// Accessors
#[inline(always)]
pub fn piece_key(kind: usize, square: usize) -> u64 {
    PIECE_KEYS.get().expect("zobrist keys not initialized")[kind][square]
}

#[inline(always)]
pub fn side_key() -> u64 {
    *BLACK_TO_MOVE.get().expect("zobrist keys not initialized")
}
