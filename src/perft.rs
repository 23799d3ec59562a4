use crate::movegen::MoveGenerator;
use crate::state::{Board, WHITE};
use std::time::Instant;

/// Count complete move sequences to `depth`. A whole capture sequence
/// is one move, as the generator emits it.
pub fn perft(board: &Board, side: usize, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut gen = MoveGenerator::new();
    gen.generate_legal(board, side);
    if depth == 1 {
        return gen.list.count as u64;
    }
    let mut nodes = 0;
    for i in 0..gen.list.count {
        let mv = gen.list.moves[i];
        let next = board.apply_move(&mv, side);
        nodes += perft(&next, 3 - side, depth - 1);
    }
    nodes
}

// Debugging tool: per-root-move counts for the first ply.
pub fn perft_divide(board: &Board, side: usize, depth: u8) {
    println!("--- Perft Divide Depth {} ---", depth);
    let mut gen = MoveGenerator::new();
    gen.generate_legal(board, side);

    let mut total = 0;
    for i in 0..gen.list.count {
        let mv = gen.list.moves[i];
        let next = board.apply_move(&mv, side);
        let count = if depth > 1 { perft(&next, 3 - side, depth - 1) } else { 1 };
        println!("{}: {}", mv, count);
        total += count;
    }
    println!("Total: {}", total);
}

pub fn run_perft_suite() {
    println!("--- Poddavki Perft Suite ---");

    let positions: [(&str, Board, usize, &[u64]); 3] = [
        ("Opening", Board::initial(), WHITE, &[1, 7, 49]),
        (
            "Forced capture",
            Board::from_masks(1 << 8, 1 << 13, 0, WHITE),
            WHITE,
            &[1, 1],
        ),
        (
            "Lone king",
            Board::from_masks(1, 1 << 20, 1, WHITE),
            WHITE,
            &[1, 7],
        ),
    ];

    let mut total_nodes = 0;
    let mut total_time = 0;

    for (name, board, side, expected) in positions.iter() {
        println!("\nTesting: {}", name);
        let depth = (expected.len() - 1) as u8;

        let start = Instant::now();
        let nodes = perft(board, *side, depth);
        let elapsed = start.elapsed().as_millis();

        total_nodes += nodes;
        total_time += elapsed;

        println!("Depth {}: Nodes: {} Time: {}ms", depth, nodes, elapsed);
        if nodes == expected[depth as usize] {
            println!("RESULT: PASS");
        } else {
            println!("RESULT: FAIL (Expected {})", expected[depth as usize]);
            perft_divide(board, *side, depth);
        }
    }

    println!("\n--- SUITE COMPLETE ---");
    println!("Total Nodes: {}", total_nodes);
    println!("Total Time:  {}ms", total_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, BLACK};

    #[test]
    fn test_perft_opening() {
        crate::zobrist::init_zobrist();
        let board = Board::initial();
        assert_eq!(perft(&board, WHITE, 1), 7);
        assert_eq!(perft(&board, WHITE, 2), 49);
    }

    #[test]
    fn test_perft_opening_black_mirrors() {
        crate::zobrist::init_zobrist();
        let board = Board::initial();
        assert_eq!(perft(&board, BLACK, 1), 7);
        assert_eq!(perft(&board, BLACK, 2), 49);
    }

    #[test]
    fn test_perft_lone_king() {
        crate::zobrist::init_zobrist();
        // King in its corner: one short diagonal, one long.
        let board = Board::from_masks(1, 1 << 20, 1, WHITE);
        assert_eq!(perft(&board, WHITE, 1), 7);
    }
}
