// Ficheiro: src/moves/mod.rs
// Descrição: Declara os submódulos da geração de lances e o despacho por tipo de peça.

pub mod attacks;
pub mod legal;
pub mod sliding;
pub mod step;

pub use attacks::is_attacked;
pub use legal::*;

use crate::core::{Board, Piece, Square};

/// Destinos pseudo-legais de uma peça, sem verificar se o próprio rei fica em xeque.
pub fn candidate_moves(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    let rule = piece.kind.rule();
    let mut out = Vec::with_capacity(16);
    step::push_offsets(board, from, piece.side, rule.steps, &mut out);
    step::push_offsets(board, from, piece.side, rule.jumps, &mut out);
    sliding::push_slides(board, from, piece.side, rule.slides, &mut out);
    out
}
