// Ficheiro: src/moves/step.rs
// Descrição: Lances de passo (rei, ouro, prata, peão) e de salto (cavalo).

use crate::core::{Board, Offset, Side, Square};

/// Acrescenta os destinos de deslocamentos fixos. Saltos e passos só diferem na
/// tabela usada: nenhum dos dois olha para as casas intermédias.
#[inline]
pub fn push_offsets(board: &Board, from: Square, side: Side, offsets: &[Offset], out: &mut Vec<Square>) {
    for &offset in offsets {
        let (dx, dy) = side.orient(offset);
        if let Some(to) = board.offset(from, dx, dy) {
            // Casas ocupadas por peças próprias nunca são candidatas
            match board.get(to) {
                Some(p) if p.side == side => {}
                _ => out.push(to),
            }
        }
    }
}
