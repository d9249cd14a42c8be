// Ficheiro: src/moves/sliding.rs
// Descrição: Lógica para gerar os lances de peças deslizantes (Torre, Bispo, Lança e promovidas).

use crate::core::{Board, Offset, Side, Square};

/// Caminha em cada direção até à borda ou à primeira peça. A casa ocupada
/// entra apenas se a peça for adversária.
pub fn push_slides(board: &Board, from: Square, side: Side, directions: &[Offset], out: &mut Vec<Square>) {
    for &direction in directions {
        let (dx, dy) = side.orient(direction);
        let mut current = from;
        while let Some(next) = board.offset(current, dx, dy) {
            match board.get(next) {
                None => out.push(next),
                Some(p) => {
                    if p.side != side {
                        out.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}
