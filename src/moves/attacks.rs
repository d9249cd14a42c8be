// Ficheiro: src/moves/attacks.rs
// Descrição: Oráculo de alcance: "a casa X é atacada pelo adversário de Y?"
//
// A pesquisa parte da casa alvo e procura atacantes, em vez de gerar os lances de
// todas as peças adversárias. A ordem (vizinhos, raios, saltos) termina no primeiro acerto.

use crate::core::{Board, Offset, PieceKind, Side, Square};

const NEIGHBOURS: [Offset; 8] = [(-1, 1), (0, 1), (1, 1), (-1, 0), (1, 0), (-1, -1), (0, -1), (1, -1)];

/// Verifica se alguma peça do adversário de `defender` alcança `target` num lance.
/// Não depende de quem está a jogar nem da peça que ocupa `target`.
pub fn is_attacked(board: &Board, defender: Side, target: Square) -> bool {
    let attacker = defender.opponent();
    attacked_by_step(board, attacker, target)
        || attacked_by_slide(board, attacker, target)
        || attacked_by_jump(board, attacker, target)
}

/// Casas adjacentes: rei, ouros e equivalentes, prata, peão, passos do dragão e do cavalo.
fn attacked_by_step(board: &Board, attacker: Side, target: Square) -> bool {
    NEIGHBOURS.iter().any(|&(dx, dy)| {
        let Some(from) = board.offset(target, dx, dy) else {
            return false;
        };
        match board.get(from) {
            // O atacante move-se de `from` para `target`, ou seja, (-dx, -dy)
            Some(p) if p.side == attacker => p
                .kind
                .rule()
                .steps
                .iter()
                .any(|&o| attacker.orient(o) == (-dx, -dy)),
            _ => false,
        }
    })
}

/// Oito raios: a primeira peça encontrada só conta se deslizar na direção certa.
/// A lança só ataca ao longo do seu próprio sentido de avanço.
fn attacked_by_slide(board: &Board, attacker: Side, target: Square) -> bool {
    NEIGHBOURS.iter().any(|&(dx, dy)| {
        let mut current = target;
        while let Some(next) = board.offset(current, dx, dy) {
            if let Some(p) = board.get(next) {
                return p.side == attacker
                    && p.kind.rule().slides.iter().any(|&o| attacker.orient(o) == (-dx, -dy));
            }
            current = next;
        }
        false
    })
}

/// Casas de onde um cavalo adversário saltaria para `target`.
fn attacked_by_jump(board: &Board, attacker: Side, target: Square) -> bool {
    PieceKind::ALL
        .iter()
        .filter(|k| !k.rule().jumps.is_empty())
        .any(|&kind| {
            kind.rule().jumps.iter().any(|&jump| {
                let (dx, dy) = attacker.orient(jump);
                matches!(
                    board.offset(target, -dx, -dy).and_then(|from| board.get(from)),
                    Some(p) if p.side == attacker && p.kind == kind
                )
            })
        })
}
