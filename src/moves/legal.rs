// Ficheiro: src/moves/legal.rs
// Descrição: Filtro de legalidade: lances pseudo-legais menos os que deixam o rei em xeque,
// e largadas com as restrições de última fileira, nifu e uchifuzume.

use super::{attacks::is_attacked, candidate_moves};
use crate::core::{Board, Hand, Move, Piece, PieceKind, Ruleset, Side, Square};

/// O rei de `side` está atacado. Sem rei no tabuleiro nunca há xeque.
#[inline]
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .is_some_and(|king| is_attacked(board, side, king))
}

/// Aplica um lance numa cópia e verifica se o rei de quem jogou fica a salvo.
pub fn leaves_king_safe(board: &Board, side: Side, mv: &Move) -> bool {
    let mut scratch = *board;
    if let Some(from) = mv.from {
        scratch.set(from, None);
    }
    scratch.set(mv.to, Some(Piece::new(mv.kind, side)));

    let king = if mv.kind == PieceKind::King {
        Some(mv.to)
    } else {
        scratch.king_square(side)
    };
    king.map_or(true, |sq| !is_attacked(&scratch, side, sq))
}

/// Destinos legais da peça em `from`, que tem de pertencer a `side`.
pub fn legal_destinations(board: &Board, side: Side, from: Square) -> Vec<Square> {
    match board.get(from) {
        Some(piece) if piece.side == side => candidate_moves(board, from, piece)
            .into_iter()
            .filter(|&to| board.get(to).map_or(true, |p| p.kind != PieceKind::King))
            .filter(|&to| leaves_king_safe(board, side, &Move::board(piece.kind, from, to, false)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Todos os lances de tabuleiro legais, com `promote == false`.
pub fn legal_board_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces_of(side) {
        for to in legal_destinations(board, side, from) {
            moves.push(Move::board(piece.kind, from, to, false));
        }
    }
    moves
}

/// Verifica as restrições de uma largada de `kind` em `to`.
pub fn is_drop_legal(board: &Board, hands: &[Hand; 2], side: Side, ruleset: &Ruleset, kind: PieceKind, to: Square) -> bool {
    if !ruleset.drops || hands[side.index()].count(kind) == 0 {
        return false;
    }
    if !board.contains(to) || board.get(to).is_some() {
        return false;
    }
    // Peão e lança na última fileira, cavalo nas duas últimas
    if ruleset.is_dead_square(kind, side, to) {
        return false;
    }
    // Nifu
    if kind == PieceKind::Pawn && board.has_pawn_on_file(side, to.file) {
        return false;
    }

    let mv = Move::drop(kind, to);
    if !leaves_king_safe(board, side, &mv) {
        return false;
    }
    !(kind == PieceKind::Pawn && is_pawn_drop_mate(board, side, to))
}

/// Uchifuzume: a largada de peão em `to` dá xeque-mate imediato.
fn is_pawn_drop_mate(board: &Board, side: Side, to: Square) -> bool {
    let defender = side.opponent();
    // Só há xeque se o rei adversário estiver mesmo à frente do peão
    let gives_check = board
        .offset(to, 0, side.forward())
        .is_some_and(|sq| board.king_square(defender) == Some(sq));
    if !gives_check {
        return false;
    }

    let mut scratch = *board;
    scratch.set(to, Some(Piece::new(PieceKind::Pawn, side)));
    // O xeque de peão é adjacente: nenhuma largada o pode interpor
    legal_board_moves(&scratch, defender).is_empty()
}

pub fn legal_drops(board: &Board, hands: &[Hand; 2], side: Side, ruleset: &Ruleset) -> Vec<Move> {
    let mut moves = Vec::new();
    if !ruleset.drops {
        return moves;
    }
    for (kind, _) in hands[side.index()].iter() {
        for to in board.squares() {
            if is_drop_legal(board, hands, side, ruleset, kind, to) {
                moves.push(Move::drop(kind, to));
            }
        }
    }
    moves
}

/// Lances legais de `side`: tabuleiro primeiro, depois largadas.
pub fn legal_moves(board: &Board, hands: &[Hand; 2], side: Side, ruleset: &Ruleset) -> Vec<Move> {
    let mut moves = legal_board_moves(board, side);
    moves.extend(legal_drops(board, hands, side, ruleset));
    moves
}
