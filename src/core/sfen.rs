// Ficheiro: src/core/sfen.rs
// Descrição: Leitura e escrita de posições em SFEN e assinatura de repetição.
//
// Formato: `<tabuleiro> <b|w> <reserva> [número do lance]`. O tabuleiro lista as
// fileiras de cima para baixo (vista de Sente), colunas da esquerda para a direita,
// com casas vazias comprimidas em dígitos e `+` antes das peças promovidas.

use super::board::Board;
use super::error::FormatError;
use super::types::{Hand, Piece, PieceKind, Side, Square};

/// Posição decodificada, ainda sem validação das invariantes de jogo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Side,
    pub hands: [Hand; 2],
}

pub fn parse(text: &str, width: u8, height: u8) -> Result<Position, FormatError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 3 && fields.len() != 4 {
        return Err(FormatError::FieldCount(fields.len()));
    }

    let board = parse_board(fields[0], width, height)?;
    let side_to_move = match fields[1] {
        "b" => Side::Sente,
        "w" => Side::Gote,
        other => return Err(FormatError::InvalidTurn(other.to_string())),
    };
    let hands = parse_hands(fields[2])?;

    // O número do lance é aceite mas ignorado
    if let Some(number) = fields.get(3) {
        number
            .parse::<u32>()
            .map_err(|_| FormatError::InvalidMoveNumber(number.to_string()))?;
    }

    Ok(Position { board, side_to_move, hands })
}

fn parse_board(text: &str, width: u8, height: u8) -> Result<Board, FormatError> {
    let ranks: Vec<&str> = text.split('/').collect();
    if ranks.len() != height as usize {
        return Err(FormatError::RankCount { expected: height as usize, found: ranks.len() });
    }

    let mut board = Board::empty(width, height);
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = height - 1 - row as u8;
        let mut file: usize = 0;
        let mut promoted = false;

        for c in rank_text.chars() {
            if c == '+' {
                if promoted {
                    return Err(FormatError::InvalidPromotionMarker);
                }
                promoted = true;
                continue;
            }
            if let Some(run) = c.to_digit(10) {
                if promoted || run == 0 {
                    return Err(if promoted {
                        FormatError::InvalidPromotionMarker
                    } else {
                        FormatError::UnknownPiece(c)
                    });
                }
                file += run as usize;
                continue;
            }

            let base = PieceKind::from_letter(c).ok_or(FormatError::UnknownPiece(c))?;
            let kind = if promoted {
                base.promoted().ok_or(FormatError::InvalidPromotionMarker)?
            } else {
                base
            };
            promoted = false;

            if file >= width as usize {
                return Err(FormatError::FileCount { rank: row + 1, expected: width as usize, found: file + 1 });
            }
            let side = if c.is_ascii_uppercase() { Side::Sente } else { Side::Gote };
            board.set(Square::new(file as u8, rank), Some(Piece::new(kind, side)));
            file += 1;
        }

        if promoted {
            return Err(FormatError::InvalidPromotionMarker);
        }
        if file != width as usize {
            return Err(FormatError::FileCount { rank: row + 1, expected: width as usize, found: file });
        }
    }
    Ok(board)
}

fn parse_hands(text: &str) -> Result<[Hand; 2], FormatError> {
    let mut hands = [Hand::default(); 2];
    if text == "-" {
        return Ok(hands);
    }

    let mut count: Option<u32> = None;
    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            let next = count.unwrap_or(0) * 10 + digit;
            if next > u8::MAX as u32 {
                return Err(FormatError::InvalidHandCount(text.to_string()));
            }
            count = Some(next);
            continue;
        }

        let kind = PieceKind::from_letter(c).ok_or(FormatError::UnknownPiece(c))?;
        if kind.hand_index().is_none() {
            return Err(FormatError::InvalidHandPiece(c));
        }
        let n = count.take().unwrap_or(1);
        if n == 0 {
            return Err(FormatError::InvalidHandCount(text.to_string()));
        }
        let side = if c.is_ascii_uppercase() { Side::Sente } else { Side::Gote };
        let hand = &mut hands[side.index()];
        let total = hand.count(kind) as u32 + n;
        if total > u8::MAX as u32 {
            return Err(FormatError::InvalidHandCount(text.to_string()));
        }
        hand.set(kind, total as u8);
    }

    // Dígitos soltos no fim
    if count.is_some() {
        return Err(FormatError::InvalidHandCount(text.to_string()));
    }
    Ok(hands)
}

pub fn format_board(board: &Board) -> String {
    let mut out = String::with_capacity(96);
    for rank in (0..board.height()).rev() {
        let mut empty = 0;
        for file in 0..board.width() {
            match board.get(Square::new(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    if piece.kind.is_promoted() {
                        out.push('+');
                    }
                    out.push(piece.letter());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

pub fn format_hands(hands: &[Hand; 2]) -> String {
    let mut out = String::new();
    for side in [Side::Sente, Side::Gote] {
        for (kind, count) in hands[side.index()].iter() {
            if count > 1 {
                out.push_str(&count.to_string());
            }
            out.push(Piece::new(kind, side).letter());
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

pub fn format(board: &Board, side_to_move: Side, hands: &[Hand; 2]) -> String {
    let turn = match side_to_move {
        Side::Sente => 'b',
        Side::Gote => 'w',
    };
    format!("{} {} {}", format_board(board), turn, format_hands(hands))
}

/// Chave do mapa de repetições: SFEN mais marcador de xeque do lado a jogar.
pub fn signature(board: &Board, side_to_move: Side, hands: &[Hand; 2], in_check: bool) -> String {
    let mut key = format(board, side_to_move, hands);
    key.push_str(if in_check { " !" } else { " -" });
    key
}
