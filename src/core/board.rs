// Ficheiro: src/core/board.rs
// Descrição: Grelha de casas. O tabuleiro é `Copy`, clonar é uma cópia profunda.

use super::types::{Piece, PieceKind, Side, Square};

/// Maior dimensão suportada por lado.
pub const MAX_DIM: u8 = 9;
const CELLS: usize = (MAX_DIM as usize) * (MAX_DIM as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
    width: u8,
    height: u8,
}

impl Board {
    /// Tabuleiro vazio. As dimensões são limitadas a `MAX_DIM`; `Game` recusa rulesets maiores.
    pub fn empty(width: u8, height: u8) -> Self {
        Self {
            cells: [None; CELLS],
            width: width.clamp(1, MAX_DIM),
            height: height.clamp(1, MAX_DIM),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    fn index(&self, square: Square) -> usize {
        square.rank as usize * self.width as usize + square.file as usize
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        square.file < self.width && square.rank < self.height
    }

    /// Casa deslocada de `(dx, dy)`, ou `None` se sair do tabuleiro.
    #[inline]
    pub fn offset(&self, square: Square, dx: i8, dy: i8) -> Option<Square> {
        let file = square.file as i16 + dx as i16;
        let rank = square.rank as i16 + dy as i16;
        if file < 0 || rank < 0 || file >= self.width as i16 || rank >= self.height as i16 {
            return None;
        }
        Some(Square::new(file as u8, rank as u8))
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        if !self.contains(square) {
            return None;
        }
        self.cells[self.index(square)]
    }

    /// Coloca ou limpa uma casa. Casas fora do tabuleiro são ignoradas.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if self.contains(square) {
            let i = self.index(square);
            self.cells[i] = piece;
        }
    }

    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.get(square);
        self.set(square, None);
        piece
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |rank| (0..width).map(move |file| Square::new(file, rank)))
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.side == side)
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces_of(side)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    pub fn count_kings(&self, side: Side) -> usize {
        self.pieces_of(side).filter(|(_, p)| p.kind == PieceKind::King).count()
    }

    /// Existe um peão não promovido de `side` nesta coluna (regra nifu).
    pub fn has_pawn_on_file(&self, side: Side, file: u8) -> bool {
        (0..self.height).any(|rank| {
            self.get(Square::new(file, rank)) == Some(Piece::new(PieceKind::Pawn, side))
        })
    }

    /// Material com sinal: positivo favorece Sente.
    pub fn material(&self) -> f64 {
        self.pieces()
            .map(|(_, p)| match p.side {
                Side::Sente => p.kind.value(),
                Side::Gote => -p.kind.value(),
            })
            .sum()
    }
}
