// Ficheiro: src/core/types.rs
// Descrição: Tipos fundamentais do motor: lados, peças, casas, lances e reservas.

use std::fmt;

/// Deslocamento (dx, dy) relativo a Sente; `dy > 0` é "para a frente".
pub type Offset = (i8, i8);

/// Os dois jogadores. Sente joga primeiro e avança no sentido das fileiras crescentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Sente,
    Gote,
}

impl Side {
    #[inline(always)]
    pub fn opponent(self) -> Side {
        match self {
            Side::Sente => Side::Gote,
            Side::Gote => Side::Sente,
        }
    }

    /// Sentido do avanço no eixo das fileiras.
    #[inline(always)]
    pub fn forward(self) -> i8 {
        match self {
            Side::Sente => 1,
            Side::Gote => -1,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converte um deslocamento definido para Sente no deslocamento real deste lado.
    #[inline(always)]
    pub fn orient(self, (dx, dy): Offset) -> Offset {
        (dx, dy * self.forward())
    }
}

// Tabelas de deslocamentos, sempre do ponto de vista de Sente
const KING_STEPS: &[Offset] = &[(-1, 1), (0, 1), (1, 1), (-1, 0), (1, 0), (-1, -1), (0, -1), (1, -1)];
const GOLD_STEPS: &[Offset] = &[(-1, 1), (0, 1), (1, 1), (-1, 0), (1, 0), (0, -1)];
const SILVER_STEPS: &[Offset] = &[(-1, 1), (0, 1), (1, 1), (-1, -1), (1, -1)];
const PAWN_STEPS: &[Offset] = &[(0, 1)];
const ORTHOGONAL: &[Offset] = &[(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: &[Offset] = &[(1, 1), (1, -1), (-1, 1), (-1, -1)];
const LANCE_SLIDES: &[Offset] = &[(0, 1)];
const KNIGHT_JUMPS: &[Offset] = &[(-1, 2), (1, 2)];
const NONE: &[Offset] = &[];

/// Regra de movimento e metadados de um tipo de peça.
#[derive(Debug, Clone, Copy)]
pub struct PieceRule {
    /// Passos de uma casa (bloqueados apenas por peças próprias no destino)
    pub steps: &'static [Offset],
    /// Direções de deslize até à borda ou à primeira peça
    pub slides: &'static [Offset],
    /// Saltos que ignoram as casas intermédias
    pub jumps: &'static [Offset],
    pub value: f64,
    pub promotes_to: Option<PieceKind>,
    pub demotes_to: PieceKind,
    /// Letra SFEN da forma base, em maiúscula
    pub letter: char,
    /// Fileiras livres à frente necessárias para a peça ainda ter um lance
    pub needs_ranks_ahead: u8,
}

/// Conjunto fechado de tipos de peça.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    King,
    Rook,
    Dragon,
    Bishop,
    Horse,
    Gold,
    Silver,
    PromotedSilver,
    Knight,
    PromotedKnight,
    Lance,
    PromotedLance,
    Pawn,
    PromotedPawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 14] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Dragon,
        PieceKind::Bishop,
        PieceKind::Horse,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::PromotedSilver,
        PieceKind::Knight,
        PieceKind::PromotedKnight,
        PieceKind::Lance,
        PieceKind::PromotedLance,
        PieceKind::Pawn,
        PieceKind::PromotedPawn,
    ];

    /// Tipos que podem estar na reserva, na ordem usada pelo SFEN.
    pub const DROPPABLE: [PieceKind; 7] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    pub fn rule(self) -> &'static PieceRule {
        &RULES[self as usize]
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.rule().value
    }

    #[inline]
    pub fn promoted(self) -> Option<PieceKind> {
        self.rule().promotes_to
    }

    #[inline]
    pub fn demoted(self) -> PieceKind {
        self.rule().demotes_to
    }

    #[inline]
    pub fn is_promoted(self) -> bool {
        self.demoted() != self
    }

    /// Índice na reserva, ou `None` para o Rei e peças promovidas.
    pub fn hand_index(self) -> Option<usize> {
        PieceKind::DROPPABLE.iter().position(|&k| k == self)
    }

    /// Tipo base correspondente a uma letra SFEN (sem `+`).
    pub fn from_letter(letter: char) -> Option<PieceKind> {
        let upper = letter.to_ascii_uppercase();
        PieceKind::ALL
            .iter()
            .copied()
            .find(|k| !k.is_promoted() && k.rule().letter == upper)
    }
}

static RULES: [PieceRule; 14] = [
    // King
    PieceRule { steps: KING_STEPS, slides: NONE, jumps: NONE, value: 0.0, promotes_to: None, demotes_to: PieceKind::King, letter: 'K', needs_ranks_ahead: 0 },
    // Rook
    PieceRule { steps: NONE, slides: ORTHOGONAL, jumps: NONE, value: 19.0, promotes_to: Some(PieceKind::Dragon), demotes_to: PieceKind::Rook, letter: 'R', needs_ranks_ahead: 0 },
    // Dragon
    PieceRule { steps: DIAGONAL, slides: ORTHOGONAL, jumps: NONE, value: 22.0, promotes_to: None, demotes_to: PieceKind::Rook, letter: 'R', needs_ranks_ahead: 0 },
    // Bishop
    PieceRule { steps: NONE, slides: DIAGONAL, jumps: NONE, value: 17.0, promotes_to: Some(PieceKind::Horse), demotes_to: PieceKind::Bishop, letter: 'B', needs_ranks_ahead: 0 },
    // Horse
    PieceRule { steps: ORTHOGONAL, slides: DIAGONAL, jumps: NONE, value: 20.0, promotes_to: None, demotes_to: PieceKind::Bishop, letter: 'B', needs_ranks_ahead: 0 },
    // Gold
    PieceRule { steps: GOLD_STEPS, slides: NONE, jumps: NONE, value: 11.0, promotes_to: None, demotes_to: PieceKind::Gold, letter: 'G', needs_ranks_ahead: 0 },
    // Silver
    PieceRule { steps: SILVER_STEPS, slides: NONE, jumps: NONE, value: 10.0, promotes_to: Some(PieceKind::PromotedSilver), demotes_to: PieceKind::Silver, letter: 'S', needs_ranks_ahead: 0 },
    // PromotedSilver
    PieceRule { steps: GOLD_STEPS, slides: NONE, jumps: NONE, value: 11.0, promotes_to: None, demotes_to: PieceKind::Silver, letter: 'S', needs_ranks_ahead: 0 },
    // Knight
    PieceRule { steps: NONE, slides: NONE, jumps: KNIGHT_JUMPS, value: 6.0, promotes_to: Some(PieceKind::PromotedKnight), demotes_to: PieceKind::Knight, letter: 'N', needs_ranks_ahead: 2 },
    // PromotedKnight
    PieceRule { steps: GOLD_STEPS, slides: NONE, jumps: NONE, value: 11.0, promotes_to: None, demotes_to: PieceKind::Knight, letter: 'N', needs_ranks_ahead: 0 },
    // Lance
    PieceRule { steps: NONE, slides: LANCE_SLIDES, jumps: NONE, value: 6.0, promotes_to: Some(PieceKind::PromotedLance), demotes_to: PieceKind::Lance, letter: 'L', needs_ranks_ahead: 1 },
    // PromotedLance
    PieceRule { steps: GOLD_STEPS, slides: NONE, jumps: NONE, value: 11.0, promotes_to: None, demotes_to: PieceKind::Lance, letter: 'L', needs_ranks_ahead: 0 },
    // Pawn
    PieceRule { steps: PAWN_STEPS, slides: NONE, jumps: NONE, value: 1.0, promotes_to: Some(PieceKind::PromotedPawn), demotes_to: PieceKind::Pawn, letter: 'P', needs_ranks_ahead: 1 },
    // PromotedPawn
    PieceRule { steps: GOLD_STEPS, slides: NONE, jumps: NONE, value: 11.0, promotes_to: None, demotes_to: PieceKind::Pawn, letter: 'P', needs_ranks_ahead: 0 },
];

/// Uma peça no tabuleiro: tipo e dono. A posição é o índice da casa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Letra SFEN com o caso do dono, sem o prefixo `+`.
    pub fn letter(self) -> char {
        let letter = self.kind.rule().letter;
        match self.side {
            Side::Sente => letter,
            Side::Gote => letter.to_ascii_lowercase(),
        }
    }
}

/// Casa do tabuleiro. `file` é a coluna a partir da esquerda de Sente,
/// `rank` a fileira a partir da primeira fileira de Sente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// Coordenada USI ("7g") para um tabuleiro `width` x `height`.
    pub fn to_usi(self, width: u8, height: u8) -> String {
        let file_digit = width - self.file;
        let rank_letter = (b'a' + (height - 1 - self.rank)) as char;
        format!("{}{}", file_digit, rank_letter)
    }

    pub fn from_usi(text: &str, width: u8, height: u8) -> Option<Square> {
        let mut chars = text.chars();
        let file_digit = chars.next()?.to_digit(10)? as u8;
        let rank_letter = chars.next()?;
        if chars.next().is_some() || !rank_letter.is_ascii_lowercase() {
            return None;
        }
        let rank_from_top = rank_letter as u8 - b'a';
        if file_digit == 0 || file_digit > width || rank_from_top >= height {
            return None;
        }
        Some(Square::new(width - file_digit, height - 1 - rank_from_top))
    }
}

/// Origem de um lance: uma casa do tabuleiro ou uma largada da reserva.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Board(Square),
    Drop(PieceKind),
}

/// Lance completo. `from == None` representa uma largada.
/// A ordem total derivada serve de desempate determinístico na pesquisa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub kind: PieceKind,
    pub from: Option<Square>,
    pub to: Square,
    pub promote: bool,
}

impl Move {
    pub const fn board(kind: PieceKind, from: Square, to: Square, promote: bool) -> Self {
        Self { kind, from: Some(from), to, promote }
    }

    pub const fn drop(kind: PieceKind, to: Square) -> Self {
        Self { kind, from: None, to, promote: false }
    }

    #[inline]
    pub fn is_drop(&self) -> bool {
        self.from.is_none()
    }

    pub fn source(&self) -> Source {
        match self.from {
            Some(square) => Source::Board(square),
            None => Source::Drop(self.kind),
        }
    }

    /// Texto USI: "7g7f", "8h2b+" ou "P*5e".
    pub fn to_usi(&self, width: u8, height: u8) -> String {
        match self.from {
            Some(from) => format!(
                "{}{}{}",
                from.to_usi(width, height),
                self.to.to_usi(width, height),
                if self.promote { "+" } else { "" }
            ),
            None => format!("{}*{}", self.kind.rule().letter, self.to.to_usi(width, height)),
        }
    }
}

/// Entrada do histórico, consumida por exportadores de notação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub side: Side,
    pub kind: PieceKind,
    pub from: Option<Square>,
    pub to: Square,
    pub promoted: bool,
    pub captured: Option<PieceKind>,
}

impl MoveRecord {
    pub fn dropped(&self) -> bool {
        self.from.is_none()
    }
}

/// Reserva de peças capturadas de um lado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    counts: [u8; 7],
}

impl Hand {
    pub fn count(&self, kind: PieceKind) -> u8 {
        kind.hand_index().map_or(0, |i| self.counts[i])
    }

    /// Acrescenta uma peça, já na forma base. Devolve `false` se o tipo não cabe na reserva.
    pub fn add(&mut self, kind: PieceKind) -> bool {
        match kind.hand_index() {
            Some(i) => {
                self.counts[i] = self.counts[i].saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, kind: PieceKind, count: u8) -> bool {
        match kind.hand_index() {
            Some(i) => {
                self.counts[i] = count;
                true
            }
            None => false,
        }
    }

    /// Retira uma peça. Nunca desce abaixo de zero.
    pub fn take(&mut self, kind: PieceKind) -> bool {
        match kind.hand_index().and_then(|i| self.counts[i].checked_sub(1).map(|c| (i, c))) {
            Some((i, remaining)) => {
                self.counts[i] = remaining;
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Pares (tipo, quantidade) com quantidade > 0, na ordem SFEN.
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u8)> + '_ {
        PieceKind::DROPPABLE
            .iter()
            .zip(self.counts.iter())
            .filter(|(_, c)| **c > 0)
            .map(|(&k, &c)| (k, c))
    }

    pub fn material(&self) -> f64 {
        self.iter().map(|(k, c)| k.value() * c as f64).sum()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Sente => write!(f, "sente"),
            Side::Gote => write!(f, "gote"),
        }
    }
}
