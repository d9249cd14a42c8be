// Ficheiro: src/core/error.rs
// Descrição: Erros de formato SFEN e de montagem de posições.

use thiserror::Error;

use super::types::{PieceKind, Side, Square};

/// Texto SFEN mal formado.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected 3 or 4 space-separated fields, found {0}")]
    FieldCount(usize),

    #[error("expected {expected} ranks, found {found}")]
    RankCount { expected: usize, found: usize },

    #[error("rank {rank} describes {found} files, expected {expected}")]
    FileCount { rank: usize, expected: usize, found: usize },

    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),

    #[error("'+' must precede a promotable piece letter")]
    InvalidPromotionMarker,

    #[error("invalid side to move '{0}', expected 'b' or 'w'")]
    InvalidTurn(String),

    #[error("piece '{0}' cannot be held in hand")]
    InvalidHandPiece(char),

    #[error("invalid hand count in '{0}'")]
    InvalidHandCount(String),

    #[error("invalid move number '{0}'")]
    InvalidMoveNumber(String),
}

/// Posição que viola as invariantes do jogo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{0} has no king")]
    MissingKing(Side),

    #[error("{0} has more than one king")]
    TooManyKings(Side),

    #[error("board size {width}x{height} is not supported (1 to {max} per side)")]
    UnsupportedSize { width: u8, height: u8, max: u8 },

    #[error("{kind:?} at {square:?} can never move again")]
    DeadPiece { kind: PieceKind, square: Square },
}

pub type SetupResult<T> = Result<T, SetupError>;
